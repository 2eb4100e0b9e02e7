//! Errors for the management endpoint.
//!
//! Each one renders as `{"error": {"code", "message"}}` with the matching status.

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "GONE", "BAD_REQUEST")
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown stage (404)
    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Malformed connection id (400)
    #[error("Bad request: {message} {location}")]
    BadRequest {
        message: String,
        location: ErrorLocation,
    },

    /// No live socket for the connection (410)
    #[error("Gone: {connection_id} {location}")]
    Gone {
        connection_id: String,
        location: ErrorLocation,
    },

    /// The socket's outbound buffer is full (429)
    #[error("Too many requests: {connection_id} {location}")]
    TooManyRequests {
        connection_id: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn gone(connection_id: impl Into<String>) -> Self {
        Self::Gone {
            connection_id: connection_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn too_many_requests(connection_id: impl Into<String>) -> Self {
        Self::TooManyRequests {
            connection_id: connection_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Gone { .. } => StatusCode::GONE,
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Gone and full buffers are routine for a publisher
        match self {
            Self::Gone { .. } | Self::TooManyRequests { .. } => log::debug!("{}", self),
            _ => log::warn!("{}", self),
        }

        let status = self.status();
        let body = match self {
            Self::NotFound { message, .. } => ApiErrorBody {
                code: "NOT_FOUND".into(),
                message,
            },
            Self::BadRequest { message, .. } => ApiErrorBody {
                code: "BAD_REQUEST".into(),
                message,
            },
            Self::Gone { connection_id, .. } => ApiErrorBody {
                code: "GONE".into(),
                message: format!("connection {connection_id} is gone"),
            },
            Self::TooManyRequests { connection_id, .. } => ApiErrorBody {
                code: "TOO_MANY_REQUESTS".into(),
                message: format!("connection {connection_id} is not keeping up"),
            },
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
