pub mod api;
pub mod app;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

pub use api::error::{ApiError, Result as ApiResult};
pub use app::build_app_state;
pub use error::{Result, ServerError};
pub use routes::build_router;
