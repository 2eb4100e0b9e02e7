use thiserror::Error;

/// Why a single delivery attempt failed without proving the connection dead
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("send buffer full")]
    BufferFull,

    #[error("endpoint rejected delivery with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("transport failure: {message}")]
    Transport { message: String },
}
