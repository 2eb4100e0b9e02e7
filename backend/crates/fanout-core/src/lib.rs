pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use models::connection_id::ConnectionId;
pub use models::payload::Payload;

#[cfg(test)]
mod tests;
