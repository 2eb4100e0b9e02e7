pub mod broadcast;
pub mod connections;
pub mod error;
