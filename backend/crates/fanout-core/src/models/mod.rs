pub mod connection_id;
pub mod payload;
