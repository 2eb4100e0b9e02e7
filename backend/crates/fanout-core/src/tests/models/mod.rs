mod connection_id;
mod payload;
