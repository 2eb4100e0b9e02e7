pub mod connection_repository;
