pub mod connection;
pub mod connection_store;
pub mod error;
pub mod registry_scan;
pub mod repositories;


pub use connection::registry_pool::create_registry_pool;
pub use connection_store::{ConnectionStore, ScanCursor, ScanPage};
pub use error::{DbError, Result};
pub use registry_scan::RegistryScan;
pub use repositories::connection_repository::SqliteConnectionStore;
