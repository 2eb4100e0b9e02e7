pub mod test_db;

pub use test_db::{create_test_pool, create_test_store, generate_ids};
