pub mod registry_pool;
