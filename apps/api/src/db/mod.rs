pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod schema;

pub use migrations::Migrator;
pub use pool::create_database_pool;
