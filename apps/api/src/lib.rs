// Export our modules for use in the binary and tests
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod uploads;
