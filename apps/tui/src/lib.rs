// Export our modules for use in the binary and tests
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod event;
pub mod form;
pub mod logging;
pub mod map;
pub mod terminal;
pub mod ui;

pub use domain::{Coordinates, Orphanage, WeekendChoice};
