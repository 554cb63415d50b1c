// App module for the orphanage client
// Handles application state and screen logic

pub mod actions;
pub mod input;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::{App, AppScreen, CreateField, CreateScreenState};
