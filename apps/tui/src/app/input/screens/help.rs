use crate::app::state::App;
use crossterm::event::KeyCode;

/// Handles the help overlay. Returns true when the key was consumed.
///
/// F1 toggles the overlay from any screen; while it is open every other key
/// is swallowed and Esc closes it.
pub fn handle_help_overlay(app: &mut App, key: KeyCode) -> bool {
    match (app.show_help, key) {
        (_, KeyCode::F(1)) => app.show_help = !app.show_help,
        (true, KeyCode::Esc) => app.show_help = false,
        (true, _) => {}
        (false, _) => return false,
    }
    true
}
