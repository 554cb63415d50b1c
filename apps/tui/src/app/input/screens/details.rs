use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_details_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => {
            app.details = None;
            app.screen = AppScreen::Orphanages;
        }
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}
