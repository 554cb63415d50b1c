use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub async fn handle_created_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Esc => {
            app.created = None;
            app.screen = AppScreen::Orphanages;
            app.refresh_orphanages().await;
        }
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}
