use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod create;
mod created;
mod details;
mod help;
mod orphanages;

pub async fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_overlay(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Orphanages => orphanages::handle_orphanages_input(app, key).await,
        AppScreen::Details => details::handle_details_input(app, key),
        AppScreen::Create => create::handle_create_input(app, key),
        AppScreen::Created => created::handle_created_input(app, key).await,
    }
}
