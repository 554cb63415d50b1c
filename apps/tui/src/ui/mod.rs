// UI module for the orphanage client
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    // Only the create screen has a clickable map
    app.map_area.set(None);

    match app.screen {
        AppScreen::Orphanages => screens::orphanages::render_orphanages(app, f),
        AppScreen::Details => screens::details::render_details(app, f),
        AppScreen::Create => screens::create::render_create(app, f),
        AppScreen::Created => screens::created::render_created(app, f),
    }

    if app.show_help {
        screens::render_help_popup(f);
    }
}
