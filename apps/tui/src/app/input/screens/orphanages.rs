use crate::app::state::App;
use crate::map::{MAX_ZOOM, MIN_ZOOM};
use crossterm::event::KeyCode;

pub async fn handle_orphanages_input(app: &mut App, key: KeyCode) {
    if app.search_active {
        handle_search_input(app, key).await;
        return;
    }

    let total_rows = app.visible_indices().len();

    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('n') => app.open_create_form(),
        KeyCode::Char('r') => app.refresh_orphanages().await,
        KeyCode::Char('/') => {
            app.search_active = true;
            app.search_query.clear();
            app.apply_search();
        }
        KeyCode::Char('+') => app.list_zoom = (app.list_zoom + 1).min(MAX_ZOOM),
        KeyCode::Char('-') => app.list_zoom = app.list_zoom.saturating_sub(1).max(MIN_ZOOM),
        KeyCode::Enter => {
            if total_rows > 0 {
                app.open_details().await;
            }
        }
        _ => navigate(app, key, total_rows),
    }
}

async fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter => {
            if !app.visible_indices().is_empty() {
                app.open_details().await;
            }
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.apply_search();
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.selected_orphanage_index = 0;
            app.apply_search();
        }
        _ => {
            let total_rows = app.visible_indices().len();
            navigate(app, key, total_rows);
        }
    }
}

fn navigate(app: &mut App, key: KeyCode, total_rows: usize) {
    match key {
        KeyCode::Up => {
            app.selected_orphanage_index = app.selected_orphanage_index.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.selected_orphanage_index + 1 < total_rows {
                app.selected_orphanage_index += 1;
            }
        }
        KeyCode::PageUp => {
            app.selected_orphanage_index = app.selected_orphanage_index.saturating_sub(5);
        }
        KeyCode::PageDown => {
            if total_rows > 0 {
                app.selected_orphanage_index = (app.selected_orphanage_index + 5).min(total_rows - 1);
            }
        }
        KeyCode::Home => app.selected_orphanage_index = 0,
        KeyCode::End => app.selected_orphanage_index = total_rows.saturating_sub(1),
        _ => {}
    }
}
