mod helpers;
pub mod screens;

use crate::app::state::{App, AppScreen};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

pub async fn handle_input(app: &mut App, key: KeyCode) {
    screens::dispatch_input(app, key).await;
}

/// Map clicks and wheel zoom on the create screen.
///
/// Ignored while the help overlay or the failure popup covers the map.
pub fn handle_mouse(app: &mut App, event: MouseEvent) {
    if app.screen != AppScreen::Create || app.show_help {
        return;
    }
    let Some(area) = app.map_area.get() else {
        return;
    };
    let Some(create) = &mut app.create else {
        return;
    };
    if create.popup.is_some() {
        return;
    }

    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(click) = create
                .viewport
                .cell_to_coordinates(area, event.column, event.row)
            else {
                return;
            };
            match create.form.handle_map_click(click) {
                Ok(()) => {
                    app.status_message = format!("Location set to {:.6}, {:.6}", click.lat, click.lng);
                }
                Err(e) => app.status_message = e.to_string(),
            }
        }
        MouseEventKind::ScrollUp => create.viewport.zoom_in(),
        MouseEventKind::ScrollDown => create.viewport.zoom_out(),
        _ => {}
    }
}
