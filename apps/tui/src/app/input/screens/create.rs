use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, CreateField, CreateScreenState};
use crate::domain::WeekendChoice;
use crate::form::images::parse_selection;
use crossterm::event::KeyCode;

pub fn handle_create_input(app: &mut App, key: KeyCode) {
    let Some(create) = app.create.as_mut() else {
        return;
    };

    // The failure popup swallows the key that closes it
    if create.popup.is_some() {
        if matches!(key, KeyCode::Esc | KeyCode::Enter) {
            create.popup = None;
        }
        return;
    }

    if create.editing {
        if let Err(message) = handle_editing_input(create, key) {
            app.status_message = message;
        }
        return;
    }

    match key {
        KeyCode::Esc => {
            app.close_create_form();
        }
        KeyCode::Up | KeyCode::BackTab => create.field = create.field.prev(),
        KeyCode::Down | KeyCode::Tab => create.field = create.field.next(),
        KeyCode::Enter => match create.field {
            CreateField::Confirm => app.start_submit(),
            CreateField::OpenOnWeekends => {
                let choice = create.form.weekend_choice().toggled();
                report(app, |c| c.form.select_weekends(choice).map_err(|e| e.to_string()));
            }
            _ => create.editing = true,
        },
        KeyCode::Left | KeyCode::Right | KeyCode::Char('y' | 'n')
            if create.field == CreateField::OpenOnWeekends =>
        {
            let choice = match key {
                KeyCode::Char('y') => WeekendChoice::Yes,
                KeyCode::Char('n') => WeekendChoice::No,
                _ => create.form.weekend_choice().toggled(),
            };
            report(app, |c| c.form.select_weekends(choice).map_err(|e| e.to_string()));
        }
        KeyCode::Left if create.field == CreateField::Images => {
            create.image_index =
                wrap_decrement(create.image_index, create.form.attachments().len());
        }
        KeyCode::Right if create.field == CreateField::Images => {
            create.image_index =
                wrap_increment(create.image_index, create.form.attachments().len());
        }
        KeyCode::Delete | KeyCode::Backspace if create.field == CreateField::Images => {
            report(app, cancel_selected_image);
        }
        _ => {}
    }
}

/// Runs `action` on the create screen and shows its error, if any.
fn report(app: &mut App, action: impl FnOnce(&mut CreateScreenState) -> Result<(), String>) {
    if let Some(create) = app.create.as_mut() {
        if let Err(message) = action(create) {
            app.status_message = message;
        }
    }
}

fn cancel_selected_image(create: &mut CreateScreenState) -> Result<(), String> {
    let index = create.image_index;
    let Some(preview) = create
        .form
        .attachments()
        .get(index)
        .map(|a| a.preview.clone())
    else {
        return Ok(());
    };

    create
        .form
        .handle_cancel_image(&preview, index)
        .map_err(|e| e.to_string())?;
    create.clamp_image_index();
    Ok(())
}

fn handle_editing_input(create: &mut CreateScreenState, key: KeyCode) -> Result<(), String> {
    match create.field {
        CreateField::Map => handle_map_keys(create, key),
        CreateField::Images => handle_path_prompt(create, key),
        field => {
            let Some(text_field) = field.text_field() else {
                create.editing = false;
                return Ok(());
            };
            match key {
                KeyCode::Esc | KeyCode::Enter => create.editing = false,
                KeyCode::Char(c) => create
                    .form
                    .push_char(text_field, c)
                    .map_err(|e| e.to_string())?,
                KeyCode::Backspace => create
                    .form
                    .pop_char(text_field)
                    .map_err(|e| e.to_string())?,
                _ => {}
            }
            Ok(())
        }
    }
}

/// Arrow keys pan, `+`/`-` zoom, Enter clicks at the crosshair.
fn handle_map_keys(create: &mut CreateScreenState, key: KeyCode) -> Result<(), String> {
    match key {
        KeyCode::Esc => create.editing = false,
        KeyCode::Left => create.viewport.pan(-1, 0),
        KeyCode::Right => create.viewport.pan(1, 0),
        KeyCode::Up => create.viewport.pan(0, 1),
        KeyCode::Down => create.viewport.pan(0, -1),
        KeyCode::Char('+') => create.viewport.zoom_in(),
        KeyCode::Char('-') => create.viewport.zoom_out(),
        KeyCode::Enter | KeyCode::Char(' ') => create
            .form
            .handle_map_click(create.viewport.center)
            .map_err(|e| e.to_string())?,
        _ => {}
    }
    Ok(())
}

/// Comma-separated paths; Enter selects them, Esc abandons the prompt.
fn handle_path_prompt(create: &mut CreateScreenState, key: KeyCode) -> Result<(), String> {
    match key {
        KeyCode::Esc => {
            create.path_input.clear();
            create.editing = false;
        }
        KeyCode::Enter => {
            let selection = parse_selection(&create.path_input).map_err(|e| e.to_string())?;
            let added = create
                .form
                .handle_select_images(selection)
                .map_err(|e| e.to_string())?;
            if added > 0 {
                create.image_index = create.form.attachments().len() - 1;
            }
            create.path_input.clear();
            create.editing = false;
        }
        KeyCode::Backspace => {
            create.path_input.pop();
        }
        KeyCode::Char(c) => create.path_input.push(c),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpOrphanageApi;
    use crate::config::ClientConfig;
    use crate::form::{FormPhase, TextField};
    use std::sync::Arc;
    use std::time::Duration;

    fn app_on_form() -> App {
        let config = ClientConfig::default();
        let api = HttpOrphanageApi::new("http://127.0.0.1:9", Duration::from_secs(1)).expect("client");
        let mut app = App::new(&config, Arc::new(api));
        app.open_create_form();
        app
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            handle_create_input(app, *key);
        }
    }

    fn create(app: &App) -> &CreateScreenState {
        app.create.as_ref().expect("create screen")
    }

    #[test]
    fn typing_fills_focused_text_field() {
        let mut app = app_on_form();
        press(
            &mut app,
            &[
                KeyCode::Down,
                KeyCode::Enter,
                KeyCode::Char('L'),
                KeyCode::Char('a'),
                KeyCode::Char('r'),
                KeyCode::Backspace,
                KeyCode::Enter,
            ],
        );
        assert_eq!(create(&app).form.text(TextField::Name), "La");
        assert!(!create(&app).editing);
    }

    #[test]
    fn enter_on_map_sets_crosshair_position() {
        let mut app = app_on_form();
        press(&mut app, &[KeyCode::Enter, KeyCode::Right, KeyCode::Enter, KeyCode::Esc]);

        let state = create(&app);
        assert_eq!(state.form.position(), Some(state.viewport.center));
        assert_eq!(state.form.phase(), &FormPhase::Editing);
    }

    #[test]
    fn weekend_toggle_follows_choice() {
        let mut app = app_on_form();
        app.create.as_mut().expect("form").field = CreateField::OpenOnWeekends;

        press(&mut app, &[KeyCode::Char('n')]);
        assert!(!create(&app).form.open_on_weekends());
        press(&mut app, &[KeyCode::Char('y')]);
        assert!(create(&app).form.open_on_weekends());
        press(&mut app, &[KeyCode::Enter]);
        assert!(!create(&app).form.open_on_weekends());
    }

    #[test]
    fn images_are_selected_and_cancelled() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        std::fs::write(&a, b"a")?;
        std::fs::write(&b, b"b")?;

        let mut app = app_on_form();
        app.create.as_mut().ok_or("form")?.field = CreateField::Images;
        press(&mut app, &[KeyCode::Enter]);
        for c in format!("{}, {}", a.display(), b.display()).chars() {
            press(&mut app, &[KeyCode::Char(c)]);
        }
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(create(&app).form.attachments().len(), 2);
        assert_eq!(create(&app).image_index, 1);

        press(&mut app, &[KeyCode::Left, KeyCode::Delete]);
        let names: Vec<&str> = create(&app)
            .form
            .images()
            .iter()
            .map(|f| f.file_name.as_str())
            .collect();
        assert_eq!(names, ["b.png"]);
        assert_eq!(create(&app).image_index, 0);
        Ok(())
    }

    #[test]
    fn missing_image_path_is_reported() {
        let mut app = app_on_form();
        app.create.as_mut().expect("form").field = CreateField::Images;
        press(&mut app, &[KeyCode::Enter]);
        for c in "/definitely/not/here.png".chars() {
            press(&mut app, &[KeyCode::Char(c)]);
        }
        press(&mut app, &[KeyCode::Enter]);

        assert!(app.status_message.starts_with("file not found"));
        assert!(create(&app).form.attachments().is_empty());
    }

    #[test]
    fn escape_returns_to_list_and_drops_form() {
        let mut app = app_on_form();
        press(&mut app, &[KeyCode::Esc]);
        assert!(app.create.is_none());
        assert_eq!(app.screen, crate::app::AppScreen::Orphanages);
    }
}
