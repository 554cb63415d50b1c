use crate::app::state::{CreateField, CreateScreenState};
use crate::app::App;
use crate::domain::WeekendChoice;
use crate::form::{FormPhase, TextField, ABOUT_MAX_CHARS};
use crate::ui::screens::{render_shortcuts, render_status};
use crate::ui::widgets::map::{render_map, MapMarker};
use crate::ui::widgets::popup::render_popup;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

pub fn render_create(app: &App, f: &mut Frame<'_>) {
    let Some(create) = &app.create else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Form and map
            Constraint::Length(3), // Status
            Constraint::Length(2), // Shortcuts
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[0]);

    render_fields(create, f, columns[0]);
    render_form_map(app, create, f, columns[1]);

    if create.form.is_submitting() {
        let throbber = Throbber::default()
            .label("Submitting orphanage...")
            .style(Style::default().fg(Color::Cyan));
        let block_area = chunks[1];
        f.render_widget(Block::default().borders(Borders::ALL).title(" Status "), block_area);
        let inner = Rect {
            x: block_area.x + 1,
            y: block_area.y + 1,
            width: block_area.width.saturating_sub(2),
            height: 1,
        };
        f.render_stateful_widget(throbber, inner, &mut app.throbber.clone());
    } else {
        render_status(f, chunks[1], &app.status_message);
    }

    render_shortcuts(f, chunks[2], shortcuts(create));

    if let Some(message) = &create.popup {
        render_popup(
            f,
            "Could not register orphanage",
            format!("{message}\n\nYour data is kept. Press Enter to go back and retry."),
            Color::Red,
        );
    }
}

fn shortcuts(create: &CreateScreenState) -> &'static [(&'static str, &'static str)] {
    match (create.editing, create.field) {
        (true, CreateField::Map) => &[
            ("←↑↓→", "Pan"),
            ("+/-", "Zoom"),
            ("Enter", "Mark crosshair"),
            ("Esc", "Done"),
        ],
        (true, CreateField::Images) => &[("Enter", "Add files"), ("Esc", "Cancel")],
        (true, _) => &[("Enter/Esc", "Done")],
        (false, CreateField::Images) => &[
            ("Enter", "Select files"),
            ("←/→", "Pick image"),
            ("Del", "Remove image"),
            ("↑/↓", "Move"),
        ],
        (false, CreateField::OpenOnWeekends) => &[("y/n", "Choose"), ("↑/↓", "Move"), ("Esc", "Back")],
        (false, _) => &[("↑/↓", "Move"), ("Enter", "Edit / Confirm"), ("Esc", "Back")],
    }
}

fn field_style(create: &CreateScreenState, field: CreateField) -> Style {
    let is_selected = create.field == field;
    if is_selected && create.editing {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn prefix(create: &CreateScreenState, field: CreateField) -> &'static str {
    if create.field != field {
        "  "
    } else if create.editing {
        "► "
    } else {
        "> "
    }
}

fn render_fields(create: &CreateScreenState, f: &mut Frame<'_>, area: Rect) {
    let form = &create.form;
    let mut lines = Vec::new();

    let location = form.position().map_or_else(
        || "not set (click the map)".to_owned(),
        |p| format!("{:.6}, {:.6}", p.lat, p.lng),
    );
    lines.push(TextLine::from(vec![
        Span::styled(
            format!("{}Location: ", prefix(create, CreateField::Map)),
            field_style(create, CreateField::Map),
        ),
        Span::raw(location),
    ]));
    lines.push(TextLine::from(""));

    for (field, text_field) in [
        (CreateField::Name, TextField::Name),
        (CreateField::About, TextField::About),
        (CreateField::Instructions, TextField::Instructions),
        (CreateField::OpeningHours, TextField::OpeningHours),
    ] {
        let value = form.text(text_field);
        let cursor = if create.field == field && create.editing { "_" } else { "" };
        let mut spans = vec![
            Span::styled(
                format!("{}{}: ", prefix(create, field), text_field.label()),
                field_style(create, field),
            ),
            Span::raw(format!("{value}{cursor}")),
        ];
        if text_field == TextField::About {
            spans.push(Span::styled(
                format!("  ({}/{ABOUT_MAX_CHARS})", value.chars().count()),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(TextLine::from(spans));
    }

    let choice = form.weekend_choice();
    let option = |c: WeekendChoice| {
        let style = if c == choice {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!(" {} ", c.label()), style)
    };
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(vec![
        Span::styled(
            format!("{}Open on weekends: ", prefix(create, CreateField::OpenOnWeekends)),
            field_style(create, CreateField::OpenOnWeekends),
        ),
        option(WeekendChoice::Yes),
        Span::raw(" "),
        option(WeekendChoice::No),
    ]));

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        format!("{}Images ({})", prefix(create, CreateField::Images), form.attachments().len()),
        field_style(create, CreateField::Images),
    )));
    for (index, attachment) in form.attachments().iter().enumerate() {
        let selected = create.field == CreateField::Images && index == create.image_index;
        let style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(TextLine::from(Span::styled(
            format!(
                "    {} {} ({} bytes, {})",
                if selected { "x" } else { "-" },
                attachment.file.file_name,
                attachment.file.size,
                attachment.file.mime
            ),
            style,
        )));
    }
    if create.editing && create.field == CreateField::Images {
        lines.push(TextLine::from(vec![
            Span::styled("    Paths: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}_", create.path_input)),
        ]));
    }

    lines.push(TextLine::from(""));
    let confirm_style = if form.is_submitting() {
        Style::default().fg(Color::DarkGray)
    } else {
        field_style(create, CreateField::Confirm).fg(Color::Green)
    };
    lines.push(TextLine::from(Span::styled(
        format!("{}[ Confirm ]", prefix(create, CreateField::Confirm)),
        confirm_style,
    )));

    let title = match form.phase() {
        FormPhase::Failed(_) => " Register orphanage (last attempt failed) ",
        _ => " Register orphanage ",
    };
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(paragraph, area);
}

fn render_form_map(app: &App, create: &CreateScreenState, f: &mut Frame<'_>, area: Rect) {
    let name = create.form.text(TextField::Name);
    let markers: Vec<MapMarker<'_>> = create
        .form
        .position()
        .map(|at| MapMarker {
            at,
            label: name,
            highlighted: false,
        })
        .into_iter()
        .collect();

    let map_editing = create.editing && create.field == CreateField::Map;
    let border = if create.field == CreateField::Map {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(format!(" Map (zoom {}) ", create.viewport.zoom))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = render_map(
        f,
        area,
        block,
        &create.viewport,
        &app.icon,
        &markers,
        map_editing,
    );
    app.map_area.set(Some(inner));
}
