use crate::app::App;
use crate::ui::widgets::popup::render_popup;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::Frame;

pub fn render_created(app: &App, f: &mut Frame<'_>) {
    let name = app
        .created
        .as_ref()
        .map_or(app.created_name.as_str(), |o| o.name.as_str());

    let mut lines = vec![
        TextLine::from(Span::styled(
            "Registration complete!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(format!("{name} is now on the map.")),
    ];

    if let Some(created) = &app.created {
        lines.push(TextLine::from(format!(
            "Id {} with {} image(s)",
            created.id,
            created.images.len()
        )));
    }

    lines.push(TextLine::from(""));
    lines.push(TextLine::from("Press Enter to return to the map"));

    render_popup(f, "Orphanage created", Text::from(lines), Color::Green);
}
