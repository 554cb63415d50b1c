use crate::app::App;
use crate::map::MapViewport;
use crate::ui::screens::render_shortcuts;
use crate::ui::widgets::map::{render_map, MapMarker};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_details(app: &App, f: &mut Frame<'_>) {
    let Some(orphanage) = &app.details else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(2)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    let label = |text: &'static str| {
        Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };

    let mut lines = vec![
        TextLine::from(Span::styled(
            orphanage.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(orphanage.about.clone()),
        TextLine::from(""),
        TextLine::from(vec![label("Instructions: "), Span::raw(orphanage.instructions.clone())]),
        TextLine::from(vec![label("Opening hours: "), Span::raw(orphanage.opening_hours.clone())]),
        TextLine::from(vec![
            label("Weekends: "),
            if orphanage.open_on_weekends {
                Span::styled("Open on weekends", Style::default().fg(Color::Green))
            } else {
                Span::styled("Closed on weekends", Style::default().fg(Color::Red))
            },
        ]),
        TextLine::from(vec![
            label("Location: "),
            Span::raw(format!("{:.6}, {:.6}", orphanage.latitude, orphanage.longitude)),
        ]),
    ];

    if let Some(number) = &orphanage.whatsapp_number {
        lines.push(TextLine::from(vec![label("WhatsApp: "), Span::raw(number.clone())]));
    }

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(label("Images:")));
    if orphanage.images.is_empty() {
        lines.push(TextLine::from("  (none)"));
    }
    for image in &orphanage.images {
        lines.push(TextLine::from(format!("  {}", image.url)));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!(" Orphanage #{} ", orphanage.id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(paragraph, columns[0]);

    let viewport = MapViewport::new(orphanage.coordinates(), app.default_viewport.zoom);
    let marker = MapMarker {
        at: orphanage.coordinates(),
        label: &orphanage.name,
        highlighted: true,
    };
    let block = Block::default()
        .title(" Location ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    render_map(f, columns[1], block, &viewport, &app.icon, &[marker], false);

    render_shortcuts(f, chunks[1], &[("Esc", "Back"), ("q", "Quit")]);
}
