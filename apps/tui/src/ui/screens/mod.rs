pub mod create;
pub mod created;
pub mod details;
pub mod orphanages;

use crate::ui::widgets::popup::render_popup;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// `key: action` pairs rendered as one centered line.
pub(crate) fn render_shortcuts(f: &mut Frame<'_>, area: Rect, shortcuts: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(shortcuts.len() * 2);
    for (key, action) in shortcuts {
        spans.push(Span::styled(
            (*key).to_owned(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(": {action}   ")));
    }

    let paragraph = Paragraph::new(TextLine::from(spans))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

pub(crate) fn render_status(f: &mut Frame<'_>, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message.to_owned())
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(paragraph, area);
}

pub fn render_help_popup(f: &mut Frame<'_>) {
    let lines = vec![
        TextLine::from("Orphanages: ↑/↓ select, Enter details, / search, n new, r refresh"),
        TextLine::from("Create: ↑/↓ or Tab move, Enter edit or confirm"),
        TextLine::from("Map: click or Enter at the crosshair, arrows pan, +/- zoom"),
        TextLine::from("Images: Enter to type paths (comma separated), ←/→ pick, Del remove"),
        TextLine::from(""),
        TextLine::from("F1 or Esc closes this help, q quits"),
    ];
    render_popup(f, "Help", Text::from(lines), Color::Cyan);
}
