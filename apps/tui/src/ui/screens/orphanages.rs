use crate::app::App;
use crate::map::MapViewport;
use crate::ui::screens::{render_shortcuts, render_status};
use crate::ui::widgets::map::{render_map, MapMarker};
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_orphanages(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Table and map
            Constraint::Length(3), // Status
            Constraint::Length(2), // Shortcuts
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[0]);

    render_table(app, f, columns[0]);
    render_overview_map(app, f, columns[1]);
    render_status(f, chunks[1], &app.status_message);

    let shortcuts: &[(&str, &str)] = if app.search_active {
        &[("Esc", "Clear search"), ("↑/↓", "Navigate"), ("Enter", "Details")]
    } else {
        &[
            ("↑/↓", "Navigate"),
            ("Enter", "Details"),
            ("/", "Search"),
            ("n", "New orphanage"),
            ("r", "Refresh"),
            ("+/-", "Zoom"),
            ("F1", "Help"),
            ("q", "Quit"),
        ]
    };
    render_shortcuts(f, chunks[2], shortcuts);
}

fn render_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (search_area, table_area) = if app.search_active {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);
        (Some(parts[0]), parts[1])
    } else {
        (None, area)
    };

    if let Some(search_area) = search_area {
        let search = Paragraph::new(format!("{}_", app.search_query))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(" Search by name "));
        f.render_widget(search, search_area);
    }

    let visible = app.visible_indices();
    if visible.is_empty() {
        let message = if app.orphanages.is_empty() {
            "No orphanages registered yet. Press n to add one."
        } else {
            "No orphanage matches the search."
        };
        let paragraph = Paragraph::new(message)
            .block(
                Block::default()
                    .title("Orphanages")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, table_area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Name"),
        Cell::from("Hours"),
        Cell::from("Weekends"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = visible.len();
    let max_visible_rows = table_area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.selected_orphanage_index);

    let rows = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .filter_map(|(row, &index)| app.orphanages.get(index).map(|o| (row, o)))
        .map(|(row, orphanage)| {
            let style = if row == app.selected_orphanage_index {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(orphanage.id.to_string()),
                Cell::from(orphanage.name.clone()),
                Cell::from(orphanage.opening_hours.clone()),
                Cell::from(if orphanage.open_on_weekends { "Yes" } else { "No" }),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    "Orphanages ({} of {})",
                    app.selected_orphanage_index + 1,
                    total_rows
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, table_area);
}

fn render_overview_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let selected = app.selected_orphanage();
    let center = selected.map_or(app.default_viewport.center, crate::domain::Orphanage::coordinates);
    let viewport = MapViewport::new(center, app.list_zoom);

    let markers: Vec<MapMarker<'_>> = app
        .orphanages
        .iter()
        .map(|o| MapMarker {
            at: o.coordinates(),
            label: &o.name,
            highlighted: selected.is_some_and(|s| s.id == o.id),
        })
        .collect();

    let block = Block::default()
        .title(format!(" Map (zoom {}) ", viewport.zoom))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    render_map(f, area, block, &viewport, &app.icon, &markers, false);
}
