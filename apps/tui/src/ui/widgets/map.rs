use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::domain::Coordinates;
use crate::map::{MapIconConfig, MapViewport};

/// A labelled point drawn with the shared marker icon.
pub struct MapMarker<'a> {
    pub at: Coordinates,
    pub label: &'a str,
    pub highlighted: bool,
}

/// Draws the coordinate canvas and returns the inner area used for hit testing.
pub fn render_map(
    f: &mut Frame<'_>,
    area: Rect,
    block: Block<'_>,
    viewport: &MapViewport,
    icon: &MapIconConfig,
    markers: &[MapMarker<'_>],
    crosshair: bool,
) -> Rect {
    let inner = block.inner(area);
    if inner.width == 0 || inner.height == 0 {
        f.render_widget(block, area);
        return inner;
    }

    let [west, east] = viewport.x_bounds();
    let [south, north] = viewport.y_bounds();
    let (label_cols, label_rows) = icon.label_offset();
    let label_dx = f64::from(label_cols) * (east - west) / f64::from(inner.width);
    let label_dy = f64::from(label_rows) * (north - south) / f64::from(inner.height);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([west, east])
        .y_bounds([south, north])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();

            for marker in markers.iter().filter(|m| viewport.contains(m.at)) {
                let style = if marker.highlighted {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(icon.color)
                };
                ctx.print(
                    marker.at.lng,
                    marker.at.lat,
                    Span::styled(icon.glyph.to_string(), style),
                );
                if !marker.label.is_empty() {
                    // Keep labels on screen near the eastern edge
                    let x = (marker.at.lng + label_dx).min(east - label_dx);
                    ctx.print(
                        x,
                        marker.at.lat - label_dy,
                        Span::styled(marker.label.to_owned(), style),
                    );
                }
            }

            if crosshair {
                ctx.print(
                    viewport.center.lng,
                    viewport.center.lat,
                    Span::styled("+", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                );
            }
        });

    f.render_widget(canvas, area);
    inner
}
