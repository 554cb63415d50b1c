//! Map configuration and the conversion between terminal cells and coordinates.

use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::domain::Coordinates;

/// Nominal terminal cell size in pixels, used to translate icon offsets.
const CELL_WIDTH_PX: i32 = 8;
const CELL_HEIGHT_PX: i32 = 16;

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Marker icon, built once at startup and shared by every map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapIconConfig {
    pub glyph: char,
    pub color: Color,
    /// Icon size in pixels (width, height)
    pub size: (u16, u16),
    /// Point of the icon that sits on the coordinate
    pub anchor: (u16, u16),
    /// Where the label opens, relative to the anchor
    pub popup_anchor: (i32, i32),
}

impl Default for MapIconConfig {
    fn default() -> Self {
        Self {
            glyph: '▼',
            color: Color::Rgb(21, 195, 214),
            size: (40, 45),
            anchor: (20, 45),
            popup_anchor: (142, 14),
        }
    }
}

impl MapIconConfig {
    /// Label offset in whole cells (columns, rows).
    pub const fn label_offset(&self) -> (i32, i32) {
        (
            self.popup_anchor.0 / CELL_WIDTH_PX,
            self.popup_anchor.1 / CELL_HEIGHT_PX,
        )
    }
}

/// Visible region of the map: a center and a web-map style zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: Coordinates,
    pub zoom: u8,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: Coordinates::new(-22.903_541_6, -47.043_234),
            zoom: 14,
        }
    }
}

impl MapViewport {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Longitude span in degrees.
    pub fn span_lng(&self) -> f64 {
        360.0 / 2f64.powi(i32::from(self.zoom))
    }

    /// Latitude span in degrees.
    pub fn span_lat(&self) -> f64 {
        self.span_lng() / 2.0
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.span_lng() / 2.0;
        [self.center.lng - half, self.center.lng + half]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.span_lat() / 2.0;
        [self.center.lat - half, self.center.lat + half]
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        (west..=east).contains(&point.lng) && (south..=north).contains(&point.lat)
    }

    /// Maps a terminal cell inside `area` to the coordinate under its center.
    pub fn cell_to_coordinates(&self, area: Rect, column: u16, row: u16) -> Option<Coordinates> {
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }

        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        let [west, _] = self.x_bounds();
        let [_, north] = self.y_bounds();

        Some(Coordinates::new(
            fy.mul_add(-self.span_lat(), north),
            fx.mul_add(self.span_lng(), west),
        ))
    }

    /// Moves the center by a tenth of the visible span per step.
    pub fn pan(&mut self, columns: i32, rows: i32) {
        self.center.lng += f64::from(columns) * self.span_lng() / 10.0;
        self.center.lat += f64::from(rows) * self.span_lat() / 10.0;
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }
}
