//! Commit heatmap layout and SVG emission.
//!
//! Everything here is a pure function of a [`CalendarGrid`](crate::heat::CalendarGrid)
//! and a [`ChartConfig`]; re-run it whenever the summary changes.

pub mod interact;
pub mod layout;
pub mod svg;

pub use interact::{HoverTracker, RevealSchedule, RevealStep, TooltipSink, Viewport};
pub use layout::{layout, separator_path, tooltip_text, Cell, Chart, Label};
pub use svg::render_svg;

use crate::heat::intensity::DEFAULT_LEVELS;
use serde::{Deserialize, Serialize};

/// Heatmap geometry in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub cell_size: f64,
    pub cell_gap: f64,
    pub cell_radius: f64,
    pub label_width: f64,
    pub year_label_height: f64,
    pub month_label_height: f64,
    pub padding: f64,
    /// Number of non-zero intensity levels.
    pub levels: u8,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            cell_gap: 4.0,
            cell_radius: 4.0,
            label_width: 30.0,
            year_label_height: 18.0,
            month_label_height: 14.0,
            padding: 5.0,
            levels: DEFAULT_LEVELS,
        }
    }
}

impl ChartConfig {
    /// Horizontal distance between week columns, and vertical between day rows.
    pub fn step(&self) -> f64 {
        self.cell_size + self.cell_gap
    }

    pub fn grid_left(&self) -> f64 {
        self.label_width + self.padding
    }

    pub fn grid_top(&self) -> f64 {
        self.year_label_height + self.month_label_height + self.padding
    }

    pub fn column_x(&self, week_index: usize) -> f64 {
        self.grid_left() + week_index as f64 * self.step()
    }

    pub fn row_y(&self, day_of_week: u8) -> f64 {
        self.grid_top() + f64::from(day_of_week) * self.step()
    }

    pub fn width(&self, weeks: usize) -> f64 {
        self.grid_left() + weeks as f64 * self.step() + self.padding
    }

    pub fn height(&self) -> f64 {
        self.grid_top() + 7.0 * self.step()
    }
}
