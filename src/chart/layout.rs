use super::ChartConfig;
use crate::heat::{CalendarGrid, DayCell, IntensityScale, YearBoundary};
use crate::util::{display_date, DAY_LABELS};
use chrono::NaiveDate;
use serde::Serialize;

/// Rows that get a weekday label (Mon, Wed, Fri).
pub const VISIBLE_DAYS: [u8; 3] = [1, 3, 5];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
    pub week_index: usize,
    pub day_of_week: u8,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// A positioned heatmap, ready for a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub config: ChartConfig,
    pub width: f64,
    pub height: f64,
    pub weeks: usize,
    /// Week-major: the cell for (week, day) is at `week * 7 + day`.
    pub cells: Vec<Cell>,
    pub year_labels: Vec<Label>,
    pub month_labels: Vec<Label>,
    pub day_labels: Vec<Label>,
    /// SVG path data for every year seam except the first year's.
    pub separators: Vec<String>,
}

pub fn layout(grid: &CalendarGrid, config: &ChartConfig) -> Chart {
    let scale = IntensityScale::fit(&grid.positive_counts(), config.levels);

    let cells = grid
        .days()
        .map(|day| Cell {
            x: config.column_x(day.week_index),
            y: config.row_y(day.day_of_week),
            date: day.date,
            count: day.count,
            level: scale.classify(day.count),
            week_index: day.week_index,
            day_of_week: day.day_of_week,
            tooltip: tooltip_text(day),
        })
        .collect();

    let year_labels = grid
        .year_boundaries
        .iter()
        .map(|b| Label {
            text: b.year.to_string(),
            x: config.column_x(b.week_index),
            y: config.year_label_height - 3.0,
        })
        .collect();

    let month_labels = grid
        .month_boundaries
        .iter()
        .map(|b| Label {
            text: b.label.to_string(),
            x: config.column_x(b.week_index),
            y: config.year_label_height + config.month_label_height - 3.0,
        })
        .collect();

    let day_labels = VISIBLE_DAYS
        .iter()
        .map(|&d| Label {
            text: DAY_LABELS[d as usize].to_string(),
            x: config.label_width - 2.0,
            y: config.row_y(d) + config.cell_size - 2.0,
        })
        .collect();

    let separators = grid
        .year_boundaries
        .iter()
        .skip(1)
        .map(|b| separator_path(b, config))
        .collect();

    Chart {
        config: config.clone(),
        width: config.width(grid.weeks.len()),
        height: config.height(),
        weeks: grid.weeks.len(),
        cells,
        year_labels,
        month_labels,
        day_labels,
        separators,
    }
}

/// SVG path for the seam between two years.
///
/// January 1st sits somewhere inside the column before the boundary week, so
/// the line runs down to that row, steps one column left with rounded
/// corners and continues to the bottom.
pub fn separator_path(boundary: &YearBoundary, config: &ChartConfig) -> String {
    let step = config.step();
    let half_gap = config.cell_gap / 2.0;
    let x = config.column_x(boundary.week_index) - half_gap;
    let top_y = config.grid_top() - half_gap;
    let bottom_y = config.grid_top() + 7.0 * step - half_gap;

    if boundary.start_day_of_week == 0 {
        return format!("M {x} {top_y} L {x} {bottom_y}");
    }

    let step_x = x - step;
    let step_y = top_y + f64::from(boundary.start_day_of_week) * step;
    let r = config.cell_radius;

    format!(
        "M {x} {top_y} L {x} {a} Q {x} {step_y} {b} {step_y} L {c} {step_y} Q {step_x} {step_y} {step_x} {d} L {step_x} {bottom_y}",
        a = step_y - r,
        b = x - r,
        c = step_x + r,
        d = step_y + r,
    )
}

/// "Mar 4, 2023: 3 commits"
pub fn tooltip_text(day: &DayCell) -> String {
    let noun = if day.count == 1 { "commit" } else { "commits" };
    format!("{}: {} {noun}", display_date(day.date), day.count)
}

impl Chart {
    pub fn cell(&self, week_index: usize, day_of_week: u8) -> Option<&Cell> {
        if day_of_week > 6 {
            return None;
        }
        self.cells.get(week_index * 7 + day_of_week as usize)
    }
}
