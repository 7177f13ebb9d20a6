use super::layout::{Cell, Chart};

/// Receiver of tooltip content, owned by the presentation layer.
pub trait TooltipSink {
    fn show(&mut self, content: &str);
    fn hide(&mut self);
}

impl Chart {
    /// Cell under the point `(x, y)`, ignoring the gaps between cells.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&Cell> {
        let config = &self.config;
        let dx = x - config.grid_left();
        let dy = y - config.grid_top();
        if dx < 0.0 || dy < 0.0 {
            return None;
        }

        let step = config.step();
        let week = (dx / step).floor() as usize;
        let day = (dy / step).floor() as usize;
        if week >= self.weeks || day > 6 {
            return None;
        }
        if dx - week as f64 * step > config.cell_size || dy - day as f64 * step > config.cell_size {
            return None;
        }
        self.cell(week, day as u8)
    }
}

/// Turns pointer movement into tooltip enter/leave events.
#[derive(Debug, Default)]
pub struct HoverTracker {
    current: Option<usize>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.current
    }

    pub fn pointer_move(&mut self, chart: &Chart, x: f64, y: f64, sink: &mut impl TooltipSink) {
        let target = chart
            .cell_at(x, y)
            .map(|cell| cell.week_index * 7 + cell.day_of_week as usize);
        if target == self.current {
            return;
        }

        if self.current.is_some() {
            sink.hide();
        }
        if let Some(cell) = target.and_then(|i| chart.cells.get(i)) {
            sink.show(&cell.tooltip);
        }
        self.current = target;
    }

    pub fn pointer_leave(&mut self, sink: &mut impl TooltipSink) {
        if self.current.take().is_some() {
            sink.hide();
        }
    }
}

/// Horizontal scroll window onto the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_left: f64,
    pub client_width: f64,
}

pub const REVEAL_DURATION_MS: u32 = 400;
const WEEK_DELAY_MS: u32 = 8;
const DAY_DELAY_MS: u32 = 15;
/// Columns beyond each viewport edge still animated.
const VISIBLE_MARGIN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStep {
    /// Index into [`Chart::cells`].
    pub cell: usize,
    pub delay_ms: u32,
    /// Zero means the cell appears in its final state immediately.
    pub duration_ms: u32,
}

impl RevealStep {
    pub fn is_instant(&self) -> bool {
        self.duration_ms == 0
    }
}

/// Entrance animation plan for the heatmap cells.
///
/// Visible columns sweep in from the right edge of the viewport; everything
/// else appears at once. Under reduced motion every cell is instant.
#[derive(Debug, Clone, Default)]
pub struct RevealSchedule {
    steps: Vec<RevealStep>,
    cancelled: bool,
}

impl RevealSchedule {
    pub fn plan(chart: &Chart, viewport: Option<Viewport>, reduced_motion: bool) -> Self {
        if reduced_motion || chart.weeks == 0 {
            return Self::instant(chart);
        }

        let last_week = chart.weeks - 1;
        let (visible_start, visible_end) = match viewport {
            Some(vp) => {
                let step = chart.config.step();
                let left = chart.config.grid_left();
                let start = ((vp.scroll_left - left) / step).floor() - VISIBLE_MARGIN as f64;
                let end = ((vp.scroll_left + vp.client_width - left) / step).ceil()
                    + VISIBLE_MARGIN as f64;
                (start.max(0.0) as usize, (end.max(0.0) as usize).min(last_week))
            }
            None => (0, last_week),
        };

        let steps = chart
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if (visible_start..=visible_end).contains(&cell.week_index) {
                    RevealStep {
                        cell: i,
                        delay_ms: (visible_end - cell.week_index) as u32 * WEEK_DELAY_MS
                            + u32::from(cell.day_of_week) * DAY_DELAY_MS,
                        duration_ms: REVEAL_DURATION_MS,
                    }
                } else {
                    RevealStep {
                        cell: i,
                        delay_ms: 0,
                        duration_ms: 0,
                    }
                }
            })
            .collect();

        Self {
            steps,
            cancelled: false,
        }
    }

    pub fn instant(chart: &Chart) -> Self {
        let steps = (0..chart.cells.len())
            .map(|cell| RevealStep {
                cell,
                delay_ms: 0,
                duration_ms: 0,
            })
            .collect();
        Self {
            steps,
            cancelled: false,
        }
    }

    /// Drop every pending step, e.g. when the chart is torn down.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.steps.clear();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn steps(&self) -> &[RevealStep] {
        &self.steps
    }

    pub fn step_for(&self, cell: usize) -> Option<&RevealStep> {
        self.steps.get(cell).filter(|s| s.cell == cell)
    }

    /// Steps that have started by `elapsed_ms`.
    pub fn started(&self, elapsed_ms: u32) -> impl Iterator<Item = &RevealStep> {
        self.steps.iter().filter(move |s| s.delay_ms <= elapsed_ms)
    }

    /// Time at which the last cell reaches its final state.
    pub fn finished_at(&self) -> u32 {
        self.steps
            .iter()
            .map(|s| s.delay_ms + s.duration_ms)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{layout, ChartConfig};
    use crate::heat::build_grid_between;
    use chrono::NaiveDate;

    fn chart(weeks: u64) -> Chart {
        let first = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let last = first + chrono::Days::new(weeks * 7 - 1);
        let grid = build_grid_between(first, last, |d| if d == first { 2 } else { 0 }).unwrap();
        layout(&grid, &ChartConfig::default())
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl TooltipSink for Recorder {
        fn show(&mut self, content: &str) {
            self.events.push(format!("show {content}"));
        }

        fn hide(&mut self) {
            self.events.push("hide".to_string());
        }
    }

    #[test]
    fn hit_testing_skips_gaps_and_margins() {
        let chart = chart(2);
        assert_eq!(chart.cell_at(36.0, 38.0).map(|c| c.count), Some(2));
        // 35 + 21 falls in the gap after the first column.
        assert!(chart.cell_at(56.5, 38.0).is_none());
        assert!(chart.cell_at(10.0, 38.0).is_none());
        assert!(chart.cell_at(36.0, 10.0).is_none());
        assert!(chart.cell_at(35.0 + 2.0 * 24.0 + 1.0, 38.0).is_none());
    }

    #[test]
    fn hover_emits_enter_and_leave() {
        let chart = chart(2);
        let mut tracker = HoverTracker::new();
        let mut sink = Recorder::default();

        tracker.pointer_move(&chart, 36.0, 38.0, &mut sink);
        tracker.pointer_move(&chart, 37.0, 39.0, &mut sink);
        tracker.pointer_move(&chart, 60.0, 38.0, &mut sink);
        tracker.pointer_leave(&mut sink);
        tracker.pointer_leave(&mut sink);

        assert_eq!(
            sink.events,
            vec![
                "show Jan 1, 2023: 2 commits",
                "hide",
                "show Jan 8, 2023: 0 commits",
                "hide",
            ]
        );
        assert!(tracker.hovered().is_none());
    }

    #[test]
    fn reveal_sweeps_from_the_right() {
        let chart = chart(3);
        let schedule = RevealSchedule::plan(&chart, None, false);

        let first = schedule.step_for(0).unwrap();
        let last_sunday = schedule.step_for(14).unwrap();
        assert_eq!(first.delay_ms, 2 * 8);
        assert_eq!(last_sunday.delay_ms, 0);
        assert_eq!(schedule.step_for(20).unwrap().delay_ms, 6 * 15);
        assert_eq!(schedule.finished_at(), 2 * 8 + 6 * 15 + 400);
    }

    #[test]
    fn off_screen_columns_are_instant() {
        let chart = chart(20);
        let viewport = Viewport {
            scroll_left: 35.0 + 10.0 * 24.0,
            client_width: 48.0,
        };
        let schedule = RevealSchedule::plan(&chart, Some(viewport), false);

        assert!(schedule.step_for(0).unwrap().is_instant());
        assert!(!schedule.step_for(10 * 7).unwrap().is_instant());
        assert!(schedule.step_for(19 * 7).unwrap().is_instant());
    }

    #[test]
    fn reduced_motion_is_instant() {
        let chart = chart(4);
        let schedule = RevealSchedule::plan(&chart, None, true);
        assert_eq!(schedule.steps().len(), chart.cells.len());
        assert!(schedule.steps().iter().all(RevealStep::is_instant));
        assert_eq!(schedule.finished_at(), 0);
    }

    #[test]
    fn cancelled_schedule_yields_nothing() {
        let chart = chart(2);
        let mut schedule = RevealSchedule::plan(&chart, None, false);
        assert!(schedule.started(1_000).count() > 0);

        schedule.cancel();
        assert!(schedule.is_cancelled());
        assert_eq!(schedule.started(1_000).count(), 0);
        assert!(schedule.step_for(0).is_none());
    }
}
