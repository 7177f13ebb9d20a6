pub mod aggregate;
pub mod grid;
pub mod intensity;

pub use aggregate::{aggregate, aggregate_in};
pub use grid::{build_grid, build_grid_between, build_grid_in, CalendarGrid, DayCell, MonthBoundary, Week, YearBoundary};
pub use intensity::{classify, IntensityScale};
