//! Charts module - interactive plotting and static export rendering

mod plotter;
mod renderer;

pub use plotter::{build_trend_series, ChartPlotter, TrendSeries, ViewMode};
pub use renderer::StaticChartRenderer;
