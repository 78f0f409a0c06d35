//! GUI module - User interface components

mod app;
mod groups_view;
mod scatter_view;
mod trends_view;

pub use app::{ExplorerApp, ViewerData};
pub use groups_view::GroupsView;
pub use scatter_view::ScatterView;
pub use trends_view::TrendsView;
