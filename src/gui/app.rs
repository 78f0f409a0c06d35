//! Explorer Application Shell
//! Window with view tabs, export actions, and the derived-data bundle.

use egui::Color32;
use polars::prelude::DataFrame;
use std::sync::Arc;

use crate::agg::{AttackTypeCounts, GroupRankings};
use crate::charts::{build_trend_series, StaticChartRenderer, TrendSeries};
use crate::data::{transform, IncidentTable};
use crate::gui::{GroupsView, ScatterView, TrendsView};

/// Everything the views need, derived once at startup and immutable for the
/// rest of the session.
pub struct ViewerData {
    pub incidents: Arc<IncidentTable>,
    pub categories: Vec<String>,
    pub attack_counts: AttackTypeCounts,
    pub trend_series: Vec<TrendSeries>,
    pub group_rankings: Option<GroupRankings>,
}

impl ViewerData {
    /// Run both chart pipelines over the loaded frame. They are independent,
    /// so they build in parallel.
    pub fn build(df: &DataFrame, has_group_column: bool) -> anyhow::Result<Self> {
        let (scatter, trends) = rayon::join(
            || -> anyhow::Result<(Arc<IncidentTable>, Vec<String>)> {
                let cleaned =
                    transform::fill_casualties(transform::normalize_target_types(df.clone())?)?;
                let table = IncidentTable::from_dataframe(&cleaned)?;
                let categories = table.target_types();
                Ok((Arc::new(table), categories))
            },
            || -> anyhow::Result<(AttackTypeCounts, Option<GroupRankings>)> {
                let kept = transform::drop_unknown_attacks(df.clone())?;
                let counts = AttackTypeCounts::from_dataframe(&kept)?;
                let rankings = if has_group_column {
                    Some(GroupRankings::from_dataframe(df)?)
                } else {
                    None
                };
                Ok((counts, rankings))
            },
        );

        let (incidents, categories) = scatter?;
        let (attack_counts, group_rankings) = trends?;
        let trend_series = build_trend_series(&attack_counts);

        log::info!(
            "derived tables ready: {} incidents, {} target types, {} attack types over {} years",
            incidents.len(),
            categories.len(),
            attack_counts.attack_types.len(),
            attack_counts.years.len()
        );

        Ok(Self {
            incidents,
            categories,
            attack_counts,
            trend_series,
            group_rankings,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Casualties,
    Trends,
    Groups,
}

/// Main application window.
pub struct ExplorerApp {
    scatter_view: ScatterView,
    trends_view: TrendsView,
    groups_view: Option<GroupsView>,
    attack_counts: AttackTypeCounts,
    active: Tab,
    status: String,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data: ViewerData) -> Self {
        let ViewerData {
            incidents,
            categories,
            attack_counts,
            trend_series,
            group_rankings,
        } = data;

        Self {
            scatter_view: ScatterView::new(incidents, categories),
            trends_view: TrendsView::new(trend_series),
            groups_view: group_rankings.map(GroupsView::new),
            attack_counts,
            active: Tab::Casualties,
            status: String::new(),
        }
    }

    /// Render the active view at export size and write it where the user
    /// chose, then reveal the file.
    fn handle_export_png(&mut self) {
        let default_name = match self.active {
            Tab::Casualties => "casualties_scatter.png",
            Tab::Trends => "attack_type_trends.png",
            Tab::Groups => return,
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(default_name)
            .save_file()
        else {
            return; // User cancelled
        };

        let rendered = match self.active {
            Tab::Casualties => StaticChartRenderer::render_scatter_to_bytes(
                self.scatter_view.visible(),
                self.scatter_view.categories(),
                self.scatter_view.selected_year(),
            ),
            Tab::Trends => StaticChartRenderer::render_trends_to_bytes(
                self.trends_view.series(),
                self.trends_view.mode(),
            ),
            Tab::Groups => return,
        };

        match rendered {
            Ok(bytes) => match std::fs::write(&path, bytes) {
                Ok(()) => {
                    self.status = format!("Exported {}", path.display());
                    if let Err(e) = open::that(&path) {
                        log::warn!("could not open exported chart: {e}");
                    }
                }
                Err(e) => self.status = format!("Export failed: {e}"),
            },
            Err(e) => self.status = format!("Export failed: {e}"),
        }
    }

    /// Write the aggregated count and percent tables as JSON.
    fn handle_export_json(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("attack_type_counts.json")
            .save_file()
        else {
            return;
        };

        let export = self.attack_counts.export();
        let result = std::fs::File::create(&path)
            .map_err(anyhow::Error::from)
            .and_then(|file| serde_json::to_writer_pretty(file, &export).map_err(anyhow::Error::from));

        self.status = match result {
            Ok(()) => format!("Exported {}", path.display()),
            Err(e) => format!("Export failed: {e}"),
        };
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("view_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.active, Tab::Casualties, "📈 Casualties");
                ui.selectable_value(&mut self.active, Tab::Trends, "📊 Attack Types");
                if self.groups_view.is_some() {
                    ui.selectable_value(&mut self.active, Tab::Groups, "👥 Top Groups");
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.active != Tab::Groups && ui.button("🖼 Export PNG").clicked() {
                        self.handle_export_png();
                    }
                    if self.active == Tab::Trends && ui.button("📄 Export JSON").clicked() {
                        self.handle_export_json();
                    }
                    if !self.status.is_empty() {
                        let color = if self.status.contains("failed") {
                            Color32::from_rgb(220, 53, 69)
                        } else {
                            Color32::GRAY
                        };
                        ui.label(egui::RichText::new(&self.status).size(11.0).color(color));
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.active {
            Tab::Casualties => self.scatter_view.show(ui),
            Tab::Trends => self.trends_view.show(ui),
            Tab::Groups => {
                if let Some(view) = &mut self.groups_view {
                    view.show(ui);
                }
            }
        });
    }
}
