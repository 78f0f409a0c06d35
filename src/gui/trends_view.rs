//! Attack-Type Trends View
//! Mode dropdown above a stacked / percent / grouped time chart.

use egui::RichText;

use crate::charts::{ChartPlotter, TrendSeries, ViewMode};

pub struct TrendsView {
    /// Pre-built superset of every mode's series.
    series: Vec<TrendSeries>,
    mode: ViewMode,
}

impl TrendsView {
    pub fn new(series: Vec<TrendSeries>) -> Self {
        Self {
            series,
            mode: ViewMode::default(),
        }
    }

    pub fn series(&self) -> &[TrendSeries] {
        &self.series
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Evolution of Attack Types Over Time")
                    .size(22.0)
                    .strong(),
            );
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("View:");
            egui::ComboBox::from_id_salt("trend_view_mode")
                .selected_text(self.mode.label())
                .show_ui(ui, |ui| {
                    for mode in ViewMode::ALL {
                        ui.selectable_value(&mut self.mode, mode, mode.label());
                    }
                });
        });
        ui.add_space(8.0);

        ChartPlotter::draw_trends_chart(ui, &self.series, self.mode);
    }
}
