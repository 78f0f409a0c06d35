//! Casualties Scatter View
//! Heading, year slider, and the killed-vs-wounded scatter chart.

use egui::RichText;
use std::sync::Arc;

use crate::charts::ChartPlotter;
use crate::data::IncidentTable;

pub struct ScatterView {
    /// Full immutable snapshot; every filter re-slices from here.
    table: Arc<IncidentTable>,
    /// Load-time category list driving color assignment.
    categories: Vec<String>,
    min_year: i32,
    max_year: i32,
    selected_year: i32,
    /// Cached subset for `selected_year`.
    visible: IncidentTable,
}

impl ScatterView {
    pub fn new(table: Arc<IncidentTable>, categories: Vec<String>) -> Self {
        let (min_year, max_year) = table.year_bounds().unwrap_or((0, 0));
        let visible = table.filter_by_year(&min_year.to_string());
        Self {
            table,
            categories,
            min_year,
            max_year,
            selected_year: min_year,
            visible,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn visible(&self) -> &IncidentTable {
        &self.visible
    }

    pub fn selected_year(&self) -> i32 {
        self.selected_year
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Target Types and Casualties Overview")
                    .size(22.0)
                    .strong(),
            );
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Year:");
            let slider = egui::Slider::new(&mut self.selected_year, self.min_year..=self.max_year);
            if ui.add(slider).changed() {
                // Always refilter from the full snapshot, never from the
                // currently displayed subset.
                self.visible = self.table.filter_by_year(&self.selected_year.to_string());
            }
            ui.label(format!("{} incidents", self.visible.len()));
        });
        ui.add_space(8.0);

        ChartPlotter::draw_casualty_scatter(ui, &self.visible, &self.categories);
    }
}
