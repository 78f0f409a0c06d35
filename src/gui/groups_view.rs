//! Top Groups View
//! Year dropdown and the most active perpetrator groups as horizontal bars.

use egui::RichText;

use crate::agg::GroupRankings;
use crate::charts::ChartPlotter;

pub struct GroupsView {
    rankings: GroupRankings,
    selected_year: i32,
}

impl GroupsView {
    pub fn new(rankings: GroupRankings) -> Self {
        let selected_year = rankings.latest_year().unwrap_or(0);
        Self {
            rankings,
            selected_year,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(RichText::new("Most Active Groups").size(22.0).strong());
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Year:");
            egui::ComboBox::from_id_salt("ranking_year")
                .selected_text(self.selected_year.to_string())
                .show_ui(ui, |ui| {
                    for year in self.rankings.years() {
                        ui.selectable_value(&mut self.selected_year, year, year.to_string());
                    }
                });
        });
        ui.add_space(8.0);

        let ranking = self.rankings.top_for_year(self.selected_year);
        if ranking.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No attributed incidents this year").size(16.0));
            });
        } else {
            ChartPlotter::draw_group_bars(ui, ranking);
        }
    }
}
