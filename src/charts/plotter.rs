//! Chart Plotter Module
//! Creates the interactive visualizations using egui_plot.

use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::agg::AttackTypeCounts;
use crate::data::IncidentTable;

/// Category20 color cycle for series assignment.
pub const PALETTE: [Color32; 20] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xae, 0xc7, 0xe8),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0xff, 0xbb, 0x78),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0x98, 0xdf, 0x8a),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0xff, 0x98, 0x96),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0xc5, 0xb0, 0xd5),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xc4, 0x9c, 0x94),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0xf7, 0xb6, 0xd2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xc7, 0xc7, 0xc7),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0xdb, 0xdb, 0x8d),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
    Color32::from_rgb(0x9e, 0xda, 0xe5),
];

/// Color for the series at `index` in the load-time category order.
pub fn color_for(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// Point radius tiers by total casualties.
const SIZE_TIERS: [(f64, f32); 4] = [(0.0, 2.5), (5.0, 4.0), (25.0, 6.0), (100.0, 9.0)];

fn tier_for(total: f64) -> usize {
    SIZE_TIERS
        .iter()
        .rposition(|(min, _)| total >= *min)
        .unwrap_or(0)
}

/// Display modes for the attack-type time chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Stacked,
    PercentStacked,
    Grouped,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [
        ViewMode::Stacked,
        ViewMode::PercentStacked,
        ViewMode::Grouped,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Stacked => "Stacked",
            ViewMode::PercentStacked => "100% Stacked",
            ViewMode::Grouped => "Grouped",
        }
    }
}

/// Pre-built geometry for one attack type across every display mode. All
/// variants are constructed up front; switching modes only selects which
/// variant gets drawn.
#[derive(Debug, Clone)]
pub struct TrendSeries {
    pub name: String,
    pub color: Color32,
    /// Raw counts, one point per year.
    pub counts: Vec<[f64; 2]>,
    /// Band between this series' cumulative count and the one below it.
    pub stacked_band: Vec<[f64; 2]>,
    /// The same band over per-year percentages.
    pub percent_band: Vec<[f64; 2]>,
}

/// Build the full series superset for the time chart.
pub fn build_trend_series(counts: &AttackTypeCounts) -> Vec<TrendSeries> {
    let percents = counts.to_percentages();
    let years: Vec<f64> = counts.years.iter().map(|&y| y as f64).collect();

    let mut count_base = vec![0.0; years.len()];
    let mut percent_base = vec![0.0; years.len()];
    let mut series = Vec::with_capacity(counts.attack_types.len());

    for (idx, name) in counts.attack_types.iter().enumerate() {
        let raw: Vec<f64> = counts.counts[idx].iter().map(|&c| c as f64).collect();
        let pct = &percents[idx];

        let count_top: Vec<f64> = count_base.iter().zip(&raw).map(|(b, v)| b + v).collect();
        let percent_top: Vec<f64> = percent_base.iter().zip(pct).map(|(b, v)| b + v).collect();

        series.push(TrendSeries {
            name: name.clone(),
            color: color_for(idx),
            counts: years.iter().zip(&raw).map(|(&x, &y)| [x, y]).collect(),
            stacked_band: band(&years, &count_base, &count_top),
            percent_band: band(&years, &percent_base, &percent_top),
        });

        count_base = count_top;
        percent_base = percent_top;
    }
    series
}

/// Closed polygon tracing the upper boundary left to right, then the lower
/// boundary back. The first `years.len()` points are the upper boundary.
fn band(years: &[f64], lower: &[f64], upper: &[f64]) -> Vec<[f64; 2]> {
    let mut points: Vec<[f64; 2]> = years.iter().zip(upper).map(|(&x, &y)| [x, y]).collect();
    for (&x, &y) in years.iter().zip(lower).rev() {
        points.push([x, y]);
    }
    points
}

/// Creates the interactive charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the killed-vs-wounded scatter for the visible year subset.
    /// `categories` is the load-time category list so colors stay stable
    /// across filter changes. Hovering a point shows the incident fields.
    pub fn draw_casualty_scatter(ui: &mut egui::Ui, table: &IncidentTable, categories: &[String]) {
        let response = Plot::new("casualty_scatter")
            .height(ui.available_height())
            .legend(Legend::default())
            .x_axis_label("Number Killed")
            .y_axis_label("Number Wounded")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (idx, category) in categories.iter().enumerate() {
                    let color = color_for(idx);

                    let mut tiers: Vec<Vec<[f64; 2]>> = vec![Vec::new(); SIZE_TIERS.len()];
                    for i in 0..table.len() {
                        if table.target_type[i] != *category {
                            continue;
                        }
                        tiers[tier_for(table.total_casualties[i])]
                            .push([table.killed[i], table.wounded[i]]);
                    }

                    for (tier, points) in tiers.into_iter().enumerate() {
                        if points.is_empty() {
                            continue;
                        }
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .radius(SIZE_TIERS[tier].1)
                                .color(color.gamma_multiply(0.8))
                                .name(category),
                        );
                    }
                }

                Self::hovered_incident(plot_ui, table)
            });

        if let Some(i) = response.inner {
            let _ = egui::show_tooltip_at_pointer(
                ui.ctx(),
                response.response.layer_id,
                egui::Id::new("incident_tooltip"),
                |ui| {
                    ui.label(format!("Target: {}", table.target_type[i]));
                    ui.label(format!("Killed: {}", table.killed[i]));
                    ui.label(format!("Wounded: {}", table.wounded[i]));
                    ui.label(format!("Total Casualties: {}", table.total_casualties[i]));
                    ui.label(format!("Year: {}", table.year[i]));
                },
            );
        }
    }

    /// Nearest visible incident to the pointer, measured as a fraction of the
    /// current plot bounds so the hit radius tracks zoom level.
    fn hovered_incident(plot_ui: &egui_plot::PlotUi, table: &IncidentTable) -> Option<usize> {
        let pointer = plot_ui.pointer_coordinate()?;
        let bounds = plot_ui.plot_bounds();
        let (width, height) = (bounds.width(), bounds.height());
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        let mut best: Option<(usize, f64)> = None;
        for i in 0..table.len() {
            let dx = (table.killed[i] - pointer.x) / width;
            let dy = (table.wounded[i] - pointer.y) / height;
            let dist = dx * dx + dy * dy;
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        // Within ~2% of the plot diagonal.
        best.filter(|&(_, d)| d < 4e-4).map(|(i, _)| i)
    }

    /// Draw the attack-type time chart in the given mode. The series data is
    /// pre-built; the mode only decides which variant is visible.
    pub fn draw_trends_chart(ui: &mut egui::Ui, series: &[TrendSeries], mode: ViewMode) {
        let y_label = match mode {
            ViewMode::PercentStacked => "Share of Incidents (%)",
            _ => "Incident Count",
        };

        Plot::new("attack_trends")
            .height(ui.available_height())
            .legend(Legend::default())
            .x_axis_label("Year")
            .y_axis_label(y_label)
            .allow_scroll(false)
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() == 0.0 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| match mode {
                ViewMode::Stacked => {
                    for s in series {
                        Self::band_polygon(plot_ui, &s.stacked_band, s);
                    }
                }
                ViewMode::PercentStacked => {
                    for s in series {
                        Self::band_polygon(plot_ui, &s.percent_band, s);
                    }
                }
                ViewMode::Grouped => {
                    for s in series {
                        plot_ui.line(
                            Line::new(PlotPoints::from(s.counts.clone()))
                                .color(s.color)
                                .width(2.0)
                                .fill(0.0)
                                .name(&s.name),
                        );
                    }
                }
            });
    }

    fn band_polygon(plot_ui: &mut egui_plot::PlotUi, band: &[[f64; 2]], series: &TrendSeries) {
        plot_ui.polygon(
            Polygon::new(PlotPoints::from(band.to_vec()))
                .fill_color(series.color.gamma_multiply(0.6))
                .stroke(egui::Stroke::new(1.0, series.color))
                .name(&series.name),
        );
    }

    /// Horizontal top-groups bar chart for one year, most active on top.
    pub fn draw_group_bars(ui: &mut egui::Ui, ranking: &[(String, u32)]) {
        let mut labels: Vec<String> = ranking.iter().map(|(name, _)| name.clone()).collect();
        labels.reverse();

        let bars: Vec<Bar> = ranking
            .iter()
            .enumerate()
            .map(|(i, (name, count))| {
                Bar::new((ranking.len() - 1 - i) as f64, *count as f64)
                    .width(0.6)
                    .fill(color_for(i))
                    .name(format!("{name}: {count}"))
            })
            .collect();

        Plot::new("group_ranking")
            .height(ui.available_height())
            .x_axis_label("Incidents")
            .allow_scroll(false)
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 0.05 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_counts() -> AttackTypeCounts {
        AttackTypeCounts {
            years: vec![2001, 2002, 2003],
            attack_types: vec!["Armed Assault".into(), "Bombing/Explosion".into()],
            counts: vec![vec![1, 1, 0], vec![3, 0, 1]],
        }
    }

    #[test]
    fn test_all_variants_built_up_front() {
        let series = build_trend_series(&sample_counts());
        assert_eq!(series.len(), 2);
        for s in &series {
            assert_eq!(s.counts.len(), 3);
            assert_eq!(s.stacked_band.len(), 6);
            assert_eq!(s.percent_band.len(), 6);
        }
    }

    #[test]
    fn test_grouped_variant_equals_raw_counts() {
        let counts = sample_counts();
        let series = build_trend_series(&counts);
        assert_eq!(series[0].counts, vec![[2001.0, 1.0], [2002.0, 1.0], [2003.0, 0.0]]);
        assert_eq!(series[1].counts, vec![[2001.0, 3.0], [2002.0, 0.0], [2003.0, 1.0]]);
    }

    #[test]
    fn test_stacked_bands_accumulate() {
        let counts = sample_counts();
        let series = build_trend_series(&counts);

        // Upper boundary of the last series is the per-year total.
        let totals: Vec<f64> = counts.year_totals().iter().map(|&t| t as f64).collect();
        let top: Vec<f64> = series[1].stacked_band[..3].iter().map(|p| p[1]).collect();
        assert_eq!(top, totals);

        // The second band's lower boundary is the first band's upper one.
        let first_upper: Vec<[f64; 2]> = series[0].stacked_band[..3].to_vec();
        let mut second_lower: Vec<[f64; 2]> = series[1].stacked_band[3..].to_vec();
        second_lower.reverse();
        assert_eq!(first_upper, second_lower);
    }

    #[test]
    fn test_percent_bands_top_out_at_hundred() {
        let series = build_trend_series(&sample_counts());
        for point in &series.last().unwrap().percent_band[..3] {
            assert!((point[1] - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_series_colors_follow_category_order() {
        let series = build_trend_series(&sample_counts());
        assert_eq!(series[0].color, color_for(0));
        assert_eq!(series[1].color, color_for(1));
        assert_ne!(series[0].color, series[1].color);
        // The cycle wraps rather than running out.
        assert_eq!(color_for(PALETTE.len()), color_for(0));
    }

    #[test]
    fn test_default_view_mode_is_stacked() {
        assert_eq!(ViewMode::default(), ViewMode::Stacked);
        assert_eq!(ViewMode::ALL.len(), 3);
        assert_eq!(ViewMode::PercentStacked.label(), "100% Stacked");
    }

    #[test]
    fn test_casualty_size_tiers() {
        assert_eq!(tier_for(0.0), 0);
        assert_eq!(tier_for(4.9), 0);
        assert_eq!(tier_for(5.0), 1);
        assert_eq!(tier_for(30.0), 2);
        assert_eq!(tier_for(1000.0), 3);
    }
}
