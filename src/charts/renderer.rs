//! Static Chart Renderer
//! Renders the interactive views to PNG bytes for export. Charts are drawn
//! with plotters into an RGB buffer and encoded with `image`.

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

use super::plotter::{color_for, TrendSeries, ViewMode};
use crate::data::IncidentTable;

pub const EXPORT_WIDTH: u32 = 1400;
pub const EXPORT_HEIGHT: u32 = 900;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart rendering failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn rgb(color: egui::Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

/// Renders export images of the interactive charts.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the casualty scatter for one year's subset to PNG bytes.
    pub fn render_scatter_to_bytes(
        table: &IncidentTable,
        categories: &[String],
        year: i32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (EXPORT_WIDTH * EXPORT_HEIGHT * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (EXPORT_WIDTH, EXPORT_HEIGHT))
                .into_drawing_area();
            root.fill(&WHITE).map_err(|e| RenderError::Draw(e.to_string()))?;

            let x_max = table.killed.iter().cloned().fold(1.0, f64::max) * 1.05;
            let y_max = table.wounded.iter().cloned().fold(1.0, f64::max) * 1.05;

            let mut chart = ChartBuilder::on(&root)
                .caption(
                    format!("Target Types and Casualties Overview ({year})"),
                    ("sans-serif", 28),
                )
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(60)
                .build_cartesian_2d(0.0..x_max, 0.0..y_max)
                .map_err(|e| RenderError::Draw(e.to_string()))?;

            chart
                .configure_mesh()
                .x_desc("Number Killed")
                .y_desc("Number Wounded")
                .draw()
                .map_err(|e| RenderError::Draw(e.to_string()))?;

            for (idx, category) in categories.iter().enumerate() {
                let points: Vec<(f64, f64)> = (0..table.len())
                    .filter(|&i| table.target_type[i] == *category)
                    .map(|i| (table.killed[i], table.wounded[i]))
                    .collect();
                if points.is_empty() {
                    continue;
                }

                // Color by position in the load-time category list, so the
                // export matches the interactive view even for sparse years.
                let color = rgb(color_for(idx));
                chart
                    .draw_series(
                        points
                            .into_iter()
                            .map(|xy| Circle::new(xy, 4, color.mix(0.6).filled())),
                    )
                    .map_err(|e| RenderError::Draw(e.to_string()))?
                    .label(category.clone())
                    .legend(move |(x, y)| Circle::new((x + 8, y), 5, color.filled()));
            }

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .draw()
                .map_err(|e| RenderError::Draw(e.to_string()))?;

            root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        Self::encode_png(buffer)
    }

    /// Render the attack-type time chart in the given mode to PNG bytes.
    pub fn render_trends_to_bytes(
        series: &[TrendSeries],
        mode: ViewMode,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (EXPORT_WIDTH * EXPORT_HEIGHT * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (EXPORT_WIDTH, EXPORT_HEIGHT))
                .into_drawing_area();
            root.fill(&WHITE).map_err(|e| RenderError::Draw(e.to_string()))?;

            let years: Vec<f64> = series
                .first()
                .map(|s| s.counts.iter().map(|p| p[0]).collect())
                .unwrap_or_default();
            let x_min = years.first().copied().unwrap_or(0.0);
            let x_max = years.last().copied().unwrap_or(1.0).max(x_min + 1.0);

            let y_max = match mode {
                ViewMode::PercentStacked => 100.0,
                ViewMode::Stacked => series
                    .last()
                    .map(|s| {
                        s.stacked_band[..years.len()]
                            .iter()
                            .map(|p| p[1])
                            .fold(1.0, f64::max)
                    })
                    .unwrap_or(1.0),
                ViewMode::Grouped => series
                    .iter()
                    .flat_map(|s| s.counts.iter().map(|p| p[1]))
                    .fold(1.0, f64::max),
            } * 1.05;

            let y_label = match mode {
                ViewMode::PercentStacked => "Share of Incidents (%)",
                _ => "Incident Count",
            };

            let mut chart = ChartBuilder::on(&root)
                .caption("Evolution of Attack Types Over Time", ("sans-serif", 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(60)
                .build_cartesian_2d(x_min..x_max, 0.0..y_max)
                .map_err(|e| RenderError::Draw(e.to_string()))?;

            chart
                .configure_mesh()
                .x_desc("Year")
                .y_desc(y_label)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .draw()
                .map_err(|e| RenderError::Draw(e.to_string()))?;

            match mode {
                ViewMode::Stacked | ViewMode::PercentStacked => {
                    // Cumulative areas from the topmost band down; each lower
                    // cumulative curve paints over the one above, leaving the
                    // visible band for every series.
                    for s in series.iter().rev() {
                        let bandv = match mode {
                            ViewMode::PercentStacked => &s.percent_band,
                            _ => &s.stacked_band,
                        };
                        let upper: Vec<(f64, f64)> = bandv[..years.len()]
                            .iter()
                            .map(|p| (p[0], p[1]))
                            .collect();
                        let color = rgb(s.color);
                        chart
                            .draw_series(AreaSeries::new(upper, 0.0, color.mix(0.9)))
                            .map_err(|e| RenderError::Draw(e.to_string()))?
                            .label(s.name.clone())
                            .legend(move |(x, y)| {
                                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                            });
                    }
                }
                ViewMode::Grouped => {
                    for s in series {
                        let points: Vec<(f64, f64)> =
                            s.counts.iter().map(|p| (p[0], p[1])).collect();
                        let color = rgb(s.color);
                        chart
                            .draw_series(
                                AreaSeries::new(points, 0.0, color.mix(0.35))
                                    .border_style(color.stroke_width(2)),
                            )
                            .map_err(|e| RenderError::Draw(e.to_string()))?
                            .label(s.name.clone())
                            .legend(move |(x, y)| {
                                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                            });
                    }
                }
            }

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .draw()
                .map_err(|e| RenderError::Draw(e.to_string()))?;

            root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        Self::encode_png(buffer)
    }

    fn encode_png(buffer: Vec<u8>) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(EXPORT_WIDTH, EXPORT_HEIGHT, buffer)
            .ok_or_else(|| RenderError::Draw("render buffer size mismatch".to_string()))?;
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }
}
