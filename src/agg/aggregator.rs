//! Attack-Type Aggregator Module
//! Incident counts per (year, attack type) and the derived percent table.

use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::data::transform::{ATTACK_COLUMN, YEAR_COLUMN};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Incident counts per (year, attack type). The crossing of every observed
/// year with every observed attack type is materialized, absent combinations
/// as 0, so per-year sums are always defined.
#[derive(Debug, Clone)]
pub struct AttackTypeCounts {
    /// Observed years, ascending.
    pub years: Vec<i32>,
    /// Observed attack types, sorted.
    pub attack_types: Vec<String>,
    /// `counts[type_index][year_index]`, zero-filled.
    pub counts: Vec<Vec<u32>>,
}

impl AttackTypeCounts {
    /// Group the (already filtered) trends frame and materialize the grid.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, AggregateError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col(YEAR_COLUMN), col(ATTACK_COLUMN)])
            .agg([len().alias("count")])
            .collect()?;

        let year_col = grouped.column(YEAR_COLUMN)?.cast(&DataType::Int32)?;
        let years_ca = year_col.as_materialized_series().i32()?;
        let attack_col = grouped.column(ATTACK_COLUMN)?;
        let attacks_ca = attack_col.as_materialized_series().str()?;
        let count_col = grouped.column("count")?.cast(&DataType::UInt32)?;
        let counts_ca = count_col.as_materialized_series().u32()?;

        let mut cells: Vec<(i32, String, u32)> = Vec::with_capacity(grouped.height());
        for i in 0..grouped.height() {
            let (Some(year), Some(attack), Some(count)) =
                (years_ca.get(i), attacks_ca.get(i), counts_ca.get(i))
            else {
                continue;
            };
            cells.push((year, attack.to_string(), count));
        }

        let mut years: Vec<i32> = cells.iter().map(|(y, _, _)| *y).collect();
        years.sort_unstable();
        years.dedup();
        let mut attack_types: Vec<String> = cells.iter().map(|(_, a, _)| a.clone()).collect();
        attack_types.sort();
        attack_types.dedup();

        let year_index: HashMap<i32, usize> =
            years.iter().enumerate().map(|(i, &y)| (y, i)).collect();
        let type_index: HashMap<&str, usize> = attack_types
            .iter()
            .enumerate()
            .map(|(i, a)| (a.as_str(), i))
            .collect();

        let mut counts = vec![vec![0u32; years.len()]; attack_types.len()];
        for (year, attack, count) in &cells {
            counts[type_index[attack.as_str()]][year_index[year]] = *count;
        }

        Ok(Self {
            years,
            attack_types,
            counts,
        })
    }

    /// Total incidents per year across all attack types.
    pub fn year_totals(&self) -> Vec<u32> {
        let mut totals = vec![0u32; self.years.len()];
        for series in &self.counts {
            for (total, count) in totals.iter_mut().zip(series) {
                *total += count;
            }
        }
        totals
    }

    /// Per-year percentage of each attack type. A year with no incidents at
    /// all emits 0 for every attack type instead of a divide-by-zero NaN.
    pub fn to_percentages(&self) -> Vec<Vec<f64>> {
        let totals = self.year_totals();
        if totals.contains(&0) {
            log::warn!("percent view: year(s) with zero incidents emit 0 for every attack type");
        }
        self.counts
            .iter()
            .map(|series| {
                series
                    .iter()
                    .zip(&totals)
                    .map(|(&count, &total)| {
                        if total == 0 {
                            0.0
                        } else {
                            count as f64 / total as f64 * 100.0
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Serializable form of both derived tables, for the JSON export.
    pub fn export(&self) -> AggregateExport {
        AggregateExport {
            years: self.years.clone(),
            attack_types: self.attack_types.clone(),
            counts: self.counts.clone(),
            percentages: self.to_percentages(),
        }
    }
}

/// Aggregate tables as written by the JSON export. Rows are attack types,
/// columns align with `years`.
#[derive(Debug, Serialize)]
pub struct AggregateExport {
    pub years: Vec<i32>,
    pub attack_types: Vec<String>,
    pub counts: Vec<Vec<u32>>,
    pub percentages: Vec<Vec<f64>>,
}
