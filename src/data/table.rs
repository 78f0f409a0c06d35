//! Incident Snapshot Module
//! Column-aligned in-memory table backing the casualties scatter view.

use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::data::transform::{
    KILLED_COLUMN, TARGET_COLUMN, TOTAL_COLUMN, WOUNDED_COLUMN, YEAR_COLUMN,
};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Immutable snapshot of the transformed dataset, one vector per chart field,
/// all index-aligned. Years are kept as text so the slider filter is an exact
/// string match.
#[derive(Debug, Clone, Default)]
pub struct IncidentTable {
    pub year: Vec<String>,
    pub target_type: Vec<String>,
    pub killed: Vec<f64>,
    pub wounded: Vec<f64>,
    pub total_casualties: Vec<f64>,
}

impl IncidentTable {
    /// Extract the chart columns from a transformed frame. Rows whose year or
    /// target could not be parsed carry nothing the chart can place, so they
    /// are skipped as a unit to keep the columns aligned.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, TableError> {
        let year_col = df.column(YEAR_COLUMN)?.cast(&DataType::String)?;
        let years = year_col.as_materialized_series().str()?;
        let target_col = df.column(TARGET_COLUMN)?;
        let targets = target_col.as_materialized_series().str()?;
        let killed = df.column(KILLED_COLUMN)?.as_materialized_series().f64()?;
        let wounded = df.column(WOUNDED_COLUMN)?.as_materialized_series().f64()?;
        let totals = df.column(TOTAL_COLUMN)?.as_materialized_series().f64()?;

        let mut table = IncidentTable::default();
        for i in 0..df.height() {
            let (Some(year), Some(target)) = (years.get(i), targets.get(i)) else {
                continue;
            };
            table.year.push(year.to_string());
            table.target_type.push(target.to_string());
            table.killed.push(killed.get(i).unwrap_or(0.0));
            table.wounded.push(wounded.get(i).unwrap_or(0.0));
            table.total_casualties.push(totals.get(i).unwrap_or(0.0));
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_empty()
    }

    /// Visible subset for one year: every column re-sliced together from the
    /// full snapshot, never from a previously filtered subset. A year with no
    /// matching records yields an empty table.
    pub fn filter_by_year(&self, year: &str) -> IncidentTable {
        let mut out = IncidentTable::default();
        for i in 0..self.len() {
            if self.year[i] == year {
                out.year.push(self.year[i].clone());
                out.target_type.push(self.target_type[i].clone());
                out.killed.push(self.killed[i]);
                out.wounded.push(self.wounded[i]);
                out.total_casualties.push(self.total_casualties[i]);
            }
        }
        out
    }

    /// Inclusive slider bounds parsed from the year texts.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut bounds: Option<(i32, i32)> = None;
        for year in &self.year {
            let Ok(value) = year.parse::<i32>() else {
                continue;
            };
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
                None => (value, value),
            });
        }
        bounds
    }

    /// Sorted unique target types, fixed at load time so series colors never
    /// change when the year filter does.
    pub fn target_types(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.target_type.iter().collect();
        set.into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::transform::{fill_casualties, normalize_target_types};
    use polars::df;

    fn sample_table() -> IncidentTable {
        let df = df!(
            YEAR_COLUMN => [2001i64, 2001, 2003],
            TARGET_COLUMN => ["Unknown", "Police", "Other"],
            "attacktype1_txt" => ["Bombing/Explosion", "Armed Assault", "Assassination"],
            KILLED_COLUMN => [Some(1.0), None, Some(4.0)],
            WOUNDED_COLUMN => [None, Some(2.0), Some(1.0)],
        )
        .unwrap();
        let cleaned = fill_casualties(normalize_target_types(df).unwrap()).unwrap();
        IncidentTable::from_dataframe(&cleaned).unwrap()
    }

    #[test]
    fn test_columns_stay_aligned() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.year.len(), table.target_type.len());
        assert_eq!(table.year.len(), table.killed.len());
        assert_eq!(table.year.len(), table.wounded.len());
        assert_eq!(table.year.len(), table.total_casualties.len());
        assert_eq!(table.year[0], "2001");
        assert_eq!(table.total_casualties, vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_filter_by_year_exact_subset() {
        let table = sample_table();
        let visible = table.filter_by_year("2001");

        assert_eq!(visible.len(), 2);
        assert!(visible.year.iter().all(|y| y == "2001"));
        // Index alignment survives the re-slice.
        assert_eq!(visible.target_type, vec!["Other/Unknown", "Police"]);
        assert_eq!(visible.killed, vec![1.0, 0.0]);
        assert_eq!(visible.wounded, vec![0.0, 2.0]);
        assert_eq!(visible.total_casualties, vec![1.0, 2.0]);
    }

    #[test]
    fn test_filter_by_gap_year_is_empty_not_error() {
        let table = sample_table();
        // 2002 lies between the bounds but has no records.
        let visible = table.filter_by_year("2002");
        assert!(visible.is_empty());
    }

    #[test]
    fn test_year_bounds() {
        let table = sample_table();
        assert_eq!(table.year_bounds(), Some((2001, 2003)));
        assert_eq!(IncidentTable::default().year_bounds(), None);
    }

    #[test]
    fn test_target_types_fixed_and_sorted() {
        let table = sample_table();
        assert_eq!(
            table.target_types(),
            vec!["Other/Unknown".to_string(), "Police".to_string()]
        );
        // The category set comes from the full snapshot, not a filtered view.
        let visible = table.filter_by_year("2003");
        assert_eq!(visible.target_types(), vec!["Other/Unknown".to_string()]);
        assert_eq!(table.target_types().len(), 2);
    }
}
