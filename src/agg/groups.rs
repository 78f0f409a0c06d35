//! Group Ranking Module
//! Most active perpetrator groups per year.

use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::data::transform::{UNKNOWN_LABEL, YEAR_COLUMN};
use crate::data::GROUP_COLUMN;

/// Ranking depth per year.
pub const RANKING_SIZE: usize = 10;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Per-year top groups by incident count, unattributed incidents excluded.
/// Built once at startup; the year dropdown only selects a ranking.
#[derive(Debug, Clone)]
pub struct GroupRankings {
    by_year: BTreeMap<i32, Vec<(String, u32)>>,
}

impl GroupRankings {
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, RankingError> {
        let grouped = df
            .clone()
            .lazy()
            .filter(col(GROUP_COLUMN).neq(lit(UNKNOWN_LABEL)))
            .group_by([col(YEAR_COLUMN), col(GROUP_COLUMN)])
            .agg([len().alias("count")])
            .collect()?;

        let year_col = grouped.column(YEAR_COLUMN)?.cast(&DataType::Int32)?;
        let years_ca = year_col.as_materialized_series().i32()?;
        let group_col = grouped.column(GROUP_COLUMN)?;
        let groups_ca = group_col.as_materialized_series().str()?;
        let count_col = grouped.column("count")?.cast(&DataType::UInt32)?;
        let counts_ca = count_col.as_materialized_series().u32()?;

        let mut by_year: BTreeMap<i32, Vec<(String, u32)>> = BTreeMap::new();
        for i in 0..grouped.height() {
            let (Some(year), Some(group), Some(count)) =
                (years_ca.get(i), groups_ca.get(i), counts_ca.get(i))
            else {
                continue;
            };
            by_year
                .entry(year)
                .or_default()
                .push((group.to_string(), count));
        }

        for ranking in by_year.values_mut() {
            // Descending by count, ties broken by name so output is stable.
            ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranking.truncate(RANKING_SIZE);
        }

        Ok(Self { by_year })
    }

    /// Years with at least one attributed incident, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.by_year.keys().next_back().copied()
    }

    pub fn top_for_year(&self, year: i32) -> &[(String, u32)] {
        self.by_year
            .get(&year)
            .map(|ranking| ranking.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample_rankings() -> GroupRankings {
        let df = df!(
            YEAR_COLUMN => [2019i64, 2019, 2019, 2019, 2020, 2020],
            GROUP_COLUMN => [
                "Taliban",
                "Taliban",
                UNKNOWN_LABEL,
                "Boko Haram",
                "Boko Haram",
                UNKNOWN_LABEL,
            ],
        )
        .unwrap();
        GroupRankings::from_dataframe(&df).unwrap()
    }

    #[test]
    fn test_rankings_exclude_unknown_and_sort_descending() {
        let rankings = sample_rankings();
        let top = rankings.top_for_year(2019);
        assert_eq!(
            top,
            &[("Taliban".to_string(), 2), ("Boko Haram".to_string(), 1)]
        );
    }

    #[test]
    fn test_ranking_is_capped() {
        let years: Vec<i64> = vec![2019; 15];
        let groups: Vec<String> = (0..15).map(|i| format!("Group {i:02}")).collect();
        let df = df!(YEAR_COLUMN => years, GROUP_COLUMN => groups).unwrap();

        let rankings = GroupRankings::from_dataframe(&df).unwrap();
        assert_eq!(rankings.top_for_year(2019).len(), RANKING_SIZE);
    }

    #[test]
    fn test_ties_break_by_name() {
        let df = df!(
            YEAR_COLUMN => [2019i64, 2019],
            GROUP_COLUMN => ["Zeta", "Alpha"],
        )
        .unwrap();
        let rankings = GroupRankings::from_dataframe(&df).unwrap();
        let top = rankings.top_for_year(2019);
        assert_eq!(top[0].0, "Alpha");
        assert_eq!(top[1].0, "Zeta");
    }

    #[test]
    fn test_years_and_latest() {
        let rankings = sample_rankings();
        assert_eq!(rankings.years(), vec![2019, 2020]);
        assert_eq!(rankings.latest_year(), Some(2020));
        assert!(rankings.top_for_year(1999).is_empty());
    }
}
