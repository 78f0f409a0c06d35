//! Incident Transform Module
//! Row-level cleaning applied before any grouping or chart construction.

use polars::prelude::*;
use thiserror::Error;

pub const YEAR_COLUMN: &str = "iyear";
pub const TARGET_COLUMN: &str = "targtype1_txt";
pub const ATTACK_COLUMN: &str = "attacktype1_txt";
pub const KILLED_COLUMN: &str = "nkill";
pub const WOUNDED_COLUMN: &str = "nwound";
pub const TOTAL_COLUMN: &str = "total_casualties";

/// Label the two unattributed target categories collapse into.
pub const MERGED_TARGET_LABEL: &str = "Other/Unknown";
pub const UNKNOWN_LABEL: &str = "Unknown";
const OTHER_LABEL: &str = "Other";

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Collapse the "Unknown" and "Other" target categories into one label.
/// Must run before grouping and color assignment so both see the merged set;
/// every other value (nulls included) passes through unchanged.
pub fn normalize_target_types(df: DataFrame) -> Result<DataFrame, TransformError> {
    let merged = df
        .lazy()
        .with_column(
            when(
                col(TARGET_COLUMN)
                    .eq(lit(UNKNOWN_LABEL))
                    .or(col(TARGET_COLUMN).eq(lit(OTHER_LABEL))),
            )
            .then(lit(MERGED_TARGET_LABEL))
            .otherwise(col(TARGET_COLUMN))
            .alias(TARGET_COLUMN),
        )
        .collect()?;
    Ok(merged)
}

/// Zero-fill missing casualty counts, then derive the per-incident total.
/// Idempotent: a second application leaves the frame unchanged.
pub fn fill_casualties(df: DataFrame) -> Result<DataFrame, TransformError> {
    let filled = df
        .lazy()
        .with_columns([
            col(KILLED_COLUMN)
                .cast(DataType::Float64)
                .fill_null(lit(0.0)),
            col(WOUNDED_COLUMN)
                .cast(DataType::Float64)
                .fill_null(lit(0.0)),
        ])
        .with_column((col(KILLED_COLUMN) + col(WOUNDED_COLUMN)).alias(TOTAL_COLUMN))
        .collect()?;
    Ok(filled)
}

/// Drop rows with an unattributed attack type. A strict drop, unlike the
/// target-type merge above.
pub fn drop_unknown_attacks(df: DataFrame) -> Result<DataFrame, TransformError> {
    let kept = df
        .lazy()
        .filter(col(ATTACK_COLUMN).neq(lit(UNKNOWN_LABEL)))
        .collect()?;
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample() -> DataFrame {
        df!(
            YEAR_COLUMN => [2001i64, 2001, 2002],
            TARGET_COLUMN => ["Unknown", "Other", "Police"],
            ATTACK_COLUMN => ["Bombing/Explosion", "Unknown", "Armed Assault"],
            KILLED_COLUMN => [Some(1.0), Some(0.0), None],
            WOUNDED_COLUMN => [None, Some(2.0), Some(3.0)],
        )
        .unwrap()
    }

    fn str_values(df: &DataFrame, name: &str) -> Vec<String> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect()
    }

    fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn test_merges_unknown_and_other_targets() {
        let merged = normalize_target_types(sample()).unwrap();
        assert_eq!(
            str_values(&merged, TARGET_COLUMN),
            vec!["Other/Unknown", "Other/Unknown", "Police"]
        );
    }

    #[test]
    fn test_fill_zeroes_nulls_and_derives_total() {
        let filled = fill_casualties(sample()).unwrap();

        assert_eq!(filled.column(KILLED_COLUMN).unwrap().null_count(), 0);
        assert_eq!(filled.column(WOUNDED_COLUMN).unwrap().null_count(), 0);
        assert_eq!(f64_values(&filled, KILLED_COLUMN), vec![1.0, 0.0, 0.0]);
        assert_eq!(f64_values(&filled, WOUNDED_COLUMN), vec![0.0, 2.0, 3.0]);
        assert_eq!(f64_values(&filled, TOTAL_COLUMN), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fill_is_idempotent() {
        let once = fill_casualties(sample()).unwrap();
        let twice = fill_casualties(once.clone()).unwrap();
        assert!(once.equals(&twice));
    }

    #[test]
    fn test_total_always_matches_killed_plus_wounded() {
        let filled = fill_casualties(sample()).unwrap();
        let killed = f64_values(&filled, KILLED_COLUMN);
        let wounded = f64_values(&filled, WOUNDED_COLUMN);
        let total = f64_values(&filled, TOTAL_COLUMN);
        for i in 0..filled.height() {
            assert_eq!(total[i], killed[i] + wounded[i]);
        }
    }

    #[test]
    fn test_drops_unknown_attack_rows() {
        let kept = drop_unknown_attacks(sample()).unwrap();
        assert_eq!(kept.height(), 2);
        let attacks = str_values(&kept, ATTACK_COLUMN);
        assert!(!attacks.iter().any(|a| a == UNKNOWN_LABEL));
    }

    #[test]
    fn test_merge_then_fill_example() {
        // Two 2001 records with unattributed targets and a missing count.
        let df = df!(
            YEAR_COLUMN => [2001i64, 2001],
            TARGET_COLUMN => ["Unknown", "Other"],
            ATTACK_COLUMN => ["Bombing/Explosion", "Armed Assault"],
            KILLED_COLUMN => [Some(1.0), Some(0.0)],
            WOUNDED_COLUMN => [None, Some(2.0)],
        )
        .unwrap();

        let out = fill_casualties(normalize_target_types(df).unwrap()).unwrap();
        assert_eq!(
            str_values(&out, TARGET_COLUMN),
            vec!["Other/Unknown", "Other/Unknown"]
        );
        assert_eq!(f64_values(&out, TOTAL_COLUMN), vec![1.0, 2.0]);
    }
}
