//! Crash-lag construction.
//!
//! Aligns per-week crash counts to a prediction target `(week, year)` and
//! rolls them up into backward-looking windows per segment:
//!
//! - `target`: 1 if the segment had any crash in the target week
//! - `pre_week`: crash count in the week before the target
//! - `pre_month`: crashes over the five weeks before the target
//! - `pre_quarter`: crashes over the seventeen weeks before the target
//! - `avg_week`: mean weekly crash count from week 1 up to the target
//!
//! Weeks absent from the input contribute nothing to the windows.

use crate::error::{FeatureError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Lag feature column names, in output order.
pub const LAG_COLUMNS: [&str; 4] = ["pre_week", "pre_month", "pre_quarter", "avg_week"];

/// Binary target column name.
pub const TARGET: &str = "target";

/// A target week must leave this many weeks of same-year history behind it.
pub const MIN_HISTORY_WEEKS: i32 = 16;

/// Configuration for crash-lag construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrashLagConfig {
    /// Week of the year being predicted (1..=53)
    pub week: i32,
    /// Year being predicted
    pub year: i32,
}

impl CrashLagConfig {
    /// Create a validated target. The week must be late enough in the year
    /// that the quarter window is fully covered by same-year history.
    pub fn new(week: i32, year: i32) -> Result<Self> {
        if !(1..=53).contains(&week) {
            return Err(FeatureError::InvalidWeek(week));
        }
        if week <= MIN_HISTORY_WEEKS {
            return Err(FeatureError::TargetWeekTooEarly {
                week,
                min: MIN_HISTORY_WEEKS,
            });
        }
        Ok(Self { week, year })
    }
}

/// Build the crash-lag frame: one row per segment with the binary target and
/// the four lag features.
///
/// `df` must hold `segment_id`, `year`, `week`, and the crash count column.
pub fn crash_lags(df: &DataFrame, crash_column: &str, config: CrashLagConfig) -> Result<DataFrame> {
    for column in ["segment_id", "year", "week", crash_column] {
        if df.column(column).is_err() {
            return Err(FeatureError::MissingColumn(column.to_string()));
        }
    }

    let t = config.week;
    let crash = || col(crash_column).cast(DataType::Float64);
    let week_in = |lo: i32, hi: i32| col("week").gt_eq(lit(lo)).and(col("week").lt_eq(lit(hi)));

    let lags = df
        .clone()
        .lazy()
        .filter(
            col("year")
                .eq(lit(config.year))
                .and(week_in(1, t)),
        )
        .group_by([col("segment_id")])
        .agg([
            // Binarized target: any crash in the target week. A segment with
            // no row at the target week counts as crash-free.
            crash()
                .filter(col("week").eq(lit(t)))
                .sum()
                .gt(lit(0.0))
                .cast(DataType::Int32)
                .alias(TARGET),
            crash()
                .filter(col("week").eq(lit(t - 1)))
                .sum()
                .alias("pre_week"),
            crash()
                .filter(week_in(t - 5, t - 1))
                .sum()
                .alias("pre_month"),
            crash()
                .filter(week_in(t - 17, t - 1))
                .sum()
                .alias("pre_quarter"),
            crash()
                .filter(week_in(1, t - 1))
                .mean()
                .fill_null(lit(0.0))
                .alias("avg_week"),
        ])
        .sort(["segment_id"], Default::default())
        .collect()?;

    Ok(lags)
}
