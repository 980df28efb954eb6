//! Categorical and continuous attribute processing.
//!
//! Categorical segment attributes expand into indicator columns named by the
//! attribute and level (`SPEEDLIMIT30`); continuous attributes get a
//! `log_` companion via `ln(x + 1)`; the `intersection` flag is derived from
//! the segment id prefix.

use crate::error::{FeatureError, Result};
use polars::prelude::*;

/// Dummy-encode one categorical column in place.
///
/// Returns the frame with one indicator column per distinct observed level
/// appended, plus the generated column names in level order. Levels are
/// ordered by the column's native sort so numeric categories keep numeric
/// order in the name list (the linear model later drops the first one).
pub fn dummy_encode(df: DataFrame, column: &str) -> Result<(DataFrame, Vec<String>)> {
    let series = df
        .column(column)
        .map_err(|_| FeatureError::MissingColumn(column.to_string()))?
        .as_materialized_series()
        .clone();

    let sorted = series.sort(SortOptions::default())?;
    let levels = sorted.unique_stable()?.cast(&DataType::String)?;
    let levels = levels.str()?;

    let mut names = Vec::new();
    let mut exprs: Vec<Expr> = Vec::new();
    for level in levels.into_iter().flatten() {
        let name = format!("{column}{level}");
        exprs.push(
            col(column)
                .cast(DataType::String)
                .eq(lit(level))
                .cast(DataType::Float64)
                .alias(name.as_str()),
        );
        names.push(name);
    }

    let out = df.lazy().with_columns(exprs).collect()?;
    Ok((out, names))
}

/// Append `log_<column> = ln(column + 1)` for each continuous column.
///
/// Returns the frame and the generated column names.
pub fn log_transform(df: DataFrame, columns: &[String]) -> Result<(DataFrame, Vec<String>)> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(FeatureError::MissingColumn(column.clone()));
        }
    }

    let mut names = Vec::new();
    let mut exprs: Vec<Expr> = Vec::new();
    for column in columns {
        let name = format!("log_{column}");
        exprs.push(
            col(column.as_str())
                .cast(DataType::Float64)
                .log1p()
                .alias(name.as_str()),
        );
        names.push(name);
    }

    let out = df.lazy().with_columns(exprs).collect()?;
    Ok((out, names))
}

/// Append the `intersection` flag: 1 unless the segment id starts with `00`.
///
/// Non-intersection (mid-block) segments are ingested with a `00` id prefix.
pub fn intersection_flag(df: DataFrame) -> Result<DataFrame> {
    if df.column("segment_id").is_err() {
        return Err(FeatureError::MissingColumn("segment_id".to_string()));
    }

    let out = df
        .lazy()
        .with_columns([col("segment_id")
            .str()
            .slice(lit(0), lit(2))
            .neq(lit("00"))
            .cast(DataType::Float64)
            .alias("intersection")])
        .collect()?;

    Ok(out)
}
