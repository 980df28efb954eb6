//! Segment/week crash dataset ingestion.
//!
//! The canonical input is one row per (segment, year, week) with a crash
//! count, a citizen concern count, and the static attributes of the segment
//! repeated on every row. Segment ids must stay strings: numeric-looking ids
//! lose their leading zeros otherwise, and the leading `00` prefix is what
//! distinguishes non-intersection segments.

use crate::error::{DataError, Result};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Column holding the segment identifier.
pub const SEGMENT_ID: &str = "segment_id";

/// Column holding the weekly crash count.
pub const CRASH: &str = "crash";

/// Verify that every named column exists in the frame.
pub fn require_columns(df: &DataFrame, columns: &[&str], source_name: &str) -> Result<()> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(DataError::MissingColumn {
                column: (*column).to_string(),
                source_name: source_name.to_string(),
            });
        }
    }
    Ok(())
}

/// Read the segment/week crash dataset from CSV (gzipped files are handled
/// transparently) and sort it by segment, year, and week.
///
/// `segment_id` is forced to a string dtype regardless of its appearance.
pub fn read_segment_dataset(path: &Path) -> Result<DataFrame> {
    let schema = Schema::from_iter([Field::new(SEGMENT_ID.into(), DataType::String)]);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(schema)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    require_columns(&df, &[SEGMENT_ID, "year", "week", CRASH], "segment dataset")?;

    let sorted = df
        .lazy()
        .sort([SEGMENT_ID, "year", "week"], Default::default())
        .collect()?;

    Ok(sorted)
}

/// Keep only rows belonging to segments with at least one crash over the
/// whole observation period.
pub fn filter_nonzero_segments(df: &DataFrame) -> Result<DataFrame> {
    let totals = df
        .clone()
        .lazy()
        .group_by([col(SEGMENT_ID)])
        .agg([col(CRASH).sum().alias("crash_total")]);

    let kept = df
        .clone()
        .lazy()
        .join(
            totals,
            [col(SEGMENT_ID)],
            [col(SEGMENT_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .filter(col("crash_total").gt(lit(0)))
        .drop(["crash_total"])
        .collect()?;

    if kept.height() == 0 {
        return Err(DataError::EmptyDataset(
            "no segments with a non-zero crash count".to_string(),
        ));
    }

    Ok(kept)
}

/// Collapse the repeated static attributes to one row per segment.
///
/// The max is taken per column; for attributes that are genuinely constant
/// within a segment this is the identity, and for the handful of segments
/// with conflicting rows it is a deterministic tie-break.
pub fn static_attributes(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    require_columns(df, &column_refs, "segment dataset")?;

    let aggs: Vec<Expr> = columns.iter().map(|c| col(c.as_str()).max()).collect();

    let segs = df
        .clone()
        .lazy()
        .group_by([col(SEGMENT_ID)])
        .agg(aggs)
        .sort([SEGMENT_ID], Default::default())
        .collect()?;

    Ok(segs)
}

/// Per-segment concern exposure: the max of the concern column over the base
/// year, one row per segment.
///
/// Concern reports only cover a single full year of the observation window,
/// so exposure is measured against that base year alone.
pub fn concern_exposure(df: &DataFrame, column: &str, base_year: i32) -> Result<DataFrame> {
    require_columns(df, &[column, "year"], "segment dataset")?;

    let observed = df
        .clone()
        .lazy()
        .filter(col("year").eq(lit(base_year)))
        .group_by([col(SEGMENT_ID)])
        .agg([col(column).max()])
        .sort([SEGMENT_ID], Default::default())
        .collect()?;

    Ok(observed)
}
