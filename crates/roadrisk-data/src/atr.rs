//! Automated traffic recorder (ATR) counts.
//!
//! ATR stations provide observed speed and volume; segments without a
//! station carry values interpolated upstream, so the file covers the whole
//! network under `speed_coalesced` / `volume_coalesced` style columns.

use crate::error::Result;
use crate::segments::require_columns;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Join key column in the ATR file.
pub const ATR_ID: &str = "id";

/// Read ATR counts and return (`id`, requested columns).
///
/// Ids written out by float-typed tooling carry a decimal part
/// (`"1234.0"`); everything from the first `.` is dropped so the id joins
/// against `segment_id`.
pub fn read_atr(path: &Path, columns: &[String]) -> Result<DataFrame> {
    let schema = Schema::from_iter([Field::new(ATR_ID.into(), DataType::String)]);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(schema)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let mut required: Vec<&str> = vec![ATR_ID];
    required.extend(columns.iter().map(String::as_str));
    require_columns(&df, &required, "ATR data")?;

    let mut select: Vec<Expr> = vec![
        col(ATR_ID)
            .str()
            .replace(lit(r"\..*$"), lit(""), false)
            .alias(ATR_ID),
    ];
    select.extend(columns.iter().map(|c| col(c.as_str())));

    let out = df.lazy().select(select).collect()?;
    Ok(out)
}
