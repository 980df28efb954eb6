//! Turning movement count (TMC) conflict summaries.
//!
//! TMC studies are point observations near a subset of segments; the summary
//! file is a JSON array of records keyed by `near_id`, the id of the nearest
//! segment. Coverage is sparse, so the merge against segments is a left join
//! with missing conflicts treated as zero by the caller.

use crate::error::Result;
use crate::segments::require_columns;
use polars::prelude::*;
use std::path::Path;

/// Join key column in the TMC summary.
pub const TMC_NEAR_ID: &str = "near_id";

/// Read the TMC conflict summary and return (`near_id`, requested columns).
///
/// `near_id` is cast to a string dtype so it joins against `segment_id`
/// whether the JSON encodes it as a number or a string.
pub fn read_tmc(path: &Path, columns: &[String]) -> Result<DataFrame> {
    let file = std::fs::File::open(path)?;
    let df = JsonReader::new(file)
        .with_json_format(JsonFormat::Json)
        .finish()?;

    let mut required: Vec<&str> = vec![TMC_NEAR_ID];
    required.extend(columns.iter().map(String::as_str));
    require_columns(&df, &required, "TMC data")?;

    let mut select: Vec<Expr> = vec![col(TMC_NEAR_ID).cast(DataType::String)];
    select.extend(columns.iter().map(|c| col(c.as_str())));

    let out = df.lazy().select(select).collect()?;
    Ok(out)
}
