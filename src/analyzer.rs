//! analyzer.rs
//!
//! Core analysis logic: extract one numeric column from the fetched row set
//! and reduce it to the three-key insights summary (mode, median, mean).

use crate::errors::RelayError;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use tracing::error;

/// The summary computed from one table column. Serialises with exactly the
/// three keys the analysis API expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Insights {
    pub most_common: f64,
    pub median: f64,
    pub average: f64,
}

/// Build the column sample from `rows` at positional index `column` and
/// compute the insights. Any failure (out-of-range column, non-numeric
/// values, empty or multimodal sample) is returned to the caller, which
/// decides whether to continue with a neutral default.
pub fn analyze(rows: &[PgRow], column: usize) -> Result<Insights, RelayError> {
    let sample = rows
        .iter()
        .map(|row| numeric_value(row, column))
        .collect::<Result<Vec<f64>, RelayError>>()?;
    summarize(&sample)
}

/// Collapse a failed analysis into the empty mapping so the pipeline can
/// continue and still publish whatever was produced.
pub fn insights_or_empty(analysed: Result<Insights, RelayError>) -> Value {
    match analysed {
        Ok(insights) => {
            serde_json::to_value(insights).unwrap_or_else(|_| Value::Object(Map::new()))
        }
        Err(e) => {
            error!(error = %e, "Error analyzing data");
            Value::Object(Map::new())
        }
    }
}

/// Read the value at `idx` as a numeric, widening the common Postgres
/// numeric column types to f64.
fn numeric_value(row: &PgRow, idx: usize) -> Result<f64, RelayError> {
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<f32, _>(idx) {
        return Ok(f64::from(v));
    }
    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Ok(v as f64);
    }
    if let Ok(v) = row.try_get::<i32, _>(idx) {
        return Ok(f64::from(v));
    }
    if let Ok(v) = row.try_get::<i16, _>(idx) {
        return Ok(f64::from(v));
    }

    let ty = row
        .try_column(idx)
        .map(|c| c.type_info().name().to_string())
        .map_err(|_| RelayError::ColumnOutOfBounds {
            column: idx,
            width: row.len(),
        })?;
    Err(RelayError::NonNumeric { column: idx, ty })
}

/// Reduce a numeric sample to its insights.
pub fn summarize(sample: &[f64]) -> Result<Insights, RelayError> {
    if sample.is_empty() {
        return Err(RelayError::EmptySample);
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(Insights {
        most_common: mode(&sorted)?,
        median: median(&sorted),
        average: mean(sample),
    })
}

/// Strictly-unique mode over a sorted sample. A tie for the highest
/// frequency (including uniform samples, where every value ties at one
/// occurrence) has no defined answer and is reported as an error.
fn mode(sorted: &[f64]) -> Result<f64, RelayError> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &v in sorted {
        match runs.last_mut() {
            Some((val, count)) if v.total_cmp(val).is_eq() => *count += 1,
            _ => runs.push((v, 1)),
        }
    }

    let best = runs.iter().map(|&(_, count)| count).max().unwrap_or(0);
    let modes: Vec<f64> = runs
        .iter()
        .filter(|&&(_, count)| count == best)
        .map(|&(value, _)| value)
        .collect();

    match modes.as_slice() {
        [single] => Ok(*single),
        _ => Err(RelayError::AmbiguousMode {
            candidates: modes.len(),
        }),
    }
}

/// Middle value of a sorted sample; average of the two middle values for
/// even-length samples.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

fn mean(sample: &[f64]) -> f64 {
    sample.iter().sum::<f64>() / sample.len() as f64
}
