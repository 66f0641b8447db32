//! Table Loader
//!
//! Reads the rental table from CSV or Parquet with polars and converts it into
//! `RentalRecord`s. Only `state` and `checkin_type` are required columns; the
//! numeric columns may be integer or float and may be missing entirely.

use crate::categorize::categorize;
use crate::error::{AnalysisError, Result};
use crate::model::{CheckinType, RentalRecord, RentalState};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

pub const RENTAL_ID: &str = "rental_id";
pub const CAR_ID: &str = "car_id";
pub const STATE: &str = "state";
pub const CHECKIN_TYPE: &str = "checkin_type";
pub const DELAY_AT_CHECKOUT: &str = "delay_at_checkout_in_minutes";
pub const TIME_DELTA_WITH_PREVIOUS: &str = "time_delta_with_previous_rental_in_minutes";
pub const DELAY_CATEGORY: &str = "delay_category";

/// Load a CSV or Parquet table, chosen by file extension
pub fn load_frame(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let lazy_df = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10_000))
            .finish()
            .map_err(|e| AnalysisError::Polars(format!("Failed to scan CSV {}: {}", path.display(), e)))?,
        "parquet" => LazyFrame::scan_parquet(path, ScanArgsParquet::default())
            .map_err(|e| AnalysisError::Polars(format!("Failed to scan Parquet {}: {}", path.display(), e)))?,
        _ => return Err(AnalysisError::UnsupportedFormat(path.display().to_string())),
    };

    let df = lazy_df
        .collect()
        .map_err(|e| AnalysisError::Polars(format!("Failed to collect {}: {}", path.display(), e)))?;

    info!("Loaded {} rows and {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(name)
        .map_err(|_| AnalysisError::MissingColumn(name.to_string()))?
        .cast(&DataType::String)?;
    let values = series.str()?.into_iter().map(|v| v.map(|s| s.trim().to_string())).collect();
    Ok(values)
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let series = match df.column(name) {
        Ok(series) => series.cast(&DataType::Int64)?,
        Err(_) => {
            debug!("Column '{}' not present, treating it as all-null", name);
            return Ok(vec![None; df.height()]);
        }
    };
    let values = series.i64()?.into_iter().collect();
    Ok(values)
}

/// Convert a loaded table into records, one per row
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<RentalRecord>> {
    let states = string_column(df, STATE)?;
    let checkin_types = string_column(df, CHECKIN_TYPE)?;
    let rental_ids = int_column(df, RENTAL_ID)?;
    let car_ids = int_column(df, CAR_ID)?;
    let delays = int_column(df, DELAY_AT_CHECKOUT)?;
    let gaps = int_column(df, TIME_DELTA_WITH_PREVIOUS)?;

    let mut missing_fields = 0usize;
    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if states[i].is_none() || checkin_types[i].is_none() {
            missing_fields += 1;
        }
        records.push(RentalRecord {
            rental_id: rental_ids[i],
            car_id: car_ids[i],
            state: RentalState::from(states[i].as_deref().unwrap_or("")),
            checkin_type: CheckinType::from(checkin_types[i].as_deref().unwrap_or("")),
            delay_at_checkout_in_minutes: delays[i],
            time_delta_with_previous_rental_in_minutes: gaps[i],
        });
    }

    if missing_fields > 0 {
        warn!(
            "{} rows have no state or checkin type; they are grouped under an empty value",
            missing_fields
        );
    }

    Ok(records)
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RentalRecord>> {
    let df = load_frame(path)?;
    records_from_frame(&df)
}

/// Records as a table, with the delay category appended as a string column
/// (empty for unclassified rows)
pub fn categorized_frame(records: &[RentalRecord]) -> Result<DataFrame> {
    let categories: Vec<Option<&str>> = categorize(records)
        .into_iter()
        .map(|c| c.map(|c| c.label()))
        .collect();

    let df = DataFrame::new(vec![
        Series::new(RENTAL_ID, records.iter().map(|r| r.rental_id).collect::<Vec<_>>()),
        Series::new(CAR_ID, records.iter().map(|r| r.car_id).collect::<Vec<_>>()),
        Series::new(STATE, records.iter().map(|r| r.state.as_str()).collect::<Vec<_>>()),
        Series::new(
            CHECKIN_TYPE,
            records.iter().map(|r| r.checkin_type.as_str()).collect::<Vec<_>>(),
        ),
        Series::new(
            DELAY_AT_CHECKOUT,
            records.iter().map(|r| r.delay_at_checkout_in_minutes).collect::<Vec<_>>(),
        ),
        Series::new(
            TIME_DELTA_WITH_PREVIOUS,
            records
                .iter()
                .map(|r| r.time_delta_with_previous_rental_in_minutes)
                .collect::<Vec<_>>(),
        ),
        Series::new(DELAY_CATEGORY, categories),
    ])?;

    Ok(df)
}

pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file).finish(df)?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
