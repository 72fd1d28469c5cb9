use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Feature, FeatureBatch, FeatureRecord};
use crate::error::InputError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an uploaded feature table.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming the four feature columns
/// * `.json`    – `[{ "SepalLengthCm": 5.1, ... }, ...]`
/// * `.parquet` – one numeric column per feature
///
/// Columns are matched by name, so their order does not matter; any other
/// column is ignored.  Row numbers in errors count data rows from 1.
pub fn load_file(path: &Path) -> Result<FeatureBatch, InputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let batch = match ext.as_str() {
        "csv" => {
            let file = open(path)?;
            read_csv(file)?
        }
        "json" => {
            let file = open(path)?;
            read_json(file)?
        }
        "parquet" | "pq" => read_parquet(open(path)?)?,
        other => return Err(InputError::UnsupportedExtension(other.to_string())),
    };

    log::info!("Loaded {} rows from {}", batch.len(), path.display());
    Ok(batch)
}

fn open(path: &Path) -> Result<std::fs::File, InputError> {
    std::fs::File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(records: Vec<FeatureRecord>) -> Result<FeatureBatch, InputError> {
    if records.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(FeatureBatch::new(records))
}

fn warn_ignored<'a>(columns: impl Iterator<Item = &'a str>) {
    let ignored: BTreeSet<&str> = columns
        .filter(|c| Feature::from_column(c).is_none())
        .collect();
    if !ignored.is_empty() {
        log::warn!("Ignoring columns not used by the model: {ignored:?}");
    }
}

fn finite(value: f64, row: usize, feature: Feature, raw: &str) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::InvalidValue {
            row,
            column: feature.column(),
            value: raw.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: a header row with column names, one sample per data row.
pub fn read_csv<R: Read>(source: R) -> Result<FeatureBatch, InputError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut indices = [0usize; 4];
    for (slot, feature) in indices.iter_mut().zip(Feature::ALL) {
        *slot = headers
            .iter()
            .position(|h| h == feature.column())
            .ok_or(InputError::MissingColumn(feature.column()))?;
    }
    warn_ignored(headers.iter().map(String::as_str));

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let raw = result?;
        let mut record = FeatureRecord::new(0.0, 0.0, 0.0, 0.0);
        for (&idx, feature) in indices.iter().zip(Feature::ALL) {
            let cell = raw.get(idx).unwrap_or("");
            let invalid = || InputError::InvalidValue {
                row,
                column: feature.column(),
                value: cell.to_string(),
            };
            let value = cell.parse::<f64>().map_err(|_| invalid())?;
            record.set(feature, finite(value, row, feature, cell)?);
        }
        records.push(record);
    }

    non_empty(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "SepalLengthCm": 5.1, "SepalWidthCm": 3.5, "PetalLengthCm": 1.4, "PetalWidthCm": 0.2 },
///   ...
/// ]
/// ```
pub fn read_json<R: Read>(source: R) -> Result<FeatureBatch, InputError> {
    let root: JsonValue = serde_json::from_reader(source)?;
    let rows = root.as_array().ok_or_else(|| InputError::MalformedRow {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    let mut records = Vec::with_capacity(rows.len());
    let mut seen_columns: BTreeSet<&str> = BTreeSet::new();

    for (i, rec) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = rec.as_object().ok_or_else(|| InputError::MalformedRow {
            row,
            message: "not a JSON object".to_string(),
        })?;
        seen_columns.extend(obj.keys().map(String::as_str));

        let mut record = FeatureRecord::new(0.0, 0.0, 0.0, 0.0);
        for feature in Feature::ALL {
            let cell = obj.get(feature.column()).ok_or(InputError::MissingField {
                row,
                column: feature.column(),
            })?;
            let value = cell.as_f64().ok_or_else(|| InputError::InvalidValue {
                row,
                column: feature.column(),
                value: cell.to_string(),
            })?;
            record.set(feature, value);
        }
        records.push(record);
    }
    warn_ignored(seen_columns.into_iter());

    non_empty(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one numeric column per feature.
///
/// Float64, Float32, Int32 and Int64 columns are accepted, which covers
/// files written by both **Pandas** and **Polars**.  Nulls are rejected.
fn read_parquet(file: std::fs::File) -> Result<FeatureBatch, InputError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    for feature in Feature::ALL {
        if builder.schema().index_of(feature.column()).is_err() {
            return Err(InputError::MissingColumn(feature.column()));
        }
    }
    warn_ignored(builder.schema().fields().iter().map(|f| f.name().as_str()));
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut columns: Vec<(Feature, &ArrayRef)> = Vec::with_capacity(4);
        for feature in Feature::ALL {
            let idx = schema
                .index_of(feature.column())
                .map_err(|_| InputError::MissingColumn(feature.column()))?;
            columns.push((feature, batch.column(idx)));
        }

        let offset = records.len();
        for r in 0..batch.num_rows() {
            let row = offset + r + 1;
            let mut record = FeatureRecord::new(0.0, 0.0, 0.0, 0.0);
            for (feature, col) in &columns {
                record.set(*feature, extract_f64(col, r, row, *feature)?);
            }
            records.push(record);
        }
    }

    non_empty(records)
}

/// Read one numeric cell from an Arrow column.
fn extract_f64(col: &ArrayRef, index: usize, row: usize, feature: Feature) -> Result<f64, InputError> {
    if col.is_null(index) {
        return Err(InputError::InvalidValue {
            row,
            column: feature.column(),
            value: "null".to_string(),
        });
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(index),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(index) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(index) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(index) as f64,
        other => {
            return Err(InputError::InvalidValue {
                row,
                column: feature.column(),
                value: format!("{other:?}"),
            })
        }
    };
    finite(value, row, feature, &value.to_string())
}
