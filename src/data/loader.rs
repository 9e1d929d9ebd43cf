use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, REQUIRED_COLUMNS, Row, Table};
use crate::error::{QueryError, QueryResult};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a price table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat columns, one row per trading day
/// * `.json`    – `[{ "Date": "2019-01-02", "Open": 25.0, ... }, ...]`
/// * anything else is read as CSV with a header row
///
/// A path that does not exist is reported as [`QueryError::NotFound`];
/// every other failure becomes [`QueryError::Parse`] carrying the full
/// context chain.
pub fn load_file(path: &Path) -> QueryResult<Table> {
    if !path.exists() {
        return Err(QueryError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        _ => load_csv(path),
    };

    parsed.map_err(|e| QueryError::Parse {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

// ---------------------------------------------------------------------------
// Shared row assembly
// ---------------------------------------------------------------------------

/// Positions of the OHLCV columns within a source header.
struct ColumnLayout {
    headers: Vec<String>,
    required: [usize; 6],
}

impl ColumnLayout {
    fn new(headers: Vec<String>) -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| !headers.iter().any(|h| h == name))
            .collect();
        if !missing.is_empty() {
            bail!("missing required column(s): {}", missing.join(", "));
        }

        let mut required = [0usize; 6];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("missing '{name}' column"))?;
        }
        Ok(ColumnLayout { headers, required })
    }

    /// Turn one record (cells in header order) into a typed row.
    fn build_row(&self, row_no: usize, cells: Vec<CellValue>) -> Result<Row> {
        let [date_idx, open_idx, high_idx, low_idx, close_idx, volume_idx] = self.required;

        let date = match cells.get(date_idx) {
            Some(CellValue::Null) | None => bail!("row {row_no}: empty Date"),
            Some(CellValue::Text(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let number = |idx: usize| -> Result<f64> {
            let name = &self.headers[idx];
            let cell = match cells.get(idx) {
                Some(CellValue::Null) | None => bail!("row {row_no}: missing {name} value"),
                Some(cell) => cell,
            };
            match cell.as_f64() {
                Some(v) if v.is_finite() => Ok(v),
                _ => bail!("row {row_no}: {name} value '{cell}' is not a number"),
            }
        };

        let open = number(open_idx)?;
        let high = number(high_idx)?;
        let low = number(low_idx)?;
        let close = number(close_idx)?;
        let volume = number(volume_idx)?;

        let mut extra = BTreeMap::new();
        for (col_idx, value) in cells.into_iter().enumerate() {
            if self.required.contains(&col_idx) {
                continue;
            }
            if let Some(name) = self.headers.get(col_idx) {
                extra.insert(name.clone(), value);
            }
        }

        Ok(Row {
            date,
            open,
            high,
            low,
            close,
            volume,
            extra,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one trading day per line.
/// Headers and cells are trimmed except `Date`, which is kept verbatim for
/// exact-match lookups. Columns beyond OHLCV are kept as passthrough cells.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let layout = ColumnLayout::new(headers)?;
    let date_idx = layout.required[0];
    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells: Vec<CellValue> = record
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                if i == date_idx && !raw.trim().is_empty() {
                    CellValue::Text(raw.to_string())
                } else {
                    CellValue::guess(raw.trim())
                }
            })
            .collect();
        rows.push(layout.build_row(row_no, cells)?);
    }

    Ok(Table::new(layout.headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "2019-01-02", "Open": 25.0, "High": 26.5,
///     "Low": 24.8, "Close": 26.1, "Volume": 1250300 },
///   ...
/// ]
/// ```
///
/// The header is every key seen in any record: OHLCV first, then other keys
/// as first seen. A record lacking a key gets an empty cell there.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut seen: Vec<String> = Vec::new();
    for rec in records {
        if let Some(obj) = rec.as_object() {
            for key in obj.keys() {
                if !seen.contains(key) {
                    seen.push(key.clone());
                }
            }
        }
    }
    let (mut headers, others): (Vec<String>, Vec<String>) = seen
        .into_iter()
        .partition(|k| REQUIRED_COLUMNS.contains(&k.as_str()));
    headers.sort_by_key(|k| REQUIRED_COLUMNS.iter().position(|c| *c == k.as_str()));
    headers.extend(others);

    let layout = ColumnLayout::new(headers)?;
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let cells: Vec<CellValue> = layout
            .headers
            .iter()
            .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        rows.push(layout.build_row(i, cells)?);
    }

    Ok(Table::new(layout.headers, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one trading day per row.
///
/// `Date` may be a string or a `Date32` column; the price columns may be any
/// integer or float type.  Works with files written by both Pandas and Polars.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let layout = ColumnLayout::new(headers)?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells: Vec<CellValue> = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect();
            let row_no = rows.len();
            rows.push(layout.build_row(row_no, cells)?);
        }
    }

    Ok(Table::new(layout.headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Date32 => any
            .downcast_ref::<Date32Array>()
            .and_then(|arr| arr.value_as_date(row))
            .map(|d| CellValue::Text(d.to_string()))
            .unwrap_or(CellValue::Null),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|arr| CellValue::Integer(arr.value(row) as i64))
            .unwrap_or(CellValue::Null),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|arr| CellValue::Integer(arr.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|arr| CellValue::Float(arr.value(row) as f64))
            .unwrap_or(CellValue::Null),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|arr| CellValue::Float(arr.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|arr| CellValue::Bool(arr.value(row)))
            .unwrap_or(CellValue::Null),
        _ => match any.downcast_ref::<StringArray>() {
            Some(arr) => CellValue::Text(arr.value(row).to_string()),
            None => CellValue::Text(format!("{:?}", col.data_type())),
        },
    }
}
