//! Terminal rendering of query results.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use serde::Serialize;

use crate::data::model::{CellValue, Tabular};
use crate::data::query::FilterResult;

/// Header of the column holding each row's original table position.
pub const POSITION_COLUMN: &str = "#";

/// Lay a result out as an Arrow batch, one array per column.
///
/// A column becomes Int64 when every cell is an integer, Float64 when every
/// cell is numeric, and Utf8 otherwise. Missing cells are nulls.
pub fn to_record_batch<R: Tabular>(
    columns: &[String],
    result: &FilterResult<R>,
) -> Result<RecordBatch, ArrowError> {
    let mut fields = vec![Field::new(POSITION_COLUMN, DataType::UInt64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(UInt64Array::from(
        result
            .positions()
            .iter()
            .map(|&p| p as u64)
            .collect::<Vec<_>>(),
    ))];

    for column in columns {
        let cells: Vec<CellValue> = result.rows().iter().map(|r| r.cell(column)).collect();
        let (data_type, array) = column_array(&cells);
        fields.push(Field::new(column.as_str(), data_type, true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
}

fn column_array(cells: &[CellValue]) -> (DataType, ArrayRef) {
    let all_integer = cells
        .iter()
        .all(|c| matches!(c, CellValue::Integer(_) | CellValue::Null));
    let all_numeric = cells
        .iter()
        .all(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null));

    if all_integer {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Integer(i) => Some(*i),
                _ => None,
            })
            .collect();
        (DataType::Int64, Arc::new(Int64Array::from(values)))
    } else if all_numeric {
        let values: Vec<Option<f64>> = cells.iter().map(CellValue::as_f64).collect();
        (DataType::Float64, Arc::new(Float64Array::from(values)))
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Null => None,
                other => Some(other.to_string()),
            })
            .collect();
        (DataType::Utf8, Arc::new(StringArray::from(values)))
    }
}

/// Boxed text table of a result.
pub fn format_table<R: Tabular>(
    columns: &[String],
    result: &FilterResult<R>,
) -> Result<String, ArrowError> {
    let batch = to_record_batch(columns, result)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// Pretty JSON array of the result rows.
pub fn format_json<R: Serialize>(result: &FilterResult<R>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result.rows())
}
