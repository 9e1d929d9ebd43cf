use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Columns every price table must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

// ---------------------------------------------------------------------------
// CellValue – a single cell of a passthrough column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell for columns the engine does not interpret.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell (CSV has no schema).
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::Text(s.to_string())
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one trading day
// ---------------------------------------------------------------------------

/// One trading day. The OHLCV fields are typed, everything else rides along
/// untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    /// Passthrough columns: column_name → value.
    #[serde(flatten)]
    pub extra: BTreeMap<String, CellValue>,
}

impl Row {
    /// Cell lookup by column name, as shown in full-row displays.
    pub fn cell(&self, column: &str) -> CellValue {
        match column {
            "Date" => CellValue::Text(self.date.clone()),
            "Open" => CellValue::Float(self.open),
            "High" => CellValue::Float(self.high),
            "Low" => CellValue::Float(self.low),
            "Close" => CellValue::Float(self.close),
            "Volume" => volume_cell(self.volume),
            other => self.extra.get(other).cloned().unwrap_or(CellValue::Null),
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Volumes are usually whole share counts; show them without a fraction.
fn volume_cell(volume: f64) -> CellValue {
    if volume.fract() == 0.0 && volume.abs() < 9.0e15 {
        CellValue::Integer(volume as i64)
    } else {
        CellValue::Float(volume)
    }
}

/// A row projected down to `Date, High, Low`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighLow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
}

impl HighLow {
    pub const COLUMNS: [&'static str; 3] = ["Date", "High", "Low"];
}

/// Anything that can be laid out as one line of a results grid.
pub trait Tabular {
    fn cell(&self, column: &str) -> CellValue;
}

impl Tabular for Row {
    fn cell(&self, column: &str) -> CellValue {
        Row::cell(self, column)
    }
}

impl Tabular for HighLow {
    fn cell(&self, column: &str) -> CellValue {
        match column {
            "Date" => CellValue::Text(self.date.clone()),
            "High" => CellValue::Float(self.high),
            "Low" => CellValue::Float(self.low),
            _ => CellValue::Null,
        }
    }
}

impl From<&Row> for HighLow {
    fn from(row: &Row) -> Self {
        HighLow {
            date: row.date.clone(),
            high: row.high,
            low: row.low,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded price table: rows in file order plus the header in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names as they appeared in the source, OHLCV included.
    pub columns: Vec<String>,
    /// All rows, file order.
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Table { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        let mut extra = BTreeMap::new();
        extra.insert("Ticker".to_string(), CellValue::Text("TCB".into()));
        Row {
            date: "2019-01-02".into(),
            open: 25.0,
            high: 26.5,
            low: 24.8,
            close: 26.1,
            volume: 1_250_300.0,
            extra,
        }
    }

    #[test]
    fn guesses_cell_types() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("42"), CellValue::Integer(42));
        assert_eq!(CellValue::guess("4.5"), CellValue::Float(4.5));
        assert_eq!(CellValue::guess("true"), CellValue::Bool(true));
        assert_eq!(CellValue::guess("TCB"), CellValue::Text("TCB".into()));
    }

    #[test]
    fn cell_lookup_covers_typed_and_passthrough_columns() {
        let r = row();
        assert_eq!(r.cell("Date"), CellValue::Text("2019-01-02".into()));
        assert_eq!(r.cell("Close"), CellValue::Float(26.1));
        assert_eq!(r.cell("Volume"), CellValue::Integer(1_250_300));
        assert_eq!(r.cell("Ticker"), CellValue::Text("TCB".into()));
        assert_eq!(r.cell("Missing"), CellValue::Null);
    }

    #[test]
    fn fractional_volume_stays_float() {
        let mut r = row();
        r.volume = 10.5;
        assert_eq!(r.cell("Volume"), CellValue::Float(10.5));
    }

    #[test]
    fn row_serializes_with_source_column_names() {
        let json = serde_json::to_value(row()).expect("serialize");
        assert_eq!(json["Date"], "2019-01-02");
        assert_eq!(json["Close"], 26.1);
        assert_eq!(json["Ticker"], "TCB");
    }

    #[test]
    fn projection_keeps_date_high_low() {
        let p = HighLow::from(&row());
        assert_eq!(p.date, "2019-01-02");
        assert_eq!(p.high, 26.5);
        assert_eq!(p.low, 24.8);
    }
}
