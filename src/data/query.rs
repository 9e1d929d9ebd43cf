use std::collections::HashSet;

use serde::Serialize;

use super::model::{HighLow, Row, Table};
use crate::error::{QueryError, QueryResult};

// ---------------------------------------------------------------------------
// FilterResult – an ordered selection of table rows
// ---------------------------------------------------------------------------

/// Rows picked out of a [`Table`], in table order, each paired with its
/// original 0-based position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult<R = Row> {
    positions: Vec<usize>,
    rows: Vec<R>,
}

impl<R> FilterResult<R> {
    fn from_pairs(pairs: impl IntoIterator<Item = (usize, R)>) -> Self {
        let (positions, rows) = pairs.into_iter().unzip();
        FilterResult { positions, rows }
    }

    /// Number of matching rows.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Original table position of each row.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

/// Outcome of a multi-date lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatesLookup {
    pub matches: FilterResult,
    /// Requested dates with no row, in request order, duplicates kept.
    pub not_found: Vec<String>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Return indices of rows that satisfy `predicate`, in table order.
fn matching_indices(table: &Table, predicate: impl Fn(&Row) -> bool) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| predicate(row))
        .map(|(i, _)| i)
        .collect()
}

fn select(table: &Table, predicate: impl Fn(&Row) -> bool) -> FilterResult {
    FilterResult::from_pairs(
        matching_indices(table, predicate)
            .into_iter()
            .map(|i| (i, table.rows[i].clone())),
    )
}

fn check_bounds(min: f64, max: f64) -> QueryResult<()> {
    if min.is_nan() || max.is_nan() {
        return Err(QueryError::Validation("bounds must be numbers".into()));
    }
    if min > max {
        return Err(QueryError::Validation(format!(
            "minimum ({min}) must not exceed maximum ({max})"
        )));
    }
    Ok(())
}

/// Every row, in table order.
pub fn list_all(table: &Table) -> FilterResult {
    FilterResult::from_pairs(table.rows.iter().cloned().enumerate())
}

/// Rows with `min < Close < max`. Both ends are exclusive.
pub fn filter_by_close_range(table: &Table, min: f64, max: f64) -> QueryResult<FilterResult> {
    check_bounds(min, max)?;
    Ok(select(table, |row| row.close > min && row.close < max))
}

/// `Date, High, Low` of rows with `min <= Low <= max`. Both ends are inclusive.
pub fn filter_by_low_range_projected(
    table: &Table,
    min: f64,
    max: f64,
) -> QueryResult<FilterResult<HighLow>> {
    check_bounds(min, max)?;
    let indices = matching_indices(table, |row| row.low >= min && row.low <= max);
    Ok(FilterResult::from_pairs(
        indices
            .into_iter()
            .map(|i| (i, HighLow::from(&table.rows[i]))),
    ))
}

/// All rows whose `Date` equals `date` exactly.
///
/// An absent date is [`QueryError::NoMatch`], never an empty result.
pub fn find_by_date(table: &Table, date: &str) -> QueryResult<FilterResult> {
    let result = select(table, |row| row.date == date);
    if result.is_empty() {
        return Err(QueryError::NoMatch {
            date: date.to_string(),
        });
    }
    Ok(result)
}

/// Rows whose `Date` is any of `dates` (each trimmed), in table order.
///
/// A row matches once no matter how often its date was requested. The
/// not-found list keeps every absent request, repeats included.
pub fn find_by_dates<S: AsRef<str>>(table: &Table, dates: &[S]) -> DatesLookup {
    let requested: Vec<&str> = dates.iter().map(|d| d.as_ref().trim()).collect();
    let wanted: HashSet<&str> = requested.iter().copied().collect();

    let matches = select(table, |row| wanted.contains(row.date.as_str()));

    let found: HashSet<&str> = matches.rows().iter().map(|r| r.date.as_str()).collect();
    let not_found = requested
        .iter()
        .filter(|d| !found.contains(*d))
        .map(|d| d.to_string())
        .collect();

    DatesLookup { matches, not_found }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Parse a price bound typed by a user.
pub fn parse_bound(text: &str) -> QueryResult<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(QueryError::Validation(format!(
            "'{trimmed}' is not a valid number"
        ))),
    }
}

/// Split a comma separated list of dates. Pieces are trimmed; empty pieces
/// and repeats are kept so they show up in the not-found list.
pub fn parse_date_list(text: &str) -> Vec<String> {
    text.split(',').map(|d| d.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn row(date: &str, low: f64, close: f64) -> Row {
        Row {
            date: date.to_string(),
            open: close,
            high: close + 1.0,
            low,
            close,
            volume: 1000.0,
            extra: BTreeMap::new(),
        }
    }

    fn table() -> Table {
        Table::new(
            vec!["Date", "Open", "High", "Low", "Close", "Volume"]
                .into_iter()
                .map(String::from)
                .collect(),
            vec![
                row("2019-01-02", 20.0, 21.0),
                row("2019-01-03", 22.0, 23.0),
                row("2019-01-04", 24.0, 25.0),
                row("2019-01-03", 19.0, 20.0),
                row("2019-01-07", 26.0, 27.0),
            ],
        )
    }

    #[test]
    fn list_all_keeps_load_order() {
        let t = table();
        let all = list_all(&t);
        assert_eq!(all.count(), t.len());
        assert_eq!(all.rows(), t.rows.as_slice());
        assert_eq!(all.positions(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn close_filter_is_exclusive_on_both_ends() {
        let t = table();
        let result = filter_by_close_range(&t, 21.0, 25.0).expect("valid range");
        let dates: Vec<&str> = result.rows().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2019-01-03"]);
        assert_eq!(result.positions(), &[1]);
        assert_eq!(result.count(), 1);
    }

    #[test]
    fn close_filter_with_equal_bounds_is_empty() {
        let result = filter_by_close_range(&table(), 23.0, 23.0).expect("valid range");
        assert!(result.is_empty());
    }

    #[test]
    fn low_filter_is_inclusive_and_projects() {
        let t = table();
        let result = filter_by_low_range_projected(&t, 20.0, 24.0).expect("valid range");
        assert_eq!(result.count(), 3);
        assert_eq!(result.positions(), &[0, 1, 2]);
        assert_eq!(
            result.rows()[0],
            HighLow {
                date: "2019-01-02".into(),
                high: 22.0,
                low: 20.0
            }
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let t = table();
        let before = t.clone();
        assert!(matches!(
            filter_by_close_range(&t, 30.0, 10.0),
            Err(QueryError::Validation(_))
        ));
        assert!(matches!(
            filter_by_low_range_projected(&t, 30.0, 10.0),
            Err(QueryError::Validation(_))
        ));
        assert_eq!(t, before);
    }

    #[test]
    fn find_by_date_returns_every_duplicate() {
        let t = table();
        let single = find_by_date(&t, "2019-01-02").expect("present");
        assert_eq!(single.count(), 1);

        let dupes = find_by_date(&t, "2019-01-03").expect("present");
        assert_eq!(dupes.positions(), &[1, 3]);
        assert_eq!(dupes.rows()[1].close, 20.0);
    }

    #[test]
    fn find_by_date_reports_no_match() {
        let err = find_by_date(&table(), "2020-12-31").expect_err("absent");
        assert_eq!(
            err,
            QueryError::NoMatch {
                date: "2020-12-31".into()
            }
        );
    }

    #[test]
    fn find_by_date_does_not_trim() {
        assert!(find_by_date(&table(), " 2019-01-02").is_err());
    }

    #[test]
    fn find_by_dates_dedups_matches_but_not_missing() {
        let t = table();
        let lookup = find_by_dates(
            &t,
            &["2019-01-02", " 2019-01-02", "9999-99-99", "9999-99-99"],
        );
        assert_eq!(lookup.matches.count(), 1);
        assert_eq!(lookup.matches.positions(), &[0]);
        assert_eq!(lookup.not_found, vec!["9999-99-99", "9999-99-99"]);
    }

    #[test]
    fn find_by_dates_follows_table_order() {
        let t = table();
        let lookup = find_by_dates(&t, &["2019-01-07", "2019-01-03"]);
        assert_eq!(lookup.matches.positions(), &[1, 3, 4]);
        assert!(lookup.not_found.is_empty());
    }

    #[test]
    fn find_by_dates_with_nothing_found_is_valid() {
        let lookup = find_by_dates(&table(), &["1999-01-01"]);
        assert!(lookup.matches.is_empty());
        assert_eq!(lookup.not_found, vec!["1999-01-01"]);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let t = table();
        assert_eq!(
            filter_by_close_range(&t, 0.0, 100.0),
            filter_by_close_range(&t, 0.0, 100.0)
        );
        assert_eq!(
            find_by_dates(&t, &["2019-01-03"]),
            find_by_dates(&t, &["2019-01-03"])
        );
    }

    #[test]
    fn parses_bounds() {
        assert_eq!(parse_bound(" 25.5 "), Ok(25.5));
        assert_eq!(parse_bound("30"), Ok(30.0));
        assert!(matches!(parse_bound("abc"), Err(QueryError::Validation(_))));
        assert!(matches!(parse_bound(""), Err(QueryError::Validation(_))));
        assert!(matches!(parse_bound("NaN"), Err(QueryError::Validation(_))));
    }

    #[test]
    fn splits_date_lists() {
        assert_eq!(
            parse_date_list("2019-01-02, 2019-01-03 ,,2019-01-02"),
            vec!["2019-01-02", "2019-01-03", "", "2019-01-02"]
        );
    }
}
