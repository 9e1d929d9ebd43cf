use std::path::Path;

use crate::data::indicators::Summary;
use crate::data::model::HighLow;
use crate::data::query::{FilterResult, parse_bound, parse_date_list};
use crate::engine::QueryEngine;
use crate::error::{QueryError, QueryResult};
use crate::ui::plot::ChartKind;

// ---------------------------------------------------------------------------
// Query inputs
// ---------------------------------------------------------------------------

/// Raw text of the side-panel input fields.
#[derive(Debug, Clone, Default)]
pub struct QueryInputs {
    pub min_close: String,
    pub max_close: String,
    pub min_low: String,
    pub max_low: String,
    pub date: String,
    pub dates: String,
}

// ---------------------------------------------------------------------------
// What the central panel shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub enum ResultView {
    /// Nothing loaded yet.
    #[default]
    Empty,
    /// Summary figures plus the whole table.
    Overview { summary: Summary, all: FilterResult },
    /// Full rows from a filter or lookup.
    Rows {
        title: String,
        result: FilterResult,
        notes: Vec<String>,
    },
    /// `Date, High, Low` rows.
    Projected {
        title: String,
        result: FilterResult<HighLow>,
    },
    Chart(ChartKind),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Owns the loaded table.
    pub engine: QueryEngine,

    /// File name of the loaded table, for the top bar.
    pub file_name: Option<String>,

    pub inputs: QueryInputs,

    /// Chart picked in the side panel.
    pub chart_kind: ChartKind,

    /// Result currently on screen.
    pub view: ResultView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load a file. On failure the previous table and view stay as they were.
    pub fn open_path(&mut self, path: &Path) {
        match self.engine.load(path) {
            Ok(_) => {
                self.file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                self.status_message = None;
                // Results from the previous table are stale now.
                self.show_overview();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn show_overview(&mut self) {
        let view = self.engine.summary().and_then(|summary| {
            Ok(ResultView::Overview {
                summary,
                all: self.engine.list_all()?,
            })
        });
        self.apply(view);
    }

    pub fn run_close_filter(&mut self) {
        let view = self.read_range(&self.inputs.min_close, &self.inputs.max_close)
            .and_then(|(min, max)| {
                let result = self.engine.filter_by_close_range(min, max)?;
                Ok(ResultView::Rows {
                    title: format!("Close between {min} and {max}"),
                    notes: vec![format!("Matching records: {}", result.count())],
                    result,
                })
            });
        self.apply(view);
    }

    pub fn run_low_filter(&mut self) {
        let view = self.read_range(&self.inputs.min_low, &self.inputs.max_low)
            .and_then(|(min, max)| {
                let result = self.engine.filter_by_low_range_projected(min, max)?;
                Ok(ResultView::Projected {
                    title: format!("Date, High, Low with Low from {min} to {max}"),
                    result,
                })
            });
        self.apply(view);
    }

    pub fn run_date_lookup(&mut self) {
        let date = self.inputs.date.clone();
        let view = self.engine.find_by_date(&date).map(|result| ResultView::Rows {
            title: format!("Trading data for {date}"),
            notes: Vec::new(),
            result,
        });
        self.apply(view);
    }

    pub fn run_dates_lookup(&mut self) {
        let dates = parse_date_list(&self.inputs.dates);
        let view = self.engine.find_by_dates(&dates).map(|lookup| {
            let mut notes = vec![format!("Matching records: {}", lookup.matches.count())];
            if !lookup.not_found.is_empty() {
                notes.push("Dates not found in the data:".to_string());
                notes.extend(lookup.not_found.iter().map(|d| format!("- {d}")));
            }
            ResultView::Rows {
                title: "Data for the selected dates".to_string(),
                result: lookup.matches,
                notes,
            }
        });
        self.apply(view);
    }

    pub fn show_chart(&mut self) {
        let view = self.engine.table().map(|_| ResultView::Chart(self.chart_kind));
        self.apply(view);
    }

    // -- helpers --

    fn read_range(&self, min: &str, max: &str) -> QueryResult<(f64, f64)> {
        self.engine.table()?;
        Ok((parse_bound(min)?, parse_bound(max)?))
    }

    /// Show a fresh result, or keep the current one and report why not.
    fn apply(&mut self, view: QueryResult<ResultView>) {
        match view {
            Ok(view) => {
                self.view = view;
                self.status_message = None;
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: QueryError) {
        if error.is_load_failure() {
            log::error!("Failed to load file: {error}");
        } else {
            log::warn!("{error}");
        }
        self.status_message = Some(match error {
            QueryError::NotLoaded => "Please load a data file first.".to_string(),
            QueryError::NoMatch { date } => format!("No trading data for date: {date}"),
            other => format!("Error: {other}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::{Row, Table};

    fn state() -> AppState {
        let row = |date: &str, low: f64, close: f64| Row {
            date: date.to_string(),
            open: close,
            high: close + 1.0,
            low,
            close,
            volume: 1000.0,
            extra: BTreeMap::new(),
        };
        let mut state = AppState::default();
        state.engine.set_table(Table::new(
            ["Date", "Open", "High", "Low", "Close", "Volume"]
                .into_iter()
                .map(String::from)
                .collect(),
            vec![
                row("2019-01-02", 20.0, 21.0),
                row("2019-01-03", 22.0, 23.0),
                row("2019-01-04", 24.0, 25.0),
            ],
        ));
        state.show_overview();
        state
    }

    #[test]
    fn queries_without_data_ask_for_a_file() {
        let mut state = AppState::default();
        state.inputs.min_close = "1".into();
        state.inputs.max_close = "2".into();
        state.run_close_filter();
        assert!(matches!(state.view, ResultView::Empty));
        assert_eq!(
            state.status_message.as_deref(),
            Some("Please load a data file first.")
        );
    }

    #[test]
    fn overview_lists_everything() {
        let state = state();
        match &state.view {
            ResultView::Overview { summary, all } => {
                assert_eq!(summary.count, 3);
                assert_eq!(all.count(), 3);
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn close_filter_replaces_view() {
        let mut state = state();
        state.inputs.min_close = "20".into();
        state.inputs.max_close = "24".into();
        state.run_close_filter();
        match &state.view {
            ResultView::Rows { result, notes, .. } => {
                assert_eq!(result.count(), 2);
                assert_eq!(notes[0], "Matching records: 2");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn bad_input_keeps_previous_view() {
        let mut state = state();
        state.inputs.min_low = "abc".into();
        state.inputs.max_low = "30".into();
        state.run_low_filter();
        assert!(matches!(state.view, ResultView::Overview { .. }));
        assert!(state.status_message.is_some());

        state.inputs.min_low = "30".into();
        state.inputs.max_low = "10".into();
        state.run_low_filter();
        assert!(matches!(state.view, ResultView::Overview { .. }));
    }

    #[test]
    fn low_filter_projects() {
        let mut state = state();
        state.inputs.min_low = "22".into();
        state.inputs.max_low = "24".into();
        state.run_low_filter();
        match &state.view {
            ResultView::Projected { result, .. } => assert_eq!(result.count(), 2),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn missing_date_is_reported() {
        let mut state = state();
        state.inputs.date = "2030-01-01".into();
        state.run_date_lookup();
        assert_eq!(
            state.status_message.as_deref(),
            Some("No trading data for date: 2030-01-01")
        );
    }

    #[test]
    fn dates_lookup_lists_missing_dates() {
        let mut state = state();
        state.inputs.dates = "2019-01-03, 9999-99-99".into();
        state.run_dates_lookup();
        match &state.view {
            ResultView::Rows { result, notes, .. } => {
                assert_eq!(result.count(), 1);
                assert_eq!(notes.last().map(String::as_str), Some("- 9999-99-99"));
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn chart_uses_selected_kind() {
        let mut state = state();
        state.chart_kind = ChartKind::MovingAverage;
        state.show_chart();
        assert!(matches!(
            state.view,
            ResultView::Chart(ChartKind::MovingAverage)
        ));
    }

    #[test]
    fn failed_open_keeps_table() {
        let mut state = state();
        state.open_path(Path::new("/definitely/not/here.csv"));
        assert!(state.status_message.is_some());
        assert_eq!(state.engine.list_all().map(|r| r.count()), Ok(3));
    }
}
