use std::path::Path;

use crate::data::indicators::Summary;
use crate::data::loader;
use crate::data::model::{HighLow, Table};
use crate::data::query::{self, DatesLookup, FilterResult};
use crate::error::{QueryError, QueryResult};

// ---------------------------------------------------------------------------
// Query engine
// ---------------------------------------------------------------------------

/// Owns the loaded price table and answers queries against it.
///
/// `load` is the only way to change the table; every query reads it and
/// hands back a fresh result, so nothing a caller holds goes stale when a
/// new file is loaded.
#[derive(Debug, Default)]
pub struct QueryEngine {
    table: Option<Table>,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file, replacing the current table only on success.
    pub fn load(&mut self, path: &Path) -> QueryResult<&Table> {
        let table = loader::load_file(path)?;
        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            table.len(),
            table.columns,
            path.display()
        );
        Ok(&*self.table.insert(table))
    }

    /// Replace the table with one built elsewhere.
    pub fn set_table(&mut self, table: Table) {
        self.table = Some(table);
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> QueryResult<&Table> {
        self.table.as_ref().ok_or(QueryError::NotLoaded)
    }

    pub fn list_all(&self) -> QueryResult<FilterResult> {
        Ok(query::list_all(self.table()?))
    }

    pub fn filter_by_close_range(&self, min: f64, max: f64) -> QueryResult<FilterResult> {
        let result = query::filter_by_close_range(self.table()?, min, max)
            .inspect_err(|e| log::debug!("close filter rejected: {e}"))?;
        log::debug!("close in ({min}, {max}): {} rows", result.count());
        Ok(result)
    }

    pub fn filter_by_low_range_projected(
        &self,
        min: f64,
        max: f64,
    ) -> QueryResult<FilterResult<HighLow>> {
        let result = query::filter_by_low_range_projected(self.table()?, min, max)
            .inspect_err(|e| log::debug!("low filter rejected: {e}"))?;
        log::debug!("low in [{min}, {max}]: {} rows", result.count());
        Ok(result)
    }

    pub fn find_by_date(&self, date: &str) -> QueryResult<FilterResult> {
        query::find_by_date(self.table()?, date)
    }

    pub fn find_by_dates<S: AsRef<str>>(&self, dates: &[S]) -> QueryResult<DatesLookup> {
        let lookup = query::find_by_dates(self.table()?, dates);
        log::debug!(
            "{} dates requested: {} rows, {} not found",
            dates.len(),
            lookup.matches.count(),
            lookup.not_found.len()
        );
        Ok(lookup)
    }

    pub fn summary(&self) -> QueryResult<Summary> {
        Ok(Summary::of(self.table()?))
    }
}
