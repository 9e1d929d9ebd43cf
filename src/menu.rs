//! Numbered text menu over a loaded [`QueryEngine`].

use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::config::OutputFormat;
use crate::data::model::{HighLow, Tabular};
use crate::data::query::{FilterResult, parse_bound, parse_date_list};
use crate::engine::QueryEngine;
use crate::error::QueryError;
use crate::render;

/// What the user picked at the menu prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    ListAll,
    FilterByClose,
    FilterByLow,
    FindByDate,
    FindByDates,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "0" => Some(Self::Exit),
            "1" => Some(Self::ListAll),
            "2" => Some(Self::FilterByClose),
            "3" => Some(Self::FilterByLow),
            "4" => Some(Self::FindByDate),
            "5" => Some(Self::FindByDates),
            _ => None,
        }
    }
}

const MENU: &str = "
==== STOCK DATA ANALYSIS MENU ====
1. Show all data
2. Filter by Close price range
3. Extract Date, High, Low within a Low price range
4. Show details for one trading date
5. Filter by several dates
0. Exit";

/// Reads choices from `input`, writes results to `output`.
pub struct Menu<'a, R, W> {
    engine: &'a QueryEngine,
    input: R,
    output: W,
    format: OutputFormat,
    eof: bool,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(engine: &'a QueryEngine, input: R, output: W, format: OutputFormat) -> Self {
        Menu {
            engine,
            input,
            output,
            format,
            eof: false,
        }
    }

    /// Loop until the user picks `0` or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(line) = self.prompt("Enter your choice (0-5): ")? else {
                return Ok(());
            };

            match MenuChoice::parse(&line) {
                Some(choice) => {
                    if !self.dispatch(choice)? {
                        return Ok(());
                    }
                }
                None => {
                    log::debug!("rejected menu input {line:?}");
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                }
            }
        }
    }

    /// Returns `false` when the session is over: the user picked `0` or
    /// input ran out mid-operation.
    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<bool> {
        match choice {
            MenuChoice::Exit => writeln!(self.output, "Goodbye.").map(|_| false),
            MenuChoice::ListAll => self.list_all().map(|_| true),
            MenuChoice::FilterByClose => self.filter_by_close(),
            MenuChoice::FilterByLow => self.filter_by_low(),
            MenuChoice::FindByDate => self.find_by_date(),
            MenuChoice::FindByDates => self.find_by_dates(),
        }
    }

    fn list_all(&mut self) -> io::Result<()> {
        match self.engine.list_all() {
            Ok(result) => {
                writeln!(self.output, "\n==== ALL DATA ====")?;
                self.print_rows(&result)?;
                writeln!(self.output, "Total records: {}", result.count())
            }
            Err(e) => self.print_error(&e),
        }
    }

    fn filter_by_close(&mut self) -> io::Result<bool> {
        let Some((min, max)) = self.read_range("Close")? else {
            return Ok(self.has_input());
        };
        match self.engine.filter_by_close_range(min, max) {
            Ok(result) => {
                writeln!(
                    self.output,
                    "\n==== FILTERED DATA (Close between {min} and {max}) ===="
                )?;
                self.print_rows(&result)?;
                writeln!(self.output, "Matching records: {}", result.count())?;
            }
            Err(e) => self.print_error(&e)?,
        }
        Ok(true)
    }

    fn filter_by_low(&mut self) -> io::Result<bool> {
        let Some((min, max)) = self.read_range("Low")? else {
            return Ok(self.has_input());
        };
        match self.engine.filter_by_low_range_projected(min, max) {
            Ok(result) => {
                writeln!(
                    self.output,
                    "\n==== DATE, HIGH, LOW (Low from {min} to {max}) ===="
                )?;
                let columns: Vec<String> =
                    HighLow::COLUMNS.iter().map(|c| c.to_string()).collect();
                self.print_result(&columns, &result)?;
                writeln!(self.output, "Matching records: {}", result.count())?;
            }
            Err(e) => self.print_error(&e)?,
        }
        Ok(true)
    }

    fn find_by_date(&mut self) -> io::Result<bool> {
        let Some(date) = self.prompt("Trading date (YYYY-MM-DD): ")? else {
            return Ok(false);
        };
        match self.engine.find_by_date(&date) {
            Ok(result) => {
                writeln!(self.output, "\n==== TRADING DATA FOR {date} ====")?;
                self.print_rows(&result)?;
            }
            Err(QueryError::NoMatch { date }) => {
                writeln!(self.output, "No trading data for date: {date}")?;
            }
            Err(e) => self.print_error(&e)?,
        }
        Ok(true)
    }

    fn find_by_dates(&mut self) -> io::Result<bool> {
        writeln!(
            self.output,
            "Enter trading dates (YYYY-MM-DD) separated by commas:"
        )?;
        let Some(line) = self.prompt("Dates: ")? else {
            return Ok(false);
        };
        let dates = parse_date_list(&line);
        match self.engine.find_by_dates(&dates) {
            Ok(lookup) => {
                writeln!(self.output, "\n==== DATA FOR THE SELECTED DATES ====")?;
                self.print_rows(&lookup.matches)?;
                writeln!(self.output, "Matching records: {}", lookup.matches.count())?;
                if !lookup.not_found.is_empty() {
                    writeln!(self.output, "\nDates not found in the data:")?;
                    for date in &lookup.not_found {
                        writeln!(self.output, "- {date}")?;
                    }
                }
            }
            Err(e) => self.print_error(&e)?,
        }
        Ok(true)
    }

    // -- helpers --

    /// Read a min/max pair. Stops at the first bad number, like the prompts
    /// do, and returns `None` after reporting it.
    fn read_range(&mut self, column: &str) -> io::Result<Option<(f64, f64)>> {
        let mut bounds = [0.0; 2];
        for (slot, label) in bounds.iter_mut().zip(["Minimum", "Maximum"]) {
            let Some(text) = self.prompt(&format!("{label} {column} price: "))? else {
                return Ok(None);
            };
            match parse_bound(&text) {
                Ok(v) => *slot = v,
                Err(e) => {
                    log::debug!("rejected {column} bound: {e}");
                    self.print_error(&e)?;
                    return Ok(None);
                }
            }
        }
        Ok(Some((bounds[0], bounds[1])))
    }

    fn has_input(&self) -> bool {
        !self.eof
    }

    /// Print `text`, then read one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.eof = true;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn print_rows(&mut self, result: &FilterResult) -> io::Result<()> {
        let columns = match self.engine.table() {
            Ok(table) => table.columns.clone(),
            Err(e) => return self.print_error(&e),
        };
        self.print_result(&columns, result)
    }

    fn print_result<T: Tabular + Serialize>(
        &mut self,
        columns: &[String],
        result: &FilterResult<T>,
    ) -> io::Result<()> {
        let text = match self.format {
            OutputFormat::Table => render::format_table(columns, result).map_err(io::Error::other)?,
            OutputFormat::Json => render::format_json(result).map_err(io::Error::other)?,
        };
        writeln!(self.output, "{text}")
    }

    fn print_error(&mut self, error: &QueryError) -> io::Result<()> {
        writeln!(self.output, "Error: {error}")
    }
}
