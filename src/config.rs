//! Constants and command-line arguments shared by the binaries.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// File the text menu opens when none is given.
pub const DEFAULT_DATA_FILE: &str = "TCB_2018_2020.csv";

/// Windows of the two moving averages drawn over `Close`.
pub const SHORT_MA_WINDOW: usize = 20;
pub const LONG_MA_WINDOW: usize = 50;

/// Viewer window geometry.
pub const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [600.0, 400.0];

/// How the text menu prints results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Interactive text menu over a price table.
#[derive(Debug, Parser)]
#[command(name = "stock-menu", version, about)]
pub struct MenuArgs {
    /// Price table to load (.csv, .json or .parquet).
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Result rendering.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Desktop viewer for a price table.
#[derive(Debug, Parser)]
#[command(name = "stock-explorer", version, about)]
pub struct ViewerArgs {
    /// Price table to open at start-up.
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_defaults() {
        let args = MenuArgs::parse_from(["stock-menu"]);
        assert_eq!(args.file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(args.format, OutputFormat::Table);
    }

    #[test]
    fn menu_accepts_file_and_format() {
        let args = MenuArgs::parse_from(["stock-menu", "-f", "prices.json", "--format", "json"]);
        assert_eq!(args.file, PathBuf::from("prices.json"));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn viewer_file_is_optional() {
        assert!(ViewerArgs::parse_from(["stock-explorer"]).file.is_none());
        let args = ViewerArgs::parse_from(["stock-explorer", "prices.csv"]);
        assert_eq!(args.file, Some(PathBuf::from("prices.csv")));
    }
}
