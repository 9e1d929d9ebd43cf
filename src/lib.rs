//! Explore a historical OHLCV price table from a text menu or a desktop window.
//!
//! [`QueryEngine`] owns the loaded table; the menu ([`menu`]) and the egui
//! viewer ([`app`]) only call into it and display what comes back.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod menu;
pub mod render;
pub mod state;
pub mod ui;

pub use app::StockExplorerApp;
pub use engine::QueryEngine;
pub use error::{QueryError, QueryResult};
