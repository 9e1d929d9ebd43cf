use std::io;
use std::process::ExitCode;

use clap::Parser;
use stock_explorer::config::MenuArgs;
use stock_explorer::engine::QueryEngine;
use stock_explorer::menu::Menu;

fn main() -> ExitCode {
    // Keep log lines out of the menu unless RUST_LOG asks for them.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = MenuArgs::parse();
    log::debug!("Parsed arguments: {args:?}");

    let mut engine = QueryEngine::new();
    match engine.load(&args.file) {
        Ok(table) => println!("Loaded {} records from {}.", table.len(), args.file.display()),
        Err(e) => {
            // Nothing to explore without data.
            log::error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(&engine, stdin.lock(), stdout.lock(), args.format);
    if let Err(e) = menu.run() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
