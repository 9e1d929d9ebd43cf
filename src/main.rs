use clap::Parser;
use eframe::egui;
use stock_explorer::StockExplorerApp;
use stock_explorer::config::{MIN_WINDOW_SIZE, ViewerArgs, WINDOW_SIZE};

fn main() -> eframe::Result {
    env_logger::init();

    let args = ViewerArgs::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "Stock Explorer – OHLCV Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(StockExplorerApp::new(args.file)))),
    )
}
