use eframe::egui::{self, Color32, RichText, ScrollArea, TextEdit, Ui};

use crate::data::model::HighLow;
use crate::state::{AppState, ResultView};
use crate::ui::plot::{self, ChartKind};
use crate::ui::table;

// ---------------------------------------------------------------------------
// Left side panel – query forms
// ---------------------------------------------------------------------------

fn input(ui: &mut Ui, label: &str, value: &mut String, hint: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.add(TextEdit::singleline(value).hint_text(hint).desired_width(110.0));
    });
}

/// Render the left query panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Queries");
    ui.separator();

    if !state.engine.is_loaded() {
        ui.label("No data loaded.");
        ui.separator();
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if ui.button("Overview").clicked() {
                state.show_overview();
            }
            ui.separator();

            ui.strong("Close price range");
            input(ui, "Min", &mut state.inputs.min_close, "e.g. 25");
            input(ui, "Max", &mut state.inputs.max_close, "e.g. 30");
            if ui.button("Filter").clicked() {
                state.run_close_filter();
            }
            ui.separator();

            ui.strong("Low price range");
            input(ui, "Min", &mut state.inputs.min_low, "e.g. 20");
            input(ui, "Max", &mut state.inputs.max_low, "e.g. 25");
            if ui.button("Extract Date, High, Low").clicked() {
                state.run_low_filter();
            }
            ui.separator();

            ui.strong("Trading date");
            input(ui, "Date", &mut state.inputs.date, "YYYY-MM-DD");
            if ui.button("Search").clicked() {
                state.run_date_lookup();
            }
            ui.separator();

            ui.strong("Several dates");
            ui.add(
                TextEdit::multiline(&mut state.inputs.dates)
                    .hint_text("YYYY-MM-DD, YYYY-MM-DD, ...")
                    .desired_rows(2),
            );
            if ui.button("Search dates").clicked() {
                state.run_dates_lookup();
            }
            ui.separator();

            ui.strong("Chart");
            egui::ComboBox::from_id_salt("chart_kind")
                .selected_text(state.chart_kind.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut state.chart_kind, kind, kind.to_string());
                    }
                });
            if ui.button("Draw chart").clicked() {
                state.show_chart();
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – current result
// ---------------------------------------------------------------------------

/// Render whatever the last successful query produced.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Ok(loaded) = state.engine.table() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a price table to begin  (File → Open…)");
        });
        return;
    };

    match &state.view {
        ResultView::Empty => {}
        ResultView::Overview { summary, all } => {
            ui.heading("Overview");
            for line in summary.to_lines() {
                ui.label(line);
            }
            ui.separator();
            table::results_table(ui, &loaded.columns, all);
        }
        ResultView::Rows {
            title,
            result,
            notes,
        } => {
            ui.heading(title);
            for note in notes {
                ui.label(note);
            }
            ui.separator();
            table::results_table(ui, &loaded.columns, result);
        }
        ResultView::Projected { title, result } => {
            ui.heading(title);
            ui.label(format!("Matching records: {}", result.count()));
            ui.separator();
            let columns: Vec<String> = HighLow::COLUMNS.iter().map(|c| c.to_string()).collect();
            table::results_table(ui, &columns, result);
        }
        ResultView::Chart(kind) => {
            ui.heading(format!("{kind} chart"));
            plot::price_chart(ui, loaded, *kind);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Exit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        if let (Some(name), Ok(table)) = (&state.file_name, state.engine.table()) {
            ui.label(format!("Loaded file: {name} ({} records)", table.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open price table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
