use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Tabular;
use crate::data::query::FilterResult;
use crate::render::POSITION_COLUMN;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Results grid (central panel)
// ---------------------------------------------------------------------------

/// Render a result as a scrollable grid, original positions first.
pub fn results_table<R: Tabular>(ui: &mut Ui, columns: &[String], result: &FilterResult<R>) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(40.0))
        .columns(Column::auto().at_least(70.0), columns.len())
        .min_scrolled_height(0.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(POSITION_COLUMN);
            });
            for name in columns {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, result.count(), |mut row| {
                let idx = row.index();
                let position = result.positions()[idx];
                let record = &result.rows()[idx];
                row.col(|ui| {
                    ui.label(position.to_string());
                });
                for name in columns {
                    row.col(|ui| {
                        ui.label(record.cell(name).to_string());
                    });
                }
            });
        });
}
