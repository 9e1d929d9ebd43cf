use std::fmt;

use eframe::egui::{Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot};

use crate::color::{self, VOLUME};
use crate::config::{LONG_MA_WINDOW, SHORT_MA_WINDOW};
use crate::data::indicators::simple_moving_average;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Candlestick,
    Volume,
    MovingAverage,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Candlestick,
        ChartKind::Volume,
        ChartKind::MovingAverage,
    ];

    fn y_label(self) -> &'static str {
        match self {
            ChartKind::Volume => "Volume",
            _ => "Price",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChartKind::Line => "Line",
            ChartKind::Candlestick => "Candlestick",
            ChartKind::Volume => "Volume",
            ChartKind::MovingAverage => "Moving Average",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Series building
// ---------------------------------------------------------------------------

/// `[x, y]` points with the row index as x. `None` values are skipped, which
/// leaves a gap at the start of a moving average.
fn indexed_points(values: impl IntoIterator<Item = Option<f64>>) -> Vec<[f64; 2]> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|y| [i as f64, y]))
        .collect()
}

fn candles(table: &Table) -> Vec<BoxElem> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let c = color::candle_color(row.is_bullish());
            let body_low = row.open.min(row.close);
            let body_high = row.open.max(row.close);
            BoxElem::new(
                i as f64,
                BoxSpread::new(row.low, body_low, row.close, body_high, row.high),
            )
            .name(&row.date)
            .fill(c)
            .stroke(Stroke::new(1.0, c))
            .box_width(0.6)
            .whisker_width(0.0)
        })
        .collect()
}

fn volume_bars(table: &Table) -> Vec<Bar> {
    table
        .volumes()
        .into_iter()
        .enumerate()
        .map(|(i, volume)| Bar::new(i as f64, volume).width(0.6).fill(VOLUME))
        .collect()
}

// ---------------------------------------------------------------------------
// Price chart (central panel)
// ---------------------------------------------------------------------------

/// Render the selected chart over the whole table.
pub fn price_chart(ui: &mut Ui, table: &Table, kind: ChartKind) {
    let dates: Vec<String> = table.rows.iter().map(|r| r.date.clone()).collect();

    Plot::new("price_chart")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(kind.y_label())
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if idx < 0.0 || (idx - mark.value).abs() > f64::EPSILON {
                return String::new();
            }
            dates.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| match kind {
            ChartKind::Line => {
                for (name, c) in color::series_colors(&["Close"]) {
                    let points = indexed_points(table.rows.iter().map(|r| Some(r.close)));
                    plot_ui.line(Line::new(points).name(name).color(c).width(1.5));
                }
            }
            ChartKind::Candlestick => {
                plot_ui.box_plot(BoxPlot::new(candles(table)).name("OHLC"));
            }
            ChartKind::Volume => {
                plot_ui.bar_chart(BarChart::new(volume_bars(table)).name("Volume"));
            }
            ChartKind::MovingAverage => {
                let closes = table.closes();
                let short_name = format!("MA{SHORT_MA_WINDOW}");
                let long_name = format!("MA{LONG_MA_WINDOW}");
                let series = [
                    closes.iter().map(|&c| Some(c)).collect::<Vec<_>>(),
                    simple_moving_average(&closes, SHORT_MA_WINDOW),
                    simple_moving_average(&closes, LONG_MA_WINDOW),
                ];
                let colors = color::series_colors(&["Close", short_name.as_str(), long_name.as_str()]);
                for (values, (name, c)) in series.into_iter().zip(colors) {
                    plot_ui.line(Line::new(indexed_points(values)).name(name).color(c).width(1.5));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::Row;

    fn table(n: usize) -> Table {
        let rows = (0..n)
            .map(|i| Row {
                date: format!("2019-01-{:02}", i + 1),
                open: 10.0,
                high: 12.0,
                low: 9.0,
                close: if i % 2 == 0 { 11.0 } else { 9.5 },
                volume: 100.0 * i as f64,
                extra: BTreeMap::new(),
            })
            .collect();
        Table::new(Vec::new(), rows)
    }

    #[test]
    fn chart_labels_match_menu_names() {
        let labels: Vec<String> = ChartKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["Line", "Candlestick", "Volume", "Moving Average"]);
    }

    #[test]
    fn gaps_are_skipped() {
        let points = indexed_points([None, None, Some(1.0), Some(2.0)]);
        let xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![2.0, 3.0]);
    }

    #[test]
    fn one_candle_and_bar_per_row() {
        let t = table(5);
        assert_eq!(candles(&t).len(), 5);
        let bars = volume_bars(&t);
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[3].value, 300.0);
    }
}
