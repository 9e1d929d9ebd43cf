use serde::Serialize;

use super::model::Table;

/// Trailing simple moving average. Positions before the window fills are
/// `None`, so a chart can leave them as a gap. A window holding a non-finite
/// value is also `None`; the average recovers once that value leaves it.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }
    let mut out = vec![None; window - 1];
    out.extend(values.windows(window).map(|w| {
        w.iter()
            .all(|v| v.is_finite())
            .then(|| w.iter().sum::<f64>() / window as f64)
    }));
    out
}

/// Headline numbers shown when a table is opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub max_close: Option<f64>,
    pub min_close: Option<f64>,
    pub mean_close: Option<f64>,
}

impl Summary {
    pub fn of(table: &Table) -> Self {
        let closes = table.closes();
        if closes.is_empty() {
            return Summary {
                count: 0,
                max_close: None,
                min_close: None,
                mean_close: None,
            };
        }
        let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = closes.iter().sum::<f64>() / closes.len() as f64;
        Summary {
            count: closes.len(),
            max_close: Some(max),
            min_close: Some(min),
            mean_close: Some(mean),
        }
    }

    /// Multi-line text block, one figure per line.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Total records: {}", self.count)];
        if let (Some(max), Some(min), Some(mean)) = (self.max_close, self.min_close, self.mean_close)
        {
            lines.push(format!("Highest close: {max}"));
            lines.push(format!("Lowest close: {min}"));
            lines.push(format!("Mean close: {mean:.2}"));
        }
        lines
    }
}
