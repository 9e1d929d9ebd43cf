use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Candle body for a day that closed at or above its open.
pub const BULLISH: Color32 = Color32::from_rgb(38, 166, 91);
/// Candle body for a day that closed below its open.
pub const BEARISH: Color32 = Color32::from_rgb(214, 69, 65);
pub const VOLUME: Color32 = Color32::from_rgb(90, 140, 200);

/// Colour of a candle given its direction.
pub fn candle_color(bullish: bool) -> Color32 {
    if bullish { BULLISH } else { BEARISH }
}

/// One distinct colour per named series, in order.
pub fn series_colors<'a>(names: &[&'a str]) -> Vec<(&'a str, Color32)> {
    names
        .iter()
        .copied()
        .zip(generate_palette(names.len()))
        .collect()
}
