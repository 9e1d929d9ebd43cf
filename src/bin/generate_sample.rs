use serde::Serialize;
use stock_explorer::config::DEFAULT_DATA_FILE;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Weekdays from 2018-01-02 (a Tuesday) onwards, as `YYYY-MM-DD`.
fn trading_days(count: usize) -> Vec<String> {
    fn days_in_month(year: u32, month: u32) -> u32 {
        match month {
            2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    let (mut year, mut month, mut day) = (2018u32, 1u32, 2u32);
    let mut weekday = 1u32; // 0 = Monday
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        if weekday < 5 {
            out.push(format!("{year:04}-{month:02}-{day:02}"));
        }
        weekday = (weekday + 1) % 7;
        day += 1;
        if day > days_in_month(year, month) {
            day = 1;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
    }
    out
}

#[derive(Serialize)]
struct SampleRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: u64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

    let days = trading_days(750);
    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");

    // Geometric random walk around 25.0 with ~2% daily moves
    let mut close = 25.0_f64;
    for date in &days {
        let open = close * (1.0 + rng.gauss(0.0, 0.005));
        close = (open * (1.0 + rng.gauss(0.0003, 0.02))).max(1.0);
        let high = open.max(close) * (1.0 + rng.next_f64() * 0.015);
        let low = open.min(close) * (1.0 - rng.next_f64() * 0.015);
        let volume = (rng.gauss(2_000_000.0, 600_000.0).abs()) as u64;

        writer
            .serialize(SampleRow {
                date: date.clone(),
                open: round2(open),
                high: round2(high),
                low: round2(low),
                close: round2(close),
                volume,
            })
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {} trading days to {output_path}", days.len());
}
