use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed series colours
// ---------------------------------------------------------------------------

pub const POVERTY_COLOR: &str = "#ff9999";
pub const MILLIONAIRES_COLOR: &str = "#66b3ff";
pub const POVERTY_RATE_COLOR: &str = "#87ceeb";

/// Parse `#rrggbb`; anything else falls back to grey.
pub fn hex_color(hex: &str) -> Color32 {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => Color32::from_rgb(r, g, b),
        _ => Color32::GRAY,
    }
}

// ---------------------------------------------------------------------------
// Continuous scale: value → Color32
// ---------------------------------------------------------------------------

/// Evenly spaced Viridis stops, dark purple to yellow.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x47, 0x2d, 0x7b),
    (0x3b, 0x52, 0x8b),
    (0x2c, 0x72, 0x8e),
    (0x21, 0x91, 0x8c),
    (0x28, 0xae, 0x80),
    (0x5e, 0xc9, 0x62),
    (0xad, 0xdc, 0x30),
    (0xfd, 0xe7, 0x25),
];

fn linear(stop: (u8, u8, u8)) -> LinSrgb {
    Srgb::new(stop.0, stop.1, stop.2)
        .into_format::<f32>()
        .into_linear()
}

/// Sample Viridis at `t` in `[0, 1]` (clamped), interpolating in linear RGB.
pub fn viridis(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = (scaled - lo as f64) as f32;

    let mixed = linear(VIRIDIS[lo]).mix(linear(VIRIDIS[lo + 1]), frac);
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Maps a value domain onto Viridis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        ColorScale { min, max }
    }

    /// Position of `value` inside the domain; a flat domain maps to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let range = if self.max > self.min {
            self.max - self.min
        } else {
            1.0
        };
        ((value - self.min) / range).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(hex_color("#ff9999"), Color32::from_rgb(0xff, 0x99, 0x99));
        assert_eq!(hex_color("66b3ff"), Color32::from_rgb(0x66, 0xb3, 0xff));
        assert_eq!(hex_color("#zzz"), Color32::GRAY);
    }

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0.0), Color32::from_rgb(0x44, 0x01, 0x54));
        assert_eq!(viridis(1.0), Color32::from_rgb(0xfd, 0xe7, 0x25));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn scale_normalizes_into_unit_range() {
        let scale = ColorScale::new(0.01, 0.03);
        assert!((scale.normalize(0.02) - 0.5).abs() < 1e-9);
        assert_eq!(scale.normalize(1.0), 1.0);
        assert_eq!(ColorScale::new(0.5, 0.5).normalize(0.5), 0.0);
    }
}
