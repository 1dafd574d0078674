//! Magnitude color classification.
//!
//! Bands are half-open `[lo, hi)` except the last, which is closed at 20.0.
//! A boundary value such as 2.5 therefore always belongs to the band that
//! starts there.

pub const COLOR_MINOR: &str = "#0071BC";
pub const COLOR_LIGHT: &str = "#35BC00";
pub const COLOR_MODERATE: &str = "#BCBC00";
pub const COLOR_STRONG: &str = "#BC3500";
pub const COLOR_GREAT: &str = "#BC0000";
pub const COLOR_FALLBACK: &str = "#E2FFAE";

const TOP_BAND_MAX: f64 = 20.0;

// (lower bound, upper bound exclusive, color)
const BANDS: [(f64, f64, &str); 4] = [
    (1.0, 2.5, COLOR_MINOR),
    (2.5, 4.0, COLOR_LIGHT),
    (4.0, 5.5, COLOR_MODERATE),
    (5.5, 8.0, COLOR_STRONG),
];

/// Picks the marker color for a magnitude. Absent, NaN, negative and
/// out-of-range values get the fallback color.
pub fn choose_color(value: Option<f64>) -> &'static str {
    let Some(mag) = value else {
        return COLOR_FALLBACK;
    };

    for (lo, hi, color) in BANDS {
        if lo <= mag && mag < hi {
            return color;
        }
    }

    if (8.0..=TOP_BAND_MAX).contains(&mag) {
        COLOR_GREAT
    } else {
        COLOR_FALLBACK
    }
}
