use serde::Serialize;

use crate::classify::choose_color;
use crate::constants::{LEGEND_POSITION, LEGEND_SWATCH_OFFSET, LEGEND_TITLE};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub lower: f64,
    pub upper: Option<f64>,
    pub color: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: &'static str,
    pub title: &'static str,
    pub entries: Vec<LegendEntry>,
    pub html: String,
}

/// Builds one row per breakpoint. Each row spans up to the next breakpoint;
/// the last one is open-ended and labeled with a trailing `+`.
pub fn build_legend(breakpoints: &[f64]) -> Legend {
    let entries: Vec<LegendEntry> = breakpoints
        .iter()
        .enumerate()
        .map(|(i, &lower)| {
            let upper = breakpoints.get(i + 1).copied();
            let label = match upper {
                Some(upper) => format!("{}&ndash;{}", lower, upper),
                None => format!("{}+", lower),
            };
            LegendEntry {
                lower,
                upper,
                color: choose_color(Some(lower + LEGEND_SWATCH_OFFSET)),
                label,
            }
        })
        .collect();

    let html = render_legend_html(&entries);

    Legend {
        position: LEGEND_POSITION,
        title: LEGEND_TITLE,
        entries,
        html,
    }
}

fn render_legend_html(entries: &[LegendEntry]) -> String {
    let rows: String = entries
        .iter()
        .map(|entry| {
            format!(
                "<ul style=\"background-color:{}\"> <span>{}</span></ul>",
                entry.color, entry.label
            )
        })
        .collect();

    format!("<h4>{}</h4><ul>{}</ul>", LEGEND_TITLE, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LEGEND_BREAKPOINTS;

    #[test]
    fn five_rows_with_open_top_band() {
        let legend = build_legend(&LEGEND_BREAKPOINTS);
        assert_eq!(legend.entries.len(), 5);

        let last = legend.entries.last().unwrap();
        assert_eq!(last.label, "8+");
        assert_eq!(last.upper, None);

        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            ["1&ndash;2.5", "2.5&ndash;4", "4&ndash;5.5", "5.5&ndash;8", "8+"]
        );
    }

    #[test]
    fn swatches_are_sampled_above_each_breakpoint() {
        let legend = build_legend(&LEGEND_BREAKPOINTS);
        let colors: Vec<&str> = legend.entries.iter().map(|e| e.color).collect();
        // 2.0, 3.5, 5.0, 6.5, 9.0
        assert_eq!(colors, ["#0071BC", "#35BC00", "#BCBC00", "#BC3500", "#BC0000"]);
    }

    #[test]
    fn html_has_one_row_per_entry() {
        let legend = build_legend(&LEGEND_BREAKPOINTS);
        assert!(legend.html.starts_with("<h4>Magnitude</h4>"));
        assert_eq!(legend.html.matches("<ul style=").count(), 5);
        assert!(legend.html.contains("<span>8+</span>"));
        assert_eq!(legend.position, "bottomright");
    }
}
