//! Dashboard figures
//!
//! Labels, tiers and chart geometry for the statistics screen. When the
//! backend can't be reached the screen still renders, using placeholder
//! figures alongside an error line.

use crate::api::{ChartSlice, DashboardData};
use ratatui::style::Color;

pub const LOAD_FAILED: &str = "Failed to load dashboard data";

/// Slice shown when there is nothing to chart
pub const EMPTY_SLICE_LABEL: &str = "No Code Smell";
pub const EMPTY_SLICE_COLOR: &str = "#d1d5db";

/// Figures shown when the stats request fails
pub fn fallback_data() -> DashboardData {
    DashboardData {
        total_smells: 465,
        total_projects: 3,
        code_quality: 33.16,
        chart_data: vec![ChartSlice {
            category: "design".to_string(),
            value: 465,
            color: "#598F43".to_string(),
        }],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    Good,
    Fair,
    NeedsImprovement,
}

impl QualityTier {
    pub fn from_score(quality: f64) -> Self {
        if quality >= 70.0 {
            QualityTier::Good
        } else if quality >= 40.0 {
            QualityTier::Fair
        } else {
            QualityTier::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Good => "Good",
            QualityTier::Fair => "Fair",
            QualityTier::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Label under the total-smells card
pub fn severity_label(total_smells: u64) -> &'static str {
    match total_smells {
        0 => "Low",
        n if n < 50 => "Medium",
        _ => "High",
    }
}

/// `"33.16"`; the backend reports two decimals
pub fn format_quality(quality: f64) -> String {
    format!("{:.2}", quality)
}

/// Gauge fill, clamped to 0..=1
pub fn quality_ratio(quality: f64) -> f64 {
    if quality.is_nan() {
        return 0.0;
    }
    (quality / 100.0).clamp(0.0, 1.0)
}

/// Slices to draw: the data as-is, or a single grey placeholder
pub fn chart_slices(data: &[ChartSlice]) -> Vec<ChartSlice> {
    if data.is_empty() || data.iter().all(|s| s.value == 0) {
        return vec![ChartSlice {
            category: EMPTY_SLICE_LABEL.to_string(),
            value: 1,
            color: EMPTY_SLICE_COLOR.to_string(),
        }];
    }
    data.to_vec()
}

/// Share of each slice in percent, same order as `slices`
pub fn slice_percentages(slices: &[ChartSlice]) -> Vec<f64> {
    let total: u64 = slices.iter().map(|s| s.value).sum();
    if total == 0 {
        return vec![0.0; slices.len()];
    }
    slices
        .iter()
        .map(|s| s.value as f64 * 100.0 / total as f64)
        .collect()
}

/// Split `width` columns among slices proportionally. Non-zero slices are
/// bumped to one column, in order, only while columns remain; the widths
/// always add up to `width`.
pub fn slice_widths(slices: &[ChartSlice], width: u16) -> Vec<u16> {
    let total: u64 = slices.iter().map(|s| s.value).sum();
    if total == 0 || slices.is_empty() {
        return vec![0; slices.len()];
    }
    let mut widths: Vec<u16> = slices
        .iter()
        .map(|s| ((s.value as u128 * width as u128) / total as u128) as u16)
        .collect();
    let mut used: u16 = widths.iter().sum();
    for (w, s) in widths.iter_mut().zip(slices) {
        if used >= width {
            break;
        }
        if *w == 0 && s.value > 0 {
            *w = 1;
            used += 1;
        }
    }
    // leftover rounding goes to the largest slice
    if let Some(idx) = slices
        .iter()
        .enumerate()
        .max_by_key(|(_, s)| s.value)
        .map(|(i, _)| i)
    {
        widths[idx] += width - used;
    }
    widths
}

/// `#RRGGBB` / `#RGB` to a terminal color. Anything else is grey.
pub fn parse_hex_color(hex: &str) -> Color {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Color::Gray;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Color::Gray,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(category: &str, value: u64) -> ChartSlice {
        ChartSlice {
            category: category.to_string(),
            value,
            color: "#598F43".to_string(),
        }
    }

    #[test]
    fn test_fallback_figures() {
        let data = fallback_data();
        assert_eq!(data.total_smells, 465);
        assert_eq!(data.total_projects, 3);
        assert_eq!(format_quality(data.code_quality), "33.16");
        assert_eq!(data.chart_data.len(), 1);
        assert_eq!(data.chart_data[0].category, "design");
    }

    #[test]
    fn test_quality_tiers() {
        assert_eq!(QualityTier::from_score(70.0), QualityTier::Good);
        assert_eq!(QualityTier::from_score(69.99), QualityTier::Fair);
        assert_eq!(QualityTier::from_score(40.0), QualityTier::Fair);
        assert_eq!(QualityTier::from_score(33.16).label(), "Needs Improvement");
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(severity_label(0), "Low");
        assert_eq!(severity_label(49), "Medium");
        assert_eq!(severity_label(50), "High");
        assert_eq!(severity_label(465), "High");
    }

    #[test]
    fn test_empty_chart_placeholder() {
        let slices = chart_slices(&[]);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].category, "No Code Smell");
        assert_eq!(slices[0].value, 1);
        assert_eq!(slice_percentages(&slices), vec![100.0]);
    }

    #[test]
    fn test_percentages() {
        let slices = vec![slice("design", 3), slice("implementation", 1)];
        assert_eq!(slice_percentages(&slices), vec![75.0, 25.0]);
    }

    #[test]
    fn test_widths_fill_exactly() {
        let slices = vec![slice("a", 1000), slice("b", 1), slice("c", 333)];
        let widths = slice_widths(&slices, 40);
        assert_eq!(widths.iter().sum::<u16>(), 40);
        assert!(widths.iter().all(|&w| w >= 1));
    }

    #[test]
    fn test_widths_with_more_slices_than_columns() {
        let slices: Vec<ChartSlice> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|c| slice(c, 10))
            .collect();
        let widths = slice_widths(&slices, 2);
        assert_eq!(widths.iter().sum::<u16>(), 2);
        assert_eq!(widths, vec![1, 1, 0, 0, 0]);
        assert_eq!(slice_widths(&slices, 0).iter().sum::<u16>(), 0);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_hex_color("#598F43"), Color::Rgb(0x59, 0x8f, 0x43));
        assert_eq!(parse_hex_color("#fff"), Color::Rgb(255, 255, 255));
        assert_eq!(parse_hex_color("teal"), Color::Gray);
        assert_eq!(parse_hex_color("#zzzzzz"), Color::Gray);
    }

    #[test]
    fn test_quality_ratio_clamped() {
        assert_eq!(quality_ratio(150.0), 1.0);
        assert_eq!(quality_ratio(-3.0), 0.0);
        assert_eq!(quality_ratio(f64::NAN), 0.0);
    }
}
