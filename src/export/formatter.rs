use std::io::IsTerminal;

use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::estimate::{AutoQaConfig, Breakdown, Coefficients, Inputs};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// One-line totals summary: base, core, buffers, total.
pub fn format_summary(breakdown: &Breakdown, use_colors: bool) -> String {
    if use_colors {
        format!(
            "Base MD: {}  Core Effort: {}  Buffers: {}  Total MD: {}",
            format!("{:.1}", breakdown.base_md).cyan(),
            format!("{:.1}", breakdown.core_effort).green(),
            format!("{:.1}", breakdown.total_buffers).yellow(),
            format!("{:.1}", breakdown.total_md).bold()
        )
    } else {
        format!(
            "Base MD: {:.1}  Core Effort: {:.1}  Buffers: {:.1}  Total MD: {:.1}",
            breakdown.base_md, breakdown.core_effort, breakdown.total_buffers, breakdown.total_md
        )
    }
}

/// Format the six-category distribution as an aligned table with share bars,
/// one category per line: `{label}  {value} MD  {bar}  {share}%`.
///
/// Zero-valued categories are omitted, matching the chart. Bars are dropped
/// entirely in narrow terminals rather than squeezed.
pub fn format_breakdown_table(breakdown: &Breakdown, use_colors: bool) -> String {
    let series = breakdown.chart_series();
    if series.is_empty() {
        return "Nothing to estimate yet.".to_string();
    }

    let label_width = series
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    let bar_width = match get_terminal_width() {
        Some(width) if width > label_width + 30 => (width - label_width - 22).min(24),
        Some(_) => 0,
        None => 24, // pipe: fixed width, no colors anyway
    };

    let total = breakdown.total_md;

    series
        .iter()
        .map(|(label, value)| {
            let share = if total > 0.0 { value / total } else { 0.0 };
            let value_str = format!("{:>6.1} MD", value);
            let share_str = format!("{:>5.1}%", share * 100.0);
            let bar = share_bar(share, bar_width);

            if use_colors {
                format!(
                    "{:<width$}  {}  {}  {}",
                    label,
                    value_str.bold(),
                    bar,
                    share_str.dimmed(),
                    width = label_width
                )
            } else {
                format!(
                    "{:<width$}  {}  {}  {}",
                    label,
                    value_str,
                    bar,
                    share_str,
                    width = label_width
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn share_bar(share: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let filled = (share.clamp(0.0, 1.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Format categories and totals as tab-separated values for scripting.
/// Columns: label, man-days (one decimal). No headers, no colors.
pub fn format_tsv(breakdown: &Breakdown) -> String {
    let mut lines: Vec<String> = breakdown
        .categories()
        .iter()
        .map(|(label, value)| format!("{}\t{:.1}", label, value))
        .collect();
    lines.push(format!("Base MD\t{:.1}", breakdown.base_md));
    lines.push(format!("Core Effort\t{:.1}", breakdown.core_effort));
    lines.push(format!("Total Buffers\t{:.1}", breakdown.total_buffers));
    lines.push(format!("Total MD\t{:.1}", breakdown.total_md));
    lines.join("\n")
}

#[derive(Serialize)]
struct Snapshot<'a> {
    inputs: &'a Inputs,
    coefficients: &'a Coefficients,
    auto_qa: &'a AutoQaConfig,
    breakdown: &'a Breakdown,
}

/// Full state snapshot as pretty JSON, for piping into other tools.
pub fn format_json(
    inputs: &Inputs,
    coefficients: &Coefficients,
    auto_qa: &AutoQaConfig,
    breakdown: &Breakdown,
) -> anyhow::Result<String> {
    let snapshot = Snapshot {
        inputs,
        coefficients,
        auto_qa,
        breakdown,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::Estimator;

    #[test]
    fn test_summary_without_colors() {
        let estimator = Estimator::first_load();
        let summary = format_summary(&estimator.breakdown(), false);
        assert_eq!(
            summary,
            "Base MD: 33.0  Core Effort: 39.6  Buffers: 14.8  Total MD: 54.4"
        );
    }

    #[test]
    fn test_breakdown_table_lists_nonzero_categories() {
        let estimator = Estimator::first_load();
        let table = format_breakdown_table(&estimator.breakdown(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6); // all six categories non-zero on first load
        assert!(lines[0].starts_with("Development"));
        assert!(lines[5].starts_with("Communication Buffer"));
    }

    #[test]
    fn test_breakdown_table_empty_state() {
        let mut estimator = Estimator::first_load();
        estimator.reset();
        let table = format_breakdown_table(&estimator.breakdown(), false);
        assert_eq!(table, "Nothing to estimate yet.");
    }

    #[test]
    fn test_share_bar_proportions() {
        assert_eq!(share_bar(0.0, 4), "░░░░");
        assert_eq!(share_bar(0.5, 4), "██░░");
        assert_eq!(share_bar(1.0, 4), "████");
        assert_eq!(share_bar(0.5, 0), "");
    }

    #[test]
    fn test_tsv_has_all_categories_and_totals() {
        let estimator = Estimator::first_load();
        let tsv = format_tsv(&estimator.breakdown());
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 10); // 6 categories + 4 totals
        assert_eq!(lines[0], "Development\t24.0");
        assert_eq!(lines[9], "Total MD\t54.4");
    }

    #[test]
    fn test_json_snapshot_round_trips() {
        let estimator = Estimator::first_load();
        let breakdown = estimator.breakdown();
        let json = format_json(
            estimator.inputs(),
            estimator.coefficients(),
            estimator.auto_qa(),
            &breakdown,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["inputs"]["dev"], 20.0);
        assert_eq!(value["auto_qa"]["percentage"], 30.0);
        assert!((value["breakdown"]["total_md"].as_f64().unwrap() - 54.45).abs() < 1e-9);
    }
}
