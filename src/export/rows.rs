use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::estimate::{Breakdown, Coefficients, Inputs};

/// First row of every export, before the 14 data rows.
pub const CSV_HEADER: &str = "Parameter,Value";

/// Default export file name, written to the export directory.
pub const DEFAULT_FILENAME: &str = "md-estimation.csv";

/// Build the fixed 14-row (label, value) export table: 4 inputs, 3
/// coefficients, a blank separator, the `Results` section marker, and 5
/// result rows. Raw inputs and coefficients are emitted as-is (trimmed
/// numeric display); results are formatted to one decimal place.
///
/// The order and labels are a compatibility contract with downstream
/// spreadsheet consumers. Do not reorder.
pub fn export_rows(
    inputs: &Inputs,
    coefficients: &Coefficients,
    breakdown: &Breakdown,
) -> Vec<(String, String)> {
    vec![
        ("Development (MD)".to_string(), format_raw(inputs.dev)),
        ("QA (MD)".to_string(), format_raw(inputs.qa)),
        (
            "Architecture/Research (MD)".to_string(),
            format_raw(inputs.arch),
        ),
        ("PM/BA/Management (MD)".to_string(), format_raw(inputs.pm)),
        (
            "Focus Factor".to_string(),
            format_raw(coefficients.focus_factor),
        ),
        (
            "Risk Factor".to_string(),
            format_raw(coefficients.risk_factor),
        ),
        (
            "Communication Buffer".to_string(),
            format_raw(coefficients.comm_buffer),
        ),
        (String::new(), String::new()),
        ("Results".to_string(), String::new()),
        ("Base MD".to_string(), format!("{:.1}", breakdown.base_md)),
        (
            "Core Effort (after Focus)".to_string(),
            format!("{:.1}", breakdown.core_effort),
        ),
        (
            "Risk Buffer".to_string(),
            format!("{:.1}", breakdown.risk_buffer),
        ),
        (
            "Communication Buffer".to_string(),
            format!("{:.1}", breakdown.comm_buffer_md),
        ),
        ("Total MD".to_string(), format!("{:.1}", breakdown.total_md)),
    ]
}

// Trimmed numeric display: 20 stays "20", 1.2 stays "1.2", no forced decimals.
fn format_raw(value: f64) -> String {
    format!("{}", value)
}

/// Serialize the export rows as comma-separated text, UTF-8, no trailing
/// metadata. The blank separator row becomes an empty line.
pub fn to_csv(rows: &[(String, String)]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for (label, value) in rows {
        if label.is_empty() && value.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{},{}", label, value));
        }
    }
    lines.join("\n")
}

/// Resolve the export file path from config (directory defaults to the
/// current directory, file name to [`DEFAULT_FILENAME`]).
pub fn resolve_export_path(export: Option<&ExportConfig>) -> PathBuf {
    let directory = export
        .and_then(|e| e.directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let filename = export
        .and_then(|e| e.filename.clone())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    directory.join(filename)
}

/// Write the export CSV atomically, so a failed write never leaves a
/// truncated file behind.
pub fn write_csv(
    path: &Path,
    inputs: &Inputs,
    coefficients: &Coefficients,
    breakdown: &Breakdown,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create export directory {}", parent.display())
            })?;
        }
    }

    let csv = to_csv(&export_rows(inputs, coefficients, breakdown));

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open export file at {}", path.display()))?;
    file.write_all(csv.as_bytes())
        .context("Failed to write export data")?;
    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::Estimator;

    #[test]
    fn test_exactly_fourteen_rows_in_fixed_order() {
        let estimator = Estimator::first_load();
        let rows = export_rows(
            estimator.inputs(),
            estimator.coefficients(),
            &estimator.breakdown(),
        );
        assert_eq!(rows.len(), 14);

        let labels: Vec<&str> = rows.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Development (MD)",
                "QA (MD)",
                "Architecture/Research (MD)",
                "PM/BA/Management (MD)",
                "Focus Factor",
                "Risk Factor",
                "Communication Buffer",
                "",
                "Results",
                "Base MD",
                "Core Effort (after Focus)",
                "Risk Buffer",
                "Communication Buffer",
                "Total MD",
            ]
        );
    }

    #[test]
    fn test_raw_values_emitted_as_is() {
        let estimator = Estimator::first_load();
        let rows = export_rows(
            estimator.inputs(),
            estimator.coefficients(),
            &estimator.breakdown(),
        );
        assert_eq!(rows[0].1, "20"); // no forced decimals
        assert_eq!(rows[1].1, "6");
        assert_eq!(rows[4].1, "1.2");
        assert_eq!(rows[5].1, "0.25");
    }

    #[test]
    fn test_results_formatted_to_one_decimal() {
        let estimator = Estimator::first_load();
        let rows = export_rows(
            estimator.inputs(),
            estimator.coefficients(),
            &estimator.breakdown(),
        );
        assert_eq!(rows[9], ("Base MD".to_string(), "33.0".to_string()));
        assert_eq!(rows[10].1, "39.6");
        assert_eq!(rows[11].1, "9.9");
        // 33 * 0.15 lands just below 4.95 in binary, so one decimal shows 4.9
        assert_eq!(rows[12].1, "4.9");
        assert_eq!(rows[13].1, "54.4");
    }

    #[test]
    fn test_csv_layout() {
        let estimator = Estimator::first_load();
        let csv = to_csv(&export_rows(
            estimator.inputs(),
            estimator.coefficients(),
            &estimator.breakdown(),
        ));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 15); // header + 14 rows
        assert_eq!(lines[0], "Parameter,Value");
        assert_eq!(lines[1], "Development (MD),20");
        assert_eq!(lines[8], ""); // blank separator
        assert_eq!(lines[9], "Results,");
        assert_eq!(lines[14], "Total MD,54.4");
    }

    #[test]
    fn test_csv_round_trip_reproduces_breakdown() {
        let estimator = Estimator::first_load();
        let breakdown = estimator.breakdown();
        let csv = to_csv(&export_rows(
            estimator.inputs(),
            estimator.coefficients(),
            &breakdown,
        ));

        // Parse back as a (label, value) table and compare at the displayed
        // decimal precision
        let parsed: Vec<(&str, &str)> = csv
            .lines()
            .skip(1)
            .filter(|line| !line.is_empty())
            .map(|line| line.split_once(',').unwrap())
            .collect();

        let lookup = |label: &str| -> f64 {
            parsed
                .iter()
                .rev() // "Communication Buffer" appears twice; results come last
                .find(|(l, _)| *l == label)
                .unwrap()
                .1
                .parse()
                .unwrap()
        };

        assert!((lookup("Base MD") - breakdown.base_md).abs() < 0.05);
        assert!((lookup("Core Effort (after Focus)") - breakdown.core_effort).abs() < 0.05);
        assert!((lookup("Risk Buffer") - breakdown.risk_buffer).abs() < 0.05);
        assert!((lookup("Communication Buffer") - breakdown.comm_buffer_md).abs() < 0.05);
        assert!((lookup("Total MD") - breakdown.total_md).abs() < 0.05);
    }

    #[test]
    fn test_resolve_export_path_defaults() {
        let path = resolve_export_path(None);
        assert_eq!(path, PathBuf::from("./md-estimation.csv"));
    }

    #[test]
    fn test_resolve_export_path_from_config() {
        let export = ExportConfig {
            directory: Some(PathBuf::from("/tmp/estimates")),
            filename: Some("sprint.csv".to_string()),
        };
        let path = resolve_export_path(Some(&export));
        assert_eq!(path, PathBuf::from("/tmp/estimates/sprint.csv"));
    }

    #[test]
    fn test_write_and_read_back() {
        let temp_path = std::env::temp_dir().join("md_estimator_test_export.csv");
        let _ = std::fs::remove_file(&temp_path);

        let estimator = Estimator::first_load();
        write_csv(
            &temp_path,
            estimator.inputs(),
            estimator.coefficients(),
            &estimator.breakdown(),
        )
        .unwrap();

        let contents = std::fs::read_to_string(&temp_path).unwrap();
        assert!(contents.starts_with("Parameter,Value\n"));
        assert!(contents.ends_with("Total MD,54.4"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
