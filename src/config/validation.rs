use super::schema::Config;

/// Validate the configuration at startup.
/// Returns all validation errors at once (not just the first).
///
/// Note this is stricter than the engine: the engine silently clamps
/// whatever it is handed, but a config file with a negative day count or a
/// 150% QA percentage is a mistake worth telling the user about before the
/// clamp hides it.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(defaults) = &config.defaults {
        if let Some(inputs) = &defaults.inputs {
            let fields = [
                ("defaults.inputs.dev", inputs.dev),
                ("defaults.inputs.qa", inputs.qa),
                ("defaults.inputs.arch", inputs.arch),
                ("defaults.inputs.pm", inputs.pm),
            ];
            for (name, value) in fields {
                check_non_negative(&mut errors, name, value);
            }
        }

        if let Some(coefficients) = &defaults.coefficients {
            let fields = [
                ("defaults.coefficients.focus_factor", coefficients.focus_factor),
                ("defaults.coefficients.risk_factor", coefficients.risk_factor),
                ("defaults.coefficients.comm_buffer", coefficients.comm_buffer),
            ];
            for (name, value) in fields {
                check_non_negative(&mut errors, name, value);
            }
        }

        if let Some(auto_qa) = &defaults.auto_qa {
            if let Some(percentage) = auto_qa.percentage {
                if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
                    errors.push(format!(
                        "defaults.auto_qa.percentage: must be between 0 and 100, got {}",
                        percentage
                    ));
                }
            }
        }
    }

    if let Some(export) = &config.export {
        if let Some(filename) = &export.filename {
            if filename.trim().is_empty() {
                errors.push("export.filename: must not be empty".to_string());
            }
        }
    }

    if let Some(theme) = &config.theme {
        if !matches!(theme.as_str(), "auto" | "dark" | "light") {
            errors.push(format!(
                "theme: must be one of 'auto', 'dark', 'light', got '{}'",
                theme
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_non_negative(errors: &mut Vec<String>, name: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            errors.push(format!("{}: must be non-negative, got {}", name, v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_valid_full_config() {
        let yaml = r#"
defaults:
  inputs: { dev: 20, arch: 4, pm: 3 }
  coefficients: { focus_factor: 1.2, risk_factor: 0.25, comm_buffer: 0.15 }
  auto_qa: { enabled: true, percentage: 30 }
export:
  filename: md-estimation.csv
theme: auto
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_negative_input_default() {
        let yaml = "defaults: { inputs: { dev: -3 } }";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("defaults.inputs.dev"));
    }

    #[test]
    fn test_percentage_out_of_range() {
        let yaml = "defaults: { auto_qa: { percentage: 150 } }";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("auto_qa.percentage"));
    }

    #[test]
    fn test_unknown_theme() {
        let yaml = "theme: solarized";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("theme"));
    }

    #[test]
    fn test_collects_all_errors() {
        let yaml = r#"
defaults:
  inputs: { dev: -1, pm: -2 }
  auto_qa: { percentage: 101 }
theme: sepia
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
