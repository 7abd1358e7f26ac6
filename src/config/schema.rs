use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::estimate::{CoefficientField, Estimator, InputField};

/// Top-level configuration file contents.
///
/// Everything is optional: a missing file (or an empty one) means the
/// built-in first-load defaults apply unchanged.
///
/// Example YAML:
/// ```yaml
/// defaults:
///   inputs: { dev: 20, arch: 4, pm: 3 }
///   coefficients: { focus_factor: 1.2, risk_factor: 0.25, comm_buffer: 0.15 }
///   auto_qa: { enabled: true, percentage: 30 }
/// export:
///   directory: ~/estimates
///   filename: md-estimation.csv
/// theme: auto
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Values shown when the form first loads, overriding the built-in
    /// worked example.
    #[serde(default)]
    pub defaults: Option<DefaultsConfig>,

    /// CSV export preferences.
    #[serde(default)]
    pub export: Option<ExportConfig>,

    /// TUI theme: "auto" (detect terminal background), "dark", or "light".
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub inputs: Option<InputDefaults>,

    #[serde(default)]
    pub coefficients: Option<CoefficientDefaults>,

    #[serde(default)]
    pub auto_qa: Option<AutoQaDefaults>,
}

/// Default man-day inputs. `qa` only takes effect when auto-QA is disabled;
/// while enabled the derived value wins, same as everywhere else.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InputDefaults {
    #[serde(default)]
    pub dev: Option<f64>,
    #[serde(default)]
    pub qa: Option<f64>,
    #[serde(default)]
    pub arch: Option<f64>,
    #[serde(default)]
    pub pm: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CoefficientDefaults {
    #[serde(default)]
    pub focus_factor: Option<f64>,
    #[serde(default)]
    pub risk_factor: Option<f64>,
    #[serde(default)]
    pub comm_buffer: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutoQaDefaults {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory CSV files are written to (default: current directory).
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// File name for exports (default: md-estimation.csv).
    #[serde(default)]
    pub filename: Option<String>,
}

impl Config {
    /// Build the starting estimator: first-load defaults with any configured
    /// overrides applied through the engine's own setters, so clamping and
    /// the auto-QA recomputation ordering hold for configured values too.
    pub fn build_estimator(&self) -> Estimator {
        let mut estimator = Estimator::first_load();
        let Some(defaults) = &self.defaults else {
            return estimator;
        };

        if let Some(auto_qa) = &defaults.auto_qa {
            if let Some(enabled) = auto_qa.enabled {
                estimator.set_auto_qa(enabled);
            }
            if let Some(percentage) = auto_qa.percentage {
                estimator.set_auto_qa_percentage(percentage);
            }
        }

        if let Some(inputs) = &defaults.inputs {
            if let Some(dev) = inputs.dev {
                estimator.set_input_value(InputField::Dev, dev);
            }
            if let Some(qa) = inputs.qa {
                // Silently ignored while auto-QA is on, by the engine's rule
                estimator.set_input_value(InputField::Qa, qa);
            }
            if let Some(arch) = inputs.arch {
                estimator.set_input_value(InputField::Arch, arch);
            }
            if let Some(pm) = inputs.pm {
                estimator.set_input_value(InputField::Pm, pm);
            }
        }

        if let Some(coefficients) = &defaults.coefficients {
            if let Some(focus_factor) = coefficients.focus_factor {
                estimator.set_coefficient_value(CoefficientField::FocusFactor, focus_factor);
            }
            if let Some(risk_factor) = coefficients.risk_factor {
                estimator.set_coefficient_value(CoefficientField::RiskFactor, risk_factor);
            }
            if let Some(comm_buffer) = coefficients.comm_buffer {
                estimator.set_coefficient_value(CoefficientField::CommBuffer, comm_buffer);
            }
        }

        estimator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.defaults.is_none());
        assert!(config.export.is_none());
        assert!(config.theme.is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
defaults:
  inputs:
    dev: 15
    arch: 2
  coefficients:
    focus_factor: 1.3
  auto_qa:
    enabled: true
    percentage: 40
export:
  filename: sprint-estimate.csv
theme: dark
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let defaults = config.defaults.as_ref().unwrap();
        assert_eq!(defaults.inputs.as_ref().unwrap().dev, Some(15.0));
        assert_eq!(defaults.inputs.as_ref().unwrap().pm, None);
        assert_eq!(
            defaults.coefficients.as_ref().unwrap().focus_factor,
            Some(1.3)
        );
        assert_eq!(defaults.auto_qa.as_ref().unwrap().percentage, Some(40.0));
        assert_eq!(
            config.export.as_ref().unwrap().filename.as_deref(),
            Some("sprint-estimate.csv")
        );
        assert_eq!(config.theme.as_deref(), Some("dark"));
    }

    #[test]
    fn test_build_estimator_without_defaults_is_first_load() {
        let config = Config::default();
        assert_eq!(config.build_estimator(), Estimator::first_load());
    }

    #[test]
    fn test_build_estimator_applies_overrides() {
        let yaml = r#"
defaults:
  inputs:
    dev: 10
  auto_qa:
    percentage: 50
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let estimator = config.build_estimator();
        assert_eq!(estimator.inputs().dev, 10.0);
        assert_eq!(estimator.inputs().qa, 5.0); // derived from the new dev
        assert_eq!(estimator.inputs().arch, 4.0); // first-load value kept
    }

    #[test]
    fn test_build_estimator_manual_qa_override() {
        let yaml = r#"
defaults:
  inputs:
    qa: 8
  auto_qa:
    enabled: false
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let estimator = config.build_estimator();
        assert!(!estimator.auto_qa().enabled);
        assert_eq!(estimator.inputs().qa, 8.0);
    }

    #[test]
    fn test_build_estimator_clamps_configured_values() {
        let yaml = r#"
defaults:
  inputs:
    dev: -5
  coefficients:
    risk_factor: -1
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let estimator = config.build_estimator();
        assert_eq!(estimator.inputs().dev, 0.0);
        assert_eq!(estimator.coefficients().risk_factor, 0.0);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            defaults: Some(DefaultsConfig {
                inputs: Some(InputDefaults {
                    dev: Some(20.0),
                    qa: None,
                    arch: Some(4.0),
                    pm: Some(3.0),
                }),
                coefficients: None,
                auto_qa: Some(AutoQaDefaults {
                    enabled: Some(true),
                    percentage: Some(30.0),
                }),
            }),
            export: None,
            theme: Some("auto".to_string()),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
