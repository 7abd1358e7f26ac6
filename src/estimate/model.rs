use serde::{Deserialize, Serialize};

/// Raw effort inputs, each measured in man-days (MD).
///
/// All four fields are non-negative at all times; values are clamped on the
/// way in, never rejected. `qa` is a derived field while auto-QA is enabled
/// (see [`AutoQaConfig`]) and an independently mutable field otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    pub dev: f64,
    pub qa: f64,
    pub arch: f64,
    pub pm: f64,
}

impl Inputs {
    pub fn zero() -> Self {
        Self {
            dev: 0.0,
            qa: 0.0,
            arch: 0.0,
            pm: 0.0,
        }
    }

    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::Dev => self.dev,
            InputField::Qa => self.qa,
            InputField::Arch => self.arch,
            InputField::Pm => self.pm,
        }
    }

    // Mutation happens only through the Estimator setters, which enforce
    // clamping and the auto-QA recomputation ordering.
    pub(crate) fn set(&mut self, field: InputField, value: f64) {
        match field {
            InputField::Dev => self.dev = value,
            InputField::Qa => self.qa = value,
            InputField::Arch => self.arch = value,
            InputField::Pm => self.pm = value,
        }
    }
}

/// Tunable multipliers applied on top of the raw inputs.
///
/// Each is a dimensionless non-negative number. There is no enforced upper
/// bound here; the form constrains ranges for usability only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub focus_factor: f64,
    pub risk_factor: f64,
    pub comm_buffer: f64,
}

impl Coefficients {
    /// Neutral coefficients: focus 1.0, no buffers. This is the reset
    /// baseline, distinct from the first-load defaults.
    pub fn neutral() -> Self {
        Self {
            focus_factor: 1.0,
            risk_factor: 0.0,
            comm_buffer: 0.0,
        }
    }

    pub fn get(&self, field: CoefficientField) -> f64 {
        match field {
            CoefficientField::FocusFactor => self.focus_factor,
            CoefficientField::RiskFactor => self.risk_factor,
            CoefficientField::CommBuffer => self.comm_buffer,
        }
    }

    pub(crate) fn set(&mut self, field: CoefficientField, value: f64) {
        match field {
            CoefficientField::FocusFactor => self.focus_factor = value,
            CoefficientField::RiskFactor => self.risk_factor = value,
            CoefficientField::CommBuffer => self.comm_buffer = value,
        }
    }
}

/// Auto-QA configuration.
///
/// While `enabled` is true, `Inputs::qa` is not independently settable; it is
/// always `round(dev * percentage / 100)` and direct writes are silently
/// ignored. Disabling leaves the last computed value in place as the new
/// manual baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoQaConfig {
    pub enabled: bool,
    /// Percentage of `dev`, clamped to [0, 100].
    pub percentage: f64,
}

impl Default for AutoQaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            percentage: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Dev,
    Qa,
    Arch,
    Pm,
}

impl InputField {
    pub const ALL: [InputField; 4] = [
        InputField::Dev,
        InputField::Qa,
        InputField::Arch,
        InputField::Pm,
    ];

    /// Label used in the form and the export table.
    pub fn label(&self) -> &'static str {
        match self {
            InputField::Dev => "Development (MD)",
            InputField::Qa => "QA (MD)",
            InputField::Arch => "Architecture/Research (MD)",
            InputField::Pm => "PM/BA/Management (MD)",
        }
    }

    /// Increment used by the form's nudge keys (mirrors the number inputs'
    /// step of half a man-day).
    pub fn step(&self) -> f64 {
        0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientField {
    FocusFactor,
    RiskFactor,
    CommBuffer,
}

impl CoefficientField {
    pub const ALL: [CoefficientField; 3] = [
        CoefficientField::FocusFactor,
        CoefficientField::RiskFactor,
        CoefficientField::CommBuffer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CoefficientField::FocusFactor => "Focus Factor",
            CoefficientField::RiskFactor => "Risk Factor",
            CoefficientField::CommBuffer => "Communication Buffer",
        }
    }

    pub fn step(&self) -> f64 {
        0.05
    }
}

/// Fully derived projection of (Inputs, Coefficients). Never stored; always
/// recomputed from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakdown {
    /// Per-role efforts: raw input x focus factor.
    pub dev_effort: f64,
    pub qa_effort: f64,
    pub arch_effort: f64,
    pub pm_effort: f64,
    /// core_effort x risk_factor. Not attributed to any role.
    pub risk_buffer: f64,
    /// base_md x comm_buffer. Not attributed to any role.
    pub comm_buffer_md: f64,
    /// Unweighted sum of the four raw inputs.
    pub base_md: f64,
    /// base_md x focus_factor.
    pub core_effort: f64,
    pub total_buffers: f64,
    pub total_md: f64,
}

impl Breakdown {
    /// The six chart categories, in fixed order. The four role efforts plus
    /// the two buffers sum exactly to `total_md` (buffers are computed from
    /// base/core effort, never per role, so nothing is double-counted).
    pub fn categories(&self) -> [(&'static str, f64); 6] {
        [
            ("Development", self.dev_effort),
            ("QA", self.qa_effort),
            ("Arch/Research", self.arch_effort),
            ("PM/BA/Management", self.pm_effort),
            ("Risk Buffer", self.risk_buffer),
            ("Communication Buffer", self.comm_buffer_md),
        ]
    }

    /// Categories with zero-valued entries filtered out, for charting.
    pub fn chart_series(&self) -> Vec<(&'static str, f64)> {
        self.categories()
            .into_iter()
            .filter(|(_, value)| *value > 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_inputs() {
        let inputs = Inputs::zero();
        for field in InputField::ALL {
            assert_eq!(inputs.get(field), 0.0);
        }
    }

    #[test]
    fn test_neutral_coefficients() {
        let c = Coefficients::neutral();
        assert_eq!(c.focus_factor, 1.0);
        assert_eq!(c.risk_factor, 0.0);
        assert_eq!(c.comm_buffer, 0.0);
    }

    #[test]
    fn test_auto_qa_default() {
        let auto_qa = AutoQaConfig::default();
        assert!(auto_qa.enabled);
        assert_eq!(auto_qa.percentage, 30.0);
    }

    #[test]
    fn test_field_get_set_roundtrip() {
        let mut inputs = Inputs::zero();
        inputs.set(InputField::Arch, 4.5);
        assert_eq!(inputs.get(InputField::Arch), 4.5);
        assert_eq!(inputs.get(InputField::Dev), 0.0);

        let mut coefficients = Coefficients::neutral();
        coefficients.set(CoefficientField::RiskFactor, 0.25);
        assert_eq!(coefficients.get(CoefficientField::RiskFactor), 0.25);
    }

    #[test]
    fn test_chart_series_filters_zero_categories() {
        let breakdown = Breakdown {
            dev_effort: 24.0,
            qa_effort: 0.0,
            arch_effort: 4.8,
            pm_effort: 0.0,
            risk_buffer: 7.2,
            comm_buffer_md: 0.0,
            base_md: 24.0,
            core_effort: 28.8,
            total_buffers: 7.2,
            total_md: 36.0,
        };
        let series = breakdown.chart_series();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].0, "Development");
        assert_eq!(series[1].0, "Arch/Research");
        assert_eq!(series[2].0, "Risk Buffer");
    }
}
