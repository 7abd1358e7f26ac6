use super::model::{
    AutoQaConfig, Breakdown, CoefficientField, Coefficients, InputField, Inputs,
};

/// Parse a raw field value into a usable man-day count.
///
/// Unparseable or negative input silently becomes 0. This is a deliberate
/// "never fail, always produce a usable number" policy for a live-editing
/// form, not a validation error: no parse error ever reaches the caller.
///
/// The whole string must be numeric: a partially numeric value like
/// `"12abc"` coerces to 0 rather than salvaging the leading `12`.
pub fn clamp_input(raw: &str) -> f64 {
    let parsed = raw.trim().parse::<f64>().unwrap_or(0.0);
    if parsed.is_finite() {
        parsed.max(0.0)
    } else {
        0.0
    }
}

/// Unweighted sum of the four role inputs, before any coefficient applies.
pub fn compute_base_md(inputs: &Inputs) -> f64 {
    inputs.dev + inputs.qa + inputs.arch + inputs.pm
}

/// Derive the full breakdown from the current inputs and coefficients.
///
/// Pure and infallible: any non-negative inputs/coefficients produce a valid
/// breakdown. The four role efforts plus both buffers sum exactly to
/// `total_md`.
pub fn compute_breakdown(inputs: &Inputs, coefficients: &Coefficients) -> Breakdown {
    let base_md = compute_base_md(inputs);
    let core_effort = base_md * coefficients.focus_factor;
    let risk_buffer = core_effort * coefficients.risk_factor;
    let comm_buffer_md = base_md * coefficients.comm_buffer;

    Breakdown {
        dev_effort: inputs.dev * coefficients.focus_factor,
        qa_effort: inputs.qa * coefficients.focus_factor,
        arch_effort: inputs.arch * coefficients.focus_factor,
        pm_effort: inputs.pm * coefficients.focus_factor,
        risk_buffer,
        comm_buffer_md,
        base_md,
        core_effort,
        total_buffers: risk_buffer + comm_buffer_md,
        total_md: core_effort + risk_buffer + comm_buffer_md,
    }
}

/// Owner of the estimation state and the only mutation path into it.
///
/// Every setter clamps its argument and re-runs the auto-QA recomputation as
/// the last step before returning, so a caller can never observe `qa` derived
/// from a stale `dev` value. `breakdown()` is always computed fresh from the
/// current state; nothing derived is cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimator {
    inputs: Inputs,
    coefficients: Coefficients,
    auto_qa: AutoQaConfig,
}

impl Estimator {
    /// State shown on a fresh start: a worked example rather than a blank
    /// form. Intentionally different from the `reset()` baseline.
    pub fn first_load() -> Self {
        let mut estimator = Self {
            inputs: Inputs {
                dev: 20.0,
                qa: 0.0,
                arch: 4.0,
                pm: 3.0,
            },
            coefficients: Coefficients {
                focus_factor: 1.2,
                risk_factor: 0.25,
                comm_buffer: 0.15,
            },
            auto_qa: AutoQaConfig::default(),
        };
        estimator.recompute_auto_qa();
        estimator
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    pub fn auto_qa(&self) -> &AutoQaConfig {
        &self.auto_qa
    }

    /// Set one input field from raw text, clamping to a non-negative number.
    ///
    /// Direct `qa` writes are silently ignored while auto-QA is enabled; the
    /// derived value wins, with no error.
    pub fn set_input(&mut self, field: InputField, raw: &str) -> &Inputs {
        self.set_input_value(field, clamp_input(raw))
    }

    /// Same as [`set_input`](Self::set_input) but from an already numeric
    /// value (used by the form's nudge keys).
    pub fn set_input_value(&mut self, field: InputField, value: f64) -> &Inputs {
        if field == InputField::Qa && self.auto_qa.enabled {
            return &self.inputs;
        }
        self.inputs.set(field, value.max(0.0));
        self.recompute_auto_qa();
        &self.inputs
    }

    pub fn set_coefficient(&mut self, field: CoefficientField, raw: &str) -> &Coefficients {
        self.set_coefficient_value(field, clamp_input(raw))
    }

    pub fn set_coefficient_value(&mut self, field: CoefficientField, value: f64) -> &Coefficients {
        self.coefficients.set(field, value.max(0.0));
        &self.coefficients
    }

    /// Toggle auto-QA. Enabling forces an immediate recomputation; disabling
    /// leaves the last computed value in place as the new manual baseline.
    pub fn set_auto_qa(&mut self, enabled: bool) -> &AutoQaConfig {
        self.auto_qa.enabled = enabled;
        self.recompute_auto_qa();
        &self.auto_qa
    }

    /// Set the auto-QA percentage, defensively clamped to [0, 100].
    pub fn set_auto_qa_percentage(&mut self, percentage: f64) -> &AutoQaConfig {
        self.auto_qa.percentage = percentage.clamp(0.0, 100.0);
        self.recompute_auto_qa();
        &self.auto_qa
    }

    /// Fresh breakdown for the current state.
    pub fn breakdown(&self) -> Breakdown {
        compute_breakdown(&self.inputs, &self.coefficients)
    }

    /// Reset to the defined baseline: all-zero inputs, neutral coefficients,
    /// auto-QA enabled at 30%. Not the same as the first-load defaults.
    pub fn reset(&mut self) {
        self.inputs = Inputs::zero();
        self.coefficients = Coefficients::neutral();
        self.auto_qa = AutoQaConfig::default();
        self.recompute_auto_qa();
    }

    // The one piece of derived-state logic in the system: keep `qa`
    // consistent with `round(dev * percentage / 100)` while auto-QA is on.
    // Called after every mutation that can touch `dev` or the percentage.
    fn recompute_auto_qa(&mut self) {
        if self.auto_qa.enabled {
            self.inputs.qa = (self.inputs.dev * self.auto_qa.percentage / 100.0).round();
        }
    }
}
