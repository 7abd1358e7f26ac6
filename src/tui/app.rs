use std::time::Instant;

use crate::config::Config;
use crate::estimate::{clamp_input, CoefficientField, Estimator, InputField};
use crate::export;
use crate::tui::theme::ThemeColors;

/// One navigable row of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Dev,
    Qa,
    Arch,
    Pm,
    FocusFactor,
    RiskFactor,
    CommBuffer,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Dev,
        FormField::Qa,
        FormField::Arch,
        FormField::Pm,
        FormField::FocusFactor,
        FormField::RiskFactor,
        FormField::CommBuffer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Dev => InputField::Dev.label(),
            FormField::Qa => InputField::Qa.label(),
            FormField::Arch => InputField::Arch.label(),
            FormField::Pm => InputField::Pm.label(),
            FormField::FocusFactor => CoefficientField::FocusFactor.label(),
            FormField::RiskFactor => CoefficientField::RiskFactor.label(),
            FormField::CommBuffer => CoefficientField::CommBuffer.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Help,
}

/// The two chart renderings of the same six categories: proportional share
/// bars or an absolute bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    Share,
    Bars,
}

pub struct App {
    pub estimator: Estimator,
    pub selected: usize,
    pub input_mode: InputMode,
    pub edit_buffer: String,
    pub chart_view: ChartView,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub config: Config,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(config: Config, theme: ThemeColors) -> Self {
        let estimator = config.build_estimator();
        Self {
            estimator,
            selected: 0,
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            chart_view: ChartView::Share,
            flash_message: None,
            should_quit: false,
            config,
            theme,
        }
    }

    pub fn selected_field(&self) -> FormField {
        FormField::ALL[self.selected]
    }

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % FormField::ALL.len();
    }

    pub fn previous_field(&mut self) {
        self.selected = if self.selected == 0 {
            FormField::ALL.len() - 1
        } else {
            self.selected - 1
        };
    }

    /// The value the selected row currently displays and edits. For the QA
    /// row this is the percentage while auto-QA is on, man-days otherwise.
    pub fn field_value(&self, field: FormField) -> f64 {
        match field {
            FormField::Dev => self.estimator.inputs().dev,
            FormField::Qa => {
                if self.estimator.auto_qa().enabled {
                    self.estimator.auto_qa().percentage
                } else {
                    self.estimator.inputs().qa
                }
            }
            FormField::Arch => self.estimator.inputs().arch,
            FormField::Pm => self.estimator.inputs().pm,
            FormField::FocusFactor => self.estimator.coefficients().focus_factor,
            FormField::RiskFactor => self.estimator.coefficients().risk_factor,
            FormField::CommBuffer => self.estimator.coefficients().comm_buffer,
        }
    }

    // Step sizes mirror the form controls: half a man-day for inputs, one
    // point for the QA percentage, 0.05 for coefficient sliders.
    fn field_step(&self, field: FormField) -> f64 {
        match field {
            FormField::Dev | FormField::Arch | FormField::Pm => InputField::Dev.step(),
            FormField::Qa => {
                if self.estimator.auto_qa().enabled {
                    1.0
                } else {
                    InputField::Qa.step()
                }
            }
            FormField::FocusFactor | FormField::RiskFactor | FormField::CommBuffer => {
                CoefficientField::FocusFactor.step()
            }
        }
    }

    /// Adjust the selected field by `direction` (+1.0 / -1.0) times its step.
    /// All mutation routes through the estimator, which clamps and keeps the
    /// derived QA value consistent.
    pub fn nudge(&mut self, direction: f64) {
        let field = self.selected_field();
        let value = self.field_value(field) + direction * self.field_step(field);
        self.apply_field_value(field, value);
    }

    fn apply_field_value(&mut self, field: FormField, value: f64) {
        match field {
            FormField::Dev => {
                self.estimator.set_input_value(InputField::Dev, value);
            }
            FormField::Qa => {
                if self.estimator.auto_qa().enabled {
                    self.estimator.set_auto_qa_percentage(value);
                } else {
                    self.estimator.set_input_value(InputField::Qa, value);
                }
            }
            FormField::Arch => {
                self.estimator.set_input_value(InputField::Arch, value);
            }
            FormField::Pm => {
                self.estimator.set_input_value(InputField::Pm, value);
            }
            FormField::FocusFactor => {
                self.estimator
                    .set_coefficient_value(CoefficientField::FocusFactor, value);
            }
            FormField::RiskFactor => {
                self.estimator
                    .set_coefficient_value(CoefficientField::RiskFactor, value);
            }
            FormField::CommBuffer => {
                self.estimator
                    .set_coefficient_value(CoefficientField::CommBuffer, value);
            }
        }
    }

    /// Start free-text editing of the selected field, seeded with its
    /// current value.
    pub fn start_editing(&mut self) {
        self.edit_buffer = format!("{}", self.field_value(self.selected_field()));
        self.input_mode = InputMode::Editing;
    }

    /// Commit the edit buffer through the engine's clamping setters.
    /// Unparseable text becomes 0, negative values floor at 0; there is no
    /// error path, matching the engine's never-fail policy.
    pub fn commit_edit(&mut self) {
        let field = self.selected_field();
        self.apply_field_value(field, clamp_input(&self.edit_buffer));
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_auto_qa(&mut self) {
        let enabled = !self.estimator.auto_qa().enabled;
        self.estimator.set_auto_qa(enabled);
        if enabled {
            self.show_flash(format!(
                "Auto-QA on ({}% of Dev)",
                self.estimator.auto_qa().percentage
            ));
        } else {
            self.show_flash(format!(
                "Auto-QA off, QA stays at {} MD",
                self.estimator.inputs().qa
            ));
        }
    }

    pub fn toggle_chart(&mut self) {
        self.chart_view = match self.chart_view {
            ChartView::Share => ChartView::Bars,
            ChartView::Bars => ChartView::Share,
        };
    }

    pub fn reset(&mut self) {
        self.estimator.reset();
        self.selected = 0;
        self.show_flash("Reset to baseline".to_string());
    }

    /// Write the CSV export and report the outcome as a flash message.
    /// Export never interrupts the form; failures surface in the status bar.
    pub fn export_csv(&mut self) {
        let path = export::resolve_export_path(self.config.export.as_ref());
        let breakdown = self.estimator.breakdown();
        match export::write_csv(
            &path,
            self.estimator.inputs(),
            self.estimator.coefficients(),
            &breakdown,
        ) {
            Ok(()) => self.show_flash(format!("Exported: {}", path.display())),
            Err(e) => self.show_flash(format!("Export failed: {}", e)),
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::theme::ThemeColors;

    fn test_app() -> App {
        App::new(Config::default(), ThemeColors::dark())
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = test_app();
        assert_eq!(app.selected_field(), FormField::Dev);
        app.previous_field();
        assert_eq!(app.selected_field(), FormField::CommBuffer);
        app.next_field();
        assert_eq!(app.selected_field(), FormField::Dev);
    }

    #[test]
    fn test_qa_row_shows_percentage_while_auto() {
        let mut app = test_app();
        assert_eq!(app.field_value(FormField::Qa), 30.0);
        app.estimator.set_auto_qa(false);
        assert_eq!(app.field_value(FormField::Qa), 6.0);
    }

    #[test]
    fn test_nudge_dev_recomputes_qa() {
        let mut app = test_app();
        app.nudge(1.0);
        assert_eq!(app.estimator.inputs().dev, 20.5);
        assert_eq!(app.estimator.inputs().qa, 6.0); // round(20.5 * 30%)
    }

    #[test]
    fn test_nudge_never_goes_negative() {
        let mut app = test_app();
        app.estimator.set_input_value(InputField::Dev, 0.0);
        app.nudge(-1.0);
        assert_eq!(app.estimator.inputs().dev, 0.0);
    }

    #[test]
    fn test_nudge_qa_percentage_while_auto() {
        let mut app = test_app();
        app.selected = 1; // QA row
        app.nudge(1.0);
        assert_eq!(app.estimator.auto_qa().percentage, 31.0);
        assert_eq!(app.estimator.inputs().qa, 6.0); // round(20 * 31%)
    }

    #[test]
    fn test_edit_commit_clamps() {
        let mut app = test_app();
        app.start_editing();
        assert_eq!(app.edit_buffer, "20");
        app.edit_buffer = "-7".to_string();
        app.commit_edit();
        assert_eq!(app.estimator.inputs().dev, 0.0);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_commit_unparseable_is_zero() {
        let mut app = test_app();
        app.selected = 2; // Arch
        app.start_editing();
        app.edit_buffer = "four".to_string();
        app.commit_edit();
        assert_eq!(app.estimator.inputs().arch, 0.0);
    }

    #[test]
    fn test_edit_cancel_keeps_value() {
        let mut app = test_app();
        app.start_editing();
        app.edit_buffer = "99".to_string();
        app.cancel_edit();
        assert_eq!(app.estimator.inputs().dev, 20.0);
    }

    #[test]
    fn test_toggle_auto_qa_keeps_baseline() {
        let mut app = test_app();
        app.toggle_auto_qa();
        assert!(!app.estimator.auto_qa().enabled);
        assert_eq!(app.estimator.inputs().qa, 6.0);
    }

    #[test]
    fn test_toggle_chart_cycles() {
        let mut app = test_app();
        assert_eq!(app.chart_view, ChartView::Share);
        app.toggle_chart();
        assert_eq!(app.chart_view, ChartView::Bars);
        app.toggle_chart();
        assert_eq!(app.chart_view, ChartView::Share);
    }

    #[test]
    fn test_reset_from_form() {
        let mut app = test_app();
        app.selected = 4;
        app.reset();
        assert_eq!(app.selected, 0);
        assert_eq!(app.estimator.breakdown().total_md, 0.0);
        assert!(app.flash_message.is_some());
    }
}
