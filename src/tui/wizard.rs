//! Step wizard state machine.
//!
//! `CollectAge -> CollectProbability -> SelectTest -> ShowResult`, with an
//! `Edit` sub-state reachable from `ShowResult` for likelihood-ratio
//! overrides. Terminal-free so transitions can be driven from tests.

use crossterm::event::KeyCode;
use zeroize::Zeroize;

use crate::application::RiskEngine;
use crate::domain::{
    adjusted_pre_test_probability, baseline_probability, is_valid_likelihood_ratio,
    AssessmentInput, CalculationResult, LikelihoodOverride,
};

/// Current wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    CollectAge,
    CollectProbability,
    SelectTest,
    ShowResult,
    Edit,
}

impl WizardStep {
    /// Position in the four-step progress indicator (1-based).
    #[must_use]
    pub fn number(&self) -> usize {
        match self {
            Self::CollectAge => 1,
            Self::CollectProbability => 2,
            Self::SelectTest => 3,
            Self::ShowResult | Self::Edit => 4,
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::CollectAge => "Patient Age",
            Self::CollectProbability => "Clinician Estimate",
            Self::SelectTest => "Diagnostic Test",
            Self::ShowResult => "Result",
            Self::Edit => "Edit Likelihood Ratios",
        }
    }
}

/// Which result the nomogram traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NomogramBranch {
    Positive,
    Negative,
}

impl NomogramBranch {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

/// Field focus in the likelihood-ratio editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Positive,
    Negative,
}

/// Likelihood-ratio editor buffers.
#[derive(Debug, Clone)]
pub struct EditForm {
    pub positive: String,
    pub negative: String,
    pub source: String,
    pub field: EditField,
    pub error_message: Option<String>,
}

impl Default for EditForm {
    fn default() -> Self {
        Self {
            positive: String::new(),
            negative: String::new(),
            source: String::new(),
            field: EditField::Positive,
            error_message: None,
        }
    }
}

impl EditForm {
    fn active_buffer(&mut self) -> &mut String {
        match self.field {
            EditField::Positive => &mut self.positive,
            EditField::Negative => &mut self.negative,
        }
    }

    fn switch_field(&mut self) {
        self.field = match self.field {
            EditField::Positive => EditField::Negative,
            EditField::Negative => EditField::Positive,
        };
    }

    fn parse_ratio(label: &str, text: &str) -> Result<f64, String> {
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| format!("{label}: Invalid number"))?;
        if !is_valid_likelihood_ratio(value) {
            return Err(format!("{label}: Must be greater than 0"));
        }
        Ok(value)
    }
}

/// What the app should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardCommand {
    Continue,
    Quit,
}

/// Wizard state: entered text, the selected test and the last result.
pub struct Wizard {
    pub step: WizardStep,
    pub age_input: String,
    pub probability_input: String,
    pub selected_test: usize,
    pub likelihood_override: Option<LikelihoodOverride>,
    pub result: Option<CalculationResult>,
    pub error_message: Option<String>,
    pub edit_form: EditForm,
    pub branch: NomogramBranch,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            step: WizardStep::CollectAge,
            age_input: String::new(),
            probability_input: String::new(),
            selected_test: 0,
            likelihood_override: None,
            result: None,
            error_message: None,
            edit_form: EditForm::default(),
            branch: NomogramBranch::Positive,
        }
    }
}

impl Wizard {
    /// Baseline for the age typed so far, for live display.
    #[must_use]
    pub fn live_baseline(&self) -> Option<f64> {
        self.age_input
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|age| *age >= 0)
            .map(baseline_probability)
    }

    /// Adjusted pre-test probability for what has been typed so far.
    #[must_use]
    pub fn live_pre_test(&self) -> Option<f64> {
        let age = self
            .age_input
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|age| *age >= 0)?;
        let clinician: f64 = self.probability_input.trim().parse().ok()?;
        (0.0..=100.0)
            .contains(&clinician)
            .then(|| adjusted_pre_test_probability(clinician, age))
    }

    /// Start over, wiping entered patient data.
    pub fn reset(&mut self) {
        self.age_input.zeroize();
        self.probability_input.zeroize();
        self.edit_form.positive.zeroize();
        self.edit_form.negative.zeroize();
        *self = Self::default();
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyCode, engine: &RiskEngine) -> WizardCommand {
        match self.step {
            WizardStep::CollectAge => self.handle_age_key(key),
            WizardStep::CollectProbability => self.handle_probability_key(key),
            WizardStep::SelectTest => return self.handle_select_key(key, engine),
            WizardStep::ShowResult => return self.handle_result_key(key, engine),
            WizardStep::Edit => self.handle_edit_key(key, engine),
        }
        WizardCommand::Continue
    }

    fn handle_age_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.age_input.push(c);
                self.error_message = None;
            }
            KeyCode::Backspace => {
                self.age_input.pop();
            }
            KeyCode::Delete => self.age_input.clear(),
            KeyCode::Enter => match self.age_input.trim().parse::<i32>() {
                Ok(age) if age >= 0 => {
                    self.error_message = None;
                    self.step = WizardStep::CollectProbability;
                }
                _ => self.error_message = Some("Age: Enter a whole number of years".to_string()),
            },
            _ => {}
        }
    }

    fn handle_probability_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.probability_input.push(c);
                self.error_message = None;
            }
            KeyCode::Backspace => {
                self.probability_input.pop();
            }
            KeyCode::Delete => self.probability_input.clear(),
            KeyCode::Esc => {
                self.error_message = None;
                self.step = WizardStep::CollectAge;
            }
            KeyCode::Enter => match self.probability_input.trim().parse::<f64>() {
                Ok(p) if (0.0..=100.0).contains(&p) => {
                    self.error_message = None;
                    self.step = WizardStep::SelectTest;
                }
                _ => {
                    self.error_message =
                        Some("Probability: Value must be between 0 and 100".to_string())
                }
            },
            _ => {}
        }
    }

    fn handle_select_key(&mut self, key: KeyCode, engine: &RiskEngine) -> WizardCommand {
        let count = engine.catalog().len();
        match key {
            KeyCode::Up => {
                self.selected_test = if self.selected_test == 0 {
                    count.saturating_sub(1)
                } else {
                    self.selected_test - 1
                };
            }
            KeyCode::Down | KeyCode::Tab => {
                if count > 0 {
                    self.selected_test = (self.selected_test + 1) % count;
                }
            }
            KeyCode::Esc => {
                self.error_message = None;
                self.step = WizardStep::CollectProbability;
            }
            KeyCode::Enter => {
                self.likelihood_override = None;
                self.calculate(engine);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return WizardCommand::Quit,
            _ => {}
        }
        WizardCommand::Continue
    }

    fn handle_result_key(&mut self, key: KeyCode, engine: &RiskEngine) -> WizardCommand {
        match key {
            KeyCode::Char('e') | KeyCode::Char('E') => self.open_editor(engine),
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Tab => {
                self.branch = self.branch.toggle();
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.reset(),
            KeyCode::Esc => {
                self.likelihood_override = None;
                self.result = None;
                self.step = WizardStep::SelectTest;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return WizardCommand::Quit,
            _ => {}
        }
        WizardCommand::Continue
    }

    fn handle_edit_key(&mut self, key: KeyCode, engine: &RiskEngine) {
        match key {
            KeyCode::Up | KeyCode::Down | KeyCode::Tab => self.edit_form.switch_field(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.edit_form.active_buffer().push(c);
                self.edit_form.error_message = None;
            }
            KeyCode::Backspace => {
                self.edit_form.active_buffer().pop();
            }
            KeyCode::Delete => self.edit_form.active_buffer().clear(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.likelihood_override = None;
                self.calculate(engine);
            }
            KeyCode::Esc => {
                self.edit_form.error_message = None;
                self.step = WizardStep::ShowResult;
            }
            KeyCode::Enter => self.apply_edit(engine),
            _ => {}
        }
    }

    fn selected_test_name(&self, engine: &RiskEngine) -> Option<String> {
        engine
            .catalog()
            .tests()
            .get(self.selected_test)
            .map(|t| t.name.clone())
    }

    fn open_editor(&mut self, engine: &RiskEngine) {
        let Some(test) = engine.catalog().tests().get(self.selected_test) else {
            return;
        };
        let (positive, negative) = self
            .likelihood_override
            .as_ref()
            .map_or((test.likelihood_ratio_positive, test.likelihood_ratio_negative), |o| {
                o.apply(test)
            });

        self.edit_form = EditForm {
            positive: positive.to_string(),
            negative: negative.to_string(),
            source: "Clinician-supplied likelihood ratio".to_string(),
            field: EditField::Positive,
            error_message: None,
        };
        self.step = WizardStep::Edit;
    }

    fn apply_edit(&mut self, engine: &RiskEngine) {
        let parsed = EditForm::parse_ratio("LR+", &self.edit_form.positive).and_then(|positive| {
            EditForm::parse_ratio("LR-", &self.edit_form.negative).map(|negative| (positive, negative))
        });

        let (positive, negative) = match parsed {
            Ok(values) => values,
            Err(message) => {
                self.edit_form.error_message = Some(message);
                return;
            }
        };

        let Some(test) = engine.catalog().tests().get(self.selected_test) else {
            return;
        };

        let overrides = LikelihoodOverride {
            positive: (positive != test.likelihood_ratio_positive).then_some(positive),
            negative: (negative != test.likelihood_ratio_negative).then_some(negative),
            source: Some(self.edit_form.source.clone()),
        };
        self.likelihood_override = (!overrides.is_empty()).then_some(overrides);
        self.calculate(engine);
    }

    /// Run the engine on the current inputs and move to the result step.
    fn calculate(&mut self, engine: &RiskEngine) {
        let Some(test_name) = self.selected_test_name(engine) else {
            self.error_message = Some("Please select a valid test.".to_string());
            return;
        };

        let input = AssessmentInput::parse(&self.age_input, &self.probability_input, &test_name)
            .map(|input| match &self.likelihood_override {
                Some(overrides) => input.with_override(overrides.clone()),
                None => input,
            });

        match input.and_then(|input| engine.compute(&input)) {
            Ok(result) => {
                self.result = Some(result);
                self.error_message = None;
                self.edit_form.error_message = None;
                self.step = WizardStep::ShowResult;
            }
            Err(e) => {
                if self.step == WizardStep::Edit {
                    self.edit_form.error_message = Some(e.to_string());
                } else {
                    self.error_message = Some(e.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LikelihoodSource, Recommendation, TestCatalog};
    use std::sync::Arc;

    fn engine() -> RiskEngine {
        RiskEngine::new(Arc::new(TestCatalog::builtin()))
    }

    fn type_text(wizard: &mut Wizard, engine: &RiskEngine, text: &str) {
        for c in text.chars() {
            wizard.handle_key(KeyCode::Char(c), engine);
        }
    }

    fn wizard_at_result(engine: &RiskEngine, test_index: usize) -> Wizard {
        let mut wizard = Wizard::default();
        type_text(&mut wizard, engine, "72");
        wizard.handle_key(KeyCode::Enter, engine);
        type_text(&mut wizard, engine, "20");
        wizard.handle_key(KeyCode::Enter, engine);
        for _ in 0..test_index {
            wizard.handle_key(KeyCode::Down, engine);
        }
        wizard.handle_key(KeyCode::Enter, engine);
        wizard
    }

    #[test]
    fn test_happy_path_reaches_result() {
        let engine = engine();
        let wizard = wizard_at_result(&engine, 3);

        assert_eq!(wizard.step, WizardStep::ShowResult);
        let result = wizard.result.as_ref().expect("Should have result");
        assert_eq!(result.test_name, "Amyloid PET Scan");
        assert_eq!(result.recommendation, Recommendation::Recommended);
    }

    #[test]
    fn test_age_step_filters_and_validates() {
        let engine = engine();
        let mut wizard = Wizard::default();

        wizard.handle_key(KeyCode::Enter, &engine);
        assert_eq!(wizard.step, WizardStep::CollectAge);
        assert!(wizard.error_message.is_some());

        type_text(&mut wizard, &engine, "7x2");
        assert_eq!(wizard.age_input, "72");
        assert_eq!(wizard.live_baseline(), Some(25.0));

        wizard.handle_key(KeyCode::Enter, &engine);
        assert_eq!(wizard.step, WizardStep::CollectProbability);
        assert!(wizard.error_message.is_none());
    }

    #[test]
    fn test_probability_out_of_range_stays() {
        let engine = engine();
        let mut wizard = Wizard::default();
        type_text(&mut wizard, &engine, "80");
        wizard.handle_key(KeyCode::Enter, &engine);
        type_text(&mut wizard, &engine, "150");
        wizard.handle_key(KeyCode::Enter, &engine);

        assert_eq!(wizard.step, WizardStep::CollectProbability);
        assert!(wizard.error_message.is_some());
        assert!(wizard.live_pre_test().is_none());

        wizard.handle_key(KeyCode::Delete, &engine);
        type_text(&mut wizard, &engine, "12.5");
        assert_eq!(wizard.live_pre_test(), Some(35.0));
    }

    #[test]
    fn test_live_pre_test_matches_engine() {
        let engine = engine();
        let mut wizard = Wizard::default();
        type_text(&mut wizard, &engine, "50");
        wizard.handle_key(KeyCode::Enter, &engine);
        type_text(&mut wizard, &engine, "57");

        let live = wizard.live_pre_test().expect("Should have live value");
        assert_eq!(live, 57.0);

        wizard.handle_key(KeyCode::Enter, &engine);
        wizard.handle_key(KeyCode::Enter, &engine);
        let result = wizard.result.as_ref().expect("Should have result");
        assert_eq!(result.adjusted_pre_test_probability, live);
    }

    #[test]
    fn test_escape_steps_back() {
        let engine = engine();
        let mut wizard = wizard_at_result(&engine, 0);

        wizard.handle_key(KeyCode::Esc, &engine);
        assert_eq!(wizard.step, WizardStep::SelectTest);
        assert!(wizard.result.is_none());
        wizard.handle_key(KeyCode::Esc, &engine);
        assert_eq!(wizard.step, WizardStep::CollectProbability);
        wizard.handle_key(KeyCode::Esc, &engine);
        assert_eq!(wizard.step, WizardStep::CollectAge);
        assert_eq!(wizard.age_input, "72");
    }

    #[test]
    fn test_edit_applies_override_without_touching_catalog() {
        let engine = engine();
        let mut wizard = wizard_at_result(&engine, 0);

        wizard.handle_key(KeyCode::Char('e'), &engine);
        assert_eq!(wizard.step, WizardStep::Edit);
        assert_eq!(wizard.edit_form.positive, "2.5");

        wizard.handle_key(KeyCode::Delete, &engine);
        type_text(&mut wizard, &engine, "12");
        wizard.handle_key(KeyCode::Enter, &engine);

        assert_eq!(wizard.step, WizardStep::ShowResult);
        let result = wizard.result.as_ref().expect("Should have result");
        assert_eq!(result.likelihood_source, LikelihoodSource::Override);
        assert!((result.likelihood_ratio_positive - 12.0).abs() < f64::EPSILON);
        assert!((result.likelihood_ratio_negative - 0.5).abs() < f64::EPSILON);

        let catalog_entry = &engine.catalog().tests()[0];
        assert!((catalog_entry.likelihood_ratio_positive - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edit_rejects_zero_ratio() {
        let engine = engine();
        let mut wizard = wizard_at_result(&engine, 1);

        wizard.handle_key(KeyCode::Char('e'), &engine);
        wizard.handle_key(KeyCode::Tab, &engine);
        wizard.handle_key(KeyCode::Delete, &engine);
        type_text(&mut wizard, &engine, "0");
        wizard.handle_key(KeyCode::Enter, &engine);

        assert_eq!(wizard.step, WizardStep::Edit);
        assert!(wizard.edit_form.error_message.is_some());
        assert!(wizard.likelihood_override.is_none());

        wizard.handle_key(KeyCode::Esc, &engine);
        assert_eq!(wizard.step, WizardStep::ShowResult);
    }

    #[test]
    fn test_restore_catalog_values() {
        let engine = engine();
        let mut wizard = wizard_at_result(&engine, 0);

        wizard.handle_key(KeyCode::Char('e'), &engine);
        wizard.handle_key(KeyCode::Delete, &engine);
        type_text(&mut wizard, &engine, "40");
        wizard.handle_key(KeyCode::Enter, &engine);
        assert!(wizard.likelihood_override.is_some());

        wizard.handle_key(KeyCode::Char('e'), &engine);
        assert_eq!(wizard.edit_form.positive, "40");
        wizard.handle_key(KeyCode::Char('r'), &engine);

        assert_eq!(wizard.step, WizardStep::ShowResult);
        assert!(wizard.likelihood_override.is_none());
        let result = wizard.result.as_ref().expect("Should have result");
        assert_eq!(result.likelihood_source, LikelihoodSource::Catalog);
    }

    #[test]
    fn test_new_assessment_wipes_inputs() {
        let engine = engine();
        let mut wizard = wizard_at_result(&engine, 2);

        wizard.handle_key(KeyCode::Char('p'), &engine);
        assert_eq!(wizard.branch, NomogramBranch::Negative);

        wizard.handle_key(KeyCode::Char('n'), &engine);
        assert_eq!(wizard.step, WizardStep::CollectAge);
        assert!(wizard.age_input.is_empty());
        assert!(wizard.probability_input.is_empty());
        assert!(wizard.result.is_none());
        assert_eq!(wizard.branch, NomogramBranch::Positive);
    }

    #[test]
    fn test_selection_wraps() {
        let engine = engine();
        let mut wizard = Wizard::default();
        type_text(&mut wizard, &engine, "60");
        wizard.handle_key(KeyCode::Enter, &engine);
        type_text(&mut wizard, &engine, "5");
        wizard.handle_key(KeyCode::Enter, &engine);

        wizard.handle_key(KeyCode::Up, &engine);
        assert_eq!(wizard.selected_test, 3);
        wizard.handle_key(KeyCode::Down, &engine);
        assert_eq!(wizard.selected_test, 0);
        assert_eq!(wizard.handle_key(KeyCode::Char('q'), &engine), WizardCommand::Quit);
    }
}
