//! Validation System - Rule/Policy Separation
//!
//! Rules inspect a resolved configuration and produce structured violations.
//! Policy decides whether those violations block generation. Unvalidated
//! generation stays available; this is opt-in via `Pixelfly::with_validator`.

use serde::{Deserialize, Serialize};

use crate::config::ResolvedConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Block,
    Warn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    /// One line per violation, `rule: message`
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationViolation>;

    fn violation(&self, severity: ViolationSeverity, message: &str) -> ValidationViolation {
        ValidationViolation {
            rule: self.name().to_string(),
            severity,
            message: message.to_string(),
            expected: None,
            actual: None,
        }
    }
}

// --- Concrete Rules ---

pub struct PaletteRule;

impl ValidationRule for PaletteRule {
    fn name(&self) -> &'static str { "palette" }

    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationViolation> {
        match config.colors.len() {
            0 => vec![ValidationViolation {
                expected: Some("at least 1 color".to_string()),
                actual: Some("0 colors".to_string()),
                ..self.violation(ViolationSeverity::Error, "Palette has no background color")
            }],
            1 => vec![self.violation(
                ViolationSeverity::Warning,
                "Single color palette renders a blank image",
            )],
            _ => vec![],
        }
    }
}

pub struct GridSizeRule;

impl ValidationRule for GridSizeRule {
    fn name(&self) -> &'static str { "grid_size" }

    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationViolation> {
        if config.grid_width == 0 || config.grid_height == 0 {
            vec![ValidationViolation {
                expected: Some("non-zero width and height".to_string()),
                actual: Some(format!("{}x{}", config.grid_width, config.grid_height)),
                ..self.violation(ViolationSeverity::Error, "Grid has no cells")
            }]
        } else {
            vec![]
        }
    }
}

pub struct PixelSizeRule;

impl ValidationRule for PixelSizeRule {
    fn name(&self) -> &'static str { "pixel_size" }

    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationViolation> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(config.pixel_width) && ok(config.pixel_height) {
            return vec![];
        }
        vec![ValidationViolation {
            expected: Some("finite and positive".to_string()),
            actual: Some(format!("{}x{}", config.pixel_width, config.pixel_height)),
            ..self.violation(ViolationSeverity::Error, "Invalid pixel size")
        }]
    }
}

pub struct MarginRule;

impl ValidationRule for MarginRule {
    fn name(&self) -> &'static str { "margin" }

    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationViolation> {
        let drawable_rows = config.grid_height.saturating_sub(2 * config.margin_y);
        let drawable_cols = config.grid_width.div_ceil(2).saturating_sub(config.margin_x);

        if drawable_rows == 0 || drawable_cols == 0 {
            vec![ValidationViolation {
                expected: Some("margins smaller than half the grid".to_string()),
                actual: Some(format!("{}x{}", config.margin_x, config.margin_y)),
                ..self.violation(
                    ViolationSeverity::Warning,
                    "Margins leave no drawable area; image will be background only",
                )
            }]
        } else {
            vec![]
        }
    }
}

/// Colours are written into attributes unescaped
pub struct MarkupSafetyRule;

impl ValidationRule for MarkupSafetyRule {
    fn name(&self) -> &'static str { "markup_safety" }

    fn validate(&self, config: &ResolvedConfig) -> Vec<ValidationViolation> {
        config
            .colors
            .iter()
            .filter(|c| c.contains(['<', '>', '"', '&']))
            .map(|c| ValidationViolation {
                actual: Some(c.clone()),
                ..self.violation(ViolationSeverity::Error, "Color is not safe inside an attribute")
            })
            .collect()
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
    failure_mode: FailureMode,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(PaletteRule),
                Box::new(GridSizeRule),
                Box::new(PixelSizeRule),
                Box::new(MarginRule),
                Box::new(MarkupSafetyRule),
            ],
            failure_mode: FailureMode::Block,
        }
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn with_rule(mut self, rule: Box<dyn ValidationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn validate(&self, config: &ResolvedConfig) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(config))
            .collect();

        for v in &violations {
            log::warn!("{} ({:?}): {}", v.rule, v.severity, v.message);
        }

        let has_errors = violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        let valid = match self.failure_mode {
            FailureMode::Block => !has_errors,
            // Never block, just record
            FailureMode::Warn => true,
        };

        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
