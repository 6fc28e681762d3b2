//! Stock attribute validators
//!
//! Attach these with [`AttributeBuilder::validator`](crate::schema::AttributeBuilder::validator).
//! Null and unknown values are skipped, they are handled by required-ness
//! checks and at apply time respectively.

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{Diagnostic, Dynamic};

pub struct StringLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl StringLengthValidator {
    pub fn between(min: usize, max: usize) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: Some(max),
        })
    }
}

impl Validator for StringLengthValidator {
    fn description(&self) -> String {
        format!("string length must be within {:?}..={:?}", self.min, self.max)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Some(s) = request.config_value.value.as_str() {
            let len = s.chars().count();
            if let Some(min) = self.min.filter(|min| len < *min) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must have minimum length of {}", request.path, min),
                        format!("Got length {}", len),
                    )
                    .with_attribute(request.path.clone()),
                );
            }
            if let Some(max) = self.max.filter(|max| len > *max) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must have maximum length of {}", request.path, max),
                        format!("Got length {}", len),
                    )
                    .with_attribute(request.path.clone()),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

pub struct StringPatternValidator {
    pattern: Result<regex::Regex, regex::Error>,
    description: String,
}

impl StringPatternValidator {
    /// A pattern that fails to compile reports an error diagnostic on every
    /// validated value instead of panicking at schema construction.
    pub fn create(pattern: &str, description: &str) -> Box<dyn Validator> {
        Box::new(Self {
            pattern: regex::Regex::new(pattern),
            description: description.to_string(),
        })
    }
}

impl Validator for StringPatternValidator {
    fn description(&self) -> String {
        format!("value must match {}", self.description)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Some(s) = request.config_value.value.as_str() {
            match &self.pattern {
                Ok(pattern) if pattern.is_match(s) => {}
                Ok(_) => diagnostics.push(
                    Diagnostic::error(
                        format!("{} must match {}", request.path, self.description),
                        format!("Value '{}' does not match pattern", s),
                    )
                    .with_attribute(request.path.clone()),
                ),
                Err(e) => diagnostics.push(Diagnostic::error(
                    "Invalid validation pattern",
                    format!("Pattern for {} does not compile: {}", request.path, e),
                )),
            }
        }
        ValidatorResponse { diagnostics }
    }
}

pub struct StringOneOfValidator {
    allowed: Vec<String>,
}

impl StringOneOfValidator {
    pub fn create(allowed: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Validator for StringOneOfValidator {
    fn description(&self) -> String {
        format!("value must be one of: {}", self.allowed.join(", "))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Some(s) = request.config_value.value.as_str() {
            if !self.allowed.iter().any(|allowed| allowed == s) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Invalid value for {}", request.path),
                        format!(
                            "Value '{}' must be one of: {}",
                            s,
                            self.allowed.join(", ")
                        ),
                    )
                    .with_attribute(request.path.clone()),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

pub struct NumberRangeValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRangeValidator {
    pub fn at_least(min: f64) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: None,
        })
    }

    pub fn between(min: f64, max: f64) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: Some(max),
        })
    }
}

impl Validator for NumberRangeValidator {
    fn description(&self) -> String {
        format!("number must be within {:?}..={:?}", self.min, self.max)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Some(n) = request.config_value.value.as_number() {
            if let Some(min) = self.min.filter(|min| n < *min) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must be at least {}", request.path, min),
                        format!("Got {}", n),
                    )
                    .with_attribute(request.path.clone()),
                );
            }
            if let Some(max) = self.max.filter(|max| n > *max) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must be at most {}", request.path, max),
                        format!("Got {}", n),
                    )
                    .with_attribute(request.path.clone()),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// Runs a validator against a bare value, mostly useful in tests
pub fn check(validator: &dyn Validator, path: &str, value: Dynamic) -> Vec<Diagnostic> {
    validator
        .validate(ValidatorRequest {
            config_value: crate::types::DynamicValue::new(value),
            path: crate::types::AttributePath::new(path),
        })
        .diagnostics
}
