//! Core types, traits, and errors for Lifeboat
//!
//! This crate holds the pieces every Lifeboat component shares: the form
//! input and prediction result types, the [`SurvivalModel`] trait that model
//! adapters implement, the error enum, and the application configuration.
//! The decision logic itself lives in [`features`], [`overrides`] and
//! [`resolver`].

pub mod facts;
pub mod features;
pub mod overrides;
pub mod report;
pub mod resolver;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use features::FeatureVector;
pub use overrides::{OverrideTable, Verdict};
pub use report::{SurvivalReport, TicketRow};
pub use resolver::OutcomeResolver;

/// Youngest age the form accepts.
pub const MIN_AGE: u32 = 1;

/// Oldest age the form accepts.
pub const MAX_AGE: u32 = 80;

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Passenger sex as chosen on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Label shown on the form and in the ticket summary.
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Sex {
    type Err = LifeboatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(LifeboatError::InvalidInput(format!(
                "unknown sex '{other}', expected 'male' or 'female'"
            ))),
        }
    }
}

/// Approximate income bracket, standing in for the passenger ticket class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeBracket {
    Low,
    Middle,
    High,
}

impl IncomeBracket {
    /// All brackets in the order the form lists them.
    pub const ALL: [IncomeBracket; 3] = [Self::Low, Self::Middle, Self::High];

    /// Label shown on the form and in the ticket summary.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low (3rd Class)",
            Self::Middle => "Middle (2nd Class)",
            Self::High => "High (1st Class)",
        }
    }

    /// Form value used in `<option value=...>` and in the JSON API.
    pub fn value(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Middle => "middle",
            Self::High => "high",
        }
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for IncomeBracket {
    type Err = LifeboatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "middle" => Ok(Self::Middle),
            "high" => Ok(Self::High),
            other => Err(LifeboatError::InvalidInput(format!(
                "unknown income bracket '{other}', expected 'low', 'middle' or 'high'"
            ))),
        }
    }
}

/// One form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    /// Optional passenger name; only used for overrides and display.
    #[serde(default)]
    pub name: String,
    pub sex: Sex,
    pub age: u32,
    pub income_bracket: IncomeBracket,
}

impl FormInput {
    /// Build an input from already-typed values.
    pub fn new(name: impl Into<String>, sex: Sex, age: u32, income_bracket: IncomeBracket) -> Self {
        Self {
            name: name.into(),
            sex,
            age,
            income_bracket,
        }
    }

    /// Parse raw string values as they arrive from an HTML form.
    ///
    /// # Errors
    ///
    /// Returns [`LifeboatError::InvalidInput`] if any field does not parse.
    /// The age range is not checked here; the resolver does that only when
    /// the model is consulted.
    pub fn from_raw(name: &str, sex: &str, age: &str, income_bracket: &str) -> Result<Self> {
        let age = age.trim().parse::<u32>().map_err(|e| {
            LifeboatError::InvalidInput(format!("age '{}' is not a whole number: {e}", age.trim()))
        })?;
        Ok(Self {
            name: name.to_string(),
            sex: sex.parse()?,
            age,
            income_bracket: income_bracket.parse()?,
        })
    }

    /// The name with surrounding whitespace removed.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}

// ---------------------------------------------------------------------------
// Prediction result
// ---------------------------------------------------------------------------

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictSource {
    Override,
    Model,
}

/// Outcome of resolving one [`FormInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub survived: bool,
    /// Survival probability in `[0, 1]`; `None` for override verdicts.
    pub probability: Option<f64>,
    pub verdict_source: VerdictSource,
}

/// Raw output of a [`SurvivalModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    /// Predicted class label (`true` = survived).
    pub survived: bool,
    /// Estimated probability of the "survived" class.
    pub probability: f64,
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// A pre-trained binary survival classifier.
///
/// Implementations are loaded once at startup and then only read, so they
/// must be shareable across request handlers.
pub trait SurvivalModel: Send + Sync {
    /// Predict the class label and survival probability for `features`.
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput>;

    /// Short human-readable model name used in logs and health output.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Name lists that bypass the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    /// Names that always survive.
    pub always_survive: Vec<String>,
    /// Names that never survive.
    pub never_survive: Vec<String>,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            always_survive: overrides::DEFAULT_ALWAYS_SURVIVE
                .iter()
                .map(|s| s.to_string())
                .collect(),
            never_survive: overrides::DEFAULT_NEVER_SURVIVE
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the form server binds to.
    pub listen_addr: String,
    /// Model artifact path. Relative paths are resolved against the
    /// directory of the running executable.
    pub model_path: String,
    /// Override name lists.
    pub overrides: OverrideConfig,
    /// Maximum accepted request body size.
    pub max_request_size_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8501".to_string(),
            model_path: "titanic_model.json".to_string(),
            overrides: OverrideConfig::default(),
            max_request_size_bytes: 64 * 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Core error types
#[derive(thiserror::Error, Debug)]
pub enum LifeboatError {
    /// The model artifact is missing or cannot be parsed.
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// The model failed for one submission.
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Raw form values that do not parse.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for `std::result::Result<T, LifeboatError>`.
pub type Result<T> = std::result::Result<T, LifeboatError>;
