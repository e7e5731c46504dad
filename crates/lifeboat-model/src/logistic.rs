//! Logistic regression over `(Pclass, Sex, Age)`.
//!
//! # Artifact format
//!
//! ```json
//! {
//!   "format": "logistic_regression",
//!   "feature_names": ["Pclass", "Sex", "Age"],
//!   "coefficients": [-1.29, -2.52, -0.037],
//!   "intercept": 5.06,
//!   "threshold": 0.5
//! }
//! ```

use lifeboat_core::features::{FEATURE_DIM, FEATURE_NAMES};
use lifeboat_core::{FeatureVector, LifeboatError, ModelOutput, Result, SurvivalModel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Value of the `format` field this adapter accepts.
pub const FORMAT_TAG: &str = "logistic_regression";

fn default_threshold() -> f64 {
    0.5
}

/// Serialized logistic regression parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub format: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Binary logistic regression classifier.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    coefficients: [f64; FEATURE_DIM],
    intercept: f64,
    threshold: f64,
}

impl LogisticModel {
    /// Build a model from already-validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`LifeboatError::ModelLoad`] for non-finite parameters or a
    /// threshold outside `(0, 1)`.
    pub fn new(coefficients: [f64; FEATURE_DIM], intercept: f64, threshold: f64) -> Result<Self> {
        if coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            return Err(LifeboatError::ModelLoad(
                "logistic parameters must be finite".to_string(),
            ));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(LifeboatError::ModelLoad(format!(
                "decision threshold {threshold} must lie strictly between 0 and 1"
            )));
        }
        Ok(Self {
            coefficients,
            intercept,
            threshold,
        })
    }

    /// Validate a parsed artifact.
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self> {
        if artifact.format != FORMAT_TAG {
            return Err(LifeboatError::ModelLoad(format!(
                "unsupported model format '{}', expected '{FORMAT_TAG}'",
                artifact.format
            )));
        }
        if artifact.feature_names != FEATURE_NAMES {
            return Err(LifeboatError::ModelLoad(format!(
                "model expects features {:?}, but the form provides {:?}",
                artifact.feature_names, FEATURE_NAMES
            )));
        }
        let coefficients: [f64; FEATURE_DIM] =
            artifact.coefficients.as_slice().try_into().map_err(|_| {
                LifeboatError::ModelLoad(format!(
                    "expected {FEATURE_DIM} coefficients, found {}",
                    artifact.coefficients.len()
                ))
            })?;
        Self::new(coefficients, artifact.intercept, artifact.threshold)
    }

    /// Parse and validate a JSON artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: LogisticArtifact = serde_json::from_str(json)
            .map_err(|e| LifeboatError::ModelLoad(format!("malformed model artifact: {e}")))?;
        Self::from_artifact(artifact)
    }

    /// Read a JSON artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LifeboatError::ModelLoad(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Survival probability for `features`.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let z = self
            .coefficients
            .iter()
            .zip(features.to_array())
            .fold(self.intercept, |acc, (c, x)| acc + c * x);
        sigmoid(z)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl SurvivalModel for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput> {
        let probability = self.probability(features);
        if !probability.is_finite() {
            return Err(LifeboatError::Prediction(format!(
                "logistic model produced {probability} for {features:?}"
            )));
        }
        Ok(ModelOutput {
            survived: probability >= self.threshold,
            probability,
        })
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
