//! Outcome resolution: override lookup, feature mapping, model inference.

use crate::features::FeatureVector;
use crate::overrides::OverrideTable;
use crate::{
    FormInput, LifeboatError, PredictionResult, Result, SurvivalModel, VerdictSource, MAX_AGE,
    MIN_AGE,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns form submissions into [`PredictionResult`]s.
///
/// Holds the process-wide override table and loaded model. Both are only
/// read after construction, so one resolver can be shared across handlers.
#[derive(Clone)]
pub struct OutcomeResolver {
    overrides: Arc<OverrideTable>,
    model: Arc<dyn SurvivalModel>,
}

impl OutcomeResolver {
    pub fn new(overrides: Arc<OverrideTable>, model: Arc<dyn SurvivalModel>) -> Self {
        Self { overrides, model }
    }

    /// Resolve one submission.
    ///
    /// Overrides are checked first and never consult the model. On the model
    /// path an out-of-range age or a failing model call is reported as
    /// [`LifeboatError::Prediction`].
    pub fn resolve(&self, input: &FormInput) -> Result<PredictionResult> {
        if let Some(verdict) = self.overrides.lookup(&input.name) {
            debug!(?verdict, "Override verdict");
            return Ok(PredictionResult {
                survived: verdict.survived(),
                probability: None,
                verdict_source: VerdictSource::Override,
            });
        }

        if !(MIN_AGE..=MAX_AGE).contains(&input.age) {
            return Err(LifeboatError::Prediction(format!(
                "invalid input: age {} is outside {MIN_AGE}..={MAX_AGE}",
                input.age
            )));
        }

        let features = FeatureVector::from_input(input);
        let output = self.model.predict(&features).map_err(|e| {
            warn!(model = self.model.name(), error = %e, "Model prediction failed");
            match e {
                LifeboatError::Prediction(_) => e,
                other => LifeboatError::Prediction(other.to_string()),
            }
        })?;

        // Models wrapped in `TrackedModel` are already checked; bare models are not.
        if !output.probability.is_finite() {
            warn!(model = self.model.name(), "Model returned a non-finite probability");
            return Err(LifeboatError::Prediction(format!(
                "model '{}' returned a non-finite probability",
                self.model.name()
            )));
        }

        debug!(
            pclass = features.pclass,
            sex = features.sex,
            age = features.age,
            survived = output.survived,
            probability = output.probability,
            "Model verdict"
        );

        Ok(PredictionResult {
            survived: output.survived,
            probability: Some(output.probability.clamp(0.0, 1.0)),
            verdict_source: VerdictSource::Model,
        })
    }

    pub fn model(&self) -> &dyn SurvivalModel {
        self.model.as_ref()
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IncomeBracket, ModelOutput, Sex};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scores a fixed probability and counts calls.
    struct FixedModel {
        probability: f64,
        calls: AtomicUsize,
    }

    impl FixedModel {
        fn new(probability: f64) -> Self {
            Self {
                probability,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SurvivalModel for FixedModel {
        fn predict(&self, _features: &FeatureVector) -> Result<ModelOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ModelOutput {
                survived: self.probability >= 0.5,
                probability: self.probability,
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Records the last feature vector it saw.
    struct RecordingModel {
        seen: std::sync::Mutex<Option<FeatureVector>>,
    }

    impl SurvivalModel for RecordingModel {
        fn predict(&self, features: &FeatureVector) -> Result<ModelOutput> {
            *self.seen.lock().unwrap() = Some(*features);
            Ok(ModelOutput {
                survived: true,
                probability: 0.9,
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FailingModel;

    impl SurvivalModel for FailingModel {
        fn predict(&self, _features: &FeatureVector) -> Result<ModelOutput> {
            Err(LifeboatError::Config("weights unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn resolver_with(model: Arc<dyn SurvivalModel>) -> OutcomeResolver {
        OutcomeResolver::new(Arc::new(OverrideTable::default()), model)
    }

    #[test]
    fn test_always_survive_ignores_other_fields() {
        let model = Arc::new(FixedModel::new(0.0));
        let resolver = resolver_with(model.clone());
        for bracket in IncomeBracket::ALL {
            for sex in [Sex::Male, Sex::Female] {
                for age in [1, 30, 80] {
                    let input = FormInput::new("  KARTIK ", sex, age, bracket);
                    let result = resolver.resolve(&input).unwrap();
                    assert!(result.survived);
                    assert_eq!(result.probability, None);
                    assert_eq!(result.verdict_source, VerdictSource::Override);
                }
            }
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_never_survive_ignores_other_fields() {
        let resolver = resolver_with(Arc::new(FixedModel::new(1.0)));
        for bracket in IncomeBracket::ALL {
            for sex in [Sex::Male, Sex::Female] {
                let input = FormInput::new("mohit", sex, 5, bracket);
                let result = resolver.resolve(&input).unwrap();
                assert!(!result.survived);
                assert_eq!(result.probability, None);
                assert_eq!(result.verdict_source, VerdictSource::Override);
            }
        }
    }

    #[test]
    fn test_kartik_scenario() {
        let resolver = resolver_with(Arc::new(FixedModel::new(0.1)));
        let input = FormInput::new("Kartik", Sex::Male, 30, IncomeBracket::Low);
        let result = resolver.resolve(&input).unwrap();
        assert!(result.survived);
        assert!(result.probability.is_none());
    }

    #[test]
    fn test_mohit_scenario() {
        let resolver = resolver_with(Arc::new(FixedModel::new(0.9)));
        let input = FormInput::new("Mohit", Sex::Female, 5, IncomeBracket::High);
        let result = resolver.resolve(&input).unwrap();
        assert!(!result.survived);
        assert_eq!(result.verdict_source, VerdictSource::Override);
    }

    #[test]
    fn test_empty_name_uses_model_with_mapped_features() {
        let model = Arc::new(RecordingModel {
            seen: std::sync::Mutex::new(None),
        });
        let resolver = resolver_with(model.clone());
        let input = FormInput::new("", Sex::Female, 22, IncomeBracket::High);
        let result = resolver.resolve(&input).unwrap();

        assert_eq!(result.verdict_source, VerdictSource::Model);
        let p = result.probability.unwrap();
        assert!((0.0..=1.0).contains(&p));
        assert_eq!(
            *model.seen.lock().unwrap(),
            Some(FeatureVector {
                pclass: 1,
                sex: 0,
                age: 22
            })
        );
    }

    #[test]
    fn test_unknown_name_uses_model() {
        let model = Arc::new(FixedModel::new(0.3));
        let resolver = resolver_with(model.clone());
        let input = FormInput::new("Rose", Sex::Female, 17, IncomeBracket::High);
        let result = resolver.resolve(&input).unwrap();
        assert_eq!(result.verdict_source, VerdictSource::Model);
        assert!(!result.survived);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_probability_is_clamped() {
        let resolver = resolver_with(Arc::new(FixedModel::new(1.7)));
        let input = FormInput::new("", Sex::Male, 40, IncomeBracket::Middle);
        assert_eq!(resolver.resolve(&input).unwrap().probability, Some(1.0));

        let resolver = resolver_with(Arc::new(FixedModel::new(-0.2)));
        assert_eq!(resolver.resolve(&input).unwrap().probability, Some(0.0));
    }

    #[test]
    fn test_non_finite_probability_is_prediction_error() {
        let resolver = resolver_with(Arc::new(FixedModel::new(f64::NAN)));
        let input = FormInput::new("", Sex::Male, 40, IncomeBracket::Middle);
        assert!(matches!(
            resolver.resolve(&input),
            Err(LifeboatError::Prediction(_))
        ));
    }

    #[test]
    fn test_model_failure_becomes_prediction_error() {
        let resolver = resolver_with(Arc::new(FailingModel));
        let input = FormInput::new("", Sex::Male, 40, IncomeBracket::Low);
        let err = resolver.resolve(&input).unwrap_err();
        assert!(matches!(err, LifeboatError::Prediction(_)));
        assert!(err.to_string().contains("weights unavailable"));
    }

    #[test]
    fn test_out_of_range_age_is_prediction_error() {
        let model = Arc::new(FixedModel::new(0.5));
        let resolver = resolver_with(model.clone());
        for age in [0, 81, 200] {
            let input = FormInput::new("", Sex::Male, age, IncomeBracket::Low);
            assert!(matches!(
                resolver.resolve(&input),
                Err(LifeboatError::Prediction(_))
            ));
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_override_applies_even_with_out_of_range_age() {
        let resolver = resolver_with(Arc::new(FailingModel));
        let input = FormInput::new("kartik", Sex::Male, 0, IncomeBracket::Low);
        assert!(resolver.resolve(&input).unwrap().survived);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = resolver_with(Arc::new(FixedModel::new(0.42)));
        let input = FormInput::new("Jack", Sex::Male, 20, IncomeBracket::Low);
        let first = resolver.resolve(&input).unwrap();
        let second = resolver.resolve(&input).unwrap();
        assert_eq!(first, second);
    }
}
