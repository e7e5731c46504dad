//! Pre-trained survival model adapters for Lifeboat
//!
//! Loads a serialized classifier once at startup and exposes it through the
//! [`lifeboat_core::SurvivalModel`] trait. Two artifact formats are
//! supported:
//!
//! - `*.json` — logistic regression coefficients ([`LogisticModel`]).
//! - `*.safetensors` — a small candle MLP ([`MlpModel`], `ml` feature only).
//!
//! Relative artifact paths are resolved against the directory holding the
//! running executable, see [`artifact::resolve_artifact_path`].

pub mod artifact;
pub mod inference_stats;
pub mod logistic;
#[cfg(feature = "ml")]
pub mod mlp;

pub use artifact::{load_model, resolve_artifact_path};
pub use inference_stats::{InferenceStats, InferenceStatsTracker, TrackedModel};
pub use logistic::LogisticModel;
#[cfg(feature = "ml")]
pub use mlp::MlpModel;
