//! Small feed-forward survival classifier on candle.
//!
//! # Architecture
//!
//! ```text
//! Input (3) → Linear(H) → ReLU → Linear(2) → Softmax
//! ```
//!
//! Weights come from a safetensors file holding `fc1.weight` `[H, 3]`,
//! `fc1.bias` `[H]`, `fc2.weight` `[2, H]` and `fc2.bias` `[2]`. The hidden
//! width `H` is read from the file. Class 1 is "survived".
//!
//! # Feature Gate
//!
//! This module is only available when the `ml` feature is enabled.

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder, VarMap};
use lifeboat_core::features::FEATURE_DIM;
use lifeboat_core::{FeatureVector, LifeboatError, ModelOutput, Result, SurvivalModel};
use std::collections::HashMap;
use std::path::Path;

/// Number of output classes (perished, survived).
const NUM_CLASSES: usize = 2;

/// Two-layer MLP survival classifier.
pub struct MlpModel {
    fc1: Linear,
    fc2: Linear,
    hidden: usize,
    device: Device,
}

impl MlpModel {
    /// Create a classifier with random weights. Only useful for checking
    /// the wiring.
    pub fn new_random(hidden: usize, device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let fc1 = candle_nn::linear(FEATURE_DIM, hidden, vb.pp("fc1"))
            .map_err(|e| LifeboatError::ModelLoad(format!("failed to create fc1: {e}")))?;
        let fc2 = candle_nn::linear(hidden, NUM_CLASSES, vb.pp("fc2"))
            .map_err(|e| LifeboatError::ModelLoad(format!("failed to create fc2: {e}")))?;
        Ok(Self {
            fc1,
            fc2,
            hidden,
            device: device.clone(),
        })
    }

    /// Load trained weights from a safetensors file onto the CPU.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_on(path, &Device::Cpu)
    }

    pub fn load_on(path: &Path, device: &Device) -> Result<Self> {
        let mut tensors = candle_core::safetensors::load(path, device).map_err(|e| {
            LifeboatError::ModelLoad(format!(
                "failed to read safetensors {}: {e}",
                path.display()
            ))
        })?;

        let w1 = take(&mut tensors, "fc1.weight")?;
        let b1 = take(&mut tensors, "fc1.bias")?;
        let w2 = take(&mut tensors, "fc2.weight")?;
        let b2 = take(&mut tensors, "fc2.bias")?;

        let (hidden, in_dim) = w1
            .dims2()
            .map_err(|e| LifeboatError::ModelLoad(format!("fc1.weight: {e}")))?;
        if in_dim != FEATURE_DIM {
            return Err(LifeboatError::ModelLoad(format!(
                "fc1.weight expects {in_dim} inputs, the form provides {FEATURE_DIM}"
            )));
        }
        expect_dims(&b1, &[hidden], "fc1.bias")?;
        expect_dims(&w2, &[NUM_CLASSES, hidden], "fc2.weight")?;
        expect_dims(&b2, &[NUM_CLASSES], "fc2.bias")?;

        let to_f32 = |t: Tensor, name: &str| {
            t.to_dtype(DType::F32)
                .map_err(|e| LifeboatError::ModelLoad(format!("{name}: {e}")))
        };

        Ok(Self {
            fc1: Linear::new(to_f32(w1, "fc1.weight")?, Some(to_f32(b1, "fc1.bias")?)),
            fc2: Linear::new(to_f32(w2, "fc2.weight")?, Some(to_f32(b2, "fc2.bias")?)),
            hidden,
            device: device.clone(),
        })
    }

    /// Softmax probabilities `(perished, survived)` for `features`.
    pub fn class_probabilities(&self, features: &FeatureVector) -> Result<(f64, f64)> {
        let err = |stage: &str, e: candle_core::Error| {
            LifeboatError::Prediction(format!("mlp {stage} failed: {e}"))
        };

        let raw = features.to_f32_array();
        let input = Tensor::new(&raw[..], &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| err("input", e))?;

        let hidden = self
            .fc1
            .forward(&input)
            .and_then(|t| t.relu())
            .map_err(|e| err("fc1", e))?;
        let logits = self.fc2.forward(&hidden).map_err(|e| err("fc2", e))?;

        let probs: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|p| p.squeeze(0))
            .and_then(|p| p.to_vec1())
            .map_err(|e| err("softmax", e))?;

        match probs.as_slice() {
            [perished, survived] => Ok((f64::from(*perished), f64::from(*survived))),
            other => Err(LifeboatError::Prediction(format!(
                "mlp produced {} classes, expected {NUM_CLASSES}",
                other.len()
            ))),
        }
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden
    }
}

impl SurvivalModel for MlpModel {
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput> {
        let (perished, survived) = self.class_probabilities(features)?;
        Ok(ModelOutput {
            survived: survived >= perished,
            probability: survived,
        })
    }

    fn name(&self) -> &str {
        "mlp"
    }
}

fn take(tensors: &mut HashMap<String, Tensor>, name: &str) -> Result<Tensor> {
    tensors
        .remove(name)
        .ok_or_else(|| LifeboatError::ModelLoad(format!("missing tensor '{name}'")))
}

fn expect_dims(t: &Tensor, expected: &[usize], name: &str) -> Result<()> {
    if t.dims() == expected {
        Ok(())
    } else {
        Err(LifeboatError::ModelLoad(format!(
            "{name} has shape {:?}, expected {expected:?}",
            t.dims()
        )))
    }
}
