//! Feature mapping from form choices to the model's numeric inputs.
//!
//! # Feature Vector Layout
//!
//! | Index | Feature  | Values                         |
//! |-------|----------|--------------------------------|
//! | 0     | `Pclass` | 1 (high), 2 (middle), 3 (low)  |
//! | 1     | `Sex`    | 1 (male), 0 (female)           |
//! | 2     | `Age`    | passed through from the form   |

use crate::{FormInput, IncomeBracket, Sex};
use serde::{Deserialize, Serialize};

/// Number of features the model consumes.
pub const FEATURE_DIM: usize = 3;

/// Feature names in model column order.
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = ["Pclass", "Sex", "Age"];

/// The fixed-shape numeric record a model consumes for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector {
    pub pclass: u8,
    pub sex: u8,
    pub age: u32,
}

impl FeatureVector {
    /// Map a form submission to model features.
    pub fn from_input(input: &FormInput) -> Self {
        Self {
            pclass: pclass_for(input.income_bracket),
            sex: sex_code(input.sex),
            age: input.age,
        }
    }

    /// Features as `f64` in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_DIM] {
        [f64::from(self.pclass), f64::from(self.sex), f64::from(self.age)]
    }

    /// Features as `f32` in [`FEATURE_NAMES`] order.
    pub fn to_f32_array(&self) -> [f32; FEATURE_DIM] {
        [f32::from(self.pclass), f32::from(self.sex), self.age as f32]
    }
}

/// Ticket class for an income bracket.
pub fn pclass_for(bracket: IncomeBracket) -> u8 {
    match bracket {
        IncomeBracket::High => 1,
        IncomeBracket::Middle => 2,
        IncomeBracket::Low => 3,
    }
}

/// Numeric sex code (male = 1, female = 0).
pub fn sex_code(sex: Sex) -> u8 {
    match sex {
        Sex::Male => 1,
        Sex::Female => 0,
    }
}
