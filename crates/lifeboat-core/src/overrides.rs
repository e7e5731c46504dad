//! Fixed name lists that bypass the model.
//!
//! Names are matched case-insensitively after trimming. The always-survive
//! set is consulted first, so a name present in both lists survives.

use crate::OverrideConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in names that always survive.
pub const DEFAULT_ALWAYS_SURVIVE: &[&str] = &["kartik"];

/// Built-in names that never survive.
pub const DEFAULT_NEVER_SURVIVE: &[&str] = &["mohit"];

/// Fixed verdict returned by an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AlwaysSurvive,
    NeverSurvive,
}

impl Verdict {
    pub fn survived(self) -> bool {
        matches!(self, Self::AlwaysSurvive)
    }
}

/// Immutable override lookup table.
#[derive(Debug, Clone)]
pub struct OverrideTable {
    always_survive: HashSet<String>,
    never_survive: HashSet<String>,
}

impl OverrideTable {
    /// Build a table from two name lists. Names are normalized and blank
    /// entries dropped.
    pub fn new<A, N>(always_survive: A, never_survive: N) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            always_survive: normalize_all(always_survive),
            never_survive: normalize_all(never_survive),
        }
    }

    pub fn from_config(config: &OverrideConfig) -> Self {
        Self::new(&config.always_survive, &config.never_survive)
    }

    /// Look up a verdict for `name`.
    pub fn lookup(&self, name: &str) -> Option<Verdict> {
        let key = normalize(name);
        if key.is_empty() {
            return None;
        }
        if self.always_survive.contains(&key) {
            Some(Verdict::AlwaysSurvive)
        } else if self.never_survive.contains(&key) {
            Some(Verdict::NeverSurvive)
        } else {
            None
        }
    }

    /// Number of distinct names that carry a verdict. A name on both lists
    /// is counted once.
    pub fn len(&self) -> usize {
        self.always_survive.union(&self.never_survive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.always_survive.is_empty() && self.never_survive.is_empty()
    }
}

impl Default for OverrideTable {
    fn default() -> Self {
        Self::new(DEFAULT_ALWAYS_SURVIVE, DEFAULT_NEVER_SURVIVE)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalize_all<I>(names: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| normalize(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect()
}
