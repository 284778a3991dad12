// Pathsight
// Copyright (C) 2025 Pathsight Contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Insight key/value side table
//!
//! Insight values annotate artifacts for the lifetime of ONE analysis run.
//! A fresh context is created per run and nothing is attached to the arena,
//! so runs sharing a tree can never observe each other's values.

use crate::arena::ArtifactId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named slot for a typed analysis annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightKey {
    /// Probability that a control structure's branch is taken
    ControlStructureProbability,
    /// Truth value a condition evaluated to along one path
    ConditionEvaluation,
}

impl InsightKey {
    /// Key name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ControlStructureProbability => "control_structure_probability",
            Self::ConditionEvaluation => "condition_evaluation",
        }
    }

    /// Whether a value is of the type this key carries
    pub fn accepts(&self, value: &InsightValue) -> bool {
        match self {
            Self::ControlStructureProbability => matches!(value, InsightValue::Probability(_)),
            Self::ConditionEvaluation => matches!(value, InsightValue::Truth(_)),
        }
    }
}

/// Tagged value for an insight slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InsightValue {
    Probability(f64),
    Truth(bool),
}

impl InsightValue {
    /// Probability payload, if any
    pub fn as_probability(&self) -> Option<f64> {
        match self {
            Self::Probability(probability) => Some(*probability),
            _ => None,
        }
    }

    /// Truth payload, if any
    pub fn as_truth(&self) -> Option<bool> {
        match self {
            Self::Truth(truth) => Some(*truth),
            _ => None,
        }
    }
}

/// Side table scoping insight values to one analysis run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightContext {
    values: HashMap<(ArtifactId, InsightKey), InsightValue>,
}

impl InsightContext {
    /// Create an empty context for a fresh run
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values recorded
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Record a value for an artifact's slot.
    ///
    /// A key/value type mismatch is a programming defect, not data.
    pub fn set(&mut self, id: ArtifactId, key: InsightKey, value: InsightValue) {
        debug_assert!(key.accepts(&value), "insight value type does not match key {}", key.as_str());
        self.values.insert((id, key), value);
    }

    /// Value recorded for an artifact's slot
    pub fn get(&self, id: ArtifactId, key: InsightKey) -> Option<&InsightValue> {
        self.values.get(&(id, key))
    }

    /// Record a branch probability
    pub fn set_probability(&mut self, id: ArtifactId, probability: f64) {
        self.set(id, InsightKey::ControlStructureProbability, InsightValue::Probability(probability));
    }

    /// Branch probability recorded for an artifact
    pub fn probability(&self, id: ArtifactId) -> Option<f64> {
        self.get(id, InsightKey::ControlStructureProbability).and_then(InsightValue::as_probability)
    }

    /// Condition truth recorded for an artifact
    pub fn truth(&self, id: ArtifactId) -> Option<bool> {
        self.get(id, InsightKey::ConditionEvaluation).and_then(InsightValue::as_truth)
    }
}
