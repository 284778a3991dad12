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

//! Pass pipeline configuration

use crate::error::{AnalysisError, AnalysisResult};
use crate::passes::probability::ControlStructureProbabilityPass;
use crate::passes::simplify::SimplifyPathSetPass;
use crate::passes::{ArtifactPass, PathSetPass};
use std::fmt;

/// Name of the default pipeline
pub const PIPELINE_FULL: &str = "full";
/// Name of the inspection pipeline that skips simplification
pub const PIPELINE_FULL_NO_SIMPLIFY: &str = "full-no-simplify";

/// Ordered pass configuration handed to the analyzer.
///
/// A provider is an explicit value, not process-wide state; build one per
/// analyzer. Passes run in the order they are held here.
pub struct PassProvider {
    name: String,
    artifact_passes: Vec<Box<dyn ArtifactPass>>,
    path_passes: Vec<Box<dyn PathSetPass>>,
}

impl PassProvider {
    /// Default pipeline: probability annotation, then simplification
    pub fn full() -> Self {
        Self {
            name: PIPELINE_FULL.to_string(),
            artifact_passes: vec![Box::new(ControlStructureProbabilityPass::new())],
            path_passes: vec![Box::new(SimplifyPathSetPass::new())],
        }
    }

    /// Probability annotation without simplification, for inspecting the
    /// pre-simplification path set
    pub fn full_no_simplify() -> Self {
        Self {
            name: PIPELINE_FULL_NO_SIMPLIFY.to_string(),
            artifact_passes: vec![Box::new(ControlStructureProbabilityPass::new())],
            path_passes: Vec::new(),
        }
    }

    /// Look up a named pipeline
    pub fn by_name(name: &str) -> AnalysisResult<Self> {
        match name {
            PIPELINE_FULL => Ok(Self::full()),
            PIPELINE_FULL_NO_SIMPLIFY => Ok(Self::full_no_simplify()),
            _ => Err(AnalysisError::UnknownPipeline(name.to_string())),
        }
    }

    /// Assemble a custom ordered pipeline
    pub fn custom(name: impl Into<String>, artifact_passes: Vec<Box<dyn ArtifactPass>>, path_passes: Vec<Box<dyn PathSetPass>>) -> Self {
        Self {
            name: name.into(),
            artifact_passes,
            path_passes,
        }
    }

    /// Name of this pipeline
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Artifact-level passes in execution order
    pub fn artifact_passes(&self) -> &[Box<dyn ArtifactPass>] {
        &self.artifact_passes
    }

    /// Path-set passes in execution order
    pub fn path_passes(&self) -> &[Box<dyn PathSetPass>] {
        &self.path_passes
    }
}

impl Default for PassProvider {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Debug for PassProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassProvider")
            .field("name", &self.name)
            .field("artifact_passes", &self.artifact_passes.iter().map(|pass| pass.name()).collect::<Vec<_>>())
            .field("path_passes", &self.path_passes.iter().map(|pass| pass.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_pipelines() {
        let full = PassProvider::by_name(PIPELINE_FULL).unwrap();
        assert_eq!(full.artifact_passes().len(), 1);
        assert_eq!(full.path_passes().len(), 1);
        assert_eq!(full.path_passes()[0].name(), "simplify");

        let no_simplify = PassProvider::by_name(PIPELINE_FULL_NO_SIMPLIFY).unwrap();
        assert_eq!(no_simplify.artifact_passes().len(), 1);
        assert!(no_simplify.path_passes().is_empty());
    }

    #[test]
    fn test_unknown_pipeline_name() {
        let result = PassProvider::by_name("fastest");
        assert!(matches!(result, Err(AnalysisError::UnknownPipeline(name)) if name == "fastest"));
    }

    #[test]
    fn test_custom_pipeline_keeps_order() {
        let provider = PassProvider::custom(
            "probability-twice",
            vec![
                Box::new(ControlStructureProbabilityPass::new()),
                Box::new(ControlStructureProbabilityPass::new()),
            ],
            Vec::new(),
        );
        assert_eq!(provider.name(), "probability-twice");
        assert_eq!(provider.artifact_passes().len(), 2);
    }
}
