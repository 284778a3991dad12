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

//! Static branch probability annotation pass

use crate::error::{AnalysisError, AnalysisResult};
use crate::passes::{ArtifactPass, PassOutcome};
use pathsight_model::{ArtifactArena, ArtifactId, ArtifactKind, InsightContext, branch_probability};

/// Annotates every conditional under the root with its static probability.
///
/// Values land in the run's insight context under
/// `ControlStructureProbability`; conditionals whose condition is not
/// statically decidable are annotated NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlStructureProbabilityPass;

impl ControlStructureProbabilityPass {
    /// Create a new probability pass
    pub fn new() -> Self {
        Self
    }

    fn visit(&self, arena: &ArtifactArena, id: ArtifactId, insights: &mut InsightContext, annotations: &mut usize) {
        match arena.kind(id) {
            Some(ArtifactKind::If(if_artifact)) => {
                insights.set_probability(id, branch_probability(arena, id));
                *annotations += 1;
                for &child in &if_artifact.then_children {
                    self.visit(arena, child, insights, annotations);
                }
                for &child in &if_artifact.else_children {
                    self.visit(arena, child, insights, annotations);
                }
            }
            Some(ArtifactKind::Function(function)) => {
                for &child in &function.body {
                    self.visit(arena, child, insights, annotations);
                }
            }
            Some(ArtifactKind::Generic(generic)) => {
                for &child in &generic.children {
                    self.visit(arena, child, insights, annotations);
                }
            }
            Some(ArtifactKind::Call(call)) => {
                for &arg in &call.args {
                    self.visit(arena, arg, insights, annotations);
                }
            }
            Some(ArtifactKind::Binary(binary)) => {
                self.visit(arena, binary.lhs, insights, annotations);
                self.visit(arena, binary.rhs, insights, annotations);
            }
            Some(ArtifactKind::Literal(_)) | None => {}
        }
    }
}

impl ArtifactPass for ControlStructureProbabilityPass {
    fn name(&self) -> &str {
        "control-structure-probability"
    }

    fn description(&self) -> &str {
        "Annotates conditionals with statically derivable branch probabilities"
    }

    fn run(&self, arena: &ArtifactArena, root: ArtifactId, insights: &mut InsightContext) -> AnalysisResult<PassOutcome> {
        if !arena.contains(root) {
            return Err(AnalysisError::UnknownArtifact(root));
        }
        let mut annotations = 0;
        self.visit(arena, root, insights, &mut annotations);
        Ok(PassOutcome {
            changed: annotations > 0,
            annotations,
        })
    }
}
