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

//! Language-agnostic artifact model for procedural path analysis
//!
//! A language adapter maps its source syntax tree into the closed artifact
//! variant set held in an [`arena::ArtifactArena`] and registers functions
//! in a [`registry::FunctionRegistry`]. The analysis engine reads the arena,
//! evaluates static branch probabilities, and records per-run annotations
//! in an [`insight::InsightContext`].

pub mod arena;
pub mod artifact;
pub mod insight;
pub mod probability;
pub mod registry;

// Re-export commonly used types for convenience
pub use arena::{ArtifactArena, ArtifactId};
pub use artifact::{
    Artifact, ArtifactKind, BinaryArtifact, CallArtifact, FunctionArtifact, GenericArtifact, IfArtifact, LiteralArtifact, SourceRef,
};
pub use insight::{InsightContext, InsightKey, InsightValue};
pub use probability::{LiteralBindings, branch_probability, branch_probability_with, condition_probability, literal_text};
pub use registry::{CallResolver, FunctionRegistry, ModelError, NullResolver};
