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

//! Procedural path analysis engine
//!
//! Given a root artifact built by a language adapter (see
//! `pathsight-model`), the [`analyzer::PathAnalyzer`] enumerates every
//! feasible execution path through it: conditionals fork the walk,
//! resolved calls splice their callee's paths in, and the configured
//! [`passes::provider::PassProvider`] pipeline annotates branch
//! probabilities and prunes statically impossible paths.

pub mod analyzer;
pub mod callgraph;
pub mod error;
pub mod passes;
pub mod path;
pub mod reporting;

// Re-export commonly used types for convenience
pub use analyzer::{AnalysisStats, AnalyzerConfig, PathAnalysis, PathAnalyzer};
pub use callgraph::{CallGraph, CallGraphBuilder};
pub use error::{AnalysisError, AnalysisResult, ErrorCategory};
pub use passes::probability::ControlStructureProbabilityPass;
pub use passes::provider::{PIPELINE_FULL, PIPELINE_FULL_NO_SIMPLIFY, PassProvider};
pub use passes::simplify::SimplifyPathSetPass;
pub use passes::{ArtifactPass, PassMetrics, PassOutcome, PathSetPass};
pub use path::{BranchRealization, CallRealization, PathSet, PathStep, ProceduralPath};
pub use reporting::{AnalysisReport, JsonFormatter, ReportFormat, ReportFormatter, TextFormatter};
