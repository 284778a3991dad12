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

//! Reporting over analysis results
//!
//! Reports are a presentation convenience for the outbound contract; they
//! never affect analysis semantics.

pub mod formatter;

pub use formatter::{FormatError, JsonFormatter, ReportFormatter, TextFormatter};

use crate::analyzer::{AnalysisStats, PathAnalysis};
use crate::callgraph::CallGraph;
use pathsight_model::{ArtifactArena, ArtifactId, ArtifactKind};
use serde::Serialize;

/// Output format for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportFormat {
    Text,
    Json,
}

/// One realized condition of one path
#[derive(Debug, Clone, Serialize)]
pub struct ConditionSummary {
    /// Conditional artifact
    pub template: ArtifactId,
    /// Side the path takes
    pub taken: bool,
    /// Probability of that side; `None` when unknown
    pub probability: Option<f64>,
}

/// Summary of one procedural path
#[derive(Debug, Clone, Serialize)]
pub struct PathSummary {
    /// Position in the path set's iteration order
    pub index: usize,
    /// Artifacts traversed
    pub artifact_count: usize,
    /// Realized conditions in traversal order
    pub conditions: Vec<ConditionSummary>,
    /// Names of functions reached through resolved calls
    pub resolved_calls: Vec<String>,
}

/// Call graph counters attached to a report
#[derive(Debug, Clone, Serialize)]
pub struct CallGraphSummary {
    pub functions: usize,
    pub call_edges: usize,
    pub unresolved_calls: usize,
    pub recursive_functions: usize,
}

/// Summary of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Artifact the analysis started from
    pub root: ArtifactId,
    /// Function name when the root is a function
    pub root_name: Option<String>,
    /// Number of paths returned
    pub path_count: usize,
    /// Per-path summaries
    pub paths: Vec<PathSummary>,
    /// Run statistics
    pub stats: AnalysisStats,
    /// Call graph counters, when a graph was attached
    pub call_graph: Option<CallGraphSummary>,
}

impl AnalysisReport {
    /// Summarize an analysis run
    pub fn from_analysis(arena: &ArtifactArena, root: ArtifactId, analysis: &PathAnalysis) -> Self {
        let root_name = arena.kind(root).and_then(ArtifactKind::as_function).map(|function| function.name.clone());
        let paths = analysis
            .paths
            .iter()
            .enumerate()
            .map(|(index, path)| PathSummary {
                index,
                artifact_count: path.artifact_count(),
                conditions: path
                    .branch_realizations()
                    .map(|branch| ConditionSummary {
                        template: branch.template,
                        taken: branch.taken,
                        probability: if branch.probability.is_nan() { None } else { Some(branch.probability) },
                    })
                    .collect(),
                resolved_calls: path
                    .resolved_call_functions()
                    .into_iter()
                    .filter_map(|function| arena.kind(function).and_then(ArtifactKind::as_function).map(|f| f.name.clone()))
                    .collect(),
            })
            .collect();

        Self {
            root,
            root_name,
            path_count: analysis.paths.len(),
            paths,
            stats: analysis.stats.clone(),
            call_graph: None,
        }
    }

    /// Attach call graph counters
    pub fn with_call_graph(mut self, graph: &CallGraph) -> Self {
        self.call_graph = Some(CallGraphSummary {
            functions: graph.function_count(),
            call_edges: graph.call_edge_count(),
            unresolved_calls: graph.unresolved_call_count(),
            recursive_functions: graph.recursive_function_count(),
        });
        self
    }
}
