//! Analysis passes: interfaces, outcomes, and metrics

pub mod probability;
pub mod provider;
pub mod simplify;

use crate::error::AnalysisResult;
use crate::path::PathSet;
use pathsight_model::{ArtifactArena, ArtifactId, InsightContext};
use serde::Serialize;

/// Outcome of one artifact-level pass invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct PassOutcome {
    /// Whether the pass recorded anything
    pub changed: bool,
    /// Number of insight values written
    pub annotations: usize,
}

/// Metrics for a single pass invocation
#[derive(Debug, Clone, Serialize)]
pub struct PassMetrics {
    /// Name of the pass
    pub pass_name: String,
    /// Whether the pass changed its input
    pub changed: bool,
    /// Insight values written, or paths removed, depending on pass kind
    pub annotations: usize,
}

/// Trait representing a pre-traversal pass over the artifact tree.
///
/// A pass is invoked once per analysis run. It may read and write insight
/// values but never mutates tree topology; the arena is immutable by
/// construction. Given the same tree and pass list, the values written
/// must be identical across runs.
pub trait ArtifactPass {
    /// Unique name of the pass
    fn name(&self) -> &str;
    /// Short description of the pass
    fn description(&self) -> &str;
    /// Run the pass over the subtree rooted at `root`
    fn run(&self, arena: &ArtifactArena, root: ArtifactId, insights: &mut InsightContext) -> AnalysisResult<PassOutcome>;
}

/// Trait representing a post-traversal pass over the generated path set.
///
/// A path-set pass is a pure filter/reduction: it returns a subset (or
/// transformation) of its input and owns no state between invocations.
pub trait PathSetPass {
    /// Unique name of the pass
    fn name(&self) -> &str;
    /// Short description of the pass
    fn description(&self) -> &str;
    /// Run the pass, returning the surviving path set
    fn post_process(&self, paths: PathSet, arena: &ArtifactArena, insights: &InsightContext) -> PathSet;
}
