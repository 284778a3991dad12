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

//! Runtime path analyzer
//!
//! Depth-first expansion of an artifact tree into the set of feasible
//! procedural paths: conditionals fork the walk, resolved calls splice the
//! callee's paths in as continuations, and the configured pass pipeline
//! annotates and prunes the result. Unresolvable references never fail an
//! analysis; they degrade to leaves and unknown probabilities.

pub mod guard;

use crate::analyzer::guard::{CallStackGuard, GuardOutcome};
use crate::error::{AnalysisError, AnalysisResult};
use crate::passes::PassMetrics;
use crate::passes::provider::PassProvider;
use crate::path::{BranchRealization, CallRealization, PathSet, PathStep, ProceduralPath};
use pathsight_model::{
    ArtifactArena, ArtifactId, ArtifactKind, CallArtifact, CallResolver, InsightContext, LiteralBindings, branch_probability,
    branch_probability_with, literal_text,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Analyzer tunables
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Nested call expansion bound, the analyzed function included;
    /// calls beyond it degrade to leaves
    pub max_call_depth: usize,
    /// Bind literal arguments to callee parameters during expansion
    pub propagate_literals: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 32,
            propagate_literals: true,
        }
    }
}

/// Statistics recorded over one analysis run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisStats {
    /// Distinct paths produced by the traversal
    pub paths_generated: usize,
    /// Paths surviving the path-set passes
    pub paths_returned: usize,
    /// Branch realizations produced
    pub branches_realized: usize,
    /// Calls expanded into their resolved target
    pub calls_resolved: usize,
    /// Calls left as leaves because resolution failed
    pub calls_unresolved: usize,
    /// Calls left as leaves by the cycle guard
    pub calls_cyclic: usize,
    /// Calls left as leaves by the depth cap
    pub calls_depth_capped: usize,
    /// Function bodies entered, the root included
    pub functions_entered: usize,
    /// Per-pass metrics in execution order
    pub pass_metrics: Vec<PassMetrics>,
}

/// Result of one analysis run
#[derive(Debug)]
pub struct PathAnalysis {
    /// Feasible paths after the pass pipeline
    pub paths: PathSet,
    /// Insight values recorded by the artifact passes
    pub insights: InsightContext,
    /// Run statistics
    pub stats: AnalysisStats,
}

/// Procedural path analyzer.
///
/// Borrows the arena and resolver, owns its pipeline and configuration.
/// Each `analyze` call runs on fresh per-run state, so one analyzer can be
/// reused sequentially; concurrent analyses should use separate analyzer
/// instances over the shared (immutable) arena.
pub struct PathAnalyzer<'a> {
    arena: &'a ArtifactArena,
    resolver: &'a dyn CallResolver,
    provider: PassProvider,
    config: AnalyzerConfig,
}

impl<'a> PathAnalyzer<'a> {
    /// Analyzer with the default ("full") pipeline and configuration
    pub fn new(arena: &'a ArtifactArena, resolver: &'a dyn CallResolver) -> Self {
        Self::with_provider(arena, resolver, PassProvider::full())
    }

    /// Analyzer with an explicit pass pipeline
    pub fn with_provider(arena: &'a ArtifactArena, resolver: &'a dyn CallResolver, provider: PassProvider) -> Self {
        Self {
            arena,
            resolver,
            provider,
            config: AnalyzerConfig::default(),
        }
    }

    /// Replace the analyzer configuration
    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Pipeline this analyzer runs
    pub fn provider(&self) -> &PassProvider {
        &self.provider
    }

    /// Enumerate the feasible procedural paths reachable from `root`.
    ///
    /// A function root analyzes its body; any other artifact is analyzed
    /// as a single-element body.
    pub fn analyze(&self, root: ArtifactId) -> AnalysisResult<PathAnalysis> {
        let body: Vec<ArtifactId> = match self.arena.kind(root) {
            None => return Err(AnalysisError::UnknownArtifact(root)),
            Some(ArtifactKind::Function(function)) => function.body.clone(),
            Some(_) => vec![root],
        };
        debug!("starting path analysis of {} with pipeline {}", root, self.provider.name());

        let mut insights = InsightContext::new();
        let mut stats = AnalysisStats::default();

        for pass in self.provider.artifact_passes() {
            let outcome = pass.run(self.arena, root, &mut insights)?;
            stats.pass_metrics.push(PassMetrics {
                pass_name: pass.name().to_string(),
                changed: outcome.changed,
                annotations: outcome.annotations,
            });
        }

        let mut guard = CallStackGuard::new(self.config.max_call_depth);
        let mut bindings = LiteralBindings::new();
        if matches!(self.arena.kind(root), Some(ArtifactKind::Function(_))) {
            // The root occupies the first guard slot so direct recursion
            // onto it stops at the first re-entry.
            guard.enter(root);
            stats.functions_entered += 1;
        }

        let sequences = self.expand_sequence(&body, &insights, &mut guard, &mut bindings, &mut stats);

        let mut paths = PathSet::new();
        for steps in sequences {
            paths.insert(ProceduralPath::new(root, steps));
        }
        stats.paths_generated = paths.len();

        for pass in self.provider.path_passes() {
            let before = paths.len();
            paths = pass.post_process(paths, self.arena, &insights);
            stats.pass_metrics.push(PassMetrics {
                pass_name: pass.name().to_string(),
                changed: paths.len() != before,
                annotations: before.saturating_sub(paths.len()),
            });
        }
        stats.paths_returned = paths.len();

        debug!(
            "path analysis of {} finished: {} generated, {} returned",
            root, stats.paths_generated, stats.paths_returned
        );
        Ok(PathAnalysis { paths, insights, stats })
    }

    /// Expand a statement sequence into every step sequence it can take.
    fn expand_sequence(
        &self,
        items: &[ArtifactId],
        insights: &InsightContext,
        guard: &mut CallStackGuard,
        bindings: &mut LiteralBindings,
        stats: &mut AnalysisStats,
    ) -> Vec<Vec<PathStep>> {
        let Some((&first, rest)) = items.split_first() else {
            return vec![Vec::new()];
        };

        match self.arena.kind(first) {
            None => {
                warn!("skipping dangling artifact reference {}", first);
                self.expand_sequence(rest, insights, guard, bindings, stats)
            }
            Some(ArtifactKind::If(if_artifact)) => {
                let tails = self.expand_sequence(rest, insights, guard, bindings, stats);
                let truth_probability = self.realized_probability(first, insights, bindings);

                let mut out = Vec::new();
                for (taken, children) in [(true, &if_artifact.then_children), (false, &if_artifact.else_children)] {
                    stats.branches_realized += 1;
                    let probability = if taken { truth_probability } else { 1.0 - truth_probability };
                    let head = PathStep::Branch(BranchRealization {
                        template: first,
                        taken,
                        children: children.clone(),
                        probability,
                    });
                    let subs = self.expand_sequence(children, insights, guard, bindings, stats);
                    for sub in &subs {
                        for tail in &tails {
                            out.push(splice(&head, sub, tail));
                        }
                    }
                }
                out
            }
            Some(ArtifactKind::Call(call)) => {
                let tails = self.expand_sequence(rest, insights, guard, bindings, stats);
                match self.resolve_function(call) {
                    Some(target) => match guard.enter(target) {
                        GuardOutcome::Entered => {
                            stats.calls_resolved += 1;
                            stats.functions_entered += 1;
                            let frame = self.bind_arguments(call, target, bindings);
                            bindings.push_frame(frame);

                            let target_body = match self.arena.kind(target) {
                                Some(ArtifactKind::Function(function)) => function.body.clone(),
                                _ => Vec::new(),
                            };
                            let subs = self.expand_sequence(&target_body, insights, guard, bindings, stats);

                            bindings.pop_frame();
                            guard.exit(target);

                            let head = PathStep::Call(CallRealization { site: first, target: Some(target) });
                            let mut out = Vec::new();
                            for sub in &subs {
                                for tail in &tails {
                                    out.push(splice(&head, sub, tail));
                                }
                            }
                            out
                        }
                        GuardOutcome::Cyclic => {
                            stats.calls_cyclic += 1;
                            trace!("call to {} is cyclic; treating as leaf", call.callee);
                            prepend(PathStep::Call(CallRealization { site: first, target: Some(target) }), tails)
                        }
                        GuardOutcome::DepthExceeded => {
                            stats.calls_depth_capped += 1;
                            warn!("call depth limit {} reached at {}; treating as leaf", self.config.max_call_depth, call.callee);
                            prepend(PathStep::Call(CallRealization { site: first, target: Some(target) }), tails)
                        }
                    },
                    None => {
                        stats.calls_unresolved += 1;
                        trace!("call to {} is unresolved; treating as leaf", call.callee);
                        prepend(PathStep::Call(CallRealization { site: first, target: None }), tails)
                    }
                }
            }
            Some(ArtifactKind::Generic(generic)) if !generic.children.is_empty() => {
                // Sequential element: its children run unconditionally.
                let mut sequence = generic.children.clone();
                sequence.extend_from_slice(rest);
                let tails = self.expand_sequence(&sequence, insights, guard, bindings, stats);
                prepend(PathStep::Element(first), tails)
            }
            // Literals, binary expressions, bare references, and nested
            // function declarations are leaves.
            Some(_) => {
                let tails = self.expand_sequence(rest, insights, guard, bindings, stats);
                prepend(PathStep::Element(first), tails)
            }
        }
    }

    /// Probability that a conditional's condition holds, as realized on
    /// the current path: literal bindings win over the pass annotation,
    /// which wins over recomputation.
    fn realized_probability(&self, if_id: ArtifactId, insights: &InsightContext, bindings: &LiteralBindings) -> f64 {
        if self.config.propagate_literals && bindings.depth() > 0 {
            let bound = branch_probability_with(self.arena, if_id, bindings);
            if !bound.is_nan() {
                return bound;
            }
        }
        insights.probability(if_id).unwrap_or_else(|| branch_probability(self.arena, if_id))
    }

    fn resolve_function(&self, call: &CallArtifact) -> Option<ArtifactId> {
        let target = self.resolver.resolve(&call.callee)?;
        if matches!(self.arena.kind(target), Some(ArtifactKind::Function(_))) {
            Some(target)
        } else {
            warn!("resolver returned non-function artifact {} for {}", target, call.callee);
            None
        }
    }

    /// Parameter bindings a call establishes for its callee: only
    /// literal-resolvable arguments bind, transitively through the
    /// caller's own frame.
    fn bind_arguments(&self, call: &CallArtifact, target: ArtifactId, bindings: &LiteralBindings) -> HashMap<String, String> {
        let mut frame = HashMap::new();
        if !self.config.propagate_literals {
            return frame;
        }
        let Some(ArtifactKind::Function(function)) = self.arena.kind(target) else {
            return frame;
        };
        for (param, &arg) in function.params.iter().zip(call.args.iter()) {
            if let Some(text) = literal_text(self.arena, arg, bindings) {
                frame.insert(param.clone(), text.to_string());
            }
        }
        frame
    }
}

fn splice(head: &PathStep, sub: &[PathStep], tail: &[PathStep]) -> Vec<PathStep> {
    let mut steps = Vec::with_capacity(1 + sub.len() + tail.len());
    steps.push(head.clone());
    steps.extend_from_slice(sub);
    steps.extend_from_slice(tail);
    steps
}

fn prepend(head: PathStep, tails: Vec<Vec<PathStep>>) -> Vec<Vec<PathStep>> {
    tails
        .into_iter()
        .map(|tail| {
            let mut steps = Vec::with_capacity(1 + tail.len());
            steps.push(head.clone());
            steps.extend(tail);
            steps
        })
        .collect()
}
