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

//! Procedural paths and path sets
//!
//! A procedural path is one feasible control-flow route through a function,
//! recorded as the ordered sequence of traversal events. Path identity is
//! structural: the artifacts visited plus the branch choices made.
//! Probabilities annotate a path but never participate in its identity.

use pathsight_model::{ArtifactArena, ArtifactId, InsightKey, InsightValue};
use serde::Serialize;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// One realized conditional along a path.
///
/// The canonical `If` template stays immutable in the arena; the branch
/// side taken by a particular path lives here.
#[derive(Debug, Clone, Serialize)]
pub struct BranchRealization {
    /// Canonical conditional in the arena
    pub template: ArtifactId,
    /// Side this path takes
    pub taken: bool,
    /// Direct children reachable on the taken side
    pub children: Vec<ArtifactId>,
    /// Probability that this side is taken; NaN when unknown
    pub probability: f64,
}

// Identity is template + side; the probability annotation is excluded.
impl PartialEq for BranchRealization {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template && self.taken == other.taken && self.children == other.children
    }
}

impl Eq for BranchRealization {}

impl Hash for BranchRealization {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
        self.taken.hash(state);
        self.children.hash(state);
    }
}

/// One call site along a path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CallRealization {
    /// Call artifact in the arena
    pub site: ArtifactId,
    /// Resolved target function; `None` when resolution failed
    pub target: Option<ArtifactId>,
}

/// One traversal event along a path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PathStep {
    /// A non-branching artifact appended to the path
    Element(ArtifactId),
    /// A realized conditional
    Branch(BranchRealization),
    /// A call site; a resolved call's spliced callee steps follow it
    Call(CallRealization),
}

impl PathStep {
    /// Arena artifact this step visits
    pub fn artifact(&self) -> ArtifactId {
        match self {
            Self::Element(id) => *id,
            Self::Branch(branch) => branch.template,
            Self::Call(call) => call.site,
        }
    }
}

/// One feasible control-flow route through a function.
///
/// Immutable after construction; produced by the path analyzer, one
/// instance per distinct combination of branch choices and resolved-call
/// expansions.
#[derive(Debug, Clone, Serialize)]
pub struct ProceduralPath {
    root: ArtifactId,
    steps: Vec<PathStep>,
    insights: Vec<(ArtifactId, InsightKey, InsightValue)>,
}

impl ProceduralPath {
    /// Build a path from its traversal events, accumulating the insight
    /// records its branch realizations carry.
    pub fn new(root: ArtifactId, steps: Vec<PathStep>) -> Self {
        let mut insights = Vec::new();
        for step in &steps {
            if let PathStep::Branch(branch) = step {
                insights.push((branch.template, InsightKey::ConditionEvaluation, InsightValue::Truth(branch.taken)));
                insights.push((
                    branch.template,
                    InsightKey::ControlStructureProbability,
                    InsightValue::Probability(branch.probability),
                ));
            }
        }
        Self { root, steps, insights }
    }

    /// Artifact the analysis started from
    pub fn root(&self) -> ArtifactId {
        self.root
    }

    /// Traversal events in order
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of artifacts traversed along this path
    pub fn artifact_count(&self) -> usize {
        self.steps.len()
    }

    /// Insight records accumulated during traversal
    pub fn insights(&self) -> &[(ArtifactId, InsightKey, InsightValue)] {
        &self.insights
    }

    /// Realized conditionals in traversal order
    pub fn branch_realizations(&self) -> impl Iterator<Item = &BranchRealization> {
        self.steps.iter().filter_map(|step| match step {
            PathStep::Branch(branch) => Some(branch),
            _ => None,
        })
    }

    /// Ordered (truth, conditional) pairs over every realized conditional,
    /// spliced callee conditionals included
    pub fn conditions(&self) -> Vec<(bool, ArtifactId)> {
        self.branch_realizations().map(|branch| (branch.taken, branch.template)).collect()
    }

    /// Resolved call targets in step order, deduplicated
    pub fn resolved_call_functions(&self) -> Vec<ArtifactId> {
        let mut seen = HashSet::new();
        let mut functions = Vec::new();
        for step in &self.steps {
            if let PathStep::Call(call) = step
                && let Some(target) = call.target
                && seen.insert(target)
            {
                functions.push(target);
            }
        }
        functions
    }

    /// Artifacts along this path expanded with each branch's realized
    /// children and all structural descendants. Lazily computed; each
    /// artifact appears once, in first-traversal order.
    pub fn descendants(&self, arena: &ArtifactArena) -> Vec<ArtifactId> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for step in &self.steps {
            push_with_structure(arena, step.artifact(), &mut seen, &mut out);
            if let PathStep::Branch(branch) = step {
                for &child in &branch.children {
                    push_with_structure(arena, child, &mut seen, &mut out);
                }
            }
        }
        out
    }
}

fn push_with_structure(arena: &ArtifactArena, id: ArtifactId, seen: &mut HashSet<ArtifactId>, out: &mut Vec<ArtifactId>) {
    if !seen.insert(id) {
        return;
    }
    out.push(id);
    for &child in arena.child_artifacts(id) {
        push_with_structure(arena, child, seen, out);
    }
}

// Identity is root + structural steps; accumulated insights are derived.
impl PartialEq for ProceduralPath {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.steps == other.steps
    }
}

impl Eq for ProceduralPath {}

impl Hash for ProceduralPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
        self.steps.hash(state);
    }
}

/// Set of procedural paths with structural-identity uniqueness.
///
/// Iteration order is insertion order, which the analyzer keeps
/// deterministic; equality compares paths in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathSet {
    paths: Vec<ProceduralPath>,
}

impl PathSet {
    /// Create an empty path set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the set holds no paths
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Insert a path; returns false if a structurally identical path is present
    pub fn insert(&mut self, path: ProceduralPath) -> bool {
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Whether a structurally identical path is present
    pub fn contains(&self, path: &ProceduralPath) -> bool {
        self.paths.contains(path)
    }

    /// Paths in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ProceduralPath> {
        self.paths.iter()
    }

    /// Keep only paths satisfying the predicate, preserving order
    pub fn retain(&mut self, predicate: impl FnMut(&ProceduralPath) -> bool) {
        self.paths.retain(predicate);
    }
}

impl IntoIterator for PathSet {
    type Item = ProceduralPath;
    type IntoIter = std::vec::IntoIter<ProceduralPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a ProceduralPath;
    type IntoIter = std::slice::Iter<'a, ProceduralPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl FromIterator<ProceduralPath> for PathSet {
    fn from_iter<T: IntoIterator<Item = ProceduralPath>>(iter: T) -> Self {
        let mut set = Self::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch_step(template: ArtifactId, taken: bool, probability: f64) -> PathStep {
        PathStep::Branch(BranchRealization {
            template,
            taken,
            children: Vec::new(),
            probability,
        })
    }

    #[test]
    fn test_identity_ignores_probability() {
        let template = ArtifactId::from_index(0);
        let root = ArtifactId::from_index(1);
        let a = ProceduralPath::new(root, vec![branch_step(template, true, 1.0)]);
        let b = ProceduralPath::new(root, vec![branch_step(template, true, f64::NAN)]);
        let c = ProceduralPath::new(root, vec![branch_step(template, false, 1.0)]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_path_set_deduplicates() {
        let template = ArtifactId::from_index(0);
        let root = ArtifactId::from_index(1);
        let mut set = PathSet::new();

        assert!(set.insert(ProceduralPath::new(root, vec![branch_step(template, true, 1.0)])));
        assert!(!set.insert(ProceduralPath::new(root, vec![branch_step(template, true, 0.5)])));
        assert!(set.insert(ProceduralPath::new(root, vec![branch_step(template, false, 0.5)])));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_conditions_view() {
        let first = ArtifactId::from_index(0);
        let second = ArtifactId::from_index(1);
        let root = ArtifactId::from_index(2);
        let path = ProceduralPath::new(root, vec![
            branch_step(first, true, f64::NAN),
            PathStep::Element(ArtifactId::from_index(3)),
            branch_step(second, false, 1.0),
        ]);

        assert_eq!(path.conditions(), vec![(true, first), (false, second)]);
        assert_eq!(path.artifact_count(), 3);
    }

    #[test]
    fn test_insights_accumulated_from_branches() {
        let template = ArtifactId::from_index(0);
        let path = ProceduralPath::new(ArtifactId::from_index(1), vec![branch_step(template, true, 1.0)]);

        assert_eq!(path.insights().len(), 2);
        assert_eq!(path.insights()[0], (template, InsightKey::ConditionEvaluation, InsightValue::Truth(true)));
        assert_eq!(
            path.insights()[1],
            (template, InsightKey::ControlStructureProbability, InsightValue::Probability(1.0))
        );
    }

    #[test]
    fn test_resolved_call_functions_deduplicated() {
        let target = ArtifactId::from_index(0);
        let path = ProceduralPath::new(ArtifactId::from_index(1), vec![
            PathStep::Call(CallRealization {
                site: ArtifactId::from_index(2),
                target: Some(target),
            }),
            PathStep::Call(CallRealization {
                site: ArtifactId::from_index(3),
                target: None,
            }),
            PathStep::Call(CallRealization {
                site: ArtifactId::from_index(4),
                target: Some(target),
            }),
        ]);

        assert_eq!(path.resolved_call_functions(), vec![target]);
    }

    #[test]
    fn test_descendants_expand_structure() {
        let mut arena = ArtifactArena::new();
        let literal = arena.literal("1");
        let call = arena.call("log", vec![literal]);
        let block = arena.generic(vec![call]);
        let condition = arena.literal("true");
        let branch = arena.if_else(Some(condition), vec![block], Vec::new());

        let path = ProceduralPath::new(branch, vec![
            PathStep::Branch(BranchRealization {
                template: branch,
                taken: true,
                children: vec![block],
                probability: 1.0,
            }),
            PathStep::Element(block),
            PathStep::Call(CallRealization { site: call, target: None }),
        ]);

        // Branch template first, then the realized child block and its
        // structural descendant, each exactly once.
        assert_eq!(path.descendants(&arena), vec![branch, block, call]);
    }
}
