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

//! Integration tests for the complete path analysis pipeline
//!
//! These tests verify the end-to-end behavior from an adapter-built
//! artifact tree to the returned path set: branch completeness,
//! simplification, cycle handling, and literal propagation across call
//! boundaries.

use pathsight_analysis::{
    AnalyzerConfig, PassProvider, PathAnalyzer, PathStep, SimplifyPathSetPass,
    passes::PathSetPass,
};
use pathsight_model::{
    ArtifactArena, ArtifactId, CallResolver, FunctionRegistry, InsightContext, NullResolver,
};

mockall::mock! {
    Resolver {}

    impl CallResolver for Resolver {
        fn resolve(&self, callee: &str) -> Option<ArtifactId>;
    }
}

/// A branch with a call on each side yields exactly one path per side,
/// each two artifacts long: the conditional, then the call taken.
#[test]
fn test_branch_completeness() {
    let (arena, function, branch) = branching_function(Condition::Reference, true);

    let analyzer = PathAnalyzer::with_provider(&arena, &NullResolver, PassProvider::full_no_simplify());
    let analysis = analyzer.analyze(function).expect("analysis should succeed");

    assert_eq!(analysis.paths.len(), 2);
    let mut sides_seen = Vec::new();
    for path in analysis.paths.iter() {
        let conditions = path.conditions();
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].1, branch);
        sides_seen.push(conditions[0].0);

        assert_eq!(path.artifact_count(), 2);
        assert!(matches!(path.steps()[0], PathStep::Branch(_)));
        assert!(matches!(path.steps()[1], PathStep::Call(_)));

        let realization = path.branch_realizations().next().unwrap();
        assert_eq!(realization.children.len(), 1);
    }
    sides_seen.sort();
    assert_eq!(sides_seen, vec![false, true]);
}

/// An empty else branch still yields a path; its realization has no
/// children and the path is one artifact long.
#[test]
fn test_empty_branch_still_yields_path() {
    let (arena, function, _branch) = branching_function(Condition::Reference, false);

    let analyzer = PathAnalyzer::with_provider(&arena, &NullResolver, PassProvider::full_no_simplify());
    let analysis = analyzer.analyze(function).expect("analysis should succeed");

    assert_eq!(analysis.paths.len(), 2);
    let false_path = analysis.paths.iter().find(|path| !path.conditions()[0].0).unwrap();
    assert_eq!(false_path.artifact_count(), 1);
    assert_eq!(false_path.branch_realizations().next().unwrap().children.len(), 0);

    let true_path = analysis.paths.iter().find(|path| path.conditions()[0].0).unwrap();
    assert_eq!(true_path.artifact_count(), 2);
}

/// With a literal `true` condition the default pipeline keeps only the
/// true branch, and that path matches the non-simplified true path.
#[test]
fn test_simplification_correctness() {
    let (arena, function, _branch) = branching_function(Condition::LiteralTrue, true);

    let full = PathAnalyzer::new(&arena, &NullResolver).analyze(function).expect("analysis should succeed");
    assert_eq!(full.paths.len(), 1);
    let survivor = full.paths.iter().next().unwrap();
    assert!(survivor.conditions()[0].0);

    let unsimplified = PathAnalyzer::with_provider(&arena, &NullResolver, PassProvider::full_no_simplify())
        .analyze(function)
        .expect("analysis should succeed");
    assert_eq!(unsimplified.paths.len(), 2);
    let true_path = unsimplified.paths.iter().find(|path| path.conditions()[0].0).unwrap();
    assert_eq!(survivor, true_path);
}

/// Equality of equal literals is statically certain, so the false side
/// is pruned; unequal literals stay unknown and both sides survive.
#[test]
fn test_literal_equality_simplification() {
    let mut arena = ArtifactArena::new();
    let lhs = arena.literal("5");
    let rhs = arena.literal("5");
    let condition = arena.binary("==", lhs, rhs);
    let then_call = arena.call("log", Vec::new());
    let else_call = arena.call("warn", Vec::new());
    let branch = arena.if_else(Some(condition), vec![then_call], vec![else_call]);
    let equal = arena.function("equal_literals", &[], vec![branch]);

    let unequal_lhs = arena.literal("5");
    let unequal_rhs = arena.literal("6");
    let unequal_condition = arena.binary("==", unequal_lhs, unequal_rhs);
    let unequal_then = arena.call("log", Vec::new());
    let unequal_branch = arena.if_else(Some(unequal_condition), vec![unequal_then], Vec::new());
    let unequal = arena.function("unequal_literals", &[], vec![unequal_branch]);

    let analyzer = PathAnalyzer::new(&arena, &NullResolver);
    assert_eq!(analyzer.analyze(equal).unwrap().paths.len(), 1);
    // `5 == 6` is not statically disprovable; both sides are kept.
    assert_eq!(analyzer.analyze(unequal).unwrap().paths.len(), 2);
}

/// Applying the simplification pass to its own output changes nothing.
#[test]
fn test_simplification_idempotent_end_to_end() {
    let (arena, function, _branch) = branching_function(Condition::LiteralTrue, true);

    let analysis = PathAnalyzer::with_provider(&arena, &NullResolver, PassProvider::full_no_simplify())
        .analyze(function)
        .expect("analysis should succeed");

    let insights = InsightContext::new();
    let pass = SimplifyPathSetPass::new();
    let once = pass.post_process(analysis.paths.clone(), &arena, &insights);
    let twice = pass.post_process(once.clone(), &arena, &insights);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
}

/// A function calling itself terminates: the recursive call degrades to
/// a leaf at the first re-entry.
#[test]
fn test_direct_recursion_terminates() {
    let mut arena = ArtifactArena::new();
    let site = arena.call("looper", Vec::new());
    let function = arena.function("looper", &[], vec![site]);

    let mut registry = FunctionRegistry::new();
    registry.register(&arena, function).unwrap();

    let analysis = PathAnalyzer::new(&arena, &registry).analyze(function).expect("analysis should succeed");
    assert_eq!(analysis.paths.len(), 1);
    let path = analysis.paths.iter().next().unwrap();
    assert_eq!(path.artifact_count(), 1);
    assert!(matches!(&path.steps()[0], PathStep::Call(call) if call.target == Some(function)));
    assert_eq!(analysis.stats.calls_cyclic, 1);
}

/// Mutual recursion terminates the same way.
#[test]
fn test_mutual_recursion_terminates() {
    let mut arena = ArtifactArena::new();
    let call_b = arena.call("b", Vec::new());
    let a = arena.function("a", &[], vec![call_b]);
    let call_a = arena.call("a", Vec::new());
    let b = arena.function("b", &[], vec![call_a]);

    let mut registry = FunctionRegistry::new();
    registry.register(&arena, a).unwrap();
    registry.register(&arena, b).unwrap();

    let analysis = PathAnalyzer::new(&arena, &registry).analyze(a).expect("analysis should succeed");
    assert_eq!(analysis.paths.len(), 1);
    assert_eq!(analysis.paths.iter().next().unwrap().artifact_count(), 2);
    assert_eq!(analysis.stats.calls_cyclic, 1);
    assert_eq!(analysis.stats.calls_resolved, 1);
}

/// An unresolved call appears as a leaf artifact and analysis still
/// completes.
#[test]
fn test_unresolved_call_degrades_to_leaf() {
    let mut arena = ArtifactArena::new();
    let site = arena.call("external", Vec::new());
    let function = arena.function("main", &[], vec![site]);

    let mut resolver = MockResolver::new();
    resolver.expect_resolve().returning(|_| None);

    let analysis = PathAnalyzer::new(&arena, &resolver).analyze(function).expect("analysis should succeed");
    assert_eq!(analysis.paths.len(), 1);
    let path = analysis.paths.iter().next().unwrap();
    assert!(matches!(&path.steps()[0], PathStep::Call(call) if call.target.is_none()));
    assert!(path.resolved_call_functions().is_empty());
    assert_eq!(analysis.stats.calls_unresolved, 1);
}

/// A conditional with no condition degrades to unknown probability; both
/// sides survive the full pipeline.
#[test]
fn test_missing_condition_keeps_both_sides() {
    let mut arena = ArtifactArena::new();
    let branch = arena.if_else(None, Vec::new(), Vec::new());
    let function = arena.function("main", &[], vec![branch]);

    let analysis = PathAnalyzer::new(&arena, &NullResolver).analyze(function).expect("analysis should succeed");
    assert_eq!(analysis.paths.len(), 2);
    assert!(analysis.insights.probability(branch).unwrap().is_nan());
}

/// A literal argument propagates into the callee: `literal_pass` calls
/// `do_sleep(true)`, so only the true branch through `do_sleep` remains.
#[test]
fn test_literal_propagation_across_call() {
    let (arena, registry, literal_pass, do_sleep, branch) = propagation_scenario();

    let analysis = PathAnalyzer::new(&arena, &registry).analyze(literal_pass).expect("analysis should succeed");

    assert_eq!(analysis.paths.len(), 1);
    let path = analysis.paths.iter().next().unwrap();
    assert_eq!(path.conditions(), vec![(true, branch)]);
    assert_eq!(path.resolved_call_functions(), vec![do_sleep]);
    // Call site, spliced conditional, then the call on the true side.
    assert_eq!(path.artifact_count(), 3);
}

/// With propagation disabled the callee's condition stays unknown and
/// both branches survive.
#[test]
fn test_propagation_can_be_disabled() {
    let (arena, registry, literal_pass, _do_sleep, _branch) = propagation_scenario();

    let config = AnalyzerConfig {
        propagate_literals: false,
        ..AnalyzerConfig::default()
    };
    let analysis = PathAnalyzer::new(&arena, &registry)
        .with_config(config)
        .analyze(literal_pass)
        .expect("analysis should succeed");

    assert_eq!(analysis.paths.len(), 2);
}

/// Statements after a resolved call continue every spliced path.
#[test]
fn test_call_splice_keeps_continuation() {
    let mut arena = ArtifactArena::new();
    let inner = arena.call("untracked", Vec::new());
    let helper = arena.function("helper", &[], vec![inner]);
    let site = arena.call("helper", Vec::new());
    let after = arena.call("after", Vec::new());
    let function = arena.function("main", &[], vec![site, after]);

    let mut registry = FunctionRegistry::new();
    registry.register(&arena, helper).unwrap();
    registry.register(&arena, function).unwrap();

    let analysis = PathAnalyzer::new(&arena, &registry).analyze(function).expect("analysis should succeed");
    assert_eq!(analysis.paths.len(), 1);
    let path = analysis.paths.iter().next().unwrap();
    let visited: Vec<ArtifactId> = path.steps().iter().map(PathStep::artifact).collect();
    assert_eq!(visited, vec![site, inner, after]);
}

/// Nested conditionals multiply paths.
#[test]
fn test_nested_conditionals() {
    let mut arena = ArtifactArena::new();
    let inner_condition = arena.reference("a");
    let inner = arena.if_else(Some(inner_condition), Vec::new(), Vec::new());
    let outer_condition = arena.reference("b");
    let outer = arena.if_else(Some(outer_condition), vec![inner], Vec::new());
    let tail_condition = arena.reference("c");
    let tail = arena.if_else(Some(tail_condition), Vec::new(), Vec::new());
    let function = arena.function("main", &[], vec![outer, tail]);

    let analyzer = PathAnalyzer::with_provider(&arena, &NullResolver, PassProvider::full_no_simplify());
    let analysis = analyzer.analyze(function).expect("analysis should succeed");

    // true/true, true/false on the inner conditional, plus the outer
    // false side, each combined with both tail sides.
    assert_eq!(analysis.paths.len(), 6);
}

/// The same arena and pipeline produce identical results across runs.
#[test]
fn test_determinism_across_runs() {
    let (arena, registry, literal_pass, _do_sleep, _branch) = propagation_scenario();

    let analyzer = PathAnalyzer::new(&arena, &registry);
    let first = analyzer.analyze(literal_pass).expect("analysis should succeed");
    let second = analyzer.analyze(literal_pass).expect("analysis should succeed");

    assert_eq!(first.paths, second.paths);
    assert_eq!(first.insights, second.insights);
}

/// Pipelines are selectable by name; unknown names are configuration
/// errors.
#[test]
fn test_pipeline_selection_by_name() {
    let (arena, function, _branch) = branching_function(Condition::LiteralTrue, true);

    let provider = PassProvider::by_name("full-no-simplify").unwrap();
    let analysis = PathAnalyzer::with_provider(&arena, &NullResolver, provider)
        .analyze(function)
        .expect("analysis should succeed");
    assert_eq!(analysis.paths.len(), 2);

    assert!(PassProvider::by_name("no-such-pipeline").is_err());
}

// Test tree builders

enum Condition {
    Reference,
    LiteralTrue,
}

/// One function whose body is a single conditional; the then side holds a
/// call, the else side holds a call when `with_else` is set.
fn branching_function(condition: Condition, with_else: bool) -> (ArtifactArena, ArtifactId, ArtifactId) {
    let mut arena = ArtifactArena::new();
    let condition = match condition {
        Condition::Reference => arena.reference("flag"),
        Condition::LiteralTrue => arena.literal("true"),
    };
    let then_call = arena.call("log", Vec::new());
    let else_children = if with_else { vec![arena.call("warn", Vec::new())] } else { Vec::new() };
    let branch = arena.if_else(Some(condition), vec![then_call], else_children);
    let function = arena.function("main", &[], vec![branch]);
    (arena, function, branch)
}

/// `literal_pass()` calls `do_sleep(true)`; `do_sleep(flag)` branches on
/// its parameter, calling `sleep` or `wait`.
fn propagation_scenario() -> (ArtifactArena, FunctionRegistry, ArtifactId, ArtifactId, ArtifactId) {
    let mut arena = ArtifactArena::new();
    let flag = arena.reference("flag");
    let sleep_call = arena.call("sleep", Vec::new());
    let wait_call = arena.call("wait", Vec::new());
    let branch = arena.if_else(Some(flag), vec![sleep_call], vec![wait_call]);
    let do_sleep = arena.function("do_sleep", &["flag"], vec![branch]);

    let argument = arena.literal("true");
    let site = arena.call("do_sleep", vec![argument]);
    let literal_pass = arena.function("literal_pass", &[], vec![site]);

    let mut registry = FunctionRegistry::new();
    registry.register(&arena, do_sleep).unwrap();
    registry.register(&arena, literal_pass).unwrap();

    (arena, registry, literal_pass, do_sleep, branch)
}
