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

//! Call graph construction over an artifact arena
//!
//! A static companion to path analysis: one node per function, one edge
//! per resolved call site. Used by reporting and by callers that want to
//! reason about `resolved_call_functions()` output beyond a single path.

use pathsight_model::{ArtifactArena, ArtifactId, ArtifactKind, CallResolver};
use petgraph::Directed;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{Graph, NodeIndex};
use std::collections::HashMap;

/// Node in a call graph
#[derive(Debug, Clone)]
pub struct CallNode {
    /// Function artifact
    pub function: ArtifactId,
    /// Function name
    pub name: String,
}

/// Edge in a call graph: one resolved call site
#[derive(Debug, Clone)]
pub struct CallEdge {
    /// Call artifact
    pub site: ArtifactId,
}

/// Call graph type alias
pub type CallGraphInner = Graph<CallNode, CallEdge, Directed>;

/// Builder walking every function in an arena
pub struct CallGraphBuilder<'a> {
    arena: &'a ArtifactArena,
    resolver: &'a dyn CallResolver,
}

impl<'a> CallGraphBuilder<'a> {
    /// Create a new call graph builder
    pub fn new(arena: &'a ArtifactArena, resolver: &'a dyn CallResolver) -> Self {
        Self { arena, resolver }
    }

    /// Build the graph over all functions, in allocation order
    pub fn build(self) -> CallGraph {
        let mut graph = CallGraphInner::new();
        let mut indices: HashMap<ArtifactId, NodeIndex> = HashMap::new();
        let mut unresolved_calls = 0;

        for (id, artifact) in self.arena.iter() {
            if let ArtifactKind::Function(function) = &artifact.kind {
                let index = *indices.entry(id).or_insert_with(|| {
                    graph.add_node(CallNode {
                        function: id,
                        name: function.name.clone(),
                    })
                });

                let mut sites = Vec::new();
                for &child in &function.body {
                    collect_call_sites(self.arena, child, &mut sites);
                }
                for site in sites {
                    let callee = match self.arena.kind(site) {
                        Some(ArtifactKind::Call(call)) => call.callee.as_str(),
                        _ => continue,
                    };
                    match self.resolver.resolve(callee).filter(|target| matches!(self.arena.kind(*target), Some(ArtifactKind::Function(_)))) {
                        Some(target) => {
                            let target_index = *indices.entry(target).or_insert_with(|| {
                                let name = match self.arena.kind(target) {
                                    Some(ArtifactKind::Function(function)) => function.name.clone(),
                                    _ => String::new(),
                                };
                                graph.add_node(CallNode { function: target, name })
                            });
                            graph.add_edge(index, target_index, CallEdge { site });
                        }
                        None => unresolved_calls += 1,
                    }
                }
            }
        }

        CallGraph {
            graph,
            indices,
            unresolved_calls,
        }
    }
}

/// Directed graph of resolved call edges between functions
#[derive(Debug, Clone)]
pub struct CallGraph {
    graph: CallGraphInner,
    indices: HashMap<ArtifactId, NodeIndex>,
    unresolved_calls: usize,
}

impl CallGraph {
    /// Number of function nodes
    pub fn function_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of resolved call edges
    pub fn call_edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of call sites that did not resolve
    pub fn unresolved_call_count(&self) -> usize {
        self.unresolved_calls
    }

    /// Whether a function appears in the graph
    pub fn contains(&self, function: ArtifactId) -> bool {
        self.indices.contains_key(&function)
    }

    /// Functions a function calls directly, in edge insertion order
    pub fn callees(&self, function: ArtifactId) -> Vec<ArtifactId> {
        let Some(&index) = self.indices.get(&function) else {
            return Vec::new();
        };
        let mut callees: Vec<ArtifactId> = self.graph.neighbors(index).map(|neighbor| self.graph[neighbor].function).collect();
        // petgraph yields neighbors newest-first
        callees.reverse();
        callees
    }

    /// Whether a function participates in recursion (a self-loop or a
    /// strongly connected component of several functions)
    pub fn is_recursive(&self, function: ArtifactId) -> bool {
        self.recursive_components().iter().any(|component| component.contains(&function))
    }

    /// Strongly connected components that realize recursion
    pub fn recursive_components(&self) -> Vec<Vec<ArtifactId>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1 || component.iter().any(|&index| self.graph.contains_edge(index, index)))
            .map(|component| component.into_iter().map(|index| self.graph[index].function).collect())
            .collect()
    }

    /// Functions participating in any recursive component
    pub fn recursive_function_count(&self) -> usize {
        self.recursive_components().iter().map(Vec::len).sum()
    }
}

fn collect_call_sites(arena: &ArtifactArena, id: ArtifactId, sites: &mut Vec<ArtifactId>) {
    match arena.kind(id) {
        Some(ArtifactKind::Call(call)) => {
            for &arg in &call.args {
                collect_call_sites(arena, arg, sites);
            }
            sites.push(id);
        }
        Some(ArtifactKind::If(if_artifact)) => {
            if let Some(condition) = if_artifact.condition {
                collect_call_sites(arena, condition, sites);
            }
            for &child in &if_artifact.then_children {
                collect_call_sites(arena, child, sites);
            }
            for &child in &if_artifact.else_children {
                collect_call_sites(arena, child, sites);
            }
        }
        Some(ArtifactKind::Generic(generic)) => {
            for &child in &generic.children {
                collect_call_sites(arena, child, sites);
            }
        }
        Some(ArtifactKind::Binary(binary)) => {
            collect_call_sites(arena, binary.lhs, sites);
            collect_call_sites(arena, binary.rhs, sites);
        }
        // Nested function declarations contribute their own node, not
        // edges from the enclosing function.
        Some(ArtifactKind::Function(_)) | Some(ArtifactKind::Literal(_)) | None => {}
    }
}
