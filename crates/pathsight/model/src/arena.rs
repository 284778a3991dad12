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

//! Artifact arena and identity
//!
//! The arena owns the canonical artifact tree. It is append-only: child ids
//! must exist before the parent referencing them is allocated, so ids always
//! point backwards and a well-formed arena cannot contain reference cycles.
//! The analyzer only reads the arena; per-path state lives in realization
//! records, never on the canonical nodes.

use crate::artifact::{
    Artifact, ArtifactKind, BinaryArtifact, CallArtifact, FunctionArtifact, GenericArtifact, IfArtifact, LiteralArtifact, SourceRef,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an artifact in its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactId(u32);

impl ArtifactId {
    /// Identity from a raw index; only meaningful against the arena it came from
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Raw index into the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Append-only store for one artifact tree or a set of related functions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactArena {
    artifacts: Vec<Artifact>,
}

impl ArtifactArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of artifacts allocated
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the arena holds no artifacts
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Allocate an artifact, returning its identity
    pub fn alloc(&mut self, artifact: Artifact) -> ArtifactId {
        let id = ArtifactId::from_index(self.artifacts.len());
        self.artifacts.push(artifact);
        id
    }

    /// Artifact behind an identity
    pub fn get(&self, id: ArtifactId) -> Option<&Artifact> {
        self.artifacts.get(id.index())
    }

    /// Variant payload behind an identity
    pub fn kind(&self, id: ArtifactId) -> Option<&ArtifactKind> {
        self.get(id).map(|artifact| &artifact.kind)
    }

    /// Whether an identity belongs to this arena
    pub fn contains(&self, id: ArtifactId) -> bool {
        id.index() < self.artifacts.len()
    }

    /// Artifacts in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactId, &Artifact)> {
        self.artifacts.iter().enumerate().map(|(index, artifact)| (ArtifactId::from_index(index), artifact))
    }

    /// Direct control-flow-relevant children of an artifact.
    ///
    /// A function yields its body, a generic element its children. A
    /// conditional yields nothing here: its sides are reachable only
    /// through branch realization, never unconditionally. Leaves and
    /// expression nodes yield nothing.
    pub fn child_artifacts(&self, id: ArtifactId) -> &[ArtifactId] {
        match self.kind(id) {
            Some(ArtifactKind::Function(function)) => &function.body,
            Some(ArtifactKind::Generic(generic)) => &generic.children,
            _ => &[],
        }
    }

    /// Attach a source reference to an already-allocated artifact
    pub fn set_source(&mut self, id: ArtifactId, source: SourceRef) {
        if let Some(artifact) = self.artifacts.get_mut(id.index()) {
            artifact.source = source;
        }
    }

    /// Allocate a literal with the given post-parse text
    pub fn literal(&mut self, text: impl Into<String>) -> ArtifactId {
        self.alloc(Artifact::new(ArtifactKind::Literal(LiteralArtifact { text: text.into() })))
    }

    /// Allocate a bare identifier reference
    pub fn reference(&mut self, symbol: impl Into<String>) -> ArtifactId {
        self.alloc(Artifact::new(ArtifactKind::Generic(GenericArtifact {
            symbol: Some(symbol.into()),
            children: Vec::new(),
        })))
    }

    /// Allocate a generic sequential element
    pub fn generic(&mut self, children: Vec<ArtifactId>) -> ArtifactId {
        self.debug_check_children(&children);
        self.alloc(Artifact::new(ArtifactKind::Generic(GenericArtifact { symbol: None, children })))
    }

    /// Allocate a binary expression
    pub fn binary(&mut self, operator: impl Into<String>, lhs: ArtifactId, rhs: ArtifactId) -> ArtifactId {
        self.debug_check_children(&[lhs, rhs]);
        self.alloc(Artifact::new(ArtifactKind::Binary(BinaryArtifact {
            operator: operator.into(),
            lhs,
            rhs,
        })))
    }

    /// Allocate a call site
    pub fn call(&mut self, callee: impl Into<String>, args: Vec<ArtifactId>) -> ArtifactId {
        self.debug_check_children(&args);
        self.alloc(Artifact::new(ArtifactKind::Call(CallArtifact { callee: callee.into(), args })))
    }

    /// Allocate a conditional
    pub fn if_else(&mut self, condition: Option<ArtifactId>, then_children: Vec<ArtifactId>, else_children: Vec<ArtifactId>) -> ArtifactId {
        if let Some(condition) = condition {
            self.debug_check_children(&[condition]);
        }
        self.debug_check_children(&then_children);
        self.debug_check_children(&else_children);
        self.alloc(Artifact::new(ArtifactKind::If(IfArtifact {
            condition,
            then_children,
            else_children,
        })))
    }

    /// Allocate a function with the given parameter names and body
    pub fn function(&mut self, name: impl Into<String>, params: &[&str], body: Vec<ArtifactId>) -> ArtifactId {
        self.debug_check_children(&body);
        self.alloc(Artifact::new(ArtifactKind::Function(FunctionArtifact {
            name: name.into(),
            params: params.iter().map(|param| param.to_string()).collect(),
            body,
        })))
    }

    fn debug_check_children(&self, children: &[ArtifactId]) {
        for &child in children {
            debug_assert!(self.contains(child), "child artifact {child} allocated after its parent");
        }
    }
}
