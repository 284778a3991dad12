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

//! Language-agnostic artifact variants
//!
//! An artifact is one syntactic unit of source code relevant to control flow.
//! The variant set is closed: a language adapter maps its own syntax tree
//! into these six shapes instead of subclassing, and the analysis engine
//! matches on them exhaustively.

use crate::arena::ArtifactId;
use serde::{Deserialize, Serialize};

/// Opaque reference to the adapter's underlying source node.
///
/// Carried through analysis untouched; the engine never inspects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// Adapter-assigned label (file path, offset, node pointer key, ...)
    pub label: Option<String>,
}

impl SourceRef {
    /// Reference with an adapter-assigned label
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()) }
    }

    /// Reference carrying no adapter identity
    pub fn none() -> Self {
        Self::default()
    }
}

/// One syntactic unit of source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Adapter-side identity, carried but never inspected
    pub source: SourceRef,
    /// Variant payload
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Artifact with no source identity
    pub fn new(kind: ArtifactKind) -> Self {
        Self { source: SourceRef::none(), kind }
    }
}

/// Closed variant set for artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Named function with an analyzable body
    Function(FunctionArtifact),
    /// Call site, resolvable through a `CallResolver`
    Call(CallArtifact),
    /// Two-way conditional
    If(IfArtifact),
    /// Literal value, kept as post-parse text
    Literal(LiteralArtifact),
    /// Binary expression
    Binary(BinaryArtifact),
    /// Catch-all element the adapter does not model further
    Generic(GenericArtifact),
}

impl ArtifactKind {
    /// Function payload, if this is a function
    pub fn as_function(&self) -> Option<&FunctionArtifact> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Call payload, if this is a call site
    pub fn as_call(&self) -> Option<&CallArtifact> {
        match self {
            Self::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Conditional payload, if this is a conditional
    pub fn as_if(&self) -> Option<&IfArtifact> {
        match self {
            Self::If(if_artifact) => Some(if_artifact),
            _ => None,
        }
    }

    /// Literal payload, if this is a literal
    pub fn as_literal(&self) -> Option<&LiteralArtifact> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Whether this artifact branches control flow
    pub fn is_control_structure(&self) -> bool {
        matches!(self, Self::If(_))
    }
}

/// Named function with parameters and a body sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArtifact {
    /// Symbolic name call sites resolve against
    pub name: String,
    /// Parameter names in declaration order
    pub params: Vec<String>,
    /// Body statements in execution order
    pub body: Vec<ArtifactId>,
}

/// Call site with a symbolic callee and argument expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallArtifact {
    /// Symbolic target name
    pub callee: String,
    /// Argument expressions in call order
    pub args: Vec<ArtifactId>,
}

/// Two-way conditional.
///
/// `condition` is `None` for malformed or unsupported source; the branch
/// probability of such a conditional is undefined (NaN). An empty branch
/// list is valid: the condition evaluates but nothing further executes on
/// that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfArtifact {
    pub condition: Option<ArtifactId>,
    pub then_children: Vec<ArtifactId>,
    pub else_children: Vec<ArtifactId>,
}

impl IfArtifact {
    /// Direct children reachable when the given side is taken
    pub fn branch_children(&self, taken: bool) -> &[ArtifactId] {
        if taken { &self.then_children } else { &self.else_children }
    }
}

/// Literal value.
///
/// The post-parse textual value is kept as-is; probability evaluation
/// matches on text rather than on a typed value to stay source-language
/// agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralArtifact {
    pub text: String,
}

/// Binary expression; expression-internal, contributes no control-flow children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryArtifact {
    pub operator: String,
    pub lhs: ArtifactId,
    pub rhs: ArtifactId,
}

/// Element the adapter does not model further.
///
/// `symbol` is set when the element is a bare identifier reference, which
/// lets literal bindings resolve it during inter-procedural expansion.
/// `children` are sequential, non-branching sub-elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericArtifact {
    pub symbol: Option<String>,
    pub children: Vec<ArtifactId>,
}
