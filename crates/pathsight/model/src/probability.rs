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

//! Static branch probability evaluation
//!
//! A static probability is a compile-time-derivable likelihood in
//! {0.0, 1.0, NaN} that a condition evaluates to true. Only boolean
//! literals and equality of equal literals are decidable; every other form
//! stays NaN. Equality of UNEQUAL literals is also NaN: `5 == 6` is not
//! treated as provably false.

use crate::arena::{ArtifactArena, ArtifactId};
use crate::artifact::ArtifactKind;
use std::collections::HashMap;

/// Operator recognized for literal equality
pub const EQUALITY_OPERATOR: &str = "==";

/// Stack of per-call-frame bindings from parameter names to literal texts.
///
/// Lookup consults only the innermost frame: a callee sees its own
/// parameters and nothing from its callers.
#[derive(Debug, Clone, Default)]
pub struct LiteralBindings {
    frames: Vec<HashMap<String, String>>,
}

impl LiteralBindings {
    /// Empty binding stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames on the stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enter a callee scope
    pub fn push_frame(&mut self, frame: HashMap<String, String>) {
        self.frames.push(frame);
    }

    /// Leave the current callee scope
    pub fn pop_frame(&mut self) {
        debug_assert!(!self.frames.is_empty(), "pop_frame without matching push_frame");
        self.frames.pop();
    }

    /// Literal text bound to a symbol in the current scope
    pub fn lookup(&self, symbol: &str) -> Option<&str> {
        self.frames.last().and_then(|frame| frame.get(symbol)).map(String::as_str)
    }
}

/// Literal text an artifact resolves to, if any.
///
/// A literal resolves to its own text; a bare identifier reference
/// resolves through the current bindings frame. Everything else does not
/// resolve.
pub fn literal_text<'a>(arena: &'a ArtifactArena, id: ArtifactId, bindings: &'a LiteralBindings) -> Option<&'a str> {
    match arena.kind(id)? {
        ArtifactKind::Literal(literal) => Some(literal.text.as_str()),
        ArtifactKind::Generic(generic) => generic.symbol.as_deref().and_then(|symbol| bindings.lookup(symbol)),
        _ => None,
    }
}

/// Probability that the condition of a conditional evaluates to true
pub fn branch_probability(arena: &ArtifactArena, if_id: ArtifactId) -> f64 {
    branch_probability_with(arena, if_id, &LiteralBindings::default())
}

/// Bindings-aware variant used during inter-procedural expansion
pub fn branch_probability_with(arena: &ArtifactArena, if_id: ArtifactId, bindings: &LiteralBindings) -> f64 {
    let Some(ArtifactKind::If(if_artifact)) = arena.kind(if_id) else {
        debug_assert!(false, "branch probability requested for non-conditional {if_id}");
        return f64::NAN;
    };
    match if_artifact.condition {
        Some(condition) => condition_probability(arena, condition, bindings),
        None => f64::NAN,
    }
}

/// Probability that a condition expression evaluates to true
pub fn condition_probability(arena: &ArtifactArena, condition: ArtifactId, bindings: &LiteralBindings) -> f64 {
    if let Some(text) = literal_text(arena, condition, bindings) {
        return boolean_literal_probability(text);
    }
    if let Some(ArtifactKind::Binary(binary)) = arena.kind(condition)
        && binary.operator == EQUALITY_OPERATOR
        && let (Some(lhs), Some(rhs)) = (literal_text(arena, binary.lhs, bindings), literal_text(arena, binary.rhs, bindings))
        && lhs == rhs
    {
        return 1.0;
    }
    f64::NAN
}

fn boolean_literal_probability(text: &str) -> f64 {
    if text.eq_ignore_ascii_case("true") {
        1.0
    } else if text.eq_ignore_ascii_case("false") {
        0.0
    } else {
        f64::NAN
    }
}
