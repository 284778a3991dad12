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

//! Function registration and call resolution

use crate::arena::{ArtifactArena, ArtifactId};
use crate::artifact::ArtifactKind;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while wiring the model together
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("artifact {0} does not exist in this arena")]
    UnknownArtifact(ArtifactId),

    #[error("artifact {0} is not a function")]
    NotAFunction(ArtifactId),
}

/// Resolution seam between call sites and function artifacts.
///
/// Resolution may fail (`None`): external library call, dynamic dispatch,
/// unresolved symbol. The analyzer treats unresolved calls as leaves
/// rather than errors.
pub trait CallResolver {
    /// Resolve a symbolic callee to a function artifact
    fn resolve(&self, callee: &str) -> Option<ArtifactId>;
}

/// Name-indexed registry of function artifacts.
///
/// An existing entry for the same name is replaced; adapters re-register
/// on re-parse.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    by_name: HashMap<String, ArtifactId>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no function is registered
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Register a function artifact under its own name
    pub fn register(&mut self, arena: &ArtifactArena, id: ArtifactId) -> Result<(), ModelError> {
        match arena.kind(id) {
            None => Err(ModelError::UnknownArtifact(id)),
            Some(ArtifactKind::Function(function)) => {
                self.by_name.insert(function.name.clone(), id);
                Ok(())
            }
            Some(_) => Err(ModelError::NotAFunction(id)),
        }
    }
}

impl CallResolver for FunctionRegistry {
    fn resolve(&self, callee: &str) -> Option<ArtifactId> {
        self.by_name.get(callee).copied()
    }
}

/// Resolver that resolves nothing; single-function analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl CallResolver for NullResolver {
    fn resolve(&self, _callee: &str) -> Option<ArtifactId> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut arena = ArtifactArena::new();
        let function = arena.function("do_sleep", &["flag"], Vec::new());

        let mut registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        registry.register(&arena, function).unwrap();

        assert_eq!(registry.resolve("do_sleep"), Some(function));
        assert_eq!(registry.resolve("missing"), None);
    }

    #[test]
    fn test_register_rejects_non_function() {
        let mut arena = ArtifactArena::new();
        let literal = arena.literal("1");

        let mut registry = FunctionRegistry::new();
        assert_eq!(registry.register(&arena, literal), Err(ModelError::NotAFunction(literal)));
        assert_eq!(
            registry.register(&arena, ArtifactId::from_index(99)),
            Err(ModelError::UnknownArtifact(ArtifactId::from_index(99)))
        );
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut arena = ArtifactArena::new();
        let first = arena.function("f", &[], Vec::new());
        let second = arena.function("f", &[], Vec::new());

        let mut registry = FunctionRegistry::new();
        registry.register(&arena, first).unwrap();
        registry.register(&arena, second).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("f"), Some(second));
    }

    #[test]
    fn test_null_resolver() {
        assert_eq!(NullResolver.resolve("anything"), None);
    }
}
