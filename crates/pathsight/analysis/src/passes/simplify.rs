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

//! Path set simplification pass

use crate::passes::PathSetPass;
use crate::path::PathSet;
use pathsight_model::{ArtifactArena, InsightContext};

/// Drops paths that realize a statically impossible branch.
///
/// A branch realization with probability exactly 0.0 is provably never
/// taken, so the whole path is infeasible. NaN (unknown) realizations and
/// paths without conditionals are kept: only provably-zero branches are
/// pruned. Idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplifyPathSetPass;

impl SimplifyPathSetPass {
    /// Create a new simplification pass
    pub fn new() -> Self {
        Self
    }
}

impl PathSetPass for SimplifyPathSetPass {
    fn name(&self) -> &str {
        "simplify"
    }

    fn description(&self) -> &str {
        "Removes paths whose realized branch choices are statically impossible"
    }

    fn post_process(&self, mut paths: PathSet, _arena: &ArtifactArena, _insights: &InsightContext) -> PathSet {
        // NaN != 0.0 holds, so unknown probabilities survive the filter.
        paths.retain(|path| path.branch_realizations().all(|branch| branch.probability != 0.0));
        paths
    }
}
