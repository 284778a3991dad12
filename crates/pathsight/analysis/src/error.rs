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

//! Error handling for the analysis crate
//!
//! Unresolvable references and malformed conditions are NOT errors; they
//! degrade to sentinel values (`None` resolution, NaN probability) and
//! analysis completes. Errors exist only for API misuse and genuine
//! invariant violations.

use pathsight_model::{ArtifactId, ModelError};
use thiserror::Error;

/// Errors that can occur while driving an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    // Model wiring errors
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("artifact {0} does not exist in this arena")]
    UnknownArtifact(ArtifactId),

    // Configuration errors
    #[error("unknown pass pipeline: {0}")]
    UnknownPipeline(String),

    // Pass errors
    #[error("pass {pass} failed: {details}")]
    PassFailed { pass: String, details: String },

    // Internal errors
    #[error("internal analysis error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Create a pass failure with context
    pub fn pass_failed(pass: impl Into<String>, details: impl Into<String>) -> Self {
        Self::PassFailed {
            pass: pass.into(),
            details: details.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::PassFailed { .. } => false,
            Self::Internal(_) => false,
            _ => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Model(_) | Self::UnknownArtifact(_) => ErrorCategory::Model,
            Self::UnknownPipeline(_) => ErrorCategory::Configuration,
            Self::PassFailed { .. } => ErrorCategory::Pass,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for better error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Model,
    Configuration,
    Pass,
    Internal,
}

impl ErrorCategory {
    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Configuration => "configuration",
            Self::Pass => "pass",
            Self::Internal => "internal",
        }
    }
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
