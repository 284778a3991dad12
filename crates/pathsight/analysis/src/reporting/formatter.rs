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

//! Formatting of analysis reports

use crate::reporting::{AnalysisReport, ReportFormat};
use std::fmt::Write;
use thiserror::Error;

/// Error during formatting
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unsupported format: {0:?}")]
    Unsupported(ReportFormat),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Trait for formatting analysis reports
pub trait ReportFormatter {
    /// Render a report
    fn format(&self, report: &AnalysisReport) -> Result<String, FormatError>;
    /// Formats this formatter can render
    fn supported_formats(&self) -> &[ReportFormat];
}

/// Plain text formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String, FormatError> {
        let mut out = String::new();
        let root_label = report.root_name.clone().unwrap_or_else(|| report.root.to_string());
        let _ = writeln!(out, "analysis of {}: {} path(s)", root_label, report.path_count);
        for path in &report.paths {
            let conditions: Vec<String> = path
                .conditions
                .iter()
                .map(|condition| {
                    let probability = condition.probability.map_or("?".to_string(), |p| format!("{p}"));
                    format!("{}={} (p={})", condition.template, condition.taken, probability)
                })
                .collect();
            let _ = write!(out, "  path {}: {} artifact(s)", path.index, path.artifact_count);
            if !conditions.is_empty() {
                let _ = write!(out, ", conditions: {}", conditions.join(", "));
            }
            if !path.resolved_calls.is_empty() {
                let _ = write!(out, ", calls: {}", path.resolved_calls.join(", "));
            }
            let _ = writeln!(out);
        }
        if let Some(graph) = &report.call_graph {
            let _ = writeln!(
                out,
                "call graph: {} function(s), {} edge(s), {} unresolved, {} recursive",
                graph.functions, graph.call_edges, graph.unresolved_calls, graph.recursive_functions
            );
        }
        Ok(out)
    }

    fn supported_formats(&self) -> &[ReportFormat] {
        &[ReportFormat::Text]
    }
}

/// JSON formatter backed by serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    /// Pretty-print the output
    pub pretty: bool,
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String, FormatError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        rendered.map_err(|error| FormatError::Serialization(error.to_string()))
    }

    fn supported_formats(&self) -> &[ReportFormat] {
        &[ReportFormat::Json]
    }
}
