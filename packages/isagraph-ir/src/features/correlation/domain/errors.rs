//! Correlation errors

use crate::shared::models::{Diagnostic, DiagnosticKind, LineSpan, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of the reconciliation lacks the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingSide {
    KernelList,
    InstructionStream,
}

impl MissingSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingSide::KernelList => "kernel list",
            MissingSide::InstructionStream => "instruction stream",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    #[error("kernel '{kernel}' is missing from the {}", missing.as_str())]
    Mismatch { kernel: String, missing: MissingSide },

    /// Kept in the mapping; reported as a warning
    #[error("kernel '{kernel}': debug marker at line {marker_line} names source line {line} outside {declared}")]
    MarkerOutsideSpan {
        kernel: String,
        line: u32,
        declared: LineSpan,
        marker_line: u32,
    },
}

impl CorrelationError {
    pub fn kernel(&self) -> &str {
        match self {
            CorrelationError::Mismatch { kernel, .. } | CorrelationError::MarkerOutsideSpan { kernel, .. } => kernel,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(DiagnosticKind::CorrelationRangeMismatch, self.to_string());
        match self {
            CorrelationError::Mismatch { .. } => diagnostic,
            CorrelationError::MarkerOutsideSpan { marker_line, .. } => diagnostic
                .with_line(*marker_line)
                .with_severity(Severity::Warning),
        }
    }
}
