//! Kernel boundary and kernel list errors

use crate::shared::models::{Diagnostic, DiagnosticKind};
use thiserror::Error;

/// Malformed kernel list line; only that kernel is dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("kernel list line {line}: {reason}: '{text}'")]
pub struct KernelListError {
    pub line: u32,
    pub text: String,
    pub reason: String,
}

impl KernelListError {
    pub fn new(line: u32, text: &str, reason: impl Into<String>) -> Self {
        Self {
            line,
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::KernelListParseError, self.to_string()).with_line(self.line)
    }
}

/// Partitioning failure for one kernel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelBoundaryError {
    #[error("kernel label '{label}' at line {line} has no kernel list entry")]
    UndeclaredLabel { label: String, line: u32 },

    #[error("kernel label '{label}' appears more than once")]
    DuplicateLabel { label: String },

    #[error("kernel span '{name}' ({detail})")]
    InvalidSpan { name: String, detail: String },

    #[error("kernel '{kernel}' overlaps kernel '{other}' ({detail})")]
    OverlappingRanges {
        kernel: String,
        other: String,
        detail: String,
    },
}

impl KernelBoundaryError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            KernelBoundaryError::OverlappingRanges { .. } => DiagnosticKind::OverlappingKernelRanges,
            _ => DiagnosticKind::AmbiguousKernelBoundary,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.kind(), self.to_string());
        match self {
            KernelBoundaryError::UndeclaredLabel { line, .. } => diagnostic.with_line(*line),
            _ => diagnostic,
        }
    }
}
