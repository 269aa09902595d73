//! Program graph construction errors

use crate::shared::models::{Diagnostic, DiagnosticKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowGraphError {
    #[error("kernel '{kernel}' has no instructions")]
    EmptyKernel { kernel: String },

    #[error("label '{label}' of kernel '{kernel}' points at instruction {index} of {len}")]
    LabelOutOfRange {
        kernel: String,
        label: String,
        index: usize,
        len: usize,
    },
}

impl FlowGraphError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::GraphConstruction, self.to_string())
    }
}
