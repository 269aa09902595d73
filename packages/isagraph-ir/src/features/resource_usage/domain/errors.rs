//! Resource-usage report errors

use crate::shared::models::{Diagnostic, DiagnosticKind};
use thiserror::Error;

/// Failure of one row; the rest of the report is still parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceRowError {
    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount { row: u32, expected: usize, found: usize },

    #[error("row {row}: column {column} is not a non-negative integer: '{value}'")]
    InvalidNumber {
        row: u32,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: column {column} is required")]
    MissingValue { row: u32, column: &'static str },

    #[error("row {row}: used {resource} ({used}) exceeds available ({available})")]
    Inconsistent {
        row: u32,
        resource: &'static str,
        used: u64,
        available: u64,
    },
}

impl ResourceRowError {
    pub fn row(&self) -> u32 {
        match self {
            ResourceRowError::ColumnCount { row, .. }
            | ResourceRowError::InvalidNumber { row, .. }
            | ResourceRowError::MissingValue { row, .. }
            | ResourceRowError::Inconsistent { row, .. } => *row,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::resource_row(self.to_string()).with_line(self.row())
    }
}

/// Failure of the whole report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceReportError {
    #[error("resource-usage report is empty")]
    Empty,

    #[error("{columns} columns match no known resource-usage schema")]
    UnknownSchema { columns: usize },

    #[error("resource-usage report has no header row")]
    MissingHeader,

    #[error("resource-usage report has no KERNEL column and no kernel name was supplied")]
    KernelNameRequired,
}

impl ResourceReportError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::resource_row(self.to_string())
    }
}

/// Row that attaches to no kernel entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceJoinWarning {
    #[error("resource usage for kernel '{kernel}' on {device} matches no kernel")]
    UnknownKernel { device: String, kernel: String },

    #[error("resource usage for kernel '{kernel}' is for device {device}, not {expected}")]
    OtherDevice {
        device: String,
        kernel: String,
        expected: String,
    },
}

impl ResourceJoinWarning {
    pub fn kernel(&self) -> &str {
        match self {
            ResourceJoinWarning::UnknownKernel { kernel, .. }
            | ResourceJoinWarning::OtherDevice { kernel, .. } => kernel,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::ResourceJoinWarning, self.to_string())
    }
}
