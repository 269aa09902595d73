//! Shared models

mod diagnostic;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticLog, Severity};
pub use span::{InstructionRange, LineSpan};
