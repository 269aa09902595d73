//! Structured diagnostics for one analysis run
//!
//! Every feature reports recoverable problems (a bad line, a dropped kernel,
//! a rejected report row) as a `Diagnostic` instead of aborting the run.
//! The reporting layer surfaces the log verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Line structure could not be split into mnemonic and operands
    LexError,
    /// Recognised mnemonic with operands that do not fit its format
    DecodeError,
    /// Mnemonic outside every known family (kept as Unknown)
    UnknownInstruction,
    /// Kernel label without a kernel-list entry, or declared twice
    AmbiguousKernelBoundary,
    /// Two kernels claim intersecting line or instruction ranges
    OverlappingKernelRanges,
    /// Kernel names differ between the stream and the kernel list
    CorrelationRangeMismatch,
    /// Malformed kernel-list line
    KernelListParseError,
    /// Resource-usage row with the wrong shape or inconsistent values
    ResourceRowSchemaError,
    /// Resource-usage row that matched no kernel
    ResourceJoinWarning,
    /// Program graph could not be built for a kernel
    GraphConstruction,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::LexError => "lex_error",
            DiagnosticKind::DecodeError => "decode_error",
            DiagnosticKind::UnknownInstruction => "unknown_instruction",
            DiagnosticKind::AmbiguousKernelBoundary => "ambiguous_kernel_boundary",
            DiagnosticKind::OverlappingKernelRanges => "overlapping_kernel_ranges",
            DiagnosticKind::CorrelationRangeMismatch => "correlation_range_mismatch",
            DiagnosticKind::KernelListParseError => "kernel_list_parse_error",
            DiagnosticKind::ResourceRowSchemaError => "resource_row_schema_error",
            DiagnosticKind::ResourceJoinWarning => "resource_join_warning",
            DiagnosticKind::GraphConstruction => "graph_construction",
        }
    }

    /// Severity used by the convenience constructors
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnknownInstruction => Severity::Info,
            DiagnosticKind::ResourceJoinWarning | DiagnosticKind::GraphConstruction => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One log entry: kind, message and optional file/line context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            file: None,
            line: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // Convenience constructors
    pub fn lex(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::LexError, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::DecodeError, message)
    }

    pub fn unknown_instruction(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::UnknownInstruction, message)
    }

    pub fn resource_row(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ResourceRowSchemaError, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, " at {}:{}", file, line),
            (Some(file), None) => write!(f, " in {}", file),
            (None, Some(line)) => write!(f, " at line {}", line),
            (None, None) => Ok(()),
        }
    }
}

/// Ordered collection of diagnostics for one file or one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: DiagnosticLog) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    /// Stamp `file` onto every entry that has no file yet
    pub fn attach_file(&mut self, file: &str) {
        for entry in &mut self.entries {
            if entry.file.is_none() {
                entry.file = Some(file.to_string());
            }
        }
    }
}

impl IntoIterator for DiagnosticLog {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<Diagnostic> for DiagnosticLog {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
