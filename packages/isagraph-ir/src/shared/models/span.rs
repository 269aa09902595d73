//! Line and instruction-index ranges
//!
//! `LineSpan` addresses the original high-level source (1-based, inclusive
//! on both ends, as written in kernel lists). `InstructionRange` addresses
//! the file-level instruction stream of one disassembly listing.

use serde::{Deserialize, Serialize};

/// Inclusive range of source lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSpan {
    pub start_line: u32,
    pub end_line: u32,
}

impl LineSpan {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn line_count(&self) -> u32 {
        if self.end_line >= self.start_line {
            self.end_line - self.start_line + 1
        } else {
            0
        }
    }

    pub fn overlaps(&self, other: &LineSpan) -> bool {
        self.start_line <= other.end_line && other.start_line <= self.end_line
    }
}

impl std::fmt::Display for LineSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_line, self.end_line)
    }
}

/// Range of file-level instruction indices, stored half-open
///
/// A kernel label directly followed by another label yields an empty range;
/// `first`/`last` expose the inclusive view for non-empty ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructionRange {
    pub start: usize,
    pub end: usize,
}

impl InstructionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Range covering `first..=last`
    pub fn inclusive(first: usize, last: usize) -> Self {
        Self::new(first, last + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn first(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.start)
    }

    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    pub fn overlaps(&self, other: &InstructionRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for InstructionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last() {
            Some(last) => write!(f, "{}..={}", self.start, last),
            None => write!(f, "{}..(empty)", self.start),
        }
    }
}
