//! Instruction to source-line mapping of one kernel

use crate::shared::models::{InstructionRange, LineSpan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrelationMode {
    /// Built from debug markers interleaved with the instructions
    Precise,
    /// The whole instruction range maps to the declared line span
    Coarse,
}

impl CorrelationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationMode::Precise => "precise",
            CorrelationMode::Coarse => "coarse",
        }
    }
}

/// Indices are file-level instruction indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCorrelation {
    pub kernel: String,
    pub mode: CorrelationMode,
    pub declared: LineSpan,
    pub instructions: InstructionRange,
    pub lines: BTreeMap<usize, u32>,
    /// Inverse of `lines`, indices ascending
    pub instructions_by_line: BTreeMap<u32, Vec<usize>>,
}

impl SourceCorrelation {
    pub fn coarse(kernel: impl Into<String>, declared: LineSpan, instructions: InstructionRange) -> Self {
        Self {
            kernel: kernel.into(),
            mode: CorrelationMode::Coarse,
            declared,
            instructions,
            lines: BTreeMap::new(),
            instructions_by_line: BTreeMap::new(),
        }
    }

    pub fn precise(
        kernel: impl Into<String>,
        declared: LineSpan,
        instructions: InstructionRange,
        lines: BTreeMap<usize, u32>,
    ) -> Self {
        let mut instructions_by_line: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (&index, &line) in &lines {
            instructions_by_line.entry(line).or_default().push(index);
        }
        Self {
            kernel: kernel.into(),
            mode: CorrelationMode::Precise,
            declared,
            instructions,
            lines,
            instructions_by_line,
        }
    }

    pub fn is_precise(&self) -> bool {
        self.mode == CorrelationMode::Precise
    }

    /// Exact source line; precise mappings only
    pub fn line_of(&self, index: usize) -> Option<u32> {
        self.lines.get(&index).copied()
    }

    /// Source lines an instruction may come from
    pub fn span_of(&self, index: usize) -> Option<LineSpan> {
        if !self.instructions.contains(index) {
            return None;
        }
        Some(
            self.line_of(index)
                .map_or(self.declared, |line| LineSpan::new(line, line)),
        )
    }

    /// Instructions generated for `line`; coarse mappings give the whole range
    pub fn instructions_for_line(&self, line: u32) -> Vec<usize> {
        match self.mode {
            CorrelationMode::Precise => self
                .instructions_by_line
                .get(&line)
                .cloned()
                .unwrap_or_default(),
            CorrelationMode::Coarse if self.declared.contains_line(line) => {
                self.instructions.indices().collect()
            }
            CorrelationMode::Coarse => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_maps_range_to_span() {
        let c = SourceCorrelation::coarse("main", LineSpan::new(10, 25), InstructionRange::new(0, 40));
        assert!(!c.is_precise());
        assert_eq!(c.line_of(3), None);
        assert_eq!(c.span_of(0), Some(LineSpan::new(10, 25)));
        assert_eq!(c.span_of(39), Some(LineSpan::new(10, 25)));
        assert_eq!(c.span_of(40), None);
        assert_eq!(c.instructions_for_line(12).len(), 40);
        assert!(c.instructions_for_line(26).is_empty());
    }

    #[test]
    fn test_precise_inverse_map() {
        let lines: BTreeMap<usize, u32> = [(4, 12), (5, 12), (6, 14)].into_iter().collect();
        let c = SourceCorrelation::precise("k", LineSpan::new(10, 20), InstructionRange::new(3, 7), lines);
        assert_eq!(c.instructions_for_line(12), vec![4, 5]);
        assert_eq!(c.span_of(6), Some(LineSpan::new(14, 14)));
        // before the first marker
        assert_eq!(c.span_of(3), Some(LineSpan::new(10, 20)));
        assert_eq!(c.mode.as_str(), "precise");
    }
}
