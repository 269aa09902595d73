//! Source correlation engine
//!
//! A debug marker applies to every following instruction up to the next
//! marker. Instructions before a kernel's first marker stay unmapped.

use crate::features::correlation::domain::{CorrelationError, SourceCorrelation};
use crate::features::decoding::domain::Instruction;
use crate::features::decoding::SourceMarker;
use crate::features::kernel_boundary::ResolvedKernel;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
pub struct SourceCorrelator;

impl SourceCorrelator {
    pub fn new() -> Self {
        Self
    }

    /// Precise mapping when any marker falls inside the kernel, else coarse
    pub fn correlate(
        &self,
        kernel: &ResolvedKernel,
        markers: &[SourceMarker],
    ) -> (SourceCorrelation, Vec<CorrelationError>) {
        let range = kernel.instructions;
        let inside: Vec<&SourceMarker> = markers
            .iter()
            .filter(|m| range.contains(m.instruction_index))
            .collect();

        if inside.is_empty() {
            return (
                SourceCorrelation::coarse(&kernel.name, kernel.declared, range),
                Vec::new(),
            );
        }

        let warnings = inside
            .iter()
            .filter(|m| !kernel.declared.contains_line(m.line))
            .map(|m| CorrelationError::MarkerOutsideSpan {
                kernel: kernel.name.clone(),
                line: m.line,
                declared: kernel.declared,
                marker_line: m.line_number,
            })
            .collect();

        let mut lines: BTreeMap<usize, u32> = BTreeMap::new();
        let mut pending = inside.iter().peekable();
        let mut current: Option<u32> = None;
        for index in range.indices() {
            // the marker nearest the instruction wins
            while let Some(marker) = pending.next_if(|m| m.instruction_index <= index) {
                current = Some(marker.line);
            }
            if let Some(line) = current {
                lines.insert(index, line);
            }
        }

        (
            SourceCorrelation::precise(&kernel.name, kernel.declared, range, lines),
            warnings,
        )
    }

    /// Write precise lines into `source_line_index` of file-level instructions
    pub fn apply(&self, correlation: &SourceCorrelation, instructions: &mut [Instruction]) {
        for (&index, &line) in &correlation.lines {
            if let Some(instruction) = instructions.get_mut(index) {
                instruction.source_line_index = Some(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::correlation::domain::CorrelationMode;
    use crate::shared::models::{InstructionRange, LineSpan};

    fn kernel(start: usize, end: usize) -> ResolvedKernel {
        ResolvedKernel {
            name: "main".to_string(),
            declared: LineSpan::new(10, 25),
            instructions: InstructionRange::new(start, end),
        }
    }

    fn marker(instruction_index: usize, line: u32) -> SourceMarker {
        SourceMarker {
            instruction_index,
            path: "/work/main.cl".to_string(),
            line,
            text: None,
            line_number: instruction_index as u32 * 2 + 1,
        }
    }

    #[test]
    fn test_no_markers_is_coarse() {
        let (c, warnings) = SourceCorrelator.correlate(&kernel(0, 40), &[]);
        assert_eq!(c.mode, CorrelationMode::Coarse);
        assert_eq!(c.span_of(0), Some(LineSpan::new(10, 25)));
        assert_eq!(c.span_of(39), Some(LineSpan::new(10, 25)));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_markers_are_sticky() {
        let markers = vec![marker(1, 12), marker(3, 14), marker(3, 15), marker(9, 20)];
        let (c, warnings) = SourceCorrelator.correlate(&kernel(0, 6), &markers);
        assert!(c.is_precise());
        assert!(warnings.is_empty());
        assert_eq!(c.line_of(0), None);
        assert_eq!(c.line_of(1), Some(12));
        assert_eq!(c.line_of(2), Some(12));
        assert_eq!(c.line_of(3), Some(15));
        assert_eq!(c.line_of(5), Some(15));
        assert_eq!(c.instructions_for_line(15), vec![3, 4, 5]);
    }

    #[test]
    fn test_marker_outside_span_is_kept_and_reported() {
        let (c, warnings) = SourceCorrelator.correlate(&kernel(0, 2), &[marker(0, 90)]);
        assert_eq!(c.line_of(1), Some(90));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            CorrelationError::MarkerOutsideSpan { line: 90, .. }
        ));
    }

    #[test]
    fn test_apply_sets_source_lines() {
        let mut instructions: Vec<Instruction> = (0..3)
            .map(|i| Instruction::unknown("s_nop", "s_nop 0", i + 1))
            .collect();
        let (c, _) = SourceCorrelator.correlate(&kernel(0, 3), &[marker(1, 11)]);
        SourceCorrelator.apply(&c, &mut instructions);
        assert_eq!(instructions[0].source_line_index, None);
        assert_eq!(instructions[2].source_line_index, Some(11));
    }
}
