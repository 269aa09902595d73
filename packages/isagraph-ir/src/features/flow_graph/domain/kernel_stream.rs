//! Builder input: one kernel's slice of a listing

use crate::features::decoding::domain::Instruction;

/// Branch-target label, positioned before instruction `index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchLabel {
    pub name: String,
    /// Kernel-relative; may equal the instruction count
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelStream<'a> {
    pub name: &'a str,
    pub instructions: &'a [Instruction],
    pub labels: &'a [BranchLabel],
}

impl<'a> KernelStream<'a> {
    pub fn new(name: &'a str, instructions: &'a [Instruction], labels: &'a [BranchLabel]) -> Self {
        Self {
            name,
            instructions,
            labels,
        }
    }
}
