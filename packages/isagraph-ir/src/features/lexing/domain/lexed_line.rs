//! Lexer output for one disassembly line
//!
//! Lexed lines borrow from the input text; decoding copies what it keeps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of lexing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexedLine<'a> {
    Instruction(LexedInstruction<'a>),
    NotAnInstruction(Trivia<'a>),
}

impl<'a> LexedLine<'a> {
    pub fn as_instruction(&self) -> Option<&LexedInstruction<'a>> {
        match self {
            LexedLine::Instruction(inst) => Some(inst),
            LexedLine::NotAnInstruction(_) => None,
        }
    }
}

/// An instruction line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedInstruction<'a> {
    /// Opcode token as written
    pub mnemonic: &'a str,

    /// Everything after the mnemonic up to a trailing comment or annotation
    pub operand_text: &'a str,

    /// Byte offset from an address prefix or an annotation
    pub offset: Option<u64>,

    /// Encoding words from a trailing annotation
    pub encoding: Option<EncodingAnnotation>,
}

/// Lines that carry no instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trivia<'a> {
    Blank,
    /// Comment text without its leading `;`, `//` or `#`
    Comment(&'a str),
    /// Assembler directive such as `.text` or `.p2align 8`
    Directive(&'a str),
    Label {
        name: &'a str,
        kind: LabelKind,
    },
    /// `; <path>:<line>` debug marker
    SourceMarker {
        path: &'a str,
        line: u32,
    },
    Statistic(IsaStatistic),
    /// `; ---- Disassembly ----`
    SectionStart,
    /// `; ---- <stage> Data ----` closing the code section
    SectionEnd,
}

/// Label classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelKind {
    /// Local jump target (`label_0004:`, `BB0_1:`, `.LBB0_1:`, `_L3:`)
    BranchTarget,
    /// Kernel or shader entry point
    KernelEntry,
}

/// Encoding words from a trailing annotation (32-bit or 64-bit instruction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodingAnnotation {
    pub low: u32,
    pub high: Option<u32>,
}

impl EncodingAnnotation {
    pub fn size_bytes(&self) -> u32 {
        if self.high.is_some() {
            8
        } else {
            4
        }
    }
}

impl std::fmt::Display for EncodingAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.high {
            Some(high) => write!(f, "{:08X} {:08X}", self.low, high),
            None => write!(f, "{:08X}", self.low),
        }
    }
}

/// Statistics block entries printed by the compiler next to the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsaStatistic {
    VectorRegisters(u32),
    ScalarRegisters {
        reported: u32,
        runtime_override: Option<u32>,
    },
    CodeLength(u32),
}

/// A line whose structure cannot be split into mnemonic and operands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line_number}: {reason}: '{raw_line}'")]
pub struct LexError {
    pub raw_line: String,
    pub line_number: u32,
    pub reason: String,
}

impl LexError {
    pub fn new(raw_line: &str, line_number: u32, reason: impl Into<String>) -> Self {
        Self {
            raw_line: raw_line.to_string(),
            line_number,
            reason: reason.into(),
        }
    }
}
