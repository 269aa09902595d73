//! Decoded instruction model

use super::operand::{Modifier, Operand, Register};
use crate::features::lexing::EncodingAnnotation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction-format family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstructionFormat {
    ScalarAlu1,
    ScalarAlu2,
    ScalarCompare,
    ScalarImmediate,
    ScalarProgramControl,
    VectorAlu,
    ScalarMemoryRead,
    BufferMemoryTyped,
    BufferMemoryUntyped,
    ImageMemory,
    DataShare,
    Export,
    VectorInterpolation,
    Unknown,
}

impl InstructionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionFormat::ScalarAlu1 => "SOP1",
            InstructionFormat::ScalarAlu2 => "SOP2",
            InstructionFormat::ScalarCompare => "SOPC",
            InstructionFormat::ScalarImmediate => "SOPK",
            InstructionFormat::ScalarProgramControl => "SOPP",
            InstructionFormat::VectorAlu => "VOP",
            InstructionFormat::ScalarMemoryRead => "SMEM",
            InstructionFormat::BufferMemoryTyped => "MTBUF",
            InstructionFormat::BufferMemoryUntyped => "MUBUF",
            InstructionFormat::ImageMemory => "MIMG",
            InstructionFormat::DataShare => "DS",
            InstructionFormat::Export => "EXP",
            InstructionFormat::VectorInterpolation => "VINTRP",
            InstructionFormat::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for InstructionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware unit that executes an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FunctionalUnit {
    ScalarAlu,
    ScalarMemory,
    VectorMemory,
    VectorAlu,
    LocalDataShare,
    GlobalDataShareExport,
    Branch,
    InternalFlow,
    Unknown,
}

impl FunctionalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionalUnit::ScalarAlu => "SALU",
            FunctionalUnit::ScalarMemory => "SMEM",
            FunctionalUnit::VectorMemory => "VMEM",
            FunctionalUnit::VectorAlu => "VALU",
            FunctionalUnit::LocalDataShare => "LDS",
            FunctionalUnit::GlobalDataShareExport => "GDS/Export",
            FunctionalUnit::Branch => "Branch",
            FunctionalUnit::InternalFlow => "Internal flow",
            FunctionalUnit::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FunctionalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory direction of a memory instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryAccess {
    Read,
    Write,
    Atomic,
    /// Cache maintenance and timers
    Control,
}

/// Where a direct branch goes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchTarget {
    Label(String),
    /// Signed offset in dwords relative to the next instruction
    Relative(i64),
}

/// Effect of an instruction on control flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlFlow {
    Sequential,
    Branch {
        target: BranchTarget,
        conditional: bool,
    },
    /// Target held in registers (`s_setpc_b64`, `s_cbranch_join`)
    IndirectBranch { conditional: bool },
    /// Call with return to the next instruction
    Call { target: Option<BranchTarget> },
    Return,
    EndProgram,
}

impl ControlFlow {
    /// Whether the instruction closes its basic block
    pub fn ends_block(&self) -> bool {
        !matches!(self, ControlFlow::Sequential)
    }
}

/// Format-specific operand roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    ScalarAlu1 {
        dest: Option<Operand>,
        src: Option<Operand>,
    },
    ScalarAlu2 {
        dest: Operand,
        src0: Operand,
        src1: Operand,
    },
    ScalarCompare {
        src0: Operand,
        src1: Option<Operand>,
    },
    /// 16-bit immediate forms and scalar moves
    ScalarImmediate {
        dest: Operand,
        value: Operand,
    },
    ScalarProgramControl {
        target: Option<BranchTarget>,
    },
    VectorAlu {
        dests: Vec<Operand>,
        srcs: Vec<Operand>,
        encoding: VectorEncoding,
    },
    ScalarMemoryRead {
        dest: Option<Register>,
        base: Option<Register>,
        offset: Option<Operand>,
    },
    BufferMemory {
        /// `tbuffer_*` with per-instruction format metadata
        typed: bool,
        data: Option<Operand>,
        address: Option<Operand>,
        resource: Option<Register>,
        scalar_offset: Option<Operand>,
        format: Option<String>,
    },
    ImageMemory {
        data: Register,
        address: Operand,
        resource: Register,
        sampler: Option<Register>,
    },
    DataShare {
        dest: Option<Register>,
        address: Option<Register>,
        data: Vec<Register>,
    },
    Export {
        target: String,
        sources: Vec<Operand>,
    },
    VectorInterpolation {
        dest: Register,
        src: Operand,
        attribute: u8,
        channel: char,
        /// Trailing source of the 16-bit forms (`v_interp_p2_f16`, `v_interp_p1ll_f16`)
        src2: Option<Operand>,
    },
    Unknown,
}

impl InstructionKind {
    pub fn format(&self) -> InstructionFormat {
        match self {
            InstructionKind::ScalarAlu1 { .. } => InstructionFormat::ScalarAlu1,
            InstructionKind::ScalarAlu2 { .. } => InstructionFormat::ScalarAlu2,
            InstructionKind::ScalarCompare { .. } => InstructionFormat::ScalarCompare,
            InstructionKind::ScalarImmediate { .. } => InstructionFormat::ScalarImmediate,
            InstructionKind::ScalarProgramControl { .. } => InstructionFormat::ScalarProgramControl,
            InstructionKind::VectorAlu { .. } => InstructionFormat::VectorAlu,
            InstructionKind::ScalarMemoryRead { .. } => InstructionFormat::ScalarMemoryRead,
            InstructionKind::BufferMemory { typed, .. } => {
                if *typed {
                    InstructionFormat::BufferMemoryTyped
                } else {
                    InstructionFormat::BufferMemoryUntyped
                }
            }
            InstructionKind::ImageMemory { .. } => InstructionFormat::ImageMemory,
            InstructionKind::DataShare { .. } => InstructionFormat::DataShare,
            InstructionKind::Export { .. } => InstructionFormat::Export,
            InstructionKind::VectorInterpolation { .. } => InstructionFormat::VectorInterpolation,
            InstructionKind::Unknown => InstructionFormat::Unknown,
        }
    }
}

/// VOP encoding suffix written on the mnemonic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorEncoding {
    Unspecified,
    E32,
    E64,
    Dpp,
    Sdwa,
}

impl VectorEncoding {
    pub fn suffix(&self) -> &'static str {
        match self {
            VectorEncoding::Unspecified => "",
            VectorEncoding::E32 => "_e32",
            VectorEncoding::E64 => "_e64",
            VectorEncoding::Dpp => "_dpp",
            VectorEncoding::Sdwa => "_sdwa",
        }
    }
}

/// One decoded disassembly line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Lower-cased opcode token, encoding suffix included
    pub mnemonic: String,
    pub operands: Vec<Operand>,
    pub modifiers: Vec<Modifier>,
    pub kind: InstructionKind,
    pub control_flow: ControlFlow,
    pub functional_unit: FunctionalUnit,
    pub raw_text: String,
    /// 1-based line in the disassembly text
    pub line_number: u32,
    pub offset: Option<u64>,
    pub encoding: Option<EncodingAnnotation>,
    /// Set by source correlation
    pub source_line_index: Option<u32>,
    /// Recognised mnemonic whose operands did not decode; kept as Unknown
    pub malformed: bool,
}

impl Instruction {
    /// Unknown-format instruction keeping only the raw line
    pub fn unknown(mnemonic: impl Into<String>, raw_text: impl Into<String>, line_number: u32) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            operands: Vec::new(),
            modifiers: Vec::new(),
            kind: InstructionKind::Unknown,
            control_flow: ControlFlow::Sequential,
            functional_unit: FunctionalUnit::Unknown,
            raw_text: raw_text.into(),
            line_number,
            offset: None,
            encoding: None,
            source_line_index: None,
            malformed: false,
        }
    }

    pub fn format(&self) -> InstructionFormat {
        self.kind.format()
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, InstructionKind::Unknown)
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m.name == name)
    }

    /// Operand list in disassembly spelling
    pub fn operand_text(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.operands.len());
        parts.extend(self.operands.iter().map(ToString::to_string));
        let mut text = parts.join(", ");
        for modifier in &self.modifiers {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&modifier.to_string());
        }
        text
    }

    /// Direction of memory traffic, `None` for non-memory instructions
    pub fn memory_access(&self) -> Option<MemoryAccess> {
        let is_memory = matches!(
            self.format(),
            InstructionFormat::ScalarMemoryRead
                | InstructionFormat::BufferMemoryTyped
                | InstructionFormat::BufferMemoryUntyped
                | InstructionFormat::ImageMemory
                | InstructionFormat::DataShare
        );
        if !is_memory {
            return None;
        }

        let m = self.mnemonic.as_str();
        let access = if m.contains("atomic") {
            MemoryAccess::Atomic
        } else if m.contains("load") || m.contains("read") || m.contains("sample") || m.contains("gather") {
            MemoryAccess::Read
        } else if m.contains("store") || m.contains("write") {
            MemoryAccess::Write
        } else if self.format() == InstructionFormat::DataShare {
            // remaining LDS operations (ds_add_u32, ...) update memory in place
            MemoryAccess::Atomic
        } else {
            MemoryAccess::Control
        };
        Some(access)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operand_text();
        if operands.is_empty() {
            f.write_str(&self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, operands)
        }
    }
}
