//! Control-flow effect and functional unit of a decoded instruction

use super::scalar::is_direct_branch;
use crate::features::decoding::domain::{ControlFlow, FunctionalUnit, InstructionKind};

/// `mnemonic` has its encoding suffix removed
pub fn control_flow_of(mnemonic: &str, kind: &InstructionKind) -> ControlFlow {
    let target = match kind {
        InstructionKind::ScalarProgramControl { target } => target.clone(),
        InstructionKind::ScalarAlu1 { .. } => None,
        _ => return ControlFlow::Sequential,
    };

    match mnemonic {
        "s_setpc_b64" => ControlFlow::IndirectBranch { conditional: false },
        "s_swappc_b64" => ControlFlow::Call { target: None },
        "s_call_b64" => ControlFlow::Call { target },
        "s_rfe_b64" => ControlFlow::Return,
        "s_cbranch_join" | "s_cbranch_g_fork" => ControlFlow::IndirectBranch { conditional: true },
        m if m.starts_with("s_endpgm") => ControlFlow::EndProgram,
        m if is_direct_branch(m) => match target {
            Some(target) => ControlFlow::Branch {
                target,
                conditional: m != "s_branch",
            },
            None => ControlFlow::IndirectBranch {
                conditional: m != "s_branch",
            },
        },
        _ => ControlFlow::Sequential,
    }
}

pub fn functional_unit_of(mnemonic: &str, kind: &InstructionKind, flow: &ControlFlow) -> FunctionalUnit {
    let transfers = matches!(
        flow,
        ControlFlow::Branch { .. }
            | ControlFlow::IndirectBranch { .. }
            | ControlFlow::Call { .. }
            | ControlFlow::Return
    );

    match kind {
        InstructionKind::ScalarAlu1 { .. }
        | InstructionKind::ScalarAlu2 { .. }
        | InstructionKind::ScalarCompare { .. }
        | InstructionKind::ScalarImmediate { .. } => {
            if transfers {
                FunctionalUnit::Branch
            } else {
                FunctionalUnit::ScalarAlu
            }
        }
        InstructionKind::ScalarProgramControl { .. } => {
            if transfers {
                FunctionalUnit::Branch
            } else {
                FunctionalUnit::InternalFlow
            }
        }
        InstructionKind::ScalarMemoryRead { .. } => FunctionalUnit::ScalarMemory,
        InstructionKind::BufferMemory { .. } | InstructionKind::ImageMemory { .. } => {
            FunctionalUnit::VectorMemory
        }
        InstructionKind::DataShare { .. } => {
            if mnemonic.contains("gws") || mnemonic.starts_with("ds_gds") {
                FunctionalUnit::GlobalDataShareExport
            } else {
                FunctionalUnit::LocalDataShare
            }
        }
        InstructionKind::Export { .. } => FunctionalUnit::GlobalDataShareExport,
        InstructionKind::VectorAlu { .. } | InstructionKind::VectorInterpolation { .. } => {
            FunctionalUnit::VectorAlu
        }
        InstructionKind::Unknown => FunctionalUnit::Unknown,
    }
}
