//! Scalar ALU, compare, immediate and program-control decoders

use super::roles::{arity, optional_value_at, value_at, writable_at, RoleResult};
use crate::features::decoding::domain::{
    BranchTarget, InstructionKind, Operand, OperandList,
};
use crate::features::decoding::ports::DecodeError;

/// SOP1: `dest, src`; a few opcodes take only one side
pub fn decode_scalar_alu1(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    match mnemonic {
        "s_getpc_b64" => {
            arity(mnemonic, ops, 1, 1, "1")?;
            Ok(InstructionKind::ScalarAlu1 {
                dest: Some(writable_at(mnemonic, ops, 0)?),
                src: None,
            })
        }
        "s_setpc_b64" | "s_rfe_b64" | "s_set_gpr_idx_idx" => {
            arity(mnemonic, ops, 1, 1, "1")?;
            Ok(InstructionKind::ScalarAlu1 {
                dest: None,
                src: Some(value_at(mnemonic, ops, 0)?),
            })
        }
        _ => {
            arity(mnemonic, ops, 2, 2, "2")?;
            Ok(InstructionKind::ScalarAlu1 {
                dest: Some(writable_at(mnemonic, ops, 0)?),
                src: Some(value_at(mnemonic, ops, 1)?),
            })
        }
    }
}

/// SOP2: `dest, src0, src1`
pub fn decode_scalar_alu2(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    arity(mnemonic, ops, 3, 3, "3")?;
    Ok(InstructionKind::ScalarAlu2 {
        dest: writable_at(mnemonic, ops, 0)?,
        src0: value_at(mnemonic, ops, 1)?,
        src1: value_at(mnemonic, ops, 2)?,
    })
}

/// SOPC: `src0, src1`; `s_set_gpr_idx_on` may carry its mode as a modifier
pub fn decode_scalar_compare(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    if mnemonic == "s_set_gpr_idx_on" {
        arity(mnemonic, ops, 1, 2, "1 or 2")?;
    } else {
        arity(mnemonic, ops, 2, 2, "2")?;
    }
    Ok(InstructionKind::ScalarCompare {
        src0: value_at(mnemonic, ops, 0)?,
        src1: optional_value_at(mnemonic, ops, 1)?,
    })
}

/// SOPK and scalar moves: `dest, value`
///
/// `s_setreg_*` writes a hardware register, so its destination is the
/// `hwreg(..)` operand.
pub fn decode_scalar_immediate(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    arity(mnemonic, ops, 2, 2, "2")?;
    let dest = if mnemonic.starts_with("s_setreg") {
        match ops.get(0) {
            Some(op @ Operand::HardwareRegister(_)) => op.clone(),
            Some(other) => {
                return Err(DecodeError::operand_kind(mnemonic, 0, "a hwreg(..) operand", other))
            }
            None => return Err(DecodeError::arity(mnemonic, "2", 0)),
        }
    } else {
        writable_at(mnemonic, ops, 0)?
    };
    Ok(InstructionKind::ScalarImmediate {
        dest,
        value: value_at(mnemonic, ops, 1)?,
    })
}

/// Branch opcodes whose operand is a branch target
pub(crate) fn is_direct_branch(mnemonic: &str) -> bool {
    mnemonic == "s_branch"
        || (mnemonic.starts_with("s_cbranch_")
            && !matches!(mnemonic, "s_cbranch_join" | "s_cbranch_g_fork"))
}

/// SOPP: branch targets for branch opcodes, loose operands otherwise
pub fn decode_program_control(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    let target = match mnemonic {
        "s_cbranch_join" => {
            arity(mnemonic, ops, 1, 1, "1")?;
            value_at(mnemonic, ops, 0)?;
            None
        }
        "s_cbranch_g_fork" => {
            arity(mnemonic, ops, 2, 2, "2")?;
            None
        }
        "s_cbranch_i_fork" | "s_call_b64" => {
            arity(mnemonic, ops, 2, 2, "2")?;
            Some(branch_target(mnemonic, ops, 1)?)
        }
        m if is_direct_branch(m) => {
            arity(mnemonic, ops, 1, 1, "1")?;
            Some(branch_target(mnemonic, ops, 0)?)
        }
        _ => {
            arity(mnemonic, ops, 0, 3, "at most 3")?;
            for position in 0..ops.len() {
                value_at(mnemonic, ops, position)?;
            }
            None
        }
    };
    Ok(InstructionKind::ScalarProgramControl { target })
}

fn branch_target(mnemonic: &str, ops: &OperandList, position: usize) -> RoleResult<BranchTarget> {
    match ops.get(position) {
        Some(Operand::Symbol(label)) => Ok(BranchTarget::Label(label.clone())),
        Some(Operand::Immediate(imm)) => match imm.as_integer() {
            Some(offset) => Ok(BranchTarget::Relative(offset)),
            None => Err(DecodeError::operand_kind(mnemonic, position, "a branch target", imm)),
        },
        Some(other) => Err(DecodeError::operand_kind(mnemonic, position, "a branch target", other)),
        None => Err(DecodeError::arity(mnemonic, "1", ops.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::decoding::domain::{Immediate, Register, SpecialRegister};
    use crate::features::decoding::infrastructure::operand_parser::parse_operand_list;

    fn ops(text: &str) -> OperandList {
        parse_operand_list(text).unwrap()
    }

    #[test]
    fn test_scalar_move_is_immediate_form() {
        let kind = decode_scalar_immediate("s_mov_b32", &ops("s0, 0x4")).unwrap();
        assert_eq!(
            kind,
            InstructionKind::ScalarImmediate {
                dest: Operand::Register(Register::scalar(0)),
                value: Operand::Immediate(Immediate::hex(4)),
            }
        );
    }

    #[test]
    fn test_setreg_destination_is_hwreg() {
        let kind = decode_scalar_immediate("s_setreg_b32", &ops("hwreg(HW_REG_MODE, 0, 2), s2")).unwrap();
        match kind {
            InstructionKind::ScalarImmediate { dest, .. } => {
                assert_eq!(dest, Operand::HardwareRegister("HW_REG_MODE, 0, 2".to_string()))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(decode_scalar_immediate("s_setreg_b32", &ops("s1, s2")).is_err());
    }

    #[test]
    fn test_sop1_forms() {
        assert!(decode_scalar_alu1("s_not_b32", &ops("s0, s1")).is_ok());
        assert!(decode_scalar_alu1("s_getpc_b64", &ops("s[0:1]")).is_ok());
        match decode_scalar_alu1("s_and_saveexec_b64", &ops("s[2:3], vcc")).unwrap() {
            InstructionKind::ScalarAlu1 { src, .. } => {
                assert_eq!(src, Some(Operand::Special(SpecialRegister::Vcc)))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(decode_scalar_alu1("s_not_b32", &ops("s0")).is_err());
    }

    #[test]
    fn test_sop2_requires_writable_dest() {
        assert!(decode_scalar_alu2("s_add_u32", &ops("s0, s1, 0x10")).is_ok());
        assert!(matches!(
            decode_scalar_alu2("s_add_u32", &ops("0x10, s1, s2")),
            Err(DecodeError::OperandKind { position: 0, .. })
        ));
        assert!(matches!(
            decode_scalar_alu2("s_add_u32", &ops("s0, s1")),
            Err(DecodeError::Arity { found: 2, .. })
        ));
    }

    #[test]
    fn test_compare() {
        let kind = decode_scalar_compare("s_cmp_eq_u32", &ops("s0, 0")).unwrap();
        assert_eq!(
            kind,
            InstructionKind::ScalarCompare {
                src0: Operand::Register(Register::scalar(0)),
                src1: Some(Operand::Immediate(Immediate::integer(0))),
            }
        );
        assert!(decode_scalar_compare("s_set_gpr_idx_on", &ops("s2 gpr_idx(SRC0)")).is_ok());
    }

    #[test]
    fn test_branch_targets() {
        assert_eq!(
            decode_program_control("s_cbranch_scc1", &ops("label_0010")).unwrap(),
            InstructionKind::ScalarProgramControl {
                target: Some(BranchTarget::Label("label_0010".to_string()))
            }
        );
        assert_eq!(
            decode_program_control("s_branch", &ops("-3")).unwrap(),
            InstructionKind::ScalarProgramControl {
                target: Some(BranchTarget::Relative(-3))
            }
        );
        assert!(decode_program_control("s_branch", &ops("")).is_err());
        assert!(decode_program_control("s_branch", &ops("v0")).is_err());
    }

    #[test]
    fn test_waitcnt_and_nop() {
        assert!(decode_program_control("s_waitcnt", &ops("vmcnt(0) lgkmcnt(0)")).is_ok());
        assert!(decode_program_control("s_nop", &ops("0")).is_ok());
        assert!(decode_program_control("s_endpgm", &ops("")).is_ok());
        assert!(decode_program_control("s_cbranch_join", &ops("s4")).is_ok());
    }
}
