//! LDS/GDS data-share and export decoders

use super::roles::{arity, register_at, RoleResult};
use crate::features::decoding::domain::{
    InstructionKind, Operand, OperandList, Register, SpecialRegister,
};
use crate::features::decoding::ports::DecodeError;
use once_cell::sync::Lazy;
use regex::Regex;

/// DS opcodes that write a result register before the address
fn returns_value(mnemonic: &str) -> bool {
    ["read", "load", "_rtn", "append", "consume", "swizzle", "permute", "bpermute"]
        .iter()
        .any(|needle| mnemonic.contains(needle))
}

/// DS: `[dest,] [address,] data...`
///
/// Global wave sync (`ds_gws_*`) has no address; its operands are data.
pub fn decode_data_share(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    arity(mnemonic, ops, 0, 4, "at most 4")?;
    let registers = (0..ops.len())
        .map(|position| register_at(mnemonic, ops, position, "a register"))
        .collect::<RoleResult<Vec<Register>>>()?;
    let mut rest = registers.as_slice();

    let dest = if returns_value(mnemonic) {
        let Some((first, tail)) = rest.split_first() else {
            return Err(DecodeError::arity(mnemonic, "at least 1", 0));
        };
        rest = tail;
        Some(*first)
    } else {
        None
    };

    let has_address = !(mnemonic.starts_with("ds_gws_") || mnemonic == "ds_nop");
    let address = match rest.split_first() {
        Some((first, tail)) if has_address => {
            rest = tail;
            Some(*first)
        }
        _ => None,
    };

    Ok(InstructionKind::DataShare {
        dest,
        address,
        data: rest.to_vec(),
    })
}

static EXPORT_TARGET: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(?:mrt\d+|mrtz|pos\d+|param\d+|prim|null|dual_src_blend[01])$").ok());

fn is_export_target(name: &str) -> bool {
    let compiled: &Option<Regex> = &EXPORT_TARGET;
    compiled.as_ref().is_some_and(|re| re.is_match(name))
}

/// EXP: `target, src0..src3` where each source is a VGPR or `off`
pub fn decode_export(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    arity(mnemonic, ops, 2, 5, "2 to 5")?;
    let target = match ops.get(0) {
        Some(Operand::Special(SpecialRegister::Null)) => "null".to_string(),
        Some(Operand::Symbol(name)) if is_export_target(name) => name.clone(),
        Some(other) => {
            return Err(DecodeError::operand_kind(mnemonic, 0, "an export target", other))
        }
        None => return Err(DecodeError::arity(mnemonic, "2 to 5", 0)),
    };

    let mut sources = Vec::with_capacity(ops.len() - 1);
    for position in 1..ops.len() {
        match ops.get(position) {
            Some(op @ Operand::Off) => sources.push(op.clone()),
            Some(op) if op.is_vector_register() => sources.push(op.clone()),
            Some(other) => {
                return Err(DecodeError::operand_kind(mnemonic, position, "a VGPR or off", other))
            }
            None => break,
        }
    }

    Ok(InstructionKind::Export { target, sources })
}
