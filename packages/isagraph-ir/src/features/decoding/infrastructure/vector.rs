//! Vector ALU and vector interpolation decoders

use super::roles::{arity, optional_value_at, value_at, vector_register_at, writable_at, RoleResult};
use crate::features::decoding::domain::{InstructionKind, Operand, OperandList, VectorEncoding};
use crate::features::decoding::ports::DecodeError;

/// Opcodes without operands
const NO_OPERANDS: &[&str] = &["v_nop", "v_clrexcp", "v_pipeflush"];

/// Opcodes writing a second, scalar carry/condition destination
fn writes_carry(mnemonic: &str) -> bool {
    mnemonic.contains("_co_")
        || mnemonic.ends_with("_co")
        || mnemonic.starts_with("v_addc_")
        || mnemonic.starts_with("v_subb_")
        || mnemonic.starts_with("v_subbrev_")
        || mnemonic.starts_with("v_div_scale_")
        || matches!(
            mnemonic,
            "v_mad_u64_u32"
                | "v_mad_i64_i32"
                | "v_add_u32"
                | "v_sub_u32"
                | "v_subrev_u32"
                | "v_add_i32"
                | "v_sub_i32"
                | "v_subrev_i32"
        )
}

/// VOP1/VOP2/VOP3/VOPC: destinations first, then sources
///
/// Encoding controls (`clamp`, `mul:2`, `quad_perm:[..]`, `dst_sel:..`)
/// stay in the operand list's modifiers.
pub fn decode_vector_alu(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    if NO_OPERANDS.contains(&mnemonic) {
        arity(mnemonic, ops, 0, 0, "no")?;
        return Ok(vector_alu(Vec::new(), Vec::new()));
    }

    // GFX10+ VOPC `v_cmpx_*` writes EXEC implicitly and lists only sources.
    if mnemonic.starts_with("v_cmpx_") && ops.get(0).is_some_and(Operand::is_vector_register) {
        arity(mnemonic, ops, 1, 3, "1 to 3")?;
        return Ok(vector_alu(Vec::new(), sources(mnemonic, ops, 0)?));
    }

    arity(mnemonic, ops, 2, 6, "2 to 6")?;
    let dest_count = if ops.len() >= 4
        && writes_carry(mnemonic)
        && ops.get(1).is_some_and(Operand::is_scalar_like)
    {
        2
    } else {
        1
    };

    let dests = (0..dest_count)
        .map(|position| writable_at(mnemonic, ops, position))
        .collect::<RoleResult<Vec<_>>>()?;
    Ok(vector_alu(dests, sources(mnemonic, ops, dest_count)?))
}

fn sources(mnemonic: &str, ops: &OperandList, from: usize) -> RoleResult<Vec<Operand>> {
    (from..ops.len())
        .map(|position| value_at(mnemonic, ops, position))
        .collect()
}

fn vector_alu(dests: Vec<Operand>, srcs: Vec<Operand>) -> InstructionKind {
    InstructionKind::VectorAlu {
        dests,
        srcs,
        encoding: VectorEncoding::Unspecified,
    }
}

/// VINTRP: `dest, src, attrN.c`
pub fn decode_vector_interpolation(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    arity(mnemonic, ops, 3, 4, "3 or 4")?;
    let dest = vector_register_at(mnemonic, ops, 0)?;
    let src = value_at(mnemonic, ops, 1)?;

    let attr = ops.get(2).and_then(Operand::as_symbol).unwrap_or_default();
    let (attribute, channel) = parse_attribute(attr).ok_or_else(|| {
        DecodeError::invalid(mnemonic, attr, "expected an attribute channel such as attr0.x")
    })?;

    Ok(InstructionKind::VectorInterpolation {
        dest,
        src,
        attribute,
        channel,
        src2: optional_value_at(mnemonic, ops, 3)?,
    })
}

/// `attr3.y` -> `(3, 'y')`
fn parse_attribute(text: &str) -> Option<(u8, char)> {
    let rest = text.strip_prefix("attr")?;
    let (index, channel) = rest.split_once('.')?;
    let attribute = index.parse::<u8>().ok()?;
    let mut chars = channel.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ ('x' | 'y' | 'z' | 'w')), None) => Some((attribute, c)),
        _ => None,
    }
}
