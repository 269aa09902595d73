//! Scalar memory, buffer and image decoders

use super::roles::{
    address_at, arity, optional_value_at, register_at, scalar_register_at, value_at, RoleResult,
};
use crate::features::decoding::domain::{InstructionKind, OperandList, Register};
use crate::features::decoding::ports::DecodeError;

/// SMEM: `dest, base, offset`; timers take only `dest`, cache ops nothing
pub fn decode_scalar_memory(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    arity(mnemonic, ops, 0, 3, "0 to 3")?;
    let dest = match ops.len() {
        0 => None,
        _ => Some(scalar_register_at(mnemonic, ops, 0)?),
    };
    let base = match ops.len() {
        0 | 1 => None,
        _ => Some(scalar_register_at(mnemonic, ops, 1)?),
    };
    Ok(InstructionKind::ScalarMemoryRead {
        dest,
        base,
        offset: optional_value_at(mnemonic, ops, 2)?,
    })
}

/// MUBUF: `data, address|off, resource, soffset`
pub fn decode_buffer_untyped(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    decode_buffer(mnemonic, ops, false)
}

/// MTBUF: MUBUF operands plus `format:[..]` (or `dfmt:`/`nfmt:`) metadata
pub fn decode_buffer_typed(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    decode_buffer(mnemonic, ops, true)
}

fn decode_buffer(mnemonic: &str, ops: &OperandList, typed: bool) -> RoleResult<InstructionKind> {
    // cache invalidation forms carry no operands
    if ops.is_empty() && !typed {
        return Ok(InstructionKind::BufferMemory {
            typed,
            data: None,
            address: None,
            resource: None,
            scalar_offset: None,
            format: None,
        });
    }

    arity(mnemonic, ops, 3, 4, "3 or 4")?;
    // pre-GFX9 listings omit the address slot when neither offen nor idxen is set
    let has_address = ops.len() == 4;
    let resource_position = if has_address { 2 } else { 1 };

    let data = Some(value_at(mnemonic, ops, 0)?);
    let address = if has_address {
        address_at(mnemonic, ops, 1)?
    } else {
        None
    };
    let resource = resource_descriptor(mnemonic, ops, resource_position)?;
    let scalar_offset = optional_value_at(mnemonic, ops, resource_position + 1)?;

    let format = if typed { format_qualifier(ops) } else { None };

    Ok(InstructionKind::BufferMemory {
        typed,
        data,
        address,
        resource: Some(resource),
        scalar_offset,
        format,
    })
}

fn format_qualifier(ops: &OperandList) -> Option<String> {
    if let Some(value) = ops.modifier("format").and_then(|m| m.value.clone()) {
        return Some(value);
    }
    let parts: Vec<String> = ["dfmt", "nfmt"]
        .iter()
        .filter_map(|name| ops.modifier(name))
        .map(ToString::to_string)
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Buffer/image resource descriptor: four or eight consecutive SGPRs
fn resource_descriptor(mnemonic: &str, ops: &OperandList, position: usize) -> RoleResult<Register> {
    let reg = scalar_register_at(mnemonic, ops, position)?;
    if reg.count >= 4 {
        Ok(reg)
    } else {
        Err(DecodeError::operand_kind(
            mnemonic,
            position,
            "a resource descriptor (4 or 8 SGPRs)",
            &reg,
        ))
    }
}

/// MIMG: `data, address, resource[, sampler]`
pub fn decode_image(mnemonic: &str, ops: &OperandList) -> RoleResult<InstructionKind> {
    arity(mnemonic, ops, 3, 4, "3 or 4")?;
    let data = register_at(mnemonic, ops, 0, "a data register")?;
    let address = match address_at(mnemonic, ops, 1)? {
        Some(address) => address,
        None => value_at(mnemonic, ops, 1)?,
    };
    let resource = resource_descriptor(mnemonic, ops, 2)?;
    let sampler = match ops.len() {
        4 => Some(resource_descriptor(mnemonic, ops, 3)?),
        _ => None,
    };
    Ok(InstructionKind::ImageMemory {
        data,
        address,
        resource,
        sampler,
    })
}
