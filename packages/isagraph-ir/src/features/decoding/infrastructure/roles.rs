//! Positional operand checks shared by the family decoders

use crate::features::decoding::domain::{Operand, OperandList, Register};
use crate::features::decoding::ports::DecodeError;

pub(crate) type RoleResult<T> = Result<T, DecodeError>;

/// Operand count must lie in `min..=max`
pub(crate) fn arity(
    mnemonic: &str,
    ops: &OperandList,
    min: usize,
    max: usize,
    expected: &'static str,
) -> RoleResult<()> {
    if (min..=max).contains(&ops.len()) {
        Ok(())
    } else {
        Err(DecodeError::arity(mnemonic, expected, ops.len()))
    }
}

fn at<'a>(mnemonic: &str, ops: &'a OperandList, position: usize) -> RoleResult<&'a Operand> {
    ops.get(position)
        .ok_or_else(|| DecodeError::arity(mnemonic, "more", ops.len()))
}

pub(crate) fn register_at(
    mnemonic: &str,
    ops: &OperandList,
    position: usize,
    expected: &'static str,
) -> RoleResult<Register> {
    let op = at(mnemonic, ops, position)?;
    op.as_register()
        .copied()
        .ok_or_else(|| DecodeError::operand_kind(mnemonic, position, expected, op))
}

pub(crate) fn scalar_register_at(
    mnemonic: &str,
    ops: &OperandList,
    position: usize,
) -> RoleResult<Register> {
    let reg = register_at(mnemonic, ops, position, "a scalar register")?;
    if reg.is_scalar() {
        Ok(reg)
    } else {
        Err(DecodeError::operand_kind(mnemonic, position, "a scalar register", &reg))
    }
}

pub(crate) fn vector_register_at(
    mnemonic: &str,
    ops: &OperandList,
    position: usize,
) -> RoleResult<Register> {
    let reg = register_at(mnemonic, ops, position, "a vector register")?;
    if reg.is_vector() {
        Ok(reg)
    } else {
        Err(DecodeError::operand_kind(mnemonic, position, "a vector register", &reg))
    }
}

/// Destination: a register or named register
pub(crate) fn writable_at(mnemonic: &str, ops: &OperandList, position: usize) -> RoleResult<Operand> {
    let op = at(mnemonic, ops, position)?;
    if op.is_writable() {
        Ok(op.clone())
    } else {
        Err(DecodeError::operand_kind(mnemonic, position, "a register", op))
    }
}

/// Source: register, literal, modified operand or symbol
pub(crate) fn value_at(mnemonic: &str, ops: &OperandList, position: usize) -> RoleResult<Operand> {
    let op = at(mnemonic, ops, position)?;
    if op.is_value() || matches!(op, Operand::HardwareRegister(_)) {
        Ok(op.clone())
    } else {
        Err(DecodeError::operand_kind(mnemonic, position, "a value", op))
    }
}

pub(crate) fn optional_value_at(
    mnemonic: &str,
    ops: &OperandList,
    position: usize,
) -> RoleResult<Option<Operand>> {
    if position < ops.len() {
        value_at(mnemonic, ops, position).map(Some)
    } else {
        Ok(None)
    }
}

/// Address slot: register, register list, or `off`
pub(crate) fn address_at(
    mnemonic: &str,
    ops: &OperandList,
    position: usize,
) -> RoleResult<Option<Operand>> {
    let op = at(mnemonic, ops, position)?;
    match op {
        Operand::Off => Ok(None),
        Operand::Register(_) | Operand::List(_) => Ok(Some(op.clone())),
        other => Err(DecodeError::operand_kind(mnemonic, position, "an address", other)),
    }
}
