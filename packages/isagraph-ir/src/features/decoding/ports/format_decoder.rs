//! Decoder contracts
//!
//! A format family decodes with a plain function over the parsed operand
//! list; the dispatcher wraps each call into a tri-state `DecodeOutcome`.
//! `InstructionDecoder` is the seam the listing use case depends on.

use crate::features::decoding::domain::{Instruction, InstructionKind, OperandList};
use crate::features::lexing::LexedInstruction;
use thiserror::Error;

/// Recognised mnemonic whose operands do not fit its format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{mnemonic}: expected {expected} operands, found {found}")]
    Arity {
        mnemonic: String,
        expected: &'static str,
        found: usize,
    },

    #[error("{mnemonic}: operand {position} must be {expected}, found '{found}'")]
    OperandKind {
        mnemonic: String,
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("{mnemonic}: invalid operand '{token}': {reason}")]
    InvalidOperand {
        mnemonic: String,
        token: String,
        reason: String,
    },
}

impl DecodeError {
    pub fn arity(mnemonic: &str, expected: &'static str, found: usize) -> Self {
        DecodeError::Arity {
            mnemonic: mnemonic.to_string(),
            expected,
            found,
        }
    }

    pub fn operand_kind(
        mnemonic: &str,
        position: usize,
        expected: &'static str,
        found: &impl std::fmt::Display,
    ) -> Self {
        DecodeError::OperandKind {
            mnemonic: mnemonic.to_string(),
            position,
            expected,
            found: found.to_string(),
        }
    }

    pub fn invalid(mnemonic: &str, token: impl Into<String>, reason: impl Into<String>) -> Self {
        DecodeError::InvalidOperand {
            mnemonic: mnemonic.to_string(),
            token: token.into(),
            reason: reason.into(),
        }
    }
}

/// Decode function of one format family; `mnemonic` has its encoding
/// suffix removed
pub type DecodeFn = fn(&str, &OperandList) -> Result<InstructionKind, DecodeError>;

/// What one family says about one line
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Decoded(InstructionKind),
    Malformed(DecodeError),
    NotMine,
}

pub trait InstructionDecoder: Send + Sync {
    /// Decode a lexed line. Unrecognised mnemonics come back as
    /// `Ok` with `InstructionKind::Unknown`.
    fn decode(
        &self,
        lexed: &LexedInstruction<'_>,
        raw_text: &str,
        line_number: u32,
    ) -> Result<Instruction, DecodeError>;
}
