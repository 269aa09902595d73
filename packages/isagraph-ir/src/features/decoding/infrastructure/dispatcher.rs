//! Instruction classifier
//!
//! One table entry per format family, tried in a fixed order. The table is
//! built once; building it asserts that no two families recognise the
//! same mnemonic, so the first match is also the only match.

use super::classification::{control_flow_of, functional_unit_of};
use super::data_share::{decode_data_share, decode_export};
use super::memory::{decode_buffer_typed, decode_buffer_untyped, decode_image, decode_scalar_memory};
use super::mnemonics::{self, MnemonicSet};
use super::operand_parser::parse_operand_list;
use super::scalar::{
    decode_program_control, decode_scalar_alu1, decode_scalar_alu2, decode_scalar_compare,
    decode_scalar_immediate,
};
use super::vector::{decode_vector_alu, decode_vector_interpolation};
use crate::features::decoding::domain::{
    Instruction, InstructionFormat, InstructionKind, OperandList, VectorEncoding,
};
use crate::features::decoding::ports::{DecodeError, DecodeFn, DecodeOutcome, InstructionDecoder};
use crate::features::lexing::LexedInstruction;
use once_cell::sync::Lazy;

/// One format family: its mnemonics and its decode function
pub struct DecoderEntry {
    pub format: InstructionFormat,
    pub mnemonics: MnemonicSet,
    decode: DecodeFn,
}

impl DecoderEntry {
    const fn new(format: InstructionFormat, mnemonics: MnemonicSet, decode: DecodeFn) -> Self {
        Self {
            format,
            mnemonics,
            decode,
        }
    }

    pub fn try_decode(&self, mnemonic: &str, ops: &OperandList) -> DecodeOutcome {
        if !self.mnemonics.contains(mnemonic) {
            return DecodeOutcome::NotMine;
        }
        match (self.decode)(mnemonic, ops) {
            Ok(kind) => DecodeOutcome::Decoded(kind),
            Err(err) => DecodeOutcome::Malformed(err),
        }
    }
}

static DECODER_TABLE: Lazy<Vec<DecoderEntry>> = Lazy::new(|| {
    use InstructionFormat as F;
    let table = vec![
        DecoderEntry::new(F::ScalarProgramControl, mnemonics::SCALAR_PROGRAM_CONTROL, decode_program_control),
        DecoderEntry::new(F::ScalarImmediate, mnemonics::SCALAR_IMMEDIATE, decode_scalar_immediate),
        DecoderEntry::new(F::ScalarCompare, mnemonics::SCALAR_COMPARE, decode_scalar_compare),
        DecoderEntry::new(F::ScalarAlu1, mnemonics::SCALAR_ALU1, decode_scalar_alu1),
        DecoderEntry::new(F::ScalarAlu2, mnemonics::SCALAR_ALU2, decode_scalar_alu2),
        DecoderEntry::new(F::ScalarMemoryRead, mnemonics::SCALAR_MEMORY, decode_scalar_memory),
        DecoderEntry::new(F::BufferMemoryTyped, mnemonics::BUFFER_TYPED, decode_buffer_typed),
        DecoderEntry::new(F::BufferMemoryUntyped, mnemonics::BUFFER_UNTYPED, decode_buffer_untyped),
        DecoderEntry::new(F::ImageMemory, mnemonics::IMAGE, decode_image),
        DecoderEntry::new(F::DataShare, mnemonics::DATA_SHARE, decode_data_share),
        DecoderEntry::new(F::Export, mnemonics::EXPORT, decode_export),
        DecoderEntry::new(F::VectorInterpolation, mnemonics::VECTOR_INTERPOLATION, decode_vector_interpolation),
        DecoderEntry::new(F::VectorAlu, mnemonics::VECTOR_ALU, decode_vector_alu),
    ];
    assert_disjoint(&table);
    table
});

fn assert_disjoint(table: &[DecoderEntry]) {
    for (i, a) in table.iter().enumerate() {
        for b in &table[i + 1..] {
            if let Some(witness) = a.mnemonics.overlap(&b.mnemonics) {
                panic!(
                    "decoder families {} and {} both recognise '{}'",
                    a.format, b.format, witness
                );
            }
        }
    }
}

/// Registered families in priority order
pub fn decoder_table() -> &'static [DecoderEntry] {
    &DECODER_TABLE
}

/// `v_add_f32_e64` -> (`v_add_f32`, E64)
pub fn split_encoding_suffix(mnemonic: &str) -> (&str, VectorEncoding) {
    for encoding in [
        VectorEncoding::E32,
        VectorEncoding::E64,
        VectorEncoding::Dpp,
        VectorEncoding::Sdwa,
    ] {
        if let Some(base) = mnemonic.strip_suffix(encoding.suffix()) {
            return (base, encoding);
        }
    }
    (mnemonic, VectorEncoding::Unspecified)
}

/// First family that claims `mnemonic` (suffix already removed)
pub fn classify(mnemonic: &str, ops: &OperandList) -> DecodeOutcome {
    decoder_table()
        .iter()
        .map(|entry| entry.try_decode(mnemonic, ops))
        .find(|outcome| !matches!(outcome, DecodeOutcome::NotMine))
        .unwrap_or(DecodeOutcome::NotMine)
}

pub fn is_recognised(mnemonic: &str) -> bool {
    decoder_table()
        .iter()
        .any(|entry| entry.mnemonics.contains(mnemonic))
}

/// Table-driven `InstructionDecoder` over every supported family
#[derive(Debug, Default, Clone, Copy)]
pub struct IsaDispatcher;

impl IsaDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl InstructionDecoder for IsaDispatcher {
    fn decode(
        &self,
        lexed: &LexedInstruction<'_>,
        raw_text: &str,
        line_number: u32,
    ) -> Result<Instruction, DecodeError> {
        let mnemonic = lexed.mnemonic.to_ascii_lowercase();
        let (base, encoding) = split_encoding_suffix(&mnemonic);

        let mut instruction = Instruction::unknown(mnemonic.as_str(), raw_text, line_number);
        instruction.offset = lexed.offset;
        instruction.encoding = lexed.encoding;

        if !is_recognised(base) {
            return Ok(instruction);
        }

        let ops = parse_operand_list(lexed.operand_text)
            .map_err(|err| DecodeError::invalid(base, err.token, err.reason))?;

        let mut kind = match classify(base, &ops) {
            DecodeOutcome::Decoded(kind) => kind,
            DecodeOutcome::Malformed(err) => return Err(err),
            DecodeOutcome::NotMine => return Ok(instruction),
        };
        if let InstructionKind::VectorAlu { encoding: slot, .. } = &mut kind {
            *slot = encoding;
        }

        let control_flow = control_flow_of(base, &kind);
        instruction.functional_unit = functional_unit_of(base, &kind, &control_flow);
        instruction.control_flow = control_flow;
        instruction.kind = kind;
        instruction.operands = ops.operands;
        instruction.modifiers = ops.modifiers;
        Ok(instruction)
    }
}
