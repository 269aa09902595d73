mod classification;
mod data_share;
pub mod dispatcher;
pub mod isa_csv;
mod memory;
pub mod mnemonics;
pub mod operand_parser;
mod roles;
mod scalar;
mod vector;

pub use classification::{control_flow_of, functional_unit_of};
pub use data_share::{decode_data_share, decode_export};
pub use dispatcher::{classify, decoder_table, split_encoding_suffix, DecoderEntry, IsaDispatcher};
pub use isa_csv::{isa_csv, IsaCsvRow};
pub use memory::{decode_buffer_typed, decode_buffer_untyped, decode_image, decode_scalar_memory};
pub use mnemonics::MnemonicSet;
pub use operand_parser::{parse_operand, parse_operand_list, OperandSyntaxError};
pub use scalar::{
    decode_program_control, decode_scalar_alu1, decode_scalar_alu2, decode_scalar_compare,
    decode_scalar_immediate,
};
pub use vector::{decode_vector_alu, decode_vector_interpolation};
