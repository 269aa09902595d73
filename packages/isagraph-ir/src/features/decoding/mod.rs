//! Format Decoders and Instruction Classifier
//!
//! One decode function per instruction-format family, selected through a
//! static, overlap-checked priority table.
//!
//! ## Structure
//! - `domain/` - Instruction, InstructionKind, Operand, Register
//! - `ports/` - InstructionDecoder trait, DecodeOutcome, DecodeError
//! - `infrastructure/` - operand parser, family decoders, dispatcher, ISA CSV
//! - `application/` - DecodeListingUseCase (whole-file decode)
//!
//! ## Usage
//! ```ignore
//! let use_case = DecodeListingUseCase::new(IsaLexer::new(config.lexer.clone()), IsaDispatcher);
//! let listing = use_case.execute(&disassembly_text);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{
    DecodeListingUseCase, DisassemblyListing, IsaStatistics, LabelMarker, SourceMarker,
};
pub use domain::{
    BranchTarget, ControlFlow, FunctionalUnit, Immediate, Instruction, InstructionFormat,
    InstructionKind, MemoryAccess, Modifier, Operand, OperandList, OperandModifiers, Radix,
    Register, RegisterClass, SpecialRegister, VectorEncoding,
};
pub use infrastructure::{isa_csv, parse_operand_list, IsaCsvRow, IsaDispatcher};
pub use ports::{DecodeError, DecodeFn, DecodeOutcome, InstructionDecoder};
