//! Instruction Lexer
//!
//! Splits one raw disassembly line into a mnemonic and an operand tail, or
//! classifies it as something that is not an instruction (blank, comment,
//! label, debug marker, statistic, section marker).
//!
//! ## Structure
//! - `domain/` - LexedLine, Trivia, EncodingAnnotation, IsaStatistic
//! - `infrastructure/` - IsaLexer (regex patterns)

pub mod domain;
pub mod infrastructure;

pub use domain::{
    EncodingAnnotation, IsaStatistic, LabelKind, LexError, LexedInstruction, LexedLine, Trivia,
};
pub use infrastructure::IsaLexer;
