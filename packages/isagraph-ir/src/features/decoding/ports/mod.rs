mod format_decoder;

pub use format_decoder::{DecodeError, DecodeFn, DecodeOutcome, InstructionDecoder};
