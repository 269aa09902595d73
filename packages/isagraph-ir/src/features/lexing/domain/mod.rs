mod lexed_line;

pub use lexed_line::{
    EncodingAnnotation, IsaStatistic, LabelKind, LexError, LexedInstruction, LexedLine, Trivia,
};
