mod lexer;
mod patterns;

pub use lexer::IsaLexer;
