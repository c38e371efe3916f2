//! The batch script language: one directive per line.
//!
//! ```text
//! [bv:<kbps>] [ba:<kbps>] <target> | <child> <child> ...
//! [bv:<kbps>] [ba:<kbps>] <file>
//! ```

pub mod interpreter;
pub mod lexer;

pub use interpreter::{LineResult, interpret_line};
pub use lexer::{LexError, SEPARATOR, ScriptToken, tokenize_line};
