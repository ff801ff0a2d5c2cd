//! Word lists read from semicolon-terminated token files, and a guessing game over them.
//!

pub mod data;
pub mod game;
pub mod reader;
pub mod words;

pub use reader::{parse, parse_file, ReadErr, ReadResult, Summary, TokenKind};
pub use words::WordList;
