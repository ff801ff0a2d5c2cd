//! The word list: tokens read from a file, in file order.
//!
//! Words are interned, so membership checks don't walk the list;
//! the list itself keeps order and duplicates.

use std::io::BufRead;
use std::ops::ControlFlow;
use std::path::Path;

use string_interner::{DefaultStringInterner, DefaultSymbol};

use crate::data::Sequence;
use crate::reader::{self, ReadResult, TokenKind};

#[derive(Default)]
pub struct WordList {
    words: Sequence<DefaultSymbol>,
    symbols: DefaultStringInterner,
}

impl WordList {
    pub fn new() -> Self {
        Default::default()
    }

    /// Read the word list from a file.
    ///
    /// Every token must be `word_length` letters long; the first one that isn't cancels the read.
    pub fn load(path: impl AsRef<Path>, word_length: usize) -> ReadResult<Self> {
        let mut list = WordList::new();
        reader::parse_file(path, |kind, token| list.accept(kind, token, word_length))?;
        Ok(list)
    }

    /// As [`WordList::load`], from any buffered input.
    pub fn from_reader(input: impl BufRead, word_length: usize) -> ReadResult<Self> {
        let mut list = WordList::new();
        reader::parse(input, |kind, token| list.accept(kind, token, word_length))?;
        Ok(list)
    }

    fn accept(&mut self, kind: TokenKind, token: &str, word_length: usize) -> ControlFlow<()> {
        match kind {
            TokenKind::Text if token.len() == word_length => {
                self.push(token);
                ControlFlow::Continue(())
            }
            TokenKind::Text => {
                tracing::warn!(
                    "rejecting {:?}: expected {} letters, found {}",
                    token,
                    word_length,
                    token.len()
                );
                ControlFlow::Break(())
            }
        }
    }

    /// Append a word.
    pub fn push(&mut self, word: &str) {
        let symbol = self.symbols.get_or_intern(word);
        self.words.push_back(symbol);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The word at `index`, in file order.
    pub fn get(&self, index: usize) -> Option<&str> {
        let symbol = self.words.current(self.words.entry(index))?;
        self.symbols.resolve(*symbol)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.symbols.get(word).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words
            .iter()
            .filter_map(|symbol| self.symbols.resolve(*symbol))
    }
}

impl std::fmt::Debug for WordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
