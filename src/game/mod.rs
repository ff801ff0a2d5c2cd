//! A word-guessing match.
//!
//! The player has [`ROUNDS`] guesses to find a [`WORD_LENGTH`]-letter target word.
//! Each guess must be on the word list; after each wrong guess, every letter is marked:
//!
//! -   `^`: right letter, right place.
//! -   `+`: the letter is somewhere in the target.
//! -   ` `: the letter is not in the target.
//!
//! Letters found in the right place are revealed in the tip line shown before each round.

use std::io::{BufRead, Write};

use crate::words::WordList;


pub const WORD_LENGTH: usize = 5;
pub const ROUNDS: u8 = 5;

/// How one letter of a guess relates to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Exact,
    Present,
    Absent,
}

impl Hint {
    pub fn symbol(self) -> char {
        match self {
            Hint::Exact => '^',
            Hint::Present => '+',
            Hint::Absent => ' ',
        }
    }
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    /// Input ran out before the match was decided.
    Abandoned,
}

/// Why an input line is not a usable guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    #[error("Input must be exactly {} characters", WORD_LENGTH)]
    Length,
    #[error("Input contains illegal character(s), use a-z or A-Z")]
    Characters,
}

mod regex {
    use regex::Regex;
    use std::sync::OnceLock;

    pub(super) fn letters() -> &'static Regex {
        static LETTERS: OnceLock<Regex> = OnceLock::new();
        LETTERS.get_or_init(|| {
            Regex::new(r"\A[A-Za-z]+\z").expect("could not compile regex for letters")
        })
    }
}

/// Check an input line as a guess, and normalize it to lowercase.
pub fn validate(input: &str) -> Result<String, GuessError> {
    let input = input.trim();
    if input.chars().count() != WORD_LENGTH {
        return Err(GuessError::Length);
    }
    if !regex::letters().is_match(input) {
        return Err(GuessError::Characters);
    }
    Ok(input.to_ascii_lowercase())
}

/// Mark each letter of `guess` against `target`.
///
/// Both are expected to be [`WORD_LENGTH`] bytes; missing bytes are marked absent.
pub fn score(guess: &str, target: &str) -> [Hint; WORD_LENGTH] {
    let target = target.as_bytes();
    let mut hints = [Hint::Absent; WORD_LENGTH];
    for (i, (hint, letter)) in hints.iter_mut().zip(guess.bytes()).enumerate() {
        *hint = if target.get(i) == Some(&letter) {
            Hint::Exact
        } else if target.contains(&letter) {
            Hint::Present
        } else {
            Hint::Absent
        };
    }
    hints
}

/// State of one match.
pub struct Match<'a> {
    target: String,
    words: &'a WordList,
    tip: [char; WORD_LENGTH],
    remaining: u8,
}

impl<'a> Match<'a> {
    /// Start a match for the word at `index` in `words`.
    pub fn start(index: usize, words: &'a WordList) -> Option<Self> {
        let target = words.get(index)?;
        Some(Match::new(target, words))
    }

    pub fn new(target: &str, words: &'a WordList) -> Self {
        Match {
            target: target.to_ascii_lowercase(),
            words,
            tip: ['_'; WORD_LENGTH],
            remaining: ROUNDS,
        }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// The target's letters found so far, `_` elsewhere.
    pub fn tip(&self) -> String {
        self.tip.iter().collect()
    }

    fn is_allowed(&self, guess: &str) -> bool {
        self.words.contains(guess) || self.words.iter().any(|w| w.eq_ignore_ascii_case(guess))
    }

    /// Apply a wrong guess: update the tip, and use up a round.
    fn guess(&mut self, guess: &str) -> [Hint; WORD_LENGTH] {
        let hints = score(guess, &self.target);
        for ((tip, hint), letter) in self.tip.iter_mut().zip(hints).zip(self.target.chars()) {
            if hint == Hint::Exact {
                *tip = letter;
            }
        }
        self.remaining = self.remaining.saturating_sub(1);
        hints
    }

    /// Play the match out, reading one guess per line from `input`.
    pub fn play(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> std::io::Result<Outcome> {
        let mut line = String::new();
        while self.remaining > 0 {
            writeln!(output, "{}", self.tip())?;
            let guess = loop {
                write!(output, "{}>", self.remaining)?;
                output.flush()?;
                line.clear();
                if input.read_line(&mut line)? == 0 {
                    tracing::debug!("input ended with {} round(s) left", self.remaining);
                    return Ok(Outcome::Abandoned);
                }
                if line.trim().is_empty() {
                    continue;
                }
                match validate(&line) {
                    Ok(guess) => break guess,
                    Err(e) => writeln!(output, "{e}")?,
                }
            };

            if !self.is_allowed(&guess) {
                writeln!(output, "'{guess}' not a word")?;
                continue;
            }
            if guess == self.target {
                return Ok(Outcome::Win);
            }
            let hints = self.guess(&guess);
            let marks: String = hints.iter().map(|h| h.symbol()).collect();
            writeln!(output, "  {marks}")?;
        }
        Ok(Outcome::Lose)
    }
}
