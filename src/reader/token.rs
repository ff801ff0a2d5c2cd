//! Module for extracting tokens from an input stream.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::ops::ControlFlow;
use std::path::Path;

use super::{Location, ReadErr, ReadResult};

/// The kinds of token the reader produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of letters.
    Text,
}

/// What a completed parse went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of tokens handed to the visitor.
    pub tokens: usize,
    /// Position of the last byte consumed.
    pub location: Location,
}

/// Tokenize the file at `path`, handing each token to `visitor`.
pub fn parse_file<F>(path: impl AsRef<Path>, visitor: F) -> ReadResult<Summary>
where
    F: FnMut(TokenKind, &str) -> ControlFlow<()>,
{
    let path = path.as_ref();
    let file = File::open(path)?;
    tracing::debug!("parsing {}", path.display());
    parse(BufReader::new(file), visitor)
}

/// Tokenize `input`, handing each token to `visitor` in stream order.
///
/// The visitor returns `ControlFlow::Break(())` to cancel;
/// nothing more is read from `input` after that.
///
/// A trailing run of letters with no terminator at the end of input is dropped, not reported.
pub fn parse<R, F>(input: R, visitor: F) -> ReadResult<Summary>
where
    R: BufRead,
    F: FnMut(TokenKind, &str) -> ControlFlow<()>,
{
    Context {
        input,
        buffer: Vec::new(),
        line: 1,
        column: 0,
        tokens: 0,
        visitor,
    }
    .run()
}

/// State for one parse.
///
/// Owns the input and the token buffer; both go away with it, however the parse ends.
struct Context<R, F> {
    input: R,
    /// Letters of the token in progress.
    buffer: Vec<u8>,
    line: usize,
    column: usize,
    tokens: usize,
    visitor: F,
}

/// Whitespace other than newlines, as the C locale classifies it.
fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | 0x0B | 0x0C)
}

impl<R, F> Context<R, F>
where
    R: BufRead,
    F: FnMut(TokenKind, &str) -> ControlFlow<()>,
{
    fn run(mut self) -> ReadResult<Summary> {
        while let Some(byte) = self.next_byte()? {
            match byte {
                b'\n' => {
                    match self.peek()? {
                        // A final newline ends the parse, whatever is pending.
                        None => break,
                        Some(b'\r') => self.consume(),
                        Some(_) => (),
                    }
                    self.newline()?;
                }
                b'\r' => {
                    if self.peek()? == Some(b'\n') {
                        self.consume();
                    }
                    self.newline()?;
                }
                b';' => self.terminate()?,
                b if b.is_ascii_alphabetic() => self.buffer.push(b),
                b if is_blank(b) => {
                    if !self.buffer.is_empty() {
                        return Err(self.report(ReadErr::MissingTerminator(self.location())));
                    }
                }
                _ => (),
            }
        }

        if !self.buffer.is_empty() {
            tracing::trace!(
                "dropping {} unterminated byte(s) at end of input",
                self.buffer.len()
            );
        }
        let summary = Summary {
            tokens: self.tokens,
            location: self.location(),
        };
        tracing::debug!("parsed {} token(s), ending at {}", summary.tokens, summary.location);
        Ok(summary)
    }

    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }

    /// Log why the parse stopped before handing the error back.
    fn report(&self, err: ReadErr) -> ReadErr {
        tracing::warn!("{err}");
        err
    }

    /// A line boundary; tokens may not span lines.
    fn newline(&mut self) -> ReadResult<()> {
        if !self.buffer.is_empty() {
            return Err(self.report(ReadErr::InvalidToken {
                location: self.location(),
                message: "unexpected newline inside an unterminated token",
            }));
        }
        self.line += 1;
        self.column = 0;
        Ok(())
    }

    /// A terminator: hand the buffered token to the visitor.
    fn terminate(&mut self) -> ReadResult<()> {
        if self.buffer.is_empty() {
            return Err(self.report(ReadErr::InvalidToken {
                location: self.location(),
                message: "unexpected ';'",
            }));
        }
        // The buffer only ever holds ASCII letters.
        let token: String = self.buffer.drain(..).map(char::from).collect();
        self.tokens += 1;
        tracing::trace!("token {:?} at {}", token, self.location());

        match (self.visitor)(TokenKind::Text, &token) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(self.report(ReadErr::Canceled(self.location()))),
        }
    }

    /// Look at the next byte without consuming it.
    fn peek(&mut self) -> ReadResult<Option<u8>> {
        loop {
            match self.input.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Consume the byte `peek` returned.
    fn consume(&mut self) {
        self.input.consume(1);
        self.column += 1;
    }

    fn next_byte(&mut self) -> ReadResult<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.consume();
        }
        Ok(byte)
    }
}
