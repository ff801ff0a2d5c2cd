//! Tests for the tokenizer: token delivery, newlines, and error paths.
use std::cell::Cell;
use std::io::{BufRead, Read, Write};
use std::ops::ControlFlow;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use super::*;

/// Parse `input`, accepting every token; return the result and the tokens seen.
fn collect(input: &[u8]) -> (ReadResult<Summary>, Vec<String>) {
    let mut tokens = Vec::new();
    let result = parse(input, |kind, token| {
        assert_eq!(kind, TokenKind::Text);
        tokens.push(token.to_owned());
        ControlFlow::Continue(())
    });
    (result, tokens)
}

#[test]
fn two_tokens_in_order() {
    let (result, tokens) = collect(b"abc;def;\n");
    let summary = result.unwrap();
    assert_eq!(tokens, vec!["abc", "def"]);
    assert_eq!(summary.tokens, 2);
    // The final newline ends the parse without counting a line.
    assert_eq!(summary.location.line, 1);
}

#[test]
fn case_is_preserved() {
    let (result, tokens) = collect(b"Hello;WORLD;\n");
    result.unwrap();
    assert_eq!(tokens, vec!["Hello", "WORLD"]);
}

#[test]
fn newline_encodings_agree() {
    for input in [&b"ab;\r\ncd;"[..], b"ab;\ncd;", b"ab;\rcd;", b"ab;\n\rcd;"] {
        let (result, tokens) = collect(input);
        let summary = result.unwrap_or_else(|e| panic!("{:?}: {e}", input));
        assert_eq!(tokens, vec!["ab", "cd"], "input {:?}", input);
        assert_eq!(summary.location.line, 2, "input {:?}", input);
    }
}

#[test]
fn blank_lines_count() {
    let (result, tokens) = collect(b"ab;\n\n\r\n\rcd;\r");
    let summary = result.unwrap();
    assert_eq!(tokens, vec!["ab", "cd"]);
    // The middle run pairs up as \n, \n\r, \n\r; then the final \r.
    assert_eq!(summary.location.line, 5);
    assert_eq!(summary.location.column, 0);
}

#[test]
fn columns_restart_on_each_line() {
    let (result, _) = collect(b"a;\n  bcd;");
    let summary = result.unwrap();
    assert_eq!(summary.location.line, 2);
    assert_eq!(summary.location.column, 6);
}

#[test]
fn whitespace_between_tokens() {
    let (result, tokens) = collect(b"  ab; \t cd;\x0b\x0cef;");
    result.unwrap();
    assert_eq!(tokens, vec!["ab", "cd", "ef"]);
}

#[test]
fn other_bytes_are_dropped() {
    // Digits and punctuation vanish, even inside a token.
    let (result, tokens) = collect(b"a1b-c;42 x\xffy;");
    result.unwrap();
    assert_eq!(tokens, vec!["abc", "xy"]);
}

#[test]
fn missing_terminator() {
    let (result, tokens) = collect(b"ab cd;");
    match result {
        Err(ReadErr::MissingTerminator(location)) => {
            assert_eq!(location, Location { line: 1, column: 3 });
        }
        v => panic!("unexpected result: {v:?}"),
    }
    assert!(tokens.is_empty());
}

#[test]
fn stray_terminator() {
    let (result, tokens) = collect(b";ab;");
    match result {
        Err(ReadErr::InvalidToken { location, message }) => {
            assert_eq!(location, Location { line: 1, column: 1 });
            assert!(message.contains(';'), "unexpected message: {message}");
        }
        v => panic!("unexpected result: {v:?}"),
    }
    assert!(tokens.is_empty());
}

#[test]
fn doubled_terminator() {
    let (result, tokens) = collect(b"ab;;");
    assert!(matches!(result, Err(ReadErr::InvalidToken { .. })));
    assert_eq!(tokens, vec!["ab"]);
}

#[test]
fn newline_inside_token() {
    for input in [&b"ok;\nab\ncd;"[..], b"ok;\nab\rcd;", b"ok;\nab\r\ncd;"] {
        let (result, tokens) = collect(input);
        match result {
            Err(ReadErr::InvalidToken { location, message }) => {
                assert_eq!(location.line, 2, "input {:?}", input);
                assert!(
                    message.contains("newline inside an unterminated token"),
                    "unexpected message: {message}"
                );
            }
            v => panic!("input {:?}: unexpected result: {v:?}", input),
        }
        assert_eq!(tokens, vec!["ok"]);
    }
}

#[test]
fn final_newline_drops_pending_token() {
    let (result, tokens) = collect(b"ab;cd\n");
    result.unwrap();
    assert_eq!(tokens, vec!["ab"]);
}

#[test]
fn trailing_partial_token_is_dropped() {
    let (result, tokens) = collect(b"ab;cd");
    let summary = result.unwrap();
    assert_eq!(tokens, vec!["ab"]);
    assert_eq!(summary.tokens, 1);
}

#[test]
fn empty_input() {
    let (result, tokens) = collect(b"");
    let summary = result.unwrap();
    assert!(tokens.is_empty());
    assert_eq!(summary, Summary {
        tokens: 0,
        location: Location { line: 1, column: 0 },
    });
}

#[test]
fn cancel_stops_reading() {
    let mut input: &[u8] = b"ab;cd;";
    let mut seen = Vec::new();
    let result = parse(&mut input, |_, token| {
        seen.push(token.to_owned());
        ControlFlow::Break(())
    });
    match result {
        Err(ReadErr::Canceled(location)) => assert_eq!(location, Location { line: 1, column: 3 }),
        v => panic!("unexpected result: {v:?}"),
    }
    assert_eq!(seen, vec!["ab"]);
    // Nothing past the first terminator was consumed.
    assert_eq!(input, b"cd;");
}

#[test]
fn cancel_on_a_later_token() {
    let mut seen = Vec::new();
    let result = parse(&b"one;two;three;four;"[..], |_, token| {
        seen.push(token.to_owned());
        if token == "two" {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    assert!(matches!(result, Err(ReadErr::Canceled(_))));
    assert_eq!(seen, vec!["one", "two"]);
}

#[test]
fn error_messages_name_the_location() {
    let (result, _) = collect(b"ab;\ncd ef;");
    let err = result.unwrap_err();
    assert_eq!(err.location(), Some(Location { line: 2, column: 3 }));
    let message = err.to_string();
    assert!(message.contains("line 2"), "missing line: {message}");
    assert!(message.contains("column 3"), "missing column: {message}");
}

#[test]
fn parse_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"apple;\r\nberry;\r\ncherry;\r\n").unwrap();
    file.flush().unwrap();

    let mut tokens = Vec::new();
    let summary = parse_file(file.path(), |_, token| {
        tokens.push(token.to_owned());
        ControlFlow::Continue(())
    })
    .unwrap();
    assert_eq!(tokens, vec!["apple", "berry", "cherry"]);
    assert_eq!(summary.tokens, 3);
    assert_eq!(summary.location.line, 4);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_file(dir.path().join("no-such-file"), |_, _| {
        panic!("no tokens expected")
    });
    match result {
        Err(ReadErr::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        v => panic!("unexpected result: {v:?}"),
    }
}

/// Input that counts how many times it has been dropped.
struct Tracked<'a> {
    input: &'a [u8],
    drops: Rc<Cell<u32>>,
}

impl Read for Tracked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.input.read(buf)
    }
}

impl BufRead for Tracked<'_> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.input.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.input.consume(amt)
    }
}

impl Drop for Tracked<'_> {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn input_released_once_on_every_exit() {
    // (input, cancel on first token, expected outcome)
    let cases: [(&[u8], bool, &str); 5] = [
        (b";x", false, "invalid"),
        (b"a b;", false, "missing"),
        (b"ab\ncd;", false, "invalid"),
        (b"ab;cd;", true, "canceled"),
        (b"ab;cd", false, "ok"),
    ];
    for (input, cancel, want) in cases {
        let drops = Rc::new(Cell::new(0));
        let tracked = Tracked {
            input,
            drops: drops.clone(),
        };
        let result = parse(tracked, |_, _| {
            if cancel {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        let got = match result {
            Ok(summary) => {
                assert_eq!(summary.tokens, 1, "input {:?}", input);
                "ok"
            }
            Err(ReadErr::InvalidToken { .. }) => "invalid",
            Err(ReadErr::MissingTerminator(_)) => "missing",
            Err(ReadErr::Canceled(_)) => "canceled",
            Err(e) => panic!("input {:?}: unexpected error: {e}", input),
        };
        assert_eq!(got, want, "input {:?}", input);
        assert_eq!(drops.get(), 1, "input {:?} released {} times", input, drops.get());
    }
}

/// Shared log sink for capturing formatted tracing output.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut log) = self.0.lock() {
            log.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        let log = self.0.lock().unwrap();
        String::from_utf8_lossy(&log).into_owned()
    }
}

/// Run `f` with tracing output captured; return what was logged.
fn logged(f: impl FnOnce()) -> String {
    let log = LogBuffer::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    log.contents()
}

#[test]
fn cancel_is_reported_with_location() {
    let log = logged(|| {
        let result = parse(&b"ab;\ncd;"[..], |_, token| {
            if token == "cd" {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(matches!(result, Err(ReadErr::Canceled(_))));
    });
    assert!(log.contains("WARN"), "cancel not logged as a warning: {log:?}");
    assert!(log.contains("canceled by callback at line 2 column 3"), "{log:?}");
}

#[test]
fn open_token_at_newline_is_reported() {
    let log = logged(|| {
        let (result, _) = collect(b"ab\ncd;");
        assert!(matches!(result, Err(ReadErr::InvalidToken { .. })));
    });
    assert!(
        log.contains("unexpected newline inside an unterminated token at line 1 column 3"),
        "{log:?}"
    );
}
