//! Play a word-guessing match against a word list.
//!
//! The word list is a file of five-letter tokens, each followed by `;`:
//!
//! ```ignore
//! wordish words.txt
//! ```

use std::process::ExitCode;

use rand::Rng;
use wordish::game::{Match, Outcome, WORD_LENGTH};
use wordish::WordList;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let [_, path] = args.as_slice() else {
        eprintln!("usage: wordish <word-file>");
        return ExitCode::from(2);
    };

    let words = match WordList::load(path, WORD_LENGTH) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("error: could not load {path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    if words.is_empty() {
        eprintln!("error: {path} contains no words");
        return ExitCode::FAILURE;
    }
    tracing::info!("loaded {} word(s) from {}", words.len(), path);

    let index = rand::thread_rng().gen_range(0..words.len());
    let Some(mut game) = Match::start(index, &words) else {
        eprintln!("error: no word at index {index}");
        return ExitCode::FAILURE;
    };

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    match game.play(&mut stdin, &mut stdout) {
        Ok(Outcome::Win) => {
            println!("You win!");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Lose) => {
            println!("You lose! The word was {}.", words.get(index).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Abandoned) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
