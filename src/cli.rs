use crate::game_state::{GameInterface, GuessReport, UserAction, attempt_noun};
use crate::scoring::{Mark, render_tiles};
use crate::session::{DEFAULT_WORD_LENGTH, GameConfig, Hint, HintKind};
use crate::{debug_log, info_log};
use clap::Parser;
use crossterm::style::{StyledContent, Stylize};
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::PathBuf;

/// Wordle in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited word list
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Number of letters in the secret word (3-10)
    #[arg(short, long, default_value_t = DEFAULT_WORD_LENGTH, value_parser = parse_word_length)]
    pub length: usize,

    /// Seed for reproducible secrets and hints
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

fn parse_word_length(value: &str) -> Result<usize, String> {
    let length: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    GameConfig::new(length)
        .map(|config| config.word_length())
        .map_err(|e| e.to_string())
}

// UI Input/Output functions

/// Turns one line of player input into an action.
///
/// Commands start with ':' so they never collide with dictionary words.
#[must_use]
pub fn parse_action(line: &str) -> Option<UserAction> {
    let input = line.trim();
    if input.is_empty() {
        return None;
    }
    let Some(command) = input.strip_prefix(':') else {
        return Some(UserAction::Guess(input.to_string()));
    };

    let mut parts = command.split_whitespace();
    match parts.next().map(str::to_lowercase).as_deref() {
        Some("exit" | "quit") => Some(UserAction::Exit),
        Some("next" | "restart") => Some(UserAction::Restart),
        Some("big") => Some(UserAction::Hint(HintKind::Positional)),
        Some("small") => Some(UserAction::Hint(HintKind::Existential)),
        Some("length") => parts
            .next()
            .and_then(|n| n.parse().ok())
            .map(UserAction::ChangeLength),
        _ => None,
    }
}

fn styled_letter(letter: char, mark: Mark) -> StyledContent<String> {
    let cell = format!(" {} ", letter.to_ascii_uppercase());
    match mark {
        Mark::Exact => cell.black().on_green().bold(),
        Mark::Present => cell.black().on_yellow().bold(),
        Mark::Absent => cell.white().on_dark_grey(),
    }
}

pub fn display_instructions<W: Write>(out: &mut W, config: &GameConfig) -> io::Result<()> {
    writeln!(
        out,
        "\nLet's play {}-letter Wordle! You have {} attempts.",
        config.word_length(),
        config.max_attempts()
    )?;
    writeln!(
        out,
        "Type a guess, or ':big' / ':small' for a hint, ':next' to restart, ':length N' to change length, ':exit' to quit."
    )
}

pub fn display_guess<W: Write>(out: &mut W, report: &GuessReport) -> io::Result<()> {
    let record = &report.record;
    let letters: String = record
        .word()
        .chars()
        .zip(record.marks())
        .map(|(c, m)| styled_letter(c, *m).to_string())
        .collect();
    writeln!(
        out,
        "{}. {}  {}  ({} attempts left)",
        report.attempt,
        letters,
        render_tiles(record.marks()),
        report.remaining
    )
}

pub fn display_hint<W: Write>(out: &mut W, hint: &Hint) -> io::Result<()> {
    writeln!(out, "{}", hint.to_string().cyan())
}

pub fn display_error<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.red())
}

pub fn display_won<W: Write>(out: &mut W, secret: &str, attempts: usize) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!(
            "Congratulations, you've guessed the word '{secret}' in {attempts} {}!",
            attempt_noun(attempts)
        )
        .green()
        .bold()
    )?;
    writeln!(out, "Type ':next' to play again or ':exit' to quit.")
}

pub fn display_lost<W: Write>(out: &mut W, secret: &str) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("Game Over! The word was '{secret}'. Restart to play again.")
            .red()
            .bold()
    )
}

pub fn display_new_game<W: Write>(out: &mut W, config: &GameConfig) -> io::Result<()> {
    writeln!(
        out,
        "New game started with a {}-letter word.",
        config.word_length()
    )
}

pub fn display_unknown_input<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "Unrecognised input. Enter a guess or a command such as ':big' or ':exit'."
    )
}

pub fn display_exit_message<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Exiting.")
}

/// CLI implementation of the `GameInterface` trait
/// This struct reads lines from a `BufRead` and writes to stdout unless given another writer
pub struct CliInterface<R: BufRead, W: Write = io::Stdout> {
    reader: R,
    writer: W,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self::with_writer(reader, io::stdout())
    }
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn with_writer(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Gives back the writer, e.g. to inspect a captured transcript.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn emit<F>(&mut self, write: F)
    where
        F: FnOnce(&mut W) -> io::Result<()>,
    {
        if let Err(e) = write(&mut self.writer).and_then(|()| self.writer.flush()) {
            log::warn!("Failed to write output: {e}");
        }
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn display_instructions(&mut self, config: &GameConfig) {
        self.emit(|out| display_instructions(out, config));
    }

    fn read_action(&mut self) -> Option<UserAction> {
        self.emit(|out| writeln!(out, "\nEnter your guess:"));
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => {
                info_log!("read_action() - end of input, exiting");
                return Some(UserAction::Exit);
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                debug_log!("read_action() - undecodable line: {}", e);
                self.emit(|out| display_error(out, "Input must be valid text."));
                return None;
            }
            Err(e) => {
                log::warn!("Failed to read input: {e}");
                return Some(UserAction::Exit);
            }
        }
        debug_log!("read_action() - raw input: {:?}", input);

        let action = parse_action(&input);
        if action.is_none() {
            self.emit(display_unknown_input);
        }
        action
    }

    fn display_guess(&mut self, report: &GuessReport) {
        self.emit(|out| display_guess(out, report));
    }

    fn display_hint(&mut self, hint: &Hint) {
        self.emit(|out| display_hint(out, hint));
    }

    fn display_error(&mut self, message: &str) {
        self.emit(|out| display_error(out, message));
    }

    fn display_won(&mut self, secret: &str, attempts: usize) {
        self.emit(|out| display_won(out, secret, attempts));
    }

    fn display_lost(&mut self, secret: &str) {
        self.emit(|out| display_lost(out, secret));
    }

    fn display_new_game(&mut self, config: &GameConfig) {
        self.emit(|out| display_new_game(out, config));
    }

    fn display_exit_message(&mut self) {
        self.emit(display_exit_message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["wordle-game"]).unwrap();
        assert_eq!(cli.wordbank_path, None);
        assert_eq!(cli.length, 5);
        assert_eq!(cli.seed, None);
        assert!(!cli.tui);
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "wordle-game",
            "-i",
            "custom_words.txt",
            "--length",
            "7",
            "--seed",
            "42",
            "--tui",
        ])
        .unwrap();
        assert_eq!(cli.wordbank_path, Some(PathBuf::from("custom_words.txt")));
        assert_eq!(cli.length, 7);
        assert_eq!(cli.seed, Some(42));
        assert!(cli.tui);
    }

    #[test]
    fn test_parse_cli_rejects_bad_length() {
        assert!(Cli::try_parse_from(["wordle-game", "-l", "2"]).is_err());
        assert!(Cli::try_parse_from(["wordle-game", "-l", "11"]).is_err());
        assert!(Cli::try_parse_from(["wordle-game", "-l", "five"]).is_err());
    }

    #[test]
    fn test_parse_action_guess() {
        assert_eq!(
            parse_action("  Crane \n"),
            Some(UserAction::Guess("Crane".to_string()))
        );
        // Bare words are always guesses, even ones that look like commands
        assert_eq!(
            parse_action("exit"),
            Some(UserAction::Guess("exit".to_string()))
        );
    }

    #[test]
    fn test_parse_action_commands() {
        assert_eq!(parse_action(":exit"), Some(UserAction::Exit));
        assert_eq!(parse_action(":QUIT"), Some(UserAction::Exit));
        assert_eq!(parse_action(":next"), Some(UserAction::Restart));
        assert_eq!(
            parse_action(":big"),
            Some(UserAction::Hint(HintKind::Positional))
        );
        assert_eq!(
            parse_action(":small"),
            Some(UserAction::Hint(HintKind::Existential))
        );
        assert_eq!(
            parse_action(":length 7"),
            Some(UserAction::ChangeLength(7))
        );
    }

    #[test]
    fn test_parse_action_invalid() {
        assert_eq!(parse_action(""), None);
        assert_eq!(parse_action("   \n"), None);
        assert_eq!(parse_action(":length"), None);
        assert_eq!(parse_action(":length seven"), None);
        assert_eq!(parse_action(":dance"), None);
    }

    #[test]
    fn test_read_action_end_of_input_exits() {
        let mut interface = CliInterface::new(Cursor::new(""));
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
    }

    #[test]
    fn test_read_action_sequence() {
        let mut interface = CliInterface::new(Cursor::new("apple\n\n:big\n"));
        assert_eq!(
            interface.read_action(),
            Some(UserAction::Guess("apple".to_string()))
        );
        assert_eq!(interface.read_action(), None);
        assert_eq!(
            interface.read_action(),
            Some(UserAction::Hint(HintKind::Positional))
        );
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
    }

    #[test]
    fn test_read_action_recovers_from_invalid_text() {
        let mut interface =
            CliInterface::with_writer(Cursor::new(b"\xff\xfe\napple\n:exit\n"), Vec::new());
        assert_eq!(interface.read_action(), None);
        assert_eq!(
            interface.read_action(),
            Some(UserAction::Guess("apple".to_string()))
        );
        assert_eq!(interface.read_action(), Some(UserAction::Exit));

        let transcript = String::from_utf8(interface.into_writer()).unwrap();
        assert!(transcript.contains("Input must be valid text."));
    }

    #[test]
    fn test_unknown_input_is_reported() {
        let mut interface = CliInterface::with_writer(Cursor::new(":dance\n"), Vec::new());
        assert_eq!(interface.read_action(), None);
        let transcript = String::from_utf8(interface.into_writer()).unwrap();
        assert!(transcript.contains("Unrecognised input."));
    }

    #[test]
    fn test_styled_letter_uppercases() {
        let styled = styled_letter('a', Mark::Exact);
        assert_eq!(styled.content(), " A ");
    }
}
