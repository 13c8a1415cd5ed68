//! TUI (Terminal User Interface) module for the Wordle game
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # State Machine
//! The UI is either `EnteringGuess` or `GameOver`. A win or loss moves it to
//! `GameOver`; a new game (restart or length change) moves it back.

use crate::game_state::{GameInterface, GuessReport, UserAction, attempt_noun};
use crate::scoring::Mark;
use crate::session::{GameConfig, Hint, HintKind, MAX_ATTEMPTS};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;
const MAX_HINTS_DISPLAY: usize = 5;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const LOSS_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

/// (background, foreground) for a scored tile
fn mark_colors(mark: Mark) -> (Color, Color) {
    match mark {
        Mark::Exact => (Color::Green, Color::Black),
        Mark::Present => (Color::Yellow, Color::Black),
        Mark::Absent => (Color::Gray, Color::White),
    }
}

/// Appends `letter` in lowercase unless that would overflow the row.
///
/// Letters whose lowercase form is more than one character are rejected.
fn push_letter(input: &mut String, letter: char, word_length: usize) -> bool {
    let mut lower = letter.to_lowercase();
    let (Some(lower), None) = (lower.next(), lower.next()) else {
        return false;
    };
    if input.chars().count() >= word_length {
        return false;
    }
    input.push(lower);
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    EnteringGuess,
    /// Won or lost - banner stored in `outcome`
    GameOver,
}

#[derive(Debug, Clone)]
enum Outcome {
    Won(String),
    Lost(String),
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    rows: &'a [GuessReport],
    current_input: &'a str,
    state: TuiState,
    word_length: usize,
    max_attempts: usize,
    hints: &'a [String],
    outcome: Option<&'a Outcome>,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    rows: Vec<GuessReport>,
    current_input: String,
    state: TuiState,
    word_length: usize,
    max_attempts: usize,
    hints: Vec<String>,
    outcome: Option<Outcome>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    /// # Errors
    ///
    /// Fails if the terminal cannot be switched to raw mode or the alternate screen.
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        let config = GameConfig::default();
        Ok(Self {
            terminal,
            rows: Vec::new(),
            current_input: String::new(),
            state: TuiState::EnteringGuess,
            word_length: config.word_length(),
            max_attempts: config.max_attempts(),
            hints: Vec::new(),
            outcome: None,
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    /// # Errors
    ///
    /// Fails if the terminal cannot be restored.
    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            rows: &self.rows,
            current_input: &self.current_input,
            state: self.state,
            word_length: self.word_length,
            max_attempts: self.max_attempts,
            hints: &self.hints,
            outcome: self.outcome.as_ref(),
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn refresh_status(&mut self) {
        let remaining = self.max_attempts.saturating_sub(self.rows.len());
        self.status = format!(
            "{}-letter word | Attempts left: {remaining} of {}",
            self.word_length, self.max_attempts
        );
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let board_height = u16::try_from(MAX_ATTEMPTS).unwrap_or(6) * ROW_SPACING + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),            // Title
                Constraint::Length(board_height), // Game board
                Constraint::Min(6),               // Info panel
                Constraint::Length(3),            // Status line
                Constraint::Length(3),            // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx);
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("WORDLE")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default().title("Guesses").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        for (row_index, report) in ctx.rows.iter().enumerate() {
            let spans = report
                .record
                .word()
                .chars()
                .zip(report.record.marks())
                .map(|(letter, mark)| {
                    let (bg, fg) = mark_colors(*mark);
                    Self::tile(letter, Style::default().fg(fg).bg(bg))
                });
            Self::render_line(f, inner, row_index, spans);
        }

        // Remaining rows: the live input first, then blanks
        let input_style = Style::default().fg(Color::White).bg(Color::DarkGray);
        for row_index in ctx.rows.len()..ctx.max_attempts {
            let is_input_row =
                row_index == ctx.rows.len() && ctx.state == TuiState::EnteringGuess;
            let spans = (0..ctx.word_length).map(|i| {
                let letter = if is_input_row {
                    ctx.current_input.chars().nth(i).unwrap_or(' ')
                } else {
                    ' '
                };
                Self::tile(letter, input_style)
            });
            Self::render_line(f, inner, row_index, spans);
        }
    }

    fn tile(letter: char, style: Style) -> [Span<'static>; 2] {
        [
            Span::styled(format!(" {} ", letter.to_ascii_uppercase()), style),
            Span::raw(" "),
        ]
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_line<I>(f: &mut Frame, area: Rect, row_index: usize, tiles: I)
    where
        I: Iterator<Item = [Span<'static>; 2]>,
    {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }
        let mut spans = vec![Span::raw("  ")];
        spans.extend(tiles.flatten());
        f.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();

        match ctx.outcome {
            Some(Outcome::Won(banner)) => {
                lines.push(Line::from(Span::styled(banner.clone(), SUCCESS_STYLE)));
                lines.push(Line::from(""));
            }
            Some(Outcome::Lost(banner)) => {
                lines.push(Line::from(Span::styled(banner.clone(), LOSS_STYLE)));
                lines.push(Line::from(""));
            }
            None => {}
        }

        if !ctx.hints.is_empty() {
            lines.push(Line::from(Span::styled("Hints:", INFO_STYLE)));
            let skip = ctx.hints.len().saturating_sub(MAX_HINTS_DISPLAY);
            for hint in ctx.hints.iter().skip(skip) {
                lines.push(Line::from(format!("  {hint}")));
            }
            lines.push(Line::from(""));
        }

        if !ctx.message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.message, MESSAGE_STYLE)));
        }

        if !ctx.error_message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.error_message, ERROR_STYLE)));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::EnteringGuess => {
                "ENTER: Submit | F2: Big hint | F3: Small hint | F5: Restart | UP/DOWN: Length | ESC: Quit"
            }
            TuiState::GameOver => "N/F5: New Game | UP/DOWN: Change length | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            // Only process Press events, ignore Release and Repeat to avoid double input
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(self.handle_key(key)),
            other => {
                debug_log!("handle_input() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }

    /// Keys shared by every state; `None` means the key was not one of them.
    fn handle_global_key(&self, key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Esc => Some(UserAction::Exit),
            KeyCode::F(2) => Some(UserAction::Hint(HintKind::Positional)),
            KeyCode::F(3) => Some(UserAction::Hint(HintKind::Existential)),
            KeyCode::F(5) => Some(UserAction::Restart),
            KeyCode::Up => Some(UserAction::ChangeLength(self.word_length + 1)),
            KeyCode::Down => Some(UserAction::ChangeLength(
                self.word_length.saturating_sub(1),
            )),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        if let Some(action) = self.handle_global_key(key) {
            info_log!("handle_key() - {:?}", action);
            return Some(action);
        }
        match self.state {
            TuiState::EnteringGuess => self.handle_guess_input(key),
            TuiState::GameOver => Self::handle_game_over_input(key),
        }
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();

        match key.code {
            KeyCode::Char(c)
                if c.is_alphabetic() && self.current_input.chars().count() < self.word_length =>
            {
                if Self::has_modifier_keys(&key) {
                    debug_log!(
                        "handle_guess_input() - Ignoring character with modifier: {:?}",
                        key.modifiers
                    );
                } else if !push_letter(&mut self.current_input, c, self.word_length) {
                    self.error_message = format!("'{c}' cannot be used in a guess");
                }
            }
            KeyCode::Char(c) if !c.is_alphabetic() => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
            }
            KeyCode::Backspace => {
                self.current_input.pop();
            }
            KeyCode::Enter if !self.current_input.is_empty() => {
                return Some(UserAction::Guess(self.current_input.clone()));
            }
            _ => {
                debug_log!("handle_guess_input() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') => Some(UserAction::Restart),
            _ => None,
        }
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }
}

impl GameInterface for TuiInterface {
    fn display_instructions(&mut self, config: &GameConfig) {
        self.word_length = config.word_length();
        self.max_attempts = config.max_attempts();
        self.message = format!(
            "Let's play {}-letter Wordle! You have {} attempts.",
            self.word_length, self.max_attempts
        );
        self.refresh_status();
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.handle_input() {
                Ok(Some(action)) => return Some(action),
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Input error: {}", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_guess(&mut self, report: &GuessReport) {
        self.rows.push(report.clone());
        self.current_input.clear();
        self.error_message.clear();
        self.refresh_status();
        self.draw_or_log();
    }

    fn display_hint(&mut self, hint: &Hint) {
        self.hints.push(hint.to_string());
        self.draw_or_log();
    }

    fn display_error(&mut self, message: &str) {
        self.error_message = message.to_string();
        self.draw_or_log();
    }

    fn display_won(&mut self, secret: &str, attempts: usize) {
        self.state = TuiState::GameOver;
        self.outcome = Some(Outcome::Won(format!(
            "Congratulations, you've guessed the word '{}' in {attempts} {}!",
            secret.to_uppercase(),
            attempt_noun(attempts)
        )));
        self.status = "Game Over - You won".to_string();
        self.draw_or_log();
    }

    fn display_lost(&mut self, secret: &str) {
        self.state = TuiState::GameOver;
        self.outcome = Some(Outcome::Lost(format!(
            "Game Over! The word was '{}'. Restart to play again.",
            secret.to_uppercase()
        )));
        self.status = "Game Over - Out of attempts".to_string();
        self.draw_or_log();
    }

    fn display_new_game(&mut self, config: &GameConfig) {
        self.rows.clear();
        self.current_input.clear();
        self.hints.clear();
        self.outcome = None;
        self.error_message.clear();
        self.state = TuiState::EnteringGuess;
        self.word_length = config.word_length();
        self.max_attempts = config.max_attempts();
        self.refresh_status();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_letter_lowercases() {
        let mut input = String::new();
        assert!(push_letter(&mut input, 'C', 3));
        assert!(push_letter(&mut input, 'a', 3));
        assert_eq!(input, "ca");
    }

    #[test]
    fn test_push_letter_stops_at_word_length() {
        let mut input = "cat".to_string();
        assert!(!push_letter(&mut input, 's', 3));
        assert_eq!(input, "cat");
    }

    #[test]
    fn test_push_letter_rejects_multi_char_lowercase() {
        // 'İ' lowercases to 'i' plus a combining dot
        let mut input = "ca".to_string();
        assert!(!push_letter(&mut input, 'İ', 3));
        assert_eq!(input, "ca");
        assert_eq!(input.chars().count(), 2);
    }
}
