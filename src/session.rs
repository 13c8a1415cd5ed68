//! A single play-through: secret selection, guess validation, scoring and hints.
//!
//! # State Machine
//! A session starts `InProgress` and moves to `Won` or `Lost` exactly once.
//! Both end states are final; a new game means a new `GameSession`.

use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::scoring::{Mark, score_guess};
use crate::wordbank::WordStore;
use crate::{debug_log, info_log};

pub const MIN_WORD_LENGTH: usize = 3;
pub const MAX_WORD_LENGTH: usize = 10;
pub const DEFAULT_WORD_LENGTH: usize = 5;
pub const MAX_ATTEMPTS: usize = 6;

/// Problems starting a game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("word length must be between 3 and 10, got {0}")]
    UnsupportedLength(usize),
    #[error("no {0}-letter words available")]
    NoCandidates(usize),
    #[error("'{0}' is not a playable word")]
    NotACandidate(String),
}

/// Rejected guesses and hint requests. None of these change the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("Game over! Restart to play again.")]
    GameOver,
    #[error("Please enter a word of correct length ({expected} letters, got {actual}).")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Please enter a valid word ('{0}' is not in the word list).")]
    NotAWord(String),
    #[error("Duplicate guess! You already tried '{0}'.")]
    DuplicateGuess(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    word_length: usize,
    max_attempts: usize,
}

impl GameConfig {
    /// # Errors
    ///
    /// Returns [`GameError::UnsupportedLength`] outside `MIN_WORD_LENGTH..=MAX_WORD_LENGTH`.
    pub fn new(word_length: usize) -> Result<Self, GameError> {
        if !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&word_length) {
            return Err(GameError::UnsupportedLength(word_length));
        }
        Ok(Self {
            word_length,
            max_attempts: MAX_ATTEMPTS,
        })
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            word_length: DEFAULT_WORD_LENGTH,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// An accepted guess and its feedback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessRecord {
    word: String,
    marks: Vec<Mark>,
}

impl GuessRecord {
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.marks.iter().all(|m| *m == Mark::Exact)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintKind {
    /// "Big" hint: a letter together with its position
    Positional,
    /// "Small" hint: a letter without its position
    Existential,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hint {
    /// `position` is 1-based
    Positional { position: usize, letter: char },
    Existential { letter: char },
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional { position, letter } => {
                write!(f, "The letter {letter} is in position {position} of the word.")
            }
            Self::Existential { letter } => write!(f, "The letter {letter} is in the word."),
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    store: Arc<WordStore>,
    secret: String,
    history: Vec<GuessRecord>,
    status: GameStatus,
}

impl GameSession {
    /// Starts a game with a secret drawn uniformly from the words of the configured length.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoCandidates`] if the store has no word of that length;
    /// no random draw happens in that case.
    pub fn new<R: Rng + ?Sized>(
        config: GameConfig,
        store: Arc<WordStore>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let secret = store
            .candidates_of_length(config.word_length)
            .choose(rng)
            .cloned()
            .ok_or(GameError::NoCandidates(config.word_length))?;
        debug_log!("GameSession::new() - secret chosen for length {}", config.word_length);
        Ok(Self::start(config, store, secret))
    }

    /// Starts a game with a known secret.
    ///
    /// # Errors
    ///
    /// The secret must be a word of the configured length in the store.
    pub fn with_secret(
        config: GameConfig,
        store: Arc<WordStore>,
        secret: &str,
    ) -> Result<Self, GameError> {
        let secret = secret.trim().to_lowercase();
        if secret.chars().count() != config.word_length || !store.contains(&secret) {
            return Err(GameError::NotACandidate(secret));
        }
        Ok(Self::start(config, store, secret))
    }

    fn start(config: GameConfig, store: Arc<WordStore>, secret: String) -> Self {
        info_log!(
            "New game: {} letters, {} attempts",
            config.word_length,
            config.max_attempts
        );
        Self {
            config,
            store,
            secret,
            history: Vec::with_capacity(config.max_attempts),
            status: GameStatus::InProgress,
        }
    }

    /// Validates, scores and records a guess.
    ///
    /// Checks run in order: game still running, length, dictionary membership,
    /// not already guessed. The session is only touched once all checks pass.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`GuessError`].
    pub fn submit_guess(&mut self, raw: &str) -> Result<GuessRecord, GuessError> {
        if self.is_over() {
            return Err(GuessError::GameOver);
        }

        let word = raw.trim().to_lowercase();
        let actual = word.chars().count();
        if actual != self.config.word_length {
            return Err(GuessError::InvalidLength {
                expected: self.config.word_length,
                actual,
            });
        }
        if !self.store.contains(&word) {
            return Err(GuessError::NotAWord(word));
        }
        if self.history.iter().any(|r| r.word == word) {
            return Err(GuessError::DuplicateGuess(word));
        }

        let marks = score_guess(&word, &self.secret);
        let record = GuessRecord { word, marks };

        let status = if record.word == self.secret {
            GameStatus::Won
        } else if self.history.len() + 1 >= self.config.max_attempts {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        };

        self.history.push(record.clone());
        self.status = status;
        info_log!(
            "Guess {} of {}: {} -> {:?}",
            self.history.len(),
            self.config.max_attempts,
            record.word,
            self.status
        );
        Ok(record)
    }

    /// Reveals one letter of the secret. Does not count as an attempt.
    ///
    /// # Errors
    ///
    /// Returns [`GuessError::GameOver`] once the game has ended.
    pub fn request_hint<R: Rng + ?Sized>(
        &self,
        kind: HintKind,
        rng: &mut R,
    ) -> Result<Hint, GuessError> {
        if self.is_over() {
            return Err(GuessError::GameOver);
        }
        let letters: Vec<char> = self.secret.chars().collect();
        let index = rng.random_range(0..letters.len());
        let letter = letters[index];
        Ok(match kind {
            HintKind::Positional => Hint::Positional {
                position: index + 1,
                letter,
            },
            HintKind::Existential => Hint::Existential { letter },
        })
    }

    #[must_use]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    #[must_use]
    pub fn attempts_used(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn remaining_attempts(&self) -> usize {
        self.config.max_attempts - self.history.len()
    }

    #[must_use]
    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    /// The secret, available only after the game has ended.
    #[must_use]
    pub fn revealed_secret(&self) -> Option<&str> {
        self.is_over().then_some(self.secret.as_str())
    }
}
