use crate::info_log;
use crate::session::{GameConfig, GameError, GameSession, GameStatus, GuessRecord, Hint, HintKind};
use crate::wordbank::WordStore;
use rand::Rng;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Hint(HintKind),
    /// New secret, same length
    Restart,
    ChangeLength(usize),
    Exit,
}

/// What the player sees after each accepted guess.
#[derive(Debug, Clone)]
pub struct GuessReport {
    pub record: GuessRecord,
    pub attempt: usize,
    pub remaining: usize,
}

/// The interaction surface the game loop talks to.
///
/// Implemented by the line-based CLI and the terminal UI; tests provide scripted ones.
pub trait GameInterface {
    fn display_instructions(&mut self, config: &GameConfig);
    /// `None` means the input was unusable and the loop should ask again.
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_guess(&mut self, report: &GuessReport);
    fn display_hint(&mut self, hint: &Hint);
    fn display_error(&mut self, message: &str);
    fn display_won(&mut self, secret: &str, attempts: usize);
    fn display_lost(&mut self, secret: &str);
    fn display_new_game(&mut self, config: &GameConfig);
    fn display_exit_message(&mut self);
}

/// Runs games until the player exits.
///
/// Restarting or changing the length always builds a fresh session with a
/// new secret. A length change that cannot start a game is reported and the
/// current session carries on.
///
/// # Errors
///
/// Fails only if the very first game cannot start.
pub fn game_loop<I, R>(
    store: &Arc<WordStore>,
    config: GameConfig,
    interface: &mut I,
    rng: &mut R,
) -> Result<(), GameError>
where
    I: GameInterface + ?Sized,
    R: Rng + ?Sized,
{
    let mut session = GameSession::new(config, Arc::clone(store), rng)?;
    interface.display_instructions(&session.config());

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };
        info_log!("game_loop() - action: {:?}", action);

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::Guess(guess) => handle_guess(&mut session, &guess, interface),
            UserAction::Hint(kind) => match session.request_hint(kind, rng) {
                Ok(hint) => interface.display_hint(&hint),
                Err(e) => interface.display_error(&e.to_string()),
            },
            UserAction::Restart => {
                if let Some(next) = start_session(session.config(), store, interface, rng) {
                    session = next;
                }
            }
            UserAction::ChangeLength(length) => match GameConfig::new(length) {
                Ok(config) => {
                    if let Some(next) = start_session(config, store, interface, rng) {
                        session = next;
                    }
                }
                Err(e) => interface.display_error(&e.to_string()),
            },
        }
    }

    Ok(())
}

#[must_use]
pub fn attempt_noun(count: usize) -> &'static str {
    if count == 1 { "attempt" } else { "attempts" }
}

fn start_session<I, R>(
    config: GameConfig,
    store: &Arc<WordStore>,
    interface: &mut I,
    rng: &mut R,
) -> Option<GameSession>
where
    I: GameInterface + ?Sized,
    R: Rng + ?Sized,
{
    match GameSession::new(config, Arc::clone(store), rng) {
        Ok(session) => {
            interface.display_new_game(&config);
            interface.display_instructions(&config);
            Some(session)
        }
        Err(e) => {
            interface.display_error(&e.to_string());
            None
        }
    }
}

fn handle_guess<I>(session: &mut GameSession, guess: &str, interface: &mut I)
where
    I: GameInterface + ?Sized,
{
    let record = match session.submit_guess(guess) {
        Ok(record) => record,
        Err(e) => {
            interface.display_error(&e.to_string());
            return;
        }
    };

    interface.display_guess(&GuessReport {
        record,
        attempt: session.attempts_used(),
        remaining: session.remaining_attempts(),
    });

    if let Some(secret) = session.revealed_secret() {
        match session.status() {
            GameStatus::Won => interface.display_won(secret, session.attempts_used()),
            GameStatus::Lost => interface.display_lost(secret),
            GameStatus::InProgress => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    /// Replays scripted actions and records what would have been shown.
    struct Scripted {
        actions: VecDeque<Option<UserAction>>,
        events: Vec<String>,
    }

    impl Scripted {
        fn new(actions: Vec<Option<UserAction>>) -> Self {
            Self {
                actions: actions.into(),
                events: Vec::new(),
            }
        }

        fn count(&self, prefix: &str) -> usize {
            self.events.iter().filter(|e| e.starts_with(prefix)).count()
        }
    }

    impl GameInterface for Scripted {
        fn display_instructions(&mut self, config: &GameConfig) {
            self.events.push(format!("instructions {}", config.word_length()));
        }

        fn read_action(&mut self) -> Option<UserAction> {
            self.actions.pop_front().unwrap_or(Some(UserAction::Exit))
        }

        fn display_guess(&mut self, report: &GuessReport) {
            self.events
                .push(format!("guess {} {}", report.record.word(), report.remaining));
        }

        fn display_hint(&mut self, hint: &Hint) {
            self.events.push(format!("hint {hint}"));
        }

        fn display_error(&mut self, message: &str) {
            self.events.push(format!("error {message}"));
        }

        fn display_won(&mut self, secret: &str, attempts: usize) {
            self.events.push(format!("won {secret} {attempts}"));
        }

        fn display_lost(&mut self, secret: &str) {
            self.events.push(format!("lost {secret}"));
        }

        fn display_new_game(&mut self, config: &GameConfig) {
            self.events.push(format!("new {}", config.word_length()));
        }

        fn display_exit_message(&mut self) {
            self.events.push("exit".to_string());
        }
    }

    fn single_word_store() -> Arc<WordStore> {
        Arc::new("cat\napple\nbanana".parse().unwrap())
    }

    fn guess(word: &str) -> Option<UserAction> {
        Some(UserAction::Guess(word.to_string()))
    }

    #[test]
    fn test_game_loop_immediate_exit() {
        let mut ui = Scripted::new(vec![Some(UserAction::Exit)]);
        let mut rng = StdRng::seed_from_u64(0);
        game_loop(&single_word_store(), GameConfig::default(), &mut ui, &mut rng).unwrap();
        assert_eq!(ui.events, ["instructions 5", "exit"]);
    }

    #[test]
    fn test_game_loop_win() {
        let mut ui = Scripted::new(vec![None, guess("APPLE"), Some(UserAction::Exit)]);
        let mut rng = StdRng::seed_from_u64(0);
        game_loop(&single_word_store(), GameConfig::default(), &mut ui, &mut rng).unwrap();
        assert_eq!(
            ui.events,
            ["instructions 5", "guess apple 5", "won apple 1", "exit"]
        );
    }

    #[test]
    fn test_game_loop_reports_errors_and_game_over() {
        let mut ui = Scripted::new(vec![
            guess("cat"),
            guess("zzzzz"),
            guess("apple"),
            guess("apple"),
            Some(UserAction::Hint(HintKind::Positional)),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        game_loop(&single_word_store(), GameConfig::default(), &mut ui, &mut rng).unwrap();
        assert_eq!(ui.count("error"), 4);
        assert_eq!(ui.count("won"), 1);
        assert!(ui.events.contains(&"error Game over! Restart to play again.".to_string()));
    }

    #[test]
    fn test_game_loop_hint_does_not_use_attempt() {
        let mut ui = Scripted::new(vec![
            Some(UserAction::Hint(HintKind::Existential)),
            Some(UserAction::Hint(HintKind::Positional)),
            guess("apple"),
        ]);
        let mut rng = StdRng::seed_from_u64(9);
        game_loop(&single_word_store(), GameConfig::default(), &mut ui, &mut rng).unwrap();
        assert_eq!(ui.count("hint"), 2);
        assert!(ui.events.contains(&"guess apple 5".to_string()));
    }

    #[test]
    fn test_game_loop_change_length_starts_new_game() {
        let mut ui = Scripted::new(vec![
            Some(UserAction::ChangeLength(3)),
            guess("apple"),
            guess("cat"),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        game_loop(&single_word_store(), GameConfig::default(), &mut ui, &mut rng).unwrap();
        assert_eq!(
            ui.events,
            [
                "instructions 5",
                "new 3",
                "instructions 3",
                "error Please enter a word of correct length (3 letters, got 5).",
                "guess cat 5",
                "won cat 1",
                "exit",
            ]
        );
    }

    #[test]
    fn test_game_loop_bad_length_keeps_current_game() {
        let mut ui = Scripted::new(vec![
            Some(UserAction::ChangeLength(4)),
            Some(UserAction::ChangeLength(12)),
            guess("apple"),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        game_loop(&single_word_store(), GameConfig::default(), &mut ui, &mut rng).unwrap();
        assert_eq!(ui.count("new"), 0);
        assert!(ui.events.contains(&"error no 4-letter words available".to_string()));
        assert!(
            ui.events
                .contains(&"error word length must be between 3 and 10, got 12".to_string())
        );
        assert!(ui.events.contains(&"won apple 1".to_string()));
    }

    #[test]
    fn test_game_loop_restart_after_win() {
        let mut ui = Scripted::new(vec![
            guess("apple"),
            Some(UserAction::Restart),
            guess("apple"),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        game_loop(&single_word_store(), GameConfig::default(), &mut ui, &mut rng).unwrap();
        // Same word is accepted again: the restart cleared the history
        assert_eq!(ui.count("won apple 1"), 2);
        assert_eq!(ui.count("new 5"), 1);
    }

    #[test]
    fn test_game_loop_loss_reveals_secret() {
        let store: Arc<WordStore> =
            Arc::new("aaa\nbbb\nccc\nddd\neee\nfff\nggg".parse().unwrap());
        let config = GameConfig::new(3).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        // Find out which word this seed picks so the script can avoid it
        let secret = {
            let mut probe = StdRng::seed_from_u64(5);
            let mut session = GameSession::new(config, Arc::clone(&store), &mut probe).unwrap();
            for word in store.words() {
                if session.submit_guess(word).is_ok_and(|r| r.is_solved()) {
                    break;
                }
            }
            session.revealed_secret().unwrap().to_string()
        };
        let script = store
            .words()
            .iter()
            .filter(|w| **w != secret)
            .map(|w| guess(w.as_str()))
            .collect();
        let mut ui = Scripted::new(script);
        game_loop(&store, config, &mut ui, &mut rng).unwrap();
        assert_eq!(ui.count("guess"), 6);
        assert_eq!(ui.events.iter().filter(|e| **e == format!("lost {secret}")).count(), 1);
    }

    #[test]
    fn test_game_loop_no_candidates_at_start() {
        let mut ui = Scripted::new(vec![]);
        let mut rng = StdRng::seed_from_u64(0);
        let result = game_loop(
            &single_word_store(),
            GameConfig::new(4).unwrap(),
            &mut ui,
            &mut rng,
        );
        assert_eq!(result, Err(GameError::NoCandidates(4)));
        assert!(ui.events.is_empty());
    }
}
