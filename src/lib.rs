// Library interface for wordle-game
// This allows integration tests to access internal modules

pub mod cli;
pub mod game_state;
pub mod logging;
pub mod scoring;
pub mod session;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use game_state::{GameInterface, GuessReport, UserAction, game_loop};
pub use scoring::{Mark, render_tiles, score_guess};
pub use session::{
    GameConfig, GameError, GameSession, GameStatus, GuessError, GuessRecord, Hint, HintKind,
};
pub use wordbank::{LoadError, WordStore};
