use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::process::ExitCode;
use wordle_game::cli::{CliInterface, parse_cli};
use wordle_game::logging::init_logging;
use wordle_game::tui::TuiInterface;
use wordle_game::wordbank::{self, load_wordbank};
use wordle_game::{GameConfig, GameInterface, game_loop};

fn main() -> ExitCode {
    init_logging();
    let cli = parse_cli();

    let store = match wordbank::shared(|| load_wordbank(cli.wordbank_path.as_deref())) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to load word list: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Word list ready with {} words", store.len());

    let config = match GameConfig::new(cli.length) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut interface: Box<dyn GameInterface> = if cli.tui {
        match TuiInterface::new() {
            Ok(tui) => Box::new(tui),
            Err(e) => {
                eprintln!("Failed to start terminal interface: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Box::new(CliInterface::new(io::stdin().lock()))
    };

    let result = game_loop(&store, config, interface.as_mut(), &mut rng);
    // Restore the terminal before printing anything
    drop(interface);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Cannot start a game: {e}");
            ExitCode::FAILURE
        }
    }
}
