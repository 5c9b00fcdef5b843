//! Hot-seat UNO at the terminal.
//!
//! Players share one keyboard and take turns typing commands; the engine
//! validates every move and the session prints what happened.

mod commands;
mod config;
mod session;

use std::io;

use anyhow::{Context, Error};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use uno::GameBuilder;

use config::CliConfig;
use session::Session;

const HELP: &str = "\
Play a hot-seat game of UNO in the terminal

USAGE:
  uno_cli [OPTIONS]

OPTIONS:
  --players    NAMES       Comma-separated player names   [default: env UNO_PLAYERS or \"Player 1,Player 2\"]
  --hand-size  N           Cards dealt to each player      [default: env UNO_HAND_SIZE or 7]
  --seed       N           Shuffle seed for a repeatable game  [default: env UNO_SEED or random]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  UNO_PLAYERS              Comma-separated player names
  UNO_HAND_SIZE            Cards dealt to each player
  UNO_SEED                 Shuffle seed
  RUST_LOG                 Log filter (e.g., info, uno=debug)
  (A .env file in the working directory is loaded first)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let players: Option<String> = pargs.opt_value_from_str("--players")?;
    let hand_size: Option<usize> = pargs.opt_value_from_str("--hand-size")?;
    let seed: Option<u64> = pargs.opt_value_from_str("--seed")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();

    let config = CliConfig::from_env(players, hand_size, seed)?;
    config.validate()?;
    info!(
        "Dealing {} cards to {} players (seed: {:?})",
        config.hand_size,
        config.players.len(),
        config.seed
    );

    let game = GameBuilder::new()
        .with_players(config.players.iter().cloned())
        .with_settings(config.game_settings())
        .build()
        .context("Failed to deal the game")?;

    let mut session = Session::new(game);
    session.run(io::stdin().lock(), io::stdout().lock())?;
    if let Some(winner) = session.game().winner() {
        info!("Session over, {} won", winner.name);
    }
    Ok(())
}
