mod config;
mod game;
mod input;
mod snake;
mod state;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use log::info;

pub type TermInt = u16;
pub type TermCoords = (u16, u16);

/// A cell on the play field. Signed so a step past the left or top wall
/// is representable.
pub type Coords = (i16, i16);

const LOG_FILE: &str = "snake.log";

/// The terminal is the game surface, so logs only go to a file, and only
/// when RUST_LOG asks for them.
fn init_logging() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let file = File::create(LOG_FILE).with_context(|| format!("could not create {}", LOG_FILE))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let config = config::GameConfig::default();
    info!("starting on a {}x{} grid", config.grid_width, config.grid_height);

    let mut game = game::SnakeGame::new(config, rand::thread_rng())?;
    game.run()
}
