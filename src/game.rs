use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::{bail, Context, Result};
use crossterm::style::Color;
use log::{debug, info};
use rand::Rng;

use crate::{Coords, TermCoords, TermInt};
use crate::config::GameConfig;
use crate::input::{key_action, KeyAction};
use crate::state::{GameState, Outcome, Phase, TickEvent};
use crate::term::TermManager;

const POLL_INTERVAL_MS: u64 = 5;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHARS: (char, char) = ('(', ')');
const DEAD_SNAKE_CHAR: char = 'X';

const FOOD_COLOR: Color = Color::Rgb { r: 255, g: 0, b: 0 };
const DEAD_COLOR: Color = Color::Rgb { r: 200, g: 0, b: 0 };

/// Columns per grid cell, so cells come out roughly square
const CELL_WIDTH: TermInt = 2;

/// Whether the player wants to keep going after the game-over screen.
enum Flow {
    Continue,
    Quit,
}

/// Owns the terminal and the RNG, and drives a `GameState` in real time.
pub struct SnakeGame<R: Rng> {
    term: TermManager,
    state: GameState,
    rng: R,
    paused: bool,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(config: GameConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let mut term = TermManager::new().context("could not read the terminal size")?;
        let (w, h) = term.get_terminal_size();
        let (need_w, need_h) = field_size(&config);
        if w < need_w || h < need_h {
            bail!("terminal is {}x{}, the game needs at least {}x{}", w, h, need_w, need_h);
        }

        term.set_message_center(board_center(&config));

        let state = GameState::new(config, &mut rng);
        Ok(SnakeGame { term, state, rng, paused: false })
    }

    /// Sets up the terminal, plays until the player quits, and always
    /// puts the terminal back the way it was.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup().context("could not set up the terminal")?;

        let res = self.play_rounds();

        self.term.restore().context("could not restore the terminal")?;
        res
    }

    ///////////////////////////////////////////////////////////////////////////

    fn play_rounds(&mut self) -> Result<()> {
        if let Flow::Quit = self.show_intro()? {
            return Ok(());
        }

        self.redraw_all()?;
        let mut last_step = Instant::now();

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                if let Flow::Quit = self.handle_key(key_action(&key_ev))? {
                    info!("quit with score {}", self.state.score());
                    return Ok(());
                }
            }

            if self.paused || self.state.phase() != Phase::Running {
                last_step = Instant::now();
                continue;
            }

            if last_step.elapsed() < self.state.interval() {
                continue;
            }
            last_step = Instant::now();

            match self.state.tick(&mut self.rng) {
                TickEvent::Over(outcome) => self.game_over(outcome)?,
                TickEvent::Ate { score } => {
                    debug!("score {}, interval {:?}", score, self.state.interval());
                    self.draw_field()?;
                }
                TickEvent::Moved => self.draw_field()?,
                TickEvent::Idle => {}
            }
        }
    }

    fn handle_key(&mut self, action: KeyAction) -> Result<Flow> {
        match action {
            KeyAction::Quit => return Ok(Flow::Quit),
            KeyAction::Turn(dir) if !self.paused => self.state.queue_direction(dir),
            KeyAction::TogglePause => self.toggle_pause()?,
            KeyAction::Restart => {
                if self.state.restart(&mut self.rng) {
                    self.redraw_all()?;
                }
            }
            _ => {}
        }

        Ok(Flow::Continue)
    }

    fn show_intro(&mut self) -> Result<Flow> {
        self.term.clear()?;
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin"
        ])?;

        let ev = self.term.read_key_blocking()?;
        if let KeyAction::Quit = key_action(&ev) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    fn game_over(&mut self, outcome: Outcome) -> Result<()> {
        let title = match outcome {
            Outcome::Won => "You won!",
            Outcome::Crashed(_) => "Game over!",
        };

        match outcome {
            Outcome::Won => self.draw_field()?,
            Outcome::Crashed(collision) => {
                debug!("crashed: {:?}", collision);
                let cells: Vec<Coords> = self.state.snake().body().iter().copied().collect();
                for pos in cells {
                    self.put_cell(pos, DEAD_SNAKE_CHAR, DEAD_COLOR)?;
                }
            }
        }

        self.term.show_message(&[
            title,
            &*format!("Final score: {}", self.state.score()),
            "",
            "Press R to restart",
            "or Q to quit."
        ])?;
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if self.state.phase() != Phase::Running {
            return Ok(());
        }

        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Q to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        debug!("paused: {}", self.paused);
        Ok(())
    }

    fn redraw_all(&mut self) -> Result<()> {
        self.term.clear()?;
        self.term.draw_borders(border_size(self.state.config()))?;
        self.draw_field()
    }

    /// Paints every grid cell from the current state. The terminal layer
    /// skips cells that did not change, so this only sends the difference.
    fn draw_field(&mut self) -> Result<()> {
        let (r, g, b) = self.state.color();
        let head_color = Color::Rgb { r, g, b };
        let body_color = Color::Rgb { r: r.saturating_sub(20), g: g.saturating_sub(20), b: b.saturating_sub(20) };
        let head_char = self.state.snake().get_direction().head_char();
        let (w, h) = (self.state.config().grid_width, self.state.config().grid_height);

        // What each cell should show, row by row
        let mut grid = vec![None; w as usize * h as usize];
        let slot = |pos: Coords| pos.1 as usize * w as usize + pos.0 as usize;

        if let Some(food) = self.state.food() {
            grid[slot(food)] = Some((FOOD_CHARS.0, FOOD_CHARS.1, FOOD_COLOR));
        }
        for (i, pos) in self.state.snake().body().iter().enumerate() {
            grid[slot(*pos)] = if i == 0 {
                Some((SNAKE_BODY_CHAR, head_char, head_color))
            } else {
                Some((SNAKE_BODY_CHAR, SNAKE_BODY_CHAR, body_color))
            };
        }

        for y in 0..h {
            for x in 0..w {
                let (left, right, color) = grid[slot((x, y))].unwrap_or((' ', ' ', Color::Reset));
                let (tx, ty) = to_term((x, y));
                self.term.print_at((tx, ty), left, color)?;
                self.term.print_at((tx + 1, ty), right, color)?;
            }
        }

        let (_, border_h) = border_size(self.state.config());
        let score = format!("Score: {:<6}", self.state.score());
        self.term.print_str_at((0, border_h), &score, Color::Reset)?;

        self.term.flush()?;
        Ok(())
    }

    fn put_cell(&mut self, pos: Coords, ch: char, color: Color) -> Result<()> {
        let (x, y) = to_term(pos);
        for dx in 0..CELL_WIDTH {
            self.term.print_at((x + dx, y), ch, color)?;
        }
        Ok(())
    }
}

/// Grid cell to terminal position, inside the border.
fn to_term(pos: Coords) -> TermCoords {
    (1 + pos.0 as TermInt * CELL_WIDTH, 1 + pos.1 as TermInt)
}

fn border_size(config: &GameConfig) -> TermCoords {
    (config.grid_width as TermInt * CELL_WIDTH + 2, config.grid_height as TermInt + 2)
}

/// Middle of the bordered board, where overlays go.
fn board_center(config: &GameConfig) -> TermCoords {
    let (w, h) = border_size(config);
    (w / 2, h / 2)
}

/// Border plus one line for the score.
fn field_size(config: &GameConfig) -> TermCoords {
    let (w, h) = border_size(config);
    (w, h + 1)
}
