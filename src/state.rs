use std::time::Duration;

use log::{debug, info};
use rand::{seq::SliceRandom, Rng};

use crate::config::GameConfig;
use crate::snake::{Direction, Snake};
use crate::Coords;

/// Colors the snake cycles through as the score grows
pub const SNAKE_COLORS: [(u8, u8, u8); 8] = [
    (0, 255, 0),     // green
    (0, 200, 255),   // light blue
    (255, 255, 0),   // yellow
    (255, 0, 255),   // magenta
    (0, 255, 255),   // cyan
    (255, 165, 0),   // orange
    (138, 43, 226),  // blue violet
    (255, 105, 180), // hot pink
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Crashed(Collision),
    /// The snake fills the whole grid
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver(Outcome),
}

/// What a single tick did, so the caller knows what to redraw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing happened, the game is over
    Idle,
    /// One step forward, no food
    Moved,
    Ate { score: u32 },
    Over(Outcome),
}

/// Everything that changes while playing. One round lives from `new` or
/// `restart` until a collision.
#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    snake: Snake,
    food: Option<Coords>,
    score: u32,
    interval: Duration,
    color: usize,
    phase: Phase,
    queued: Option<Direction>,
}

impl GameState {
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        let center = (config.grid_width / 2, config.grid_height / 2);
        let direction = *Direction::ALL.choose(rng).unwrap_or(&Direction::Right);
        let snake = Snake::new(center, config.initial_length, direction);

        let mut state = GameState {
            interval: config.interval_for(0),
            config,
            snake,
            food: None,
            score: 0,
            color: 0,
            phase: Phase::Running,
            queued: None,
        };
        state.food = state.spawn_food(rng);
        state
    }

    /// Remembers the latest requested turn. Applied on the next tick.
    pub fn queue_direction(&mut self, direction: Direction) {
        if self.phase == Phase::Running {
            self.queued = Some(direction);
        }
    }

    /// Advances the game by one step.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickEvent {
        if self.phase != Phase::Running {
            return TickEvent::Idle;
        }

        if let Some(direction) = self.queued.take() {
            if !self.snake.set_direction(direction) {
                debug!("ignoring reversal to {:?}", direction);
            }
        }

        let new_head = self.snake.next_head();

        if !self.in_bounds(new_head) {
            return self.end(Outcome::Crashed(Collision::Wall));
        }
        if self.snake.bites_itself(new_head) {
            return self.end(Outcome::Crashed(Collision::SelfCollision));
        }

        let ate = self.food == Some(new_head);
        self.snake.advance(new_head, ate);

        if !ate {
            return TickEvent::Moved;
        }

        self.score += self.config.score_per_food;

        let interval = self.config.interval_for(self.score);
        if interval != self.interval {
            debug!("speeding up: {:?} -> {:?}", self.interval, interval);
            self.interval = interval;
        }
        self.color = self.config.color_for(self.score, SNAKE_COLORS.len());

        if self.snake.len() == self.config.cell_count() {
            self.food = None;
            return self.end(Outcome::Won);
        }
        self.food = self.spawn_food(rng);

        debug!("ate food at {:?}, score {}", new_head, self.score);
        TickEvent::Ate { score: self.score }
    }

    /// Starts a new round. Only valid once the current one is over.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase == Phase::Running {
            return false;
        }

        *self = GameState::new(self.config.clone(), rng);
        info!("restarted");
        true
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn color(&self) -> (u8, u8, u8) {
        SNAKE_COLORS[self.color]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn in_bounds(&self, pos: Coords) -> bool {
        pos.0 >= 0 && pos.0 < self.config.grid_width && pos.1 >= 0 && pos.1 < self.config.grid_height
    }

    ///////////////////////////////////////////////////////////////////////////

    fn end(&mut self, outcome: Outcome) -> TickEvent {
        info!("game over: {:?}, score {}", outcome, self.score);
        self.phase = Phase::GameOver(outcome);
        self.queued = None;
        TickEvent::Over(outcome)
    }

    fn spawn_food<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coords> {
        let (w, h) = (self.config.grid_width, self.config.grid_height);
        let choices: Vec<Coords> = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|pos| !self.snake.contains(*pos))
            .collect();

        choices.choose(rng).copied()
    }

    #[cfg(test)]
    pub(crate) fn with_snake(config: GameConfig, snake: Snake, food: Option<Coords>) -> Self {
        GameState {
            interval: config.interval_for(0),
            config,
            snake,
            food,
            score: 0,
            color: 0,
            phase: Phase::Running,
            queued: None,
        }
    }
}
