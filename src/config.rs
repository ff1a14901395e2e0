use std::time::Duration;

use anyhow::{bail, Result};

/// Grid size and tuning knobs for a game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Width of the play field, in cells
    pub grid_width: i16,
    /// Height of the play field, in cells
    pub grid_height: i16,
    /// Length of the snake at the start of each round
    pub initial_length: usize,
    /// Points awarded per food eaten
    pub score_per_food: u32,
    /// Steps per second at score 0
    pub initial_fps: u32,
    /// One extra step per second every this many points
    pub fps_step: u32,
    /// The tick interval never drops below this
    pub min_interval: Duration,
    /// The snake switches color every this many points
    pub color_every: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(30, 20)
    }
}

impl GameConfig {
    pub fn new(width: i16, height: i16) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            initial_length: 3,
            score_per_food: 1,
            initial_fps: 10,
            fps_step: 5,
            min_interval: Duration::from_millis(40),
            color_every: 10,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_width < 5 || self.grid_height < 5 {
            bail!("grid must be at least 5x5, got {}x{}", self.grid_width, self.grid_height);
        }
        // The snake starts at the center heading any way, so it must fit
        // in half of the shorter side
        let room = self.grid_width.min(self.grid_height) as usize / 2;
        if self.initial_length == 0 || self.initial_length > room {
            bail!("initial snake length {} does not fit a {}x{} grid",
                  self.initial_length, self.grid_width, self.grid_height);
        }
        if self.initial_fps == 0 || self.fps_step == 0 || self.color_every == 0 {
            bail!("initial_fps, fps_step and color_every must be positive");
        }
        if self.min_interval.is_zero() {
            bail!("min_interval must be positive");
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Tick interval for a given score. Never increases with score.
    pub fn interval_for(&self, score: u32) -> Duration {
        let fps = self.initial_fps + score / self.fps_step;
        Duration::from_millis(1000 / fps as u64).max(self.min_interval)
    }

    /// Index into the snake palette for a given score.
    pub fn color_for(&self, score: u32, palette_len: usize) -> usize {
        (score / self.color_every) as usize % palette_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_length, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_tiny_grid() {
        assert!(GameConfig::new(4, 10).validate().is_err());
        assert!(GameConfig::new(10, 4).validate().is_err());
        assert!(GameConfig::new(5, 5).validate().is_err()); // length 3 > 5 / 2
        let config = GameConfig { initial_length: 2, ..GameConfig::new(5, 5) };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_initial_length_must_fit_the_short_side() {
        let config = GameConfig { initial_length: 15, ..GameConfig::new(30, 5) };
        assert!(config.validate().is_err());
        let config = GameConfig { initial_length: 15, ..GameConfig::new(5, 30) };
        assert!(config.validate().is_err());
        let config = GameConfig { initial_length: 2, ..GameConfig::new(30, 5) };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_knobs() {
        let config = GameConfig { fps_step: 0, ..Default::default() };
        assert!(config.validate().is_err());
        let config = GameConfig { min_interval: Duration::ZERO, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_interval_is_non_increasing_and_floored() {
        let config = GameConfig::default();
        assert_eq!(config.interval_for(0), Duration::from_millis(100));
        assert_eq!(config.interval_for(4), Duration::from_millis(100));
        assert_eq!(config.interval_for(5), Duration::from_millis(90));

        let mut last = config.interval_for(0);
        for score in 1..2000 {
            let interval = config.interval_for(score);
            assert!(interval <= last);
            assert!(interval >= config.min_interval);
            last = interval;
        }
        assert_eq!(last, config.min_interval);
    }

    #[test]
    fn test_color_cycles_every_n_points() {
        let config = GameConfig::default();
        assert_eq!(config.color_for(0, 8), 0);
        assert_eq!(config.color_for(9, 8), 0);
        assert_eq!(config.color_for(10, 8), 1);
        assert_eq!(config.color_for(79, 8), 7);
        assert_eq!(config.color_for(80, 8), 0);
    }
}
