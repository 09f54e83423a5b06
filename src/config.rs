//! Game balance tuning
//!
//! Runtime-loadable counterpart to the `consts` defaults. Malformed values
//! fail fast at startup; nothing here is recoverable mid-session.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("total_lives must be at least 1")]
    NoLives,
    #[error("level_count must be at least 1")]
    NoLevels,
    #[error("arena and tile dimensions must be positive")]
    NonPositiveDimensions,
    #[error("{cols}x{rows} grid of {tile_width}x{tile_height} tiles does not fit the arena")]
    GridExceedsArena {
        cols: u32,
        rows: u32,
        tile_width: f32,
        tile_height: f32,
    },
    #[error("tile_fill_probability {0} outside (0, 1]")]
    FillProbabilityOutOfRange(f32),
    #[error("acceleration bounds inverted or non-positive: initial {initial}, max {max}")]
    BadAccelerationBounds { initial: f32, max: f32 },
    #[error("acceleration_ramp_factor {0} must exceed 1")]
    BadRampFactor(f32),
    #[error("hit_threshold_ratio must be positive")]
    BadHitThreshold,
    #[error("collision thresholds must be positive")]
    BadCollisionThreshold,
    #[error("paddle_offset_y {0} places the paddle outside the arena")]
    BadPaddleOffset(f32),
}

/// Tunable game balance. Defaults mirror `consts`; a JSON file may override
/// any subset of fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub total_lives: u8,
    pub level_count: u32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub tile_width: f32,
    pub tile_height: f32,
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub tile_fill_probability: f32,
    pub paddle_acceleration: f32,
    pub paddle_offset_y: f32,
    pub ball_acceleration_initial: f32,
    pub ball_acceleration_max: f32,
    pub acceleration_ramp_factor: f32,
    pub hit_threshold_ratio: f32,
    pub collision_threshold: f32,
    pub side_threshold_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            total_lives: consts::TOTAL_LIVES,
            level_count: consts::LEVEL_COUNT,
            arena_width: consts::ARENA_WIDTH,
            arena_height: consts::ARENA_HEIGHT,
            tile_width: consts::TILE_WIDTH,
            tile_height: consts::TILE_HEIGHT,
            grid_cols: consts::GRID_COLS,
            grid_rows: consts::GRID_ROWS,
            tile_fill_probability: consts::TILE_FILL_PROBABILITY,
            paddle_acceleration: consts::PADDLE_ACCELERATION,
            paddle_offset_y: consts::PADDLE_OFFSET_Y,
            ball_acceleration_initial: consts::BALL_ACCELERATION_INITIAL,
            ball_acceleration_max: consts::BALL_ACCELERATION_MAX,
            acceleration_ramp_factor: consts::ACCELERATION_RAMP_FACTOR,
            hit_threshold_ratio: consts::HIT_THRESHOLD_RATIO,
            collision_threshold: consts::COLLISION_THRESHOLD,
            side_threshold_factor: consts::SIDE_THRESHOLD_FACTOR,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file.
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.total_lives == 0 {
            return Err(TuningError::NoLives);
        }
        if self.level_count == 0 {
            return Err(TuningError::NoLevels);
        }
        if self.arena_width <= 0.0
            || self.arena_height <= 0.0
            || self.tile_width <= 0.0
            || self.tile_height <= 0.0
        {
            return Err(TuningError::NonPositiveDimensions);
        }
        if self.grid_cols as f32 * self.tile_width > self.arena_width
            || self.grid_rows as f32 * self.tile_height > self.arena_height
        {
            return Err(TuningError::GridExceedsArena {
                cols: self.grid_cols,
                rows: self.grid_rows,
                tile_width: self.tile_width,
                tile_height: self.tile_height,
            });
        }
        if !(self.tile_fill_probability > 0.0 && self.tile_fill_probability <= 1.0) {
            return Err(TuningError::FillProbabilityOutOfRange(
                self.tile_fill_probability,
            ));
        }
        if self.ball_acceleration_initial <= 0.0
            || self.ball_acceleration_max < self.ball_acceleration_initial
        {
            return Err(TuningError::BadAccelerationBounds {
                initial: self.ball_acceleration_initial,
                max: self.ball_acceleration_max,
            });
        }
        if self.acceleration_ramp_factor <= 1.0 {
            return Err(TuningError::BadRampFactor(self.acceleration_ramp_factor));
        }
        if self.hit_threshold_ratio <= 0.0 {
            return Err(TuningError::BadHitThreshold);
        }
        if self.collision_threshold <= 0.0 || self.side_threshold_factor <= 0.0 {
            return Err(TuningError::BadCollisionThreshold);
        }
        if self.paddle_offset_y <= 0.0 || self.paddle_offset_y >= self.arena_height {
            return Err(TuningError::BadPaddleOffset(self.paddle_offset_y));
        }
        Ok(())
    }
}
