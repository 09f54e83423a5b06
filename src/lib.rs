//! Kanoid - a paddle-and-ball brick-breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (game status machine, physics, collisions, tile grid)
//! - `platform`: Renderer/audio/asset traits the core talks to, plus a procedural asset source
//! - `config`: Runtime-validated game balance tuning

pub mod config;
pub mod platform;
pub mod sim;

pub use config::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo loop (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Play area dimensions in pixels
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 704.0;

    /// Tile footprint in pixels
    pub const TILE_WIDTH: f32 = 64.0;
    pub const TILE_HEIGHT: f32 = 32.0;

    /// Brick grid dimensions (cells)
    pub const GRID_COLS: u32 = 20;
    pub const GRID_ROWS: u32 = 12;

    /// Probability that a cell receives a tile during random generation
    pub const TILE_FILL_PROBABILITY: f32 = 0.65;

    /// Lives granted on game start
    pub const TOTAL_LIVES: u8 = 3;
    /// Levels to clear before the game is won
    pub const LEVEL_COUNT: u32 = 1;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 104.0;
    pub const PADDLE_HEIGHT: f32 = 24.0;
    /// Distance from the arena floor to the paddle top
    pub const PADDLE_OFFSET_Y: f32 = 100.0;
    /// Paddle displacement scale (pixels/sec at full input)
    pub const PADDLE_ACCELERATION: f32 = 600.0;

    /// Ball defaults
    pub const BALL_WIDTH: f32 = 22.0;
    pub const BALL_HEIGHT: f32 = 22.0;
    /// Ball displacement scale at launch (pixels/sec)
    pub const BALL_ACCELERATION_INITIAL: f32 = 180.0;
    /// Ball displacement scale ceiling
    pub const BALL_ACCELERATION_MAX: f32 = 900.0;
    /// Multiplier applied to ball acceleration on each speed ramp
    pub const ACCELERATION_RAMP_FACTOR: f32 = 1.15;
    /// Paddle returns needed for the next ramp, per unit of current acceleration
    pub const HIT_THRESHOLD_RATIO: f32 = 0.04;

    /// Edge-proximity tolerance for collision side classification (pixels)
    pub const COLLISION_THRESHOLD: f32 = 5.0;
    /// Horizontal tolerance widening for paddle side hits
    pub const SIDE_THRESHOLD_FACTOR: f32 = 1.5;
}
