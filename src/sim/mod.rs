//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by the session state
//! - Stable iteration order (grid insertion order)
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod grid;
pub mod state;
pub mod status;
pub mod tick;
pub mod tile;

pub use collision::{Impact, Rect, SpriteMask, classify_impact};
pub use grid::{HitOutcome, TileGrid};
pub use state::{Ball, EntityKind, GameEvent, GameState, Paddle, PhysicsBody, Sprite, advance};
pub use status::{GamePhase, GameStatus, InvalidTransitionError};
pub use tick::{Intent, tick};
pub use tile::{Tile, TileColor, TileVariant};
