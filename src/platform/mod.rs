//! Collaborator interfaces the simulation core talks to
//!
//! Rendering, audio, and asset decoding live outside the core; these traits
//! are the whole surface the core needs from them. All calls are
//! fire-and-forget: the simulation never waits on a collaborator.

use glam::Vec2;

use crate::sim::{GameEvent, GameState, Sprite, SpriteMask, TileColor, TileVariant};

/// Background fill color, linear RGB bytes.
pub type Color = [u8; 3];

/// Logical sprites the core asks to have drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Paddle,
    Ball,
    Tile(TileColor, TileVariant),
}

pub trait Renderer {
    fn fill_background(&mut self, color: Color);
    fn draw_sprite(&mut self, sprite: SpriteId, position: Vec2);
}

/// One-shot sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundId {
    LifeLost,
}

/// Music tracks keyed to phases of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackId {
    Theme,
    GameStart,
    GameOver,
    GameWon,
}

pub trait AudioPlayer {
    fn play_one_shot(&mut self, sound: SoundId);
    fn play_music(&mut self, track: TrackId, looped: bool);
}

/// Logical asset names the core resolves to footprints and collision masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetId {
    Paddle,
    Ball,
}

pub trait AssetProvider {
    /// Footprint and per-pixel opacity for a logical asset. The core never
    /// sees pixel color data.
    fn sprite(&self, asset: AssetId) -> Sprite;
}

/// Built-in asset source with procedurally generated masks: a rounded-corner
/// paddle and a round ball, matching the transparent corners of typical
/// sprite art. Used by the demo binary and tests; a real frontend substitutes
/// decoded image alpha via `SpriteMask::from_alpha`.
#[derive(Debug, Clone)]
pub struct ProceduralAssets {
    paddle_size: Vec2,
    ball_size: Vec2,
}

impl ProceduralAssets {
    pub fn new(paddle_size: Vec2, ball_size: Vec2) -> Self {
        Self {
            paddle_size,
            ball_size,
        }
    }
}

impl Default for ProceduralAssets {
    fn default() -> Self {
        Self::new(
            Vec2::new(crate::consts::PADDLE_WIDTH, crate::consts::PADDLE_HEIGHT),
            Vec2::new(crate::consts::BALL_WIDTH, crate::consts::BALL_HEIGHT),
        )
    }
}

impl AssetProvider for ProceduralAssets {
    fn sprite(&self, asset: AssetId) -> Sprite {
        match asset {
            AssetId::Paddle => Sprite {
                size: self.paddle_size,
                mask: SpriteMask::rounded_rect(
                    self.paddle_size.x as u32,
                    self.paddle_size.y as u32,
                    self.paddle_size.y / 3.0,
                ),
            },
            AssetId::Ball => Sprite {
                size: self.ball_size,
                mask: SpriteMask::disc(self.ball_size.x as u32, self.ball_size.y as u32),
            },
        }
    }
}

/// Arena background.
pub const BACKGROUND_COLOR: Color = [14, 19, 31];

/// Draw one frame of the current state: background, tiles, paddle, ball.
pub fn draw_frame(state: &GameState, renderer: &mut impl Renderer) {
    renderer.fill_background(BACKGROUND_COLOR);

    for (pos, tile) in state.grid.tile_list() {
        renderer.draw_sprite(
            SpriteId::Tile(tile.color, tile.variant),
            state.grid.cell_rect(pos).pos,
        );
    }
    renderer.draw_sprite(SpriteId::Paddle, state.paddle.body.position);
    renderer.draw_sprite(SpriteId::Ball, state.ball.body.position);
}

/// Map this frame's events to playback requests, mirroring the transition
/// edges the game scores: life lost chirp while lives remain, track changes
/// on session boundaries.
pub fn route_audio(events: &[GameEvent], audio: &mut impl AudioPlayer) {
    for event in events {
        match event {
            GameEvent::LifeLost { remaining } if *remaining > 0 => {
                audio.play_one_shot(SoundId::LifeLost);
            }
            GameEvent::LevelStarted { level: 0 } => audio.play_music(TrackId::GameStart, false),
            GameEvent::GameLost { .. } => audio.play_music(TrackId::GameOver, false),
            GameEvent::GameWon { .. } => audio.play_music(TrackId::GameWon, false),
            GameEvent::Restarted => audio.play_music(TrackId::Theme, true),
            _ => {}
        }
    }
}
