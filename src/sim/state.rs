//! Entities and session state
//!
//! All mutable gameplay state lives here: the moving bodies, the brick grid,
//! the status machine, and the per-frame event queue drained by the
//! orchestrator for audio/rendering side effects.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Rect, SpriteMask};
use super::grid::TileGrid;
use super::status::GameStatus;
use super::tile::TileColor;
use crate::config::Tuning;

/// A sprite footprint as the simulation sees it: dimensions plus per-pixel
/// opacity. Pixel color data never enters the core.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub size: Vec2,
    pub mask: SpriteMask,
}

/// Moving-entity kinds, dispatched through [`advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Paddle,
    Ball,
}

/// Base moving body: top-left position, fixed footprint, directional
/// velocity bias, displacement scale.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub position: Vec2,
    pub size: Vec2,
    /// Persistent directional bias, components in {-1, 0, 1}. Not momentum:
    /// each frame's displacement is recomputed from scratch.
    pub velocity: Vec2,
    /// Displacement scale in pixels/sec.
    pub acceleration: f32,
}

impl PhysicsBody {
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

/// Advance a body by one frame.
///
/// Displacement is `(velocity + input_axis) * acceleration * dt`; the stored
/// velocity is left untouched, which gives instant-stop instant-accelerate
/// arcade control. Paddles are clamped into the horizontal play area after
/// the move, so no input magnitude or `dt` can push them off-field.
pub fn advance(
    kind: EntityKind,
    body: PhysicsBody,
    input_axis: Vec2,
    dt: f32,
    arena_width: f32,
) -> PhysicsBody {
    let frame_velocity = body.velocity + input_axis;
    let mut position = body.position + frame_velocity * body.acceleration * dt;

    if kind == EntityKind::Paddle {
        position.x = position.x.clamp(0.0, arena_width - body.size.x);
    }

    PhysicsBody { position, ..body }
}

/// The player-controlled paddle.
#[derive(Debug, Clone)]
pub struct Paddle {
    pub body: PhysicsBody,
    pub mask: SpriteMask,
}

impl Paddle {
    pub fn new(sprite: Sprite, position: Vec2, acceleration: f32) -> Self {
        Self {
            body: PhysicsBody {
                position,
                size: sprite.size,
                velocity: Vec2::ZERO,
                acceleration,
            },
            mask: sprite.mask,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn advance(&mut self, input_axis: Vec2, dt: f32, arena_width: f32) {
        self.body = advance(EntityKind::Paddle, self.body, input_axis, dt, arena_width);
    }
}

/// The ball. Resting on the paddle until launched, then in free flight.
#[derive(Debug, Clone)]
pub struct Ball {
    pub body: PhysicsBody,
    pub mask: SpriteMask,
    /// False while resting on the paddle.
    pub active: bool,
    /// Paddle returns since the last acceleration ramp.
    pub paddle_hits: u32,
}

impl Ball {
    pub fn new(sprite: Sprite, acceleration_initial: f32) -> Self {
        Self {
            body: PhysicsBody {
                position: Vec2::ZERO,
                size: sprite.size,
                velocity: Vec2::ZERO,
                acceleration: acceleration_initial,
            },
            mask: sprite.mask,
            active: false,
            paddle_hits: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Pin the resting ball directly above the paddle's horizontal center.
    pub fn track_paddle(&mut self, paddle: &Paddle) {
        self.body.position.x = paddle.rect().center().x - self.body.size.x / 2.0;
        self.body.position.y = paddle.rect().top() - self.body.size.y;
    }

    /// Release the ball: upward, with a pseudo-random horizontal direction.
    pub fn launch(&mut self, rng: &mut impl Rng) {
        if self.active {
            return;
        }
        let horizontal = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.body.velocity = Vec2::new(horizontal, -1.0);
        self.active = true;
    }

    /// Return the ball to rest on the paddle and restore launch-time speed.
    pub fn reset(&mut self, paddle: &Paddle, acceleration_initial: f32) {
        self.body.acceleration = acceleration_initial;
        self.body.velocity = Vec2::ZERO;
        self.paddle_hits = 0;
        self.active = false;
        self.track_paddle(paddle);
    }
}

/// Discrete edge notifications for the frontend: one-shot sounds, music-track
/// changes, HUD updates. Drained once per frame after `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    BallLaunched,
    PaddleBounce,
    WallBounce,
    TileHit { color: TileColor },
    TileDestroyed { color: TileColor, scored: u64 },
    LifeLost { remaining: u8 },
    GameLost { score: u64 },
    GameWon { score: u64 },
    Restarted,
    QuitRequested,
}

/// Complete session state.
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub tuning: Tuning,
    pub status: GameStatus,
    pub paddle: Paddle,
    pub ball: Ball,
    pub grid: TileGrid,
    /// Zero-based level index within the session.
    pub level: u32,
    /// Held-key state derived from down/up intent pairs.
    pub held_left: bool,
    pub held_right: bool,
    events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning, paddle_sprite: Sprite, ball_sprite: Sprite) -> Self {
        let paddle_position = Vec2::new(
            tuning.arena_width / 2.0 - paddle_sprite.size.x / 2.0,
            tuning.arena_height - tuning.paddle_offset_y,
        );
        let paddle = Paddle::new(paddle_sprite, paddle_position, tuning.paddle_acceleration);

        let mut ball = Ball::new(ball_sprite, tuning.ball_acceleration_initial);
        ball.track_paddle(&paddle);

        let grid = TileGrid::new(
            tuning.grid_cols,
            tuning.grid_rows,
            Vec2::new(tuning.tile_width, tuning.tile_height),
        );

        Self {
            seed,
            status: GameStatus::new(tuning.total_lives),
            paddle,
            ball,
            grid,
            level: 0,
            held_left: false,
            held_right: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.tuning.arena_width, self.tuning.arena_height)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events accumulated since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;
    use proptest::prelude::*;

    fn test_sprites() -> (Sprite, Sprite) {
        (
            Sprite {
                size: Vec2::new(consts::PADDLE_WIDTH, consts::PADDLE_HEIGHT),
                mask: SpriteMask::filled(consts::PADDLE_WIDTH as u32, consts::PADDLE_HEIGHT as u32),
            },
            Sprite {
                size: Vec2::new(consts::BALL_WIDTH, consts::BALL_HEIGHT),
                mask: SpriteMask::disc(consts::BALL_WIDTH as u32, consts::BALL_HEIGHT as u32),
            },
        )
    }

    fn test_state(seed: u64) -> GameState {
        let (paddle, ball) = test_sprites();
        GameState::new(seed, Tuning::default(), paddle, ball)
    }

    #[test]
    fn advance_recomputes_displacement_without_accumulating_momentum() {
        let body = PhysicsBody {
            position: Vec2::new(100.0, 100.0),
            size: Vec2::new(10.0, 10.0),
            velocity: Vec2::ZERO,
            acceleration: 600.0,
        };

        // Input pushes the body; releasing it stops the body on the spot.
        let moved = advance(EntityKind::Ball, body, Vec2::new(1.0, 0.0), 0.1, 1280.0);
        assert_eq!(moved.position, Vec2::new(160.0, 100.0));
        assert_eq!(moved.velocity, Vec2::ZERO, "input never leaks into velocity");

        let stopped = advance(EntityKind::Ball, moved, Vec2::ZERO, 0.1, 1280.0);
        assert_eq!(stopped.position, moved.position);
    }

    #[test]
    fn paddle_at_left_wall_stays_pinned_under_left_input() {
        let mut state = test_state(1);
        state.paddle.body.position.x = 0.0;
        state.paddle.advance(Vec2::new(-1.0, 0.0), consts::SIM_DT, consts::ARENA_WIDTH);
        assert_eq!(state.paddle.body.position.x, 0.0);
    }

    #[test]
    fn ball_launch_sets_upward_unit_velocity_once() {
        let mut state = test_state(3);
        state.ball.launch(&mut state.rng);
        assert!(state.ball.active);
        let vel = state.ball.body.velocity;
        assert_eq!(vel.y, -1.0);
        assert!(vel.x == 1.0 || vel.x == -1.0);

        // A second launch while in flight is a no-op.
        state.ball.body.velocity = Vec2::new(1.0, 1.0);
        state.ball.launch(&mut state.rng);
        assert_eq!(state.ball.body.velocity, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn ball_reset_restores_initial_acceleration_and_rests_on_paddle() {
        let mut state = test_state(4);
        state.ball.launch(&mut state.rng);
        state.ball.body.acceleration = 500.0;
        state.ball.paddle_hits = 6;
        state.ball.body.position = Vec2::new(40.0, 40.0);

        state.ball.reset(&state.paddle, state.tuning.ball_acceleration_initial);

        assert!(!state.ball.active);
        assert_eq!(state.ball.paddle_hits, 0);
        assert_eq!(state.ball.body.acceleration, state.tuning.ball_acceleration_initial);
        assert_eq!(state.ball.body.velocity, Vec2::ZERO);
        let ball_rect = state.ball.rect();
        let paddle_rect = state.paddle.rect();
        assert_eq!(ball_rect.center().x, paddle_rect.center().x);
        assert_eq!(ball_rect.bottom(), paddle_rect.top());
    }

    #[test]
    fn resting_ball_tracks_paddle_movement() {
        let mut state = test_state(5);
        state.paddle.advance(Vec2::new(1.0, 0.0), 0.05, consts::ARENA_WIDTH);
        state.ball.track_paddle(&state.paddle);
        let drift = state.ball.rect().center().x - state.paddle.rect().center().x;
        assert!(drift.abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn paddle_never_leaves_play_area(
            start in 0.0f32..(consts::ARENA_WIDTH - consts::PADDLE_WIDTH),
            axis in -1.0f32..1.0f32,
            dt in 0.0f32..10.0f32,
        ) {
            let mut state = test_state(6);
            state.paddle.body.position.x = start;
            state.paddle.advance(Vec2::new(axis, 0.0), dt, consts::ARENA_WIDTH);
            let x = state.paddle.body.position.x;
            prop_assert!(x >= 0.0);
            prop_assert!(x <= consts::ARENA_WIDTH - consts::PADDLE_WIDTH);
        }
    }
}
