//! Per-frame simulation step
//!
//! Ordering within a frame: queued intents, paddle movement, then the phase
//! handler (ball physics while playing, transition resolution otherwise).
//! Transitions requested during a frame are resolved by the next frame's
//! phase handler, so every phase is observable for at least one frame.

use glam::Vec2;

use super::collision::classify_impact;
use super::grid::HitOutcome;
use super::state::{EntityKind, GameEvent, GameState, advance};
use super::status::{GamePhase, InvalidTransitionError};

/// Discrete player intents, delivered once per frame before simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeftDown,
    MoveLeftUp,
    MoveRightDown,
    MoveRightUp,
    /// Release the resting ball. Ignored outside `WaitingBallRelease`.
    LaunchBall,
    /// From `Idle`: start a session. From anywhere else: abandon the session
    /// and return to a fresh `Idle`.
    Restart,
    Quit,
}

/// Advance the game by one frame.
///
/// `dt` is wall-clock seconds since the previous frame and is deliberately
/// not clamped; a long stall shows up as one large step.
///
/// An `Err` here means the core requested an illegal phase transition, which
/// is a bug in this module, not recoverable game input.
pub fn tick(
    state: &mut GameState,
    intents: &[Intent],
    dt: f32,
) -> Result<(), InvalidTransitionError> {
    apply_intents(state, intents)?;

    let arena = state.arena_size();
    let input_axis = Vec2::new(
        state.held_right as i32 as f32 - state.held_left as i32 as f32,
        0.0,
    );
    state.paddle.advance(input_axis, dt, arena.x);

    match state.status.phase() {
        GamePhase::Idle | GamePhase::WaitingBallRelease => {
            state.ball.track_paddle(&state.paddle);
        }
        GamePhase::Start => enter_level(state)?,
        GamePhase::Playing => step_ball(state, dt)?,
        GamePhase::LifeLost => resolve_life_lost(state)?,
        GamePhase::LevelCleared => resolve_level_cleared(state)?,
        GamePhase::NextLevel => {
            state.level += 1;
            enter_level(state)?;
        }
        GamePhase::GameLost | GamePhase::GameWon => {
            state.status.request_transition(GamePhase::Idle)?;
            reset_session(state);
        }
    }

    Ok(())
}

fn apply_intents(state: &mut GameState, intents: &[Intent]) -> Result<(), InvalidTransitionError> {
    for &intent in intents {
        match intent {
            Intent::MoveLeftDown => state.held_left = true,
            Intent::MoveLeftUp => state.held_left = false,
            Intent::MoveRightDown => state.held_right = true,
            Intent::MoveRightUp => state.held_right = false,
            Intent::LaunchBall => {
                // Only meaningful while waiting for release; silently ignored
                // elsewhere.
                if state.status.phase() == GamePhase::WaitingBallRelease {
                    state.ball.launch(&mut state.rng);
                    state.status.request_transition(GamePhase::Playing)?;
                    state.push_event(GameEvent::BallLaunched);
                }
            }
            Intent::Restart => {
                if state.status.phase() == GamePhase::Idle {
                    state.status.request_transition(GamePhase::Start)?;
                } else {
                    // The session is torn down and rebuilt rather than walked
                    // back through the graph.
                    log::info!("session restarted from {:?}", state.status.phase());
                    abandon_session(state);
                    state.push_event(GameEvent::Restarted);
                }
            }
            Intent::Quit => state.push_event(GameEvent::QuitRequested),
        }
    }
    Ok(())
}

/// Populate the grid for the current level and wait for the ball release.
fn enter_level(state: &mut GameState) -> Result<(), InvalidTransitionError> {
    let fill = state.tuning.tile_fill_probability;
    state.grid.generate_random(fill, &mut state.rng);

    state.ball.reset(&state.paddle, state.tuning.ball_acceleration_initial);
    state.push_event(GameEvent::LevelStarted { level: state.level });
    state
        .status
        .request_transition(GamePhase::WaitingBallRelease)?;
    Ok(())
}

fn resolve_life_lost(state: &mut GameState) -> Result<(), InvalidTransitionError> {
    state.ball.reset(&state.paddle, state.tuning.ball_acceleration_initial);
    if state.status.lives() == 0 {
        state.status.request_transition(GamePhase::GameLost)?;
        let score = state.status.score();
        log::info!("game lost with score {score}");
        state.push_event(GameEvent::GameLost { score });
    } else {
        state
            .status
            .request_transition(GamePhase::WaitingBallRelease)?;
    }
    Ok(())
}

fn resolve_level_cleared(state: &mut GameState) -> Result<(), InvalidTransitionError> {
    if state.level + 1 >= state.tuning.level_count {
        state.status.request_transition(GamePhase::GameWon)?;
        let score = state.status.score();
        log::info!("game won with score {score}");
        state.push_event(GameEvent::GameWon { score });
    } else {
        state.status.request_transition(GamePhase::NextLevel)?;
    }
    Ok(())
}

/// Fresh `Idle` session after game over (the `GameLost/GameWon -> Idle` edge).
fn reset_session(state: &mut GameState) {
    state.status.reset_session();
    rebuild_entities(state);
}

/// Forced teardown from an arbitrary phase (restart intent): the status is
/// recreated rather than transitioned, per the session lifecycle.
fn abandon_session(state: &mut GameState) {
    state.status = super::status::GameStatus::new(state.tuning.total_lives);
    rebuild_entities(state);
}

fn rebuild_entities(state: &mut GameState) {
    state.grid.clear();
    state.level = 0;
    let center_x = state.tuning.arena_width / 2.0 - state.paddle.body.size.x / 2.0;
    state.paddle.body.position.x = center_x;
    state.ball.reset(&state.paddle, state.tuning.ball_acceleration_initial);
}

/// One frame of ball flight: acceleration ramp, integration, then paddle,
/// arena-edge, and brick collision in that order.
fn step_ball(state: &mut GameState, dt: f32) -> Result<(), InvalidTransitionError> {
    let tuning = state.tuning;
    let arena = state.arena_size();

    // Speed ramp. The threshold scales with the current acceleration, so each
    // ramp takes more paddle returns than the last.
    let hits_needed = state.ball.body.acceleration * tuning.hit_threshold_ratio;
    if state.ball.paddle_hits as f32 >= hits_needed {
        state.ball.body.acceleration = (state.ball.body.acceleration
            * tuning.acceleration_ramp_factor)
            .min(tuning.ball_acceleration_max);
        state.ball.paddle_hits = 0;
    }

    state.ball.body = advance(EntityKind::Ball, state.ball.body, Vec2::ZERO, dt, arena.x);

    // Paddle contact: pixel-accurate, offset by the relative displacement of
    // the two sprites.
    let offset = (
        (state.ball.body.position.x - state.paddle.body.position.x).round() as i32,
        (state.ball.body.position.y - state.paddle.body.position.y).round() as i32,
    );
    if state.paddle.mask.overlaps(&state.ball.mask, offset) {
        let paddle_rect = state.paddle.rect();
        let impact = classify_impact(
            &state.ball.rect(),
            &paddle_rect,
            state.ball.body.velocity,
            tuning.collision_threshold,
            tuning.collision_threshold * tuning.side_threshold_factor,
        );

        if impact.from_above {
            state.ball.body.position.y = paddle_rect.top() - state.ball.body.size.y;
            state.ball.body.velocity.y = -state.ball.body.velocity.y;
            // Only top-side returns count toward the speed ramp.
            state.ball.paddle_hits += 1;
        }
        if impact.from_below {
            state.ball.body.position.y = paddle_rect.bottom();
            state.ball.body.velocity.y = -state.ball.body.velocity.y;
        }
        if impact.from_left {
            state.ball.body.position.x = paddle_rect.left() - state.ball.body.size.x;
            state.ball.body.velocity.x = -state.ball.body.velocity.x;
        }
        if impact.from_right {
            state.ball.body.position.x = paddle_rect.right();
            state.ball.body.velocity.x = -state.ball.body.velocity.x;
        }
        if impact.any() {
            state.push_event(GameEvent::PaddleBounce);
        }
    }

    // Arena edges: top/left/right reflect and clamp, the floor ends the life.
    let mut wall_bounce = false;
    {
        let body = &mut state.ball.body;
        if body.position.x <= 0.0 && body.velocity.x < 0.0 {
            body.position.x = 0.0;
            body.velocity.x = -body.velocity.x;
            wall_bounce = true;
        }
        let right_limit = arena.x - body.size.x;
        if body.position.x >= right_limit && body.velocity.x > 0.0 {
            body.position.x = right_limit;
            body.velocity.x = -body.velocity.x;
            wall_bounce = true;
        }
        if body.position.y <= 0.0 && body.velocity.y < 0.0 {
            body.position.y = 0.0;
            body.velocity.y = -body.velocity.y;
            wall_bounce = true;
        }
    }
    if wall_bounce {
        state.push_event(GameEvent::WallBounce);
    }

    let floor = arena.y - state.ball.body.size.y;
    if state.ball.body.position.y >= floor && state.ball.body.velocity.y > 0.0 {
        state.status.request_transition(GamePhase::LifeLost)?;
        state.push_event(GameEvent::LifeLost {
            remaining: state.status.lives(),
        });
        return Ok(());
    }

    // Brick contact: one tile per frame, first match in neighborhood scan
    // order, deliberately; keeps scoring reproducible.
    let ball_rect = state.ball.rect();
    let candidates = state.grid.tiles_overlapping(&ball_rect);
    if let Some(&pos) = candidates.first() {
        let tile_rect = state.grid.cell_rect(pos);
        let color = state.grid.get(pos).map(|t| t.color);

        match state.grid.trigger_hit(pos, &mut state.status)? {
            HitOutcome::Destroyed { color, scored, .. } => {
                state.push_event(GameEvent::TileDestroyed { color, scored });
            }
            HitOutcome::Downgraded { color, .. } => {
                state.push_event(GameEvent::TileHit { color });
            }
            HitOutcome::Inert => {
                if let Some(color) = color {
                    state.push_event(GameEvent::TileHit { color });
                }
            }
        }

        let impact = classify_impact(
            &ball_rect,
            &tile_rect,
            state.ball.body.velocity,
            tuning.collision_threshold,
            tuning.collision_threshold,
        );
        if impact.from_above || impact.from_below {
            state.ball.body.velocity.y = -state.ball.body.velocity.y;
        }
        if impact.from_left || impact.from_right {
            state.ball.body.velocity.x = -state.ball.body.velocity.x;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::consts;
    use crate::sim::collision::SpriteMask;
    use crate::sim::state::Sprite;
    use crate::sim::tile::{Tile, TileColor, TileVariant};
    use glam::IVec2;

    const DT: f32 = consts::SIM_DT;

    fn new_state(seed: u64) -> GameState {
        let paddle = Sprite {
            size: Vec2::new(consts::PADDLE_WIDTH, consts::PADDLE_HEIGHT),
            mask: SpriteMask::rounded_rect(
                consts::PADDLE_WIDTH as u32,
                consts::PADDLE_HEIGHT as u32,
                8.0,
            ),
        };
        let ball = Sprite {
            size: Vec2::new(consts::BALL_WIDTH, consts::BALL_HEIGHT),
            mask: SpriteMask::disc(consts::BALL_WIDTH as u32, consts::BALL_HEIGHT as u32),
        };
        GameState::new(seed, Tuning::default(), paddle, ball)
    }

    /// Drive a fresh state into `Playing`.
    fn playing_state(seed: u64) -> GameState {
        let mut state = new_state(seed);
        tick(&mut state, &[Intent::Restart], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::WaitingBallRelease);
        tick(&mut state, &[Intent::LaunchBall], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::Playing);
        state
    }

    #[test]
    fn restart_from_idle_starts_a_session() {
        let mut state = new_state(1);
        assert_eq!(state.status.phase(), GamePhase::Idle);

        tick(&mut state, &[Intent::Restart], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::WaitingBallRelease);
        assert!(!state.grid.is_empty());
        assert_eq!(state.status.lives(), consts::TOTAL_LIVES);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LevelStarted { level: 0 })
        );
    }

    #[test]
    fn launch_only_acts_while_waiting_for_release() {
        let mut state = new_state(2);

        // Ignored in Idle.
        tick(&mut state, &[Intent::LaunchBall], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::Idle);
        assert!(!state.ball.active);

        tick(&mut state, &[Intent::Restart], DT).unwrap();
        tick(&mut state, &[Intent::LaunchBall], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::Playing);
        assert!(state.ball.active);
        let velocity = state.ball.body.velocity;

        // A second launch while playing has no additional effect.
        tick(&mut state, &[Intent::LaunchBall], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::Playing);
        assert_eq!(state.ball.body.velocity, velocity);
    }

    #[test]
    fn resting_ball_follows_paddle() {
        let mut state = new_state(3);
        tick(&mut state, &[Intent::Restart], DT).unwrap();

        let before = state.ball.body.position.x;
        for _ in 0..30 {
            tick(&mut state, &[Intent::MoveRightDown], DT).unwrap();
        }
        assert!(state.ball.body.position.x > before);
        let drift = state.ball.rect().center().x - state.paddle.rect().center().x;
        assert!(drift.abs() < 1e-3);
    }

    #[test]
    fn floor_contact_costs_a_life_without_bouncing() {
        let mut state = playing_state(4);
        state.ball.body.position = Vec2::new(10.0, consts::ARENA_HEIGHT - consts::BALL_HEIGHT);
        state.ball.body.velocity = Vec2::new(0.0, 1.0);

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::LifeLost);
        assert_eq!(state.status.lives(), consts::TOTAL_LIVES - 1);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LifeLost { remaining: 2 })
        );

        // The next frame resets the ball and waits for release.
        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::WaitingBallRelease);
        assert!(!state.ball.active);
        assert_eq!(
            state.ball.body.acceleration,
            state.tuning.ball_acceleration_initial
        );
    }

    #[test]
    fn third_lost_life_ends_the_game() {
        let mut state = playing_state(5);

        for remaining in [2u8, 1, 0] {
            state.ball.body.position = Vec2::new(10.0, consts::ARENA_HEIGHT - consts::BALL_HEIGHT);
            state.ball.body.velocity = Vec2::new(0.0, 1.0);
            tick(&mut state, &[], DT).unwrap();
            assert_eq!(state.status.phase(), GamePhase::LifeLost);
            assert_eq!(state.status.lives(), remaining);

            tick(&mut state, &[], DT).unwrap();
            if remaining > 0 {
                assert_eq!(state.status.phase(), GamePhase::WaitingBallRelease);
                tick(&mut state, &[Intent::LaunchBall], DT).unwrap();
                assert_eq!(state.status.phase(), GamePhase::Playing);
            } else {
                assert_eq!(state.status.phase(), GamePhase::GameLost);
            }
        }

        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameLost { .. })));

        // Game over settles back into a fresh idle session.
        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::Idle);
        assert_eq!(state.status.lives(), consts::TOTAL_LIVES);
        assert_eq!(state.status.score(), 0);
    }

    #[test]
    fn destroying_last_tile_clears_level_and_wins_single_level_game() {
        let mut state = playing_state(6);
        state.grid.clear();
        state
            .grid
            .insert(IVec2::ZERO, Tile::new(TileColor::Green, TileVariant::Normal));

        // Ball rising into the tile's cell from below.
        state.ball.body.position = Vec2::new(20.0, 30.0);
        state.ball.body.velocity = Vec2::new(0.0, -1.0);

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::LevelCleared);
        assert_eq!(state.status.score(), 20);
        assert!(state.grid.is_empty());
        assert!(
            state.ball.body.velocity.y > 0.0,
            "brick bounce flips vertical velocity"
        );
        assert!(state.drain_events().contains(&GameEvent::TileDestroyed {
            color: TileColor::Green,
            scored: 20,
        }));

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::GameWon);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::GameWon { score: 20 })
        );

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::Idle);
    }

    #[test]
    fn clearing_a_level_mid_run_advances_to_the_next() {
        let mut state = new_state(7);
        state.tuning.level_count = 2;
        tick(&mut state, &[Intent::Restart], DT).unwrap();
        tick(&mut state, &[Intent::LaunchBall], DT).unwrap();

        state.grid.clear();
        state
            .grid
            .insert(IVec2::ZERO, Tile::new(TileColor::Green, TileVariant::Normal));
        state.ball.body.position = Vec2::new(20.0, 30.0);
        state.ball.body.velocity = Vec2::new(0.0, -1.0);

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::LevelCleared);

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::NextLevel);

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::WaitingBallRelease);
        assert_eq!(state.level, 1);
        assert!(!state.grid.is_empty());
        assert_eq!(state.status.score(), 20, "score carries across levels");
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LevelStarted { level: 1 })
        );
    }

    #[test]
    fn paddle_return_bounces_ball_and_counts_hit() {
        let mut state = playing_state(8);
        let paddle_rect = state.paddle.rect();
        state.ball.body.position = Vec2::new(
            paddle_rect.center().x - consts::BALL_WIDTH / 2.0,
            paddle_rect.top() - consts::BALL_HEIGHT + 3.0,
        );
        state.ball.body.velocity = Vec2::new(0.0, 1.0);

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.ball.body.velocity.y, -1.0);
        assert_eq!(state.ball.paddle_hits, 1);
        assert_eq!(state.ball.rect().bottom(), state.paddle.rect().top());
        assert!(state.drain_events().contains(&GameEvent::PaddleBounce));
    }

    #[test]
    fn acceleration_ramps_after_enough_returns_and_clamps_at_max() {
        let mut state = playing_state(9);
        state.grid.clear();
        state.ball.body.position = Vec2::new(300.0, 300.0);
        state.ball.body.velocity = Vec2::new(0.0, -1.0);

        let initial = state.tuning.ball_acceleration_initial;
        state.ball.paddle_hits = 8;
        tick(&mut state, &[], DT).unwrap();
        let ramped = state.ball.body.acceleration;
        assert!((ramped - initial * consts::ACCELERATION_RAMP_FACTOR).abs() < 1e-3);
        assert_eq!(state.ball.paddle_hits, 0);

        // Near the ceiling the ramp clamps.
        state.ball.body.position = Vec2::new(300.0, 300.0);
        state.ball.body.acceleration = state.tuning.ball_acceleration_max - 1.0;
        state.ball.paddle_hits = 100;
        tick(&mut state, &[], DT).unwrap();
        assert_eq!(
            state.ball.body.acceleration,
            state.tuning.ball_acceleration_max
        );
    }

    #[test]
    fn side_walls_reflect_and_clamp() {
        let mut state = playing_state(10);
        state.grid.clear();
        state.ball.body.position = Vec2::new(0.5, 300.0);
        state.ball.body.velocity = Vec2::new(-1.0, -1.0);

        tick(&mut state, &[], DT).unwrap();
        assert_eq!(state.ball.body.position.x, 0.0);
        assert_eq!(state.ball.body.velocity.x, 1.0);
        assert!(state.drain_events().contains(&GameEvent::WallBounce));
    }

    #[test]
    fn restart_mid_game_returns_to_fresh_idle() {
        let mut state = playing_state(11);
        state.status.add_score(99);

        tick(&mut state, &[Intent::Restart], DT).unwrap();
        assert_eq!(state.status.phase(), GamePhase::Idle);
        assert_eq!(state.status.score(), 0);
        assert_eq!(state.status.lives(), consts::TOTAL_LIVES);
        assert!(state.grid.is_empty());
        assert!(!state.ball.active);
        assert!(state.drain_events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn quit_intent_only_raises_an_event() {
        let mut state = playing_state(12);
        let phase = state.status.phase();
        tick(&mut state, &[Intent::Quit], DT).unwrap();
        assert_eq!(state.status.phase(), phase);
        assert!(state.drain_events().contains(&GameEvent::QuitRequested));
    }

    #[test]
    fn same_seed_and_intent_script_replays_identically() {
        let script: Vec<(usize, Vec<Intent>)> = vec![
            (0, vec![Intent::Restart]),
            (1, vec![Intent::LaunchBall]),
            (30, vec![Intent::MoveLeftDown]),
            (90, vec![Intent::MoveLeftUp, Intent::MoveRightDown]),
            (200, vec![Intent::MoveRightUp]),
        ];

        let run = || {
            let mut state = new_state(1234);
            for frame in 0..400usize {
                let intents = script
                    .iter()
                    .find(|(at, _)| *at == frame)
                    .map(|(_, i)| i.clone())
                    .unwrap_or_default();
                tick(&mut state, &intents, DT).unwrap();
                state.drain_events();
            }
            (
                state.status.phase(),
                state.status.score(),
                state.status.lives(),
                state.ball.body.position,
                state.paddle.body.position,
            )
        };

        assert_eq!(run(), run());
    }
}
