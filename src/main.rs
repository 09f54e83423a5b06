//! Headless demo: runs the simulation with a simple autopilot and logs the
//! session. Useful for exercising the core without a frontend:
//!
//! ```text
//! kanoid [seed] [tuning.json]
//! ```

use std::error::Error;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use kanoid::consts::SIM_DT;
use kanoid::platform::{AssetId, AssetProvider, AudioPlayer, ProceduralAssets, SoundId, TrackId};
use kanoid::sim::{GameEvent, GamePhase, GameState, Intent, tick};
use kanoid::Tuning;

/// Frame cap so a lucky autopilot cannot run forever (10 minutes simulated).
const MAX_FRAMES: u32 = 10 * 60 * 120;

struct LogAudio;

impl AudioPlayer for LogAudio {
    fn play_one_shot(&mut self, sound: SoundId) {
        log::debug!("audio one-shot: {sound:?}");
    }
    fn play_music(&mut self, track: TrackId, looped: bool) {
        log::debug!("audio music: {track:?} (loop: {looped})");
    }
}

/// Steer the paddle under the ball, emitting held-key intents on change.
fn autopilot(state: &GameState, intents: &mut Vec<Intent>) {
    if state.status.phase() == GamePhase::Idle {
        intents.push(Intent::Restart);
        return;
    }
    if state.status.phase() == GamePhase::WaitingBallRelease {
        intents.push(Intent::LaunchBall);
    }

    let ball_x = state.ball.rect().center().x;
    let paddle_x = state.paddle.rect().center().x;
    let deadzone = state.paddle.body.size.x / 4.0;

    let want_left = ball_x < paddle_x - deadzone;
    let want_right = ball_x > paddle_x + deadzone;

    if want_left != state.held_left {
        intents.push(if want_left {
            Intent::MoveLeftDown
        } else {
            Intent::MoveLeftUp
        });
    }
    if want_right != state.held_right {
        intents.push(if want_right {
            Intent::MoveRightDown
        } else {
            Intent::MoveRightUp
        });
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>()?,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(Path::new(&path))?,
        None => Tuning::default(),
    };
    tuning.validate()?;

    log::info!("starting session with seed {seed}");

    let assets = ProceduralAssets::default();
    let mut state = GameState::new(
        seed,
        tuning,
        assets.sprite(AssetId::Paddle),
        assets.sprite(AssetId::Ball),
    );
    let mut audio = LogAudio;
    let mut intents = Vec::new();

    for frame in 0..MAX_FRAMES {
        intents.clear();
        autopilot(&state, &mut intents);
        tick(&mut state, &intents, SIM_DT)?;

        for event in state.drain_events() {
            log::debug!("frame {frame}: {event:?}");
            kanoid::platform::route_audio(&[event], &mut audio);
            match event {
                GameEvent::GameLost { score } => {
                    println!("game lost after {frame} frames, score {score}");
                    return Ok(());
                }
                GameEvent::GameWon { score } => {
                    println!("game won after {frame} frames, score {score}");
                    return Ok(());
                }
                GameEvent::LifeLost { remaining } => {
                    log::info!("life lost, {remaining} remaining");
                }
                _ => {}
            }
        }
    }

    println!(
        "frame cap reached: phase {:?}, score {}, lives {}",
        state.status.phase(),
        state.status.score(),
        state.status.lives()
    );
    Ok(())
}
