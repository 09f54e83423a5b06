//! Game phase state machine, lives, and score
//!
//! Phase transitions are only legal along a fixed directed graph. An illegal
//! request is a logic bug in the caller and surfaces as a typed error rather
//! than being coerced.

use thiserror::Error;

/// Current phase of the game session, exactly one active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Attract screen, no level active
    Idle,
    /// Session bootstrap: score/lives reset, level generated
    Start,
    /// Ball resting on the paddle, waiting for launch input
    WaitingBallRelease,
    /// Ball in flight
    Playing,
    /// Ball reached the floor this frame
    LifeLost,
    /// Last destructible tile removed this frame
    LevelCleared,
    /// Advancing to the next generated level
    NextLevel,
    GameLost,
    GameWon,
}

impl GamePhase {
    /// Phases legally reachable from `self`.
    pub fn allowed_transitions(self) -> &'static [GamePhase] {
        use GamePhase::*;
        match self {
            Idle => &[Start],
            Start => &[WaitingBallRelease],
            WaitingBallRelease => &[Playing],
            Playing => &[LifeLost, LevelCleared],
            LifeLost => &[Playing, WaitingBallRelease, GameLost, GameWon],
            LevelCleared => &[NextLevel, GameWon],
            GameLost => &[Idle],
            GameWon => &[Idle],
            NextLevel => &[WaitingBallRelease],
        }
    }
}

/// A phase transition was requested that is not reachable from the current
/// phase. Never triggered by normal play; propagate, do not swallow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{requested:?} is not a valid transition from {from:?} (allowed: {allowed:?})")]
pub struct InvalidTransitionError {
    pub from: GamePhase,
    pub requested: GamePhase,
    pub allowed: &'static [GamePhase],
}

/// Session status: current phase plus the score/lives coupled to it.
#[derive(Debug, Clone)]
pub struct GameStatus {
    phase: GamePhase,
    score: u64,
    lives: u8,
    total_lives: u8,
}

impl GameStatus {
    pub fn new(total_lives: u8) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            lives: total_lives,
            total_lives,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Request a phase transition.
    ///
    /// On success the new phase is returned and any side effect coupled to the
    /// entered phase is applied exactly once: `Start` resets score and lives,
    /// `LifeLost` costs one life. The caller is responsible for checking
    /// `lives()` after a `LifeLost` transition to route to `GameLost` instead
    /// of `WaitingBallRelease`.
    pub fn request_transition(
        &mut self,
        next: GamePhase,
    ) -> Result<GamePhase, InvalidTransitionError> {
        let allowed = self.phase.allowed_transitions();
        if !allowed.contains(&next) {
            return Err(InvalidTransitionError {
                from: self.phase,
                requested: next,
                allowed,
            });
        }

        log::debug!("phase {:?} -> {:?}", self.phase, next);
        self.phase = next;

        match next {
            GamePhase::Start => {
                self.score = 0;
                self.lives = self.total_lives;
            }
            GamePhase::LifeLost => {
                self.lives = self.lives.saturating_sub(1);
            }
            _ => {}
        }

        Ok(next)
    }

    /// Award points. Independent of phase, always permitted.
    pub fn add_score(&mut self, delta: u64) {
        self.score += delta;
    }

    /// Tear the session down after game over: fresh score and lives for the
    /// next run. Only meaningful once the phase is back at `Idle`.
    pub fn reset_session(&mut self) {
        self.score = 0;
        self.lives = self.total_lives;
    }
}
