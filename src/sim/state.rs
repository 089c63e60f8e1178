//! Game state and core simulation types
//!
//! A run lives only for one play session; restart discards it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first flap
    Start,
    /// Active gameplay
    Playing,
    /// Run ended (hit an obstacle or left the screen)
    Rekt,
}

/// Things that happened during a tick, for audio and HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flapped,
    /// An obstacle was cleared; carries the new score
    Scored(u32),
    /// The run ended with this score
    Rekt(u32),
}

/// The player sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Vertical velocity (units/s, positive is up)
    pub vel_y: f32,
    /// Visual tilt (radians, positive is nose up)
    pub rotation: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, 0.0),
            vel_y: 0.0,
            rotation: 0.0,
        }
    }
}

impl Player {
    /// Apply a flap impulse
    pub fn flap(&mut self, flap_velocity: f32) {
        self.vel_y = flap_velocity;
        self.rotation = FLAP_ROTATION;
    }

    /// Integrate one step of gravity (semi-implicit Euler)
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.vel_y -= gravity * dt;
        self.pos.y += self.vel_y * dt;
        self.rotation = (self.rotation - ROTATION_DECAY * dt).max(MIN_ROTATION);
    }
}

/// An obstacle: two columns with a vertical gap between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Horizontal centre
    pub x: f32,
    /// Vertical centre of the gap
    pub gap_y: f32,
    /// Already scored
    pub passed: bool,
    /// Green (true) or red candle
    pub bullish: bool,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Live obstacles, ordered by x ascending
    pub obstacles: Vec<Obstacle>,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new run with the given tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            tuning: tuning.sanitized(),
            phase: GamePhase::Start,
            score: 0,
            time_ticks: 0,
            player: Player::default(),
            obstacles: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.spawn_initial_obstacles();
        state
    }

    /// Discard the run and start over in the `Start` phase
    pub fn restart(&mut self, seed: u64) {
        *self = Self::with_tuning(seed, self.tuning.clone());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The first obstacle sits level with the player so the opening is fair
    fn spawn_initial_obstacles(&mut self) {
        let id = self.next_entity_id();
        let bullish = self.rng.random_bool(0.5);
        self.obstacles.push(Obstacle {
            id,
            x: SPAWN_X,
            gap_y: 0.0,
            passed: false,
            bullish,
        });
        for _ in 1..self.tuning.initial_obstacles {
            self.spawn_obstacle();
        }
    }

    /// Append an obstacle past the last one (or at the spawn line if none)
    pub fn spawn_obstacle(&mut self) {
        let x = self
            .obstacles
            .last()
            .map(|o| o.x + self.tuning.obstacle_spacing)
            .unwrap_or(SPAWN_X);
        let spread = self.tuning.gap_spread;
        let gap_y = if spread > 0.0 {
            self.rng.random_range(-spread..=spread)
        } else {
            0.0
        };
        let bullish = self.rng.random_bool(0.5);
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            x,
            gap_y,
            passed: false,
            bullish,
        });
    }
}
