//! Warp Flap - a flap-and-dodge mini-app game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, obstacles, collisions)
//! - `tuning`: Data-driven game balance
//! - `leaderboard`: Personal-best score table and its stores
//! - `share`: Share card and share text templating
//! - `renderer`: WebGPU rendering pipeline
//! - `remote`: Browser client for the leaderboard service (wasm only)
//! - `server`: Leaderboard / share-card HTTP service (native only)

pub mod error;
pub mod leaderboard;
pub mod profile;
pub mod renderer;
pub mod settings;
pub mod share;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod remote;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod persistence;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;

pub use error::{Error, Result};
pub use leaderboard::{LEADERBOARD_LIMIT, Leaderboard, LeaderboardEntry};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the display rate the tuning was made at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player is pinned at this x; the world scrolls past it
    pub const PLAYER_X: f32 = -2.0;
    /// Half the player's hit box width
    pub const PLAYER_HALF_WIDTH: f32 = 0.3;
    /// Player draw size (world units)
    pub const PLAYER_SIZE: f32 = 1.5;

    /// Run ends when the player leaves [-WORLD_HALF_HEIGHT, WORLD_HALF_HEIGHT]
    pub const WORLD_HALF_HEIGHT: f32 = 9.0;

    /// Obstacle (candle) width
    pub const OBSTACLE_WIDTH: f32 = 1.0;
    /// Where the first obstacle appears, and where new ones go if none remain
    pub const SPAWN_X: f32 = 10.0;
    /// Obstacles left of this line are recycled
    pub const DESPAWN_X: f32 = -15.0;

    /// Rotation set by a flap (radians, nose up)
    pub const FLAP_ROTATION: f32 = 0.5;
    /// Nose-down rotation limit
    pub const MIN_ROTATION: f32 = -0.8;
    /// Rotation decay toward the nose-down limit (radians/s)
    pub const ROTATION_DECAY: f32 = 1.2;
}
