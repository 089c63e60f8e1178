//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, obstacle_columns, out_of_bounds, player_hits_obstacle};
pub use state::{GameEvent, GamePhase, GameState, Obstacle, Player};
pub use tick::{TickInput, tick};
