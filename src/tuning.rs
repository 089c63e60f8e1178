//! Data-driven game balance
//!
//! Values are per-second rates tuned at the 60 Hz fixed step.

use serde::{Deserialize, Serialize};

use crate::consts::{OBSTACLE_WIDTH, WORLD_HALF_HEIGHT};

/// Upper bound on obstacles spawned at the start of a run
pub const MAX_INITIAL_OBSTACLES: usize = 32;
/// Upper bound on horizontal spacing between obstacles
pub const MAX_OBSTACLE_SPACING: f32 = 100.0;
/// Upper bound on scroll speed (units/s)
pub const MAX_SCROLL_SPEED: f32 = 100.0;

/// Physics and spawn tuning for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Upward velocity set by a flap (units/s)
    pub flap_velocity: f32,
    /// Obstacle scroll speed (units/s)
    pub scroll_speed: f32,
    /// Vertical opening of each obstacle
    pub gap_size: f32,
    /// Gap centres are drawn from [-gap_spread, gap_spread]
    pub gap_spread: f32,
    /// Horizontal distance between a recycled obstacle and the last one
    pub obstacle_spacing: f32,
    /// Obstacles present at the start of a run
    pub initial_obstacles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 21.6,
            flap_velocity: 9.6,
            scroll_speed: 4.5,
            gap_size: 4.2,
            gap_spread: 4.0,
            obstacle_spacing: 7.0,
            initial_obstacles: 1,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// LocalStorage key for balance overrides
    const STORAGE_KEY: &'static str = "warp_flap_tuning";

    /// Load overrides from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        match stored.map(|json| Self::from_json(&json)) {
            Some(Ok(tuning)) => {
                log::info!("Using tuning overrides from LocalStorage");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored tuning: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Clamp values that would break the simulation.
    ///
    /// Non-finite floats fall back to their defaults; the rest are held to
    /// ranges the playfield can use.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };

        Self {
            gravity: finite_or(self.gravity, defaults.gravity),
            flap_velocity: finite_or(self.flap_velocity, defaults.flap_velocity),
            scroll_speed: finite_or(self.scroll_speed, defaults.scroll_speed)
                .clamp(0.1, MAX_SCROLL_SPEED),
            gap_size: finite_or(self.gap_size, defaults.gap_size)
                .clamp(0.5, 2.0 * WORLD_HALF_HEIGHT),
            gap_spread: finite_or(self.gap_spread, defaults.gap_spread)
                .abs()
                .min(WORLD_HALF_HEIGHT),
            obstacle_spacing: finite_or(self.obstacle_spacing, defaults.obstacle_spacing)
                .clamp(OBSTACLE_WIDTH, MAX_OBSTACLE_SPACING),
            initial_obstacles: self.initial_obstacles.clamp(1, MAX_INITIAL_OBSTACLES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"gap_size": 6.0}"#).unwrap();
        assert_eq!(tuning.gap_size, 6.0);
        assert_eq!(tuning.gravity, Tuning::default().gravity);
    }

    #[test]
    fn test_sanitize_rejects_degenerate_values() {
        let tuning = Tuning::from_json(r#"{"initial_obstacles": 0, "obstacle_spacing": 0.0}"#)
            .unwrap();
        assert_eq!(tuning.initial_obstacles, 1);
        assert!(tuning.obstacle_spacing >= OBSTACLE_WIDTH);
    }

    #[test]
    fn test_overflowing_floats_fall_back_to_defaults() {
        // 1e39 does not fit in f32 and parses to infinity
        let tuning =
            Tuning::from_json(r#"{"gap_spread": 1e39, "gravity": 1e39, "initial_obstacles": 2}"#)
                .unwrap();
        assert_eq!(tuning.gap_spread, Tuning::default().gap_spread);
        assert_eq!(tuning.gravity, Tuning::default().gravity);
        assert_eq!(tuning.initial_obstacles, 2);
    }

    #[test]
    fn test_huge_values_are_capped() {
        let tuning = Tuning::from_json(
            r#"{"gap_spread": 1e30, "initial_obstacles": 1000000000, "obstacle_spacing": 1e30}"#,
        )
        .unwrap();
        assert_eq!(tuning.gap_spread, WORLD_HALF_HEIGHT);
        assert_eq!(tuning.initial_obstacles, MAX_INITIAL_OBSTACLES);
        assert_eq!(tuning.obstacle_spacing, MAX_OBSTACLE_SPACING);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{not json").is_err());
    }
}
