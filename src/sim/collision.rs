//! Collision tests between the player and obstacles
//!
//! Everything here is axis-aligned: an obstacle is a vertical band of
//! `OBSTACLE_WIDTH`, solid everywhere except its gap.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::{OBSTACLE_WIDTH, PLAYER_HALF_WIDTH, WORLD_HALF_HEIGHT};

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

/// Whether the player is inside the obstacle's horizontal band
#[inline]
pub fn within_width_band(player_x: f32, obstacle_x: f32) -> bool {
    (obstacle_x - player_x).abs() < OBSTACLE_WIDTH / 2.0 + PLAYER_HALF_WIDTH
}

/// Whether `y` lies inside the gap (edges inclusive)
#[inline]
pub fn within_gap(y: f32, gap_y: f32, gap_size: f32) -> bool {
    let half = gap_size / 2.0;
    y >= gap_y - half && y <= gap_y + half
}

/// The player is hit iff it is inside the width band and outside the gap
pub fn player_hits_obstacle(player_pos: Vec2, obstacle: &Obstacle, gap_size: f32) -> bool {
    within_width_band(player_pos.x, obstacle.x) && !within_gap(player_pos.y, obstacle.gap_y, gap_size)
}

/// Whether the player has left the playfield vertically
#[inline]
pub fn out_of_bounds(y: f32) -> bool {
    !(-WORLD_HALF_HEIGHT..=WORLD_HALF_HEIGHT).contains(&y)
}

/// The two solid columns of an obstacle, bottom then top, for rendering
pub fn obstacle_columns(obstacle: &Obstacle, gap_size: f32, column_height: f32) -> [Aabb; 2] {
    let half_w = OBSTACLE_WIDTH / 2.0;
    let gap_bottom = obstacle.gap_y - gap_size / 2.0;
    let gap_top = obstacle.gap_y + gap_size / 2.0;
    [
        Aabb::new(
            Vec2::new(obstacle.x - half_w, gap_bottom - column_height),
            Vec2::new(obstacle.x + half_w, gap_bottom),
        ),
        Aabb::new(
            Vec2::new(obstacle.x - half_w, gap_top),
            Vec2::new(obstacle.x + half_w, gap_top + column_height),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obstacle_at(x: f32, gap_y: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            gap_y,
            passed: false,
            bullish: true,
        }
    }

    #[test]
    fn test_hit_above_gap() {
        let o = obstacle_at(-2.0, 0.0);
        assert!(player_hits_obstacle(Vec2::new(-2.0, 3.0), &o, 4.2));
    }

    #[test]
    fn test_hit_below_gap() {
        let o = obstacle_at(-2.0, 1.0);
        assert!(player_hits_obstacle(Vec2::new(-2.0, -1.5), &o, 4.2));
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let o = obstacle_at(-2.0, 0.0);
        assert!(!player_hits_obstacle(Vec2::new(-2.0, 1.0), &o, 4.2));
    }

    #[test]
    fn test_gap_edges_are_safe() {
        let o = obstacle_at(-2.0, 0.0);
        assert!(!player_hits_obstacle(Vec2::new(-2.0, 2.1), &o, 4.2));
        assert!(!player_hits_obstacle(Vec2::new(-2.0, -2.1), &o, 4.2));
    }

    #[test]
    fn test_outside_band_never_hits() {
        // Band half-width is 0.5 + 0.3
        let o = obstacle_at(0.0, 0.0);
        assert!(!player_hits_obstacle(Vec2::new(-0.8, 8.0), &o, 4.2));
        assert!(player_hits_obstacle(Vec2::new(-0.79, 8.0), &o, 4.2));
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(!out_of_bounds(0.0));
        assert!(!out_of_bounds(9.0));
        assert!(out_of_bounds(9.01));
        assert!(out_of_bounds(-9.5));
    }

    #[test]
    fn test_columns_leave_gap_open() {
        let o = obstacle_at(3.0, 1.0);
        let [bottom, top] = obstacle_columns(&o, 4.0, 100.0);
        assert_eq!(bottom.max.y, -1.0);
        assert_eq!(top.min.y, 3.0);
        assert!(bottom.max.y < o.gap_y && o.gap_y < top.min.y);
        assert_eq!((bottom.min.x, bottom.max.x), (2.5, 3.5));
    }

    proptest! {
        #[test]
        fn prop_hit_iff_in_band_and_outside_gap(
            px in -5.0f32..5.0,
            py in -9.0f32..9.0,
            ox in -5.0f32..5.0,
            gap_y in -4.0f32..4.0,
            gap in 1.0f32..8.0,
        ) {
            let o = obstacle_at(ox, gap_y);
            let in_band = (ox - px).abs() < OBSTACLE_WIDTH / 2.0 + PLAYER_HALF_WIDTH;
            let outside_gap = py < gap_y - gap / 2.0 || py > gap_y + gap / 2.0;
            prop_assert_eq!(player_hits_obstacle(Vec2::new(px, py), &o, gap), in_band && outside_gap);
        }
    }
}
