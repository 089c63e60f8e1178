//! Turns a game state into a triangle list

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{GameState, obstacle_columns};

/// Candle columns extend far past the screen edge
const COLUMN_HEIGHT: f32 = 100.0;
/// Sparkles are scattered over this half-width
const SPARKLE_HALF_WIDTH: f32 = 14.0;

/// Build the vertices for one frame.
///
/// `time` is seconds since start; sparkles hold still when `animate` is off.
pub fn build_scene(state: &GameState, sparkle_count: usize, time: f32, animate: bool) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(512 + sparkle_count * 18);

    for i in 0..sparkle_count {
        let (pos, phase) = sparkle(i as u32);
        let drift = if animate { (time * 0.4 + phase).sin() * 0.3 } else { 0.0 };
        let twinkle = if animate { 0.5 + 0.5 * (time * 2.0 + phase).sin() } else { 0.7 };
        let mut color = colors::SPARKLE;
        color[3] *= twinkle;
        vertices.extend(shapes::circle(pos + Vec2::new(0.0, drift), 0.06, color, 6));
    }

    let gap_size = state.tuning.gap_size;
    for obstacle in &state.obstacles {
        let color = if obstacle.bullish {
            colors::CANDLE_GREEN
        } else {
            colors::CANDLE_RED
        };
        for column in obstacle_columns(obstacle, gap_size, COLUMN_HEIGHT) {
            vertices.extend(shapes::rect(&column, color));
        }
    }

    let player = &state.player;
    vertices.extend(shapes::circle(player.pos, PLAYER_SIZE * 0.9, colors::PLAYER_GLOW, 24));
    vertices.extend(shapes::rotated_square(
        player.pos,
        PLAYER_SIZE * 0.6,
        player.rotation,
        colors::PLAYER,
    ));
    let eye = player.pos + Vec2::from_angle(player.rotation).rotate(Vec2::new(0.2, 0.12));
    vertices.extend(shapes::circle(eye, 0.08, colors::PLAYER_EYE, 8));

    vertices
}

/// Stable pseudo-random sparkle position and phase
fn sparkle(index: u32) -> (Vec2, f32) {
    let hash = index.wrapping_mul(2654435761).wrapping_add(0x9e37_79b9);
    let rx = (hash % 1000) as f32 / 1000.0;
    let ry = ((hash >> 10) % 1000) as f32 / 1000.0;
    let rp = ((hash >> 20) % 1000) as f32 / 1000.0;
    let pos = Vec2::new(
        (rx * 2.0 - 1.0) * SPARKLE_HALF_WIDTH,
        (ry * 2.0 - 1.0) * WORLD_HALF_HEIGHT,
    );
    (pos, rp * std::f32::consts::TAU)
}
