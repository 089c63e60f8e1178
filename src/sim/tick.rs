//! Fixed timestep simulation tick
//!
//! Core game loop that advances a run deterministically.

use super::collision::{out_of_bounds, player_hits_obstacle};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (tap/space/arrow up); also starts the run
    pub flap: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // A finished run ignores input until restarted
    if state.phase == GamePhase::Rekt {
        return;
    }

    if input.flap {
        if state.phase == GamePhase::Start {
            state.phase = GamePhase::Playing;
        }
        state.player.flap(state.tuning.flap_velocity);
        state.events.push(GameEvent::Flapped);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    state.player.integrate(state.tuning.gravity, dt);

    // Scroll obstacles; each scores once as it clears the player
    let dx = state.tuning.scroll_speed * dt;
    let pass_line = PLAYER_X - OBSTACLE_WIDTH;
    for obstacle in &mut state.obstacles {
        obstacle.x -= dx;
        if !obstacle.passed && obstacle.x < pass_line {
            obstacle.passed = true;
            state.score += 1;
            state.events.push(GameEvent::Scored(state.score));
        }
    }

    recycle_obstacles(state);

    let player_pos = state.player.pos;
    let gap_size = state.tuning.gap_size;
    let hit = out_of_bounds(player_pos.y)
        || state
            .obstacles
            .iter()
            .any(|o| player_hits_obstacle(player_pos, o, gap_size));

    if hit {
        state.phase = GamePhase::Rekt;
        state.events.push(GameEvent::Rekt(state.score));
        log::debug!("Run over at tick {} with score {}", state.time_ticks, state.score);
    }
}

/// Replace obstacles that have scrolled off the left edge
fn recycle_obstacles(state: &mut GameState) {
    while state.obstacles.first().is_some_and(|o| o.x < DESPAWN_X) {
        state.obstacles.remove(0);
        state.spawn_obstacle();
    }
}
