//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.059, 0.020, 0.094, 1.0]; // #0f0518
    pub const CANDLE_GREEN: [f32; 4] = [0.063, 0.725, 0.506, 1.0]; // #10B981
    pub const CANDLE_RED: [f32; 4] = [0.937, 0.267, 0.267, 1.0]; // #EF4444
    pub const PLAYER: [f32; 4] = [0.522, 0.365, 0.804, 1.0]; // #855DCD
    pub const PLAYER_GLOW: [f32; 4] = [0.522, 0.365, 0.804, 0.25];
    pub const PLAYER_EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SPARKLE: [f32; 4] = [0.522, 0.365, 0.804, 0.3];
}
