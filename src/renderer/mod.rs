//! WebGPU rendering module
//!
//! Flat-shaded triangle lists built from the game state each frame.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
