//! World kernel: composes the demo scene, advances it every frame and hands
//! it to an engine for drawing.
//!
//! # Invariants
//! - Elapsed time is only ever reported in milliseconds; motion uses seconds.
//! - The world is the only owner of the scene; engines get a shared borrow.
//! - A failed model load never stops the rest of the scene.

pub mod engine_loop;
pub mod loader;
pub mod motion;
pub mod world;

pub use engine_loop::{EngineLoop, MAX_FRAME_MS};
pub use loader::ModelLoad;
pub use motion::{Shuttle, Spin};
pub use world::World;

use diorama_assets::AssetError;
use diorama_render::RenderError;

/// Errors surfaced by the world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("model load failed: {0}")]
    ModelLoad(#[from] AssetError),
    #[error("model loader stopped before sending a result")]
    LoaderStopped,
}
