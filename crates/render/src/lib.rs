//! Rendering adapter: the engine interface the world drives each frame.
//!
//! # Invariants
//! - Engines cannot mutate the scene.
//! - The drawing buffer follows the display size; the camera aspect and
//!   projection are only touched when a resize actually happens.

mod engine;
mod renderer;

pub use engine::{
    CLEAR_COLOR, DEFAULT_CAMERA_ASPECT, DrawingBuffer, Engine, RenderError, clear_color,
    resize_to_display,
};
pub use renderer::DebugTextEngine;
