//! wgpu render backend for the diorama.
//!
//! Draws Phong-lit meshes, skinned models and the axes helper with 4x MSAA.
//! Up to four directional lights are shaded; the first shadow-casting one
//! also drives the shadow map.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - GPU buffers are keyed by node id and dropped when the node goes away.
//! - Model vertices are only re-uploaded when the pose generation changes.

mod frame;
mod gpu;
mod shaders;

pub use frame::{
    MAX_DIRECTIONAL_LIGHTS, SHADOW_EXTENT, SHADOW_FAR, SHADOW_MAP_SIZE, SHADOW_NEAR,
};
pub use gpu::{Overlay, OverlayTarget, WgpuEngine};
