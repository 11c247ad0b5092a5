//! Skeletal animation: keyframe clips, a mixer that plays them, and CPU
//! linear blend skinning.
//!
//! # Invariants
//! - One cached action per clip per mixer.
//! - Stopping an action rewinds it to time zero.
//! - Skinning never mutates the source mesh.

pub mod clip;
pub mod mixer;
pub mod skeleton;
pub mod skin;

pub use clip::{AnimationClip, Interpolation, Sample, Track, TrackValues};
pub use mixer::{ActionId, AnimationAction, AnimationMixer, LoopMode};
pub use skeleton::{Joint, Pose, Skeleton};
pub use skin::{PosedVertices, SkinnedMesh};
