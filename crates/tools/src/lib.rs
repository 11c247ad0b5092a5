//! Developer tooling: read-only views of the running diorama for overlays,
//! the CLI and logs.
//!
//! # Invariants
//! - Inspecting never mutates the world.

mod inspector;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
