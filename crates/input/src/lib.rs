//! Input mapping: raw key names become [`SceneAction`]s.
//!
//! # Invariants
//! - Character keys are matched case-sensitively, exactly as listed.
//! - Unmapped keys produce no action.

pub mod action;

pub use action::{CameraPreset, SceneAction, action_for_key};
