//! Shared types for the diorama workspace.

mod color;
mod types;

pub use color::Color;
pub use types::{NodeId, Transform};
