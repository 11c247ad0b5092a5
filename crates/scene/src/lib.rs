//! Scene graph for the diorama: what is drawn, where, and from which camera.
//!
//! # Invariants
//! - Node ids are allocated sequentially and never reused.
//! - Iteration order is insertion order.
//! - The camera projection only changes through `update_projection_matrix`.

mod camera;
mod geometry;
mod graph;
mod model;
mod object;

pub use camera::PerspectiveCamera;
pub use geometry::{Geometry, MeshData};
pub use graph::{Scene, SceneNode};
pub use model::ModelInstance;
pub use object::{Light, Material, SceneObject, Side, axes_lines};
