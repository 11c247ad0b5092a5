use diorama_common::NodeId;
use diorama_kernel::World;
use diorama_render::Engine;
use diorama_scene::Scene;
use serde::Serialize;

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against the world for the overlay, the CLI and
/// debugging.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the world state.
    pub fn summary<E: Engine>(world: &World<E>) -> SceneSummary {
        let camera = world.camera();
        SceneSummary {
            node_count: world.scene().len(),
            camera_position: camera.position.to_array(),
            camera_aspect: camera.aspect,
            box_rotation_degrees: world.box_rotation_degrees(),
            sphere_position: world.sphere_position().map(|p| p.to_array()),
            soldier_loaded: world.soldier_loaded(),
            active_clips: world.active_clips(),
        }
    }

    /// Names and kinds of every node, in insertion order.
    pub fn list_nodes(scene: &Scene) -> Vec<NodeInfo> {
        scene
            .nodes()
            .map(|(id, node)| NodeInfo {
                id,
                name: node.name.clone(),
                kind: node.object.kind(),
                position: node.transform.position.to_array(),
            })
            .collect()
    }
}

/// Summary of the world state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub node_count: usize,
    pub camera_position: [f32; 3],
    pub camera_aspect: f32,
    pub box_rotation_degrees: f32,
    pub sphere_position: Option<[f32; 3]>,
    pub soldier_loaded: bool,
    pub active_clips: Vec<String>,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [cx, cy, cz] = self.camera_position;
        writeln!(
            f,
            "Scene: nodes={} camera=({cx:.2}, {cy:.2}, {cz:.2}) aspect={:.3}",
            self.node_count, self.camera_aspect
        )?;
        write!(f, "Box1: yaw={:.1}", self.box_rotation_degrees)?;
        if let Some([x, y, z]) = self.sphere_position {
            write!(f, "  Sphere1: ({x:.2}, {y:.2}, {z:.2})")?;
        }
        writeln!(f)?;
        if self.soldier_loaded {
            write!(f, "Soldier: playing [{}]", self.active_clips.join(", "))
        } else {
            write!(f, "Soldier: not loaded")
        }
    }
}

/// One row of the node list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: Option<String>,
    pub kind: &'static str,
    pub position: [f32; 3],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.position;
        write!(
            f,
            "{} {} ({}) pos=({x:.2}, {y:.2}, {z:.2})",
            self.id,
            self.name.as_deref().unwrap_or("-"),
            self.kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_render::DebugTextEngine;

    fn world() -> World<DebugTextEngine> {
        let mut world = World::new(DebugTextEngine::new(640, 480)).without_model();
        world.initialize().unwrap();
        world
    }

    #[test]
    fn summary_of_fresh_world() {
        let world = world();
        let summary = SceneInspector::summary(&world);
        assert_eq!(summary.node_count, 6);
        assert_eq!(summary.camera_position, [2.0, 2.0, 5.0]);
        assert_eq!(summary.camera_aspect, 2.0);
        assert_eq!(summary.sphere_position, Some([-1.0, 0.5, 0.0]));
        assert!(!summary.soldier_loaded);
        assert!(summary.active_clips.is_empty());
    }

    #[test]
    fn summary_tracks_motion() {
        let mut world = world();
        world.update(500.0);
        world.render().unwrap();
        let summary = SceneInspector::summary(&world);
        assert!((summary.box_rotation_degrees - 90.0).abs() < 1e-3);
        assert_eq!(summary.sphere_position, Some([-1.0, 0.5, 0.5]));
        assert!((summary.camera_aspect - 640.0 / 480.0).abs() < 1e-6);
    }

    #[test]
    fn summary_display() {
        let text = SceneInspector::summary(&world()).to_string();
        assert!(text.contains("nodes=6"));
        assert!(text.contains("Sphere1: (-1.00, 0.50, 0.00)"));
        assert!(text.contains("Soldier: not loaded"));
    }

    #[test]
    fn summary_serializes() {
        let summary = SceneInspector::summary(&world());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["node_count"], 6);
        assert_eq!(json["soldier_loaded"], false);
    }

    #[test]
    fn list_nodes_in_order() {
        let world = world();
        let nodes = SceneInspector::list_nodes(world.scene());
        let kinds: Vec<&str> = nodes.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            [
                "directional-light",
                "ambient-light",
                "axes-helper",
                "plane",
                "box",
                "sphere"
            ]
        );
        assert_eq!(nodes[4].name.as_deref(), Some("Box1"));
        assert!(nodes[4].to_string().contains("Box1 (box)"));
    }
}
