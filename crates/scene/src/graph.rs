use crate::object::SceneObject;
use diorama_common::{NodeId, Transform};
use std::collections::BTreeMap;

/// One entry of the scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub object: SceneObject,
}

impl SceneNode {
    pub fn new(object: SceneObject) -> Self {
        Self {
            name: None,
            transform: Transform::default(),
            object,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Flat scene graph.
///
/// Uses BTreeMap keyed by sequentially allocated ids, so iteration follows
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its handle.
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        tracing::debug!(
            "scene add {id} {} ({})",
            node.name.as_deref().unwrap_or("-"),
            node.object.kind()
        );
        self.nodes.insert(id, node);
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// First node carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::object::{Light, Material};
    use diorama_common::Color;
    use glam::Vec3;

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn add_keeps_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add(SceneNode::new(SceneObject::Light(Light::ambient(Color::WHITE))));
        let b = scene.add(SceneNode::new(SceneObject::AxesHelper { size: 3.0 }));
        let c = scene.add(
            SceneNode::new(SceneObject::mesh(
                Geometry::sphere(0.25),
                Material::phong(Color::BLACK),
            ))
            .named("Sphere1"),
        );
        let ids: Vec<NodeId> = scene.nodes().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn find_and_mutate_by_name() {
        let mut scene = Scene::new();
        let id = scene.add(
            SceneNode::new(SceneObject::AxesHelper { size: 1.0 })
                .named("Axes")
                .with_transform(Transform::from_position(Vec3::X)),
        );
        assert_eq!(scene.find_by_name("Axes"), Some(id));
        assert_eq!(scene.find_by_name("Missing"), None);

        scene.get_mut(id).unwrap().transform.position = Vec3::Y;
        assert_eq!(scene.get(id).unwrap().transform.position, Vec3::Y);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut scene = Scene::new();
        let a = scene.add(SceneNode::new(SceneObject::AxesHelper { size: 1.0 }));
        scene.remove(a);
        let b = scene.add(SceneNode::new(SceneObject::AxesHelper { size: 1.0 }));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 1);
    }
}
