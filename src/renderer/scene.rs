use nalgebra_glm as glm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
        /// Unit vector pointing from the scene toward the light.
        direction: glm::Vec3,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Light(Light),
    CharacterRoot { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
}

/// Flat scene graph: top-level nodes only; each character root stands in for
/// that character's whole subtree.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(SceneNode { id, kind });
        id
    }

    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.nodes.len() != before
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Light(light) => Some(light),
            NodeKind::CharacterRoot { .. } => None,
        })
    }

    pub fn character_roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter_map(|n| match n.kind {
            NodeKind::CharacterRoot { .. } => Some(n.id),
            NodeKind::Light(_) => None,
        })
    }

    /// Ambient white (0.7) and a white key light (2.5) from normalize(1, 1, 1).
    pub fn add_default_lights(&mut self) {
        self.add(NodeKind::Light(Light::Ambient {
            color: [1.0, 1.0, 1.0],
            intensity: 0.7,
        }));
        self.add(NodeKind::Light(Light::Directional {
            color: [1.0, 1.0, 1.0],
            intensity: 2.5,
            direction: glm::normalize(&glm::vec3(1.0, 1.0, 1.0)),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_removal_is_exact() {
        let mut scene = Scene::new();
        scene.add_default_lights();
        let a = scene.add(NodeKind::CharacterRoot { name: "a".into() });
        let b = scene.add(NodeKind::CharacterRoot { name: "b".into() });
        assert_ne!(a, b);
        assert!(scene.remove(a));
        assert!(!scene.remove(a));
        assert_eq!(scene.character_roots().collect::<Vec<_>>(), vec![b]);
        assert_eq!(scene.lights().count(), 2);
    }
}
