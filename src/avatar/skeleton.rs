// Bone hierarchy with cached world transforms.
// Parents are resolved before children; every node owns a plain local TRS.

use crate::error::AvatarError;
use nalgebra_glm as glm;

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    pub translation: glm::Vec3,
    /// Euler angles in radians, applied in X, Y, Z order.
    pub rotation: glm::Vec3,
    pub scale: glm::Vec3,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<usize>, translation: glm::Vec3) -> Self {
        Self {
            name: name.into(),
            parent,
            translation,
            rotation: glm::vec3(0.0, 0.0, 0.0),
            scale: glm::vec3(1.0, 1.0, 1.0),
        }
    }

    pub fn local_matrix(&self) -> glm::Mat4 {
        let r = glm::rotation(self.rotation.x, &glm::vec3(1.0, 0.0, 0.0))
            * glm::rotation(self.rotation.y, &glm::vec3(0.0, 1.0, 0.0))
            * glm::rotation(self.rotation.z, &glm::vec3(0.0, 0.0, 1.0));
        glm::translation(&self.translation) * r * glm::scaling(&self.scale)
    }
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
    world: Vec<glm::Mat4>,
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> Result<Self, AvatarError> {
        for (idx, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= bones.len() {
                    return Err(AvatarError::new("bad-bone-parent")
                        .with_arg("bone", &bone.name)
                        .with_arg("parent", parent));
                }
            }
            // A chain longer than the bone count can only be a cycle.
            let mut cursor = bone.parent;
            let mut steps = 0;
            while let Some(p) = cursor {
                steps += 1;
                if p == idx || steps > bones.len() {
                    return Err(AvatarError::new("bone-cycle").with_arg("bone", &bone.name));
                }
                cursor = bones[p].parent;
            }
        }

        let mut skeleton = Self {
            world: vec![glm::Mat4::identity(); bones.len()],
            bones,
        };
        skeleton.update_world();
        Ok(skeleton)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn bone_mut(&mut self, index: usize) -> Option<&mut Bone> {
        self.bones.get_mut(index)
    }

    /// Recompute every world matrix from the local transforms.
    pub fn update_world(&mut self) {
        let mut ready = vec![false; self.bones.len()];
        for i in 0..self.bones.len() {
            self.calc_world(i, &mut ready);
        }
    }

    fn calc_world(&mut self, index: usize, ready: &mut [bool]) {
        if ready[index] {
            return;
        }
        let local = self.bones[index].local_matrix();
        self.world[index] = match self.bones[index].parent {
            Some(parent) => {
                self.calc_world(parent, ready);
                self.world[parent] * local
            }
            None => local,
        };
        ready[index] = true;
    }

    pub fn world_matrix(&self, index: usize) -> Option<&glm::Mat4> {
        self.world.get(index)
    }

    pub fn world_position(&self, index: usize) -> Option<glm::Vec3> {
        self.world
            .get(index)
            .map(|m| glm::vec3(m[(0, 3)], m[(1, 3)], m[(2, 3)]))
    }

    /// Parent/child position pairs, one per bone that has a parent.
    pub fn segments(&self) -> Vec<(glm::Vec3, glm::Vec3)> {
        self.bones
            .iter()
            .enumerate()
            .filter_map(|(i, bone)| {
                let parent = bone.parent?;
                Some((self.world_position(parent)?, self.world_position(i)?))
            })
            .collect()
    }
}
