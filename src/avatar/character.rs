use std::collections::BTreeMap;

use nalgebra_glm as glm;

use super::expression::ExpressionManager;
use super::humanoid::HumanBone;
use super::skeleton::Skeleton;
use crate::renderer::scene::NodeId;

/// A loaded, riggable humanoid.
///
/// Owned by the controller once installed; `root` is set while the character
/// is attached to the scene.
#[derive(Debug, Clone)]
pub struct Character {
    pub name: String,
    pub locator: String,
    skeleton: Skeleton,
    humanoid: BTreeMap<HumanBone, usize>,
    expressions: ExpressionManager,
    root: Option<NodeId>,
    age: f64,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        locator: impl Into<String>,
        skeleton: Skeleton,
        humanoid: BTreeMap<HumanBone, usize>,
        expressions: ExpressionManager,
    ) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            skeleton,
            humanoid,
            expressions,
            root: None,
            age: 0.0,
        }
    }

    /// Advance internal animation state by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        self.age += f64::from(delta);
        self.skeleton.update_world();
    }

    /// Seconds of animation this character has been advanced through.
    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn human_bone(&self, bone: HumanBone) -> Option<usize> {
        self.humanoid.get(&bone).copied()
    }

    pub fn human_bone_world_position(&self, bone: HumanBone) -> Option<glm::Vec3> {
        self.human_bone(bone)
            .and_then(|idx| self.skeleton.world_position(idx))
    }

    /// Overwrite the Z Euler angle of a humanoid bone, keeping X and Y.
    pub fn set_human_bone_rotation_z(&mut self, bone: HumanBone, radians: f32) -> bool {
        let Some(idx) = self.human_bone(bone) else {
            return false;
        };
        match self.skeleton.bone_mut(idx) {
            Some(b) => {
                b.rotation.z = radians;
                true
            }
            None => false,
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn expressions(&self) -> &ExpressionManager {
        &self.expressions
    }

    pub fn expressions_mut(&mut self) -> &mut ExpressionManager {
        &mut self.expressions
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub(crate) fn take_root(&mut self) -> Option<NodeId> {
        self.root.take()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::avatar::expression::{BLINK, MOUTH_A};
    use crate::avatar::skeleton::Bone;

    /// Small upright humanoid whose head sits at (0, 1.5, 0).
    pub fn humanoid(name: &str) -> Character {
        let bones = vec![
            Bone::new("J_Hips", None, glm::vec3(0.0, 1.0, 0.0)),
            Bone::new("J_Neck", Some(0), glm::vec3(0.0, 0.4, 0.0)),
            Bone::new("J_Head", Some(1), glm::vec3(0.0, 0.1, 0.0)),
            Bone::new("J_L_UpperArm", Some(0), glm::vec3(0.2, 0.35, 0.0)),
            Bone::new("J_R_UpperArm", Some(0), glm::vec3(-0.2, 0.35, 0.0)),
        ];
        let humanoid = BTreeMap::from([
            (HumanBone::Hips, 0),
            (HumanBone::Neck, 1),
            (HumanBone::Head, 2),
            (HumanBone::LeftUpperArm, 3),
            (HumanBone::RightUpperArm, 4),
        ]);
        Character::new(
            name,
            format!("test://{name}"),
            Skeleton::new(bones).unwrap(),
            humanoid,
            ExpressionManager::new([BLINK, MOUTH_A]),
        )
    }
}
