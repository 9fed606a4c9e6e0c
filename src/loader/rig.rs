// JSON rig description: the small interchange format the viewer ships its
// sample avatars in.

use std::collections::{BTreeMap, HashMap};

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

use crate::avatar::skeleton::Bone;
use crate::avatar::{Character, ExpressionManager, HumanBone, Skeleton};
use crate::error::AvatarError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigBone {
    pub name: String,
    /// Name of the parent bone; `None` for roots.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Euler XYZ in radians.
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Explicit humanoid role. When absent the bone name itself is tried.
    #[serde(default)]
    pub humanoid: Option<HumanBone>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigDescription {
    pub name: String,
    pub bones: Vec<RigBone>,
    #[serde(default)]
    pub expressions: Vec<String>,
}

impl RigDescription {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AvatarError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn into_character(self, locator: &str) -> Result<Character, AvatarError> {
        let index: HashMap<&str, usize> = self
            .bones
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.as_str(), i))
            .collect();
        if index.len() != self.bones.len() {
            return Err(AvatarError::new("duplicate-bone-name").with_arg("rig", &self.name));
        }

        let mut bones = Vec::with_capacity(self.bones.len());
        let mut humanoid = BTreeMap::new();
        for (i, rig_bone) in self.bones.iter().enumerate() {
            let parent = match &rig_bone.parent {
                Some(name) => Some(*index.get(name.as_str()).ok_or_else(|| {
                    AvatarError::new("bad-bone-parent")
                        .with_arg("bone", &rig_bone.name)
                        .with_arg("parent", name)
                })?),
                None => None,
            };
            let [tx, ty, tz] = rig_bone.translation;
            let [rx, ry, rz] = rig_bone.rotation;
            let mut bone = Bone::new(&rig_bone.name, parent, glm::vec3(tx, ty, tz));
            bone.rotation = glm::vec3(rx, ry, rz);
            bones.push(bone);

            let role = rig_bone
                .humanoid
                .or_else(|| HumanBone::from_name(&rig_bone.name));
            if let Some(role) = role {
                // First bone claiming a role keeps it.
                humanoid.entry(role).or_insert(i);
            }
        }

        let skeleton = Skeleton::new(bones)?;

        Ok(Character::new(
            self.name,
            locator,
            skeleton,
            humanoid,
            ExpressionManager::new(self.expressions),
        ))
    }
}
