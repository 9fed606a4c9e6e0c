// Auto-framing: put the camera just in front of a freshly loaded character's head.

use nalgebra_glm as glm;

use super::state::{Camera, CameraPose};
use crate::avatar::{Character, HumanBone};
use crate::error::AvatarError;
use crate::settings::CameraSettings;

pub struct CameraFramer {
    offset: glm::Vec3,
}

impl CameraFramer {
    pub fn new(offset: glm::Vec3) -> Self {
        Self { offset }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        let [x, y, z] = settings.head_offset;
        Self::new(glm::vec3(x, y, z))
    }

    pub fn offset(&self) -> glm::Vec3 {
        self.offset
    }

    /// Aim the camera at the head (neck as fallback) from `head + offset`.
    /// When neither bone exists the camera is left untouched.
    pub fn frame(&self, camera: &mut Camera, character: &Character) -> Result<CameraPose, AvatarError> {
        let head = character
            .human_bone_world_position(HumanBone::Head)
            .or_else(|| character.human_bone_world_position(HumanBone::Neck))
            .ok_or_else(|| {
                AvatarError::new("missing-head-bone").with_arg("character", &character.name)
            })?;

        let pose = CameraPose {
            position: head + self.offset,
            target: head,
        };
        camera.set_pose(pose);
        Ok(pose)
    }
}

impl Default for CameraFramer {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}
