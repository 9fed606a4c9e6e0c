use crate::avatar::{Character, HumanBone};

/// Upper-arm roll that brings a T-posed rig down into a relaxed stance.
pub const RESTING_ARM_DEGREES: f32 = 80.0;

/// Rotate the upper arms about Z (left -80°, right +80°) and refresh world
/// transforms. Missing arm bones are skipped.
pub fn apply_resting_pose(character: &mut Character) {
    let angle = RESTING_ARM_DEGREES.to_radians();
    character.set_human_bone_rotation_z(HumanBone::LeftUpperArm, -angle);
    character.set_human_bone_rotation_z(HumanBone::RightUpperArm, angle);
    character.skeleton_mut().update_world();
}
