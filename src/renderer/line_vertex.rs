use nalgebra_glm as glm;

use crate::avatar::expression::{BLINK, MOUTH_A};
use crate::avatar::{Character, HumanBone};

pub const GRID_COLOR: [f32; 3] = [0.25, 0.25, 0.28];
pub const BONE_COLOR: [f32; 3] = [0.95, 0.8, 0.35];
pub const FACE_COLOR: [f32; 3] = [0.9, 0.35, 0.4];

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub(crate) position: [f32; 3],
    pub(crate) color: [f32; 3],
}

impl LineVertex {
    pub fn new(position: glm::Vec3, color: [f32; 3]) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

fn segment(out: &mut Vec<LineVertex>, a: glm::Vec3, b: glm::Vec3, color: [f32; 3]) {
    out.push(LineVertex::new(a, color));
    out.push(LineVertex::new(b, color));
}

fn scaled(color: [f32; 3], k: f32) -> [f32; 3] {
    [
        (color[0] * k).min(1.0),
        (color[1] * k).min(1.0),
        (color[2] * k).min(1.0),
    ]
}

/// Floor grid on the XZ plane, `half_extent` metres each way.
pub fn grid_lines(half_extent: f32, step: f32) -> Vec<LineVertex> {
    let mut out = Vec::new();
    if step <= 0.0 {
        return out;
    }
    let count = (half_extent / step).round() as i32;
    for i in -count..=count {
        let t = i as f32 * step;
        segment(&mut out, glm::vec3(t, 0.0, -half_extent), glm::vec3(t, 0.0, half_extent), GRID_COLOR);
        segment(&mut out, glm::vec3(-half_extent, 0.0, t), glm::vec3(half_extent, 0.0, t), GRID_COLOR);
    }
    out
}

/// One segment per parent/child bone pair, tinted by scene brightness.
pub fn skeleton_lines(character: &Character, brightness: f32) -> Vec<LineVertex> {
    let color = scaled(BONE_COLOR, brightness);
    let mut out = Vec::new();
    for (a, b) in character.skeleton().segments() {
        segment(&mut out, a, b, color);
    }
    out
}

/// A face glyph in front of the head: eyes shut with `blink`, mouth opens with `a`.
pub fn face_lines(character: &Character) -> Vec<LineVertex> {
    let Some(head) = character
        .human_bone_world_position(HumanBone::Head)
        .or_else(|| character.human_bone_world_position(HumanBone::Neck))
    else {
        return Vec::new();
    };
    let blink = character.expressions().value(BLINK).unwrap_or(0.0);
    let mouth = character.expressions().value(MOUTH_A).unwrap_or(0.0);

    let mut out = Vec::new();
    let face = head + glm::vec3(0.0, 0.05, 0.09);
    let eye_half = 0.012 * (1.0 - blink);
    for side in [-1.0f32, 1.0] {
        let eye = face + glm::vec3(0.03 * side, 0.03, 0.0);
        segment(&mut out, eye - glm::vec3(0.01, 0.0, 0.0), eye + glm::vec3(0.01, 0.0, 0.0), FACE_COLOR);
        if eye_half > 0.0 {
            segment(&mut out, eye - glm::vec3(0.0, eye_half, 0.0), eye + glm::vec3(0.0, eye_half, 0.0), FACE_COLOR);
        }
    }

    let lips = face - glm::vec3(0.0, 0.03, 0.0);
    let gap = 0.02 * mouth;
    let half_width = glm::vec3(0.02, 0.0, 0.0);
    let upper = lips + glm::vec3(0.0, gap * 0.5, 0.0);
    let lower = lips - glm::vec3(0.0, gap * 0.5, 0.0);
    segment(&mut out, upper - half_width, upper + half_width, FACE_COLOR);
    segment(&mut out, lower - half_width, lower + half_width, FACE_COLOR);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::character::fixtures;

    #[test]
    fn grid_has_two_segments_per_step() {
        let grid = grid_lines(1.0, 0.5);
        // Five stations per axis, two lines each, two vertices per line.
        assert_eq!(grid.len(), 5 * 2 * 2);
        assert!(grid_lines(1.0, 0.0).is_empty());
    }

    #[test]
    fn closed_eyes_drop_the_vertical_strokes() {
        let mut c = fixtures::humanoid("hana");
        let open = face_lines(&c).len();
        c.expressions_mut().set_value(BLINK, 1.0);
        let shut = face_lines(&c).len();
        assert_eq!(open - shut, 4);
    }

    #[test]
    fn mouth_opens_with_the_a_channel() {
        let mut c = fixtures::humanoid("hana");
        c.expressions_mut().set_value(MOUTH_A, 1.0);
        let lines = face_lines(&c);
        let n = lines.len();
        let upper_y = lines[n - 4].position[1];
        let lower_y = lines[n - 2].position[1];
        assert!((upper_y - lower_y - 0.02).abs() < 1e-5);
    }

    #[test]
    fn skeleton_lines_cover_every_bone_link() {
        let c = fixtures::humanoid("hana");
        assert_eq!(skeleton_lines(&c, 1.0).len(), 4 * 2);
    }
}
