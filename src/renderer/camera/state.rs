use nalgebra_glm as glm;

use crate::settings::CameraSettings;

/// Where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: glm::Vec3,
    pub target: glm::Vec3,
}

/// Perspective camera with world +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: glm::Vec3,
    pub target: glm::Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(settings: &CameraSettings, aspect: f32) -> Self {
        let [px, py, pz] = settings.initial_position;
        let [tx, ty, tz] = settings.initial_target;
        Self {
            position: glm::vec3(px, py, pz),
            target: glm::vec3(tx, ty, tz),
            fov_degrees: settings.fov_degrees,
            aspect,
            near: settings.near,
            far: settings.far,
        }
    }

    /// Aspect ratio for a surface, falling back to square when it has no height.
    pub fn aspect_for(width: u32, height: u32) -> f32 {
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    pub fn look_at(&mut self, target: glm::Vec3) {
        self.target = target;
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.target,
        }
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.target = pose.target;
    }

    pub fn forward(&self) -> glm::Vec3 {
        let dir = self.target - self.position;
        if dir.norm() <= f32::EPSILON {
            glm::vec3(0.0, 0.0, -1.0)
        } else {
            glm::normalize(&dir)
        }
    }

    pub fn view(&self) -> glm::Mat4 {
        glm::look_at(&self.position, &self.target, &glm::vec3(0.0, 1.0, 0.0))
    }

    pub fn projection(&self) -> glm::Mat4 {
        glm::perspective(self.aspect, self.fov_degrees.to_radians(), self.near, self.far)
    }

    pub fn view_proj(&self) -> glm::Mat4 {
        self.projection() * self.view()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraSettings::default(), 1.0)
    }
}
