use super::camera::Camera;
use super::scene::Scene;
use crate::avatar::Character;
use crate::error::AvatarError;

/// Everything a backend needs to draw one frame.
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    /// Present only while its root is attached to `scene`.
    pub character: Option<&'a Character>,
}

/// A drawable target. Resizing is the backend's own business.
pub trait RenderSurface {
    /// Pixel dimensions, queried once at initialization.
    fn size(&self) -> (u32, u32);

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), AvatarError>;
}
