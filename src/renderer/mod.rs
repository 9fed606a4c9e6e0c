pub mod camera;
pub mod line_vertex;
pub mod renderer;
pub mod scene;
pub mod surface;

pub use camera::{Camera, CameraFramer, CameraPose};
pub use renderer::{Overlay, Renderer};
pub use scene::{Light, NodeId, NodeKind, Scene};
pub use surface::{Frame, RenderSurface};
