pub mod framer;
pub mod state;

pub use framer::CameraFramer;
pub use state::{Camera, CameraPose};
