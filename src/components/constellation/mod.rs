mod camera;
mod component;
mod generator;
mod pulse;
mod render;
mod state;
mod types;

pub use camera::{CameraConfig, CameraTarget};
pub use component::ConstellationCanvas;
pub use generator::GeneratorConfig;
pub use pulse::{DriverConfig, PulseConfig};
pub use types::StarEntry;
