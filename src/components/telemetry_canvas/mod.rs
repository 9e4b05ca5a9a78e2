mod canvas;
mod component;
mod raf;

pub use canvas::{CanvasSurface, SurfaceError};
pub use component::TelemetryCanvas;
pub use raf::RafHost;
