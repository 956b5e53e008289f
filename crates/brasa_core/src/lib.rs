/// `brasa_core` — CPU-side scene primitives shared by the renderer and apps.
///
/// # Module layout
///
/// | Module      | Responsibility                                     |
/// |-------------|----------------------------------------------------|
/// | `transform` | Position / rotation / scale with TRS matrix build  |
/// | `camera`    | Perspective camera: projection + view matrices     |
/// | `time`      | Per-frame `Time` snapshot and the `TimeClock`      |
pub mod camera;
pub mod time;
pub mod transform;

pub use camera::Camera;
pub use time::{Time, TimeClock};
pub use transform::Transform;

// glam math types — re-exported so callers don't need a direct dependency.
pub use glam;
