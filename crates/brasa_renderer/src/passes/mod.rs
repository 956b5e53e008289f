pub mod opaque;
pub mod post_process;
pub mod ui;

pub use opaque::OpaquePass;
pub use post_process::{PostProcessPass, PostProcessSettings};
pub use ui::{NullOverlay, UiOverlay, UiPass};
