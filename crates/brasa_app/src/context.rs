//! The context handed to every [`crate::BrasaApp`] callback.

use std::sync::Mutex;

use brasa_core::Time;
use brasa_renderer::{Assets, PostProcessSettings, Renderer, Scene};

/// Mutable view over the engine state for the duration of one callback.
pub struct AppContext<'a> {
    pub renderer: &'a mut Renderer,
    pub scene: &'a mut Scene,
    pub assets: &'a mut Assets,
    /// Post-processing configuration read by the post pass each frame.
    pub post_settings: &'a Mutex<PostProcessSettings>,
    pub time: Time,
    pub window_size: (u32, u32),
    pub(crate) exit_requested: bool,
}

impl AppContext<'_> {
    /// Asks the runner to shut the application down after this callback.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}
