use std::sync::{Arc, Mutex};

use brasa_renderer::{PostProcessSettings, UiOverlay};

use crate::traits::BrasaApp;

/// Configuración inicial de la ventana y el motor.
#[derive(Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Cierra la aplicación con la tecla Escape.
    pub exit_on_escape: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Brasa Application".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            exit_on_escape: true,
        }
    }
}

/// El punto de entrada principal. Usa el patrón Builder para configurar la app.
pub struct App<A: BrasaApp> {
    config: AppConfig,
    app_state: A,
    overlay: Option<Box<dyn UiOverlay>>,
    post_settings: Arc<Mutex<PostProcessSettings>>,
}

impl<A: BrasaApp + 'static> App<A> {
    pub fn new(app_state: A) -> Self {
        Self {
            config: AppConfig::default(),
            app_state,
            overlay: None,
            post_settings: Arc::new(Mutex::new(PostProcessSettings::default())),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    /// Installs the immediate-mode GUI collaborator rendered by the UI pass.
    pub fn with_overlay(mut self, overlay: Box<dyn UiOverlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Ejecuta el bucle principal de la aplicación.
    pub fn run(self) {
        crate::runner::run_internal(
            self.config,
            self.app_state,
            self.overlay,
            self.post_settings,
        );
    }
}
