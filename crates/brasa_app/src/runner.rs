use std::sync::{Arc, Mutex};

use brasa_core::TimeClock;
use brasa_renderer::{Assets, NullOverlay, PostProcessSettings, Scene, UiOverlay};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::builder::AppConfig;
use crate::context::AppContext;
use crate::graphics::GraphicsState;
use crate::traits::BrasaApp;

struct EngineState {
    graphics: GraphicsState,
    scene: Scene,
    assets: Assets,
}

struct Runner<A: BrasaApp> {
    app: A,
    config: AppConfig,
    overlay: Option<Box<dyn UiOverlay>>,
    post_settings: Arc<Mutex<PostProcessSettings>>,
    window: Option<Arc<Window>>,
    state: Option<EngineState>,
    window_size: (u32, u32),
    clock: TimeClock,
    closed: bool,
}

impl<A: BrasaApp> Runner<A> {
    fn new(
        app: A,
        config: AppConfig,
        overlay: Option<Box<dyn UiOverlay>>,
        post_settings: Arc<Mutex<PostProcessSettings>>,
    ) -> Self {
        let window_size = (config.width, config.height);
        Self {
            app,
            config,
            overlay,
            post_settings,
            window: None,
            state: None,
            window_size,
            clock: TimeClock::new(),
            closed: false,
        }
    }

    /// Invokes `on_close` exactly once, then stops the event loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if !self.closed {
            if let Some(state) = &mut self.state {
                let mut ctx = AppContext {
                    renderer: &mut state.graphics.renderer,
                    scene: &mut state.scene,
                    assets: &mut state.assets,
                    post_settings: &self.post_settings,
                    time: self.clock.peek(),
                    window_size: self.window_size,
                    exit_requested: false,
                };
                self.app.on_close(&mut ctx);
            }
            self.closed = true;
        }
        event_loop.exit();
    }
}

impl<A: BrasaApp> ApplicationHandler for Runner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .expect("failed to create window"),
        );

        let overlay = self.overlay.take().unwrap_or_else(|| Box::new(NullOverlay));
        let graphics = pollster::block_on(GraphicsState::new(
            window.clone(),
            self.config.width,
            self.config.height,
            self.config.vsync,
            overlay,
            self.post_settings.clone(),
        ))
        .expect("failed to initialise the graphics pipeline");

        let mut state = EngineState {
            graphics,
            scene: Scene::new(),
            assets: Assets::new(),
        };

        let mut ctx = AppContext {
            renderer: &mut state.graphics.renderer,
            scene: &mut state.scene,
            assets: &mut state.assets,
            post_settings: &self.post_settings,
            time: self.clock.peek(),
            window_size: self.window_size,
            exit_requested: false,
        };
        self.app.on_load(&mut ctx);
        let exit = ctx.exit_requested;

        self.window = Some(window);
        self.state = Some(state);

        if exit {
            self.shutdown(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } if self.config.exit_on_escape => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                self.window_size = (size.width, size.height);
                if let Some(state) = &mut self.state {
                    state.graphics.renderer.resize(size.width, size.height);
                    let mut ctx = AppContext {
                        renderer: &mut state.graphics.renderer,
                        scene: &mut state.scene,
                        assets: &mut state.assets,
                        post_settings: &self.post_settings,
                        time: self.clock.peek(),
                        window_size: self.window_size,
                        exit_requested: false,
                    };
                    self.app.on_resize(self.window_size, &mut ctx);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.closed {
            return;
        }
        let Some(state) = &mut self.state else {
            return;
        };

        let time = self.clock.tick();
        let mut ctx = AppContext {
            renderer: &mut state.graphics.renderer,
            scene: &mut state.scene,
            assets: &mut state.assets,
            post_settings: &self.post_settings,
            time,
            window_size: self.window_size,
            exit_requested: false,
        };

        self.app.on_update(time.delta, &mut ctx);
        self.app.on_render(time.delta, &mut ctx);

        if ctx.exit_requested {
            self.shutdown(event_loop);
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

pub fn run_internal<A: BrasaApp + 'static>(
    config: AppConfig,
    app: A,
    overlay: Option<Box<dyn UiOverlay>>,
    post_settings: Arc<Mutex<PostProcessSettings>>,
) {
    crate::logging::init();

    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = Runner::new(app, config, overlay, post_settings);
    if let Err(e) = event_loop.run_app(&mut runner) {
        log::error!("event loop terminated with an error: {e}");
    }
}
