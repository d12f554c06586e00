//! Session wiring: one window, one sensor session, one scene renderer.

use crate::{
    config::Args,
    renderer::Renderer,
    scene::SceneRenderer,
    sensor::{MouseGyro, SensorSession},
};
use anyhow::Result;
use parallax::{OrientationIntegrator, SharedOrientation};
use std::sync::Arc;
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

pub struct App {
    pub scene: SceneRenderer,
    orientation: Arc<SharedOrientation>,
    session: Option<SensorSession>,
    /// `None` in demo mode; the synthetic gyroscope drives the view.
    mouse: Option<MouseGyro>,
    size: winit::dpi::PhysicalSize<u32>,
}

impl App {
    /// Starts a renderer session: orientation state is created fresh, the
    /// sensor listener registered, and the surface attached.
    pub async fn new(window: Arc<Window>, args: &Args) -> Result<Self> {
        let orientation = Arc::new(SharedOrientation::new());
        let mut session = SensorSession::start(OrientationIntegrator::new(orientation.clone()));

        let mouse = if args.demo {
            session.spawn_synthetic();
            None
        } else {
            Some(MouseGyro::new(args.mouse_sensitivity))
        };

        let renderer = Renderer::new(window).await?;
        let size = renderer.gfx.size;

        let mut scene = SceneRenderer::new(args.view_config(), orientation.clone());
        scene.on_surface_created(renderer);
        scene.on_surface_resized(size.width, size.height);

        Ok(Self {
            scene,
            orientation,
            session: Some(session),
            mouse,
            size,
        })
    }

    /// Forwards window events; returns `true` when the event was consumed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                if let (Some(mouse), Some(session)) = (&mut self.mouse, &self.session) {
                    if let Some(sample) = mouse.on_cursor_moved(position.x, position.y) {
                        session.push(sample);
                    }
                }
                true
            }
            WindowEvent::Resized(new_size) => {
                self.size = *new_size;
                self.scene.on_surface_resized(new_size.width, new_size.height);
                true
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.physical_key == PhysicalKey::Code(KeyCode::KeyR)
                    && event.state == ElementState::Pressed =>
            {
                log::info!("viewer position reset requested");
                self.orientation.request_reset();
                true
            }
            _ => false,
        }
    }

    /// Draws one frame with the latest published orientation.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.scene.on_frame()
    }

    /// Reconfigures the surface at its last known size (lost-surface path).
    pub fn reconfigure(&mut self) {
        self.scene.on_surface_resized(self.size.width, self.size.height);
    }

    /// Stops the session: the sensor listener is detached and joined before
    /// the scene is torn down, so no update races destroyed state.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.stop();
        }
        self.scene.stop();
    }
}
