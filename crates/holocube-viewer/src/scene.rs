//! Scene renderer: the graphics-surface lifecycle state machine and the
//! per-frame transform stack.

use crate::config::ViewConfig;
use crate::renderer::Renderer;
use glam::{Mat4, Vec3};
use parallax::{frustum, Distortion, SharedOrientation};
use std::sync::Arc;

/// Fixed distance from the viewport to the cube along -Z.
pub const CAMERA_DISTANCE: f32 = 40.0;

/// Graphics-surface lifecycle. Frames are only drawn once a surface exists;
/// a draw requested earlier is skipped, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePhase {
    Uninitialized,
    Created,
    Sized,
    Running,
}

/// Applies the frustum distortion each frame and issues the cube draw.
///
/// Reads orientation exclusively through the shared published-snapshot
/// cell; it never touches the integrator's live state.
pub struct SceneRenderer {
    phase: SurfacePhase,
    aspect_ratio: f32,
    config: ViewConfig,
    orientation: Arc<SharedOrientation>,
    renderer: Option<Renderer>,
}

impl SceneRenderer {
    pub fn new(config: ViewConfig, orientation: Arc<SharedOrientation>) -> Self {
        Self {
            phase: SurfacePhase::Uninitialized,
            aspect_ratio: 1.0,
            config,
            orientation,
            renderer: None,
        }
    }

    /// Attaches the GPU session. Fixed render state (clear color, culling)
    /// is baked into the pipeline; nothing is drawn yet.
    pub fn on_surface_created(&mut self, renderer: Renderer) {
        self.renderer = Some(renderer);
        if self.phase == SurfacePhase::Uninitialized {
            self.phase = SurfacePhase::Created;
        }
    }

    /// Recomputes the aspect ratio and reconfigures the swap chain. Valid
    /// any number of times; zero-sized updates are ignored.
    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect_ratio = width as f32 / height as f32;
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
        if self.phase == SurfacePhase::Created {
            self.phase = SurfacePhase::Sized;
        }
    }

    /// Draws one frame with the latest published orientation.
    pub fn on_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(renderer) = &mut self.renderer else {
            return Ok(());
        };
        self.phase = SurfacePhase::Running;

        let snap = self.orientation.snapshot();
        let distortion = frustum::compute(snap.pitch_rad, snap.yaw_rad, self.aspect_ratio);
        let proj = distortion.frustum.projection_matrix();
        let model = model_matrix(&distortion, &self.config);
        renderer.draw(proj, model)
    }

    /// Detaches the GPU session; further frames are no-ops.
    pub fn stop(&mut self) {
        self.renderer = None;
        self.phase = SurfacePhase::Uninitialized;
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}

/// Transform stack of the original effect, outermost first: counter-rotate
/// about a pivot offset along Z (so the cube holds its place in space as the
/// frustum shears), push the cube back to its fixed camera distance, scale,
/// then undo the rotation for the cube's own geometry.
fn model_matrix(distortion: &Distortion, config: &ViewConfig) -> Mat4 {
    let pivot = Vec3::new(0.0, 0.0, config.rot_axis_z_offset);
    let counter = Mat4::from_rotation_x(distortion.counter_pitch_rad)
        * Mat4::from_rotation_y(distortion.counter_yaw_rad);
    let forward = Mat4::from_rotation_x(-distortion.counter_pitch_rad)
        * Mat4::from_rotation_y(-distortion.counter_yaw_rad);

    Mat4::from_translation(pivot)
        * counter
        * Mat4::from_translation(-pivot)
        * Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
        * Mat4::from_scale(Vec3::splat(config.object_scale))
        * forward
}
