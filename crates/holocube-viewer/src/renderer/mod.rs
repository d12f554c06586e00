//! The GPU side of a renderer session: surface context plus the single
//! cube pass.

pub mod context;
pub mod cube;

use self::{
    context::GfxContext,
    cube::{CubePipeline, SceneUniform},
};
use glam::Mat4;
use std::sync::Arc;
use winit::window::Window;

/// Converts clip-space coordinates from OpenGL conventions (z in [-1, 1])
/// to WebGPU conventions (z in [0, 1]). The frustum math is expressed in
/// the original fixed-function conventions and mapped here.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// Owns all rendering-related state for one surface.
pub struct Renderer {
    pub gfx: GfxContext,
    cube: CubePipeline,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let cube = CubePipeline::new(&gfx.device, gfx.config.format);
        Ok(Self { gfx, cube })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gfx
            .resize(winit::dpi::PhysicalSize::new(width, height));
    }

    /// Draws one frame: clear to black, then the cube with the given
    /// projection and model transforms.
    pub fn draw(&mut self, proj: Mat4, model: Mat4) -> Result<(), wgpu::SurfaceError> {
        let frame = self.gfx.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.cube.write_uniform(
            &self.gfx.queue,
            &SceneUniform {
                proj: (OPENGL_TO_WGPU_MATRIX * proj).to_cols_array_2d(),
                model: model.to_cols_array_2d(),
            },
        );

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.cube.draw(&mut pass);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
