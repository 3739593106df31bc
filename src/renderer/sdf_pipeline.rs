//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::error::RenderInitError;
use crate::sim::Arena;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    time: f32,            // offset 8
    running: u32,         // offset 12 - 1 while a session counts down
    arena_size: [f32; 2], // offset 16
    ball_pos: [f32; 2],   // offset 24
    ball_radius: f32,     // offset 32
    ball_speed: f32,      // offset 36
    countdown: f32,       // offset 40 - remaining / duration, 0 when idle
    _pad: f32,            // pad to 48 bytes
}

/// Per-frame inputs besides the arena
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInfo {
    /// ms since page load (requestAnimationFrame timestamp)
    pub time_ms: f64,
    pub running: bool,
    pub remaining_secs: u32,
    pub duration_secs: u32,
}

impl Globals {
    fn new(size: (u32, u32), arena: &Arena, frame: &FrameInfo) -> Self {
        let countdown = if frame.running && frame.duration_secs > 0 {
            (frame.remaining_secs as f32 / frame.duration_secs as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            resolution: [size.0 as f32, size.1 as f32],
            // time is ms since page load, convert to seconds
            time: (frame.time_ms / 1000.0) as f32,
            running: u32::from(frame.running),
            arena_size: arena.size.to_array(),
            ball_pos: arena.ball.pos.to_array(),
            ball_radius: arena.ball.radius,
            ball_speed: arena.ball.speed(),
            countdown,
            _pad: 0.0,
        }
    }
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderInitError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let config = surface_config(&surface_caps, width, height)?;
        log::info!("Using surface format: {:?}", config.format);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::new(
                (width, height),
                &Arena::default(),
                &FrameInfo::default(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Update the globals from the arena and render
    pub fn render(&mut self, arena: &Arena, frame: &FrameInfo) -> Result<(), wgpu::SurfaceError> {
        let globals = Globals::new(self.size, arena, frame);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Pick a surface configuration, preferring an sRGB format
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    width: u32,
    height: u32,
) -> Result<wgpu::SurfaceConfiguration, RenderInitError> {
    let format = caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or(caps.formats.first())
        .copied()
        .ok_or(RenderInitError::NoSurfaceFormat)?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .ok_or(RenderInitError::NoAlphaMode)?;

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_surface_config_rejects_empty_caps() {
        let caps = wgpu::SurfaceCapabilities::default();
        assert!(matches!(
            surface_config(&caps, 800, 600),
            Err(RenderInitError::NoSurfaceFormat)
        ));

        let mut caps = wgpu::SurfaceCapabilities::default();
        caps.formats = vec![wgpu::TextureFormat::Bgra8Unorm];
        assert!(matches!(
            surface_config(&caps, 800, 600),
            Err(RenderInitError::NoAlphaMode)
        ));
    }

    #[test]
    fn test_surface_config_prefers_srgb() {
        let mut caps = wgpu::SurfaceCapabilities::default();
        caps.formats = vec![
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        caps.alpha_modes = vec![wgpu::CompositeAlphaMode::Opaque];
        let config = surface_config(&caps, 800, 600).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
        assert_eq!((config.width, config.height), (800, 600));

        // Falls back to the first format when none is sRGB
        caps.formats = vec![wgpu::TextureFormat::Rgba8Unorm];
        let config = surface_config(&caps, 1, 1).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn test_globals_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<Globals>(), 48);
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
    }

    #[test]
    fn test_idle_frame() {
        let arena = Arena::default();
        let g = Globals::new((1000, 600), &arena, &FrameInfo::default());
        assert_eq!(g.running, 0);
        assert_eq!(g.countdown, 0.0);
        assert_eq!(g.ball_pos, [400.0, 400.0]);
        assert_eq!(g.ball_radius, 50.0);
        assert_eq!(g.arena_size, [1000.0, 600.0]);
    }

    #[test]
    fn test_running_frame() {
        let mut arena = Arena::default();
        arena.ball.vel = Vec2::new(300.0, 400.0);
        let frame = FrameInfo {
            time_ms: 2500.0,
            running: true,
            remaining_secs: 30,
            duration_secs: 120,
        };
        let g = Globals::new((800, 480), &arena, &frame);
        assert_eq!(g.running, 1);
        assert_eq!(g.time, 2.5);
        assert_eq!(g.countdown, 0.25);
        assert_eq!(g.ball_speed, 500.0);
        assert_eq!(g.resolution, [800.0, 480.0]);
    }
}
