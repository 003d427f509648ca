use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use control::{FrameStatus, KeyListener, Modifiers, RenderSurface, Scene, SurfaceError, TextLine};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowBuilder;

use crate::geometry::{Mesh, Vertex};
use crate::input::{map_key, map_modifiers};

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.06,
    g: 0.06,
    b: 0.08,
    a: 1.0,
};

/// Vertices the buffer holds before its first reallocation.
const INITIAL_VERTEX_CAPACITY: usize = 16 * 1024;

/// Window that draws [`Scene`]s with the text overlay and forwards keyboard
/// input to the control session.
///
/// Events are pumped once per [`RenderSurface::present`] call, so key
/// handlers always run between ticks.
pub struct Viewer {
    event_loop: EventLoop<()>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    mesh: Mesh,
    text_lines: Option<Vec<TextLine>>,
    modifiers: Modifiers,
}

impl Viewer {
    /// Opens a window titled `title` and prepares the drawing pipeline.
    pub fn new(title: &str) -> Result<Self> {
        let event_loop = EventLoop::new().context("create event loop")?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(800, 800))
                .build(&event_loop)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to get adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
            },
            None,
        ))
        .context("failed to request device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .context("surface reports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("viewer shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Viewer Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Viewer Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        tracing::info!(width = config.width, height = config.height, ?format, "viewer ready");

        Ok(Self {
            event_loop,
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            mesh: Mesh::new(),
            text_lines: None,
            modifiers: Modifiers::NONE,
        })
    }

    /// Drains pending window events, dispatching key presses and releases to
    /// `input`. Returns `true` once the window has been closed.
    fn pump(&mut self, input: &mut dyn KeyListener) -> bool {
        let mut events = Vec::new();
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, elwt| {
                if let Event::WindowEvent { event, .. } = event {
                    if matches!(event, WindowEvent::CloseRequested) {
                        elwt.exit();
                    }
                    events.push(event);
                }
            });

        let mut closed = matches!(status, PumpStatus::Exit(_));
        for event in events {
            match event {
                WindowEvent::CloseRequested => closed = true,
                WindowEvent::Resized(size) => self.resize(size),
                WindowEvent::ModifiersChanged(modifiers) => {
                    self.modifiers = map_modifiers(modifiers.state());
                }
                WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                    let key = map_key(event.physical_key);
                    match event.state {
                        ElementState::Pressed => input.on_press(key, self.modifiers),
                        ElementState::Released => input.on_release(key, self.modifiers),
                    }
                }
                _ => {}
            }
        }
        closed
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        tracing::debug!(width = size.width, height = size.height, "surface resized");
    }

    fn upload(&mut self) {
        let bytes: &[u8] = bytemuck::cast_slice(self.mesh.vertices());
        if bytes.is_empty() {
            return;
        }
        if self.vertex_buffer.size() < bytes.len() as u64 {
            let capacity = self.mesh.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, capacity);
            tracing::debug!(capacity, "vertex buffer grown");
        }
        self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
    }

    fn draw(&mut self) -> Result<(), SurfaceError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(SurfaceError::backend(err)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let vertex_count = u32::try_from(self.mesh.len()).map_err(SurfaceError::backend)?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if vertex_count > 0 {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                rpass.draw(0..vertex_count, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl RenderSurface for Viewer {
    fn text_lines(&self) -> Option<&[TextLine]> {
        self.text_lines.as_deref()
    }

    fn push_text_line(&mut self, line: TextLine) {
        self.text_lines.get_or_insert_with(Vec::new).push(line);
    }

    fn text_line_mut(&mut self, index: usize) -> Option<&mut TextLine> {
        self.text_lines.as_mut()?.get_mut(index)
    }

    fn present(
        &mut self,
        scene: &Scene,
        input: &mut dyn KeyListener,
    ) -> Result<FrameStatus, SurfaceError> {
        if self.pump(input) {
            tracing::info!("viewer window closed");
            return Ok(FrameStatus::Closed);
        }

        let (width, height) = (self.config.width, self.config.height);
        self.mesh.clear();
        self.mesh.push_scene(scene, width, height);
        if let Some(lines) = &self.text_lines {
            self.mesh.push_text(lines, width, height);
        }
        self.upload();
        self.draw()?;
        Ok(FrameStatus::Presented)
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
