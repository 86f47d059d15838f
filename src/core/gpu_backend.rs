use std::sync::Arc;

use winit::window::Window;

use crate::core::backend::{BackendFault, DeviceBackend};
use crate::core::diagnostics::DiagnosticLog;
use crate::core::overlay::DebugOverlay;
use crate::error::{CallSite, GraphicsError};

// One-time setup fault codes.
const CODE_SURFACE_CREATE: u32 = 0x01;
const CODE_NO_ADAPTER: u32 = 0x02;
const CODE_DEVICE_CREATE: u32 = 0x03;

// Per-frame fault codes.
const CODE_VALIDATION: u32 = 0x10;
const CODE_ACQUIRE: u32 = 0x11;
const CODE_NO_FRAME: u32 = 0x12;
const CODE_SURFACE_LOST: u32 = 0x13;
const CODE_OUT_OF_MEMORY: u32 = 0x14;

/// Swap-chain frame currently being recorded, between `draw` and `present`.
struct FrameInFlight {
    target: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

/// Production device backend over wgpu.
///
/// Owns the device, queue, window surface, the CPU-uploadable frame texture
/// and the fixed blit pipeline (point sampling, wrap addressing). All
/// resources are released by drop when the owning presenter goes away;
/// construction failure is fully fatal with no partial rollback needed.
pub struct WgpuBackend {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    texture: wgpu::Texture,
    overlay: DebugOverlay,
    frame: Option<FrameInFlight>,
    diagnostics: DiagnosticLog,
    vsync_on: bool,
    width: u32,
    height: u32,
}

impl WgpuBackend {
    /// Initialize the device, swap chain, frame texture and blit pipeline
    /// for a window. `width`/`height` are the CPU framebuffer dimensions;
    /// the quad stretches them across the whole window surface.
    pub fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| init_error(CODE_SURFACE_CREATE, format!("failed to create surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| init_error(CODE_NO_ADAPTER, format!("no compatible adapter: {e:?}")))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("pixelblit device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            experimental_features: Default::default(),
            trace: Default::default(),
        }))
        .map_err(|e| init_error(CODE_DEVICE_CREATE, format!("failed to create device: {e}")))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let texture = Self::create_frame_texture(&device, width, height);
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (pipeline, bind_group) =
            Self::create_blit_pipeline(&device, &texture_view, surface_format);

        let overlay = DebugOverlay::new(&window, &device, surface_format);

        log::info!("wgpu backend initialized ({}x{} framebuffer)", width, height);

        Ok(Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            pipeline,
            bind_group,
            texture,
            overlay,
            frame: None,
            diagnostics: DiagnosticLog::new(),
            vsync_on: true,
            width,
            height,
        })
    }

    /// Forward a window event to the overlay; returns true if consumed.
    pub fn handle_window_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.overlay.on_window_event(&self.window, event)
    }

    /// BGRA frame texture the CPU framebuffer uploads into. BGRA byte order
    /// matches the packed `0xAARRGGBB` pixel layout on little-endian.
    fn create_frame_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Bgra8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn create_blit_pipeline(
        device: &wgpu::Device,
        texture_view: &wgpu::TextureView,
        surface_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Point filtering and wrap addressing: the cut-and-paste pixel look,
        // not bilinear.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Texture Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
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
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    fn begin_capture(&self) {
        #[cfg(debug_assertions)]
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
    }

    /// Resolve the validation scope opened by `begin_capture`. Returns true
    /// if a diagnostic was captured for this call. No-op in release builds.
    #[cfg_attr(not(debug_assertions), allow(unused_variables))]
    fn end_capture(&mut self, context: &str) -> bool {
        #[cfg(debug_assertions)]
        {
            if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
                self.diagnostics.push(format!("{context}: {err}"));
                return true;
            }
        }
        false
    }
}

impl DeviceBackend for WgpuBackend {
    fn upload_full(&mut self, bytes: &[u8], row_pitch: u32) -> Result<(), BackendFault> {
        if row_pitch != self.width * 4 {
            return Err(BackendFault::new(
                CODE_VALIDATION,
                format!("row pitch {} does not match texture width {}", row_pitch, self.width),
            ));
        }
        let expected = (row_pitch as usize) * (self.height as usize);
        if bytes.len() != expected {
            return Err(BackendFault::new(
                CODE_VALIDATION,
                format!("framebuffer is {} bytes, expected {}", bytes.len(), expected),
            ));
        }

        self.begin_capture();
        self.queue.write_texture(
            self.texture.as_image_copy(),
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(row_pitch),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        if self.end_capture("upload_full") {
            return Err(BackendFault::new(
                CODE_VALIDATION,
                "validation failure during framebuffer upload",
            ));
        }
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32) -> Result<(), BackendFault> {
        let target = match self.surface.get_current_texture() {
            Ok(t) => t,
            // wgpu reports device-level loss at frame acquisition rather
            // than at present; classify it here so it still surfaces as
            // DeviceRemoved upstream.
            Err(wgpu::SurfaceError::Lost) => {
                return Err(BackendFault::device_removed(
                    CODE_SURFACE_LOST,
                    "presentation surface lost",
                ))
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(BackendFault::device_removed(
                    CODE_OUT_OF_MEMORY,
                    "out of device memory",
                ))
            }
            Err(e) => {
                return Err(BackendFault::new(
                    CODE_ACQUIRE,
                    format!("failed to acquire swap-chain frame: {e}"),
                ))
            }
        };

        let view = target
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.begin_capture();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..vertex_count, 0..1);
        }
        if self.end_capture("draw") {
            return Err(BackendFault::new(
                CODE_VALIDATION,
                "validation failure during quad draw",
            ));
        }

        self.frame = Some(FrameInFlight {
            target,
            view,
            encoder,
        });
        Ok(())
    }

    fn new_overlay_frame(&mut self) {
        self.overlay.new_frame(&self.window);
    }

    fn render_overlay(&mut self, stats: &str) -> Result<(), BackendFault> {
        let frame = self.frame.as_mut().ok_or_else(|| {
            BackendFault::new(CODE_NO_FRAME, "render_overlay called with no frame in flight")
        })?;

        self.overlay.render(
            &self.window,
            &self.device,
            &self.queue,
            &mut frame.encoder,
            &frame.view,
            [self.surface_config.width, self.surface_config.height],
            stats,
        );
        Ok(())
    }

    fn present(&mut self, sync_interval: u32) -> Result<(), BackendFault> {
        let frame = self.frame.take().ok_or_else(|| {
            BackendFault::new(CODE_NO_FRAME, "present called with no frame in flight")
        })?;

        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.target.present();

        // The swap chain has no per-present interval; a change across the
        // on/off boundary reconfigures the surface for the next frame.
        let want_vsync = sync_interval != 0;
        if want_vsync != self.vsync_on {
            self.surface_config.present_mode = if want_vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            };
            self.surface.configure(&self.device, &self.surface_config);
            self.vsync_on = want_vsync;
            log::debug!("vsync {}", if want_vsync { "enabled" } else { "disabled" });
        }

        Ok(())
    }

    fn take_diagnostics(&mut self) -> Vec<String> {
        self.diagnostics.drain()
    }
}

#[track_caller]
fn init_error(code: u32, message: String) -> GraphicsError {
    GraphicsError::BackendInit {
        code,
        message,
        info: Vec::new(),
        at: CallSite::here(),
    }
}
