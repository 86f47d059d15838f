use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use pixelblit::cli::Cli;
use pixelblit::{Color, FramePresenter, GraphicsError, WgpuBackend};

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    presenter: Option<FramePresenter<WgpuBackend>>,
    started: Instant,
}

impl App {
    fn new(cli: Cli) -> Self {
        Self {
            cli,
            window: None,
            presenter: None,
            started: Instant::now(),
        }
    }

    /// Demo pattern: a time-shifted XOR texture with a marker pixel at the
    /// center, exercising per-pixel writes across the whole framebuffer.
    fn compose_frame(
        presenter: &mut FramePresenter<WgpuBackend>,
        time: f32,
    ) -> Result<(), GraphicsError> {
        let width = presenter.surface().width();
        let height = presenter.surface().height();
        let shift = (time * 60.0) as u32;

        for y in 0..height {
            for x in 0..width {
                let v = ((x + shift) ^ y) as u8;
                presenter.put_pixel(x, y, Color::new(v, v.wrapping_mul(3), v.wrapping_mul(5)))?;
            }
        }
        presenter.put_pixel(width / 2, height / 2, Color::AZURE)?;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("pixelblit")
                    .with_resizable(false)
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.cli.width,
                        self.cli.height,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    eprintln!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let backend = match WgpuBackend::new(window.clone(), self.cli.width, self.cli.height) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Failed to initialize graphics backend:\n{}", e);
                    event_loop.exit();
                    return;
                }
            };

            let mut presenter =
                match FramePresenter::new(backend, self.cli.width, self.cli.height) {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("Failed to build presenter:\n{}", e);
                        event_loop.exit();
                        return;
                    }
                };
            presenter.set_vsync_interval(self.cli.vsync_interval);
            if self.cli.no_overlay {
                presenter.disable_overlay();
            }

            self.window = Some(window);
            self.presenter = Some(presenter);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let the overlay handle the event first
        if let Some(presenter) = &mut self.presenter {
            if presenter.backend_mut().handle_window_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => {
                if let Some(presenter) = &mut self.presenter {
                    match code {
                        KeyCode::F1 => {
                            if presenter.is_overlay_enabled() {
                                presenter.disable_overlay();
                            } else {
                                presenter.enable_overlay();
                            }
                        }
                        KeyCode::KeyV => {
                            if presenter.is_vsync_enabled() {
                                presenter.disable_vsync();
                            } else {
                                presenter.enable_vsync();
                            }
                        }
                        _ => {}
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let time = self.started.elapsed().as_secs_f32();
                if let Some(presenter) = &mut self.presenter {
                    let result = (|| -> Result<(), GraphicsError> {
                        presenter.begin_frame(true, Color::BLACK)?;
                        Self::compose_frame(presenter, time)?;
                        presenter.end_frame()
                    })();

                    match result {
                        Ok(()) => {}
                        Err(e @ GraphicsError::DeviceRemoved { .. }) => {
                            // The backend is unusable; a real host would
                            // rebuild it, the demo just quits.
                            eprintln!("{}", e);
                            event_loop.exit();
                        }
                        Err(e) => {
                            eprintln!("Render error:\n{}", e);
                            event_loop.exit();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli);

    println!("pixelblit - Controls: F1 overlay, V vsync, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
