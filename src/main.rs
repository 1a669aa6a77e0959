//! Desktop host for the pyramid demo.
//!
//! Creates the window and OpenGL 3.3 core context (winit + glutin), loads
//! glow, and drives `RenderContext::render_frame` once per redraw.

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use std::ffi::CString;
use std::num::NonZeroU32;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use pyramid_gl::engine::logging::{init_logging, LoggingConfig};
use pyramid_gl::{DemoConfig, DemoError, RenderContext};

fn context_err(err: impl std::fmt::Display) -> DemoError {
    DemoError::Context(err.to_string())
}

/// Depth bits, then multisample count.
fn config_rank(config: &glutin::config::Config) -> (u8, u8) {
    (config.depth_size(), config.num_samples())
}

/// Deeper depth buffers win, then more samples. Ties keep the earlier config.
fn outranks(candidate: (u8, u8), best: (u8, u8)) -> bool {
    candidate > best
}

/// Window plus current GL context. Fields drop top to bottom, so the window
/// outlives the surface and context created from it.
struct GlState {
    render: Option<RenderContext<glow::Context>>,
    gl: glow::Context,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl GlState {
    fn create(event_loop: &ActiveEventLoop, config: &DemoConfig) -> Result<Self, DemoError> {
        let attributes = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
            .with_resizable(false);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes.clone()))
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|best, candidate| {
                        if outranks(config_rank(&candidate), config_rank(&best)) {
                            candidate
                        } else {
                            best
                        }
                    })
                    .expect("find_configs yields at least one config")
            })
            .map_err(context_err)?;

        let window = match window {
            Some(window) => window,
            None => glutin_winit::finalize_window(event_loop, attributes, &gl_config)
                .map_err(context_err)?,
        };
        let raw_handle = window.window_handle().map_err(context_err)?.as_raw();

        let [major, minor] = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_handle));

        let display = gl_config.display();
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(context_err)?;

        // The framebuffer can be larger than the requested size on HiDPI screens.
        let size = window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Err(DemoError::Context(format!(
                "window has an empty framebuffer ({}x{})",
                size.width, size.height
            )));
        };

        let surface_attributes =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_handle, width, height);
        let gl_surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(context_err)?;
        let gl_context = not_current.make_current(&gl_surface).map_err(context_err)?;

        if let Err(err) = gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN)) {
            log::warn!("vsync unavailable: {}", err);
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                CString::new(symbol)
                    .map(|name| display.get_proc_address(&name))
                    .unwrap_or(std::ptr::null())
            })
        };
        log::info!("OpenGL {}.{} core context created", major, minor);

        let render = RenderContext::new(&gl, config, (size.width, size.height))?;

        Ok(Self {
            render: Some(render),
            gl,
            gl_surface,
            gl_context,
            window,
        })
    }

    fn redraw(&mut self) {
        if let Some(render) = self.render.as_mut() {
            render.render_frame(&self.gl);
        }
        if let Err(err) = self.gl_surface.swap_buffers(&self.gl_context) {
            log::warn!("swap_buffers failed: {}", err);
        }
        self.window.request_redraw();
    }

    fn teardown(&mut self) {
        if let Some(render) = self.render.take() {
            render.destroy(&self.gl);
        }
    }
}

struct App {
    config: DemoConfig,
    state: Option<GlState>,
    error: Option<DemoError>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            state: None,
            error: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match GlState::create(event_loop, &self.config) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("{}", err);
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                if let Some(state) = self.state.as_mut() {
                    state.redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_mut() {
            state.teardown();
        }
        log::info!("event loop exiting");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match DemoConfig::load() {
        Ok(config) => config,
        Err(err) => {
            init_logging(LoggingConfig::default());
            log::error!("{}", err);
            return Err(err.into());
        }
    };
    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
    });
    log::info!("starting '{}'", config.window.title);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
