//! Standalone visualization window backed by winit.
//!
//! ```no_run
//! # use molsphere::Viewer;
//! Viewer::builder()
//!     .with_path("1crn.pdb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{path::PathBuf, sync::Arc};

use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    camera::{core::CameraUniform, fly::FlyCamera, input::InputHandler},
    chem::{pdb, InstanceBuilder, InstanceDescriptor},
    error::MolsphereError,
    gpu::render_context::RenderContext,
    input::KeyAction,
    mesh::{sphere, MeshGeometry},
    options::Options,
    renderer::{InstancedSphereRenderer, WgpuBackend},
    util::frame_timing::FrameTiming,
};

// ── Builder ──

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with defaults (title "molsphere", no path,
    /// default options).
    fn new() -> Self {
        Self {
            path: None,
            options: None,
            title: "molsphere".into(),
        }
    }

    /// Set the structure file path (`.pdb`).
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            path: self.path,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ──

/// A window that displays one structure as instanced spheres.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    path: Option<PathBuf>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Load the structure, open the window and run the event loop. Blocks
    /// until the window is closed.
    ///
    /// # Errors
    ///
    /// Structure, options or mesh errors before the window opens; GPU or
    /// renderer errors raised while setting up the window.
    pub fn run(self) -> Result<(), MolsphereError> {
        let path = self.path.ok_or_else(|| {
            MolsphereError::Viewer("no structure file given".into())
        })?;

        let atoms = pdb::parse_pdb_file(&path)?;
        let table = self.options.elements.build_table()?;
        let builder = InstanceBuilder::new(table);
        let instances = builder.build_all(&atoms);
        let mesh = sphere::generate(
            self.options.mesh.sector_count,
            self.options.mesh.stack_count,
        )?;
        log::info!(
            "{}: {} atoms, sphere mesh {} vertices / {} indices",
            path.display(),
            instances.len(),
            mesh.vertex_count(),
            mesh.index_count()
        );

        let event_loop = EventLoop::new()
            .map_err(|e| MolsphereError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            scene: None,
            window: None,
            options: self.options,
            instances,
            mesh: Some(mesh),
            title: self.title,
            error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| MolsphereError::Viewer(e.to_string()))?;

        app.error.map_or(Ok(()), Err)
    }
}

// ── Winit app ──

/// Everything that exists only while the window is open.
struct Scene {
    renderer: InstancedSphereRenderer<WgpuBackend>,
    camera: FlyCamera,
    input: InputHandler,
    timing: FrameTiming,
    uniform: CameraUniform,
}

/// Internal winit application handler.
struct ViewerApp {
    // Dropped before the window so GPU resources go first.
    scene: Option<Scene>,
    window: Option<Arc<Window>>,
    options: Options,
    instances: Vec<InstanceDescriptor>,
    mesh: Option<MeshGeometry>,
    title: String,
    error: Option<MolsphereError>,
}

impl ViewerApp {
    fn create_scene(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<Scene, MolsphereError> {
        let inner = window.inner_size();
        let size = (inner.width.max(1), inner.height.max(1));
        let context = pollster::block_on(RenderContext::new(
            Arc::clone(window),
            size,
            self.options.display.vsync,
        ))?;
        let aspect = context.aspect();

        let mut renderer = InstancedSphereRenderer::new(WgpuBackend::new(
            context,
            self.options.display.background,
        ));
        let mesh = self.mesh.take().ok_or_else(|| {
            MolsphereError::Viewer("sphere mesh already consumed".into())
        })?;
        renderer.initialize(mesh)?;

        let mut camera =
            FlyCamera::new(&self.options.camera, Vec3::ZERO, aspect);
        camera.frame_instances(&self.instances);

        let mut uniform = CameraUniform::new();
        uniform.ambient = self.options.display.ambient;
        uniform.shininess = self.options.display.shininess;

        Ok(Scene {
            renderer,
            camera,
            input: InputHandler::new(),
            timing: FrameTiming::new(),
            uniform,
        })
    }

    /// Release GPU buffers, then leave the event loop.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut scene) = self.scene.take() {
            scene.renderer.shutdown();
        }
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        let dt = scene.timing.tick();
        scene.camera.step(dt, scene.input.movement());
        scene.camera.write_uniform(&mut scene.uniform);
        scene.renderer.backend().update_camera(&scene.uniform);

        match scene.renderer.backend_mut().begin_frame() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                scene.renderer.backend().reconfigure();
                return;
            }
            Err(e) => {
                log::error!("surface error: {e:?}");
                return;
            }
        }

        if let Err(e) = scene.renderer.draw_instances(&self.instances) {
            log::error!("draw error: {e}");
        }
        if let Err(e) = scene.renderer.backend_mut().end_frame() {
            log::error!("present error: {e}");
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.error = Some(MolsphereError::Viewer(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        match self.create_scene(&window) {
            Ok(scene) => self.scene = Some(scene),
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.close(event_loop);
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                if let Some(scene) = &mut self.scene {
                    let backend = scene.renderer.backend_mut();
                    backend.resize(size.width, size.height);
                    scene.camera.resize(size.width, size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            other => {
                let Some(scene) = &mut self.scene else {
                    return;
                };
                let action = scene.input.handle_event(
                    &mut scene.camera,
                    &self.options.keybindings,
                    &other,
                );
                match action {
                    Some(KeyAction::ResetCamera) => scene.camera.reset(),
                    Some(KeyAction::Quit) => self.close(event_loop),
                    _ => {}
                }
            }
        }
    }
}
