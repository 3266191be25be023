//! Session lifecycle management
//!
//! A [`Session`] is one complete rendering context bound to one mounted
//! card: it owns the render engine, the scene, the camera, the frame
//! clock, the interaction and viewport state, and the in-flight model
//! load. Created on mount, destroyed on unmount; a new mount always
//! creates a fresh session.
//!
//! The central correctness property: once [`Session::stop`] returns, no
//! asynchronous work (including an in-flight load) touches the host or
//! any released GPU resource, however the load and the stop race.

use std::path::PathBuf;
use std::sync::Arc;

use winit::window::Window;

use crate::{
    asset::loader::{LoadProgress, LoadToken, PendingLoad},
    card::CardConfig,
    gfx::{camera::PreviewCamera, render_engine::RenderEngine, scene::PreviewScene},
    session::{
        frame_loop::FrameLoop,
        interaction::{HoverSpin, InteractionTracker},
        viewport::Viewport,
    },
};

pub struct Session {
    engine: RenderEngine,
    scene: PreviewScene,
    camera: PreviewCamera,
    frame_loop: FrameLoop,
    frame_handle: u64,
    interaction: InteractionTracker,
    spin: HoverSpin,
    viewport: Viewport,
    token: LoadToken,
    pending: Option<PendingLoad>,
    loading: bool,
    stopped: bool,
}

impl Session {
    /// Creates a session bound to the window and begins the model load.
    ///
    /// A zero-size host is tolerated: initialization is deferred and
    /// frames are skipped until the first non-zero resize. The model path
    /// is not validated here; the loader reports any failure.
    pub fn start(window: Arc<Window>, config: &CardConfig) -> Session {
        let (width, height) = window.inner_size().into();
        let viewport = Viewport::new(width, height);

        let engine = pollster::block_on(RenderEngine::new(window, width, height));

        let aspect = if viewport.is_ready() {
            viewport.aspect()
        } else {
            1.0
        };
        let camera = PreviewCamera::new(config.camera, aspect);

        let token = LoadToken::new();
        let pending = PendingLoad::spawn(
            PathBuf::from(&config.model_path),
            config.target_size,
            config.camera.tilt(),
            token.clone(),
        );

        let mut frame_loop = FrameLoop::new();
        let frame_handle = frame_loop.begin();

        log::info!("session started, loading '{}'", config.model_path);

        Session {
            engine,
            scene: PreviewScene::new(),
            camera,
            frame_loop,
            frame_handle,
            interaction: InteractionTracker::new(),
            spin: HoverSpin::new(),
            viewport,
            token,
            pending: Some(pending),
            loading: true,
            stopped: false,
        }
    }

    /// Runs one frame: polls the load, advances playback and hover spin,
    /// uploads transforms, and renders the scene with the overlay on top.
    ///
    /// A no-op when the frame registration is stale (the session was
    /// stopped, even if the host already had a redraw in flight).
    pub fn frame<F>(&mut self, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        if !self.frame_loop.is_current(self.frame_handle) {
            return;
        }

        self.poll_load();

        let delta = self.frame_loop.tick();
        self.scene.advance(delta.as_secs_f32());
        self.spin.advance(self.interaction.is_hovering());

        if !self.viewport.is_ready() {
            log::debug!("skipping frame: viewport not ready");
            return;
        }

        self.camera.update_view_proj();
        self.scene
            .sync_transforms(self.engine.queue(), self.spin.angle());
        self.engine.update(self.camera.uniform);
        self.engine.render_frame(&self.scene, ui_callback);
    }

    /// Applies a host resize. A zero dimension leaves viewport, camera,
    /// and surface untouched. Safe at any point in the session's life.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.stopped {
            return;
        }
        if !self.viewport.apply(width, height) {
            log::debug!("ignoring zero-size resize {}x{}", width, height);
            return;
        }

        self.camera.resize_projection(width, height);
        self.engine.resize(width, height);
    }

    /// Records a pointer enter/leave signal
    pub fn set_hovering(&mut self, hovering: bool) {
        if self.stopped {
            return;
        }
        if hovering {
            self.interaction.enter();
        } else {
            self.interaction.leave();
        }
    }

    /// True until the first load resolves, success or failure
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_hovering(&self) -> bool {
        self.interaction.is_hovering()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Tears the session down. Idempotent; the first call synchronously
    /// cancels the frame registration, revokes the load token, drops the
    /// pending load, and destroys every GPU resource the session owns.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        self.frame_loop.cancel();
        self.token.revoke();
        self.pending = None;
        self.scene.release();
        self.engine.release();

        log::info!("session stopped");
    }

    fn poll_load(&mut self) {
        let Some(pending) = &mut self.pending else {
            return;
        };

        match pending.poll() {
            LoadProgress::Pending => {}
            LoadProgress::Ready((asset, placement)) => {
                self.pending = None;
                self.loading = false;

                log::info!(
                    "attached model '{}' ({} meshes, {} clips)",
                    asset.name,
                    asset.meshes.len(),
                    asset.clips.len()
                );
                self.scene.attach(
                    self.engine.device(),
                    self.engine.transform_layout(),
                    self.engine.material_layout(),
                    *asset,
                    placement,
                );
            }
            LoadProgress::Failed(err) => {
                self.pending = None;
                self.loading = false;
                log::warn!("model load failed: {}", err);
            }
            LoadProgress::Abandoned => {
                self.pending = None;
            }
        }
    }

    /// Device reference, for the overlay's renderer
    pub fn device(&self) -> &wgpu::Device {
        self.engine.device()
    }

    /// Queue reference, for the overlay's renderer
    pub fn queue(&self) -> &wgpu::Queue {
        self.engine.queue()
    }

    /// Surface format, for the overlay's renderer
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.engine.surface_format()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
