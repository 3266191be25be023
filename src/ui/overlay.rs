// src/ui/overlay.rs
//! ImGui overlay for the preview card
//!
//! Handles ImGui integration with wgpu and winit, and draws the card's
//! presentation shell on top of the 3D pass: a centered placeholder while
//! the model loads, and the title/description block along the bottom.

use imgui::{Condition, Context, FontConfig, FontSource, WindowFlags};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{event::Event, window::Window};

use crate::card::CardConfig;

/// ImGui overlay manager
///
/// Manages the ImGui context, platform integration, and rendering
/// pipeline for the card overlay. Uses locked DPI mode to prevent
/// automatic scaling conflicts.
pub struct CardOverlay {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
}

impl CardOverlay {
    /// Creates the overlay for a window
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Target texture format for rendering
    /// * `window` - Window for platform integration
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 16.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
        }
    }

    /// Updates ImGui's display size to match the render target
    ///
    /// Must be called when the host resizes so the overlay lays out
    /// against the new dimensions.
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Forwards a winit event to ImGui's input state
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) {
        self.platform
            .handle_event(self.context.io_mut(), window, event);
    }

    /// Builds and renders the overlay into the given color attachment
    ///
    /// Uses LoadOp::Load to preserve the 3D scene underneath.
    pub fn draw<F>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        run_ui: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        self.platform
            .prepare_frame(self.context.io_mut(), window)
            .expect("Failed to prepare frame");

        let ui = self.context.frame();
        run_ui(&ui);

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("overlay_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load, // Preserve 3D scene
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.renderer
            .render(draw_data, queue, device, &mut render_pass)
            .expect("Failed to render overlay");
    }
}

fn overlay_flags() -> WindowFlags {
    WindowFlags::NO_DECORATION
        | WindowFlags::NO_BACKGROUND
        | WindowFlags::NO_MOVE
        | WindowFlags::NO_INPUTS
}

/// Builds the card's UI for one frame: the loading placeholder while the
/// model is in flight, then the title/description block. The title
/// brightens while the pointer hovers the card.
pub fn draw_card(
    ui: &imgui::Ui,
    config: &CardConfig,
    loading: bool,
    hovering: bool,
    display_size: [f32; 2],
) {
    let [width, height] = display_size;

    if loading {
        ui.window("##loading")
            .flags(overlay_flags())
            .position([width * 0.5 - 70.0, height * 0.5 - 12.0], Condition::Always)
            .size([200.0, 40.0], Condition::Always)
            .build(|| {
                ui.text_colored([0.0, 0.82, 0.0, 1.0], "Loading model...");
            });
    }

    ui.window("##card-info")
        .flags(overlay_flags())
        .position([16.0, height - 72.0], Condition::Always)
        .size([width - 32.0, 64.0], Condition::Always)
        .build(|| {
            let title_color = if hovering {
                [1.0, 1.0, 1.0, 1.0]
            } else {
                [0.85, 0.85, 0.85, 1.0]
            };
            ui.text_colored(title_color, &config.title);
            if !config.description.is_empty() {
                ui.text_colored([0.53, 0.53, 0.53, 1.0], &config.description);
            }
        });
}
