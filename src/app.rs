use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    card::CardConfig,
    session::Session,
    ui::overlay::{draw_card, CardOverlay},
};

/// The runnable preview card: a winit application hosting one session
///
/// The window is the card's host element. Mounting (window creation)
/// starts a fresh [`Session`]; closing the window stops it, releasing
/// every GPU resource before the process continues shutting down.
pub struct VitrineApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    session: Option<Session>,
    overlay: Option<CardOverlay>,
    config: CardConfig,
}

impl VitrineApp {
    /// Create a new preview card application for the given config
    pub fn new(config: CardConfig) -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                session: None,
                overlay: None,
                config,
            },
        }
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(480, 360));

        if let Ok(window) = event_loop.create_window(attributes) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let session = Session::start(window_handle.clone(), &self.config);

            let mut overlay = CardOverlay::new(
                session.device(),
                session.queue(),
                session.surface_format(),
                &window_handle,
            );
            let size = window_handle.inner_size();
            overlay.update_display_size(size.width, size.height);

            self.session = Some(session);
            self.overlay = Some(overlay);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let AppState {
            window,
            session,
            overlay,
            config,
        } = self;

        let (Some(window), Some(session), Some(overlay)) =
            (window.as_ref(), session.as_mut(), overlay.as_mut())
        else {
            return;
        };

        match event {
            WindowEvent::CursorEntered { .. } => {
                session.set_hovering(true);
            }
            WindowEvent::CursorLeft { .. } => {
                session.set_hovering(false);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                session.resize(width, height);
                overlay.update_display_size(width, height);
            }
            WindowEvent::CloseRequested => {
                session.stop();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let loading = session.is_loading();
                let hovering = session.is_hovering();
                let size = window.inner_size();
                let display_size = [size.width as f32, size.height as f32];

                session.frame(Some(
                    |device: &wgpu::Device,
                     queue: &wgpu::Queue,
                     encoder: &mut wgpu::CommandEncoder,
                     color_attachment: &wgpu::TextureView| {
                        overlay.draw(device, queue, encoder, window, color_attachment, |ui| {
                            draw_card(ui, config, loading, hovering, display_size);
                        });
                    },
                ));
                return;
            }
            _ => (),
        }

        // Keep ImGui's input state in step with the host
        let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
            window_id,
            event,
        };
        overlay.handle_input(window, &ui_event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.as_mut() {
            session.stop();
        }
    }
}
