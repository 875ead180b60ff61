use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, Touch, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, CoalescingScheduler, FrameRequests};
use crate::device::{Gpu, GpuInit};
use crate::event::{Event, KeyDirection, KeyEvent, Lifecycle};
use crate::gfx::GpuGraphics;
use crate::input::{PointerTracker, RawPointer, TouchPhase};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and feeds its events to `app` until the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        // Frames are driven by FrameScheduler requests only.
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(config, gpu_init, app);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    pointer: PointerTracker,
    requests: FrameRequests,
    visible: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gfx: GpuGraphics<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    exit_requested: bool,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            exit_requested: false,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            pointer: PointerTracker::new(),
            requests: FrameRequests::new(),
            visible: false,
            window,
            gfx_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .map(GpuGraphics::new)
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()
    }

    /// Delivers a visibility crossing; repeated states are ignored.
    fn set_visible(&mut self, visible: bool) {
        let app = &mut self.app;
        let Some(entry) = self.entry.as_mut() else { return };

        entry.with_mut(|fields| {
            if *fields.visible == visible {
                return;
            }
            *fields.visible = visible;

            let window = fields.window;
            let mut scheduler = CoalescingScheduler::new(fields.requests, || window.request_redraw());

            if visible {
                log::info!("surface visible");
                app.on_event(Event::Lifecycle(Lifecycle::Visible), fields.gfx, &mut scheduler);
                let size = fields.gfx.size();
                app.on_event(Event::Resize(size), fields.gfx, &mut scheduler);
            } else {
                log::info!("surface hidden");
                app.on_event(Event::Lifecycle(Lifecycle::Invisible), fields.gfx, &mut scheduler);
            }
        });
    }

    fn dispatch(&mut self, event: Event) {
        let app = &mut self.app;
        let Some(entry) = self.entry.as_mut() else { return };

        entry.with_mut(|fields| {
            let window = fields.window;
            let mut scheduler = CoalescingScheduler::new(fields.requests, || window.request_redraw());
            app.on_event(event, fields.gfx, &mut scheduler);
        });
    }

    fn dispatch_pointer(&mut self, raw: RawPointer) {
        let Some(entry) = self.entry.as_mut() else { return };
        let translated = entry.with_pointer_mut(|p| p.apply(raw));
        if let Some(ev) = translated {
            self.dispatch(Event::Pointer(ev));
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.set_visible(false);
        self.entry = None;
        self.exit_requested = true;
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_none() {
            match self.create_window_entry(event_loop) {
                Ok(entry) => self.entry = Some(entry),
                Err(e) => {
                    self.fail(event_loop, e);
                    return;
                }
            }
        }

        self.set_visible(true);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // Mobile platforms destroy the native surface on suspend.
        self.set_visible(false);
        self.entry = None;
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested || self.entry.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.close(event_loop),

            WindowEvent::Occluded(occluded) => self.set_visible(!occluded),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gfx_mut(|gfx| gfx.resize(new_size));
                }
                self.dispatch(Event::Resize(new_size.into()));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(entry) = self.entry.as_mut() else { return };
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gfx_mut(|gfx| gfx.resize(new_size));
                self.dispatch(Event::Resize(new_size.into()));
            }

            WindowEvent::RedrawRequested => {
                let Some(entry) = self.entry.as_mut() else { return };
                let external = entry.with_requests_mut(|r| r.take_paint());
                self.dispatch(Event::Paint { external });

                let fatal = self
                    .entry
                    .as_ref()
                    .is_some_and(|e| e.borrow_gfx().is_fatal());
                if fatal {
                    self.fail(event_loop, anyhow::anyhow!("GPU surface lost"));
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.dispatch_pointer(RawPointer::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::CursorLeft { .. } => self.dispatch_pointer(RawPointer::CursorLeft),

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dispatch_pointer(RawPointer::PrimaryButton {
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::Touch(Touch {
                id, phase, location, ..
            }) => {
                self.dispatch_pointer(RawPointer::Touch {
                    id,
                    phase: map_touch_phase(phase),
                    x: location.x as f32,
                    y: location.y as f32,
                });
            }

            WindowEvent::Focused(false) => self.dispatch_pointer(RawPointer::FocusLost),

            WindowEvent::KeyboardInput { event, .. } => {
                self.dispatch(Event::Key(translate_key(&event)));
            }

            _ => {}
        }
    }
}

fn map_touch_phase(phase: winit::event::TouchPhase) -> TouchPhase {
    match phase {
        winit::event::TouchPhase::Started => TouchPhase::Started,
        winit::event::TouchPhase::Moved => TouchPhase::Moved,
        winit::event::TouchPhase::Ended => TouchPhase::Ended,
        winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

fn translate_key(event: &winit::event::KeyEvent) -> KeyEvent {
    let ch = match &event.logical_key {
        winit::keyboard::Key::Character(s) => s.chars().next(),
        _ => None,
    };

    let direction = match (event.state, event.repeat) {
        (ElementState::Released, _) => KeyDirection::Release,
        (ElementState::Pressed, true) => KeyDirection::Repeat,
        (ElementState::Pressed, false) => KeyDirection::Press,
    };

    KeyEvent { ch, direction }
}
