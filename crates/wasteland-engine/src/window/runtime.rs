use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::{translate_device_event, translate_window_event};
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

use super::commands::{Command, RuntimeCtx};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Fallout".to_string(),
            initial_size: LogicalSize::new(1920.0, 1080.0),
            resizable: false,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it exits or the window closes.
    ///
    /// A window or GPU setup failure stops the loop and is returned here.
    pub fn run<A: App + 'static>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            entry: None,
            exiting: false,
            lifecycle: Lifecycle::NotStarted,
            fatal: None,
        };
        event_loop.run_app(&mut driver).context("winit event loop terminated with error")?;
        driver.fatal.map_or(Ok(()), Err)
    }
}

/// The window and everything whose lifetime follows it.
#[self_referencing]
struct WindowEntry {
    input: InputState,
    frame_input: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Driver<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    // Cleared in `exiting` so the surface never outlives the display.
    entry: Option<WindowEntry>,
    exiting: bool,
    lifecycle: Lifecycle,
    fatal: Option<anyhow::Error>,
}

/// Where the app is between `on_start` and `on_exit`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Lifecycle {
    NotStarted,
    Running,
    Finished,
}

impl Lifecycle {
    /// True exactly once, and only for an app that was started. An app whose
    /// window never opened gets no `on_exit`.
    fn finish(&mut self) -> bool {
        let was_running = *self == Lifecycle::Running;
        *self = Lifecycle::Finished;
        was_running
    }
}

impl<A: App + 'static> Driver<A> {
    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input: InputState::default(),
            frame_input: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        self.entry = Some(entry);
        Ok(())
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        self.exiting = true;
        event_loop.exit();
    }

    fn run_commands(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        for cmd in ctx.into_commands() {
            match cmd {
                Command::SetCursorMode(mode) => {
                    if let Some(entry) = &self.entry {
                        entry.with_window(|w| mode.apply(w));
                    }
                }
                Command::Exit => self.stop(event_loop),
            }
        }
    }

    /// Follows the window's current physical size.
    fn resize_surface(&mut self) {
        if let Some(entry) = &mut self.entry {
            entry.with_mut(|fields| fields.gpu.resize(fields.window.inner_size()));
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = &mut self.entry else { return };
        let app = &mut self.app;
        let mut runtime = RuntimeCtx::default();

        let control = entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let control = app.on_frame(&mut FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                input: fields.input,
                input_frame: fields.frame_input,
                time,
                runtime: &mut runtime,
            });
            // Deltas belong to the frame that just consumed them.
            fields.frame_input.clear();
            control
        });

        if control == AppControl::Exit {
            runtime.exit();
        }
        self.run_commands(event_loop, runtime);
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exiting {
            return;
        }
        if let Err(err) = self.open_window(event_loop) {
            log::error!("{err:#}");
            self.fatal = Some(err);
            self.stop(event_loop);
            return;
        }
        log::info!("window \"{}\" ready", self.config.title);

        let mut runtime = RuntimeCtx::default();
        self.lifecycle = Lifecycle::Running;
        self.app.on_start(&mut runtime);
        self.run_commands(event_loop, runtime);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            event_loop.exit();
            return;
        }
        // The scene animates, so every iteration redraws.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        let (Some(ev), Some(entry)) = (translate_device_event(&event), &mut self.entry) else { return };
        entry.with_mut(|fields| fields.input.apply_event(fields.frame_input, ev));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exiting {
            event_loop.exit();
            return;
        }
        let Some(entry) = &mut self.entry else { return };
        let app = &mut self.app;

        let control = entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window, fields.input, &event) {
                fields.input.apply_event(fields.frame_input, ev);
            }
            app.on_window_event(&event)
        });
        if control == AppControl::Exit {
            self.stop(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.stop(event_loop);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize_surface(),
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.lifecycle.finish() {
            self.app.on_exit();
        }
        // Surface and device go before the display connection does.
        self.entry = None;
        log::info!("event loop exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_startup_never_reaches_on_exit() {
        let mut lifecycle = Lifecycle::NotStarted;
        assert!(!lifecycle.finish());
        assert_eq!(lifecycle, Lifecycle::Finished);
    }

    #[test]
    fn running_app_finishes_once() {
        let mut lifecycle = Lifecycle::Running;
        assert!(lifecycle.finish());
        assert!(!lifecycle.finish());
    }
}
