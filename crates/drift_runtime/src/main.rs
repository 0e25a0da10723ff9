//! Driftfield runtime
//!
//! Opens a window and drives the sphere field once per redraw.
//!
//! Usage: `driftfield [settings.json]`. Log verbosity follows `RUST_LOG`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use drift_core::SimulationContext;
use drift_metrics::{FrameTimer, SimStats};
use drift_render::window::{create_event_loop, window_attributes, WindowConfig};
use drift_render::{RenderError, SphereRenderer};
use drift_services::{InputEvent, InputState, Settings};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

const DEFAULT_SETTINGS_PATH: &str = "driftfield.json";
const STATS_INTERVAL: Duration = Duration::from_secs(5);

struct App {
    started: Instant,
    window_config: WindowConfig,
    context: SimulationContext,
    input: InputState,
    window: Option<Arc<Window>>,
    renderer: Option<SphereRenderer>,
    timer: FrameTimer,
    stats: SimStats,
    last_report: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(settings: Settings) -> Result<Self> {
        let started = Instant::now();
        let context = SimulationContext::new(settings.simulation, Duration::ZERO)
            .context("invalid simulation settings")?;
        let window_config = WindowConfig {
            title: settings.window.title,
            width: settings.window.width,
            height: settings.window.height,
        };

        let mut stats = SimStats::new();
        stats.record_spawns(context.registry().len());

        Ok(Self {
            started,
            input: InputState::new(window_config.width, window_config.height),
            window_config,
            context,
            window: None,
            renderer: None,
            timer: FrameTimer::new(120),
            stats,
            last_report: started,
            error: None,
        })
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.now();
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        match self.context.frame(now, renderer) {
            Ok(report) => {
                self.stats
                    .record_frame(report.stepped, report.lifecycle.replaced.len());
                if let Some(id) = report.lifecycle.retiring {
                    tracing::trace!(%id, "sphere retiring");
                }
            }
            Err(RenderError::Surface(e)) => {
                self.fail(event_loop, anyhow::anyhow!("surface failed: {e}"));
                return;
            }
            Err(e) => {
                tracing::warn!("render error: {e}");
            }
        }

        let wall = Instant::now();
        self.timer.tick(wall);
        if wall.duration_since(self.last_report) >= STATS_INTERVAL {
            self.last_report = wall;
            let snapshot = self.stats.snapshot();
            let (min_ms, max_ms) = self.timer.frame_time_range_ms();
            tracing::info!(
                fps = format_args!("{:.1}", self.timer.fps()),
                frame_ms = format_args!("{:.2}", self.timer.frame_time_ms()),
                min_ms = format_args!("{min_ms:.2}"),
                max_ms = format_args!("{max_ms:.2}"),
                spheres = self.context.registry().len(),
                stepped = snapshot.frames_stepped,
                frozen = snapshot.frames_frozen,
                retired = snapshot.retirements,
                "frame stats"
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes(&self.window_config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("failed to create window"));
                return;
            }
        };

        let renderer = match pollster::block_on(SphereRenderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("failed to start renderer"));
                return;
            }
        };

        let (width, height) = renderer.size();
        self.input
            .apply(InputEvent::Resized { width, height }, &mut self.context);
        tracing::info!(width, height, spheres = self.context.registry().len(), "window ready");

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                self.input.apply(
                    InputEvent::Resized {
                        width: size.width,
                        height: size.height,
                    },
                    &mut self.context,
                );
            }
            WindowEvent::Focused(focused) => {
                tracing::debug!(focused, "focus changed");
                self.input
                    .apply(InputEvent::FocusChanged(focused), &mut self.context);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.apply(
                    InputEvent::PointerMoved {
                        x: position.x,
                        y: position.y,
                    },
                    &mut self.context,
                );
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
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
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Driftfield v{}", drift_core::VERSION);

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings = Settings::load_or_default(&path)?;
    if !std::path::Path::new(&path).exists() {
        match settings.save(&path) {
            Ok(()) => tracing::info!(%path, "wrote default settings"),
            Err(error) => tracing::warn!(%path, "could not write default settings: {error}"),
        }
    }

    let mut app = App::new(settings)?;
    let event_loop = create_event_loop().context("failed to create event loop")?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => {
            tracing::info!("shut down cleanly");
            Ok(())
        }
    }
}
