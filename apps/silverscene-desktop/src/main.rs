use anyhow::{Context, Result};
use clap::Parser;
use silverscene_animator::{AnimatorConfig, FrameScheduler, OrientationAnimator, TrackableObject};
use silverscene_assets::{
    AssetLoadFailure, EnvironmentMap, LoadedModel, LogProgress, load_environment, load_model,
};
use silverscene_common::{ObjectId, Placement};
use silverscene_input::PointerEvent;
use silverscene_render::{Paintable, SceneSettings};
use silverscene_render_wgpu::WgpuBackend;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "silverscene-desktop", about = "Silver models that follow the pointer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory model and environment paths are resolved against
    #[arg(long, default_value = "./assets")]
    assets: PathBuf,

    /// Scene settings YAML overriding the built-in look
    #[arg(long)]
    scene: Option<PathBuf>,

    #[arg(long, default_value = "1280")]
    width: u32,

    #[arg(long, default_value = "720")]
    height: u32,
}

/// Asks winit for another redraw after every tick.
struct WindowScheduler(Arc<Window>);

impl FrameScheduler for WindowScheduler {
    fn request_next_frame(&mut self) {
        self.0.request_redraw();
    }
}

/// Results sent back from load tasks to the event loop thread.
enum LoadEvent {
    Model {
        id: ObjectId,
        placement: Placement,
        result: Result<LoadedModel, AssetLoadFailure>,
    },
    Environment(Result<EnvironmentMap, AssetLoadFailure>),
}

/// Everything that exists once the window is up.
struct Viewer {
    window: Arc<Window>,
    animator: OrientationAnimator<WgpuBackend, WindowScheduler>,
    loads: mpsc::UnboundedReceiver<LoadEvent>,
    started: Instant,
}

impl Viewer {
    /// Apply finished loads. Failures are logged and never retried.
    fn drain_loads(&mut self, settings: &SceneSettings) {
        while let Ok(event) = self.loads.try_recv() {
            match event {
                LoadEvent::Model {
                    id,
                    placement,
                    result: Ok(mut model),
                } => {
                    let painted = model.scene.apply_material(&settings.material);
                    self.animator
                        .backend_mut()
                        .upload_model(id, &model.scene, placement);
                    self.animator.register(TrackableObject::pending(id));
                    self.animator.mark_ready(id);
                    tracing::info!(
                        object = %id.short(),
                        model = %model.scene.name,
                        painted,
                        "model ready"
                    );
                }
                LoadEvent::Model {
                    result: Err(e), ..
                } => {
                    tracing::error!("model failed to load: {e}");
                }
                LoadEvent::Environment(Ok(env)) => {
                    self.animator.backend_mut().set_environment(&env);
                }
                LoadEvent::Environment(Err(e)) => {
                    tracing::error!("environment map failed to load: {e}");
                }
            }
        }
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

struct App {
    assets: PathBuf,
    settings: SceneSettings,
    size: PhysicalSize<u32>,
    runtime: tokio::runtime::Runtime,
    viewer: Option<Viewer>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, settings: SceneSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("silverscene-load")
            .enable_all()
            .build()
            .context("starting load runtime")?;
        Ok(Self {
            assets: cli.assets,
            settings,
            size: PhysicalSize::new(cli.width, cli.height),
            runtime,
            viewer: None,
            failure: None,
        })
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("silverscene")
            .with_transparent(true)
            .with_inner_size(self.size);
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);
        let size = window.inner_size();

        let backend = WgpuBackend::new(
            window.clone(),
            size.width,
            size.height,
            window.scale_factor() as f32,
            self.settings.clone(),
        )
        .context("initializing GPU backend")?;

        let animator = OrientationAnimator::new(
            AnimatorConfig::new(size.width, size.height),
            backend,
            WindowScheduler(window.clone()),
        );

        let (tx, loads) = mpsc::unbounded_channel();
        self.spawn_loads(tx);

        window.request_redraw();
        self.viewer = Some(Viewer {
            window,
            animator,
            loads,
            started: Instant::now(),
        });
        Ok(())
    }

    fn spawn_loads(&self, tx: mpsc::UnboundedSender<LoadEvent>) {
        for slot in &self.settings.models {
            let path = resolve(&self.assets, &slot.path);
            let placement = slot.placement;
            let name = slot.name.clone();
            let tx = tx.clone();
            self.runtime.spawn(async move {
                let result = load_model(&path, &mut LogProgress::new(name)).await;
                let _ = tx.send(LoadEvent::Model {
                    id: ObjectId::new(),
                    placement,
                    result,
                });
            });
        }

        if let Some(env) = &self.settings.environment {
            let path = resolve(&self.assets, &env.path);
            self.runtime.spawn(async move {
                let label = path.display().to_string();
                let result = load_environment(&path, &mut LogProgress::new(label)).await;
                let _ = tx.send(LoadEvent::Environment(result));
            });
        }
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            tracing::error!("{e:#}");
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(viewer) = &mut self.viewer else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                viewer.animator.on_resize(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                viewer
                    .animator
                    .backend_mut()
                    .set_scale_factor(scale_factor as f32);
            }
            WindowEvent::CursorMoved { position, .. } => {
                viewer.animator.on_pointer_move(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                viewer.animator.apply_pointer(PointerEvent::Left);
            }
            WindowEvent::RedrawRequested => {
                viewer.drain_loads(&self.settings);
                let now = viewer.now_ms();
                viewer.animator.tick(now);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = &self.viewer {
            let stats = viewer.animator.stats();
            tracing::info!(
                ticks = stats.ticks,
                rendered = stats.frames_rendered,
                skipped = stats.frames_skipped,
                objects = viewer.animator.len(),
                window = ?viewer.window.id(),
                "viewer closing"
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let settings = match &cli.scene {
        Some(path) => SceneSettings::from_yaml_file(path)
            .with_context(|| format!("reading scene settings {}", path.display()))?,
        None => SceneSettings::default(),
    };

    tracing::info!(
        assets = %cli.assets.display(),
        models = settings.models.len(),
        "silverscene-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(cli, settings)?;
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
