use anyhow::Context;
use clap::{Parser, Subcommand};
use silverscene_animator::{AnimatorConfig, ManualScheduler, OrientationAnimator, TrackableObject};
use silverscene_assets::{LogProgress, load_environment, load_model};
use silverscene_common::ObjectId;
use silverscene_render::{DebugTextBackend, Paintable, SceneSettings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "silverscene-cli", about = "Headless tools for the silverscene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default scene settings
    Info,
    /// Drive the orientation animator with a fixed pointer and frame interval
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "10")]
        ticks: u64,
        /// Pointer client X in pixels
        #[arg(long, default_value = "740")]
        pointer_x: f64,
        /// Pointer client Y in pixels
        #[arg(long, default_value = "360")]
        pointer_y: f64,
        /// Milliseconds between ticks
        #[arg(long, default_value = "16")]
        frame_ms: f64,
        /// Number of tracked objects
        #[arg(long, default_value = "1")]
        objects: usize,
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
        /// Number of most recent frame dumps to print
        #[arg(long, default_value = "10")]
        history: usize,
    },
    /// Load a .gltf/.glb model or a .hdr environment and print a summary
    Inspect {
        path: PathBuf,
        /// Scene YAML whose material is applied to the model
        #[arg(long)]
        scene: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("silverscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", silverscene_common::crate_info());
            println!("input: {}", silverscene_input::crate_info());
            println!("render: {}", silverscene_render::crate_info());
            println!("animator: {}", silverscene_animator::crate_info());
            println!("assets: {}", silverscene_assets::crate_info());
            println!();
            print!("{}", SceneSettings::default().to_yaml()?);
        }
        Commands::Simulate {
            ticks,
            pointer_x,
            pointer_y,
            frame_ms,
            objects,
            width,
            height,
            history,
        } => simulate(
            ticks,
            (pointer_x, pointer_y),
            frame_ms,
            objects,
            (width, height),
            history,
        ),
        Commands::Inspect { path, scene } => inspect(path, scene)?,
    }

    Ok(())
}

fn simulate(
    ticks: u64,
    (pointer_x, pointer_y): (f64, f64),
    frame_ms: f64,
    objects: usize,
    (width, height): (u32, u32),
    history: usize,
) {
    let mut animator = OrientationAnimator::new(
        AnimatorConfig::new(width, height),
        DebugTextBackend::with_history(history),
        ManualScheduler::new(),
    );
    for _ in 0..objects {
        animator.register(TrackableObject::ready(ObjectId::new()));
    }
    animator.on_pointer_move(pointer_x, pointer_y);

    let target = animator.target();
    println!(
        "Simulate: {ticks} ticks every {frame_ms}ms, pointer=({pointer_x}, {pointer_y}), target=({:.4}, {:.4})",
        target.x, target.y
    );

    for i in 0..ticks {
        animator.tick(i as f64 * frame_ms);
    }

    if animator.backend().frame_count() > 0 {
        println!("Last {} frames:", animator.backend().frame_count());
    }
    for frame in animator.backend().frames() {
        print!("{frame}");
    }

    let stats = animator.stats();
    let timer = animator.frame_timer();
    println!(
        "Ticks: {}  rendered: {}  skipped: {}  avg delta: {:.1}ms  redraws requested: {}",
        stats.ticks,
        stats.frames_rendered,
        stats.frames_skipped,
        timer.average().as_secs_f64() * 1000.0,
        animator.scheduler().requested()
    );
}

fn inspect(path: PathBuf, scene: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = match scene {
        Some(file) => SceneSettings::from_yaml_file(&file)
            .with_context(|| format!("reading scene settings {}", file.display()))?,
        None => SceneSettings::default(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    let label = path.display().to_string();
    let is_hdr = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("hdr"));

    if is_hdr {
        let env = runtime
            .block_on(load_environment(&path, &mut LogProgress::new(&label)))
            .with_context(|| format!("loading environment {label}"))?;
        let [r, g, b] = env.average_radiance();
        println!("Environment: {label}");
        println!("  size: {}x{}", env.width, env.height);
        println!("  mapping: {:?}", env.mapping);
        println!("  average radiance: ({r:.4}, {g:.4}, {b:.4})");
        return Ok(());
    }

    let mut model = runtime
        .block_on(load_model(&path, &mut LogProgress::new(&label)))
        .with_context(|| format!("loading model {label}"))?;
    let painted = model.scene.apply_material(&settings.material);

    println!("Model: {label}");
    println!("  asset id: {:016x}", model.asset_id.0);
    println!("  container: {:?}", model.source);
    println!("  nodes: {}", model.scene.node_count());
    println!("  meshes: {}", model.scene.mesh_count());
    println!("  primitives: {} (painted {painted})", model.scene.primitive_count());
    println!("  vertices: {}", model.scene.vertex_count());
    if let Some((lo, hi)) = model.scene.bounds() {
        println!(
            "  bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
        );
    }
    Ok(())
}
