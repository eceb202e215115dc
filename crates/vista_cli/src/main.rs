//! Vista CLI
//!
//! Drive, validate and inspect Vista camera sessions without a renderer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vista_camera::{Director, PathCamera, SessionConfig};

mod script;
mod session;

use script::SessionScript;
use session::{Format, Reporter};

#[derive(Parser)]
#[command(name = "vista")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scroll-driven camera timeline engine", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session script and report events and poses
    Run {
        /// Session configuration (defaults to the built-in journey world)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Session script (defaults to the built-in journey)
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate a session configuration
    Check {
        /// Configuration file (checks the defaults when omitted)
        file: Option<PathBuf>,
    },

    /// Print the default configuration as TOML
    DumpConfig,

    /// Print the path camera pose at a progress value
    Sample {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Progress along the path, 0.0 to 1.0
        #[arg(short, long)]
        progress: f32,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            config,
            script,
            fps,
            json,
        } => cmd_run(config.as_deref(), script.as_deref(), fps, json),

        Commands::Check { file } => cmd_check(file.as_deref()),

        Commands::DumpConfig => cmd_dump_config(),

        Commands::Sample {
            config,
            progress,
            json,
        } => cmd_sample(config.as_deref(), progress, json),
    }
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

fn cmd_run(config: Option<&Path>, script: Option<&Path>, fps: u32, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let mut director = Director::new(&config).context("Invalid session configuration")?;

    let script = match script {
        Some(path) => SessionScript::load(path)?,
        None => SessionScript::journey()?,
    };

    let format = if json { Format::Json } else { Format::Text };
    let mut reporter = Reporter::new(format, io::stdout().lock());

    let summary = session::run_session(&mut director, &script, fps, &mut reporter)?;

    info!(
        "{} frames, {} poses written, {} events, ended in {:?}",
        summary.frames,
        summary.poses_written,
        summary.events.len(),
        summary.final_state
    );
    if let Some(pose) = summary.last_pose {
        let rotation = pose.rotation.to_orientation();
        info!(
            "camera rests at ({:.2}, {:.2}, {:.2}) facing ({:.1}, {:.1}, {:.1})",
            pose.position.x,
            pose.position.y,
            pose.position.z,
            rotation.pitch,
            rotation.yaw,
            rotation.roll
        );
    }
    if !director.checkpoints().all_passed() {
        warn!("session ended with locked checkpoints");
    }

    Ok(())
}

fn cmd_check(file: Option<&Path>) -> Result<()> {
    let config = load_config(file)?;
    let director = Director::new(&config).context("Configuration is invalid")?;

    let name = file
        .map(|f| f.display().to_string())
        .unwrap_or_else(|| "default configuration".to_string());
    info!("Checking {}", name);

    let script = director.cinematic().script();
    println!("Configuration OK");
    println!(
        "  path:        {} control points, {:.1} units long",
        director.path().curve().points().len(),
        director.path().curve().length()
    );
    println!("  keyframes:   {}", director.path().track().len());
    for checkpoint in director.checkpoints().iter() {
        println!(
            "  checkpoint:  {:.3} gated by {}",
            checkpoint.progress, checkpoint.character
        );
    }
    println!(
        "  cinematic:   {} scenes, {} segments, {:.1}s",
        script.scene_count(),
        script.segments().count(),
        script.total_duration()
    );
    println!("  final:       {}", director.final_character());

    Ok(())
}

fn cmd_dump_config() -> Result<()> {
    let text = SessionConfig::default()
        .to_toml()
        .context("Failed to serialize config")?;
    print!("{text}");
    Ok(())
}

fn cmd_sample(config: Option<&Path>, progress: f32, json: bool) -> Result<()> {
    if !progress.is_finite() {
        anyhow::bail!("progress must be a finite number");
    }
    if !(0.0..=1.0).contains(&progress) {
        warn!("progress {} is outside [0, 1] and will be clamped", progress);
    }

    let config = load_config(config)?;
    let camera = PathCamera::from_config(&config.path).context("Invalid camera path")?;
    let pose = camera.pose_at(progress);
    let rotation = pose.rotation.to_orientation();

    if json {
        let value = serde_json::json!({
            "progress": progress.clamp(0.0, 1.0),
            "position": pose.position,
            "rotation": rotation,
        });
        println!("{value}");
    } else {
        println!(
            "progress {:.3}: position ({:.3}, {:.3}, {:.3}) rotation ({:.2}, {:.2}, {:.2})",
            progress.clamp(0.0, 1.0),
            pose.position.x,
            pose.position.y,
            pose.position.z,
            rotation.pitch,
            rotation.yaw,
            rotation.roll
        );
    }
    Ok(())
}
