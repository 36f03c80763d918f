//! vrshell - headless controller/widget session runner
//!
//! Replays a controller script against the content window and writes one
//! JSONL record per pointer sample.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use tracing::info;
use vrshell::{SessionScript, ShellConfig, ShellSession};
use vrshell_render::build_quad_mesh;
use vrshell_scene::MeshLibrary;
use vrshell_testkit::{EventRecord, JsonlSink};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless VR shell controller session", long_about = None)]
struct Args {
    /// Shell configuration (TOML)
    #[arg(long, default_value = vrshell::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Controller event script (JSON)
    #[arg(short, long)]
    script: PathBuf,

    /// Output path for pointer samples (JSONL)
    #[arg(short, long, default_value = "pointer_samples.jsonl")]
    output: PathBuf,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    info!("Starting vrshell v{}", env!("CARGO_PKG_VERSION"));

    let config = ShellConfig::load_from_path(&args.config);
    let script = SessionScript::load(&args.script)?;

    // No asset pipeline in headless runs: every configured model is a small placeholder panel.
    let mut models = MeshLibrary::new();
    for name in &config.controller_models {
        models.insert(
            name.clone(),
            build_quad_mesh(Vec3::new(-0.02, -0.02, 0.0), Vec3::new(0.02, 0.02, 0.0)),
        );
    }

    let mut session = ShellSession::new(&config, &mut models)?;
    let mut sink = JsonlSink::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let mut written = 0usize;
    session.run_script(&script, |frame, samples| {
        for sample in samples {
            sink.write(&EventRecord {
                frame,
                kind: "pointer",
                payload: sample,
            })?;
            written += 1;
        }
        Ok(())
    })?;
    sink.flush()?;
    session.shutdown();

    info!(
        frames = script.frames.len(),
        samples = written,
        output = %args.output.display(),
        "session complete"
    );
    Ok(())
}
