//! Cutline - timeline engine driver
//!
//! Replays a recorded gesture script against a fresh editing session, prints
//! the resulting composition and optionally exports it.

use anyhow::{Context, Result};
use clap::Parser;
use cutline_core::EngineConfig;
use cutline_editor::{EditorSession, Gesture, Outcome};
use cutline_export::{
    AspectRatio, CompositionSnapshot, ExportCancel, ExportOrchestrator, IdentityResolver,
    ManifestRenderBackend,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Parser)]
#[command(name = "cutline", version, about = "Replay timeline gestures and export the result")]
struct Cli {
    /// Engine config (JSON). Defaults to the platform config file if present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gesture script: a JSON array of gestures.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Write an export manifest into this directory.
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Output aspect ratio, e.g. 16:9 or 9:16.
    #[arg(short, long, default_value = "16:9")]
    aspect: AspectRatio,

    /// Print the effective config and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if cli.dump_config {
        println!("{}", String::from_utf8_lossy(&config.to_json()?));
        return Ok(());
    }

    let mut session = EditorSession::new(config);

    if let Some(path) = &cli.script {
        let gestures = load_script(path)?;
        info!(gestures = gestures.len(), script = %path.display(), "Replaying script");
        for (index, gesture) in gestures.iter().enumerate() {
            match session.dispatch(gesture) {
                Outcome::Applied => {}
                Outcome::Disabled => {
                    info!(index, gesture = gesture.name(), "Gesture disabled");
                }
                Outcome::Rejected(notice) => {
                    warn!(index, gesture = gesture.name(), %notice, "Gesture rejected");
                }
            }
        }
    }

    print_composition(&session);

    if let Some(dir) = &cli.export_dir {
        export(&session, dir, cli.aspect)?;
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = explicit {
        return EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    match EngineConfig::default_path() {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "Using config file");
            EngineConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        _ => Ok(EngineConfig::default()),
    }
}

fn load_script(path: &Path) -> Result<Vec<Gesture>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("Invalid gesture script {}", path.display()))
}

fn print_composition(session: &EditorSession) {
    let composition = session.composition();
    let selected = composition.selected_id();
    println!(
        "{} clip(s), {:.3}s total, zoom {:.2}, playhead {:.3}s",
        composition.len(),
        composition.duration(),
        composition.zoom(),
        session.cursor().current_time()
    );
    for clip in composition.clips() {
        let marker = if Some(clip.id()) == selected { '*' } else { ' ' };
        println!(
            "{marker} L{:<2} {:<6} {:>9} {:<28} {}",
            clip.layer(),
            clip.kind(),
            clip.span().to_string(),
            clip.name(),
            clip.id()
        );
    }
}

fn export(session: &EditorSession, dir: &Path, aspect: AspectRatio) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let snapshot = CompositionSnapshot::capture(session.composition(), &IdentityResolver)?;
    let orchestrator =
        ExportOrchestrator::from_config(ManifestRenderBackend::new(dir), session.config());

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(orchestrator.export(
        snapshot,
        aspect,
        |fraction| info!(progress = format_args!("{:.0}%", fraction * 100.0), "Exporting"),
        ExportCancel::new(),
    ));

    match result {
        Ok(artifact) => {
            println!("exported {}", artifact.uri);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}
