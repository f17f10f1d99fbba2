//! shatter - terminal noise toy
//!
//! Run with: cargo run --bin shatter -- --preset metallic

mod app;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use shatter_dsp::{patch::FileStore, EngineConfig};
use tracing_subscriber::EnvFilter;

use app::Shatter;

#[derive(Debug, Parser)]
#[command(name = "shatter", about = "Distorted noise with live controls")]
struct Args {
    /// TOML engine config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in or saved preset to start with.
    #[arg(long)]
    preset: Option<String>,

    /// Directory for saved presets.
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Where to write logs. The terminal belongs to the UI.
    #[arg(long, default_value = "shatter.log")]
    log_file: PathBuf,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    init_logging(&args.log_file)?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(preset) = args.preset {
        config.default_preset = preset;
    }
    if let Some(dir) = args.store_dir {
        config.store_dir = Some(dir);
    }

    let store = open_store(&config)?;

    let terminal = ratatui::init();
    let result = Shatter::new(config, store).and_then(|app| app.run(terminal));
    ratatui::restore();

    result
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shatter_dsp=info,shatter=info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

fn open_store(config: &EngineConfig) -> EyreResult<FileStore> {
    let dir = config
        .store_dir
        .clone()
        .or_else(FileStore::default_dir)
        .unwrap_or_else(|| PathBuf::from(".shatter"));

    FileStore::open(&dir).wrap_err_with(|| format!("failed to open preset store {}", dir.display()))
}
