#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;
use portfolio_reel::app::PortfolioApp;
use portfolio_reel::config::{AppConfig, AutoplayPolicy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Full-window portfolio reel with language intros and hover reactions
#[derive(Parser, Debug)]
#[command(name = "portfolio_reel", version)]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the clips, overrides the configured root
    #[arg(long)]
    clips: Option<PathBuf>,

    /// Start policy: allow, muted-only or block
    #[arg(long)]
    autoplay: Option<AutoplayPolicy>,

    /// Show the debug window
    #[arg(long)]
    debug_panel: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let path = args.config.clone().unwrap_or_else(AppConfig::default_path);

    let mut config = if args.config.is_some() {
        AppConfig::load_from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?
    } else if path.exists() {
        AppConfig::load_or_default(&path)
    } else {
        AppConfig::default()
    };

    if let Some(clips) = args.clips {
        config.clips.root = clips;
    }
    if let Some(policy) = args.autoplay {
        config.playback.autoplay = policy;
    }
    if args.debug_panel {
        config.ui.show_debug_panel = true;
    }

    config.validate().context("invalid configuration")?;

    if args.write_config {
        config
            .save_to_file(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration written");
        return Ok(());
    }

    tracing::info!(
        clips = %config.clips.root.display(),
        autoplay = %config.playback.autoplay,
        "Starting portfolio reel"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(config.ui.window_title.clone()),
        ..Default::default()
    };
    let title = config.ui.window_title.clone();

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(PortfolioApp::new(config)))),
    )
    .map_err(|e| anyhow!("UI terminated with error: {}", e))
}
