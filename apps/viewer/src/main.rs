use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info};
use maplabel_io::{FileFetcher, HttpFetcher, RoutingFetcher, ViewerConfig};
use maplabel_viewer::{Cli, ViewerStatus, ViewportController};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(width) = cli.width {
        config.map.canvas_width = width;
    }
    if let Some(height) = cli.height {
        config.map.canvas_height = height;
    }

    // Relative source paths resolve next to the config file.
    let root = cli
        .config
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let fetcher = RoutingFetcher::new(HttpFetcher::new()?, FileFetcher::new(root));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut controller = ViewportController::new(config);
    runtime.block_on(controller.reload(&fetcher));

    let frame = controller.frame();
    let json = frame.to_json()?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("frame written to {}", path.display());
        }
        None => println!("{}", json),
    }

    eprintln!("{}", controller.status());
    if let ViewerStatus::Failed { message } = controller.status() {
        error!("no source could be loaded");
        return Err(message.clone().into());
    }
    Ok(())
}
