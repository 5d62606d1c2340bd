use std::path::PathBuf;

/// Load GeoJSON sources onto a tiled map and render one labelled frame.
#[derive(clap::Parser, Debug)]
#[command(name = "maplabel", version, about)]
pub struct Cli {
    /// Viewer configuration file (JSON). Defaults are used when omitted.
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<f64>,

    /// Write the rendered frame (JSON) here instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter for the requested verbosity; `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
