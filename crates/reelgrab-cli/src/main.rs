//! ReelGrab terminal front end
//!
//! One invocation is one click: the positional URL plays the role of the
//! text field, stdout is the status area.

mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use reelgrab_core::{build_trigger, Config, TriggerOutcome};
use terminal::{TerminalControl, TerminalStatus};

#[derive(Debug, Parser)]
#[command(name = "reelgrab", version, about = "Save a video through a ReelGrab backend")]
struct Cli {
    /// Page URL of the video to save
    url: String,

    /// Backend base URL
    #[arg(long, env = "REELGRAB_ENDPOINT")]
    endpoint: Option<String>,

    /// Directory the video is saved into
    #[arg(long, env = "REELGRAB_DOWNLOAD_DIR")]
    output_dir: Option<PathBuf>,

    /// Name of the saved file
    #[arg(long)]
    file_name: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint_base = endpoint.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.download_dir = dir.clone();
        }
        if let Some(name) = &self.file_name {
            config.file_name = name.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    reelgrab_core::init_logging();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let trigger = build_trigger(&config).context("failed to set up download trigger")?;

    let control = TerminalControl::new(&trigger.labels().idle);
    let status = TerminalStatus;

    let outcome = trigger.trigger(&cli.url, &control, &status).await;

    match outcome {
        TriggerOutcome::Saved(saved) => {
            println!("{} ({} bytes)", saved.path.display(), saved.size);
            Ok(ExitCode::SUCCESS)
        }
        other => {
            tracing::debug!(outcome = ?other, "Download did not complete");
            Ok(ExitCode::FAILURE)
        }
    }
}
