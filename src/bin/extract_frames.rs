use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use hdepic_tools::core::extractor::{self, ExtractOptions};
use hdepic_tools::utils::file_utils::FirstByName;
use hdepic_tools::utils::logger;
use hdepic_tools::Config;

/// Save start/mid/end frames for the earliest narrations of one video.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the MP4; defaults to the first one under the video root
    #[arg(long, default_value = "")]
    video: String,
    /// How many narrations to sample [default: 3]
    #[arg(long)]
    n: Option<usize>,
    /// Extra seconds before each start (negative values count as 0)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    margin: f64,
    /// Output root [default: outputs/frames_by_narration]
    #[arg(long)]
    outdir: Option<PathBuf>,
}

impl Cli {
    fn into_options(self, config: &Config) -> ExtractOptions {
        ExtractOptions {
            video: (!self.video.is_empty()).then(|| PathBuf::from(&self.video)),
            narrations: self.n.unwrap_or(config.default_narrations),
            margin: self.margin,
            outdir: self.outdir.unwrap_or_else(|| config.frames_outdir.clone()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logger::init(&config.log_dir, "extract_frames");

    let options = cli.into_options(&config);

    if let Err(e) = extractor::run_extraction(&config, &options, &FirstByName) {
        logger::error(&format!("{:#}", e));
        return Err(e);
    }
    Ok(())
}
