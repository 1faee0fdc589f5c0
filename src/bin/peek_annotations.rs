use anyhow::Result;
use clap::Parser;

use hdepic_tools::core::peeker;
use hdepic_tools::utils::file_utils::FirstByName;
use hdepic_tools::utils::logger;
use hdepic_tools::Config;

/// Print the narrations recorded for the first downloaded video and save a
/// CSV sample of them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    Cli::parse();
    let config = Config::load()?;
    logger::init(&config.log_dir, "peek_annotations");

    if let Err(e) = peeker::run_peek(&config, &FirstByName) {
        logger::error(&format!("{:#}", e));
        return Err(e);
    }
    Ok(())
}
