use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use hdepic_tools::core::contact_sheet::{self, SheetOptions};
use hdepic_tools::utils::file_utils::MostRecentlyModified;
use hdepic_tools::utils::logger;
use hdepic_tools::Config;

/// Join the first narration's saved frames into one image.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of frames written by extract_frames; defaults to the most
    /// recently modified one
    #[arg(long, default_value = "")]
    dir: String,
    /// Output image [default: outputs/contact_sheet.png]
    #[arg(long)]
    out: Option<PathBuf>,
}

impl Cli {
    fn into_options(self, config: &Config) -> SheetOptions {
        SheetOptions {
            dir: (!self.dir.is_empty()).then(|| PathBuf::from(&self.dir)),
            out: self.out.unwrap_or_else(|| config.contact_sheet_path.clone()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logger::init(&config.log_dir, "contact_sheet");

    let options = cli.into_options(&config);

    if let Err(e) = contact_sheet::run_contact_sheet(&config, &options, &MostRecentlyModified) {
        logger::error(&format!("{:#}", e));
        return Err(e);
    }
    Ok(())
}
