use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::error::ToolError;
use crate::shared::config::Config;
use crate::utils::file_utils::{self, Picker};

/// Picks a video from everything under `config.video_root`.
pub fn locate_video(config: &Config, picker: &dyn Picker) -> Result<PathBuf> {
    let candidates =
        file_utils::find_files_recursive(&config.video_root, &config.video_extension)?;
    picker.pick(&candidates).ok_or_else(|| {
        ToolError::NoVideoFound {
            root: config.video_root.clone(),
            extension: config.video_extension.clone(),
        }
        .into()
    })
}

/// The explicit path when given, otherwise [`locate_video`]. Either way the
/// file has to exist.
pub fn resolve_video(
    explicit: Option<&Path>,
    config: &Config,
    picker: &dyn Picker,
) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => locate_video(config, picker)?,
    };

    if !path.is_file() {
        return Err(ToolError::MissingInput {
            what: "video",
            path,
        }
        .into());
    }
    Ok(path)
}
