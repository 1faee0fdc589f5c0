use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants;

/// Paths and defaults shared by the three tools.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change. Relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub annotations_path: PathBuf,
    pub video_root: PathBuf,
    pub video_extension: String,
    pub video_id_marker: String,
    pub peek_outdir: PathBuf,
    pub frames_outdir: PathBuf,
    pub contact_sheet_path: PathBuf,
    pub log_dir: PathBuf,
    pub fallback_fps: f64,
    pub preview_rows: usize,
    pub export_rows: usize,
    pub default_narrations: usize,
    pub sheet_frames: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            annotations_path: PathBuf::from(constants::DEFAULT_ANNOTATIONS_PATH),
            video_root: PathBuf::from(constants::DEFAULT_VIDEO_ROOT),
            video_extension: constants::VIDEO_EXTENSION.to_string(),
            video_id_marker: constants::VIDEO_ID_MARKER.to_string(),
            peek_outdir: PathBuf::from(constants::DEFAULT_PEEK_OUTDIR),
            frames_outdir: PathBuf::from(constants::DEFAULT_FRAMES_OUTDIR),
            contact_sheet_path: PathBuf::from(constants::DEFAULT_CONTACT_SHEET),
            log_dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
            fallback_fps: constants::FALLBACK_FPS,
            preview_rows: constants::PREVIEW_ROWS,
            export_rows: constants::EXPORT_ROWS,
            default_narrations: constants::DEFAULT_NARRATIONS,
            sheet_frames: constants::SHEET_FRAMES,
        }
    }
}

impl Config {
    /// Loads the config named by `HDEPIC_TOOLS_CONFIG`, else `hdepic_tools.json`
    /// in the working directory, else the built-in defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(constants::CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(constants::CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Path of the peeker's CSV sample for `video_id`.
    pub fn peek_csv_for(&self, video_id: &str) -> PathBuf {
        self.peek_outdir
            .join(format!("{}_narrations_head.csv", video_id))
    }
}
