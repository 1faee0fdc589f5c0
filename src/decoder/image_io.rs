use anyhow::{anyhow, Context, Result};
use opencv::{core, imgcodecs, prelude::*};
use std::fs;
use std::path::Path;

use super::FrameSink;
use crate::error::ToolError;

/// Decodes a colour image; an unreadable file is an [`ToolError::ImageDecode`].
pub fn read_image(path: &Path) -> Result<core::Mat> {
    let mat = imgcodecs::imread(&path.to_string_lossy(), imgcodecs::IMREAD_COLOR)
        .with_context(|| format!("OpenCV failed reading {}", path.display()))?;
    if mat.empty() {
        return Err(ToolError::ImageDecode {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(mat)
}

/// Encodes `image` by the extension of `path`, creating parent directories.
pub fn write_image(path: &Path, image: &core::Mat) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let written = imgcodecs::imwrite(&path.to_string_lossy(), image, &core::Vector::<i32>::new())
        .with_context(|| format!("OpenCV failed writing {}", path.display()))?;
    if !written {
        return Err(anyhow!("OpenCV could not encode {}", path.display()));
    }
    Ok(())
}

/// Writes frames with [`write_image`].
#[derive(Debug, Default)]
pub struct PngSink;

impl FrameSink<core::Mat> for PngSink {
    fn save(&mut self, path: &Path, frame: &core::Mat) -> Result<()> {
        write_image(path, frame)
    }
}
