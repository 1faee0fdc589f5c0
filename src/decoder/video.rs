use anyhow::{Context, Result};
use opencv::{core::Mat, prelude::*, videoio};
use std::path::{Path, PathBuf};

use super::FrameSource;
use crate::error::ToolError;
use crate::utils::logger;

/// An opened video file. The capture is released when this is dropped.
pub struct VideoSource {
    capture: videoio::VideoCapture,
    path: PathBuf,
    fps: f64,
    frame_count: i64,
}

impl VideoSource {
    /// Opens `path`, substituting `fallback_fps` when the container reports
    /// no usable frame rate.
    pub fn open(path: &Path, fallback_fps: f64) -> Result<Self> {
        let path_str = path.to_string_lossy();
        logger::debug(&format!("Opening video with OpenCV: {}", path_str));

        // CAP_ANY lets OpenCV choose the backend for the platform
        let capture = videoio::VideoCapture::from_file(&path_str, videoio::CAP_ANY)
            .with_context(|| format!("OpenCV failed on {}", path.display()))?;

        if !capture.is_opened()? {
            logger::error(&format!("Failed to open video file: {}", path_str));
            return Err(ToolError::VideoOpen {
                path: path.to_path_buf(),
            }
            .into());
        }

        let reported_fps = capture.get(videoio::CAP_PROP_FPS)?;
        let fps = effective_fps(reported_fps, fallback_fps);
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let frame_count = if frame_count.is_finite() {
            (frame_count as i64).max(0)
        } else {
            0
        };

        logger::info(&format!(
            "Video opened: {} | reported fps={} | using fps={} | frames={}",
            path_str, reported_fps, fps, frame_count
        ));

        Ok(Self {
            capture,
            path: path.to_path_buf(),
            fps,
            frame_count,
        })
    }
}

impl FrameSource for VideoSource {
    type Frame = Mat;

    fn fps(&self) -> f64 {
        self.fps
    }

    fn frame_count(&self) -> i64 {
        self.frame_count
    }

    fn read_frame_at(&mut self, index: i64) -> Result<Option<Mat>> {
        self.capture
            .set(videoio::CAP_PROP_POS_FRAMES, index as f64)?;

        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            logger::debug(&format!("No frame decoded at index {}", index));
            return Ok(None);
        }
        Ok(Some(frame))
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            logger::error(&format!("Failed to release {}: {}", self.path.display(), e));
        } else {
            logger::debug(&format!("Released {}", self.path.display()));
        }
    }
}

/// Decoders report 0 (or garbage) when the container carries no rate.
pub fn effective_fps(reported: f64, fallback: f64) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        reported
    } else {
        fallback
    }
}

/// Writes `frames` solid grey MJPG frames into an `.avi`, frame `i` at
/// brightness `i * 20`.
#[cfg(test)]
pub(crate) fn write_test_video(path: &Path, frames: usize, fps: f64) -> Result<()> {
    use opencv::core;

    let size = core::Size::new(32, 24);
    let fourcc = videoio::VideoWriter::fourcc('M', 'J', 'P', 'G')?;
    let mut writer = videoio::VideoWriter::new(&path.to_string_lossy(), fourcc, fps, size, true)?;
    anyhow::ensure!(writer.is_opened()?, "could not create {}", path.display());

    for i in 0..frames {
        let frame = Mat::new_rows_cols_with_default(
            size.height,
            size.width,
            core::CV_8UC3,
            core::Scalar::all((i * 20 % 256) as f64),
        )?;
        writer.write(&frame)?;
    }
    writer.release()?;
    Ok(())
}
