pub mod image_io;
pub mod video;

pub use image_io::PngSink;
pub use video::VideoSource;

use anyhow::Result;
use std::path::Path;

/// Random-access frame reader.
pub trait FrameSource {
    type Frame;

    fn fps(&self) -> f64;

    fn frame_count(&self) -> i64;

    /// Seeks to `index` and decodes one frame. `Ok(None)` when the decoder
    /// produced nothing there.
    fn read_frame_at(&mut self, index: i64) -> Result<Option<Self::Frame>>;
}

/// Persists decoded frames.
pub trait FrameSink<F> {
    fn save(&mut self, path: &Path, frame: &F) -> Result<()>;
}
