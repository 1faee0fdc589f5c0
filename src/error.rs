use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions raised by the tools.
///
/// These travel inside `anyhow::Error`; tests and callers that care about the
/// kind recover it with `downcast_ref::<ToolError>()`.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Missing {what}: {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("No .{extension} video found under {}", root.display())]
    NoVideoFound { root: PathBuf, extension: String },

    #[error("Could not open video {}", path.display())]
    VideoOpen { path: PathBuf },

    #[error("No narrations found for {video_id}. Check your annotations or file naming.")]
    NoNarrations { video_id: String },

    #[error("No frame directory found under {}", root.display())]
    NoFramesDir { root: PathBuf },

    #[error("No images found in {}", dir.display())]
    NoImages { dir: PathBuf },

    #[error("Failed to decode image {}", path.display())]
    ImageDecode { path: PathBuf },

    #[error("Need {needed} images in {} but only {found} could be loaded", dir.display())]
    NotEnoughImages {
        dir: PathBuf,
        found: usize,
        needed: usize,
    },
}
