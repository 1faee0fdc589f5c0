use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::annotations::{earliest, AnnotationTable};
use crate::core::discovery;
use crate::core::timing::{self, FramePlan, FrameRole, NarrationWindow};
use crate::decoder::{FrameSink, FrameSource, PngSink, VideoSource};
use crate::error::ToolError;
use crate::shared::config::Config;
use crate::utils::file_utils::{self, Picker};
use crate::utils::logger;

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Explicit video; `None` picks one under the configured root.
    pub video: Option<PathBuf>,
    pub narrations: usize,
    /// Seconds to pull each start back by; negative counts as zero.
    pub margin: f64,
    pub outdir: PathBuf,
}

impl ExtractOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            video: None,
            narrations: config.default_narrations,
            margin: 0.0,
            outdir: config.frames_outdir.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedFrame {
    pub sequence: usize,
    pub role: FrameRole,
    pub frame_index: i64,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub plans: Vec<FramePlan>,
    pub saved: Vec<SavedFrame>,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub video_path: PathBuf,
    pub video_id: String,
    pub fps: f64,
    pub frame_count: i64,
    pub out_dir: PathBuf,
    pub extraction: Extraction,
}

pub fn run_extraction(
    config: &Config,
    options: &ExtractOptions,
    picker: &dyn Picker,
) -> Result<ExtractionReport> {
    let video_path = discovery::resolve_video(options.video.as_deref(), config, picker)?;
    let video_id = file_utils::infer_video_id(&video_path, &config.video_id_marker);

    let mut source = VideoSource::open(&video_path, config.fallback_fps)?;
    let fps = source.fps();
    let frame_count = source.frame_count();
    println!(
        "Video: {} | fps={:.3} | frames={}",
        video_path.display(),
        fps,
        frame_count
    );

    let table = AnnotationTable::load(&config.annotations_path)?;
    let out_dir = options.outdir.join(&video_id);
    let extraction = extract_narration_frames(
        &mut source,
        &mut PngSink,
        &table,
        &video_id,
        options.narrations,
        options.margin,
        &out_dir,
    )?;
    drop(source);
    println!("\nDone.");

    Ok(ExtractionReport {
        video_path,
        video_id,
        fps,
        frame_count,
        out_dir,
        extraction,
    })
}

/// Saves start/mid/end frames for the `count` earliest narrations of
/// `video_id` into `out_dir`.
///
/// Frames the source cannot decode are skipped without error; failing to
/// write a decoded frame is fatal.
pub fn extract_narration_frames<S, K>(
    source: &mut S,
    sink: &mut K,
    table: &AnnotationTable,
    video_id: &str,
    count: usize,
    margin: f64,
    out_dir: &Path,
) -> Result<Extraction>
where
    S: FrameSource,
    K: FrameSink<S::Frame>,
{
    let subset = table.filter_video(video_id);
    if subset.is_empty() {
        return Err(ToolError::NoNarrations {
            video_id: video_id.to_string(),
        }
        .into());
    }

    let selected = earliest(subset.narrations(), count);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let fps = source.fps();
    let total = source.frame_count();
    let mut extraction = Extraction::default();

    for (i, narration) in selected.iter().enumerate() {
        let sequence = i + 1;
        let window = NarrationWindow::compute(narration, margin);
        let plan = FramePlan::new(sequence, window, fps, total);

        println!("\nNarration {}: \"{}\"", sequence, narration.narration);
        println!(
            "  start={:.2}s -> frame {} | mid={:.2}s -> {} | end={} -> {}",
            window.start,
            plan.index_of(FrameRole::Start),
            window.mid,
            plan.index_of(FrameRole::Mid),
            window
                .end
                .map_or_else(|| "n/a".to_string(), |end| format!("{:.2}s", end)),
            plan.index_of(FrameRole::End),
        );

        for (role, frame_index) in plan.frames {
            let frame = match source.read_frame_at(frame_index) {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    extraction.skipped += 1;
                    continue;
                }
                Err(e) => {
                    logger::error(&format!("Decoding frame {} failed: {}", frame_index, e));
                    extraction.skipped += 1;
                    continue;
                }
            };

            let path = out_dir.join(timing::frame_file_name(sequence, role, frame_index));
            sink.save(&path, &frame)?;
            println!("Saved {}", path.display());
            extraction.saved.push(SavedFrame {
                sequence,
                role,
                frame_index,
                path,
            });
        }

        extraction.plans.push(plan);
    }

    logger::info(&format!(
        "extract: {} saved {} frames, skipped {}",
        video_id,
        extraction.saved.len(),
        extraction.skipped
    ));
    Ok(extraction)
}
