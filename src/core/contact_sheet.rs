use anyhow::Result;
use opencv::{core, imgproc, prelude::*};
use std::path::{Path, PathBuf};

use crate::core::timing;
use crate::decoder::image_io;
use crate::error::ToolError;
use crate::shared::config::Config;
use crate::shared::constants;
use crate::utils::file_utils::{self, Picker};
use crate::utils::logger;

#[derive(Debug, Clone)]
pub struct SheetOptions {
    /// Frames directory; `None` or a missing path falls back to the picker.
    pub dir: Option<PathBuf>,
    pub out: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SheetReport {
    pub source_dir: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub out: PathBuf,
    pub width: i32,
    pub height: i32,
}

/// Target sizes when every image is scaled to the shortest height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub height: i32,
    pub widths: Vec<i32>,
}

impl SheetLayout {
    /// `sizes` are `(width, height)`. Widths truncate toward zero but never
    /// reach it.
    pub fn for_sizes(sizes: &[(i32, i32)]) -> Option<Self> {
        let height = sizes.iter().map(|&(_, h)| h).filter(|&h| h > 0).min()?;
        let widths = sizes
            .iter()
            .map(|&(w, h)| {
                let scaled = w as f64 * height as f64 / h.max(1) as f64;
                (scaled as i32).max(1)
            })
            .collect();
        Some(Self { height, widths })
    }

    pub fn width(&self) -> i32 {
        self.widths.iter().sum()
    }
}

pub fn run_contact_sheet(
    config: &Config,
    options: &SheetOptions,
    picker: &dyn Picker,
) -> Result<SheetReport> {
    let source_dir = resolve_frames_dir(options.dir.as_deref(), &config.frames_outdir, picker)?;
    let inputs = select_frames(&source_dir, config.sheet_frames)?;
    logger::debug(&format!(
        "contact sheet inputs from {}: {:?}",
        source_dir.display(),
        inputs
    ));

    let images = inputs
        .iter()
        .map(|path| image_io::read_image(path))
        .collect::<Result<Vec<_>>>()?;

    let sheet = build_sheet(&images)?;
    image_io::write_image(&options.out, &sheet)?;
    println!("Saved contact sheet: {}", options.out.display());

    Ok(SheetReport {
        source_dir,
        inputs,
        out: options.out.clone(),
        width: sheet.cols(),
        height: sheet.rows(),
    })
}

/// `dir` when it exists, otherwise whichever subdirectory of `root` the
/// picker prefers.
pub fn resolve_frames_dir(
    dir: Option<&Path>,
    root: &Path,
    picker: &dyn Picker,
) -> Result<PathBuf> {
    if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
        if dir.is_dir() {
            return Ok(dir.to_path_buf());
        }
        println!("{} does not exist, guessing from {}", dir.display(), root.display());
    }

    let candidates = file_utils::subdirectories(root)?;
    picker.pick(&candidates).ok_or_else(|| {
        ToolError::NoFramesDir {
            root: root.to_path_buf(),
        }
        .into()
    })
}

/// The first narration's frames when there are at least `count` of them,
/// otherwise the first `count` images in the directory. Both sorted by name.
pub fn select_frames(dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    let mut frames = file_utils::list_matching(
        dir,
        &timing::sequence_prefix(1),
        constants::FRAME_EXTENSION,
    )?;
    if frames.len() < count {
        frames = file_utils::list_files(dir, constants::FRAME_EXTENSION)?;
    }
    if frames.is_empty() {
        return Err(ToolError::NoImages {
            dir: dir.to_path_buf(),
        }
        .into());
    }
    if frames.len() < count {
        return Err(ToolError::NotEnoughImages {
            dir: dir.to_path_buf(),
            found: frames.len(),
            needed: count,
        }
        .into());
    }

    frames.truncate(count);
    Ok(frames)
}

/// Scales every image to the shortest height (area interpolation) and joins
/// them left to right.
pub fn build_sheet(images: &[core::Mat]) -> Result<core::Mat> {
    let sizes: Vec<(i32, i32)> = images.iter().map(|m| (m.cols(), m.rows())).collect();
    let layout = SheetLayout::for_sizes(&sizes).ok_or_else(|| anyhow::anyhow!("no images to join"))?;

    let mut resized = core::Vector::<core::Mat>::new();
    for (image, &width) in images.iter().zip(&layout.widths) {
        let mut scaled = core::Mat::default();
        imgproc::resize(
            image,
            &mut scaled,
            core::Size::new(width, layout.height),
            0.0,
            0.0,
            imgproc::INTER_AREA,
        )?;
        resized.push(scaled);
    }

    let mut sheet = core::Mat::default();
    core::hconcat(&resized, &mut sheet)?;
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::file_utils::{Candidate, FirstByName, MostRecentlyModified};
    use std::fs;
    use std::time::{Duration, SystemTime};

    fn solid(width: i32, height: i32, value: f64) -> core::Mat {
        core::Mat::new_rows_cols_with_default(height, width, core::CV_8UC3, core::Scalar::all(value))
            .unwrap()
    }

    #[test]
    fn layout_scales_to_shortest_height() {
        let layout = SheetLayout::for_sizes(&[(200, 100), (60, 50), (40, 80)]).unwrap();
        assert_eq!(layout.height, 50);
        assert_eq!(layout.widths, vec![100, 60, 25]);
        assert_eq!(layout.width(), 185);

        assert_eq!(SheetLayout::for_sizes(&[]), None);
    }

    #[test]
    fn sheet_dimensions_follow_layout() {
        let images = vec![solid(200, 100, 10.0), solid(60, 50, 120.0), solid(40, 80, 250.0)];
        let sheet = build_sheet(&images).unwrap();
        assert_eq!(sheet.rows(), 50);
        assert_eq!(sheet.cols(), 185);
    }

    #[test]
    fn prefers_first_narration_frames() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "01_end_120.png",
            "01_mid_90.png",
            "01_start_60.png",
            "00_extra.png",
            "02_start_300.png",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let frames = select_frames(dir.path(), 3).unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["01_end_120.png", "01_mid_90.png", "01_start_60.png"]);
    }

    #[test]
    fn falls_back_to_first_three_images() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["01_start_0.png", "02_start_5.png", "02_mid_9.png", "03_end_4.png"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let frames = select_frames(dir.path(), 3).unwrap();
        assert_eq!(
            frames,
            vec![
                dir.path().join("01_start_0.png"),
                dir.path().join("02_mid_9.png"),
                dir.path().join("02_start_5.png"),
            ]
        );
    }

    #[test]
    fn empty_or_short_directories_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = select_frames(dir.path(), 3).unwrap_err();
        assert!(matches!(err.downcast_ref::<ToolError>(), Some(ToolError::NoImages { .. })));

        fs::write(dir.path().join("01_start_0.png"), b"").unwrap();
        let err = select_frames(dir.path(), 3).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ToolError>(),
            Some(ToolError::NotEnoughImages { found: 1, needed: 3, .. })
        ));
    }

    #[test]
    fn guesses_frames_dir_with_injected_picker() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("P01-a")).unwrap();
        fs::create_dir(root.path().join("P02-b")).unwrap();

        let chosen = resolve_frames_dir(None, root.path(), &FirstByName).unwrap();
        assert_eq!(chosen, root.path().join("P01-a"));

        let missing = root.path().join("not-here");
        let chosen = resolve_frames_dir(Some(&missing), root.path(), &FirstByName).unwrap();
        assert_eq!(chosen, root.path().join("P01-a"));

        let explicit = resolve_frames_dir(Some(&root.path().join("P02-b")), root.path(), &FirstByName)
            .unwrap();
        assert_eq!(explicit, root.path().join("P02-b"));
    }

    #[test]
    fn most_recent_picker_over_fixed_candidates() {
        struct Fixed(Vec<Candidate>);
        impl Picker for Fixed {
            fn pick(&self, _: &[Candidate]) -> Option<PathBuf> {
                MostRecentlyModified.pick(&self.0)
            }
        }

        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let picker = Fixed(vec![
            Candidate::with_modified("frames/old", t),
            Candidate::with_modified("frames/new", t + Duration::from_secs(1)),
        ]);
        let root = tempfile::tempdir().unwrap();
        let chosen = resolve_frames_dir(None, root.path(), &picker).unwrap();
        assert_eq!(chosen, PathBuf::from("frames/new"));
    }

    #[test]
    fn no_subdirectories_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let err = resolve_frames_dir(None, root.path(), &FirstByName).unwrap_err();
        assert!(matches!(err.downcast_ref::<ToolError>(), Some(ToolError::NoFramesDir { .. })));
    }

    #[test]
    fn builds_sheet_from_saved_frames() {
        let dir = tempfile::tempdir().unwrap();
        let frames = dir.path().join("frames").join("P01-a");
        image_io::write_image(&frames.join("01_start_0.png"), &solid(64, 48, 20.0)).unwrap();
        image_io::write_image(&frames.join("01_mid_5.png"), &solid(32, 24, 90.0)).unwrap();
        image_io::write_image(&frames.join("01_end_9.png"), &solid(30, 30, 200.0)).unwrap();

        let config = Config {
            frames_outdir: dir.path().join("frames"),
            ..Config::default()
        };
        let options = SheetOptions {
            dir: None,
            out: dir.path().join("out").join("sheet.png"),
        };

        let report = run_contact_sheet(&config, &options, &FirstByName).unwrap();
        assert_eq!(report.source_dir, frames);
        assert_eq!(report.height, 24);
        // end 30x30 -> 24, mid 32x24 -> 32, start 64x48 -> 32
        assert_eq!(report.width, 24 + 32 + 32);

        let written = image_io::read_image(&options.out).unwrap();
        assert_eq!((written.cols(), written.rows()), (88, 24));
    }

    #[test]
    fn undecodable_image_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["01_end_2.png", "01_mid_1.png", "01_start_0.png"] {
            fs::write(dir.path().join(name), b"not a png").unwrap();
        }
        let options = SheetOptions {
            dir: Some(dir.path().to_path_buf()),
            out: dir.path().join("sheet.png"),
        };

        let err = run_contact_sheet(&Config::default(), &options, &FirstByName).unwrap_err();
        assert!(matches!(err.downcast_ref::<ToolError>(), Some(ToolError::ImageDecode { .. })));
        assert!(!options.out.exists());
    }
}
