use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A filesystem entry offered to a [`Picker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            modified: None,
        }
    }

    pub fn with_modified(path: impl Into<PathBuf>, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            modified: Some(modified),
        }
    }
}

/// Chooses one path out of several when the user did not name one.
pub trait Picker {
    fn pick(&self, candidates: &[Candidate]) -> Option<PathBuf>;
}

/// Lowest path in byte order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstByName;

impl Picker for FirstByName {
    fn pick(&self, candidates: &[Candidate]) -> Option<PathBuf> {
        candidates
            .iter()
            .map(|c| &c.path)
            .min()
            .cloned()
    }
}

/// Newest modification time; entries without one lose, ties go to the
/// lowest path.
#[derive(Debug, Default, Clone, Copy)]
pub struct MostRecentlyModified;

impl Picker for MostRecentlyModified {
    fn pick(&self, candidates: &[Candidate]) -> Option<PathBuf> {
        candidates
            .iter()
            .max_by(|a, b| {
                a.modified
                    .cmp(&b.modified)
                    .then_with(|| b.path.cmp(&a.path))
            })
            .map(|c| c.path.clone())
    }
}

pub fn has_allowed_extension(path: &Path, extension: &str) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    ext.eq_ignore_ascii_case(extension)
}

/// Every file below `root` (any depth) with the given extension, sorted.
pub fn find_files_recursive(root: &Path, extension: &str) -> Result<Vec<Candidate>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = root.join("**").join("*");
    let pattern = pattern.to_string_lossy();
    let mut files: Vec<Candidate> = glob::glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(Result::ok)
        .filter(|path| path.is_file() && has_allowed_extension(path, extension))
        .map(Candidate::new)
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Files directly inside `dir` whose name starts with `prefix` and ends in
/// `.extension`, sorted by name.
pub fn list_matching(dir: &Path, prefix: &str, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_allowed_extension(path, extension))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.starts_with(prefix))
        })
        .collect();

    // Zero-padded sequence numbers keep narration order under a plain sort.
    files.sort();
    Ok(files)
}

pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    list_matching(dir, "", extension)
}

/// Immediate subdirectories of `dir` with their modification times. A
/// missing `dir` yields an empty list.
pub fn subdirectories(dir: &Path) -> Result<Vec<Candidate>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let dirs = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified()).ok();
            Candidate {
                path: entry.path(),
                modified,
            }
        })
        .collect();
    Ok(dirs)
}

/// Annotation key for a video file: its stem up to the first `marker`.
/// `P01-20240204-130448_mp4_to_vrs_time.mp4` becomes `P01-20240204-130448`.
pub fn infer_video_id(path: &Path, marker: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if marker.is_empty() {
        return stem;
    }
    match stem.find(marker) {
        Some(pos) => stem[..pos].to_string(),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_by_name_ignores_input_order() {
        let candidates = vec![
            Candidate::new("data/P02/b.mp4"),
            Candidate::new("data/P01/z.mp4"),
            Candidate::new("data/P01/a.mp4"),
        ];
        assert_eq!(
            FirstByName.pick(&candidates),
            Some(PathBuf::from("data/P01/a.mp4"))
        );
        assert_eq!(FirstByName.pick(&[]), None);
    }

    #[test]
    fn most_recent_prefers_newest_mtime() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let candidates = vec![
            Candidate::with_modified("frames/old", base),
            Candidate::with_modified("frames/new", base + Duration::from_secs(60)),
            Candidate::new("frames/unknown"),
        ];
        assert_eq!(
            MostRecentlyModified.pick(&candidates),
            Some(PathBuf::from("frames/new"))
        );
    }

    #[test]
    fn most_recent_breaks_ties_by_name() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(5);
        let candidates = vec![
            Candidate::with_modified("frames/b", t),
            Candidate::with_modified("frames/a", t),
        ];
        assert_eq!(
            MostRecentlyModified.pick(&candidates),
            Some(PathBuf::from("frames/a"))
        );
    }

    #[test]
    fn video_id_strips_marker_suffix() {
        assert_eq!(
            infer_video_id(Path::new("x/P01-20240204-130448_mp4_to_vrs_time.mp4"), "_mp4"),
            "P01-20240204-130448"
        );
        assert_eq!(
            infer_video_id(Path::new("P01-20240204-130448.mp4"), "_mp4"),
            "P01-20240204-130448"
        );
        assert_eq!(infer_video_id(Path::new("clip_mp4.mp4"), ""), "clip_mp4");
    }

    #[test]
    fn recursive_discovery_and_listing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("P01").join("day1");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.MP4"), b"").unwrap();
        fs::write(dir.path().join("P01").join("a.mp4"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let videos = find_files_recursive(dir.path(), "mp4").unwrap();
        let names: Vec<_> = videos
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.MP4"]);

        assert!(find_files_recursive(&dir.path().join("missing"), "mp4")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn list_matching_filters_prefix_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["02_start_5.png", "01_mid_3.png", "01_start_0.png", "01_end.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let firsts = list_matching(dir.path(), "01_", "png").unwrap();
        assert_eq!(
            firsts,
            vec![dir.path().join("01_mid_3.png"), dir.path().join("01_start_0.png")]
        );
        assert_eq!(list_files(dir.path(), "png").unwrap().len(), 3);
    }

    #[test]
    fn subdirectories_skips_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("P01")).unwrap();
        fs::write(dir.path().join("stray.png"), b"").unwrap();

        let subdirs = subdirectories(dir.path()).unwrap();
        assert_eq!(subdirs.len(), 1);
        assert_eq!(subdirs[0].path, dir.path().join("P01"));
        assert!(subdirs[0].modified.is_some());
    }
}
