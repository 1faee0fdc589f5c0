pub const APP_NAME: &str = "hdepic-tools";

pub const CONFIG_FILE: &str = "hdepic_tools.json";
pub const CONFIG_ENV_VAR: &str = "HDEPIC_TOOLS_CONFIG";

pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

pub const DEFAULT_ANNOTATIONS_PATH: &str =
    "data/annotations/narrations-and-action-segments/HD_EPIC_Narrations.csv";
pub const DEFAULT_VIDEO_ROOT: &str = "data/raw/HD-EPIC";
pub const DEFAULT_PEEK_OUTDIR: &str = "outputs";
pub const DEFAULT_FRAMES_OUTDIR: &str = "outputs/frames_by_narration";
pub const DEFAULT_CONTACT_SHEET: &str = "outputs/contact_sheet.png";
pub const DEFAULT_LOG_DIR: &str = "outputs/logs";

pub const VIDEO_EXTENSION: &str = "mp4";
pub const FRAME_EXTENSION: &str = "png";

/// Everything from this marker onwards in a video file stem is dropped to
/// recover the annotation `video_id` (`P01-20240204-130448_mp4_to_vrs_time`).
pub const VIDEO_ID_MARKER: &str = "_mp4";

pub const FALLBACK_FPS: f64 = 30.0;
pub const PREVIEW_ROWS: usize = 10;
pub const EXPORT_ROWS: usize = 50;
pub const DEFAULT_NARRATIONS: usize = 3;
pub const SHEET_FRAMES: usize = 3;

/// Seconds added to the start when a row carries no end column at all.
pub const MISSING_END_PAD_SECS: f64 = 0.5;

pub const PREVIEW_COLUMNS: &[&str] = &[
    "participant_id",
    "video_id",
    "narration",
    "start_timestamp",
    "end_timestamp",
];
