use crate::annotations::Narration;
use crate::shared::constants;

/// Frame position for a timestamp in seconds.
///
/// Undefined timestamps map to frame 0. Otherwise `ts * fps` is rounded half
/// to even and clamped into `[0, total_frames - 1]`.
pub fn frame_index(ts: Option<f64>, fps: f64, total_frames: i64) -> i64 {
    let Some(ts) = ts.filter(|t| t.is_finite()) else {
        return 0;
    };
    let last = (total_frames - 1).max(0);
    let idx = (ts * fps).round_ties_even();
    if idx.is_nan() {
        return 0;
    }
    (idx.max(0.0).min(last as f64)) as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRole {
    Start,
    Mid,
    End,
}

impl FrameRole {
    pub const ALL: [FrameRole; 3] = [FrameRole::Start, FrameRole::Mid, FrameRole::End];

    pub fn tag(self) -> &'static str {
        match self {
            FrameRole::Start => "start",
            FrameRole::Mid => "mid",
            FrameRole::End => "end",
        }
    }
}

/// Seconds at which one narration is sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrationWindow {
    pub start: f64,
    pub mid: f64,
    pub end: Option<f64>,
}

impl NarrationWindow {
    /// Shifts the start back by `margin` (negative margins count as zero),
    /// never below 0. The end is taken as stored.
    pub fn compute(narration: &Narration, margin: f64) -> Self {
        let margin = margin.max(0.0);
        let start = (narration.start_timestamp.unwrap_or(0.0) - margin).max(0.0);
        let end = narration.end_timestamp;
        let mid = match end {
            Some(end) if end > start => (start + end) / 2.0,
            _ => start,
        };
        Self { start, mid, end }
    }

    pub fn seconds(&self, role: FrameRole) -> Option<f64> {
        match role {
            FrameRole::Start => Some(self.start),
            FrameRole::Mid => Some(self.mid),
            FrameRole::End => self.end,
        }
    }
}

/// Frame indices to grab for one narration, in start/mid/end order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub sequence: usize,
    pub window: NarrationWindow,
    pub frames: [(FrameRole, i64); 3],
}

impl FramePlan {
    pub fn new(sequence: usize, window: NarrationWindow, fps: f64, total_frames: i64) -> Self {
        let frames = FrameRole::ALL
            .map(|role| (role, frame_index(window.seconds(role), fps, total_frames)));
        Self {
            sequence,
            window,
            frames,
        }
    }

    pub fn index_of(&self, role: FrameRole) -> i64 {
        self.frames
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, idx)| *idx)
            .unwrap_or(0)
    }
}

/// `01_start_60.png` style name for a saved frame.
pub fn frame_file_name(sequence: usize, role: FrameRole, frame_index: i64) -> String {
    format!(
        "{:02}_{}_{}.{}",
        sequence,
        role.tag(),
        frame_index,
        constants::FRAME_EXTENSION
    )
}

/// Filename prefix shared by every frame of narration `sequence`.
pub fn sequence_prefix(sequence: usize) -> String {
    format!("{:02}_", sequence)
}
