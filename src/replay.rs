//! Replay of recorded pointer movement through a trail session
//!
//! Recordings are the JSON mouse-move arrays written by cursor capture
//! tools: one camelCase object per sample with viewport `x`/`y` and the
//! time since recording start in `processTimeMs`.

use crate::session::TrailSession;
use crate::surface::RenderSurface;
use crate::trail::FrameDecision;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or replaying a recording
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse mouse moves: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    #[error("Mouse move {index} has a non-finite timestamp")]
    InvalidTimestamp { index: usize },
}

/// Result type for replay operations
pub type ReplayResult<T> = Result<T, ReplayError>;

/// One recorded pointer sample
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedMove {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub cursor_id: String,
    #[serde(default)]
    pub active_modifiers: Vec<String>,
    pub process_time_ms: f64,
    #[serde(default)]
    pub unix_time_ms: u64,
}

impl RecordedMove {
    pub fn new(x: f64, y: f64, process_time_ms: f64) -> Self {
        Self {
            x,
            y,
            cursor_id: String::new(),
            active_modifiers: Vec::new(),
            process_time_ms,
            unix_time_ms: 0,
        }
    }
}

/// Summary of a replay run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Output frames covered by the replay, skipped idle frames included
    pub frames: u64,
    pub moves: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub evicted: u64,
    pub expired: u64,
    /// Largest number of simultaneously live points
    pub peak_len: usize,
}

/// Read a recorded mouse-move array from disk
pub fn load_moves(path: &Path) -> ReplayResult<Vec<RecordedMove>> {
    let content = std::fs::read_to_string(path)?;
    let moves: Vec<RecordedMove> = serde_json::from_str(&content)?;
    tracing::debug!("Loaded {} mouse moves from {}", moves.len(), path.display());
    Ok(moves)
}

/// Play `moves` through `session` at `fps` frames per second
///
/// Each output frame first feeds every move recorded up to that frame's
/// time, then runs one decay tick. Frames with an empty trail and no move
/// due are skipped without ticking. After the last move the trail keeps
/// ticking until every point has faded. An idle session is started first.
pub fn replay<S: RenderSurface>(
    session: &mut TrailSession<S>,
    moves: &[RecordedMove],
    fps: f64,
) -> ReplayResult<ReplayReport> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ReplayError::InvalidFrameRate(fps));
    }
    if let Some(index) = moves.iter().position(|m| !m.process_time_ms.is_finite()) {
        return Err(ReplayError::InvalidTimestamp { index });
    }

    let mut ordered: Vec<&RecordedMove> = moves.iter().collect();
    ordered.sort_by(|a, b| a.process_time_ms.total_cmp(&b.process_time_ms));

    session.start();
    let before = session.stats();
    let frame_duration_ms = 1000.0 / fps;

    let mut report = ReplayReport::default();
    let mut next = 0;

    loop {
        let frame_time_ms = report.frames as f64 * frame_duration_ms;

        while next < ordered.len() && ordered[next].process_time_ms <= frame_time_ms {
            let m = ordered[next];
            session.pointer_move(m.x, m.y);
            report.moves += 1;
            report.peak_len = report.peak_len.max(session.len());
            next += 1;
        }

        if session.is_empty() {
            let Some(upcoming) = ordered.get(next) else {
                break;
            };
            // Nothing to decay until the next move lands; skip the idle frames
            let target = (upcoming.process_time_ms / frame_duration_ms).ceil() as u64;
            if target > report.frames {
                report.frames = target;
                continue;
            }
        }
        if session.tick() == FrameDecision::Stop {
            break;
        }
        report.frames += 1;
    }

    let after = session.stats();
    report.accepted = after.accepted - before.accepted;
    report.rejected = after.rejected - before.rejected;
    report.evicted = after.evicted - before.evicted;
    report.expired = after.expired - before.expired;

    tracing::info!(
        "Replayed {} moves over {} frames at {}fps (accepted={}, peak={})",
        report.moves,
        report.frames,
        fps,
        report.accepted,
        report.peak_len
    );

    Ok(report)
}
