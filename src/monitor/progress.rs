// src/monitor/progress.rs
// =============================================================================
// This module derives a display percentage from raw crawl counters.
//
// The server exposes two independent pairs of counters:
// - pages:  visited / discovered
// - links:  checked_links / total_links
//
// We average the two percentages for the progress bar. Because "discovered"
// and "total_links" keep growing while the crawl runs, the math can hit 100
// long before the job is actually finished - so the displayed percent is
// capped at 99 until the server says state == done.
// =============================================================================

use crate::api::{JobState, JobStatus};

// What the progress bar needs to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Display percentage, always within 0..=100
    pub percent: u8,
    /// True when the job looks finished (see compute_progress)
    pub is_done: bool,
}

/// Derives the display progress from one status snapshot.
///
/// `is_done` is true when the server reports `done`, or when both counter
/// pairs are saturated (every discovered page visited AND every found link
/// checked). The saturation heuristic covers the window where the server
/// has finished counting but hasn't flipped its state field yet, which
/// would otherwise leave the bar stuck just short of the end.
///
/// The percent itself never reaches 100 before `state == done`: completion
/// is confirmed by the server, not guessed from counters.
pub fn compute_progress(status: &JobStatus) -> Progress {
    let pages_pct = ratio_pct(status.visited, status.discovered);
    let links_pct = ratio_pct(status.checked_links, status.total_links);
    let combined = ((pages_pct as f64 + links_pct as f64) / 2.0).round() as u8;

    let percent = if status.state == JobState::Done {
        100
    } else {
        combined.min(99)
    };

    let saturated = status.total_links > 0
        && status.checked_links >= status.total_links
        && status.discovered > 0
        && status.visited >= status.discovered;

    Progress {
        percent,
        is_done: status.state == JobState::Done || saturated,
    }
}

// part/whole as a rounded percentage, clamped to 0..=100
//
// A zero denominator means "nothing counted yet", which reads as 0%.
fn ratio_pct(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (part as f64 * 100.0 / whole as f64).round();
    pct.min(100.0) as u8
}
