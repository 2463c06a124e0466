// src/api/types.rs
// =============================================================================
// This module defines the JSON shapes exchanged with the crawl server.
//
// The server is the source of truth: it runs the crawl, counts pages and
// links, and hands us snapshots. We only describe what those snapshots look
// like so serde can decode them.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate (de)serialization code
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

// The lifecycle state of a server-side crawl job
//
// #[serde(rename_all = "lowercase")] maps Running <-> "running" and so on.
// #[serde(other)] catches any state string we don't know about, so a newer
// server can't break deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Job accepted but not yet running
    Queued,
    /// Crawl in progress
    Running,
    /// Crawl finished normally
    Done,
    /// Crawl aborted with an error
    Failed,
    /// Crawl stopped on request
    Canceled,
    /// Any state string we don't recognize
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// Returns true for states after which the server will never report
    /// further progress. The poll loop stops rescheduling on these.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Failed | JobState::Canceled)
    }
}

// Display is used for user-facing messages like "Job finished: done"
impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Done => "done",
            JobState::Failed => "failed",
            JobState::Canceled => "canceled",
            JobState::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

// One snapshot of job counters from GET /api/status
//
// Every poll cycle replaces the previous snapshot - we keep no history.
// #[serde(default)] on the struct means any missing field becomes its
// Default value (0 for counters, Unknown for the state), so a sparse
// payload still decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobStatus {
    /// Current lifecycle state
    pub state: JobState,
    /// Pages fetched so far
    pub visited: u64,
    /// Pages waiting in the server's crawl queue
    pub queued: u64,
    /// Pages discovered (visited + queued + in flight)
    pub discovered: u64,
    /// Fetch errors encountered
    pub errors: u64,
    /// Links whose check has completed
    pub checked_links: u64,
    /// Links found so far (checked or not)
    pub total_links: u64,
}

// One checked link from GET /api/results
//
// The server serializes absent values as their zero value (empty string,
// 0, false), so we mirror that with #[serde(default)] instead of wrapping
// everything in Option. The helper methods below give the "is it really
// there?" view. Unknown fields (the server also sends a crawl depth) are
// ignored by serde automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultRecord {
    /// The URL that was checked
    pub url: String,
    /// The page the URL was found on (empty for the seed URL)
    pub page_url: String,
    /// HTTP status code, 0 when the request never got a response
    pub status_code: u16,
    /// Error text for failed checks; empty means no error
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// How long the check took, 0 when unknown
    pub elapsed_ms: i64,
    /// True if the URL belongs to the crawled site
    pub internal: bool,
}

impl ResultRecord {
    /// True when the check produced an error message.
    ///
    /// An error wins over any status code when classifying the record.
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// The page this link was found on, or None for the seed URL.
    pub fn source_page(&self) -> Option<&str> {
        if self.page_url.is_empty() {
            None
        } else {
            Some(self.page_url.as_str())
        }
    }
}

// Body for POST /api/start
#[derive(Debug, Clone, Serialize)]
pub struct StartRequest {
    /// Where the crawl begins
    pub start_url: String,
    /// How many link levels to follow (0-5)
    pub depth: u32,
    /// Whether the server should honor robots.txt
    pub respect_robots: bool,
}

// Response from POST /api/start
#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    /// Opaque handle for all later status/results/stop calls
    pub job_id: String,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[serde(default)] instead of Option<T>?
//    - The server writes zero values for absent data ("" / 0 / false)
//    - Option<String> would give us Some("") anyway, so it buys nothing
//    - Defaults keep the structs flat and the field access simple
//    - The helper methods (has_error, source_page) express optionality
//      where it actually matters
//
// 2. What does #[serde(other)] do?
//    - Marks one enum variant as the catch-all for unknown strings
//    - Without it, a new server state like "paused" would be a hard
//      deserialization error and kill the poll cycle
//
// 3. Why derive PartialEq/Eq?
//    - Tests compare whole snapshots and records with assert_eq!
//    - Eq is free here because none of the fields are floats
// -----------------------------------------------------------------------------
