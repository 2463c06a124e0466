// src/monitor/classify.rs
// =============================================================================
// This module buckets result records into status classes and decides which
// records a view filter shows.
//
// Classes mirror HTTP status code families plus an error bucket:
//   2 = success, 3 = redirect, 4 = client error, 5 = server error, e = error
//
// Both functions here are pure: no I/O, no shared state, same input always
// gives the same output. The renderer calls them fresh on every pass.
//
// Rust concepts:
// - match with ranges: 200..=299 covers a whole code family
// - FromStr: lets clap parse "--filter e" straight into a ViewMode
// =============================================================================

use std::str::FromStr;

use crate::api::ResultRecord;

// The status class of one checked link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx - the link works
    Success,
    /// 3xx - the link redirects
    Redirect,
    /// 4xx - the link is broken on the client side (404 etc.)
    ClientError,
    /// 5xx - the server behind the link is failing
    ServerError,
    /// Network error, timeout, or a status code outside 200-599
    Error,
}

impl StatusClass {
    /// The one-character tag used by filters ("2".."5", "e").
    pub fn tag(self) -> char {
        match self {
            StatusClass::Success => '2',
            StatusClass::Redirect => '3',
            StatusClass::ClientError => '4',
            StatusClass::ServerError => '5',
            StatusClass::Error => 'e',
        }
    }

    /// True for the classes counted as "broken" in the summary (4/5/e).
    pub fn is_broken(self) -> bool {
        matches!(
            self,
            StatusClass::ClientError | StatusClass::ServerError | StatusClass::Error
        )
    }
}

/// Maps one result record to its status class.
///
/// Priority order matters: an error message wins over whatever status code
/// the record carries (a timeout after a 200 handshake is still an error).
pub fn classify(record: &ResultRecord) -> StatusClass {
    if record.has_error() {
        return StatusClass::Error;
    }
    match record.status_code {
        200..=299 => StatusClass::Success,
        300..=399 => StatusClass::Redirect,
        400..=499 => StatusClass::ClientError,
        500..=599 => StatusClass::ServerError,
        // 0 means "no response"; anything outside 200-599 isn't a real code
        _ => StatusClass::Error,
    }
}

// Which rows the table shows
//
// Exactly one mode is active at a time, chosen with --filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Show every record
    #[default]
    All,
    /// Only links on the crawled site
    Internal,
    /// Only links pointing off-site
    External,
    /// Only records of one status class
    Class(StatusClass),
}

impl ViewMode {
    /// The filter predicate: does this record belong in the current view?
    pub fn matches(self, record: &ResultRecord) -> bool {
        match self {
            ViewMode::All => true,
            ViewMode::Internal => record.internal,
            ViewMode::External => !record.internal,
            ViewMode::Class(class) => classify(record) == class,
        }
    }
}

// Parses the --filter argument ("all", "internal", "external", "2".."5", "e")
impl FromStr for ViewMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "all" => Ok(ViewMode::All),
            "internal" => Ok(ViewMode::Internal),
            "external" => Ok(ViewMode::External),
            "2" => Ok(ViewMode::Class(StatusClass::Success)),
            "3" => Ok(ViewMode::Class(StatusClass::Redirect)),
            "4" => Ok(ViewMode::Class(StatusClass::ClientError)),
            "5" => Ok(ViewMode::Class(StatusClass::ServerError)),
            "e" => Ok(ViewMode::Class(StatusClass::Error)),
            other => Err(format!(
                "unknown filter '{}' (expected all, internal, external, 2, 3, 4, 5 or e)",
                other
            )),
        }
    }
}
