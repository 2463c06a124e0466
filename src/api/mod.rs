// src/api/mod.rs
// =============================================================================
// This module is the HTTP boundary to the crawl server.
//
// Submodules:
// - types: the JSON payload shapes (status snapshots, result records)
// - client: the typed client for the four server endpoints
//
// Everything beyond this boundary (fetching, robots.txt, link discovery)
// runs server-side; we only consume its API.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod client;
mod types;

// Re-export public items from submodules
// This lets users write `api::ApiClient` instead of `api::client::ApiClient`
pub use client::ApiClient;
pub use types::{JobState, JobStatus, ResultRecord, StartRequest};
