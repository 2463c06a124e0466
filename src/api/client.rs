// src/api/client.rs
// =============================================================================
// This module talks to the crawl server's HTTP API.
//
// Four endpoints, all owned by the server:
// - POST /api/start    begin a crawl, returns a job id
// - GET  /api/status   counter snapshot for a job
// - GET  /api/results  the complete current result set (not a delta!)
// - POST /api/stop     ask the server to cancel a job
//
// Rust concepts:
// - async/await: Network I/O without blocking the thread
// - Result<T, E>: For error handling with the ? operator
// - Clone: The client is cheap to clone (reqwest pools connections)
// =============================================================================

use anyhow::{bail, Context, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::api::types::{JobStatus, ResultRecord, StartRequest, StartResponse};

// A typed handle on the crawl server's API
//
// Cloning is cheap: reqwest::Client is internally reference-counted, so
// clones share one connection pool. The Ctrl-C handler holds a clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Creates a client for the server at `server` (e.g. "http://127.0.0.1:8080").
    pub fn new(server: &str) -> Result<Self> {
        let base = Url::parse(server)
            .with_context(|| format!("invalid server address '{}'", server))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            bail!("server address must use http or https, got '{}'", server);
        }

        // One client for all requests (connection pooling)
        // 10 seconds is generous for a localhost API; without a timeout a
        // hung server would stall a poll cycle forever
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { http, base })
    }

    // Joins an endpoint path onto the base address
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("cannot build endpoint URL for '{}'", path))
    }

    /// Starts a crawl job. Returns the job id the server assigned.
    pub async fn start_job(&self, request: &StartRequest) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint("/api/start")?)
            .json(request)
            .send()
            .await
            .context("start request failed")?;

        if !response.status().is_success() {
            bail!("server refused to start the job (HTTP {})", response.status());
        }

        let payload: StartResponse = response
            .json()
            .await
            .context("start response was not valid JSON")?;
        Ok(payload.job_id)
    }

    /// Fetches the current counter snapshot for a job.
    pub async fn fetch_status(&self, job_id: &str) -> Result<JobStatus> {
        let response = self
            .http
            .get(self.endpoint("/api/status")?)
            .query(&[("job", job_id)]) // .query() percent-encodes the id for us
            .send()
            .await
            .context("status request failed")?;

        if !response.status().is_success() {
            bail!("status request rejected (HTTP {})", response.status());
        }

        response
            .json()
            .await
            .context("status response was not valid JSON")
    }

    /// Fetches the complete current result set for a job.
    ///
    /// The server always returns the full set, so the caller replaces its
    /// local copy wholesale instead of merging.
    pub async fn fetch_results(&self, job_id: &str) -> Result<Vec<ResultRecord>> {
        let response = self
            .http
            .get(self.endpoint("/api/results")?)
            .query(&[("job", job_id)])
            .send()
            .await
            .context("results request failed")?;

        if !response.status().is_success() {
            bail!("results request rejected (HTTP {})", response.status());
        }

        response
            .json()
            .await
            .context("results response was not valid JSON")
    }

    /// Asks the server to cancel a job.
    ///
    /// Stopping is advisory: the authoritative state change happens
    /// server-side, and callers are free to ignore a failure here.
    pub async fn stop_job(&self, job_id: &str) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint("/api/stop")?)
            .query(&[("job", job_id)])
            .send()
            .await
            .context("stop request failed")?;

        if !response.status().is_success() {
            bail!("stop request rejected (HTTP {})", response.status());
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why bail! on non-2xx responses?
//    - reqwest only errors on transport problems, not on HTTP status codes
//    - A 404 or 500 body would otherwise be fed to the JSON decoder
//    - bail!(...) is anyhow's shorthand for "return Err(anyhow!(...))"
//
// 2. What does .context() add?
//    - Wraps the underlying error with a human-readable layer
//    - "status request failed: connection refused" beats a bare
//      "connection refused" when several requests run per cycle
//
// 3. Why does stop_job return Result at all if failures are ignorable?
//    - The caller decides the policy: the watch loop logs and moves on,
//      the standalone `stop` subcommand reports the error to the user
// -----------------------------------------------------------------------------
