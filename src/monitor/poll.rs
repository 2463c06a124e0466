// src/monitor/poll.rs
// =============================================================================
// This module owns one monitoring session: start a job, poll it, stop it.
//
// The poll loop is deliberately boring:
// 1. Check the stop token - if set, we're done
// 2. Fetch the status snapshot and report progress
// 3. Fetch the full result set and report a fresh render
// 4. Terminal state? Report it and return. Otherwise sleep and repeat
//
// Cycles are strictly sequential: cycle N+1 only starts after cycle N has
// finished rendering, so there are never overlapping in-flight polls.
// Cancellation is cooperative - a cycle that is already running completes
// and renders once more; it is the NEXT cycle that never starts.
//
// One session owns one job id for its entire lifetime. Watching a new job
// means building a new session with a fresh stop token, so a late response
// for an old job has no session left to poison.
//
// Rust concepts:
// - CancellationToken: a clonable, one-way "please stop" switch
// - FnMut callback: the loop reports events, the caller decides how to
//   display them (and tests just collect them in a Vec)
// =============================================================================

use anyhow::{bail, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::api::{ApiClient, JobState, JobStatus, ResultRecord, StartRequest};
use crate::monitor::classify::ViewMode;
use crate::monitor::progress::{compute_progress, Progress};
use crate::render::{render, RenderOutput};

/// Default delay between poll cycles. Tunable via --interval-ms.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(800);

// Everything needed to start watching a job
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Where the crawl begins; must be an http(s) URL
    pub start_url: String,
    /// Crawl depth, clamped to 0..=5 before sending
    pub depth: u32,
    /// Whether the server should honor robots.txt
    pub respect_robots: bool,
    /// Which rows the renders show
    pub mode: ViewMode,
    /// Delay between poll cycles
    pub interval: Duration,
}

// What the poll loop reports as it runs
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// A fresh status snapshot with derived progress (once per cycle)
    Progress { status: JobStatus, progress: Progress },
    /// The result set was replaced and re-rendered
    Table(RenderOutput),
    /// The job reached a terminal state; this is the last event
    Finished { state: JobState, progress: Progress },
    /// The stop flag ended the loop before the job finished
    Stopped,
}

// How the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The server reported a terminal state
    Finished(JobState),
    /// The local stop flag won the race
    Stopped,
}

// One job being watched: the job handle, the local result mirror, and the
// stop flag all live here instead of in globals
#[derive(Debug)]
pub struct MonitorSession {
    client: ApiClient,
    job_id: String,
    mode: ViewMode,
    interval: Duration,
    stop: CancellationToken,
    results: Vec<ResultRecord>,
}

impl MonitorSession {
    /// Validates the options, starts a job on the server, and returns a
    /// session ready to poll.
    ///
    /// Validation failures and start failures both come back as errors
    /// before any polling begins. A bad start URL never reaches the wire.
    pub async fn start(client: ApiClient, options: WatchOptions) -> Result<Self> {
        validate_start_url(&options.start_url)?;

        let request = StartRequest {
            start_url: options.start_url.clone(),
            depth: options.depth.min(5),
            respect_robots: options.respect_robots,
        };
        let job_id = client.start_job(&request).await?;
        log::debug!("started job {} for {}", job_id, options.start_url);

        Ok(Self {
            client,
            job_id,
            mode: options.mode,
            interval: options.interval,
            // Fresh token and empty result set: nothing from a previous
            // job can leak into this session
            stop: CancellationToken::new(),
            results: Vec::new(),
        })
    }

    /// The job handle the server assigned.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// The result set from the last successful results fetch.
    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    /// A clonable handle that can stop this session from another task
    /// (the Ctrl-C handler holds one).
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            token: self.stop.clone(),
            client: self.client.clone(),
            job_id: self.job_id.clone(),
        }
    }

    /// Runs the poll loop until the job finishes or the stop flag is set.
    ///
    /// Transient fetch failures are absorbed: a failed status fetch skips
    /// the rest of that cycle, a failed results fetch only skips the table
    /// refresh, and in both cases the loop keeps its schedule. An
    /// unreachable server therefore means silent retries every interval
    /// until someone stops the session.
    pub async fn run<F>(&mut self, mut on_event: F) -> PollOutcome
    where
        F: FnMut(PollEvent),
    {
        loop {
            // Scheduling is gated here and only here
            if self.stop.is_cancelled() {
                on_event(PollEvent::Stopped);
                return PollOutcome::Stopped;
            }

            let status = match self.client.fetch_status(&self.job_id).await {
                Ok(status) => status,
                Err(err) => {
                    log::debug!("status fetch failed for job {}: {:#}", self.job_id, err);
                    self.wait_for_next_cycle().await;
                    continue;
                }
            };

            let progress = compute_progress(&status);
            on_event(PollEvent::Progress {
                status: status.clone(),
                progress,
            });

            match self.client.fetch_results(&self.job_id).await {
                Ok(records) => {
                    // Full replacement, no merging - the server sends the
                    // complete set every time
                    self.results = records;
                    on_event(PollEvent::Table(render(&self.results, self.mode)));
                }
                Err(err) => {
                    log::debug!("results fetch failed for job {}: {:#}", self.job_id, err);
                }
            }

            if status.state.is_terminal() {
                on_event(PollEvent::Finished {
                    state: status.state,
                    progress,
                });
                return PollOutcome::Finished(status.state);
            }

            self.wait_for_next_cycle().await;
        }
    }

    // Sleeps one interval, waking early if the stop flag is set so the
    // loop can notice it at the top without waiting out the delay
    async fn wait_for_next_cycle(&self) {
        tokio::select! {
            _ = tokio::time::sleep(self.interval) => {}
            _ = self.stop.cancelled() => {}
        }
    }
}

// A detached stop switch for a running session
#[derive(Debug, Clone)]
pub struct StopHandle {
    token: CancellationToken,
    client: ApiClient,
    job_id: String,
}

impl StopHandle {
    /// Stops the session: sets the local flag first, then tells the server.
    ///
    /// The flag is set regardless of what the server answers, so polling
    /// halts client-side even when the stop request is lost.
    pub async fn stop(&self) {
        self.token.cancel();
        if let Err(err) = self.client.stop_job(&self.job_id).await {
            // Best effort only - the server drives the authoritative state
            log::debug!("stop request failed for job {}: {:#}", self.job_id, err);
        }
    }
}

/// Checks that a start URL is something the server will accept.
///
/// Only http and https schemes qualify; anything else is reported to the
/// user before a single request goes out.
pub fn validate_start_url(raw: &str) -> Result<()> {
    let parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(_) => bail!("'{}' is not a valid URL - it must start with http:// or https://", raw),
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        bail!(
            "'{}' uses the '{}' scheme - only http:// and https:// URLs can be crawled",
            raw,
            parsed.scheme()
        );
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a callback instead of printing inside the loop?
//    - The loop stays testable: tests pass a closure that pushes events
//      into a Vec and then assert on the sequence
//    - main.rs passes a closure that prints, writes the report file, etc.
//    - FnMut means the closure may mutate its captures (the Vec!)
//
// 2. Why tokio::select! in wait_for_next_cycle?
//    - A plain sleep would delay the Stopped event by up to one interval
//    - select! races the sleep against the token and takes whichever
//      finishes first
//
// 3. Why does run() not return Result?
//    - Every network failure inside the loop is absorbed by design
//    - The only outcomes are "job ended" and "user stopped it"
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(mode: ViewMode) -> WatchOptions {
        WatchOptions {
            start_url: "https://site.example/".to_string(),
            depth: 2,
            respect_robots: false,
            mode,
            // Fast cycles so tests finish quickly
            interval: Duration::from_millis(10),
        }
    }

    async fn mount_start(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "job_id": "job1"
            })))
            .mount(server)
            .await;
    }

    fn running_status() -> serde_json::Value {
        serde_json::json!({
            "state": "running", "visited": 5, "queued": 3, "discovered": 10,
            "errors": 0, "checked_links": 0, "total_links": 0
        })
    }

    fn done_status() -> serde_json::Value {
        serde_json::json!({
            "state": "done", "visited": 10, "queued": 0, "discovered": 10,
            "errors": 1, "checked_links": 20, "total_links": 20
        })
    }

    #[tokio::test]
    async fn bad_start_url_never_reaches_the_server() {
        let server = MockServer::start().await;
        // expect(0) turns any request into a test failure on drop
        Mock::given(method("POST"))
            .and(path("/api/start"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut opts = options(ViewMode::All);
        opts.start_url = "ftp://x".to_string();
        let err = MonitorSession::start(client, opts).await.unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[tokio::test]
    async fn start_failure_means_no_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/start"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        assert!(MonitorSession::start(client, options(ViewMode::All))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn polls_until_terminal_state() {
        let server = MockServer::start().await;
        mount_start(&server).await;
        // First status call sees a running job, every later one sees done.
        // Mount order matters: the limited mock is consulted first.
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(running_status()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(done_status()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"url": "https://site.example/", "page_url": "", "status_code": 200,
                 "elapsed_ms": 30, "internal": true}
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut session = MonitorSession::start(client, options(ViewMode::All))
            .await
            .unwrap();
        assert_eq!(session.job_id(), "job1");
        assert!(session.results().is_empty());

        let mut events = Vec::new();
        let outcome = session.run(|event| events.push(event)).await;
        assert_eq!(outcome, PollOutcome::Finished(JobState::Done));
        assert_eq!(session.results().len(), 1);

        // First cycle: running at 25%, second cycle: done at 100%
        let percents: Vec<u8> = events
            .iter()
            .filter_map(|event| match event {
                PollEvent::Progress { progress, .. } => Some(progress.percent),
                _ => None,
            })
            .collect();
        assert_eq!(percents, vec![25, 100]);
        assert!(matches!(
            events.last(),
            Some(PollEvent::Finished { state: JobState::Done, progress }) if progress.percent == 100
        ));
    }

    #[tokio::test]
    async fn transient_status_failure_does_not_stop_the_loop() {
        let server = MockServer::start().await;
        mount_start(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(done_status()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut session = MonitorSession::start(client, options(ViewMode::All))
            .await
            .unwrap();
        let mut events = Vec::new();
        let outcome = session.run(|event| events.push(event)).await;
        assert_eq!(outcome, PollOutcome::Finished(JobState::Done));
        // The failed cycle produced no events at all
        let progress_count = events
            .iter()
            .filter(|event| matches!(event, PollEvent::Progress { .. }))
            .count();
        assert_eq!(progress_count, 1);
    }

    #[tokio::test]
    async fn failed_results_fetch_keeps_previous_results() {
        let server = MockServer::start().await;
        mount_start(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(done_status()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/results"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut session = MonitorSession::start(client, options(ViewMode::All))
            .await
            .unwrap();
        let mut events = Vec::new();
        let outcome = session.run(|event| events.push(event)).await;
        // The job still finishes; there was just never a Table event
        assert_eq!(outcome, PollOutcome::Finished(JobState::Done));
        assert!(session.results().is_empty());
        assert!(!events
            .iter()
            .any(|event| matches!(event, PollEvent::Table(_))));
    }

    #[tokio::test]
    async fn stop_handle_halts_polling_and_notifies_server() {
        let server = MockServer::start().await;
        mount_start(&server).await;
        // The job never finishes on its own
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(running_status()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/stop"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut session = MonitorSession::start(client, options(ViewMode::All))
            .await
            .unwrap();
        let handle = session.stop_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            handle.stop().await;
        });

        let mut events = Vec::new();
        let outcome = session.run(|event| events.push(event)).await;
        assert_eq!(outcome, PollOutcome::Stopped);
        assert!(matches!(events.last(), Some(PollEvent::Stopped)));
    }

    #[tokio::test]
    async fn stop_flag_holds_even_when_server_rejects_stop() {
        let server = MockServer::start().await;
        mount_start(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(running_status()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/stop"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let mut session = MonitorSession::start(client, options(ViewMode::All))
            .await
            .unwrap();
        let handle = session.stop_handle();
        handle.stop().await;

        // Token is set locally, so the loop exits on its first gate check
        let outcome = session.run(|_| {}).await;
        assert_eq!(outcome, PollOutcome::Stopped);
    }

    #[test]
    fn validate_start_url_accepts_http_and_https() {
        assert!(validate_start_url("http://site.example").is_ok());
        assert!(validate_start_url("https://site.example/deep/path").is_ok());
        assert!(validate_start_url("ftp://x").is_err());
        assert!(validate_start_url("site.example").is_err());
        assert!(validate_start_url("").is_err());
    }
}
