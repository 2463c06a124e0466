// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the appropriate subcommand handler
// 3. watch: start a job, run the poll loop, print live progress, and
//    finish with a table (or JSON) of every checked link
// 4. Exit with proper code (0 = clean, 1 = broken links, 2 = error)
//
// Rust concepts used:
// - async/await: The poll loop is asynchronous network I/O
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands and events
// =============================================================================

// Module declarations - tells Rust about our other source files
mod api; // src/api/ - the crawl server's HTTP API
mod cli; // src/cli.rs - command-line parsing
mod monitor; // src/monitor/ - classification, progress, poll loop
mod render; // src/render/ - escaping, table rows, report document

// Import items we need from our modules
use api::{ApiClient, JobState, JobStatus, ResultRecord};
use cli::{Cli, Commands};
use monitor::{
    MonitorSession, PollEvent, PollOutcome, Progress, ViewMode, WatchOptions,
};
use render::{elapsed_text, render, render_report, status_text, Summary};

use clap::Parser; // Parser trait enables the parse() method
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Validation errors and start failures land here; everything
            // inside a running poll loop is absorbed before this point
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = job watched, no broken links
//   Ok(1) = job watched, broken links found
//   Ok(2) = job failed server-side
//   Err  = validation/start/transport error before or outside polling
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Watch {
            start_url,
            server,
            depth,
            respect_robots,
            filter,
            interval_ms,
            report,
            json,
        } => {
            let client = ApiClient::new(&server)?;
            let options = WatchOptions {
                start_url,
                depth,
                respect_robots,
                mode: filter,
                interval: Duration::from_millis(interval_ms),
            };
            handle_watch(client, options, report, json).await
        }
        Commands::Stop { job, server } => handle_stop(&server, &job).await,
    }
}

// Wires the log facade to a terminal backend on stderr, so debug output
// never interleaves with the \r-refreshed progress line on stdout
fn init_logging(verbose: bool) {
    use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    // Ignore the error if a logger was already set (happens in tests)
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

// Handles the 'watch' subcommand: start the job, poll it to the end,
// print the final report
async fn handle_watch(
    client: ApiClient,
    options: WatchOptions,
    report: Option<PathBuf>,
    json: bool,
) -> Result<i32> {
    println!(
        "🔍 Starting crawl of {} (depth {})",
        options.start_url,
        options.depth.min(5)
    );

    let filter = options.mode;
    let mut session = MonitorSession::start(client, options).await?;
    println!("🆔 Job id: {}", session.job_id());

    // Ctrl-C sets the stop flag and sends a best-effort stop request.
    // The cycle already in flight finishes and renders once more; it is
    // the next cycle that never gets scheduled.
    let stop = session.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!();
            eprintln!("🛑 Stop requested - letting the current cycle finish...");
            stop.stop().await;
        }
    });

    // The latest summary rides along on the next progress line, so the
    // live display shows counts without scrolling the terminal
    let mut last_summary: Option<Summary> = None;
    let outcome = session
        .run(|event| match event {
            PollEvent::Progress { status, progress } => {
                print_progress_line(&status, progress, last_summary.as_ref());
            }
            PollEvent::Table(output) => {
                // Keep the live report file current with every refresh
                if let Some(path) = &report {
                    if let Err(err) = std::fs::write(path, render_report(&output)) {
                        log::warn!("could not write report to {}: {}", path.display(), err);
                    }
                }
                last_summary = Some(output.summary);
            }
            PollEvent::Finished { state, progress } => {
                println!();
                println!("🏁 Job finished: {} ({}%)", state, progress.percent);
            }
            PollEvent::Stopped => {
                println!();
                println!("🛑 Monitoring stopped");
            }
        })
        .await;

    // Final output over whatever result set we last saw
    let output = render(session.results(), filter);
    if json {
        // Full, unfiltered result set - machine consumers can filter
        println!("{}", serde_json::to_string_pretty(session.results())?);
    } else {
        print_table(session.results(), filter, &output.summary);
    }

    // Exit code: a server-side failure trumps everything, then broken links
    let code = match outcome {
        PollOutcome::Finished(JobState::Failed) => 2,
        _ if output.summary.broken > 0 => 1,
        _ => 0,
    };
    Ok(code)
}

// Handles the 'stop' subcommand for a job started in another invocation
async fn handle_stop(server: &str, job: &str) -> Result<i32> {
    let client = ApiClient::new(server)?;
    // Unlike the in-session stop, the user explicitly asked for this one,
    // so a failure is worth reporting instead of swallowing
    client.stop_job(job).await?;
    println!("🛑 Stop requested for job {}", job);
    Ok(0)
}

// One live status line, refreshed in place with \r
fn print_progress_line(status: &JobStatus, progress: Progress, summary: Option<&Summary>) {
    let marker = if progress.is_done { "✅" } else { "⏳" };
    let counts = summary.map(|s| format!(" | {}", s.line())).unwrap_or_default();
    print!(
        "\r{} {:>3}% | Visited: {} | Queued: {} | Discovered: {} | Errors: {}{}   ",
        marker,
        progress.percent,
        status.visited,
        status.queued,
        status.discovered,
        status.errors,
        counts
    );
    // print! doesn't flush on its own; without this the line lags a cycle
    let _ = std::io::stdout().flush();
}

// Prints the final results as a human-readable table in the terminal
//
// Rows honor the active filter; the summary always covers the full set
fn print_table(results: &[ResultRecord], mode: ViewMode, summary: &Summary) {
    println!();
    println!(
        "{:<60} {:<40} {:>6} {:>8} {:>8}",
        "URL", "FOUND ON", "STATUS", "MS", "INTERNAL"
    );
    println!("{}", "=".repeat(126));

    for record in results.iter().filter(|r| mode.matches(r)) {
        println!(
            "{:<60} {:<40} {:>6} {:>8} {:>8}",
            truncate(&record.url, 57),
            truncate(record.source_page().unwrap_or(""), 37),
            status_text(record),
            elapsed_text(record),
            if record.internal { "yes" } else { "no" }
        );
    }

    // Print summary (always over the unfiltered set)
    println!();
    println!("📊 Summary:");
    println!("   📋 Total: {}", summary.total);
    println!("   🏠 Internal: {}", summary.internal);
    println!("   🌍 External: {}", summary.external);
    println!("   ❌ Broken: {}", summary.broken);
}

// Shortens long URLs for display; counts chars, not bytes, so multi-byte
// URLs can't panic a slice
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let kept: String = text.chars().take(max_chars).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
