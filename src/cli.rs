// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Two subcommands:
// - watch: start a crawl job on the server and monitor it to the end
// - stop:  ask the server to cancel a job started elsewhere
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::monitor::{ViewMode, DEFAULT_POLL_INTERVAL};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "crawl-monitor",
    version = "0.1.0",
    about = "Watch a crawl server job and report broken links live",
    long_about = "crawl-monitor starts a crawl job on a link-checking server, polls it for \
                  status and results, and renders a live, filterable view of every checked \
                  link with derived progress."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (poll failures, request traces)
    ///
    /// global = true makes the flag work on every subcommand
    #[arg(long, global = true)]
    pub verbose: bool,
}

// This enum defines our subcommands (watch, stop)
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a crawl job and watch it until it finishes
    ///
    /// Example: crawl-monitor watch https://example.com --depth 3 --filter e
    Watch {
        /// The URL where the crawl begins (must start with http:// or https://)
        ///
        /// This is a positional argument (required, no flag needed)
        start_url: String,

        /// Base address of the crawl server
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        server: String,

        /// Crawl depth, 0-5 (values outside the range are clamped,
        /// anything non-numeric falls back to 2)
        ///
        /// The custom value_parser makes bad input forgiving instead of
        /// fatal - same behavior the server's own UI has
        #[arg(long, default_value = "2", value_parser = parse_depth)]
        depth: u32,

        /// Ask the server to honor robots.txt
        #[arg(long)]
        respect_robots: bool,

        /// Which rows to show: all, internal, external, or a status
        /// class (2, 3, 4, 5, e)
        #[arg(long, default_value = "all", value_parser = parse_view_mode)]
        filter: ViewMode,

        /// Delay between poll cycles, in milliseconds
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
        interval_ms: u64,

        /// Write a live HTML report to this file after every refresh
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the final result set as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Ask the server to stop a running job
    ///
    /// Example: crawl-monitor stop --job abc123
    Stop {
        /// The job id printed when the job was started
        #[arg(long)]
        job: String,

        /// Base address of the crawl server
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        server: String,
    },
}

// Lenient depth parsing: non-numeric input falls back to 2, everything
// is clamped into 0..=5. Never fails, so the Err type is only there to
// satisfy clap's value_parser signature.
fn parse_depth(raw: &str) -> Result<u32, String> {
    let depth = raw.trim().parse::<i64>().unwrap_or(2);
    Ok(depth.clamp(0, 5) as u32)
}

// Bridges ViewMode's FromStr into a clap value_parser
fn parse_view_mode(raw: &str) -> Result<ViewMode, String> {
    ViewMode::from_str(raw)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a custom value_parser for depth?
//    - clap's default u32 parsing rejects "abc" with a hard error
//    - The crawl server's own UI treats bad depth input as "use the
//      default", and the CLI mirrors that contract
//
// 2. What does default_value_t do?
//    - Takes a Rust expression instead of a string
//    - Here it keeps the CLI default tied to the same constant the poll
//      loop documents, so they can't drift apart
//
// 3. Why is --server repeated on both subcommands?
//    - Each subcommand is a complete, self-describing invocation
//    - `crawl-monitor stop --help` shows everything stop needs
// -----------------------------------------------------------------------------
