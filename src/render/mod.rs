// src/render/mod.rs
// =============================================================================
// This module turns results into user-visible output.
//
// Submodules:
// - escape: HTML entity escaping for attacker-controlled text
// - table: summary counts, table rows, and the standalone report document
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod escape;
mod table;

// Re-export public items from submodules
pub use escape::escape_html;
pub use table::{elapsed_text, render, render_report, status_text, RenderOutput, Summary};
