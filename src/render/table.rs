// src/render/table.rs
// =============================================================================
// This module turns the result set into something a human can look at:
// summary counts plus table rows.
//
// Two rules worth remembering:
// - The summary always counts the FULL result set, even when a filter is
//   active. "Broken: 7" stays true no matter which slice you're viewing.
// - The rows are the filtered subset, re-derived from scratch every render
//   pass. Nothing is cached per record because the filter can change
//   independently of the data.
//
// Rows are HTML <tr> fragments (the live report file embeds them); the
// plain-text terminal table in main.rs reuses the cell helpers below.
// =============================================================================

use crate::api::ResultRecord;
use crate::monitor::{classify, StatusClass, ViewMode};
use crate::render::escape::escape_html;

// Counts over the full, unfiltered result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// All records
    pub total: usize,
    /// Records on the crawled site
    pub internal: usize,
    /// Records pointing off-site
    pub external: usize,
    /// Records classed 4, 5 or e
    pub broken: usize,
}

impl Summary {
    /// One-line form for the live terminal display.
    pub fn line(&self) -> String {
        format!(
            "Total: {} | Internal: {} | External: {} | Broken: {}",
            self.total, self.internal, self.external, self.broken
        )
    }
}

// One render pass: summary plus the visible rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Counts over all records, ignoring the filter
    pub summary: Summary,
    /// HTML <tr> fragments for the records the filter lets through
    pub rows: Vec<String>,
}

/// Materializes summary and table rows from the current result set.
///
/// Pure with respect to its inputs: rendering the same set with the same
/// mode twice yields identical output.
pub fn render(results: &[ResultRecord], mode: ViewMode) -> RenderOutput {
    let mut summary = Summary::default();
    for record in results {
        summary.total += 1;
        if record.internal {
            summary.internal += 1;
        } else {
            summary.external += 1;
        }
        if classify(record).is_broken() {
            summary.broken += 1;
        }
    }

    let rows = results
        .iter()
        .filter(|record| mode.matches(record))
        .map(render_row)
        .collect();

    RenderOutput { summary, rows }
}

// Builds one <tr> fragment for a record
//
// The row class carries the status bucket so the report stylesheet can
// color it: bad (4/5/e), warn (3), good (2). The data-class attribute
// carries the exact class tag for anything scripting against the report.
fn render_row(record: &ResultRecord) -> String {
    let class = classify(record);
    let row_class = if class.is_broken() {
        "bad"
    } else if class == StatusClass::Redirect {
        "warn"
    } else {
        "good"
    };

    let url_cell = hyperlink(&record.url);
    let page_cell = record.source_page().map(hyperlink).unwrap_or_default();
    let internal_cell = if record.internal { "yes" } else { "no" };

    format!(
        "<tr class=\"{}\" data-class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        row_class,
        class.tag(),
        url_cell,
        page_cell,
        status_text(record),
        elapsed_text(record),
        internal_cell
    )
}

// An escaped <a> element; both the href and the visible text are escaped
fn hyperlink(url: &str) -> String {
    let escaped = escape_html(url);
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        escaped, escaped
    )
}

/// The status cell: "ERR" for errored checks, the numeric code otherwise,
/// blank when there was never a response.
pub fn status_text(record: &ResultRecord) -> String {
    if record.has_error() {
        "ERR".to_string()
    } else if record.status_code > 0 {
        record.status_code.to_string()
    } else {
        String::new()
    }
}

/// The elapsed-time cell, blank when the server didn't time the check.
pub fn elapsed_text(record: &ResultRecord) -> String {
    if record.elapsed_ms > 0 {
        record.elapsed_ms.to_string()
    } else {
        String::new()
    }
}

/// Wraps a render pass into a complete standalone HTML document.
///
/// Written to disk after each successful results fetch when --report is
/// given, so the file is always a consistent snapshot you can refresh in
/// a browser while the crawl runs.
pub fn render_report(output: &RenderOutput) -> String {
    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str("<title>Crawl results</title>\n<style>\n");
    doc.push_str("body { font-family: sans-serif; margin: 1.5em; }\n");
    doc.push_str("table { border-collapse: collapse; width: 100%; }\n");
    doc.push_str("td, th { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }\n");
    doc.push_str("tr.bad { background: #fde8e8; }\n");
    doc.push_str("tr.warn { background: #fdf6e3; }\n");
    doc.push_str("tr.good { background: #f0faf0; }\n");
    doc.push_str("</style>\n</head>\n<body>\n");
    doc.push_str(&format!("<p>{}</p>\n", escape_html(&output.summary.line())));
    doc.push_str("<table>\n<thead>\n<tr><th>URL</th><th>Found on</th>");
    doc.push_str("<th>Status</th><th>Time (ms)</th><th>Internal</th></tr>\n</thead>\n<tbody>\n");
    for row in &output.rows {
        doc.push_str(row);
        doc.push('\n');
    }
    doc.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ok_record(url: &str, internal: bool) -> ResultRecord {
        ResultRecord {
            url: url.to_string(),
            status_code: 200,
            elapsed_ms: 15,
            internal,
            ..ResultRecord::default()
        }
    }

    #[test]
    fn summary_counts_full_set_regardless_of_filter() {
        let results = vec![
            ResultRecord {
                url: "https://site.example/a".to_string(),
                status_code: 404,
                internal: true,
                ..ResultRecord::default()
            },
            ResultRecord {
                url: "https://other.example/b".to_string(),
                error: "timeout".to_string(),
                internal: false,
                ..ResultRecord::default()
            },
        ];

        // Filter hides the second record, but the summary still sees it
        let output = render(&results, ViewMode::Internal);
        assert_eq!(output.rows.len(), 1);
        assert_eq!(output.summary.total, 2);
        assert_eq!(output.summary.internal, 1);
        assert_eq!(output.summary.external, 1);
        assert_eq!(output.summary.broken, 2);
    }

    #[test]
    fn rendering_twice_is_identical() {
        let results = vec![ok_record("https://site.example/a", true)];
        let first = render(&results, ViewMode::All);
        let second = render(&results, ViewMode::All);
        assert_eq!(first, second);
    }

    #[test]
    fn row_cells_in_order() {
        let results = vec![ResultRecord {
            url: "https://site.example/a".to_string(),
            page_url: "https://site.example/".to_string(),
            status_code: 200,
            elapsed_ms: 42,
            internal: true,
            ..ResultRecord::default()
        }];
        let output = render(&results, ViewMode::All);
        let row = &output.rows[0];
        assert!(row.starts_with("<tr class=\"good\" data-class=\"2\">"));
        assert!(row.contains("<td>200</td>"));
        assert!(row.contains("<td>42</td>"));
        assert!(row.ends_with("<td>yes</td></tr>"));
    }

    #[test]
    fn seed_row_has_blank_page_cell() {
        let results = vec![ok_record("https://site.example/", true)];
        let output = render(&results, ViewMode::All);
        assert!(output.rows[0].contains("</a></td><td></td><td>200</td>"));
    }

    #[test]
    fn errored_row_shows_err_and_is_bad() {
        let results = vec![ResultRecord {
            url: "https://other.example/x".to_string(),
            status_code: 200,
            error: "connection reset".to_string(),
            internal: false,
            ..ResultRecord::default()
        }];
        let output = render(&results, ViewMode::All);
        assert!(output.rows[0].starts_with("<tr class=\"bad\" data-class=\"e\">"));
        assert!(output.rows[0].contains("<td>ERR</td>"));
    }

    #[test]
    fn redirect_row_is_warn() {
        let results = vec![ResultRecord {
            url: "https://site.example/old".to_string(),
            status_code: 302,
            internal: true,
            ..ResultRecord::default()
        }];
        let output = render(&results, ViewMode::All);
        assert!(output.rows[0].starts_with("<tr class=\"warn\" data-class=\"3\">"));
    }

    #[test]
    fn malicious_url_is_escaped_in_markup() {
        let results = vec![ResultRecord {
            url: "https://x/<script>alert(\"xss\")</script>".to_string(),
            status_code: 200,
            internal: false,
            ..ResultRecord::default()
        }];
        let output = render(&results, ViewMode::All);
        let row = &output.rows[0];
        // The only raw angle brackets left are our own tags
        assert!(!row.contains("<script>"));
        assert!(row.contains("&lt;script&gt;"));
        assert!(row.contains("&quot;xss&quot;"));
    }

    #[test]
    fn blank_cells_for_missing_code_and_time() {
        let record = ResultRecord::default();
        assert_eq!(status_text(&record), "");
        assert_eq!(elapsed_text(&record), "");
    }

    #[test]
    fn report_document_contains_summary_and_rows() {
        let results = vec![ok_record("https://site.example/a", true)];
        let output = render(&results, ViewMode::All);
        let doc = render_report(&output);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("Total: 1 | Internal: 1 | External: 0 | Broken: 0"));
        assert!(doc.contains(&output.rows[0]));
    }
}
