//! HTML report generation.
//!
//! This module renders an [`AttendanceReport`] as an HTML page holding the
//! attendance matrix: one column per meeting (newest first), one row per
//! participant.

use crate::cli::OutputFormat;
use crate::models::{AttendanceIndex, AttendanceReport, ReportMetadata};
use crate::repo::RepoId;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Styles used when no stylesheet is configured.
pub const DEFAULT_STYLESHEET: &str = include_str!("styles.css");

/// Everything a page needs besides the report itself.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    /// Page title.
    pub title: &'a str,
    /// CSS inlined into the page.
    pub stylesheet: &'a str,
    /// Prefix of participant profile links.
    pub profile_url: &'a str,
    /// Every repository in this run, for the navigation bar.
    pub repositories: &'a [RepoId],
    /// Repository this page reports on.
    pub current: &'a RepoId,
}

/// Generate a complete HTML page.
pub fn generate_html_report(report: &AttendanceReport, context: &PageContext<'_>) -> String {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");
    output.push_str("    <meta charset=\"utf-8\">\n");
    output.push_str(&format!(
        "    <title>{}</title>\n",
        escape_html(context.title)
    ));
    output.push_str("    <style>\n");
    output.push_str(context.stylesheet);
    output.push_str("\n    </style>\n  </head>\n  <body>\n");

    output.push_str(&generate_nav(context.repositories, context.current));
    output.push_str(&generate_summary(&report.index, context.current));
    output.push_str(&generate_attendance_table(
        &report.index,
        context.profile_url,
    ));
    output.push_str(&generate_footer(&report.metadata));

    output.push_str("  </body>\n</html>\n");

    output
}

/// Generate the navigation bar linking every repository page.
fn generate_nav(repositories: &[RepoId], current: &RepoId) -> String {
    let mut nav = String::new();

    nav.push_str("    <nav>\n      <ul>\n");
    for repo in repositories {
        let class = if repo == current { " class=\"active\"" } else { "" };
        let slug = escape_html(&repo.slug());
        nav.push_str(&format!(
            "        <li{}><a href=\"../{}.html\">{}</a></li>\n",
            class, slug, slug
        ));
    }
    nav.push_str("      </ul>\n    </nav>\n");

    nav
}

/// Generate the heading line above the table.
fn generate_summary(index: &AttendanceIndex, current: &RepoId) -> String {
    format!(
        "    <h1>{}</h1>\n    <p class=\"summary\">{} participants across {} meetings</p>\n",
        escape_html(&current.slug()),
        index.member_count(),
        index.meeting_count()
    )
}

/// Generate the attendance matrix.
pub fn generate_attendance_table(index: &AttendanceIndex, profile_url: &str) -> String {
    let dates = index.dates_newest_first();
    let mut table = String::from("<table><tbody>");

    table.push_str("\n  <tr>");
    table.push_str("\n    <th class=\"sr-only\">Username</th>");
    for date in &dates {
        table.push_str(&format!(
            "\n    <th>{}</th>",
            escape_html(&format_date_heading(date))
        ));
    }
    table.push_str("\n  </tr>");

    for member in index.sorted_members() {
        let member_html = escape_html(member);
        table.push_str("\n  <tr>");
        table.push_str(&format!(
            "\n    <td><a href=\"{}{}\" target=\"_blank\">@{}</a></td>",
            escape_html(profile_url),
            member_html,
            member_html
        ));
        for date in &dates {
            let (class, label) = if index.attended(member, date) {
                ("present", "Present")
            } else {
                ("absent", "Absent")
            };
            table.push_str(&format!("\n    <td class=\"{}\">{}</td>", class, label));
        }
        table.push_str("\n  </tr>");
    }
    table.push_str("</tbody></table>\n");

    table
}

/// Generate the page footer.
fn generate_footer(metadata: &ReportMetadata) -> String {
    let mut footer = String::new();

    footer.push_str("    <footer>\n");
    footer.push_str(&format!(
        "      Generated {} from {} meeting files",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        metadata.documents_read
    ));
    if metadata.documents_skipped > 0 {
        footer.push_str(&format!(
            " ({} without attendance)",
            metadata.documents_skipped
        ));
    }
    footer.push_str("\n    </footer>\n");

    footer
}

/// Column heading for a meeting date, e.g. `Wed Jan 01 2020`.
///
/// Stems that are not `YYYY-MM-DD` dates are shown as they are.
pub fn format_date_heading(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%a %b %d %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AttendanceReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Read the configured stylesheet, or fall back to the built-in one.
pub fn load_stylesheet(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stylesheet: {}", path)),
        None => Ok(DEFAULT_STYLESHEET.to_string()),
    }
}

/// Location of a repository's page: `<output_dir>/<owner>/<name>.<ext>`.
pub fn page_path(output_dir: &Path, repo: &RepoId, format: OutputFormat) -> PathBuf {
    output_dir
        .join(&repo.owner)
        .join(format!("{}.{}", repo.name, format.extension()))
}

/// Write a generated page, creating parent directories as needed.
pub fn write_page(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceRecord;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(date: &str, participants: &[&str]) -> AttendanceRecord {
        AttendanceRecord {
            date: date.to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn create_test_report() -> AttendanceReport {
        let index = AttendanceIndex::default()
            .absorb(record("2020-01-01", &["alice", "bob"]))
            .absorb(record("2020-02-01", &["bob"]));

        AttendanceReport {
            metadata: ReportMetadata {
                repository: "nodejs/TSC".to_string(),
                generated_at: Utc::now(),
                documents_read: 3,
                documents_skipped: 1,
            },
            index,
        }
    }

    #[test]
    fn test_table_orders_dates_and_members() {
        let report = create_test_report();
        let table = generate_attendance_table(&report.index, "https://www.github.com/");

        let feb = table.find("Sat Feb 01 2020").unwrap();
        let jan = table.find("Wed Jan 01 2020").unwrap();
        assert!(feb < jan);

        let alice = table.find("@alice").unwrap();
        let bob = table.find("@bob").unwrap();
        assert!(alice < bob);

        assert!(table.contains(
            "<a href=\"https://www.github.com/alice\" target=\"_blank\">@alice</a>"
        ));
    }

    #[test]
    fn test_table_marks_presence() {
        let report = create_test_report();
        let table = generate_attendance_table(&report.index, "https://www.github.com/");

        let alice_row = table
            .split("<tr>")
            .find(|row| row.contains("@alice"))
            .unwrap();
        let cells: Vec<&str> = alice_row
            .lines()
            .filter(|l| l.contains("<td class="))
            .collect();

        assert_eq!(cells.len(), 2);
        assert!(cells[0].contains("class=\"absent\">Absent"));
        assert!(cells[1].contains("class=\"present\">Present"));
    }

    #[test]
    fn test_html_page_contains_nav_and_title() {
        let report = create_test_report();
        let repos: Vec<RepoId> = vec![
            RepoId::parse("nodejs/CTC").unwrap(),
            RepoId::parse("nodejs/TSC").unwrap(),
        ];
        let context = PageContext {
            title: "Node.js Meeting Participation",
            stylesheet: DEFAULT_STYLESHEET,
            profile_url: "https://www.github.com/",
            repositories: &repos,
            current: &repos[1],
        };

        let html = generate_html_report(&report, &context);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Node.js Meeting Participation</title>"));
        assert!(html.contains("<li><a href=\"../nodejs/CTC.html\">nodejs/CTC</a></li>"));
        assert!(html.contains(
            "<li class=\"active\"><a href=\"../nodejs/TSC.html\">nodejs/TSC</a></li>"
        ));
        assert!(html.contains("2 participants across 2 meetings"));
        assert!(html.contains("(1 without attendance)"));
    }

    #[test]
    fn test_format_date_heading() {
        assert_eq!(format_date_heading("2020-01-01"), "Wed Jan 01 2020");
        assert_eq!(format_date_heading("kickoff-notes"), "kickoff-notes");
        assert_eq!(format_date_heading("2020-13-01"), "2020-13-01");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"repository\": \"nodejs/TSC\""));
        assert!(json.contains("\"members\""));
        assert!(json.contains("\"dates\""));
    }

    #[test]
    fn test_page_path_and_write() {
        let temp = TempDir::new().unwrap();
        let repo = RepoId::parse("nodejs/TSC").unwrap();

        let path = page_path(temp.path(), &repo, OutputFormat::Html);
        assert_eq!(path, temp.path().join("nodejs").join("TSC.html"));

        write_page(&path, "<p>hi</p>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_load_stylesheet() {
        assert_eq!(load_stylesheet(None).unwrap(), DEFAULT_STYLESHEET);
        assert!(load_stylesheet(Some("/no/such/styles.css")).is_err());
    }
}
