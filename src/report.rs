//! Report rendering for the two frequency tables.
//!
//! Text reports keep the fixed layout: a title line, a comma-space joined header
//! line, then one `key,count` line per entry. JSON reports carry the same data.

use std::fmt::Display;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config;
use crate::core::{FrequencyTable, PortProtocolCounts, TagCounts};
use crate::error::{FlowTagError, Result};

/// Output format of the reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub key: String,
    pub count: u64,
}

/// A titled frequency table ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    fn from_table<K>(title: &str, headers: &[&str], table: &FrequencyTable<K>) -> Self
    where
        K: Eq + Hash + Ord + Display,
    {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: table
                .sorted()
                .into_iter()
                .map(|(key, count)| ReportRow {
                    key: key.to_string(),
                    count,
                })
                .collect(),
        }
    }

    pub fn tag_counts(counts: &TagCounts) -> Self {
        Self::from_table(config::TAG_COUNT_TITLE, config::TAG_COUNT_HEADERS, counts)
    }

    pub fn port_protocol_counts(counts: &PortProtocolCounts) -> Self {
        Self::from_table(
            config::PORT_PROTOCOL_COUNT_TITLE,
            config::PORT_PROTOCOL_COUNT_HEADERS,
            counts,
        )
    }

    pub fn render<W: Write>(&self, format: ReportFormat, mut out: W) -> Result<()> {
        match format {
            ReportFormat::Text => {
                writeln!(out, "{}", self.title)?;
                writeln!(out, "{}", self.headers.join(", "))?;
                for row in &self.rows {
                    writeln!(out, "{},{}", row.key, row.count)?;
                }
            }
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut out, self)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Write the report to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let file = File::create(path).map_err(|e| FlowTagError::file(path, e))?;
        self.render(format, BufWriter::new(file)).map_err(|e| match e {
            FlowTagError::Io(source) => FlowTagError::file(path, source),
            other => other,
        })?;
        tracing::info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}

/// File path for a report stem inside `dir`.
pub fn report_path(dir: &Path, stem: &str, format: ReportFormat) -> PathBuf {
    dir.join(format!("{stem}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LookupKey;

    fn render_text(report: &Report) -> String {
        let mut buf = Vec::new();
        report.render(ReportFormat::Text, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_tag_report_layout() {
        let mut counts = TagCounts::new();
        counts.increment("sv_P2".to_string());
        counts.increment("Untagged".to_string());
        counts.increment("Untagged".to_string());

        let text = render_text(&Report::tag_counts(&counts));
        assert_eq!(text, "Tag Counts: \nTag, Count\nUntagged,2\nsv_P2,1\n");
    }

    #[test]
    fn test_port_protocol_report_layout() {
        let mut counts = PortProtocolCounts::new();
        counts.increment(LookupKey::new("443", "tcp"));

        let text = render_text(&Report::port_protocol_counts(&counts));
        assert_eq!(
            text,
            "Port/Protocol Combination Counts: \nPort, Protocol, Count\n443,tcp,1\n"
        );
    }

    #[test]
    fn test_empty_table_writes_title_and_header_only() {
        let text = render_text(&Report::tag_counts(&TagCounts::new()));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_json_report_has_rows() {
        let mut counts = TagCounts::new();
        counts.increment("dns".to_string());
        let mut buf = Vec::new();
        Report::tag_counts(&counts)
            .render(ReportFormat::Json, &mut buf)
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["title"], "Tag Counts: ");
        assert_eq!(json["rows"][0]["key"], "dns");
        assert_eq!(json["rows"][0]["count"], 1);
    }

    #[test]
    fn test_report_path_uses_format_extension() {
        let dir = Path::new("out");
        assert_eq!(
            report_path(dir, config::TAG_COUNT_FILE_STEM, ReportFormat::Text),
            Path::new("out/tag_count.txt")
        );
        assert_eq!(
            report_path(dir, config::PORT_PROTOCOL_COUNT_FILE_STEM, ReportFormat::Json),
            Path::new("out/port_protocol_count.json")
        );
    }
}
