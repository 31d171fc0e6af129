//! Flow log aggregation.
//!
//! Streams a flow log line by line, resolves each record's protocol name and tag,
//! and counts records per tag and per (port, protocol). Records with the wrong
//! number of fields are skipped and logged; they never abort the run.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config;
use crate::core::lookup::{LookupKey, TagTable};
use crate::core::protocol::ProtocolTable;
use crate::error::{FlowTagError, Result};

/// Occurrence counts keyed by `K`.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    counts: HashMap<K, u64>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Ord + Display> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key`.
    pub fn increment(&mut self, key: K) {
        self.counts
            .entry(key)
            .and_modify(|c| *c += 1)
            .or_insert(1);
    }

    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries ordered by count descending, then key ascending.
    pub fn sorted(&self) -> Vec<(&K, u64)> {
        let mut entries: Vec<(&K, u64)> = self.counts.iter().map(|(k, c)| (k, *c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

pub type TagCounts = FrequencyTable<String>;
pub type PortProtocolCounts = FrequencyTable<LookupKey>;

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct FlowSummary {
    pub tag_counts: TagCounts,
    pub port_protocol_counts: PortProtocolCounts,
    /// Records with exactly the expected field count.
    pub valid_lines: u64,
    /// Records skipped for having the wrong field count.
    pub skipped_lines: u64,
}

/// What a single flow log line resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFlow<'a> {
    pub key: LookupKey,
    pub tag: &'a str,
}

/// Resolves flow log records against a protocol table and a tag table.
pub struct FlowLogAggregator<'a> {
    protocols: &'a ProtocolTable,
    tags: &'a TagTable,
}

impl<'a> FlowLogAggregator<'a> {
    pub fn new(protocols: &'a ProtocolTable, tags: &'a TagTable) -> Self {
        Self { protocols, tags }
    }

    /// Resolve one line, or `None` if it does not have the expected field count.
    pub fn resolve_line(&self, line: &str) -> Option<ResolvedFlow<'a>> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != config::FLOW_LOG_FIELD_COUNT {
            return None;
        }

        let port = fields[config::DST_PORT_FIELD];
        let protocol = self.protocols.lookup(fields[config::PROTOCOL_FIELD]);
        let key = LookupKey::new(port, protocol);
        let tag = self.tags.resolve(&key);
        Some(ResolvedFlow { key, tag })
    }

    /// Aggregate every line of `reader`. Only read failures are errors; bytes that
    /// are not valid UTF-8 are replaced and the line is judged on its fields.
    pub fn run<R: BufRead>(&self, mut reader: R) -> Result<FlowSummary> {
        let mut summary = FlowSummary::default();
        let mut buf = Vec::new();
        let mut idx = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            idx += 1;
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            match self.resolve_line(&line) {
                Some(flow) => {
                    tracing::debug!("{} -> key: {}, tag: {}", line.trim(), flow.key, flow.tag);
                    summary.tag_counts.increment(flow.tag.to_string());
                    summary.port_protocol_counts.increment(flow.key);
                    summary.valid_lines += 1;
                }
                None => {
                    tracing::warn!("Invalid flow log entry at line {}: {:?}", idx, line);
                    summary.skipped_lines += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Open and aggregate a flow log file.
    pub fn run_file(&self, path: &Path) -> Result<FlowSummary> {
        let file = File::open(path).map_err(|e| FlowTagError::file(path, e))?;
        let summary = self
            .run(BufReader::new(file))
            .map_err(|e| match e {
                FlowTagError::Io(source) => FlowTagError::file(path, source),
                other => other,
            })?;
        tracing::info!(
            "Aggregated {} flow log entries from {} ({} skipped, {} tags, {} port/protocol pairs)",
            summary.valid_lines,
            path.display(),
            summary.skipped_lines,
            summary.tag_counts.len(),
            summary.port_protocol_counts.len(),
        );
        Ok(summary)
    }
}
