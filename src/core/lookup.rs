//! Tag lookup: (destination port, protocol name) → tag.
//!
//! The lookup CSV names its columns in a header row; `dstport`, `protocol` and
//! `tag` are located case-insensitively and may appear in any order alongside
//! unrelated columns. A header missing any of the three leaves the table empty,
//! so every flow resolves to the `Untagged` tag.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::config;
use crate::core::csv_source;
use crate::error::{FlowTagError, Result};

/// Join key between lookup rows and flow log entries.
///
/// Both parts are trimmed and the protocol is lowercased on construction, so the
/// lookup side and the flow log side always agree on the canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LookupKey {
    pub port: String,
    pub protocol: String,
}

impl LookupKey {
    pub fn new(port: &str, protocol: &str) -> Self {
        Self {
            port: port.trim().to_string(),
            protocol: protocol.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.port, self.protocol)
    }
}

/// Column positions discovered in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    dstport: usize,
    protocol: usize,
    tag: usize,
}

impl Columns {
    /// Locate the three required columns. Later duplicates of a name win.
    fn locate(header: &csv::StringRecord) -> Option<Self> {
        let (mut dstport, mut protocol, mut tag) = (None, None, None);
        for (i, name) in header.iter().enumerate() {
            if name.eq_ignore_ascii_case(config::DSTPORT_COLUMN) {
                dstport = Some(i);
            } else if name.eq_ignore_ascii_case(config::PROTOCOL_COLUMN) {
                protocol = Some(i);
            } else if name.eq_ignore_ascii_case(config::TAG_COLUMN) {
                tag = Some(i);
            }
        }
        Some(Self {
            dstport: dstport?,
            protocol: protocol?,
            tag: tag?,
        })
    }

    fn max_index(&self) -> usize {
        self.dstport.max(self.protocol).max(self.tag)
    }
}

/// Mapping from [`LookupKey`] to tag. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    tags: HashMap<LookupKey, String>,
}

impl TagTable {
    /// Load the lookup table from a CSV file on disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FlowTagError::file(path, e))?;
        let table = Self::from_reader(file)?;
        tracing::info!(
            "Loaded {} tag mappings from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let (header, mut rdr) = csv_source::split_header(reader)?;
        let Some(cols) = Columns::locate(&header) else {
            tracing::warn!(
                "Lookup header {:?} lacks one of {}/{}/{}; every flow will be {}",
                header.iter().collect::<Vec<_>>(),
                config::DSTPORT_COLUMN,
                config::PROTOCOL_COLUMN,
                config::TAG_COLUMN,
                config::UNTAGGED,
            );
            return Ok(Self::default());
        };

        let mut tags = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            // Trailing empty fields do not count toward the row width.
            if csv_source::populated_len(&record) <= cols.max_index() {
                tracing::debug!("Skipping short lookup row: {:?}", record);
                continue;
            }
            tags.insert(
                LookupKey::new(&record[cols.dstport], &record[cols.protocol]),
                record[cols.tag].to_string(),
            );
        }

        Ok(Self { tags })
    }

    /// Resolve a key, falling back to `"Untagged"`.
    pub fn resolve(&self, key: &LookupKey) -> &str {
        self.tags
            .get(key)
            .map(String::as_str)
            .unwrap_or(config::UNTAGGED)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
