//! Protocol registry: IANA protocol number → lowercase protocol name.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config;
use crate::core::csv_source;
use crate::error::{FlowTagError, Result};

/// Immutable mapping from protocol number (as text) to lowercase protocol name.
#[derive(Debug, Clone, Default)]
pub struct ProtocolTable {
    names: HashMap<String, String>,
}

impl ProtocolTable {
    /// Load the registry from a CSV file on disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FlowTagError::file(path, e))?;
        let table = Self::from_reader(file)?;
        tracing::info!(
            "Loaded {} protocol numbers from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse `number,name[,...]` records. The first line is a header and is skipped;
    /// records with fewer than two fields are ignored. Later duplicates win.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let (_, mut rdr) = csv_source::split_header(reader)?;

        let mut names = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            let (Some(number), Some(name)) = (record.get(0), record.get(1)) else {
                continue;
            };
            names.insert(number.to_string(), name.to_lowercase());
        }

        Ok(Self { names })
    }

    /// Resolve a protocol number, falling back to `"unknown"`.
    pub fn lookup(&self, number: &str) -> &str {
        self.names
            .get(number)
            .map(String::as_str)
            .unwrap_or(config::UNKNOWN_PROTOCOL)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> ProtocolTable {
        ProtocolTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_header_is_skipped() {
        let t = table("number,name\n6,tcp\n17,udp\n");
        assert_eq!(t.len(), 2);
        assert_eq!(t.lookup("number"), "unknown");
    }

    #[test]
    fn test_names_are_trimmed_and_lowercased() {
        let t = table("Decimal,Keyword\n 6 , TCP \n");
        assert_eq!(t.lookup("6"), "tcp");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let t = table(
            "Decimal,Keyword,Protocol,IPv6 Extension Header,Reference\n\
             1,ICMP,Internet Control Message,,[RFC792]\n",
        );
        assert_eq!(t.lookup("1"), "icmp");
    }

    #[test]
    fn test_short_lines_skipped() {
        let t = table("number,name\n42\n\n6,tcp\n");
        assert_eq!(t.len(), 1);
        assert_eq!(t.lookup("42"), "unknown");
    }

    #[test]
    fn test_unknown_number_resolves_to_sentinel() {
        let t = table("number,name\n6,tcp\n");
        assert_eq!(t.lookup("250"), config::UNKNOWN_PROTOCOL);
    }

    #[test]
    fn test_duplicate_number_last_wins() {
        let t = table("number,name\n6,tcp\n6,TCP-ALT\n");
        assert_eq!(t.lookup("6"), "tcp-alt");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_blank_first_line_is_the_skipped_header() {
        let t = table("\n6,tcp\n17,udp\n");
        assert_eq!(t.lookup("6"), "tcp");
        assert_eq!(t.lookup("17"), "udp");
    }

    #[test]
    fn test_quote_in_name_does_not_swallow_rows() {
        let t = table("number,name\n6,\"tcp\n17,udp\n");
        assert_eq!(t.lookup("6"), "\"tcp");
        assert_eq!(t.lookup("17"), "udp");
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        assert!(table("").is_empty());
        assert!(table("number,name\n").is_empty());
    }

    #[test]
    fn test_open_missing_file_is_file_error() {
        let err = ProtocolTable::open(Path::new("/nonexistent/iana.csv")).unwrap_err();
        assert_eq!(err.kind(), "File");
    }
}
