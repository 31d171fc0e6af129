//! Centralized constants for flowtag.
//!
//! Flow record layout, sentinel values, and report naming are collected here so
//! they can be found and adjusted in a single place rather than scattered across modules.

/// Number of whitespace-separated fields in a version 2 flow log record.
pub const FLOW_LOG_FIELD_COUNT: usize = 14;

/// Zero-based index of the destination port field.
pub const DST_PORT_FIELD: usize = 6;

/// Zero-based index of the protocol number field.
pub const PROTOCOL_FIELD: usize = 7;

/// Protocol name used when a protocol number is absent from the registry.
pub const UNKNOWN_PROTOCOL: &str = "unknown";

/// Tag used when a (port, protocol) pair is absent from the lookup table.
pub const UNTAGGED: &str = "Untagged";

/// Lookup table column names, matched case-insensitively.
pub const DSTPORT_COLUMN: &str = "dstport";
pub const PROTOCOL_COLUMN: &str = "protocol";
pub const TAG_COLUMN: &str = "tag";

/// Base file names of the two reports. The extension follows the output format.
pub const TAG_COUNT_FILE_STEM: &str = "tag_count";
pub const PORT_PROTOCOL_COUNT_FILE_STEM: &str = "port_protocol_count";

pub const TAG_COUNT_TITLE: &str = "Tag Counts: ";
pub const TAG_COUNT_HEADERS: &[&str] = &["Tag", "Count"];

pub const PORT_PROTOCOL_COUNT_TITLE: &str = "Port/Protocol Combination Counts: ";
pub const PORT_PROTOCOL_COUNT_HEADERS: &[&str] = &["Port", "Protocol", "Count"];

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "flowtag=info,flowtag_lib=info";
