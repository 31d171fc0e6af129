//! Core logic: protocol resolution, tag lookup, flow log aggregation.
//!
//! - [`ProtocolTable`] — protocol number → lowercase name
//! - [`TagTable`] / [`LookupKey`] — (port, protocol) → tag
//! - [`FlowLogAggregator`] — per-tag and per-(port, protocol) counting

pub mod aggregate;
mod csv_source;
pub mod lookup;
pub mod protocol;

pub use aggregate::{FlowLogAggregator, FlowSummary, FrequencyTable, PortProtocolCounts, TagCounts};
pub use lookup::{LookupKey, TagTable};
pub use protocol::ProtocolTable;
