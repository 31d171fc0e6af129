//! Command-line surface and the pipeline driver.
//!
//! `execute` takes plain parameters (no process state) so the whole pipeline can
//! be exercised from tests without spawning the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use crate::config;
use crate::core::{FlowLogAggregator, FlowSummary, ProtocolTable, TagTable};
use crate::report::{report_path, Report, ReportFormat};

#[derive(Debug, Parser)]
#[command(name = "flowtag")]
#[command(about = "Count flow log entries per tag and per port/protocol", long_about = None)]
pub struct Cli {
    /// Flow log file (version 2 records, one per line)
    #[arg(value_name = "FLOW_LOG")]
    pub flow_log: Option<PathBuf>,
    /// Lookup table CSV with dstport, protocol and tag columns
    #[arg(value_name = "LOOKUP_CSV")]
    pub lookup_table: Option<PathBuf>,
    /// IANA protocol numbers CSV
    #[arg(value_name = "PROTOCOL_CSV")]
    pub protocols: Option<PathBuf>,
    /// Directory the two reports are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Fully specified inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub flow_log: PathBuf,
    pub lookup_table: PathBuf,
    pub protocols: PathBuf,
    pub output_dir: PathBuf,
    pub format: ReportFormat,
}

impl Cli {
    /// `None` when any of the three input paths is missing.
    pub fn into_options(self) -> Option<RunOptions> {
        Some(RunOptions {
            flow_log: self.flow_log?,
            lookup_table: self.lookup_table?,
            protocols: self.protocols?,
            output_dir: self.output_dir,
            format: self.format,
        })
    }
}

/// Parse arguments and run. Missing inputs print usage to stdout and succeed.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.into_options() {
        Some(opts) => {
            execute(&opts)?;
        }
        None => {
            println!(
                "Please provide the flow log file, the lookup table CSV and the protocol CSV as arguments."
            );
            Cli::command().print_help()?;
            println!();
        }
    }
    Ok(())
}

/// Build both tables, aggregate the flow log and write the two reports.
pub fn execute(opts: &RunOptions) -> Result<FlowSummary> {
    let protocols = ProtocolTable::open(&opts.protocols)
        .with_context(|| format!("loading protocol table {}", opts.protocols.display()))?;
    let tags = TagTable::open(&opts.lookup_table)
        .with_context(|| format!("loading lookup table {}", opts.lookup_table.display()))?;

    let summary = FlowLogAggregator::new(&protocols, &tags)
        .run_file(&opts.flow_log)
        .with_context(|| format!("aggregating flow log {}", opts.flow_log.display()))?;

    write_reports(&summary, &opts.output_dir, opts.format)?;
    Ok(summary)
}

fn write_reports(summary: &FlowSummary, dir: &Path, format: ReportFormat) -> Result<()> {
    let reports = [
        (
            config::TAG_COUNT_FILE_STEM,
            Report::tag_counts(&summary.tag_counts),
        ),
        (
            config::PORT_PROTOCOL_COUNT_FILE_STEM,
            Report::port_protocol_counts(&summary.port_protocol_counts),
        ),
    ];
    for (stem, report) in reports {
        let path = report_path(dir, stem, format);
        report
            .write_to(&path, format)
            .with_context(|| format!("writing report {}", path.display()))?;
    }
    Ok(())
}
