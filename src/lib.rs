pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod report;

use clap::Parser;

pub use error::FlowTagError;

/// Entry point for the `flowtag` binary.
pub fn run() -> anyhow::Result<()> {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("PANIC in flowtag: {info}");
        default_hook(info);
    }));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::dispatch(cli::Cli::parse())
}
