//! Utility functions shared by the workloads and the worker binary.
//!

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Serialize auxiliary application arguments for a reduce function.
///
/// The arguments travel as a JSON array of strings, which the application
/// parses back with [`parse_aux_args`].
pub fn serialize_args(args: &[String]) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(args)?))
}

/// Parse serialized auxiliary arguments into an application's own
/// `clap` argument struct.
///
/// Empty `aux` is treated as no arguments at all. The struct should be
/// marked `#[clap(no_binary_name = true)]`.
pub fn parse_aux_args<T: Parser>(aux: &Bytes) -> Result<T> {
    let args: Vec<String> = if aux.is_empty() {
        Vec::new()
    } else {
        serde_json::from_slice(aux).context("auxiliary arguments are not a JSON string array")?
    };
    Ok(T::try_parse_from(args)?)
}

/// Installs a console `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_logging(default_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("invalid log level `{}`", default_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
