//! Converts reduce application names to actual application code.
//!
//! # Example
//!
//! To get the word count application:
//! ```
//! # use anyhow::Result;
//! use mrlite_reduce::workload;
//! # fn main() -> Result<()> {
//! let wc = workload::named("wc")?;
//! let reduce = (wc.make_reduce)(&Default::default())?;
//! let total = reduce("the", &["1".to_string(), "2".to_string()])?;
//! assert_eq!(total, "3");
//! # Ok(())
//! # }
//! ```

use crate::Workload;
use anyhow::{bail, Result};

pub mod concat;
pub mod count;
pub mod max;
pub mod wc;

/// Names accepted by [`named`].
pub const NAMES: &[&str] = &["wc", "concat", "count", "max"];

/// Gets the [`Workload`] named `name`.
///
/// Returns [`None`] if no application with the given name was found.
pub fn try_named(name: &str) -> Option<Workload> {
    match name {
        "wc" => Some(Workload {
            make_reduce: wc::make_reduce,
        }),
        "concat" => Some(Workload {
            make_reduce: concat::make_reduce,
        }),
        "count" => Some(Workload {
            make_reduce: count::make_reduce,
        }),
        "max" => Some(Workload {
            make_reduce: max::make_reduce,
        }),
        _ => None,
    }
}

/// Gets the [`Workload`] named `name`.
///
/// Returns an [`anyhow::Error`] if no application with the given name was found.
pub fn named(name: &str) -> Result<Workload> {
    match try_named(name) {
        Some(app) => Ok(app),
        None => bail!("No app named `{}` found. Known apps: {}", name, NAMES.join(", ")),
    }
}
