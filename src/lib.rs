//! The reduce stage of a MapReduce (lite) job.
//!
//! A reduce worker is handed a job name, a partition index and the number
//! of map tasks that ran. It merges the intermediate files the map tasks
//! left for its partition, groups the records by key, runs the application's
//! reduce function once per key and writes a key-ordered output file that
//! the final merge step can consume.

use serde::{Deserialize, Serialize};

pub mod cmd;
pub mod codec;
pub mod constants;
pub mod error;
pub mod naming;
pub mod standalone;
pub mod utils;
pub mod workload;

pub use error::{ReduceError, Result};
pub use naming::{intermediate_file_name, output_file_name};
pub use standalone::engine::{execute_reduce_task, run_workload, ReduceReport};
pub use standalone::ReduceTask;

/////////////////////////////////////////////////////////////////////////////
// MapReduce application types
/////////////////////////////////////////////////////////////////////////////

/// A reduce function takes in a key and every value recorded for that key.
/// It returns an [`anyhow::Result`] containing the single reduced value.
///
/// Values arrive in ascending map-task order, then in the order they
/// appeared in each intermediate file.
pub type ReduceFn = Box<dyn Fn(&str, &[String]) -> anyhow::Result<String> + Send + Sync>;

/// Builds an application's [`ReduceFn`] from its serialized auxiliary
/// arguments. Called once per task, before any key is reduced.
pub type MakeReduceFn = fn(aux: &bytes::Bytes) -> anyhow::Result<ReduceFn>;

/// A named reduce application.
#[derive(Copy, Clone)]
pub struct Workload {
    pub make_reduce: MakeReduceFn,
}

/////////////////////////////////////////////////////////////////////////////
// Key-value pairs
/////////////////////////////////////////////////////////////////////////////

/// A single key-value pair.
///
/// This is the record type of both intermediate and output files. The
/// capitalized field names are the ones the map and merge steps expect.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct KeyValue {
    /// The key.
    #[serde(rename = "Key")]
    pub key: String,
    /// The value.
    #[serde(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Construct a new key-value pair from the given key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the key of this key-value pair.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value of this key-value pair.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the key-value pair and returns the key and value.
    #[inline]
    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }
}
