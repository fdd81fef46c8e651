//! Reduce side of word count: sums the per-occurrence counts of a word.
//!
//! Counts are signed 64-bit integers, so negative adjustments are summed
//! too. A total outside the `i64` range is an error.

use crate::ReduceFn;
use anyhow::{Context, Result};
use bytes::Bytes;

pub fn make_reduce(_aux: &Bytes) -> Result<ReduceFn> {
    Ok(Box::new(reduce))
}

pub fn reduce(key: &str, values: &[String]) -> Result<String> {
    let mut count: i64 = 0;
    for value in values {
        let n: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("count {:?} for {:?} is not a number", value, key))?;
        count = count
            .checked_add(n)
            .with_context(|| format!("count for {:?} overflows", key))?;
    }
    Ok(count.to_string())
}
