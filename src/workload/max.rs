//! Keeps the greatest value of a key, compared byte by byte.

use crate::ReduceFn;
use anyhow::{Context, Result};
use bytes::Bytes;

pub fn make_reduce(_aux: &Bytes) -> Result<ReduceFn> {
    Ok(Box::new(reduce))
}

pub fn reduce(key: &str, values: &[String]) -> Result<String> {
    values
        .iter()
        .max_by(|a, b| a.as_bytes().cmp(b.as_bytes()))
        .cloned()
        .with_context(|| format!("no values for {:?}", key))
}
