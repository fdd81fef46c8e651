//! Counts how many values were emitted for a key.

use crate::ReduceFn;
use anyhow::Result;
use bytes::Bytes;

pub fn make_reduce(_aux: &Bytes) -> Result<ReduceFn> {
    Ok(Box::new(reduce))
}

pub fn reduce(_key: &str, values: &[String]) -> Result<String> {
    Ok(values.len().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_values_not_their_contents() {
        let values = vec!["7".to_string(), "".to_string(), "7".to_string()];
        assert_eq!(reduce("k", &values).unwrap(), "3");
    }
}
