//! Joins every value of a key, in arrival order, with a separator.
//!

use crate::utils::parse_aux_args;
use crate::ReduceFn;
use anyhow::Result;
use bytes::Bytes;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(no_binary_name = true)]
struct Args {
    #[clap(short, long, value_parser, default_value = ",")]
    sep: String,
}

/// Parses the separator once; the returned function only joins.
pub fn make_reduce(aux: &Bytes) -> Result<ReduceFn> {
    let args: Args = parse_aux_args(aux)?;
    Ok(Box::new(move |_key: &str, values: &[String]| -> Result<String> {
        Ok(values.join(&args.sep))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::serialize_args;

    #[test]
    fn joins_with_a_comma_by_default() {
        let reduce = make_reduce(&Bytes::new()).unwrap();
        let values = vec!["1".to_string(), "2".to_string()];
        assert_eq!(reduce("x", &values).unwrap(), "1,2");
    }

    #[test]
    fn separator_comes_from_aux_args() {
        let aux = serialize_args(&["--sep".to_string(), " | ".to_string()]).unwrap();
        let reduce = make_reduce(&aux).unwrap();
        let values = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(reduce("x", &values).unwrap(), "a | b | c");
        assert_eq!(reduce("y", &values[..1]).unwrap(), "a");
    }

    #[test]
    fn bad_aux_args_fail_before_any_key() {
        let aux = serialize_args(&["--bogus".to_string()]).unwrap();
        assert!(make_reduce(&aux).is_err());
    }
}
