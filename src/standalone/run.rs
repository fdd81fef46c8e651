//! Drives reduce tasks the way the `mrl-reduce` subcommands do.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::cmd::reduce::TaskArgs;
use crate::codec::RecordReader;
use crate::standalone::engine::{run_workload, ReduceReport};
use crate::{utils, workload};

fn report(report: &ReduceReport) {
    info!(
        job = %report.job_name,
        partition = report.partition,
        files = report.input_files,
        records = report.input_records,
        keys = report.keys,
        "wrote {}",
        report.output.display()
    );
}

/// Runs the reduce task of a single partition on the blocking pool.
pub async fn run_one(
    task_args: TaskArgs,
    partition: usize,
    output: Option<PathBuf>,
    args: Vec<String>,
) -> Result<ReduceReport> {
    let engine = workload::named(&task_args.workload)?;
    let serialized_args = utils::serialize_args(&args)?;
    let mut task = task_args.task(partition);
    if let Some(output) = output {
        task = task.with_output(output);
    }

    let done = tokio::task::spawn_blocking(move || run_workload(&task, engine, &serialized_args))
        .await
        .context("reduce task panicked")??;
    report(&done);
    Ok(done)
}

/// Runs partitions `0..n_reduce` side by side.
///
/// Each partition has its own inputs, table and output, so one failing task
/// never stops the others. Every task is waited for before the failures are
/// reported together.
pub async fn run_all(task_args: TaskArgs, n_reduce: usize, args: Vec<String>) -> Result<()> {
    let engine = workload::named(&task_args.workload)?;
    let serialized_args = utils::serialize_args(&args)?;

    let mut tasks = JoinSet::new();
    for partition in 0..n_reduce {
        let task = task_args.task(partition);
        let aux = serialized_args.clone();
        tasks.spawn_blocking(move || (partition, run_workload(&task, engine, &aux)));
    }

    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(done))) => report(&done),
            Ok((partition, Err(e))) => {
                error!(partition, "reduce task failed: {}", e);
                failed += 1;
            }
            Err(e) => {
                error!("reduce task panicked: {}", e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} reduce tasks failed", failed, n_reduce);
    }
    Ok(())
}

/// Writes every record of `path` to `out` as `key<TAB>value` lines.
pub fn dump<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    for kv in RecordReader::open(path)? {
        let kv = kv?;
        writeln!(out, "{}\t{}", kv.key(), kv.value())?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write_records;
    use crate::KeyValue;

    fn task_args(dir: &Path, job: &str) -> TaskArgs {
        TaskArgs {
            job: job.into(),
            n_map: 1,
            input_dir: dir.to_path_buf(),
            output_dir: None,
            workload: "wc".into(),
        }
    }

    #[tokio::test]
    async fn run_all_finishes_healthy_partitions_and_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let args = task_args(dir.path(), "half");
        // partition 0 has its intermediate file, partition 1 does not
        let present = args.task(0).intermediate_paths().next().unwrap();
        write_records(&present, &[KeyValue::new("a", "1"), KeyValue::new("a", "2")]).unwrap();

        let err = run_all(args.clone(), 2, vec![]).await.unwrap_err();
        assert!(err.to_string().contains("1 of 2"), "{err}");

        let out = args.task(0).output;
        let mut buf = Vec::new();
        dump(&out, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a\t3\n");
        assert!(!args.task(1).output.exists());
    }

    #[tokio::test]
    async fn run_all_with_every_input_present_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let args = task_args(dir.path(), "full");
        for partition in 0..3 {
            let path = args.task(partition).intermediate_paths().next().unwrap();
            write_records(&path, &[KeyValue::new("k", "1")]).unwrap();
        }
        run_all(args.clone(), 3, vec![]).await.unwrap();
        for partition in 0..3 {
            assert!(args.task(partition).output.exists());
        }
    }

    #[tokio::test]
    async fn run_one_honours_an_explicit_output() {
        let dir = tempfile::tempdir().unwrap();
        let args = task_args(dir.path(), "one");
        let path = args.task(0).intermediate_paths().next().unwrap();
        write_records(&path, &[KeyValue::new("x", "5")]).unwrap();

        let output = dir.path().join("elsewhere").join("result");
        let done = run_one(args, 0, Some(output.clone()), vec![]).await.unwrap();
        assert_eq!(done.output, output);
        assert_eq!(done.keys, 1);
        assert!(output.exists());
    }

    #[test]
    fn dump_prints_key_tab_value_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records");
        write_records(&path, &[KeyValue::new("a", "1"), KeyValue::new("b", "2")]).unwrap();

        let mut buf = Vec::new();
        dump(&path, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a\t1\nb\t2\n");
    }

    #[test]
    fn dump_of_a_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = Vec::new();
        assert!(dump(&dir.path().join("missing"), &mut buf).is_err());
        assert!(buf.is_empty());
    }
}
