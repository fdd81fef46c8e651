use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use itertools::Itertools;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::codec::{RecordReader, RecordWriter};
use crate::error::{ReduceError, Result};
use crate::standalone::ReduceTask;
use crate::{KeyValue, Workload};

// types related to this engine
type Groups = HashMap<String, Vec<String>>;

/// What a successful reduce task did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceReport {
    pub job_name: String,
    pub partition: usize,
    /// Intermediate files merged, always the task's `n_map`.
    pub input_files: usize,
    /// Records read across all intermediate files.
    pub input_records: usize,
    /// Distinct keys, which is also the number of output records.
    pub keys: usize,
    pub output: PathBuf,
}

/// Runs one reduce task to completion.
///
/// Every intermediate file of the partition is read into a grouping table
/// before anything is written. Keys are then visited in byte order and
/// `reduce_fn` is called once per key with all of that key's values, in
/// ascending map order and then file order. Each result is written as soon as
/// it is produced.
///
/// Output is staged next to `task.output` and renamed into place only once it
/// is complete, so a failed task never leaves a file at the output path. A
/// stale output from an earlier run is removed up front.
pub fn execute_reduce_task<F>(task: &ReduceTask, mut reduce_fn: F) -> Result<ReduceReport>
where
    F: FnMut(&str, &[String]) -> anyhow::Result<String>,
{
    info!(
        job = %task.job_name,
        partition = task.partition,
        n_map = task.n_map,
        output = %task.output.display(),
        "starting reduce task"
    );

    remove_stale_output(&task.output)?;

    let (groups, input_records) = perform_merge(task)?;
    let keys = groups.len();
    debug!(input_records, keys, "merged intermediate files");

    let staging = staging_path(&task.output);
    if let Err(err) = perform_reduce(groups, &staging, &mut reduce_fn)
        .and_then(|_| commit(&staging, &task.output))
    {
        if let Err(e) = fs::remove_file(&staging) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %staging.display(), "could not remove staging file: {}", e);
            }
        }
        return Err(err);
    }

    info!(
        job = %task.job_name,
        partition = task.partition,
        keys,
        "reduce task complete"
    );
    Ok(ReduceReport {
        job_name: task.job_name.clone(),
        partition: task.partition,
        input_files: task.n_map,
        input_records,
        keys,
        output: task.output.clone(),
    })
}

/// Runs `task` with a named application's reduce function and its
/// serialized auxiliary arguments.
///
/// The arguments are parsed once, before any intermediate file is read.
pub fn run_workload(task: &ReduceTask, workload: Workload, aux: &Bytes) -> Result<ReduceReport> {
    let reduce_fn =
        (workload.make_reduce)(aux).map_err(|source| ReduceError::Arguments { source })?;
    execute_reduce_task(task, |key, values| reduce_fn(key, values))
}

/// Reads every intermediate file of the task into a fresh grouping table.
fn perform_merge(task: &ReduceTask) -> Result<(Groups, usize)> {
    let mut groups = Groups::new();
    let mut total = 0;
    for path in task.intermediate_paths() {
        // open and drain one file at a time, in map order
        let mut reader = RecordReader::open(&path)?;
        for kv in reader.by_ref() {
            let (key, value) = kv?.into_parts();
            groups.entry(key).or_default().push(value);
        }
        trace!(path = %path.display(), records = reader.records(), "read intermediate file");
        total += reader.records();
    }
    Ok((groups, total))
}

fn perform_reduce<F>(groups: Groups, staging: &Path, reduce_fn: &mut F) -> Result<()>
where
    F: FnMut(&str, &[String]) -> anyhow::Result<String>,
{
    let write_err = |source| ReduceError::WriteOutput {
        path: staging.to_path_buf(),
        source,
    };

    let file = File::create(staging).map_err(|source| ReduceError::CreateOutput {
        path: staging.to_path_buf(),
        source,
    })?;
    let mut writer = RecordWriter::new(file);

    // String ordering is byte ordering, never locale collation
    let sorted = groups
        .into_iter()
        .sorted_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
    for (key, values) in sorted {
        let value = reduce_fn(&key, &values).map_err(|source| ReduceError::Reduce {
            key: key.clone(),
            source,
        })?;
        writer.write(&KeyValue { key, value }).map_err(write_err)?;
    }

    let file = writer.finish().map_err(write_err)?;
    file.sync_all().map_err(write_err)
}

fn commit(staging: &Path, output: &Path) -> Result<()> {
    fs::rename(staging, output).map_err(|source| ReduceError::CommitOutput {
        path: output.to_path_buf(),
        source,
    })
}

/// Clears the way for a new output: the previous output, staging files
/// abandoned by crashed runs, and a missing output directory.
fn remove_stale_output(output: &Path) -> Result<()> {
    let create_err = |source| ReduceError::CreateOutput {
        path: output.to_path_buf(),
        source,
    };
    match fs::remove_file(output) {
        Ok(()) => debug!(path = %output.display(), "removed stale output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(create_err(e)),
    }
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(create_err)?;
            dir
        }
        _ => Path::new("."),
    };
    remove_abandoned_staging(dir, &staging_prefix(output)).map_err(create_err)
}

fn remove_abandoned_staging(dir: &Path, prefix: &str) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !(name.starts_with(prefix) && name.ends_with(".tmp")) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => debug!(path = %entry.path().display(), "removed abandoned staging file"),
            Err(e) => warn!(path = %entry.path().display(), "could not remove staging file: {}", e),
        }
    }
    Ok(())
}

/// Every staging file of `output` starts with this.
fn staging_prefix(output: &Path) -> String {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    format!(".{}.", name)
}

/// A hidden, uniquely named file beside `output`. Same directory, so the
/// final rename does not cross filesystems.
fn staging_path(output: &Path) -> PathBuf {
    output.with_file_name(format!("{}{}.tmp", staging_prefix(output), Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write_records;

    fn kv(k: &str, v: &str) -> KeyValue {
        KeyValue::new(k, v)
    }

    #[test]
    fn staging_file_sits_next_to_the_output() {
        let staging = staging_path(Path::new("/out/mrtmp.job-res-0"));
        assert_eq!(staging.parent(), Some(Path::new("/out")));
        let name = staging.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".mrtmp.job-res-0."), "{name}");
        assert!(name.ends_with(".tmp"), "{name}");
    }

    #[test]
    fn merge_appends_in_map_order_then_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let task = ReduceTask::new("order", 0, 2).with_input_dir(dir.path());
        let paths: Vec<PathBuf> = task.intermediate_paths().collect();
        write_records(&paths[0], &[kv("k", "m0-a"), kv("j", "m0"), kv("k", "m0-b")]).unwrap();
        write_records(&paths[1], &[kv("k", "m1-a")]).unwrap();

        let (groups, records) = perform_merge(&task).unwrap();
        assert_eq!(records, 4);
        assert_eq!(groups["k"], vec!["m0-a", "m0-b", "m1-a"]);
        assert_eq!(groups["j"], vec!["m0"]);
    }

    #[test]
    fn keys_are_visited_in_byte_order() {
        let dir = tempfile::tempdir().unwrap();
        let task = ReduceTask::new("bytes", 0, 1)
            .with_input_dir(dir.path())
            .with_output_dir(dir.path());
        let path = task.intermediate_paths().next().unwrap();
        // uppercase sorts before lowercase, multi-byte UTF-8 after ASCII
        write_records(&path, &[kv("é", "1"), kv("b", "1"), kv("B", "1"), kv("a", "1")]).unwrap();

        let mut seen = Vec::new();
        execute_reduce_task(&task, |key, _| {
            seen.push(key.to_string());
            Ok(String::new())
        })
        .unwrap();
        assert_eq!(seen, vec!["B", "a", "b", "é"]);
    }

    #[test]
    fn reduce_failure_leaves_no_output_or_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let task = ReduceTask::new("fail", 0, 1)
            .with_input_dir(dir.path())
            .with_output_dir(dir.path());
        let path = task.intermediate_paths().next().unwrap();
        write_records(&path, &[kv("a", "1"), kv("b", "oops")]).unwrap();

        let err = execute_reduce_task(&task, |key, _| {
            if key == "b" {
                anyhow::bail!("cannot reduce {key}");
            }
            Ok("ok".into())
        })
        .unwrap_err();
        assert!(matches!(err, ReduceError::Reduce { ref key, .. } if key == "b"));
        assert!(!task.output.exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
    }

    #[test]
    fn abandoned_staging_files_are_swept_before_a_run() {
        let dir = tempfile::tempdir().unwrap();
        let task = ReduceTask::new("crash", 0, 1)
            .with_input_dir(dir.path())
            .with_output_dir(dir.path());
        let path = task.intermediate_paths().next().unwrap();
        write_records(&path, &[kv("a", "1")]).unwrap();
        let abandoned = [
            dir.path().join(".mrtmp.crash-res-0.1111.tmp"),
            dir.path().join(".mrtmp.crash-res-0.2222.tmp"),
        ];
        for p in &abandoned {
            fs::write(p, "half a record").unwrap();
        }
        // another partition's staging file is not ours to remove
        let neighbour = dir.path().join(".mrtmp.crash-res-1.3333.tmp");
        fs::write(&neighbour, "").unwrap();

        execute_reduce_task(&task, |_, values| Ok(values.join(","))).unwrap();

        for p in &abandoned {
            assert!(!p.exists(), "{} survived", p.display());
        }
        assert!(neighbour.exists());
        assert!(task.output.exists());
    }
}
