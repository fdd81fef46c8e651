//! File naming shared with the map phase and the final merge step.

use std::path::PathBuf;

use crate::constants::FILE_PREFIX;

/// Name of the file map task `map_index` wrote for reduce partition `partition`.
pub fn intermediate_file_name(job_name: &str, map_index: usize, partition: usize) -> PathBuf {
    PathBuf::from(format!("{FILE_PREFIX}{job_name}-{map_index}-{partition}"))
}

/// Name of the output file of reduce partition `partition`.
pub fn output_file_name(job_name: &str, partition: usize) -> PathBuf {
    PathBuf::from(format!("{FILE_PREFIX}{job_name}-res-{partition}"))
}
