use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_INPUT_DIR;
use crate::naming::{intermediate_file_name, output_file_name};

pub mod engine;
pub mod run;

/// Everything one reduce worker needs to know to process a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceTask {
    /// Name of the whole MapReduce job.
    pub job_name: String,
    /// Which reduce partition this task owns.
    pub partition: usize,
    /// How many map tasks ran, i.e. how many intermediate files to merge.
    pub n_map: usize,
    /// Directory holding the intermediate files.
    pub input_dir: PathBuf,
    /// Where the reduced output goes.
    pub output: PathBuf,
}

impl ReduceTask {
    /// A task reading from the working directory and writing its output
    /// under the conventional output name, also in the working directory.
    pub fn new(job_name: impl Into<String>, partition: usize, n_map: usize) -> Self {
        let job_name = job_name.into();
        let output = output_file_name(&job_name, partition);
        Self {
            job_name,
            partition,
            n_map,
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output,
        }
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Writes the output under its conventional name inside `dir`.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output = dir
            .as_ref()
            .join(output_file_name(&self.job_name, self.partition));
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Paths of the intermediate files, in ascending map order.
    pub fn intermediate_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (0..self.n_map).map(move |map_index| {
            self.input_dir
                .join(intermediate_file_name(&self.job_name, map_index, self.partition))
        })
    }
}
