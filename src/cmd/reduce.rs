use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::constants::*;
use crate::standalone::ReduceTask;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,
    /// Log level used when `RUST_LOG` is not set
    #[clap(long, env = ENV_LOG_LEVEL, default_value = DEFAULT_LOG_LEVEL, global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reduce task of a single partition
    Run {
        #[command(flatten)]
        task: TaskArgs,

        /// Reduce partition to process
        #[arg(short, long)]
        partition: usize,

        /// Explicit output path, overriding the conventional name
        #[arg(long)]
        output: Option<PathBuf>,

        /// Auxiliary arguments to pass to the reduce application.
        #[clap(value_parser, last = true)]
        args: Vec<String>,
    },
    /// Run the reduce tasks of partitions 0..n-reduce side by side
    RunAll {
        #[command(flatten)]
        task: TaskArgs,

        /// Number of reduce partitions in the job
        #[arg(short = 'r', long, env = ENV_N_REDUCE)]
        n_reduce: usize,

        /// Auxiliary arguments to pass to the reduce application.
        #[clap(value_parser, last = true)]
        args: Vec<String>,
    },
    /// Print the records of an intermediate or output file
    Dump {
        /// File to decode
        path: PathBuf,
    },
}

/// Options shared by every reduce task of a job.
#[derive(ClapArgs, Debug, Clone)]
pub struct TaskArgs {
    /// Name of the MapReduce job
    #[arg(short, long, env = ENV_JOB)]
    pub job: String,

    /// Number of map tasks that ran
    #[arg(short = 'm', long, env = ENV_N_MAP)]
    pub n_map: usize,

    /// Directory holding the intermediate files
    #[arg(short, long, env = ENV_INPUT_DIR, default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Directory to write outputs to [default: the input directory]
    #[arg(short, long, env = ENV_OUTPUT_DIR)]
    pub output_dir: Option<PathBuf>,

    /// Name of the reduce application
    #[arg(short, long, env = ENV_WORKLOAD, default_value = DEFAULT_WORKLOAD)]
    pub workload: String,
}

impl TaskArgs {
    /// The task for `partition`, with outputs under their conventional names.
    pub fn task(&self, partition: usize) -> ReduceTask {
        let output_dir = self.output_dir.as_ref().unwrap_or(&self.input_dir);
        ReduceTask::new(self.job.clone(), partition, self.n_map)
            .with_input_dir(&self.input_dir)
            .with_output_dir(output_dir)
    }
}
