//! Environment variable names and defaults for the reduce worker.

pub const ENV_JOB: &str = "MRL_JOB";
pub const ENV_N_MAP: &str = "MRL_N_MAP";
pub const ENV_N_REDUCE: &str = "MRL_N_REDUCE";
pub const ENV_INPUT_DIR: &str = "MRL_INPUT_DIR";
pub const ENV_OUTPUT_DIR: &str = "MRL_OUTPUT_DIR";
pub const ENV_WORKLOAD: &str = "MRL_WORKLOAD";
pub const ENV_LOG_LEVEL: &str = "MRL_LOG_LEVEL";

/// Intermediate files are looked up here unless told otherwise.
pub const DEFAULT_INPUT_DIR: &str = ".";
pub const DEFAULT_WORKLOAD: &str = "wc";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Every file name shared with the map and merge steps starts with this.
pub const FILE_PREFIX: &str = "mrtmp.";
