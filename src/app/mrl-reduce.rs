use std::io;

use anyhow::Result;
use clap::Parser;
use mrlite_reduce::cmd::reduce::{Args, Commands};
use mrlite_reduce::standalone::run::{dump, run_all, run_one};
use mrlite_reduce::utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    utils::init_logging(&args.log_level)?;

    match args.command {
        Commands::Run {
            task,
            partition,
            output,
            args,
        } => run_one(task, partition, output, args).await.map(|_| ()),
        Commands::RunAll {
            task,
            n_reduce,
            args,
        } => run_all(task, n_reduce, args).await,
        Commands::Dump { path } => dump(&path, &mut io::stdout().lock()),
    }
}
