use clap::Parser;

use log::{error, info};
use std::process::ExitCode;

use plate2yolo::{process_dataset, Args, Error};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.src_dir.is_dir() {
        error!(
            "The specified src_dir does not exist: {}",
            args.src_dir.display()
        );
        return ExitCode::FAILURE;
    }

    info!("Starting the conversion process...");

    match process_dataset(&args) {
        Ok(stats) => {
            info!(
                "Done: converted {} labeled images into {}.",
                stats.converted,
                args.output_root().display()
            );
            ExitCode::SUCCESS
        }
        Err(e @ Error::NoLabeledImages { .. }) => {
            error!("{}. Nothing to do.", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
