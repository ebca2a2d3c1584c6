use log::info;

use crate::config::Args;
use crate::conversion::process_pairs_in_parallel;
use crate::error::{Error, Result};
use crate::io::{create_dataset_yaml, discover_pairs, setup_output_directories};
use crate::partition::assign;
use crate::types::ProcessingStats;
use crate::utils::create_progress_bar;

/// Main dataset processing pipeline: discover, partition once, convert.
///
/// Returns [`Error::NoLabeledImages`] when `src_dir` holds no labeled images, so
/// that callers can tell it apart from a successful run.
pub fn process_dataset(args: &Args) -> Result<ProcessingStats> {
    let pairs = discover_pairs(&args.src_dir)?;
    if pairs.is_empty() {
        return Err(Error::NoLabeledImages {
            dir: args.src_dir.clone(),
        });
    }
    info!("Found {} labeled images.", pairs.len());

    let partition = assign(&pairs, args.seed, args.val_size)?;
    info!(
        "Split into {} train / {} val (seed {}).",
        partition.train.len(),
        partition.val.len(),
        args.seed
    );

    let output_root = args.output_root();
    let output_dirs = setup_output_directories(&output_root, args.overwrite)?;

    let assignments: Vec<_> = partition.assignments().collect();
    let pb = create_progress_bar(assignments.len() as u64, "Convert");
    let stats = process_pairs_in_parallel(
        &assignments,
        &output_dirs,
        &args.class_name,
        args.strict,
        &pb,
    )?;
    pb.finish_with_message("Conversion complete");

    info!("Creating dataset.yaml file...");
    create_dataset_yaml(&output_root, &args.class_name)?;

    stats.print_summary();
    Ok(stats)
}
