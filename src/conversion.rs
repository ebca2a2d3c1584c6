use indicatif::ProgressBar;
use log::error;
use rayon::prelude::*;

use crate::error::Result;
use crate::io::{copy_image_if_missing, write_label_file};
use crate::normalize::convert_annotation;
use crate::types::{DatasetPair, OutputDirs, ProcessingStats, Split};
use crate::utils::{image_dimensions, read_annotation};

/// What happened to a single converted pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub split: Split,
    pub boxes: usize,
    pub skipped: usize,
    pub image_copied: bool,
}

/// Convert one pair and write its image and label file into `split`.
///
/// Nothing is written if the image or annotation cannot be read or any
/// shape is malformed.
pub fn process_pair(
    pair: &DatasetPair,
    split: Split,
    output_dirs: &OutputDirs,
    class_name: &str,
) -> Result<PairOutcome> {
    let (width, height) = image_dimensions(&pair.image)?;
    let annotation = read_annotation(&pair.annotation, class_name)?;
    let label_file = convert_annotation(&annotation, class_name, width as f64, height as f64)?;

    let image_copied = copy_image_if_missing(&pair.image, output_dirs.images_dir(split))?;
    write_label_file(output_dirs.labels_dir(split), &pair.stem(), &label_file)?;

    Ok(PairOutcome {
        split,
        boxes: label_file.lines.len(),
        skipped: label_file.skipped,
        image_copied,
    })
}

/// Convert a batch of assigned pairs in parallel.
///
/// Failed pairs are logged and counted. When `strict` is set the run stops
/// with a conversion error instead.
pub fn process_pairs_in_parallel(
    assignments: &[(&DatasetPair, Split)],
    output_dirs: &OutputDirs,
    class_name: &str,
    strict: bool,
    pb: &ProgressBar,
) -> Result<ProcessingStats> {
    assignments
        .par_iter()
        .map(|&(pair, split)| {
            let mut stats = ProcessingStats::new();
            stats.total_pairs = 1;

            match process_pair(pair, split, output_dirs, class_name) {
                Ok(outcome) => {
                    stats.record_converted(outcome.split, outcome.boxes, outcome.skipped);
                    if !outcome.image_copied {
                        stats.increment_images_already_present();
                    }
                }
                Err(e) if strict => return Err(e),
                Err(e) => {
                    error!("Failed to convert {}: {}", pair.image.display(), e);
                    stats.increment_failed();
                }
            }

            pb.inc(1);
            Ok(stats)
        })
        .try_reduce(ProcessingStats::new, |a, b| Ok(a.merge(b)))
}
