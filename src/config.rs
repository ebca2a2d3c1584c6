use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Command-line arguments for converting LabelMe annotations into a
/// single-class YOLO dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory containing images and their LabelMe JSON files
    #[arg(short = 'd', long = "src_dir", visible_alias = "json_dir")]
    pub src_dir: PathBuf,

    /// Output directory for the YOLO dataset [default: <src_dir>/YOLODataset]
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: Option<PathBuf>,

    /// Proportion of the dataset to use for validation
    #[arg(long = "val_size", default_value_t = 0.1, value_parser = validate_size)]
    pub val_size: f64,

    /// Seed for random shuffling
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// The single class to keep; other labels are skipped
    #[arg(long = "class_name", default_value = "license-plate")]
    pub class_name: String,

    /// Delete and recreate existing output directories
    #[arg(long = "overwrite")]
    pub overwrite: bool,

    /// Abort on the first image that fails to convert
    #[arg(long = "strict")]
    pub strict: bool,
}

impl Args {
    pub fn output_root(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.src_dir.join("YOLODataset"))
    }
}

// Validate that the size is strictly between 0.0 and 1.0
fn validate_size(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if val > 0.0 && val < 1.0 => Ok(val),
        _ => Err("SIZE must be strictly between 0.0 and 1.0".to_string()),
    }
}
