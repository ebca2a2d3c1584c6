//! LabelMe to single-class YOLO converter
//!
//! This library converts LabelMe rectangle/polygon annotations into
//! normalized YOLO bounding-box labels for one recognized class, and splits
//! the labeled images into reproducible train/val subsets.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod normalize;
pub mod partition;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::Args;
pub use dataset::process_dataset;
pub use error::{Error, Result};
pub use io::{discover_pairs, setup_output_directories};
pub use normalize::{convert_annotation, normalize_shape, LabelFile};
pub use partition::{assign, Partition};
pub use types::{AnnotationSet, DatasetPair, NormalizedBox, OutputDirs, Shape, ShapeKind, Split};
