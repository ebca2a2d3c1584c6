use glob::{glob, Pattern};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::normalize::{LabelFile, CLASS_INDEX};
use crate::types::{DatasetPair, OutputDirs};
use crate::utils::{create_output_directory, is_image_file};

/// Set up the directory structure for YOLO dataset output
pub fn setup_output_directories(output_dir: &Path, overwrite: bool) -> Result<OutputDirs> {
    let output_dirs = OutputDirs::new(output_dir);

    create_output_directory(&output_dirs.train_labels_dir, overwrite)?;
    create_output_directory(&output_dirs.val_labels_dir, overwrite)?;
    create_output_directory(&output_dirs.train_images_dir, overwrite)?;
    create_output_directory(&output_dirs.val_images_dir, overwrite)?;

    Ok(output_dirs)
}

/// Find every image directly inside `src_dir` that has a `<stem>.json` next
/// to it. Pairs are returned sorted by image path.
pub fn discover_pairs(src_dir: &Path) -> Result<Vec<DatasetPair>> {
    let pattern = format!("{}/*", Pattern::escape(&src_dir.to_string_lossy()));

    let mut images: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    images.sort();

    let pairs = images
        .into_iter()
        .filter_map(|image| {
            let annotation = image.with_extension("json");
            if annotation.is_file() {
                Some(DatasetPair::new(image, annotation))
            } else {
                log::debug!("No annotation for {}, skipping", image.display());
                None
            }
        })
        .collect();

    Ok(pairs)
}

/// Write `<stem>.txt` into `labels_dir`. The file is created even when there
/// are no lines.
pub fn write_label_file(labels_dir: &Path, stem: &str, label_file: &LabelFile) -> Result<PathBuf> {
    let label_output_path = labels_dir.join(format!("{}.txt", stem));
    let file = File::create(&label_output_path).map_err(|e| Error::io(&label_output_path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(label_file.contents().as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(&label_output_path, e))?;
    Ok(label_output_path)
}

/// Copy an image into `images_dir` under its own file name. Returns `false`
/// without touching anything when the destination already exists.
pub fn copy_image_if_missing(image_path: &Path, images_dir: &Path) -> Result<bool> {
    let file_name = image_path
        .file_name()
        .ok_or_else(|| Error::io(image_path, std::io::ErrorKind::InvalidInput.into()))?;
    let image_output_path = images_dir.join(file_name);

    if image_output_path.exists() {
        return Ok(false);
    }
    fs::copy(image_path, &image_output_path).map_err(|e| Error::io(&image_output_path, e))?;
    Ok(true)
}

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml(output_dir: &Path, class_name: &str) -> Result<()> {
    let dataset_yaml_path = output_dir.join("dataset.yaml");
    let absolute_path = fs::canonicalize(output_dir).map_err(|e| Error::io(output_dir, e))?;

    let mut yaml_content = format!(
        "path: {}\ntrain: images/train\nval: images/val\ntest:\n",
        absolute_path.to_string_lossy()
    );
    yaml_content.push_str("\nnames:\n");
    yaml_content.push_str(&format!("    {}: {}\n", CLASS_INDEX, class_name));

    let file = File::create(&dataset_yaml_path).map_err(|e| Error::io(&dataset_yaml_path, e))?;
    let mut dataset_yaml = BufWriter::new(file);
    dataset_yaml
        .write_all(yaml_content.as_bytes())
        .and_then(|_| dataset_yaml.flush())
        .map_err(|e| Error::io(&dataset_yaml_path, e))
}
