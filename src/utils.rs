use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{get_image_extensions_set, AnnotationRecord, AnnotationSet};

/// Whether the path has one of the supported image extensions, ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| get_image_extensions_set().contains(&ext.to_lowercase()))
}

/// Read a LabelMe JSON file and resolve its defaults against `class_name`.
/// The file is parsed directly from the stream rather than loaded into memory.
pub fn read_annotation(path: &Path, class_name: &str) -> Result<AnnotationSet> {
    let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let record: AnnotationRecord =
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(record.into_annotation_set(class_name))
}

/// Width and height of an image, read from its header only.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Create an output directory. Existing directories are kept unless
/// `overwrite` is set, in which case they are deleted and recreated.
pub fn create_output_directory(path: &Path, overwrite: bool) -> Result<PathBuf> {
    if path.exists() && overwrite {
        log::warn!(
            "Directory {:?} already exists. Deleting and recreating it.",
            path
        );
        fs::remove_dir_all(path).map_err(|e| Error::io(path, e))?;
    }
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeKind;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a/b.jpg")));
        assert!(is_image_file(Path::new("b.JPEG")));
        assert!(is_image_file(Path::new("b.Png")));
        assert!(!is_image_file(Path::new("b.json")));
        assert!(!is_image_file(Path::new("b.bmp")));
        assert!(!is_image_file(Path::new("noext")));
    }

    #[test]
    fn test_read_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("car.json");
        fs::write(
            &path,
            r#"{"shapes": [{"label": "car", "shape_type": "polygon", "points": [[1.5, 2], [3, 4]]}]}"#,
        )
        .unwrap();

        let set = read_annotation(&path, "license-plate").unwrap();
        assert_eq!(set.shapes.len(), 1);
        assert_eq!(set.shapes[0].label.as_deref(), Some("car"));
        assert_eq!(set.shapes[0].kind, ShapeKind::Polygon);
        assert_eq!(set.shapes[0].points, vec![(1.5, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn test_read_annotation_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            read_annotation(&path, "x"),
            Err(Error::Json { .. })
        ));
        assert!(matches!(
            read_annotation(&dir.path().join("missing.json"), "x"),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("labels/train");
        create_output_directory(&out, false).unwrap();
        fs::write(out.join("keep.txt"), "").unwrap();

        create_output_directory(&out, false).unwrap();
        assert!(out.join("keep.txt").exists());

        create_output_directory(&out, true).unwrap();
        assert!(out.exists());
        assert!(!out.join("keep.txt").exists());
    }
}
