use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// Supported image formats
pub const IMG_FORMATS: &[&str] = &["jpg", "jpeg", "png"];

// Precomputed HashSet of image extensions for fast lookup
pub static IMAGE_EXTENSIONS_SET: OnceLock<HashSet<String>> = OnceLock::new();

/// Get the image extensions set
pub fn get_image_extensions_set() -> &'static HashSet<String> {
    IMAGE_EXTENSIONS_SET.get_or_init(|| IMG_FORMATS.iter().map(|ext| ext.to_lowercase()).collect())
}

/// Geometry encoding of a shape.
///
/// Anything other than `"rectangle"` is treated as a general point list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Polygon,
}

impl From<String> for ShapeKind {
    fn from(kind: String) -> Self {
        if kind == "rectangle" {
            ShapeKind::Rectangle
        } else {
            ShapeKind::Polygon
        }
    }
}

// Keeps a present-but-null field apart from a missing one: missing is `None`
// through `#[serde(default)]`, null is `Some(None)`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// A shape as it appears in a LabelMe record, optional fields unresolved
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeRecord {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub label: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub shape_type: Option<Option<ShapeKind>>,
    #[serde(default)]
    pub points: Vec<(f64, f64)>,
}

// The per-image LabelMe record; fields other than `shapes` are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default)]
    pub shapes: Vec<ShapeRecord>,
}

impl AnnotationRecord {
    /// Resolve missing fields: an absent `label` becomes `class_name` and an
    /// absent `shape_type` becomes a rectangle.
    ///
    /// Only absent keys are defaulted. A `null` label never matches any class
    /// and a `null` shape type is treated as a polygon.
    pub fn into_annotation_set(self, class_name: &str) -> AnnotationSet {
        let shapes = self
            .shapes
            .into_iter()
            .map(|shape| Shape {
                label: shape.label.unwrap_or_else(|| Some(class_name.to_string())),
                kind: match shape.shape_type {
                    None => ShapeKind::Rectangle,
                    Some(kind) => kind.unwrap_or(ShapeKind::Polygon),
                },
                points: shape.points,
            })
            .collect();
        AnnotationSet { shapes }
    }
}

/// One labeled region with every field populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// `None` when the record carried an explicit `null` label.
    pub label: Option<String>,
    pub kind: ShapeKind,
    pub points: Vec<(f64, f64)>,
}

impl Shape {
    pub fn rectangle(label: &str, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: Some(label.to_string()),
            kind: ShapeKind::Rectangle,
            points,
        }
    }

    pub fn polygon(label: &str, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: Some(label.to_string()),
            kind: ShapeKind::Polygon,
            points,
        }
    }
}

// All shapes annotated on a single image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    pub shapes: Vec<Shape>,
}

/// Axis-aligned box as center and size, scaled by the image dimensions.
/// Values are not clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// An image together with its annotation file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetPair {
    pub image: PathBuf,
    pub annotation: PathBuf,
}

impl DatasetPair {
    pub fn new(image: impl Into<PathBuf>, annotation: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            annotation: annotation.into(),
        }
    }

    /// Base name of the image, used for the label file name.
    pub fn stem(&self) -> String {
        self.image
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Struct to hold the paths to the output directories for train/val splits
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub root: PathBuf,
    pub train_labels_dir: PathBuf,
    pub val_labels_dir: PathBuf,
    pub train_images_dir: PathBuf,
    pub val_images_dir: PathBuf,
}

impl OutputDirs {
    pub fn new(root: &Path) -> Self {
        let labels_dir = root.join("labels");
        let images_dir = root.join("images");
        Self {
            root: root.to_path_buf(),
            train_labels_dir: labels_dir.join("train"),
            val_labels_dir: labels_dir.join("val"),
            train_images_dir: images_dir.join("train"),
            val_images_dir: images_dir.join("val"),
        }
    }

    pub fn labels_dir(&self, split: Split) -> &Path {
        match split {
            Split::Train => &self.train_labels_dir,
            Split::Val => &self.val_labels_dir,
        }
    }

    pub fn images_dir(&self, split: Split) -> &Path {
        match split {
            Split::Train => &self.train_images_dir,
            Split::Val => &self.val_images_dir,
        }
    }
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_pairs: usize,
    pub converted: usize,
    pub train: usize,
    pub val: usize,
    pub boxes_written: usize,
    pub shapes_skipped: usize,
    pub images_already_present: usize,
    pub failed_conversions: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_converted(&mut self, split: Split, boxes: usize, skipped: usize) {
        self.converted += 1;
        match split {
            Split::Train => self.train += 1,
            Split::Val => self.val += 1,
        }
        self.boxes_written += boxes;
        self.shapes_skipped += skipped;
    }

    pub fn increment_failed(&mut self) {
        self.failed_conversions += 1;
    }

    pub fn increment_images_already_present(&mut self) {
        self.images_already_present += 1;
    }

    /// Combine counters gathered on different worker threads.
    pub fn merge(mut self, other: Self) -> Self {
        self.total_pairs += other.total_pairs;
        self.converted += other.converted;
        self.train += other.train;
        self.val += other.val;
        self.boxes_written += other.boxes_written;
        self.shapes_skipped += other.shapes_skipped;
        self.images_already_present += other.images_already_present;
        self.failed_conversions += other.failed_conversions;
        self
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Total pairs: {}", self.total_pairs);
        log::info!(
            "Converted: {} (train: {}, val: {})",
            self.converted,
            self.train,
            self.val
        );
        log::info!("Boxes written: {}", self.boxes_written);
        log::info!("Shapes skipped (other class): {}", self.shapes_skipped);
        if self.images_already_present > 0 {
            log::info!(
                "Images already present in output: {}",
                self.images_already_present
            );
        }
        if self.failed_conversions > 0 {
            log::warn!("Failed conversions: {}", self.failed_conversions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let record: AnnotationRecord = serde_json::from_str(
            r#"{"version": "5.0.1", "shapes": [{"points": [[1, 2], [3, 4]]}], "imagePath": "a.jpg"}"#,
        )
        .unwrap();
        let set = record.into_annotation_set("license-plate");

        assert_eq!(
            set.shapes,
            vec![Shape::rectangle("license-plate", vec![(1.0, 2.0), (3.0, 4.0)])]
        );
    }

    #[test]
    fn test_unknown_shape_type_is_polygon() {
        let record: AnnotationRecord = serde_json::from_str(
            r#"{"shapes": [
                {"label": "car", "shape_type": "polygon", "points": [[0, 0]]},
                {"label": "car", "shape_type": "linestrip", "points": [[0, 0]]},
                {"label": "car", "shape_type": "rectangle", "points": []}
            ]}"#,
        )
        .unwrap();
        let kinds: Vec<_> = record
            .into_annotation_set("car")
            .shapes
            .iter()
            .map(|shape| shape.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![ShapeKind::Polygon, ShapeKind::Polygon, ShapeKind::Rectangle]
        );
    }

    #[test]
    fn test_null_fields_are_not_defaulted() {
        let record: AnnotationRecord = serde_json::from_str(
            r#"{"shapes": [
                {"label": null, "shape_type": "rectangle", "points": [[0, 0], [10, 10]]},
                {"label": "license-plate", "shape_type": null, "points": [[10, 10], [20, 20], [0, 0], [90, 90]]}
            ]}"#,
        )
        .unwrap();
        let set = record.into_annotation_set("license-plate");

        assert_eq!(set.shapes[0].label, None);
        assert_eq!(set.shapes[0].kind, ShapeKind::Rectangle);
        assert_eq!(set.shapes[1].label.as_deref(), Some("license-plate"));
        assert_eq!(set.shapes[1].kind, ShapeKind::Polygon);

        let label_file =
            crate::normalize::convert_annotation(&set, "license-plate", 100.0, 100.0).unwrap();
        assert_eq!(label_file.skipped, 1);
        assert_eq!(label_file.contents(), "0 0.450000 0.450000 0.900000 0.900000");
    }

    #[test]
    fn test_missing_shapes_is_empty() {
        let record: AnnotationRecord = serde_json::from_str("{}").unwrap();
        assert!(record.into_annotation_set("x").shapes.is_empty());
    }

    #[test]
    fn test_stats_merge() {
        let mut a = ProcessingStats::new();
        a.record_converted(Split::Train, 2, 1);
        let mut b = ProcessingStats::new();
        b.record_converted(Split::Val, 1, 0);
        b.increment_failed();

        let merged = a.merge(b);
        assert_eq!(merged.converted, 2);
        assert_eq!(merged.train, 1);
        assert_eq!(merged.val, 1);
        assert_eq!(merged.boxes_written, 3);
        assert_eq!(merged.shapes_skipped, 1);
        assert_eq!(merged.failed_conversions, 1);
    }
}
