//! Shape geometry to normalized YOLO bounding boxes.

use crate::error::{Error, Result};
use crate::types::{AnnotationSet, NormalizedBox, Shape, ShapeKind};

/// Class index written for the single recognized class.
pub const CLASS_INDEX: usize = 0;

/// Label lines produced for one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelFile {
    pub lines: Vec<String>,
    /// Shapes dropped because their label is not the recognized class.
    pub skipped: usize,
}

impl LabelFile {
    /// Lines joined by `\n` without a trailing newline.
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }
}

/// Axis-aligned extent of a shape as `(x_min, y_min, x_max, y_max)`.
///
/// Rectangles with at least two points use only their first two points as
/// opposite corners; any further points are ignored. Every other shape is
/// enclosed over all of its points.
pub fn bounding_box(shape: &Shape) -> Result<(f64, f64, f64, f64)> {
    if shape.kind == ShapeKind::Rectangle && shape.points.len() >= 2 {
        let (x1, y1) = shape.points[0];
        let (x2, y2) = shape.points[1];
        return Ok((x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)));
    }

    if shape.points.is_empty() {
        return Err(Error::MalformedShape {
            label: shape.label.clone().unwrap_or_default(),
        });
    }

    Ok(shape.points.iter().fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(x_min, y_min, x_max, y_max), &(x, y)| {
            (x_min.min(x), y_min.min(y), x_max.max(x), y_max.max(y))
        },
    ))
}

/// Scale a pixel-space box by the image size.
pub fn to_yolo_bbox(
    (x_min, y_min, x_max, y_max): (f64, f64, f64, f64),
    image_width: f64,
    image_height: f64,
) -> NormalizedBox {
    NormalizedBox {
        x_center: (x_min + x_max) / 2.0 / image_width,
        y_center: (y_min + y_max) / 2.0 / image_height,
        width: (x_max - x_min) / image_width,
        height: (y_max - y_min) / image_height,
    }
}

fn check_dimensions(image_width: f64, image_height: f64) -> Result<()> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(image_width) && valid(image_height) {
        Ok(())
    } else {
        Err(Error::InvalidImageDimensions {
            width: image_width,
            height: image_height,
        })
    }
}

/// Normalize one shape, or `Ok(None)` when its label is not `class_name`.
pub fn normalize_shape(
    shape: &Shape,
    class_name: &str,
    image_width: f64,
    image_height: f64,
) -> Result<Option<NormalizedBox>> {
    check_dimensions(image_width, image_height)?;

    if shape.label.as_deref() != Some(class_name) {
        return Ok(None);
    }

    let extent = bounding_box(shape)?;
    Ok(Some(to_yolo_bbox(extent, image_width, image_height)))
}

pub fn format_label_line(class_index: usize, bbox: &NormalizedBox) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        class_index, bbox.x_center, bbox.y_center, bbox.width, bbox.height
    )
}

/// Convert every shape of an image into label lines, in annotation order.
pub fn convert_annotation(
    annotation: &AnnotationSet,
    class_name: &str,
    image_width: f64,
    image_height: f64,
) -> Result<LabelFile> {
    check_dimensions(image_width, image_height)?;

    let mut label_file = LabelFile {
        lines: Vec::with_capacity(annotation.shapes.len()),
        skipped: 0,
    };

    for shape in &annotation.shapes {
        match normalize_shape(shape, class_name, image_width, image_height)? {
            Some(bbox) => label_file
                .lines
                .push(format_label_line(CLASS_INDEX, &bbox)),
            None => label_file.skipped += 1,
        }
    }

    Ok(label_file)
}
