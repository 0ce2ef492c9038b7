//! YOLO-format label rows.
//!
//! One row per object: `<class_id> <x_center> <y_center> <width> <height>`,
//! all four coordinates normalized to [0, 1] by the image dimensions and
//! written with six-decimal fixed-point formatting.

use std::fs;
use std::path::Path;

use super::{BBoxXYXY, Normalized, Pixel};
use crate::error::YoloprepError;

const LABEL_EXTENSION: &str = "txt";

/// One YOLO label line in normalized center/size form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloRow {
    pub class_id: usize,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl YoloRow {
    /// Builds a row from a pixel-space box and the image dimensions.
    pub fn from_pixel_bbox(
        class_id: usize,
        bbox: &BBoxXYXY<Pixel>,
        image_width: f64,
        image_height: f64,
    ) -> Self {
        let (cx, cy, w, h) = bbox.to_normalized(image_width, image_height).to_cxcywh();
        Self {
            class_id,
            cx,
            cy,
            w,
            h,
        }
    }

    /// Denormalizes the row back to a pixel-space box by inverting the
    /// center/size formula.
    pub fn to_pixel_bbox(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY::<Normalized>::from_cxcywh(self.cx, self.cy, self.w, self.h)
            .to_pixel(image_width, image_height)
    }
}

/// Parse a single label line.
///
/// Returns `Ok(None)` for blank lines. Non-blank lines must contain exactly
/// five whitespace-separated tokens.
pub fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<YoloRow>, YoloprepError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();

    if tokens.len() != 5 {
        return Err(YoloprepError::YoloLabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "expected 5 whitespace-separated fields, found {}{}",
                tokens.len(),
                if tokens.len() > 5 { " or more" } else { "" }
            ),
        });
    }

    let class_id = tokens[0]
        .parse::<usize>()
        .map_err(|_| YoloprepError::YoloLabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "invalid class_id '{}'; expected non-negative integer",
                tokens[0]
            ),
        })?;

    let cx = parse_f64_token(tokens[1], "x_center", file_path, line_num)?;
    let cy = parse_f64_token(tokens[2], "y_center", file_path, line_num)?;
    let w = parse_f64_token(tokens[3], "width", file_path, line_num)?;
    let h = parse_f64_token(tokens[4], "height", file_path, line_num)?;

    Ok(Some(YoloRow {
        class_id,
        cx,
        cy,
        w,
        h,
    }))
}

/// Read every row from a label file, skipping blank lines.
pub fn read_label_file(path: &Path) -> Result<Vec<YoloRow>, YoloprepError> {
    let content = fs::read_to_string(path).map_err(YoloprepError::Io)?;
    let mut rows = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if let Some(row) = parse_label_line(line, path, line_idx + 1)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Format one row with six-decimal fixed-point coordinates.
pub fn format_row(row: &YoloRow) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        row.class_id, row.cx, row.cy, row.w, row.h
    )
}

/// Format rows newline-joined, without a trailing newline or header.
pub fn format_rows(rows: &[YoloRow]) -> String {
    rows.iter()
        .map(format_row)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read an image's pixel dimensions from its header, without a full decode.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), YoloprepError> {
    let size = imagesize::size(path).map_err(|source| YoloprepError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| YoloprepError::LayoutInvalid {
            path: path.to_path_buf(),
            message: format!("image width {} does not fit in u32", size.width),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| YoloprepError::LayoutInvalid {
            path: path.to_path_buf(),
            message: format!("image height {} does not fit in u32", size.height),
        })?;

    Ok((width, height))
}

/// Fuzz-only entrypoint for YOLO single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), YoloprepError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

pub(crate) fn has_label_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(LABEL_EXTENSION))
        .unwrap_or(false)
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, YoloprepError> {
    raw.parse::<f64>()
        .map_err(|_| YoloprepError::YoloLabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
        })
}
