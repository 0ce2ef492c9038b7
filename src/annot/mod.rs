//! Shared annotation vocabulary: typed bounding boxes, Pascal VOC parsing,
//! YOLO label rows, and ordered class-name lists.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: marker types prevent mixing pixel and normalized
//!    coordinates at compile time.
//!
//! 2. **Permissive Construction**: "invalid" boxes (unordered corners) are
//!    representable and propagate through conversions unchanged; the
//!    formats themselves do not forbid them.
//!
//! # Example
//!
//! ```
//! use yoloprep::annot::{BBoxXYXY, Pixel, YoloRow};
//!
//! let bbox = BBoxXYXY::<Pixel>::from_xyxy(100.0, 50.0, 300.0, 250.0);
//! let row = YoloRow::from_pixel_bbox(0, &bbox, 400.0, 300.0);
//! assert_eq!(
//!     yoloprep::annot::format_row(&row),
//!     "0 0.500000 0.500000 0.500000 0.666667"
//! );
//! ```

mod bbox;
mod names;
mod space;
pub mod voc;
pub mod yolo;

// Re-export core types for convenient access
pub use bbox::BBoxXYXY;
pub use names::ClassNames;
pub use space::{Normalized, Pixel};
pub use voc::{parse_voc_file, parse_voc_str, VocAnnotation, VocObject};
pub use yolo::{
    format_row, format_rows, parse_label_line, read_image_dimensions, read_label_file, YoloRow,
};
