//! Coordinate space marker types.
//!
//! Zero-sized types used as type parameters so that pixel-space and
//! normalized-space boxes cannot be mixed at compile time.

/// Marker type for absolute pixel coordinates.
///
/// (0, 0) is the top-left corner of the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for normalized coordinates in [0.0, 1.0].
///
/// Positions are fractions of the image dimensions, making them
/// resolution-independent. This is the space YOLO labels live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Normalized {}
