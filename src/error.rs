use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yoloprep operations.
#[derive(Debug, Error)]
pub enum YoloprepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse VOC XML {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to parse YOLO label {path}:{line}: {message}")]
    YoloLabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Invalid class names file {path}: {message}")]
    ClassNamesInvalid { path: PathBuf, message: String },

    #[error("Failed to parse data.yaml {path}: {source}")]
    DataYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid dataset layout at {path}: {message}")]
    LayoutInvalid { path: PathBuf, message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to load font {path}: {message}")]
    FontLoad { path: PathBuf, message: String },

    #[error("Invalid split parameters: {message}")]
    InvalidSplitParams { message: String },

    #[error("Invalid class list: {message}")]
    InvalidClassSpec { message: String },

    #[error("Unsupported annotation format: {0}")]
    UnsupportedAnnotationFormat(String),

    #[error("Failed to serialize report to JSON: {source}")]
    ReportJsonWrite {
        #[source]
        source: serde_json::Error,
    },
}
