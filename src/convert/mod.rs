//! Batch conversion of Pascal VOC XML annotations to YOLO label files.
//!
//! The converter scans a directory of `.xml` files (flat, non-recursive),
//! converts each against an ordered class list, and writes one `.txt` label
//! file per input that produced at least one row. A bad input file never
//! aborts the run; it is recorded in the [`ConvertReport`] and skipped.

mod report;

pub use report::{ConvertFailure, ConvertReport};

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::annot::voc::has_xml_extension;
use crate::annot::{format_rows, parse_voc_file, ClassNames, YoloRow};
use crate::error::YoloprepError;

/// Inputs for a batch conversion run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Directory containing the VOC `.xml` annotation files.
    pub xml_dir: PathBuf,
    /// Directory to write `.txt` label files into. Created if missing.
    pub output_dir: PathBuf,
    /// Ordered class list; an object's class id is its position here.
    pub classes: ClassNames,
}

/// What happened to a single input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// A label file was written with this many rows.
    Written { rows: usize },
    /// Every object was filtered out (or the file had none); nothing written.
    NoMatchingObjects,
}

/// Converts every `.xml` file in `opts.xml_dir`, writing label files into
/// `opts.output_dir`.
///
/// Files are processed in file-name order. Parse failures and files with no
/// matching objects are reported as failures but do not stop the run.
pub fn convert_dir(opts: &ConvertOptions) -> Result<ConvertReport, YoloprepError> {
    if opts.classes.is_empty() {
        return Err(YoloprepError::InvalidClassSpec {
            message: "class list is empty; nothing would ever be converted".to_string(),
        });
    }

    fs::create_dir_all(&opts.output_dir).map_err(YoloprepError::Io)?;

    let xml_files = collect_xml_files(&opts.xml_dir)?;

    let mut convert_report = ConvertReport::new();
    convert_report.total = xml_files.len();

    for xml_path in &xml_files {
        let name = xml_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| rel_string(&opts.xml_dir, xml_path));

        match convert_file(xml_path, &opts.output_dir, &opts.classes) {
            Ok(ConvertOutcome::Written { .. }) => convert_report.record_converted(),
            Ok(ConvertOutcome::NoMatchingObjects) => {
                eprintln!("Warning: no matching annotations in {name}; no label file written");
                convert_report.record_failure(name, "no matching annotations");
            }
            Err(err) => {
                eprintln!("Warning: failed to convert {name}: {err}");
                convert_report.record_failure(name, err.to_string());
            }
        }
    }

    Ok(convert_report)
}

/// Converts one VOC XML file to a YOLO label file in `output_dir`.
///
/// Objects whose class name is not in `classes` are dropped. If no object
/// survives, no file is written and [`ConvertOutcome::NoMatchingObjects`] is
/// returned.
pub fn convert_file(
    xml_path: &Path,
    output_dir: &Path,
    classes: &ClassNames,
) -> Result<ConvertOutcome, YoloprepError> {
    let annotation = parse_voc_file(xml_path)?;

    let mut rows = Vec::with_capacity(annotation.objects.len());
    for object in &annotation.objects {
        let Some(class_id) = classes.index_of(&object.name) else {
            continue;
        };
        rows.push(YoloRow::from_pixel_bbox(
            class_id,
            &object.bbox,
            f64::from(annotation.width),
            f64::from(annotation.height),
        ));
    }

    if rows.is_empty() {
        return Ok(ConvertOutcome::NoMatchingObjects);
    }

    let xml_name = xml_path
        .file_name()
        .ok_or_else(|| YoloprepError::LayoutInvalid {
            path: xml_path.to_path_buf(),
            message: "annotation path has no file name".to_string(),
        })?;
    let label_path = output_dir.join(Path::new(xml_name).with_extension("txt"));

    fs::write(&label_path, format_rows(&rows)).map_err(YoloprepError::Io)?;

    Ok(ConvertOutcome::Written { rows: rows.len() })
}

fn collect_xml_files(dir: &Path) -> Result<Vec<PathBuf>, YoloprepError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(YoloprepError::Io)? {
        let entry = entry.map_err(YoloprepError::Io)?;
        let path = entry.path();
        if path.is_file() && has_xml_extension(&path) {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| rel_string(dir, path))
    });

    let mut nested_xml = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).min_depth(2) {
        let entry = entry.map_err(|source| YoloprepError::LayoutInvalid {
            path: dir.to_path_buf(),
            message: format!("failed while traversing annotation directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_xml_extension(entry.path()) {
            nested_xml.push(entry.path().to_path_buf());
        }
    }

    if !nested_xml.is_empty() {
        nested_xml.sort_by_cached_key(|path| rel_string(dir, path));
        let sample = rel_string(dir, &nested_xml[0]);
        eprintln!(
            "Warning: converter scans the annotation directory flat (non-recursive); skipping {} nested .xml file(s), e.g. {}",
            nested_xml.len(),
            sample
        );
    }

    Ok(files)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
