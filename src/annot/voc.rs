//! Pascal VOC XML annotation parsing.
//!
//! Reads the conventional schema: `annotation/size/{width,height}` plus one
//! `object/{name,bndbox/{xmin,ymin,xmax,ymax}}` per annotated object. No
//! schema validation is performed beyond the fields actually read.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::{BBoxXYXY, Pixel};
use crate::error::YoloprepError;

const VOC_XML_EXTENSION: &str = "xml";

/// A parsed VOC annotation file.
#[derive(Clone, Debug)]
pub struct VocAnnotation {
    /// The `<filename>` element, when present. Conversion derives output
    /// names from the XML file's stem instead, so this is informational.
    pub filename: Option<String>,
    /// Image width in pixels, from `<size>`.
    pub width: u32,
    /// Image height in pixels, from `<size>`.
    pub height: u32,
    /// Annotated objects in document order.
    pub objects: Vec<VocObject>,
}

/// One `<object>` element: a class name and its pixel-space box.
#[derive(Clone, Debug)]
pub struct VocObject {
    pub name: String,
    pub bbox: BBoxXYXY<Pixel>,
}

/// Parse a VOC XML file from disk.
pub fn parse_voc_file(path: &Path) -> Result<VocAnnotation, YoloprepError> {
    let xml = fs::read_to_string(path).map_err(YoloprepError::Io)?;
    parse_voc_str(&xml, path)
}

/// Parse VOC XML from a UTF-8 string.
///
/// `path` is only used for error context.
pub fn parse_voc_str(xml: &str, path: &Path) -> Result<VocAnnotation, YoloprepError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| YoloprepError::VocXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    let annotation = document.root_element();
    if annotation.tag_name().name() != "annotation" {
        return Err(YoloprepError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <annotation> root element".to_string(),
        });
    }

    let filename = optional_child_text(annotation, "filename");

    let size = required_child_element(annotation, "size", path, "<annotation>")?;
    let width = parse_required_u32(size, "width", path, "<size>")?;
    let height = parse_required_u32(size, "height", path, "<size>")?;

    let mut objects = Vec::new();
    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "<object>")?;
        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;

        let xmin = parse_required_f64(bndbox, "xmin", path, "<bndbox>")?;
        let ymin = parse_required_f64(bndbox, "ymin", path, "<bndbox>")?;
        let xmax = parse_required_f64(bndbox, "xmax", path, "<bndbox>")?;
        let ymax = parse_required_f64(bndbox, "ymax", path, "<bndbox>")?;

        objects.push(VocObject {
            name,
            bbox: BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax),
        });
    }

    Ok(VocAnnotation {
        filename,
        width,
        height,
        objects,
    })
}

/// Parse VOC XML from bytes.
///
/// The input must be valid UTF-8. This entry point exists for fuzzing the
/// parser with arbitrary byte sequences.
pub fn parse_voc_slice(bytes: &[u8]) -> Result<(), YoloprepError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| YoloprepError::VocXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_voc_str(xml, Path::new("<memory>"))?;
    Ok(())
}

pub(crate) fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(VOC_XML_EXTENSION))
        .unwrap_or(false)
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, YoloprepError> {
    child_element(node, tag).ok_or_else(|| YoloprepError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, YoloprepError> {
    optional_child_text(node, tag).ok_or_else(|| YoloprepError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required_u32(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<u32, YoloprepError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<u32>().map_err(|_| YoloprepError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in {context}; expected u32"),
    })
}

fn parse_required_f64(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<f64, YoloprepError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<f64>().map_err(|_| YoloprepError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!(
            "invalid <{tag}> value '{raw}' in {context}; expected floating-point number"
        ),
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
