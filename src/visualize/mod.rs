//! Annotation rendering.
//!
//! Draws bounding boxes (and class labels, when a font is available) on top
//! of an image and saves the result. Annotations can come from a Pascal VOC
//! `.xml` file or a YOLO `.txt` label file; YOLO rows are denormalized
//! against the image's own dimensions.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::fs;
use std::path::{Path, PathBuf};

use crate::annot::voc::has_xml_extension;
use crate::annot::yolo::has_label_extension;
use crate::annot::{parse_voc_file, read_image_dimensions, read_label_file, ClassNames, Pixel};
use crate::error::YoloprepError;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: i32 = 2;
const LABEL_SCALE: f32 = 16.0;
const LABEL_OFFSET: i32 = 10;

const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A box ready to draw: integer pixel corners plus a display label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledBox {
    pub label: String,
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl LabeledBox {
    /// Builds a drawable box from pixel-space coordinates, truncating any
    /// fractional part (matching how YOLO rows denormalize back to pixels).
    pub fn from_pixel_bbox(label: impl Into<String>, bbox: &crate::annot::BBoxXYXY<Pixel>) -> Self {
        Self {
            label: label.into(),
            xmin: bbox.xmin() as i32,
            ymin: bbox.ymin() as i32,
            xmax: bbox.xmax() as i32,
            ymax: bbox.ymax() as i32,
        }
    }
}

/// Inputs for a rendering run.
#[derive(Clone, Debug)]
pub struct VisualizeOptions {
    pub image: PathBuf,
    /// A `.xml` (Pascal VOC) or `.txt` (YOLO) annotation file.
    pub annotations: PathBuf,
    /// Where to save the rendered image.
    pub output: PathBuf,
    /// Class names for YOLO ids; ids without a name render as `class_<id>`.
    pub names: Option<ClassNames>,
    /// Explicit font file. When unset, a few well-known system fonts are
    /// tried; if none load, boxes are drawn without labels.
    pub font_path: Option<PathBuf>,
}

/// What a rendering run produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSummary {
    /// Number of boxes drawn.
    pub boxes: usize,
    /// Whether labels were drawn (false when no font could be loaded).
    pub labeled: bool,
}

/// Reads annotations from a VOC `.xml` or YOLO `.txt` file as drawable
/// boxes, in document order.
///
/// `image_path` is only consulted for the YOLO case, where the image's
/// dimensions are needed to denormalize coordinates.
pub fn load_annotations(
    annotations_path: &Path,
    image_path: &Path,
    names: Option<&ClassNames>,
) -> Result<Vec<LabeledBox>, YoloprepError> {
    if has_xml_extension(annotations_path) {
        let annotation = parse_voc_file(annotations_path)?;
        return Ok(annotation
            .objects
            .iter()
            .map(|object| LabeledBox::from_pixel_bbox(object.name.clone(), &object.bbox))
            .collect());
    }

    if has_label_extension(annotations_path) {
        let (image_width, image_height) = read_image_dimensions(image_path)?;
        let rows = read_label_file(annotations_path)?;
        return Ok(rows
            .iter()
            .map(|row| {
                let label = match names {
                    Some(names) => names.label_for(row.class_id),
                    None => format!("class_{}", row.class_id),
                };
                let bbox = row.to_pixel_bbox(f64::from(image_width), f64::from(image_height));
                LabeledBox::from_pixel_bbox(label, &bbox)
            })
            .collect());
    }

    let ext = annotations_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_default();
    Err(YoloprepError::UnsupportedAnnotationFormat(ext))
}

/// Renders `opts.annotations` onto `opts.image` and saves the result to
/// `opts.output`.
///
/// Boxes are always drawn; labels only when a font loads. A missing
/// fallback font is a warning, not an error, but an explicit `font_path`
/// that fails to load is an error.
pub fn render(opts: &VisualizeOptions) -> Result<RenderSummary, YoloprepError> {
    let boxes = load_annotations(&opts.annotations, &opts.image, opts.names.as_ref())?;

    let mut canvas = image::open(&opts.image)
        .map_err(|source| YoloprepError::ImageRead {
            path: opts.image.clone(),
            source,
        })?
        .to_rgb8();

    let font = load_font(opts.font_path.as_deref())?;

    for labeled_box in &boxes {
        draw_box(&mut canvas, labeled_box);
        if let Some(font) = &font {
            draw_label(&mut canvas, font, labeled_box);
        }
    }

    if let Some(parent) = opts.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(YoloprepError::Io)?;
        }
    }

    canvas
        .save(&opts.output)
        .map_err(|source| YoloprepError::ImageWrite {
            path: opts.output.clone(),
            source,
        })?;

    Ok(RenderSummary {
        boxes: boxes.len(),
        labeled: font.is_some(),
    })
}

/// Draws a hollow rectangle with both corners inclusive, thickened inward.
fn draw_box(canvas: &mut RgbImage, labeled_box: &LabeledBox) {
    for inset in 0..BOX_THICKNESS {
        let w = labeled_box.xmax - labeled_box.xmin + 1 - 2 * inset;
        let h = labeled_box.ymax - labeled_box.ymin + 1 - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }

        let rect = Rect::at(labeled_box.xmin + inset, labeled_box.ymin + inset)
            .of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, rect, BOX_COLOR);
    }
}

fn draw_label(canvas: &mut RgbImage, font: &FontVec, labeled_box: &LabeledBox) {
    if labeled_box.label.is_empty() {
        return;
    }

    let text_y = (labeled_box.ymin - LABEL_OFFSET - LABEL_SCALE as i32).max(0);
    draw_text_mut(
        canvas,
        BOX_COLOR,
        labeled_box.xmin,
        text_y,
        PxScale::from(LABEL_SCALE),
        font,
        &labeled_box.label,
    );
}

fn load_font(font_path: Option<&Path>) -> Result<Option<FontVec>, YoloprepError> {
    if let Some(path) = font_path {
        let bytes = fs::read(path).map_err(|source| YoloprepError::FontLoad {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|source| YoloprepError::FontLoad {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        return Ok(Some(font));
    }

    for candidate in FALLBACK_FONT_PATHS {
        if let Ok(bytes) = fs::read(candidate) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                return Ok(Some(font));
            }
        }
    }

    eprintln!("Warning: no usable font found; drawing boxes without labels (use --font to set one)");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annot::BBoxXYXY;
    use tempfile::tempdir;

    fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
        let row_stride = (width * 3).div_ceil(4) * 4;
        let pixel_array_size = row_stride * height;
        let file_size = 54 + pixel_array_size;

        let mut bytes = Vec::with_capacity(file_size as usize);
        bytes.extend_from_slice(b"BM");
        bytes.extend_from_slice(&file_size.to_le_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(&54u32.to_le_bytes());

        bytes.extend_from_slice(&40u32.to_le_bytes());
        bytes.extend_from_slice(&(width as i32).to_le_bytes());
        bytes.extend_from_slice(&(height as i32).to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&24u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
        bytes.extend_from_slice(&2835u32.to_le_bytes());
        bytes.extend_from_slice(&2835u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());

        bytes.resize(file_size as usize, 0);
        bytes
    }

    fn write_bmp(path: &Path, width: u32, height: u32) {
        fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
    }

    #[test]
    fn from_pixel_bbox_truncates_fractions() {
        let bbox = BBoxXYXY::<Pixel>::from_xyxy(10.9, 20.1, 30.7, 40.999);
        let labeled_box = LabeledBox::from_pixel_bbox("drone", &bbox);

        assert_eq!(labeled_box.xmin, 10);
        assert_eq!(labeled_box.ymin, 20);
        assert_eq!(labeled_box.xmax, 30);
        assert_eq!(labeled_box.ymax, 40);
        assert_eq!(labeled_box.label, "drone");
    }

    #[test]
    fn load_annotations_reads_voc_in_document_order() {
        let dir = tempdir().unwrap();
        let xml_path = dir.path().join("scene.xml");
        fs::write(
            &xml_path,
            "<annotation>\
               <size><width>100</width><height>100</height></size>\
               <object><name>b</name><bndbox><xmin>10</xmin><ymin>10</ymin><xmax>20</xmax><ymax>20</ymax></bndbox></object>\
               <object><name>a</name><bndbox><xmin>30</xmin><ymin>30</ymin><xmax>40</xmax><ymax>40</ymax></bndbox></object>\
             </annotation>",
        )
        .unwrap();

        let boxes =
            load_annotations(&xml_path, Path::new("ignored.bmp"), None).unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].label, "b");
        assert_eq!(boxes[1].label, "a");
        assert_eq!(boxes[1].xmin, 30);
    }

    #[test]
    fn load_annotations_denormalizes_yolo_rows() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("scene.bmp");
        write_bmp(&image_path, 400, 300);

        let label_path = dir.path().join("scene.txt");
        fs::write(&label_path, "0 0.500000 0.500000 0.500000 0.666667\n").unwrap();

        let names = ClassNames::from_list(["person"]);
        let boxes = load_annotations(&label_path, &image_path, Some(&names)).unwrap();

        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].label, "person");
        assert_eq!(boxes[0].xmin, 100);
        assert_eq!(boxes[0].ymin, 49);
        assert_eq!(boxes[0].xmax, 300);
        assert_eq!(boxes[0].ymax, 250);
    }

    #[test]
    fn load_annotations_falls_back_to_class_id_labels() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("scene.bmp");
        write_bmp(&image_path, 100, 100);

        let label_path = dir.path().join("scene.txt");
        fs::write(&label_path, "3 0.5 0.5 0.2 0.2\n").unwrap();

        let boxes = load_annotations(&label_path, &image_path, None).unwrap();
        assert_eq!(boxes[0].label, "class_3");
    }

    #[test]
    fn load_annotations_rejects_unknown_extensions() {
        let err = load_annotations(Path::new("a.json"), Path::new("a.bmp"), None).unwrap_err();
        assert!(matches!(
            err,
            YoloprepError::UnsupportedAnnotationFormat(ext) if ext == "json"
        ));
    }

    #[test]
    fn draw_box_paints_inclusive_two_pixel_border() {
        let mut canvas = RgbImage::new(16, 12);
        let labeled_box = LabeledBox {
            label: String::new(),
            xmin: 2,
            ymin: 2,
            xmax: 8,
            ymax: 8,
        };
        draw_box(&mut canvas, &labeled_box);

        // Outer border and the 1px inset are green; the interior is not.
        assert_eq!(canvas.get_pixel(2, 2), &Rgb([0, 255, 0]));
        assert_eq!(canvas.get_pixel(3, 3), &Rgb([0, 255, 0]));
        assert_eq!(canvas.get_pixel(8, 5), &Rgb([0, 255, 0]));
        assert_eq!(canvas.get_pixel(5, 5), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(12, 10), &Rgb([0, 0, 0]));
    }

    #[test]
    fn draw_box_clips_out_of_bounds_corners() {
        let mut canvas = RgbImage::new(8, 8);
        let labeled_box = LabeledBox {
            label: String::new(),
            xmin: -3,
            ymin: -3,
            xmax: 20,
            ymax: 5,
        };
        draw_box(&mut canvas, &labeled_box);

        // Only the bottom edge crosses the canvas.
        assert_eq!(canvas.get_pixel(4, 5), &Rgb([0, 255, 0]));
        assert_eq!(canvas.get_pixel(4, 4), &Rgb([0, 255, 0]));
        assert_eq!(canvas.get_pixel(4, 7), &Rgb([0, 0, 0]));
    }

    #[test]
    fn render_saves_annotated_copy() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("scene.bmp");
        write_bmp(&image_path, 16, 12);

        let xml_path = dir.path().join("scene.xml");
        fs::write(
            &xml_path,
            "<annotation>\
               <size><width>16</width><height>12</height></size>\
               <object><name>x</name><bndbox><xmin>2</xmin><ymin>2</ymin><xmax>8</xmax><ymax>8</ymax></bndbox></object>\
             </annotation>",
        )
        .unwrap();

        let output = dir.path().join("out.bmp");
        let opts = VisualizeOptions {
            image: image_path,
            annotations: xml_path,
            output: output.clone(),
            names: None,
            font_path: None,
        };
        let summary = render(&opts).unwrap();
        assert_eq!(summary.boxes, 1);

        // Border pixels are green whether or not a system font was found
        // (labels are drawn in the same color).
        let rendered = image::open(&output).unwrap().to_rgb8();
        assert_eq!(rendered.get_pixel(2, 2), &Rgb([0, 255, 0]));
        assert_eq!(rendered.get_pixel(8, 8), &Rgb([0, 255, 0]));
    }

    #[test]
    fn render_errors_on_bad_explicit_font() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("scene.bmp");
        write_bmp(&image_path, 8, 8);

        let label_path = dir.path().join("scene.txt");
        fs::write(&label_path, "0 0.5 0.5 0.5 0.5\n").unwrap();

        let opts = VisualizeOptions {
            image: image_path,
            annotations: label_path,
            output: dir.path().join("out.bmp"),
            names: None,
            font_path: Some(dir.path().join("missing.ttf")),
        };

        let err = render(&opts).unwrap_err();
        assert!(matches!(err, YoloprepError::FontLoad { .. }));
    }

    #[test]
    fn render_creates_output_parent_dir() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("scene.bmp");
        write_bmp(&image_path, 8, 8);

        let xml_path = dir.path().join("scene.xml");
        fs::write(
            &xml_path,
            "<annotation><size><width>8</width><height>8</height></size></annotation>",
        )
        .unwrap();

        let output = dir.path().join("nested").join("out.bmp");
        let opts = VisualizeOptions {
            image: image_path,
            annotations: xml_path,
            output: output.clone(),
            names: None,
            font_path: None,
        };
        let summary = render(&opts).unwrap();

        assert_eq!(summary.boxes, 0);
        assert!(output.exists());
    }
}
