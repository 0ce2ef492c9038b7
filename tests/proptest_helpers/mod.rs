#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use yoloprep::annot::{BBoxXYXY, Pixel};

/// Normalizing to six decimals loses at most half a unit in the sixth
/// place, which denormalizes to under a pixel for any sane image size.
pub fn eps_pixels(image_w: u32, image_h: u32) -> f64 {
    image_w.max(image_h) as f64 * 1e-6
}

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Maps four seed values onto an ordered, in-bounds pixel box.
pub fn bbox_from_seed(width: u32, height: u32, sx: u32, sy: u32, sw: u32, sh: u32) -> BBoxXYXY<Pixel> {
    let xmin = sx % (width - 1);
    let ymin = sy % (height - 1);
    let xmax = xmin + 1 + (sw % (width - xmin));
    let ymax = ymin + 1 + (sh % (height - ymin));

    BBoxXYXY::from_xyxy(xmin as f64, ymin as f64, xmax as f64, ymax as f64)
}

pub fn arb_box_in_image() -> BoxedStrategy<(u32, u32, BBoxXYXY<Pixel>)> {
    (
        (2u32..=4096, 2u32..=4096),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(|((width, height), sx, sy, sw, sh)| {
            (width, height, bbox_from_seed(width, height, sx, sy, sw, sh))
        })
        .boxed()
}

pub fn arb_image_file_names(max: usize) -> BoxedStrategy<Vec<String>> {
    proptest::collection::hash_set(
        proptest::string::string_regex("[a-z0-9_]{1,12}\\.jpg").expect("valid filename regex"),
        0..=max,
    )
    .prop_map(|set| set.into_iter().collect())
    .boxed()
}
