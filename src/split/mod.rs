//! Seeded train/val/test dataset splitting.
//!
//! Splits a dataset laid out as `<root>/images/` plus `<root>/labels/` into
//! `train/`, `val/` and `test/` subsets, each with its own `images/` and
//! `labels/` subdirectory. Files are copied, never moved; the input dataset
//! is left untouched.
//!
//! The partition is driven by a seeded shuffle of the sorted image file
//! names, so the same inputs, ratios and seed always produce the same split.

mod report;

pub use report::SplitReport;

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::YoloprepError;

/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const SUBSET_NAMES: &[&str] = &["train", "val", "test"];

/// Fractions of the dataset assigned to each subset. Must sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.7,
            val: 0.2,
            test: 0.1,
        }
    }
}

impl SplitRatios {
    /// Validate ratios before running a split.
    pub fn validate(&self) -> Result<(), YoloprepError> {
        for (name, ratio) in [("train", self.train), ("val", self.val), ("test", self.test)] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(YoloprepError::InvalidSplitParams {
                    message: format!(
                        "--{name}-ratio must be in the interval [0.0, 1.0], got {ratio}"
                    ),
                });
            }
        }

        let sum = self.train + self.val + self.test;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(YoloprepError::InvalidSplitParams {
                message: format!("split ratios must sum to 1.0, got {sum}"),
            });
        }

        Ok(())
    }
}

/// Inputs for a dataset split run.
#[derive(Clone, Debug)]
pub struct SplitOptions {
    /// Dataset root; must contain an `images/` directory. A sibling
    /// `labels/` directory is used if present.
    pub dataset_dir: PathBuf,
    /// Root for the `train/`, `val/` and `test/` output trees.
    pub output_dir: PathBuf,
    pub ratios: SplitRatios,
    pub seed: u64,
}

/// A planned partition of image file names into the three subsets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitPlan {
    pub train: Vec<String>,
    pub val: Vec<String>,
    pub test: Vec<String>,
}

/// Partitions `file_names` into train/val/test.
///
/// Names are sorted before shuffling so the result depends only on the set
/// of names, not the order the filesystem returned them in. Subset sizes
/// truncate: train gets `floor(n * train)` names, test gets everything past
/// `floor(n * (1 - test))`, val gets the middle.
pub fn plan_split(mut file_names: Vec<String>, ratios: &SplitRatios, seed: u64) -> SplitPlan {
    file_names.sort();

    let mut rng = StdRng::seed_from_u64(seed);
    file_names.shuffle(&mut rng);

    let n = file_names.len();
    let train_end = (n as f64 * ratios.train) as usize;
    let val_end = (n as f64 * (1.0 - ratios.test)) as usize;

    let test = file_names.split_off(val_end);
    let val = file_names.split_off(train_end);
    let train = file_names;

    SplitPlan { train, val, test }
}

/// Splits the dataset at `opts.dataset_dir` into `opts.output_dir`.
///
/// All six output directories are created up front, even for subsets that
/// end up empty. Images without a matching label file are still copied;
/// only the label copy is skipped and counted in the report.
pub fn split_dataset(opts: &SplitOptions) -> Result<SplitReport, YoloprepError> {
    opts.ratios.validate()?;

    let images_dir = opts.dataset_dir.join("images");
    let labels_dir = opts.dataset_dir.join("labels");

    if !images_dir.is_dir() {
        return Err(YoloprepError::LayoutInvalid {
            path: images_dir,
            message: "expected an images/ directory inside the dataset root".to_string(),
        });
    }

    for subset in SUBSET_NAMES {
        fs::create_dir_all(opts.output_dir.join(subset).join("images"))
            .map_err(YoloprepError::Io)?;
        fs::create_dir_all(opts.output_dir.join(subset).join("labels"))
            .map_err(YoloprepError::Io)?;
    }

    let file_names = collect_image_names(&images_dir)?;
    let plan = plan_split(file_names, &opts.ratios, opts.seed);

    let mut missing_labels = 0;
    for (subset, names) in [
        ("train", &plan.train),
        ("val", &plan.val),
        ("test", &plan.test),
    ] {
        missing_labels += copy_subset(&images_dir, &labels_dir, &opts.output_dir, subset, names)?;
    }

    Ok(SplitReport {
        train: plan.train.len(),
        val: plan.val.len(),
        test: plan.test.len(),
        missing_labels,
    })
}

/// Copies one subset's images and any matching labels. Returns the number
/// of images with no label file.
fn copy_subset(
    images_dir: &Path,
    labels_dir: &Path,
    output_dir: &Path,
    subset: &str,
    names: &[String],
) -> Result<usize, YoloprepError> {
    let out_images = output_dir.join(subset).join("images");
    let out_labels = output_dir.join(subset).join("labels");

    let mut missing = 0;
    for name in names {
        fs::copy(images_dir.join(name), out_images.join(name)).map_err(YoloprepError::Io)?;

        let label_name = Path::new(name).with_extension("txt");
        let label_src = labels_dir.join(&label_name);
        if label_src.is_file() {
            fs::copy(&label_src, out_labels.join(&label_name)).map_err(YoloprepError::Io)?;
        } else {
            missing += 1;
        }
    }

    Ok(missing)
}

fn collect_image_names(images_dir: &Path) -> Result<Vec<String>, YoloprepError> {
    let mut names = Vec::new();

    for entry in fs::read_dir(images_dir).map_err(YoloprepError::Io)? {
        let entry = entry.map_err(YoloprepError::Io)?;
        let path = entry.path();
        if path.is_file() && has_image_extension(&path) {
            if let Some(name) = path.file_name() {
                names.push(name.to_string_lossy().to_string());
            }
        }
    }

    Ok(names)
}

fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}
