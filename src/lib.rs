//! Yoloprep: dataset preparation for YOLO object detection.
//!
//! Yoloprep covers the three chores that precede every training run:
//! converting Pascal VOC XML annotations to YOLO label files, splitting a
//! dataset into train/val/test subsets, and drawing annotations back onto
//! images to spot-check them.
//!
//! # Modules
//!
//! - [`annot`]: annotation primitives (bounding boxes, VOC/YOLO parsing, class names)
//! - [`convert`]: batch VOC-to-YOLO conversion
//! - [`split`]: seeded train/val/test splitting
//! - [`visualize`]: annotation rendering
//! - [`error`]: error types for yoloprep operations

pub mod annot;
pub mod convert;
pub mod error;
pub mod split;
pub mod visualize;

use std::fmt;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use error::YoloprepError;

use annot::ClassNames;
use convert::{convert_dir, ConvertOptions};
use split::{split_dataset, SplitOptions, SplitRatios, DEFAULT_SEED};
use visualize::{render, VisualizeOptions};

/// The yoloprep CLI application.
#[derive(Parser)]
#[command(name = "yoloprep")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert Pascal VOC XML annotations to YOLO label files.
    Convert(ConvertArgs),
    /// Split an images/ + labels/ dataset into train/val/test subsets.
    Split(SplitArgs),
    /// Draw annotations on an image and save the result.
    Visualize(VisualizeArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Directory containing VOC .xml annotation files.
    input: PathBuf,

    /// Directory to write .txt label files into (created if missing).
    #[arg(short, long)]
    output: PathBuf,

    /// Ordered, comma-separated class list; ids follow list positions.
    #[arg(long, value_delimiter = ',')]
    classes: Vec<String>,

    /// Class list file (classes.txt with one name per line, or a data.yaml).
    #[arg(long)]
    names: Option<PathBuf>,

    /// Report format ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
struct SplitArgs {
    /// Dataset root containing an images/ directory (labels/ is optional).
    input: PathBuf,

    /// Root for the train/, val/ and test/ output trees.
    #[arg(short, long)]
    output: PathBuf,

    /// Fraction of images for the training subset.
    #[arg(long, default_value_t = 0.7, value_parser = validate_ratio)]
    train_ratio: f64,

    /// Fraction of images for the validation subset.
    #[arg(long, default_value_t = 0.2, value_parser = validate_ratio)]
    val_ratio: f64,

    /// Fraction of images for the test subset.
    #[arg(long, default_value_t = 0.1, value_parser = validate_ratio)]
    test_ratio: f64,

    /// Seed for the shuffle.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Report format ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the visualize subcommand.
#[derive(clap::Args)]
struct VisualizeArgs {
    /// Image to draw on.
    image: PathBuf,

    /// Annotation file (.xml for Pascal VOC, .txt for YOLO).
    #[arg(short, long)]
    annotations: PathBuf,

    /// Where to save the rendered image.
    #[arg(short, long)]
    output: PathBuf,

    /// Class names file for YOLO ids (classes.txt or data.yaml).
    #[arg(long)]
    names: Option<PathBuf>,

    /// Font file for box labels (TTF/OTF).
    #[arg(long)]
    font: Option<PathBuf>,
}

// Validate that a ratio is between 0.0 and 1.0
fn validate_ratio(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("RATIO must be between 0.0 and 1.0".to_string()),
    }
}

/// Run the yoloprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), YoloprepError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Split(args)) => run_split(args),
        Some(Commands::Visualize(args)) => run_visualize(args),
        None => {
            println!("yoloprep {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Dataset preparation for YOLO object detection.");
            println!();
            println!("Run 'yoloprep --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), YoloprepError> {
    let classes = load_classes(&args.classes, args.names.as_deref())?;

    let opts = ConvertOptions {
        xml_dir: args.input,
        output_dir: args.output,
        classes,
    };
    let report = convert_dir(&opts)?;

    print_report(&report, &args.report)
}

/// Execute the split subcommand.
fn run_split(args: SplitArgs) -> Result<(), YoloprepError> {
    let opts = SplitOptions {
        dataset_dir: args.input,
        output_dir: args.output,
        ratios: SplitRatios {
            train: args.train_ratio,
            val: args.val_ratio,
            test: args.test_ratio,
        },
        seed: args.seed,
    };
    let report = split_dataset(&opts)?;

    print_report(&report, &args.report)
}

/// Execute the visualize subcommand.
fn run_visualize(args: VisualizeArgs) -> Result<(), YoloprepError> {
    let names = match args.names.as_deref() {
        Some(path) => Some(ClassNames::from_file(path)?),
        None => None,
    };

    let opts = VisualizeOptions {
        image: args.image,
        annotations: args.annotations,
        output: args.output.clone(),
        names,
        font_path: args.font,
    };
    let summary = render(&opts)?;

    println!(
        "Rendered {} box(es) to {}{}",
        summary.boxes,
        args.output.display(),
        if summary.labeled { "" } else { " (no labels)" }
    );
    Ok(())
}

/// Resolve the class list from either an inline list or a names file.
fn load_classes(list: &[String], names_file: Option<&Path>) -> Result<ClassNames, YoloprepError> {
    match (list.is_empty(), names_file) {
        (false, Some(_)) => Err(YoloprepError::InvalidClassSpec {
            message: "--classes and --names are mutually exclusive".to_string(),
        }),
        (true, None) => Err(YoloprepError::InvalidClassSpec {
            message: "set exactly one of --classes or --names".to_string(),
        }),
        (false, None) => Ok(ClassNames::from_list(list)),
        (true, Some(path)) => ClassNames::from_file(path),
    }
}

fn print_report<R>(report: &R, format: &str) -> Result<(), YoloprepError>
where
    R: fmt::Display + Serialize,
{
    match format {
        "json" => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|source| YoloprepError::ReportJsonWrite { source })?;
            println!("{json}");
        }
        _ => {
            // Default text output
            print!("{report}");
        }
    }

    Ok(())
}
