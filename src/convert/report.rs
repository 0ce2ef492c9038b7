//! Conversion report types.
//!
//! A batch conversion never aborts on a bad input file; it records the
//! failure here and moves on. The report is what the CLI prints at the end
//! of a run, either as text or as JSON.

use serde::Serialize;
use std::fmt;

/// The result of a batch VOC-to-YOLO conversion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConvertReport {
    /// Number of XML files seen in the input directory.
    pub total: usize,
    /// Number of files successfully converted (an output file was written).
    pub converted: usize,
    /// Files that failed, with the reason for each.
    pub failures: Vec<ConvertFailure>,
}

impl ConvertReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failed files.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn record_converted(&mut self) {
        self.converted += 1;
    }

    pub fn record_failure(&mut self, file: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(ConvertFailure {
            file: file.into(),
            reason: reason.into(),
        });
    }

    /// Returns true if every seen file converted.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conversion summary: {} XML file(s), {} converted, {} failed",
            self.total,
            self.converted,
            self.failed()
        )?;

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failed files ({}):", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "  - {}: {}", failure.file, failure.reason)?;
            }
        }

        Ok(())
    }
}

/// One failed input file and why it failed.
#[derive(Clone, Debug, Serialize)]
pub struct ConvertFailure {
    /// The input file name (not the full path).
    pub file: String,
    pub reason: String,
}
