//! Split report types.

use serde::Serialize;
use std::fmt;

/// The result of partitioning a dataset into train/val/test subsets.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct SplitReport {
    /// Images copied into `train/`.
    pub train: usize,
    /// Images copied into `val/`.
    pub val: usize,
    /// Images copied into `test/`.
    pub test: usize,
    /// Images that had no matching label file next to them.
    pub missing_labels: usize,
}

impl SplitReport {
    /// Total number of images partitioned.
    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset split complete: {} image(s)", self.total())?;
        writeln!(f, "  train: {}", self.train)?;
        writeln!(f, "  val: {}", self.val)?;
        writeln!(f, "  test: {}", self.test)?;

        if self.missing_labels > 0 {
            writeln!(f)?;
            writeln!(
                f,
                "Warning: {} image(s) had no matching label file",
                self.missing_labels
            )?;
        }

        Ok(())
    }
}
