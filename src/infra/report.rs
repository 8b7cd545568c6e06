// ============================================================
// Layer 6 — Reports
// ============================================================
// Human-readable (Display) and machine-readable (serde JSON)
// summaries of a run:
//
//   SplitSummary  — what a prepare/normals run produced
//   LeakageReport — what the verifier found in a split dir
//
// Example summary:
//   Unique samples: 120 (train: 108, val: 12, test: 0)
//   Total pairs: 480 (train: 432, val: 48, test: 0)
//   Average variations per sample: 4.00

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::split::{DatasetSplits, SplitName};

/// Sample and pair counts per split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitCounts {
    pub train: usize,
    pub val:   usize,
    pub test:  usize,
}

impl SplitCounts {
    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }
}

/// Outcome of one split run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSummary {
    pub samples:    SplitCounts,
    pub pairs:      SplitCounts,
    pub vis_pairs:  usize,
    pub output_dir: PathBuf,
}

impl SplitSummary {
    pub fn new(splits: &DatasetSplits, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            samples: SplitCounts {
                train: splits.train_samples.len(),
                val:   splits.val_samples.len(),
                test:  splits.test_samples.len(),
            },
            pairs: SplitCounts {
                train: splits.train.len(),
                val:   splits.val.len(),
                test:  splits.test.len(),
            },
            vis_pairs:  splits.vis.len(),
            output_dir: output_dir.into(),
        }
    }

    /// Mean number of variant pairs per sample
    pub fn avg_variations(&self) -> f64 {
        self.pairs.total() as f64 / self.samples.total().max(1) as f64
    }
}

impl fmt::Display for SplitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.samples;
        let p = &self.pairs;
        writeln!(
            f,
            "Unique samples: {} (train: {}, val: {}, test: {})",
            s.total(), s.train, s.val, s.test
        )?;
        writeln!(
            f,
            "Total pairs: {} (train: {}, val: {}, test: {})",
            p.total(), p.train, p.val, p.test
        )?;
        writeln!(f, "Average variations per sample: {:.2}", self.avg_variations())?;
        if self.vis_pairs > 0 {
            writeln!(f, "Visualization subset: {} samples written to vis.txt", self.vis_pairs)?;
        }
        writeln!(f, "Split files written to: {}", self.output_dir.display())?;
        writeln!(f)?;
        write!(
            f,
            "Note: Samples with same name (e.g., '3192_010' and '3192_005') \
             are kept in the same split to prevent data leakage."
        )
    }
}

/// Outcome of a normal-map conversion pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub converted:  usize,
    pub skipped:    usize,
    pub output_dir: PathBuf,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converted {} normal maps to {} ({} skipped)",
            self.converted,
            self.output_dir.display(),
            self.skipped
        )
    }
}

/// Files of one sample found on both sides of an overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapExample {
    pub sample: String,
    pub left:   Vec<String>,
    pub right:  Vec<String>,
}

/// Sample names shared by two splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    pub left:     SplitName,
    pub right:    SplitName,
    /// All shared sample names, sorted
    pub samples:  Vec<String>,
    pub examples: Vec<OverlapExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationStats {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

/// Result of checking a split directory for leakage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeakageReport {
    /// Lines per split file
    pub files:      SplitCounts,
    /// Distinct sample names per split file
    pub unique:     SplitCounts,
    pub overlaps:   Vec<Overlap>,
    /// Only computed for leak-free splits with at least one line
    pub variations: Option<VariationStats>,
}

impl LeakageReport {
    pub fn has_leakage(&self) -> bool {
        !self.overlaps.is_empty()
    }
}

/// Number of shared names listed per overlap
pub const MAX_LISTED_SAMPLES: usize = 10;

impl fmt::Display for LeakageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Train samples: {}", self.files.train)?;
        writeln!(f, "Val samples: {}", self.files.val)?;
        writeln!(f, "Test samples: {}", self.files.test)?;
        writeln!(f)?;
        writeln!(f, "Unique train sample names: {}", self.unique.train)?;
        writeln!(f, "Unique val sample names: {}", self.unique.val)?;
        writeln!(f, "Unique test sample names: {}", self.unique.test)?;
        writeln!(f)?;

        for overlap in &self.overlaps {
            let left  = overlap.left.to_string().to_uppercase();
            let right = overlap.right.to_string().to_uppercase();
            writeln!(
                f,
                "WARNING: Found {} sample names in both {left} and {right}!",
                overlap.samples.len()
            )?;
            let listed: Vec<&String> = overlap.samples.iter().take(MAX_LISTED_SAMPLES).collect();
            writeln!(f, "Examples: {listed:?}")?;
            if !overlap.examples.is_empty() {
                writeln!(f, "Detailed examples:")?;
                for ex in &overlap.examples {
                    writeln!(f, "  Sample '{}':", ex.sample)?;
                    writeln!(f, "    {:<6} {:?}", format!("{}:", overlap.left), ex.left)?;
                    writeln!(f, "    {:<6} {:?}", format!("{}:", overlap.right), ex.right)?;
                }
            }
            writeln!(f)?;
        }

        if self.has_leakage() {
            return write!(f, "Data leakage detected! Please regenerate the splits.");
        }
        write!(f, "No data leakage detected! All sample names are unique to their splits.")?;

        if let Some(v) = &self.variations {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "Variation statistics:")?;
            writeln!(f, "  Min variations per sample: {}", v.min)?;
            writeln!(f, "  Max variations per sample: {}", v.max)?;
            write!(f, "  Avg variations per sample: {:.2}", v.avg)?;
        }
        Ok(())
    }
}
