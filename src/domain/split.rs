// ============================================================
// Layer 3 — Split Domain Types
// ============================================================
// SplitName    — which subset a pair belongs to
// SplitRatios  — validated val/test fractions
// DatasetSplits — the result of one split run

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::pair::PairRecord;
use crate::error::{PrepError, PrepResult};

/// The three disjoint subsets, plus nothing else: the
/// visualization subset is drawn *from* val, it is not a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitName {
    Train,
    Val,
    Test,
}

impl SplitName {
    pub const ALL: [SplitName; 3] = [SplitName::Train, SplitName::Val, SplitName::Test];

    /// File name of this split inside the split directory
    pub fn file_name(self) -> &'static str {
        match self {
            SplitName::Train => "train.txt",
            SplitName::Val   => "val.txt",
            SplitName::Test  => "test.txt",
        }
    }
}

impl fmt::Display for SplitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SplitName::Train => "train",
            SplitName::Val   => "val",
            SplitName::Test  => "test",
        };
        f.write_str(s)
    }
}

/// Validation and test fractions of the *sample* count.
///
/// Construction enforces `val >= 0`, `test >= 0` and
/// `val + test < 1`, so a `SplitRatios` value is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    val:  f64,
    test: f64,
}

impl SplitRatios {
    pub fn new(val: f64, test: f64) -> PrepResult<Self> {
        // Written so NaN fails every comparison and is rejected
        let valid = val >= 0.0 && test >= 0.0 && (val + test) < 1.0;
        if !valid {
            return Err(PrepError::Configuration { val, test });
        }
        Ok(Self { val, test })
    }

    pub fn val(&self) -> f64 {
        self.val
    }

    pub fn test(&self) -> f64 {
        self.test
    }

    /// `(n_test, n_val)` for `n` samples, truncating toward zero.
    pub fn counts(&self, n: usize) -> (usize, usize) {
        let n_test = (n as f64 * self.test) as usize;
        let n_val  = (n as f64 * self.val) as usize;
        (n_test, n_val)
    }
}

/// Output of the grouper/splitter.
///
/// `*_samples` hold the sample names assigned to each split in
/// shuffled order; the pair lists follow that order, with each
/// sample's variants in sorted stem order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSplits {
    pub train: Vec<PairRecord>,
    pub val:   Vec<PairRecord>,
    pub test:  Vec<PairRecord>,
    pub vis:   Vec<PairRecord>,

    pub train_samples: Vec<String>,
    pub val_samples:   Vec<String>,
    pub test_samples:  Vec<String>,
}

impl DatasetSplits {
    pub fn pairs(&self, split: SplitName) -> &[PairRecord] {
        match split {
            SplitName::Train => &self.train,
            SplitName::Val   => &self.val,
            SplitName::Test  => &self.test,
        }
    }

    pub fn total_pairs(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    pub fn total_samples(&self) -> usize {
        self.train_samples.len() + self.val_samples.len() + self.test_samples.len()
    }
}
