// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits rather
// than the concrete scanner and split-file writer, so a use
// case can be driven from an in-memory pair list in tests.

use std::path::PathBuf;

use crate::domain::pair::PairRecord;
use crate::domain::split::DatasetSplits;
use crate::error::PrepResult;

// ─── PairSource ───────────────────────────────────────────────────────────────
/// Anything that can produce matched input/target pairs.
///
/// Implementations:
///   - DatasetScanner → walks `<root>/<input>` and `<root>/<target>`
///   - Vec<PairRecord> → a fixed list (tests)
pub trait PairSource {
    /// All matched pairs, sorted by stem.
    fn matched_pairs(&self) -> PrepResult<Vec<PairRecord>>;
}

impl PairSource for Vec<PairRecord> {
    fn matched_pairs(&self) -> PrepResult<Vec<PairRecord>> {
        let mut pairs = self.clone();
        pairs.sort_by(|a, b| a.stem.cmp(&b.stem));
        Ok(pairs)
    }
}

// ─── SplitSink ────────────────────────────────────────────────────────────────
/// Anything that can persist a finished split.
///
/// Implementations:
///   - SplitFileWriter → plain-text train/val/test/vis files
pub trait SplitSink {
    /// Persist the splits and return the paths that were written.
    fn write_splits(&self, splits: &DatasetSplits) -> PrepResult<Vec<PathBuf>>;
}
