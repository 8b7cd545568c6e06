// ============================================================
// Layer 3 — PairRecord Domain Type
// ============================================================
// One training example: an RGB input file and its surface
// normal target, both relative to the dataset root and always
// written with forward slashes.
//
// Several pairs can belong to the same *sample*. A file named
// `3192_010.png` is variant `010` of sample `3192`; all variants
// of a sample must land in the same split, otherwise the model
// is validated on near-copies of its training data.

use serde::{Deserialize, Serialize};

/// A matched input/target pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairRecord {
    /// Input path relative to the input subdirectory, minus its
    /// extension, e.g. `scenes/3192_010`. Unique per pair.
    pub stem: String,

    /// Input path relative to the dataset root, e.g. `input/scenes/3192_010.png`
    pub input: String,

    /// Target path relative to the dataset root, e.g. `target_npy/scenes/3192_010.npy`
    pub target: String,
}

impl PairRecord {
    pub fn new(
        stem:   impl Into<String>,
        input:  impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            stem:   stem.into(),
            input:  input.into(),
            target: target.into(),
        }
    }

    /// The sample this pair is a variant of.
    pub fn sample_id(&self) -> &str {
        sample_id(&self.stem)
    }

    /// Render as one split-file line (without the newline).
    pub fn to_line(&self) -> String {
        format!("{} {}", self.input, self.target)
    }
}

/// Derive the sample name from a stem.
///
/// Only the last path component is considered. Everything
/// before its last underscore is the sample name; a component
/// without an underscore is its own sample.
///
/// ```text
/// "3192_010"        -> "3192"
/// "scenes/3192_005" -> "3192"
/// "a_b_c"           -> "a_b"
/// "4201"            -> "4201"
/// ```
///
/// A real sample name ending in `_<something>` is indistinguishable
/// from a variant suffix; that ambiguity is accepted.
pub fn sample_id(stem: &str) -> &str {
    let basename = stem.rsplit('/').next().unwrap_or(stem);
    match basename.rsplit_once('_') {
        Some((sample, _variant)) => sample,
        None => basename,
    }
}

/// Derive the sample name from a file path with an extension,
/// as found in the first column of a split file.
pub fn sample_id_from_path(path: &str) -> &str {
    let basename = path.rsplit('/').next().unwrap_or(path);
    sample_id(strip_extension(basename))
}

/// Remove the final extension of a file name. Leading dots
/// (hidden files like `.env`) are not treated as extensions.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && !name[..idx].ends_with('/') => &name[..idx],
        _ => name,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_suffix_is_removed() {
        assert_eq!(sample_id("3192_010"), "3192");
        assert_eq!(sample_id("3192_005"), "3192");
        assert_eq!(sample_id("4201"), "4201");
    }

    #[test]
    fn test_only_last_underscore_splits() {
        assert_eq!(sample_id("living_room_03"), "living_room");
    }

    #[test]
    fn test_directories_are_ignored() {
        assert_eq!(sample_id("scenes/indoor/3192_010"), "3192");
        assert_eq!(sample_id("scenes_a/4201"), "4201");
    }

    #[test]
    fn test_sample_id_from_split_file_path() {
        assert_eq!(sample_id_from_path("input/3192_010.png"), "3192");
        assert_eq!(sample_id_from_path("input/sub/4201.jpg"), "4201");
        assert_eq!(sample_id_from_path("input/a.b_2.png"), "a.b");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("a_1.png"), "a_1");
        assert_eq!(strip_extension("x.tar.png"), "x.tar");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("sub/.hidden"), "sub/.hidden");
    }

    #[test]
    fn test_to_line() {
        let p = PairRecord::new("a_1", "input/a_1.png", "target/a_1.npy");
        assert_eq!(p.to_line(), "input/a_1.png target/a_1.npy");
        assert_eq!(p.sample_id(), "a");
    }
}
