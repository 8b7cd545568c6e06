// ============================================================
// Error Taxonomy
// ============================================================
// Typed errors for the dataset pipeline. The data and infra
// layers return these; the application and CLI layers wrap
// them in anyhow with extra context.
//
//   Configuration    — invalid split ratios (fatal)
//   EmptyInput       — no matched input/target pairs (fatal)
//   MissingDirectory — required subdirectory absent (fatal)
//   Conversion       — one normal map failed to convert
//                      (skipped with a warning, never fatal)
//   Leakage          — verifier found shared sample names
//
// Reference: thiserror crate documentation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    /// Ratios outside [0, 1) or summing to 1 or more.
    #[error("invalid split ratios (val={val}, test={test}): both must be >= 0 and sum to < 1.0")]
    Configuration { val: f64, test: f64 },

    #[error("no matching pairs found between input and target")]
    EmptyInput,

    #[error("{role} directory does not exist: {}", path.display())]
    MissingDirectory { role: &'static str, path: PathBuf },

    #[error("failed to convert '{}': {message}", path.display())]
    Conversion { path: PathBuf, message: String },

    #[error("data leakage detected: {overlaps} split pair(s) share sample names")]
    Leakage { overlaps: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type PrepResult<T> = Result<T, PrepError>;
