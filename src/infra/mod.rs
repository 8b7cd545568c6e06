// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the disk on the way out:
//
//   split_files.rs — train/val/test/vis text files
//                    One `<input> <target>` pair per line.
//                    Also reads them back for verification.
//
//   npy_store.rs   — .npy output for converted normal maps,
//                    mirroring the source tree layout.
//
//   report.rs      — run summaries and leakage reports,
//                    printable as text or JSON.

/// Split file writing and reading
pub mod split_files;

/// NumPy array output
pub mod npy_store;

/// Split summaries and leakage reports
pub mod report;
