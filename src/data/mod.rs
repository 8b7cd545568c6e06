// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw dataset tree and the finished
// split lists:
//
//   <root>/<input>/**  <root>/<target>/**
//       │                     │
//       ▼                     ▼
//   DatasetScanner   → walks both trees, matches files by stem
//       │
//       ▼
//   split_by_sample  → groups pairs by sample name, shuffles
//                      sample names, assigns train/val/test
//       │
//       ▼
//   DatasetSplits    → handed to infra::split_files for writing
//
// normal_map sits beside this flow: it turns 8-bit normal-map
// images into unit-vector arrays before they are matched.

/// Walks input/target directories and matches files by stem
pub mod scanner;

/// Groups pairs by sample name and splits without leakage
pub mod splitter;

/// Decodes RGB normal maps into unit-length float arrays
pub mod normal_map;
