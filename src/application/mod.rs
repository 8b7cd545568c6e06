// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case runs one command end to end by coordinating
// the data and infra layers.
//
// Rules for this layer:
//   - No clap types (the CLI converts args into configs)
//   - No printing (that's Layer 1)
//   - Only workflow coordination and logging
//
// Reference: Clean Architecture pattern

// Match, split and write split files
pub mod prepare_use_case;

// Convert PNG normal maps to .npy, then split
pub mod normals_use_case;

// Check existing split files for sample leakage
pub mod verify_use_case;
