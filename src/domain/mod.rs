// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of dataset preparation.
//
// Rules for this layer:
//   - NO file I/O
//   - NO image decoding or array types
//   - Only plain Rust structs, enums, and traits
//
// Think of this layer as the "dictionary" of the system —
// it defines what a pair, a sample and a split ARE, not how
// they are found on disk or written out.

// A matched (input, target) file pair and its sample name
pub mod pair;

// Split names, ratios and the split result
pub mod split;

// Core abstractions (traits) that other layers implement
pub mod traits;
