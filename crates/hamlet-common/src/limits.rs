//! Centralized limits and thresholds for the converter.
//!
//! Centralizing these values prevents duplicate definitions with
//! inconsistent values and documents the rationale for each limit.

/// Maximum nesting depth of suites/cases the parsers will track.
///
/// Test files are written by humans; anything past this depth is almost
/// certainly malformed input or a pathological generated file, and parsing
/// bails out with a parse error rather than risking unbounded recursion.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum source size accepted by the parsers, in bytes.
///
/// Large inputs are legal but a 16 MiB test file is a sign the caller handed
/// us a bundle or a fixture blob, not a test source file.
pub const MAX_SOURCE_BYTES: usize = 16 * 1024 * 1024;

/// Detection score at or above which a framework is considered a candidate
/// for a file during analysis.
pub const DETECTION_CANDIDATE_THRESHOLD: u8 = 40;

/// Ceiling applied to the confidence score when output was produced by the
/// legacy whole-text rewrite stage. A text-level rewrite can never claim the
/// confidence of an IR-backed conversion.
pub const LEGACY_CONFIDENCE_CEILING: u8 = 50;
