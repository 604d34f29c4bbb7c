//! Conversion orchestration: the staged pipeline, error recovery,
//! confidence scoring, the legacy text rewriter, and the directory
//! analyzer.
//!
//! The crates below this one are pure building blocks (`hamlet-ir` data,
//! `hamlet-frameworks` adapters); this crate wires them into the degradation
//! chain a caller actually runs: full-IR emission, IR-guided patching,
//! legacy rewrite, line recovery. Nothing here performs I/O.

pub mod analyzer;
pub mod confidence;
pub mod legacy;
pub mod patcher;
pub mod pipeline;
pub mod recovery;
pub mod shared;

pub use analyzer::{analyze, AnalyzerEntry};
pub use confidence::{score, Classification};
pub use pipeline::{Conversion, ConversionPipeline, FileOutcome};
pub use recovery::{recover_from_parse_error, wrap, LineRecovery, RecoveryError, WrapOutcome};
pub use shared::{reset_shared_pipeline, shared_pipeline};
