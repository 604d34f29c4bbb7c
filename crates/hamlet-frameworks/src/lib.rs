//! Framework adapter contract, registry, and built-in adapters.
//!
//! An adapter is one framework's view of the IR: it parses that framework's
//! source into the IR, emits IR nodes back out in its own idiom, and knows
//! which constructs it has no equivalent for. The pipeline never branches on
//! framework identity; everything framework-specific lives behind
//! [`FrameworkAdapter`] and is resolved by name through the
//! [`FrameworkRegistry`].

pub mod adapters;
pub mod emit;
pub mod matchers;
pub mod parser;
pub mod registry;
pub mod scan;

pub use emit::{EmitTrace, NodeClass, NodeRecord};
pub use registry::{ConfigError, FrameworkRegistry, Route};

use hamlet_ir::{Node, TestFile};
use thiserror::Error;

/// Category of framework; conversion routes never cross categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameworkKind {
    Unit,
    Browser,
}

impl FrameworkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkKind::Unit => "unit",
            FrameworkKind::Browser => "browser",
        }
    }
}

/// Failure to parse source text in a declared framework's grammar.
///
/// Parse errors never abort a conversion; the pipeline routes them into
/// per-line recovery.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("unexpected end of file with {open} unclosed block(s)")]
    UnexpectedEof { open: usize },
    #[error("source exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("nesting deeper than {limit} levels at line {line}")]
    TooDeep { limit: usize, line: usize },
}

/// Result of emitting a single node.
///
/// `NotSupported` is a first-class signal that this framework has no direct
/// equivalent for the node, never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeEmission {
    Emitted {
        code: String,
        /// Set when the emitted code works but behaves subtly differently;
        /// surfaced as an advisory annotation next to the code.
        advisory: Option<String>,
    },
    NotSupported,
}

impl NodeEmission {
    pub fn mapped(code: impl Into<String>) -> Self {
        NodeEmission::Emitted {
            code: code.into(),
            advisory: None,
        }
    }

    pub fn warned(code: impl Into<String>, advisory: impl Into<String>) -> Self {
        NodeEmission::Emitted {
            code: code.into(),
            advisory: Some(advisory.into()),
        }
    }
}

/// Result of whole-file emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmitOutcome {
    Emitted(String),
    /// This adapter does not support whole-file IR emission for this input;
    /// the pipeline must try the next fallback stage.
    NotSupported,
}

/// One entry in an adapter's unconvertible-construct catalog.
///
/// When a node emits as `NotSupported`, the first entry whose detector
/// matches supplies the stable id, message, and manual action for the
/// blocking annotation.
pub struct UnconvertibleEntry {
    pub id: &'static str,
    pub message: &'static str,
    pub manual_action: &'static str,
    pub detector: fn(&Node) -> bool,
}

/// One framework's parse/match/emit capabilities against the IR contract.
///
/// Implementations must be stateless (or internally synchronized): the
/// registry shares adapters across concurrently converting files.
pub trait FrameworkAdapter: Send + Sync {
    /// Registry key, e.g. `"jest"`. Lowercase by convention.
    fn name(&self) -> &'static str;

    fn kind(&self) -> FrameworkKind;

    /// File extensions this framework's tests conventionally use.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Heuristic detection score for raw source, 0-100. Used by the
    /// directory analyzer to propose candidate frameworks.
    fn detect(&self, source: &str) -> u8;

    /// Parse source text in this framework's grammar into the IR.
    fn parse(&self, source: &str) -> Result<TestFile, ParseError>;

    /// Emit a single node in this framework's idiom.
    fn emit_node(&self, node: &Node) -> NodeEmission;

    /// Whether this adapter supports whole-file IR emission. Routes whose
    /// target returns `false` are not pipeline-backed and use the IR-guided
    /// patch stage instead.
    fn ir_emission(&self) -> bool {
        true
    }

    /// Emit a whole file from the IR. The default assembles the file from
    /// per-node emissions; adapters without full-file support return
    /// [`EmitOutcome::NotSupported`].
    fn emit_full_file(&self, file: &TestFile, source: &str) -> EmitOutcome {
        if !self.ir_emission() {
            return EmitOutcome::NotSupported;
        }
        let mut trace = EmitTrace::default();
        EmitOutcome::Emitted(emit::assemble(self, file, source, &mut trace))
    }

    /// Whether `line` is already in this framework's idiom for `node`.
    /// Used for idempotence and round-trip detection.
    fn matches_baseline(&self, line: &str, node: &Node) -> bool {
        match self.emit_node(node) {
            NodeEmission::Emitted { code, .. } => {
                code.lines().any(|emitted| emitted.trim() == line.trim())
            }
            NodeEmission::NotSupported => false,
        }
    }

    /// Block terminator for an emitted suite.
    fn suite_footer(&self) -> &'static str {
        "});"
    }

    /// Block terminator for an emitted case or hook.
    fn case_footer(&self) -> &'static str {
        "});"
    }

    /// Import lines this framework requires in every emitted file, added
    /// when the source file does not already provide them.
    fn required_imports(&self) -> &'static [&'static str] {
        &[]
    }

    fn unconvertible_catalog(&self) -> &'static [UnconvertibleEntry] {
        &[]
    }
}

/// Find the catalog entry describing why `node` is unconvertible for
/// `adapter`, if any detector matches.
pub fn catalog_entry_for<'a>(
    adapter: &'a (impl FrameworkAdapter + ?Sized),
    node: &Node,
) -> Option<&'a UnconvertibleEntry> {
    adapter
        .unconvertible_catalog()
        .iter()
        .find(|entry| (entry.detector)(node))
}
