//! Adapter registry and route resolution.
//!
//! The registry is written once during startup and read-only afterwards, so
//! it can be shared freely across threads converting different files.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::adapters;
use crate::FrameworkAdapter;

/// Caller-misuse errors: the only errors a conversion surfaces as `Err`.
/// Content-level problems (parse failures, unconvertible constructs) are
/// represented in the output and report instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown framework `{name}` (known: {known})")]
    UnknownFramework { name: String, known: String },
    #[error("unsupported direction: `{from}` ({from_kind}) cannot convert to `{to}` ({to_kind})")]
    UnsupportedDirection {
        from: String,
        from_kind: &'static str,
        to: String,
        to_kind: &'static str,
    },
    #[error("adapter `{name}` rejected: {reason}")]
    InvalidAdapter { name: String, reason: String },
    #[error("adapter `{name}` is already registered")]
    DuplicateAdapter { name: String },
}

/// A resolved (from, to) conversion route.
#[derive(Clone)]
pub struct Route {
    pub source: Arc<dyn FrameworkAdapter>,
    pub target: Arc<dyn FrameworkAdapter>,
    /// Whether a full IR-to-IR emission route exists for this pair, versus
    /// only the lower-confidence patch/legacy routes.
    pub pipeline_backed: bool,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("source", &self.source.name())
            .field("target", &self.target.name())
            .field("pipeline_backed", &self.pipeline_backed)
            .finish()
    }
}

/// Name → adapter lookup table.
#[derive(Default)]
pub struct FrameworkRegistry {
    adapters: FxHashMap<&'static str, Arc<dyn FrameworkAdapter>>,
    /// Registration order, for stable iteration in reports.
    order: Vec<&'static str>,
}

impl FrameworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with the shipped adapter catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for adapter in adapters::builtins() {
            // Built-in adapters are validated by their own tests; a failure
            // here is a programming error in the catalog.
            if let Err(err) = registry.register(adapter) {
                unreachable!("built-in adapter failed registration: {err}");
            }
        }
        registry
    }

    /// Register an adapter, validating its capabilities.
    pub fn register(&mut self, adapter: Arc<dyn FrameworkAdapter>) -> Result<(), ConfigError> {
        let name = adapter.name();
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_uppercase()) {
            return Err(ConfigError::InvalidAdapter {
                name: name.to_string(),
                reason: "name must be non-empty lowercase with no whitespace".to_string(),
            });
        }
        if adapter.file_extensions().is_empty() {
            return Err(ConfigError::InvalidAdapter {
                name: name.to_string(),
                reason: "adapter declares no file extensions".to_string(),
            });
        }
        if self.adapters.contains_key(name) {
            return Err(ConfigError::DuplicateAdapter {
                name: name.to_string(),
            });
        }
        tracing::debug!(adapter = name, "registered framework adapter");
        self.adapters.insert(name, adapter);
        self.order.push(name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn FrameworkAdapter>> {
        self.adapters.get(name).cloned()
    }

    /// Registered adapter names in registration order.
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn FrameworkAdapter>> {
        self.order.iter().filter_map(|name| self.adapters.get(name))
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn FrameworkAdapter>, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::UnknownFramework {
            name: name.to_string(),
            known: self.order.join(", "),
        })
    }

    /// Resolve a (from, to) pair to its conversion route.
    pub fn resolve(&self, from: &str, to: &str) -> Result<Route, ConfigError> {
        let source = self.lookup(from)?;
        let target = self.lookup(to)?;
        if source.kind() != target.kind() {
            return Err(ConfigError::UnsupportedDirection {
                from: from.to_string(),
                from_kind: source.kind().as_str(),
                to: to.to_string(),
                to_kind: target.kind().as_str(),
            });
        }
        let pipeline_backed = target.ir_emission();
        Ok(Route {
            source,
            target,
            pipeline_backed,
        })
    }

    /// All supported (from, to) direction strings, `from->to`, in
    /// registration order. Any same-kind pair is supported; the legacy
    /// rewrite stage guarantees a correctness floor even without IR support.
    pub fn supported_directions(&self) -> Vec<String> {
        let mut out = Vec::new();
        for from in self.adapters() {
            for to in self.adapters() {
                if from.name() != to.name() && from.kind() == to.kind() {
                    out.push(format!("{}->{}", from.name(), to.name()));
                }
            }
        }
        out
    }
}
