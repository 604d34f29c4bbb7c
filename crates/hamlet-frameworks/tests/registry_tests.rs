//! Registration validation and route resolution.

use std::sync::Arc;

use hamlet_frameworks::registry::{ConfigError, FrameworkRegistry};
use hamlet_frameworks::{FrameworkAdapter, FrameworkKind, NodeEmission, ParseError};
use hamlet_ir::{Node, TestFile};

struct FakeAdapter {
    name: &'static str,
    extensions: &'static [&'static str],
}

impl FrameworkAdapter for FakeAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Unit
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn detect(&self, _source: &str) -> u8 {
        0
    }

    fn parse(&self, _source: &str) -> Result<TestFile, ParseError> {
        Ok(TestFile::default())
    }

    fn emit_node(&self, _node: &Node) -> NodeEmission {
        NodeEmission::NotSupported
    }
}

#[test]
fn test_builtins_are_all_registered() {
    let registry = FrameworkRegistry::with_builtins();
    for name in ["jest", "vitest", "mocha", "cypress", "playwright"] {
        assert!(registry.get(name).is_some(), "{name} should be registered");
    }
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let mut registry = FrameworkRegistry::with_builtins();
    let err = registry
        .register(Arc::new(FakeAdapter {
            name: "jest",
            extensions: &[".test.js"],
        }))
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateAdapter { .. }));
}

#[test]
fn test_adapter_without_extensions_is_rejected() {
    let mut registry = FrameworkRegistry::new();
    let err = registry
        .register(Arc::new(FakeAdapter {
            name: "bare",
            extensions: &[],
        }))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidAdapter { .. }));
}

#[test]
fn test_adapter_with_invalid_name_is_rejected() {
    let mut registry = FrameworkRegistry::new();
    let err = registry
        .register(Arc::new(FakeAdapter {
            name: "Jasmine",
            extensions: &[".test.js"],
        }))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidAdapter { .. }));
}

#[test]
fn test_resolve_reports_pipeline_backing() {
    let registry = FrameworkRegistry::with_builtins();
    let backed = registry.resolve("jest", "vitest").expect("resolves");
    assert!(backed.pipeline_backed);

    // Mocha emits per-node only, so routes into it are patch-backed.
    let patched = registry.resolve("jest", "mocha").expect("resolves");
    assert!(!patched.pipeline_backed);
}

#[test]
fn test_resolve_rejects_cross_kind_routes() {
    let registry = FrameworkRegistry::with_builtins();
    let err = registry.resolve("jest", "cypress").unwrap_err();
    match err {
        ConfigError::UnsupportedDirection { from, to, .. } => {
            assert_eq!(from, "jest");
            assert_eq!(to, "cypress");
        }
        other => panic!("expected UnsupportedDirection, got {other:?}"),
    }
}

#[test]
fn test_route_debug_names_both_adapters() {
    // `unwrap_err` on a resolve result needs Route: Debug.
    let registry = FrameworkRegistry::with_builtins();
    let route = registry.resolve("jest", "vitest").expect("resolves");
    let rendered = format!("{route:?}");
    assert!(rendered.contains("\"jest\""));
    assert!(rendered.contains("\"vitest\""));
    assert!(rendered.contains("pipeline_backed"));
}

#[test]
fn test_unknown_name_lists_known_frameworks() {
    let registry = FrameworkRegistry::with_builtins();
    let err = registry.resolve("jest", "karma").unwrap_err();
    match err {
        ConfigError::UnknownFramework { name, known } => {
            assert_eq!(name, "karma");
            assert!(known.contains("vitest"));
        }
        other => panic!("expected UnknownFramework, got {other:?}"),
    }
}
