//! Framework-agnostic intermediate representation of a parsed test file.
//!
//! The IR is a tree of immutable, ordered nodes built fresh for each
//! conversion call and discarded after emission. Nodes are pure data: all
//! interpretation lives in the framework adapters, which keeps a `TestSuite`
//! built from one framework emittable by any other framework's adapter
//! without the IR knowing about either.
//!
//! Two invariants matter to every consumer:
//!
//! - Child order is execution order (including hook ordering across nesting
//!   levels) and must survive every emission stage unchanged.
//! - Every node either carries enough information for direct re-emission or
//!   degrades to [`RawCode`]; there is no node without an emission strategy.

pub mod nodes;

pub use nodes::{
    Assertion, AsyncQualifier, Comment, CommentAttachment, Hook, HookKind, ImportStatement,
    Modifier, Navigation, NavigationAction, Node, RawCode, TestCase, TestFile, TestSuite,
};

pub use hamlet_common::span::Span;
