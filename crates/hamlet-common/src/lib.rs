//! Common types and utilities for the hamlet test converter.
//!
//! This crate provides foundational types used across all hamlet crates:
//! - Source spans (`Span`) for provenance tracking
//! - Inline annotation formatting (`annotations`)
//! - The JSON report contracts (`report`)
//! - Centralized limits and thresholds

// Span - source location tracking (byte offsets + line)
pub mod span;
pub use span::Span;

// Stable inline annotation formats (HAMLET-WARNING / HAMLET-TODO)
pub mod annotations;

// Conversion and analysis report contracts
pub mod report;

// Centralized limits and thresholds
pub mod limits;
