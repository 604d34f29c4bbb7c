//! Process-wide cached pipeline.
//!
//! Building the registry is cheap but not free, and callers converting many
//! files want one pipeline instance. Initialization is idempotent under
//! concurrent first access; `reset_shared_pipeline` exists for test
//! isolation only.

use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::pipeline::ConversionPipeline;

static SHARED: Lazy<RwLock<Option<Arc<ConversionPipeline>>>> = Lazy::new(|| RwLock::new(None));

/// The shared pipeline with the built-in adapter catalog, created on first
/// use.
pub fn shared_pipeline() -> Arc<ConversionPipeline> {
    {
        let guard = SHARED.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(pipeline) = guard.as_ref() {
            return Arc::clone(pipeline);
        }
    }
    let mut guard = SHARED.write().unwrap_or_else(PoisonError::into_inner);
    // A concurrent initializer may have won the race between guards.
    if let Some(pipeline) = guard.as_ref() {
        return Arc::clone(pipeline);
    }
    let pipeline = Arc::new(ConversionPipeline::with_builtins());
    *guard = Some(Arc::clone(&pipeline));
    pipeline
}

/// Drop the cached instance so the next access rebuilds it.
pub fn reset_shared_pipeline() {
    let mut guard = SHARED.write().unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test so parallel test threads cannot interleave resets.
    #[test]
    fn test_shared_pipeline_caches_and_resets() {
        let a = shared_pipeline();
        let b = shared_pipeline();
        assert!(Arc::ptr_eq(&a, &b));

        reset_shared_pipeline();
        let c = shared_pipeline();
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
