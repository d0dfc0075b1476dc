//! Mounted/cancelled discipline for async work owned by a render context.
//!
//! A [`RenderScope`] is created when a render context mounts and
//! [`unmount`](RenderScope::unmount)ed when it is torn down. Results of
//! awaits that finish after teardown are discarded instead of applied.
//! There is no timeout or retry here; those belong to collaborators.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct RenderScope {
    mounted: Arc<AtomicBool>,
}

impl Default for RenderScope {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderScope {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Mark the owning context as torn down. Every clone observes it.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Await `fut`; return `None` if the scope was unmounted by the time it
    /// resolved.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        let output = fut.await;
        self.is_mounted().then_some(output)
    }
}
