use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Liveness of the view that started a request.
///
/// Clones share one flag. Once unmounted, results carrying this guard are
/// dropped instead of committed.
#[derive(Debug, Clone)]
pub struct ViewMount {
    mounted: Arc<AtomicBool>,
}

impl ViewMount {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }
}

impl Default for ViewMount {
    fn default() -> Self {
        Self::new()
    }
}
