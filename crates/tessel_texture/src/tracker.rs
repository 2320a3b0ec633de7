//! Bookkeeping of copies a source caused to be cached.

use smallvec::SmallVec;
use tessel_core::UniqueKey;

use crate::backend::ResourceCache;

/// Keys of derived copies cached on behalf of one source.
///
/// Feed it from `did_cache_copy`; call [`CopyKeyTracker::invalidate`] when the
/// source's content changes so stale copies stop being found.
#[derive(Debug, Default, Clone)]
pub struct CopyKeyTracker {
    keys: SmallVec<[UniqueKey; 4]>,
}

impl CopyKeyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers `key`. Recording the same key twice is a no-op.
    pub fn record(&mut self, key: &UniqueKey) {
        if !self.keys.contains(key) {
            self.keys.push(key.clone());
        }
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[UniqueKey] {
        &self.keys
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Removes every recorded copy from `cache` and forgets them.
    ///
    /// Returns how many entries were still present.
    pub fn invalidate(&mut self, cache: &mut dyn ResourceCache) -> usize {
        let removed = self
            .keys
            .drain(..)
            .filter(|key| cache.remove(key).is_some())
            .count();
        log::debug!("Invalidated {removed} cached copies");
        removed
    }
}
