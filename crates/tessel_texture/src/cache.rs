//! Reference Resource Cache
//!
//! A keyed, frame-aware store of shared textures implementing
//! [`ResourceCache`].
//!
//! # Design
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                  TextureCache                     │
//! │                                                   │
//! │  entries: FxHashMap<UniqueKey, CacheEntry>        │
//! │                                                   │
//! │  find()            probe, marks entry used        │
//! │  insert_and_ref()  register, keys the texture     │
//! │  begin_frame()     advance frame counter          │
//! │  purge_unused(n)   drop unreferenced idle entries │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! Entries are never evicted while a caller still holds their `TextureRef`;
//! the cache only releases textures for which it holds the last reference.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tessel_core::{TextureRef, UniqueKey};

use crate::backend::ResourceCache;

// ─── Internal Types ───────────────────────────────────────────────────────────

struct CacheEntry {
    texture: TextureRef,
    /// Frame of the last `find` or insertion.
    last_used_frame: u64,
}

// ─── Cache Implementation ─────────────────────────────────────────────────────

/// In-memory [`ResourceCache`].
#[derive(Default)]
pub struct TextureCache {
    entries: FxHashMap<UniqueKey, CacheEntry>,
    frame_index: u64,
    insert_count: u64,
}

impl TextureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the frame counter used for idle tracking.
    pub fn begin_frame(&mut self) {
        self.frame_index += 1;
    }

    #[inline]
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of `insert_and_ref` calls since creation.
    #[inline]
    #[must_use]
    pub fn insert_count(&self) -> u64 {
        self.insert_count
    }

    #[must_use]
    pub fn contains(&self, key: &UniqueKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Releases entries idle for more than `max_idle_frames` whose texture is
    /// referenced by nobody but the cache. Returns the number released.
    pub fn purge_unused(&mut self, max_idle_frames: u64) -> usize {
        let before = self.entries.len();
        let frame = self.frame_index;
        self.entries.retain(|_, entry| {
            let idle = frame.saturating_sub(entry.last_used_frame);
            idle <= max_idle_frames || Arc::strong_count(&entry.texture) > 1
        });
        let purged = before - self.entries.len();
        if purged > 0 {
            log::debug!("Purged {purged} idle textures from cache");
        }
        purged
    }
}

impl ResourceCache for TextureCache {
    fn find(&mut self, key: &UniqueKey) -> Option<TextureRef> {
        let entry = self.entries.get_mut(key)?;
        entry.last_used_frame = self.frame_index;
        Some(entry.texture.clone())
    }

    fn insert_and_ref(&mut self, key: UniqueKey, texture: TextureRef) -> TextureRef {
        if !texture.assign_unique_key(key.clone()) {
            log::warn!(
                "Texture {} already carries key {:?}; caching it under {:?} as well",
                texture.id(),
                texture.unique_key(),
                key
            );
        }
        self.insert_count += 1;
        let entry = CacheEntry {
            texture: texture.clone(),
            last_used_frame: self.frame_index,
        };
        if self.entries.insert(key, entry).is_some() {
            log::debug!("Replaced existing cache entry with texture {}", texture.id());
        }
        texture
    }

    fn remove(&mut self, key: &UniqueKey) -> Option<TextureRef> {
        self.entries.remove(key).map(|entry| entry.texture)
    }
}
