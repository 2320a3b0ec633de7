//! Unique resource keys.
//!
//! A [`UniqueKey`] identifies *content* rather than a particular allocation:
//! two textures holding the same logical pixels may be found under the same
//! key. Keys are built from a [`KeyDomain`] plus a sequence of `u32` words.
//!
//! # Design
//!
//! 1. **Domains** are handed out from a process-wide counter, so two
//!    subsystems that happen to write the same words can never collide.
//! 2. **Derived keys** embed the base key's domain, word count and words
//!    before their own fields (see [`KeyBuilder::derived`]). A derived key is
//!    therefore unambiguous with respect to both its base and its fields.
//! 3. **Hashing** is precomputed once with xxh3; equality always compares
//!    the full domain and word list, never only the hash.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use smallvec::SmallVec;
use xxhash_rust::xxh3::xxh3_64;

use crate::geometry::IRect;

static NEXT_KEY_DOMAIN: AtomicU32 = AtomicU32::new(1);

/// Namespace of a family of keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyDomain(u32);

impl KeyDomain {
    /// Allocates a fresh domain, distinct from every other domain in the process.
    #[must_use]
    pub fn generate() -> Self {
        Self(NEXT_KEY_DOMAIN.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Content identity of a cached resource.
#[derive(Clone)]
pub struct UniqueKey {
    domain: KeyDomain,
    data: SmallVec<[u32; 12]>,
    hash: u64,
}

impl UniqueKey {
    #[inline]
    #[must_use]
    pub fn domain(&self) -> KeyDomain {
        self.domain
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Precomputed 64-bit hash of domain and data.
    #[inline]
    #[must_use]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for UniqueKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.domain == other.domain && self.data == other.data
    }
}

impl Eq for UniqueKey {}

impl Hash for UniqueKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl std::fmt::Debug for UniqueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniqueKey")
            .field("domain", &self.domain.0)
            .field("data", &self.data.as_slice())
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish()
    }
}

/// Incrementally assembles a [`UniqueKey`].
pub struct KeyBuilder {
    domain: KeyDomain,
    data: SmallVec<[u32; 12]>,
}

impl KeyBuilder {
    #[must_use]
    pub fn new(domain: KeyDomain) -> Self {
        Self {
            domain,
            data: SmallVec::new(),
        }
    }

    /// Starts a key in `domain` that extends `base`.
    #[must_use]
    pub fn derived(base: &UniqueKey, domain: KeyDomain) -> Self {
        let mut data = SmallVec::with_capacity(base.data.len() + 6);
        data.push(base.domain.0);
        data.push(base.data.len() as u32);
        data.extend_from_slice(&base.data);
        Self { domain, data }
    }

    #[must_use]
    pub fn push(mut self, word: u32) -> Self {
        self.data.push(word);
        self
    }

    #[must_use]
    pub fn finish(self) -> UniqueKey {
        let mut words: SmallVec<[u32; 16]> = SmallVec::with_capacity(self.data.len() + 1);
        words.push(self.domain.0);
        words.extend_from_slice(&self.data);
        let hash = xxh3_64(bytemuck::cast_slice(words.as_slice()));
        UniqueKey {
            domain: self.domain,
            data: self.data,
            hash,
        }
    }
}

static IMAGE_ID_DOMAIN: LazyLock<KeyDomain> = LazyLock::new(KeyDomain::generate);

/// Base key for content identified by a logical image id and its bounds.
#[must_use]
pub fn make_key_from_image_id(image_id: u32, bounds: IRect) -> UniqueKey {
    KeyBuilder::new(*IMAGE_ID_DOMAIN)
        .push(image_id)
        .push(bounds.left as u32)
        .push(bounds.top as u32)
        .push(bounds.width())
        .push(bounds.height())
        .finish()
}

static NEXT_IMAGE_ID: AtomicU32 = AtomicU32::new(1);

/// Allocates a logical image id for a new content source.
#[must_use]
pub fn next_image_id() -> u32 {
    NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domains_are_unique() {
        let a = KeyDomain::generate();
        let b = KeyDomain::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn same_words_in_different_domains_differ() {
        let a = KeyBuilder::new(KeyDomain::generate()).push(7).finish();
        let b = KeyBuilder::new(KeyDomain::generate()).push(7).finish();
        assert_ne!(a, b);
    }

    #[test]
    fn derived_key_is_not_confused_with_longer_base() {
        let domain = KeyDomain::generate();
        let derived_domain = KeyDomain::generate();
        let short = KeyBuilder::new(domain).push(1).finish();
        let long = KeyBuilder::new(domain).push(1).push(2).finish();

        let from_short = KeyBuilder::derived(&short, derived_domain).push(2).push(3).finish();
        let from_long = KeyBuilder::derived(&long, derived_domain).push(3).finish();
        assert_ne!(from_short, from_long);
    }

    #[test]
    fn image_id_key_is_deterministic() {
        let a = make_key_from_image_id(42, IRect::from_wh(64, 32));
        let b = make_key_from_image_id(42, IRect::from_wh(64, 32));
        assert_eq!(a, b);
        assert_eq!(a.hash_value(), b.hash_value());
        assert_ne!(a, make_key_from_image_id(43, IRect::from_wh(64, 32)));
        assert_ne!(a, make_key_from_image_id(42, IRect::from_xywh(1, 0, 64, 32)));
    }
}
