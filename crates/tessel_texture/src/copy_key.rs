//! Cache keys for derived copies.
//!
//! A derived copy is fully described by the content it was made from plus
//! [`CopyParams`] and the destination [`ColorMode`]. The key for it extends
//! the original's key inside a domain reserved for texture-adjustment copies,
//! so no other subsystem deriving keys from the same original can collide.
//!
//! Sources without a stable identity have no original key. Their copies get
//! no key either, which means they are never cached: a volatile source's
//! copy must not be served to a later request after its content changed.

use std::sync::LazyLock;

use tessel_core::{ColorMode, FilterMode, KeyBuilder, KeyDomain, UniqueKey};

static COPY_KEY_DOMAIN: LazyLock<KeyDomain> = LazyLock::new(KeyDomain::generate);

/// Minimal description of a derived copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopyParams {
    pub filter: FilterMode,
    pub width: u32,
    pub height: u32,
}

impl CopyParams {
    #[must_use]
    pub fn new(filter: FilterMode, width: u32, height: u32) -> Self {
        Self {
            filter,
            width,
            height,
        }
    }
}

/// Derives the key of a copy of `original_key` described by `params`.
///
/// Returns `None` exactly when `original_key` is `None`.
#[must_use]
pub fn derive_copy_key(
    original_key: Option<&UniqueKey>,
    params: &CopyParams,
    color_mode: ColorMode,
) -> Option<UniqueKey> {
    let original_key = original_key?;
    Some(
        KeyBuilder::derived(original_key, *COPY_KEY_DOMAIN)
            .push(params.filter.key_tag())
            .push(params.width)
            .push(params.height)
            .push(color_mode.key_tag())
            .finish(),
    )
}
