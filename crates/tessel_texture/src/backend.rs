//! Interfaces consumed by texture producers.
//!
//! Producers never talk to a GPU API directly. Everything they need from the
//! outside world comes through three seams, bundled per call in a
//! [`ProducerContext`]:
//!
//! | Seam              | Role                                                    |
//! |-------------------|---------------------------------------------------------|
//! | [`ResourceCache`] | find / insert textures by [`UniqueKey`]                 |
//! | [`TextureCaps`]   | can a texture be sampled as-is with given params?       |
//! | [`CopyExecutor`]  | render-copy a sub-rect, or resample a whole texture     |
//!
//! The producer's contract toward the cache is append-only: it probes, and on
//! a miss it may insert. It never evicts or overwrites entries.

use tessel_core::{
    CapsSettings, FilterMode, IRect, Result, SamplerParams, Texture, TextureRef, UniqueKey,
};

// ─── Resource Cache ──────────────────────────────────────────────────────────

/// Keyed store of shared textures.
pub trait ResourceCache {
    /// Returns the texture registered under `key`, if any.
    fn find(&mut self, key: &UniqueKey) -> Option<TextureRef>;

    /// Registers `texture` under `key` and returns the reference callers
    /// should use from now on.
    fn insert_and_ref(&mut self, key: UniqueKey, texture: TextureRef) -> TextureRef;

    /// Drops the entry for `key`. Used by sources invalidating their own
    /// copies; texture resolution never calls this.
    fn remove(&mut self, key: &UniqueKey) -> Option<TextureRef>;
}

// ─── Capabilities ────────────────────────────────────────────────────────────

/// Backend capability predicate.
pub trait TextureCaps {
    /// Whether `texture` can be bound as-is with `params`.
    fn is_compatible(&self, texture: &Texture, params: &SamplerParams) -> bool;

    /// Dimensions a copy must have so that it satisfies `params`, starting
    /// from the desired `width x height`.
    fn copy_dimensions(&self, width: u32, height: u32, params: &SamplerParams) -> (u32, u32) {
        let _ = params;
        (width, height)
    }

    /// Whether the backend can allocate and sample mip chains.
    fn mipmap_support(&self) -> bool {
        true
    }

    /// [`is_compatible`](Self::is_compatible) plus the mip requirement: a
    /// mip-mapped request needs a mip chain whenever the backend has mipmaps.
    fn can_sample_as_is(&self, texture: &Texture, params: &SamplerParams) -> bool {
        if params.is_mipmapped() && self.mipmap_support() && !texture.has_mips() {
            return false;
        }
        self.is_compatible(texture, params)
    }
}

impl TextureCaps for CapsSettings {
    fn is_compatible(&self, texture: &Texture, params: &SamplerParams) -> bool {
        if texture.width() > self.max_texture_size || texture.height() > self.max_texture_size {
            return false;
        }
        let tiled_or_mipped = params.is_tiled() || params.is_mipmapped();
        if self.requires_pow2(tiled_or_mipped) {
            return texture.width().is_power_of_two() && texture.height().is_power_of_two();
        }
        true
    }

    fn copy_dimensions(&self, width: u32, height: u32, params: &SamplerParams) -> (u32, u32) {
        let tiled_or_mipped = params.is_tiled() || params.is_mipmapped();
        let (w, h) = (width.max(1), height.max(1));
        if self.requires_pow2(tiled_or_mipped) {
            // Largest power of two within the size limit.
            let cap = self.max_texture_size.checked_ilog2().map_or(0, |p| 1u32 << p);
            (w.next_power_of_two().min(cap), h.next_power_of_two().min(cap))
        } else {
            (w.min(self.max_texture_size), h.min(self.max_texture_size))
        }
    }

    fn mipmap_support(&self) -> bool {
        self.mipmap_support
    }
}

// ─── Copy Executor ───────────────────────────────────────────────────────────

/// Destination of a render-copy or resample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopyDesc {
    pub width: u32,
    pub height: u32,
    /// Filter used to stretch source texels into the destination.
    /// `Nearest` for pure crops.
    pub filter: FilterMode,
    /// Allocate and populate a complete mip chain.
    pub mipped: bool,
}

/// GPU work that materializes derived textures.
pub trait CopyExecutor {
    /// Copies `src_rect` of `source` into a fresh `desc.width x desc.height`
    /// texture.
    fn render_copy(&mut self, source: &Texture, src_rect: IRect, desc: &CopyDesc)
    -> Result<TextureRef>;

    /// Stretches all of `original` into a fresh texture.
    fn resample(&mut self, original: &Texture, desc: &CopyDesc) -> Result<TextureRef> {
        let full = IRect::from_wh(original.width(), original.height());
        self.render_copy(original, full, desc)
    }
}

// ─── Context ─────────────────────────────────────────────────────────────────

/// Per-call bundle of the external collaborators.
pub struct ProducerContext<'a> {
    pub cache: &'a mut dyn ResourceCache,
    pub caps: &'a dyn TextureCaps,
    pub executor: &'a mut dyn CopyExecutor,
}

impl<'a> ProducerContext<'a> {
    pub fn new(
        cache: &'a mut dyn ResourceCache,
        caps: &'a dyn TextureCaps,
        executor: &'a mut dyn CopyExecutor,
    ) -> Self {
        Self {
            cache,
            caps,
            executor,
        }
    }
}
