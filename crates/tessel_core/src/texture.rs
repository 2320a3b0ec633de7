//! Texture handles shared between producers, caches and callers.
//!
//! A [`Texture`] is an immutable description of a GPU allocation plus an
//! optional `wgpu::Texture` backing it. Textures are shared through
//! [`TextureRef`] (`Arc<Texture>`): the resource cache and any number of
//! in-flight callers may hold the same texture at once, and the allocation
//! lives as long as the last reference.
//!
//! Textures without a backing are useful for CPU-side bookkeeping and tests;
//! backends that need to read pixels fetch the backing via
//! [`Texture::gpu_texture`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::key::UniqueKey;
use crate::sampler::FilterMode;

/// Globally unique id of a texture allocation.
pub type ResourceId = u64;

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

#[must_use]
pub fn generate_resource_id() -> ResourceId {
    NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Shared handle to a texture.
pub type TextureRef = Arc<Texture>;

/// Allocation parameters of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub mip_level_count: u32,
}

impl TextureDesc {
    #[must_use]
    pub fn new(width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            width,
            height,
            format,
            mip_level_count: 1,
        }
    }

    /// Single-level `Rgba8Unorm` description.
    #[must_use]
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self::new(width, height, wgpu::TextureFormat::Rgba8Unorm)
    }

    /// Same description with a complete mip chain.
    #[must_use]
    pub fn with_full_mip_chain(mut self) -> Self {
        self.mip_level_count = full_mip_count(self.width, self.height);
        self
    }
}

/// Number of levels in a complete mip chain for `width x height`.
#[inline]
#[must_use]
pub fn full_mip_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// A GPU texture allocation.
#[derive(Debug)]
pub struct Texture {
    id: ResourceId,
    desc: TextureDesc,
    unique_key: OnceLock<UniqueKey>,
    gpu: Option<wgpu::Texture>,
}

impl Texture {
    /// A texture with no GPU backing.
    #[must_use]
    pub fn new(desc: TextureDesc) -> Self {
        Self {
            id: generate_resource_id(),
            desc,
            unique_key: OnceLock::new(),
            gpu: None,
        }
    }

    /// Wraps an allocated `wgpu::Texture`, reading its description from it.
    #[must_use]
    pub fn from_wgpu(texture: wgpu::Texture) -> Self {
        let desc = TextureDesc {
            width: texture.width(),
            height: texture.height(),
            format: texture.format(),
            mip_level_count: texture.mip_level_count(),
        };
        Self {
            id: generate_resource_id(),
            desc,
            unique_key: OnceLock::new(),
            gpu: Some(texture),
        }
    }

    #[inline]
    #[must_use]
    pub fn into_ref(self) -> TextureRef {
        Arc::new(self)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.desc.format
    }

    #[inline]
    #[must_use]
    pub fn mip_level_count(&self) -> u32 {
        self.desc.mip_level_count
    }

    #[inline]
    #[must_use]
    pub fn has_mips(&self) -> bool {
        self.desc.mip_level_count > 1
    }

    #[inline]
    #[must_use]
    pub fn gpu_texture(&self) -> Option<&wgpu::Texture> {
        self.gpu.as_ref()
    }

    /// Key this texture was registered under in a resource cache, if any.
    #[inline]
    #[must_use]
    pub fn unique_key(&self) -> Option<&UniqueKey> {
        self.unique_key.get()
    }

    /// Records the content key of this texture. A texture is keyed at most
    /// once; returns `false` if it already carried a different key.
    pub fn assign_unique_key(&self, key: UniqueKey) -> bool {
        match self.unique_key.get() {
            Some(existing) => *existing == key,
            None => self.unique_key.set(key).is_ok(),
        }
    }

    /// Best filter mode the texture can be sampled with.
    #[must_use]
    pub fn highest_filter_mode(&self) -> FilterMode {
        let filterable = matches!(
            self.desc.format.sample_type(None, None),
            Some(wgpu::TextureSampleType::Float { filterable: true })
        );
        if !filterable {
            FilterMode::Nearest
        } else if self.has_mips() {
            FilterMode::MipMap
        } else {
            FilterMode::Bilinear
        }
    }
}
