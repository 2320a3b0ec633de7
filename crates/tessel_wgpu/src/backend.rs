//! One-stop wgpu backend: caps, copier and cache owned together.

use tessel_core::CapsSettings;
use tessel_texture::{ProducerContext, TextureCache};

use crate::blit::BlitCopier;
use crate::caps::caps_from_device;

/// Frames between two idle sweeps of the cache.
const PURGE_INTERVAL: u64 = 60;
/// Frames an unreferenced texture may sit idle before it is purged.
const MAX_IDLE_FRAMES: u64 = 600;

pub struct WgpuBackend {
    caps: CapsSettings,
    copier: BlitCopier,
    cache: TextureCache,
}

impl WgpuBackend {
    #[must_use]
    pub fn new(adapter: &wgpu::Adapter, device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::with_caps(caps_from_device(adapter, device), device, queue)
    }

    /// Backend with explicit capability settings, e.g. loaded from a config file.
    #[must_use]
    pub fn with_caps(caps: CapsSettings, device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            caps,
            copier: BlitCopier::new(device, queue),
            cache: TextureCache::new(),
        }
    }

    /// Borrows the three collaborators producers resolve against.
    pub fn context(&mut self) -> ProducerContext<'_> {
        ProducerContext::new(&mut self.cache, &self.caps, &mut self.copier)
    }

    #[inline]
    #[must_use]
    pub fn caps(&self) -> &CapsSettings {
        &self.caps
    }

    #[inline]
    #[must_use]
    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    #[inline]
    pub fn cache_mut(&mut self) -> &mut TextureCache {
        &mut self.cache
    }

    #[inline]
    #[must_use]
    pub fn copier(&self) -> &BlitCopier {
        &self.copier
    }

    /// Advances the cache frame and periodically drops idle textures.
    pub fn end_frame(&mut self) {
        self.cache.begin_frame();
        if self.cache.frame_index().is_multiple_of(PURGE_INTERVAL) {
            self.cache.purge_unused(MAX_IDLE_FRAMES);
        }
    }
}
