//! Backend capability settings.
//!
//! [`CapsSettings`] describes, declaratively, which sampling configurations a
//! GPU backend can serve directly from an arbitrary texture. Backends derive
//! it from their device (see `tessel_wgpu::caps_from_device`); tests and
//! headless tools construct it by hand.
//!
//! ```rust,ignore
//! use tessel_core::settings::CapsSettings;
//!
//! // A GLES2-class device: no NPOT tiling, 4K textures.
//! let caps = CapsSettings {
//!     npot_tile_support: false,
//!     max_texture_size: 4096,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Capability description of a GPU backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsSettings {
    /// Non-power-of-two textures may be sampled with repeat/mirror tiling
    /// and with mip-mapping.
    pub npot_tile_support: bool,
    /// The backend can allocate and sample mip chains.
    pub mipmap_support: bool,
    /// Largest width or height of a 2D texture.
    pub max_texture_size: u32,
}

impl Default for CapsSettings {
    fn default() -> Self {
        Self {
            npot_tile_support: true,
            mipmap_support: true,
            max_texture_size: 8192,
        }
    }
}

impl CapsSettings {
    /// Whether a texture of this size must be power-of-two to honour a
    /// tiled or mip-mapped sampler.
    #[inline]
    #[must_use]
    pub fn requires_pow2(&self, tiled_or_mipped: bool) -> bool {
        tiled_or_mipped && !self.npot_tile_support
    }
}
