//! Sampling parameters.
//!
//! - [`FilterMode`]: the filter a texture sampler binds (nearest, bilinear, mip-mapped)
//! - [`SampleFilter`]: what a caller asks for, which additionally allows bicubic
//! - [`TileMode`] / [`SamplerParams`]: wrap behaviour plus filter
//! - [`FilterConstraint`]: whether filtering may read outside the constraint rect

use serde::{Deserialize, Serialize};

/// Texture filter bound on a sampler.
///
/// Ordered from cheapest to most demanding so that a requested mode can be
/// clamped to what a texture supports with `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum FilterMode {
    Nearest,
    #[default]
    Bilinear,
    MipMap,
}

impl FilterMode {
    /// Stable tag written into cache keys.
    #[inline]
    #[must_use]
    pub fn key_tag(self) -> u32 {
        match self {
            Self::Nearest => 0,
            Self::Bilinear => 1,
            Self::MipMap => 2,
        }
    }

    /// Filter used when stretching pixels into a copy. Mip levels are never
    /// read while producing level 0 of a copy.
    #[inline]
    #[must_use]
    pub fn resample_filter(self) -> FilterMode {
        match self {
            Self::MipMap => Self::Bilinear,
            other => other,
        }
    }

    #[inline]
    #[must_use]
    pub fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            Self::Nearest => wgpu::FilterMode::Nearest,
            Self::Bilinear | Self::MipMap => wgpu::FilterMode::Linear,
        }
    }
}

/// Filter requested by the shading layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleFilter {
    Nearest,
    #[default]
    Bilinear,
    MipMap,
    /// Bicubic filtering performed in the shader with nearest texel fetches.
    Bicubic,
}

impl SampleFilter {
    /// The `FilterMode` the texture itself must support for this request.
    #[inline]
    #[must_use]
    pub fn texture_filter(self) -> FilterMode {
        match self {
            Self::Nearest | Self::Bicubic => FilterMode::Nearest,
            Self::Bilinear => FilterMode::Bilinear,
            Self::MipMap => FilterMode::MipMap,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_bicubic(self) -> bool {
        matches!(self, Self::Bicubic)
    }
}

impl From<FilterMode> for SampleFilter {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Nearest => Self::Nearest,
            FilterMode::Bilinear => Self::Bilinear,
            FilterMode::MipMap => Self::MipMap,
        }
    }
}

/// Wrap behaviour along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileMode {
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

impl TileMode {
    #[inline]
    #[must_use]
    pub fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            Self::Clamp => wgpu::AddressMode::ClampToEdge,
            Self::Repeat => wgpu::AddressMode::Repeat,
            Self::Mirror => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Sampler state a resolved texture must be usable with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SamplerParams {
    pub tile_x: TileMode,
    pub tile_y: TileMode,
    pub filter: FilterMode,
}

impl SamplerParams {
    #[must_use]
    pub fn new(tile: TileMode, filter: FilterMode) -> Self {
        Self {
            tile_x: tile,
            tile_y: tile,
            filter,
        }
    }

    #[must_use]
    pub fn clamp(filter: FilterMode) -> Self {
        Self::new(TileMode::Clamp, filter)
    }

    /// Returns `true` if either axis wraps.
    #[inline]
    #[must_use]
    pub fn is_tiled(&self) -> bool {
        self.tile_x != TileMode::Clamp || self.tile_y != TileMode::Clamp
    }

    #[inline]
    #[must_use]
    pub fn is_mipmapped(&self) -> bool {
        self.filter == FilterMode::MipMap
    }
}

/// Whether filtering must stay inside the constraint rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterConstraint {
    /// Filter taps must not read texels outside the constraint rect.
    Strict,
    /// Filter taps may cross the constraint rect boundary.
    #[default]
    Fast,
}
