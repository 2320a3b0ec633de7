//! Alpha and color-space tags carried through texture resolution.
//!
//! Tessel does no color management itself. Color spaces are opaque tags; the
//! only operation is deciding whether a conversion between two of them is
//! needed at sampling time.

use serde::{Deserialize, Serialize};

/// How the alpha channel of a texture should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlphaType {
    Opaque,
    #[default]
    Premul,
    Unpremul,
}

/// Color processing mode of the destination surface.
///
/// Textures produced for a gamma-correct destination may differ from those
/// produced for legacy destinations, so the mode participates in copy keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorMode {
    #[default]
    Legacy,
    GammaCorrect,
}

impl ColorMode {
    /// Stable tag written into cache keys.
    #[inline]
    #[must_use]
    pub fn key_tag(self) -> u32 {
        match self {
            Self::Legacy => 0,
            Self::GammaCorrect => 1,
        }
    }
}

/// Opaque color-space tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    Srgb,
    SrgbLinear,
    DisplayP3,
    Rec2020,
}

/// A pending conversion from a texture's color space to the destination's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorSpaceXform {
    pub src: ColorSpace,
    pub dst: ColorSpace,
}

impl ColorSpaceXform {
    /// Returns `None` when either side is untagged or both sides match.
    #[must_use]
    pub fn make(src: Option<ColorSpace>, dst: Option<ColorSpace>) -> Option<Self> {
        match (src, dst) {
            (Some(src), Some(dst)) if src != dst => Some(Self { src, dst }),
            _ => None,
        }
    }
}
