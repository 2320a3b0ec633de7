//! The shared texture producer contract.
//!
//! A [`TextureProducer`] is anything the shading layer can sample: either a
//! texture that already exists ([`TextureAdjuster`](crate::TextureAdjuster))
//! or content that must be turned into a texture on demand
//! ([`TextureMaker`](crate::TextureMaker)). Both answer the same question:
//! "give me a sampling stage for these rules", and both may need a derived
//! copy to answer it.

use tessel_core::{AlphaType, ColorMode, ColorSpace, Result, UniqueKey};

use crate::backend::ProducerContext;
use crate::copy_key::CopyParams;
use crate::stage::{SamplingRequest, SamplingStage};

/// Fixed logical properties of a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerInfo {
    pub width: u32,
    pub height: u32,
    pub is_alpha_only: bool,
}

pub trait TextureProducer {
    fn info(&self) -> &ProducerInfo;

    fn alpha_type(&self) -> AlphaType;

    /// Logical content width (the content area's, not the backing texture's).
    fn width(&self) -> u32 {
        self.info().width
    }

    fn height(&self) -> u32 {
        self.info().height
    }

    fn is_alpha_only(&self) -> bool {
        self.info().is_alpha_only
    }

    /// Resolves a texture for `request` and wraps it in a stage whose matrix
    /// composes `request.matrix` with any offset or scale introduced by the
    /// resolution.
    fn create_sampling_stage(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        request: &SamplingRequest,
        dst_color_space: Option<ColorSpace>,
        color_mode: ColorMode,
    ) -> Result<SamplingStage>;

    /// Key for a copy of this producer's content, or `None` if copies must
    /// not be cached.
    fn make_copy_key(&self, params: &CopyParams, color_mode: ColorMode) -> Option<UniqueKey>;

    /// Called after a copy was inserted into the cache under `key`.
    fn did_cache_copy(&mut self, key: &UniqueKey) {
        let _ = key;
    }
}
