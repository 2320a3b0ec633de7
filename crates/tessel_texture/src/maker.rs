//! Texture Maker
//!
//! Producer for content that is not a texture yet: encoded images, pictures,
//! procedurally generated pixels. A [`TextureGenerator`] materializes the
//! *original* texture (and owns any caching of it); the maker decides
//! whether that original can be sampled as requested or whether a copy sized
//! to the producer's logical dimensions is needed.
//!
//! Copies are keyed off the generator's original key. A generator that
//! reports no key is volatile and its copies are never cached.

use glam::{Mat3, Vec2};
use tessel_core::{
    AlphaType, ColorMode, ColorSpace, ColorSpaceXform, FilterMode, Result, SampleFilter,
    SamplerParams, TesselError, Texture, TextureRef, UniqueKey,
};

use crate::backend::ProducerContext;
use crate::copy;
use crate::copy_key::{CopyParams, derive_copy_key};
use crate::domain::{DomainMode, determine_domain_mode};
use crate::producer::{ProducerInfo, TextureProducer};
use crate::stage::{SamplingRequest, SamplingStage, stage_for_domain_and_filter};

/// Source of the original texture behind a [`TextureMaker`].
pub trait TextureGenerator {
    /// Produces (or returns a cached) original texture. `None` means the
    /// source is exhausted or invalid.
    fn ref_original_texture(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        will_be_mipped: bool,
        color_mode: ColorMode,
    ) -> Option<TextureRef>;

    /// Color space of the texture produced for `color_mode`.
    fn color_space(&self, color_mode: ColorMode) -> Option<ColorSpace>;

    fn alpha_type(&self) -> AlphaType {
        AlphaType::Premul
    }

    /// Stable identity of the original content, if any.
    fn original_key(&self, color_mode: ColorMode) -> Option<UniqueKey> {
        let _ = color_mode;
        None
    }

    /// Builds the copy described by `params`. The default stretches the
    /// whole original through the executor; generators that can synthesize
    /// the target size directly override this.
    fn generate_copy(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        original: &Texture,
        params: &CopyParams,
        will_be_mipped: bool,
        color_mode: ColorMode,
    ) -> Result<TextureRef> {
        let _ = (will_be_mipped, color_mode);
        copy::resample_original(&mut *ctx.executor, original, params)
    }

    fn did_cache_copy(&mut self, key: &UniqueKey) {
        let _ = key;
    }
}

/// Producer over a [`TextureGenerator`].
pub struct TextureMaker<G> {
    info: ProducerInfo,
    alpha_type: AlphaType,
    generator: G,
}

impl<G: TextureGenerator> TextureMaker<G> {
    #[must_use]
    pub fn new(generator: G, width: u32, height: u32, is_alpha_only: bool) -> Self {
        Self {
            info: ProducerInfo {
                width,
                height,
                is_alpha_only,
            },
            alpha_type: generator.alpha_type(),
            generator,
        }
    }

    #[inline]
    #[must_use]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    #[inline]
    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    #[must_use]
    pub fn into_generator(self) -> G {
        self.generator
    }

    /// Returns a texture of this producer's content that can be sampled with
    /// `params`, plus the color space it was produced in.
    pub fn resolve_for_params(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        params: &SamplerParams,
        color_mode: ColorMode,
    ) -> Result<(TextureRef, Option<ColorSpace>)> {
        let mut params = *params;
        if params.is_mipmapped() && !ctx.caps.mipmap_support() {
            params.filter = FilterMode::Bilinear;
        }
        let will_be_mipped = params.is_mipmapped();
        let color_space = self.generator.color_space(color_mode);

        let Some(original) = self
            .generator
            .ref_original_texture(ctx, will_be_mipped, color_mode)
        else {
            log::warn!(
                "Texture generator produced no original for {}x{} producer",
                self.width(),
                self.height()
            );
            return Err(TesselError::SourceUnavailable);
        };

        if original.width() == self.width()
            && original.height() == self.height()
            && ctx.caps.can_sample_as_is(&original, &params)
        {
            log::trace!("Original texture {} sampled directly", original.id());
            return Ok((original, color_space));
        }

        let (width, height) = ctx.caps.copy_dimensions(self.width(), self.height(), &params);
        let copy_params = CopyParams::new(params.filter, width, height);
        let key = self.make_copy_key(&copy_params, color_mode);
        if let Some(key) = &key
            && let Some(cached) = ctx.cache.find(key)
        {
            log::trace!("Copy cache hit for original texture {}", original.id());
            return Ok((cached, color_space));
        }

        let copy = self.generator.generate_copy(
            ctx,
            &original,
            &copy_params,
            will_be_mipped,
            color_mode,
        )?;

        let copy = match key {
            Some(key) => {
                let copy = ctx.cache.insert_and_ref(key.clone(), copy);
                self.did_cache_copy(&key);
                copy
            }
            None => {
                log::debug!("Volatile original {} resampled without caching", original.id());
                copy
            }
        };
        Ok((copy, color_space))
    }
}

impl<G: TextureGenerator> TextureProducer for TextureMaker<G> {
    fn info(&self) -> &ProducerInfo {
        &self.info
    }

    fn alpha_type(&self) -> AlphaType {
        self.alpha_type
    }

    fn create_sampling_stage(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        request: &SamplingRequest,
        dst_color_space: Option<ColorSpace>,
        color_mode: ColorMode,
    ) -> Result<SamplingStage> {
        request.validate(self.width(), self.height())?;

        let params = SamplerParams::clamp(request.filter.texture_filter());
        let (texture, color_space) = self.resolve_for_params(ctx, &params, color_mode)?;

        let mut texel_matrix = request.matrix;
        let mut constraint = request.constraint_rect;
        let sx = texture.width() as f32 / self.width() as f32;
        let sy = texture.height() as f32 / self.height() as f32;
        if sx != 1.0 || sy != 1.0 {
            texel_matrix = Mat3::from_scale(Vec2::new(sx, sy)) * texel_matrix;
            constraint = constraint.scale(sx, sy);
        }

        let mut domain_mode = determine_domain_mode(
            constraint,
            request.filter_constraint,
            request.coords_limited_to_constraint,
            texture.width(),
            texture.height(),
            None,
            request.filter,
        );
        if domain_mode == DomainMode::TightCopy {
            // The texture is already tight; keep mip sampling and clamp the
            // base level like a bilinear fetch.
            domain_mode = determine_domain_mode(
                constraint,
                request.filter_constraint,
                request.coords_limited_to_constraint,
                texture.width(),
                texture.height(),
                None,
                SampleFilter::Bilinear,
            );
        }

        Ok(stage_for_domain_and_filter(
            texture,
            texel_matrix,
            domain_mode,
            request.filter,
            ColorSpaceXform::make(color_space, dst_color_space),
            self.is_alpha_only(),
        ))
    }

    fn make_copy_key(&self, params: &CopyParams, color_mode: ColorMode) -> Option<UniqueKey> {
        derive_copy_key(
            self.generator.original_key(color_mode).as_ref(),
            params,
            color_mode,
        )
    }

    fn did_cache_copy(&mut self, key: &UniqueKey) {
        self.generator.did_cache_copy(key);
    }
}

impl<G> std::fmt::Debug for TextureMaker<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureMaker")
            .field("info", &self.info)
            .field("alpha_type", &self.alpha_type)
            .finish_non_exhaustive()
    }
}
