//! Texture Adjuster
//!
//! Producer for content that already lives in a texture, possibly only in a
//! sub-rectangle of it (an atlas entry, a subset of a larger image).
//!
//! # Resolution
//!
//! | Situation                                      | Result                          |
//! |------------------------------------------------|---------------------------------|
//! | texture usable as-is, no subset restriction    | original + content-area origin  |
//! | mip-mapped or tiled sampling of a subset       | tight copy of the content area  |
//! | backend cannot sample the texture with params  | tight copy (possibly stretched) |
//!
//! Copies are keyed by the source's logical image id and the content area,
//! so repeated requests find the same copy in the resource cache. Sources
//! without an id are volatile: every copy is fresh and never cached.

use std::sync::Arc;

use glam::{IVec2, Mat3, Vec2};
use tessel_core::{
    AlphaType, ColorMode, ColorSpace, ColorSpaceXform, FilterMode, IRect, Result, SampleFilter,
    SamplerParams, TextureRef, UniqueKey, make_key_from_image_id,
};

use crate::backend::{ProducerContext, ResourceCache};
use crate::copy;
use crate::copy_key::{CopyParams, derive_copy_key};
use crate::domain::{DomainMode, determine_domain_mode};
use crate::producer::{ProducerInfo, TextureProducer};
use crate::stage::{SamplingRequest, SamplingStage, stage_for_domain_and_filter};
use crate::tracker::CopyKeyTracker;

/// Producer over an existing texture.
#[derive(Debug)]
pub struct TextureAdjuster {
    info: ProducerInfo,
    original: TextureRef,
    /// Only set when strictly smaller than the texture.
    content_area: Option<IRect>,
    alpha_type: AlphaType,
    color_space: Option<ColorSpace>,
    /// Logical image id; `None` for volatile sources.
    unique_id: Option<u32>,
    copies: CopyKeyTracker,
}

impl TextureAdjuster {
    /// Adjuster over all of `original`, identified by `unique_id`.
    #[must_use]
    pub fn new(original: TextureRef, alpha_type: AlphaType, unique_id: Option<u32>) -> Self {
        Self {
            info: ProducerInfo {
                width: original.width(),
                height: original.height(),
                is_alpha_only: false,
            },
            original,
            content_area: None,
            alpha_type,
            color_space: None,
            unique_id,
            copies: CopyKeyTracker::new(),
        }
    }

    /// Restricts the content to `area`, clipped to the texture bounds.
    #[must_use]
    pub fn with_content_area(mut self, area: IRect) -> Self {
        let bounds = IRect::from_wh(self.original.width(), self.original.height());
        let clipped = IRect::from_ltrb(
            area.left.max(0),
            area.top.max(0),
            area.right.min(bounds.right),
            area.bottom.min(bounds.bottom),
        );
        debug_assert!(!clipped.is_empty(), "content area {area:?} misses the texture");
        self.content_area = (clipped != bounds).then_some(clipped);
        self.info.width = clipped.width();
        self.info.height = clipped.height();
        self
    }

    #[must_use]
    pub fn with_color_space(mut self, color_space: Option<ColorSpace>) -> Self {
        self.color_space = color_space;
        self
    }

    #[must_use]
    pub fn with_alpha_only(mut self, alpha_only: bool) -> Self {
        self.info.is_alpha_only = alpha_only;
        self
    }

    #[inline]
    #[must_use]
    pub fn original(&self) -> &TextureRef {
        &self.original
    }

    #[inline]
    #[must_use]
    pub fn content_area(&self) -> Option<IRect> {
        self.content_area
    }

    #[inline]
    #[must_use]
    pub fn color_space(&self) -> Option<ColorSpace> {
        self.color_space
    }

    /// Keys of copies this adjuster has put into the cache.
    #[inline]
    #[must_use]
    pub fn cached_copies(&self) -> &CopyKeyTracker {
        &self.copies
    }

    /// Drops every cached copy made from this adjuster's content.
    pub fn invalidate_copies(&mut self, cache: &mut dyn ResourceCache) -> usize {
        self.copies.invalidate(cache)
    }

    fn content_offset(&self) -> IVec2 {
        self.content_area.map_or(IVec2::ZERO, |area| area.origin())
    }

    fn original_key(&self) -> Option<UniqueKey> {
        let bounds = self
            .content_area
            .unwrap_or_else(|| IRect::from_wh(self.original.width(), self.original.height()));
        self.unique_id.map(|id| make_key_from_image_id(id, bounds))
    }

    /// Returns a texture that can be sampled with `params`, plus the offset
    /// of the content inside it.
    ///
    /// The offset is the content-area origin when the original is returned
    /// and zero for a copy.
    pub fn resolve_safe_texture(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        params: &SamplerParams,
        color_mode: ColorMode,
    ) -> Result<(TextureRef, IVec2)> {
        let mut params = *params;
        if params.is_mipmapped() && !ctx.caps.mipmap_support() {
            params.filter = FilterMode::Bilinear;
        }

        let subset_needs_copy =
            self.content_area.is_some() && (params.is_tiled() || params.is_mipmapped());
        if !subset_needs_copy && ctx.caps.can_sample_as_is(&self.original, &params) {
            log::trace!(
                "Texture {} sampled directly at offset {}",
                self.original.id(),
                self.content_offset()
            );
            return Ok((self.original.clone(), self.content_offset()));
        }

        let (width, height) = ctx.caps.copy_dimensions(self.width(), self.height(), &params);
        let copy_params = CopyParams::new(params.filter, width, height);
        let texture = self.ref_copy(ctx, &copy_params, color_mode)?;
        Ok((texture, IVec2::ZERO))
    }

    fn ref_copy(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        copy_params: &CopyParams,
        color_mode: ColorMode,
    ) -> Result<TextureRef> {
        let key = self.make_copy_key(copy_params, color_mode);
        if let Some(key) = &key
            && let Some(cached) = ctx.cache.find(key)
        {
            log::trace!("Copy cache hit for texture {}", self.original.id());
            return Ok(cached);
        }

        let copy = copy::copy_on_gpu(
            &mut *ctx.executor,
            &self.original,
            self.content_area,
            copy_params,
        )?;

        match key {
            Some(key) => {
                let copy = ctx.cache.insert_and_ref(key.clone(), copy);
                self.did_cache_copy(&key);
                Ok(copy)
            }
            None => {
                log::debug!(
                    "Volatile texture {} copied without caching",
                    self.original.id()
                );
                Ok(copy)
            }
        }
    }
}

impl TextureProducer for TextureAdjuster {
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
        let (texture, offset) = self.resolve_safe_texture(ctx, &params, color_mode)?;
        let copied = !Arc::ptr_eq(&texture, &self.original);

        let mut texel_matrix = request.matrix;
        let mut constraint = request.constraint_rect;
        if copied {
            let sx = texture.width() as f32 / self.width() as f32;
            let sy = texture.height() as f32 / self.height() as f32;
            if sx != 1.0 || sy != 1.0 {
                texel_matrix = Mat3::from_scale(Vec2::new(sx, sy)) * texel_matrix;
                constraint = constraint.scale(sx, sy);
            }
        } else if offset != IVec2::ZERO {
            let delta = offset.as_vec2();
            texel_matrix = Mat3::from_translation(delta) * texel_matrix;
            constraint = constraint.offset(delta);
        }

        let content_area = if copied { None } else { self.content_area };
        let mut filter = request.filter;
        let mut domain_mode = determine_domain_mode(
            constraint,
            request.filter_constraint,
            request.coords_limited_to_constraint,
            texture.width(),
            texture.height(),
            content_area,
            filter,
        );
        if domain_mode == DomainMode::TightCopy {
            // Fall back to bilinear; it always admits a domain.
            filter = SampleFilter::Bilinear;
            domain_mode = determine_domain_mode(
                constraint,
                request.filter_constraint,
                request.coords_limited_to_constraint,
                texture.width(),
                texture.height(),
                content_area,
                filter,
            );
        }

        Ok(stage_for_domain_and_filter(
            texture,
            texel_matrix,
            domain_mode,
            filter,
            ColorSpaceXform::make(self.color_space, dst_color_space),
            self.is_alpha_only(),
        ))
    }

    fn make_copy_key(&self, params: &CopyParams, color_mode: ColorMode) -> Option<UniqueKey> {
        derive_copy_key(self.original_key().as_ref(), params, color_mode)
    }

    fn did_cache_copy(&mut self, key: &UniqueKey) {
        self.copies.record(key);
    }
}
