//! Sampling stages handed to the shading layer.

use glam::{Mat3, Vec2};
use tessel_core::{
    ColorSpaceXform, FilterConstraint, Rect, Result, SampleFilter, SamplerParams, TesselError,
    TextureRef, TileMode,
};

use crate::domain::DomainMode;

/// How the shading layer intends to sample a producer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingRequest {
    /// Maps local coordinates into the producer's texel space.
    pub matrix: Mat3,
    /// Region of the producer that may be sampled, in texels.
    pub constraint_rect: Rect,
    pub filter_constraint: FilterConstraint,
    /// `matrix * local` is known to stay inside `constraint_rect`, ignoring
    /// filter footprint.
    pub coords_limited_to_constraint: bool,
    pub filter: SampleFilter,
}

impl SamplingRequest {
    /// Unconstrained request over a `width x height` producer.
    #[must_use]
    pub fn new(width: u32, height: u32, filter: SampleFilter) -> Self {
        Self {
            matrix: Mat3::IDENTITY,
            constraint_rect: Rect::from_iwh(width, height),
            filter_constraint: FilterConstraint::Fast,
            coords_limited_to_constraint: true,
            filter,
        }
    }

    #[must_use]
    pub fn with_matrix(mut self, matrix: Mat3) -> Self {
        self.matrix = matrix;
        self
    }

    #[must_use]
    pub fn with_constraint(
        mut self,
        rect: Rect,
        filter_constraint: FilterConstraint,
        coords_limited_to_constraint: bool,
    ) -> Self {
        self.constraint_rect = rect;
        self.filter_constraint = filter_constraint;
        self.coords_limited_to_constraint = coords_limited_to_constraint;
        self
    }

    /// Rejects constraint rects outside `[0, width] x [0, height]`, and any
    /// constraint at all on empty content.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        let r = self.constraint_rect;
        let valid = width > 0
            && height > 0
            && r.left >= 0.0
            && r.top >= 0.0
            && r.left <= r.right
            && r.top <= r.bottom
            && r.right <= width as f32
            && r.bottom <= height as f32;
        if valid {
            Ok(())
        } else {
            Err(TesselError::InvalidConstraint {
                rect: r,
                width,
                height,
            })
        }
    }
}

/// A resolved texture plus everything needed to fetch from it.
#[derive(Debug, Clone)]
pub struct SamplingStage {
    pub texture: TextureRef,
    /// Maps local coordinates to normalized texture coordinates.
    pub matrix: Mat3,
    /// Normalized clamp rectangle, if the shader must enforce one.
    pub domain: Option<Rect>,
    /// Filter the caller asked for.
    pub filter: SampleFilter,
    /// Sampler actually bound.
    pub sampler: SamplerParams,
    pub color_xform: Option<ColorSpaceXform>,
    pub alpha_only: bool,
}

impl SamplingStage {
    #[inline]
    #[must_use]
    pub fn is_bicubic(&self) -> bool {
        self.filter.is_bicubic()
    }

    /// Maps a local point to normalized texture coordinates.
    #[must_use]
    pub fn map_point(&self, local: Vec2) -> Vec2 {
        self.matrix.transform_point2(local)
    }
}

/// Builds the final stage from a texture and a texel-space matrix.
pub(crate) fn stage_for_domain_and_filter(
    texture: TextureRef,
    texel_matrix: Mat3,
    domain_mode: DomainMode,
    filter: SampleFilter,
    color_xform: Option<ColorSpaceXform>,
    alpha_only: bool,
) -> SamplingStage {
    debug_assert!(domain_mode != DomainMode::TightCopy);
    let (w, h) = (texture.width() as f32, texture.height() as f32);
    let normalize = Mat3::from_scale(Vec2::new(1.0 / w, 1.0 / h));
    let domain = match domain_mode {
        DomainMode::Domain(rect) => Some(rect.scale(1.0 / w, 1.0 / h)),
        DomainMode::NoDomain | DomainMode::TightCopy => None,
    };
    let bound_filter = filter.texture_filter().min(texture.highest_filter_mode());
    SamplingStage {
        matrix: normalize * texel_matrix,
        domain,
        filter,
        sampler: SamplerParams::new(TileMode::Clamp, bound_filter),
        color_xform,
        alpha_only,
        texture,
    }
}
