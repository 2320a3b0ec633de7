//! Texture domain selection.
//!
//! When a sampling stage must not read texels outside some rectangle (the
//! caller's constraint rect, or the content area of a larger backing
//! texture), the shader clamps coordinates to a *domain*. A domain costs
//! shader work, so it is only used when the filter footprint could actually
//! reach forbidden texels.
//!
//! Mip-mapped sampling cannot be fixed with a domain, since coarser levels
//! blend texels from outside any rectangle. In that case the only safe answer
//! is a tight copy.

use tessel_core::{FilterConstraint, IRect, Rect, SampleFilter};

/// Texel-center inset applied to every domain edge.
const DOMAIN_INSET: f32 = 0.5;

/// Outcome of [`determine_domain_mode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainMode {
    /// Sample the texture without clamping.
    NoDomain,
    /// Clamp coordinates to this rectangle, in texels.
    Domain(Rect),
    /// No domain suffices; the constrained region must be copied out.
    TightCopy,
}

/// Decides how sampling must be restricted.
///
/// `constraint_rect` and `content_area` are in the texel space of a
/// `texture_width x texture_height` texture. `content_area` is only set when
/// it is strictly smaller than the texture.
#[must_use]
pub fn determine_domain_mode(
    constraint_rect: Rect,
    filter_constraint: FilterConstraint,
    coords_limited_to_constraint: bool,
    texture_width: u32,
    texture_height: u32,
    content_area: Option<IRect>,
    filter: SampleFilter,
) -> DomainMode {
    let texture_bounds = Rect::from_iwh(texture_width, texture_height);

    if constraint_rect.contains(&texture_bounds) {
        return DomainMode::NoDomain;
    }

    let restrict_filter = filter_constraint == FilterConstraint::Strict;

    // Free to filter across the constraint, nothing outside it is garbage,
    // and coords stay inside it: nothing to guard.
    if !restrict_filter && content_area.is_none() && coords_limited_to_constraint {
        return DomainMode::NoDomain;
    }

    let filter_half_width = match filter {
        SampleFilter::Nearest => {
            if coords_limited_to_constraint {
                return DomainMode::NoDomain;
            }
            0.0
        }
        SampleFilter::Bilinear => 0.5,
        SampleFilter::MipMap => {
            if restrict_filter || content_area.is_some() {
                return DomainMode::TightCopy;
            }
            return DomainMode::NoDomain;
        }
        // Bicubic taps reach 1.5 texels out from the sample point.
        SampleFilter::Bicubic => 1.5,
    };

    let mut domain;
    if restrict_filter {
        domain = constraint_rect.inset(DOMAIN_INSET, DOMAIN_INSET);
    } else if let Some(area) = content_area {
        let area_rect = Rect::from(area);
        let tex_w = texture_width as i32;
        let tex_h = texture_height as i32;
        domain = Rect::largest();

        if coords_limited_to_constraint {
            // Only guard the sides where the filter footprint can reach past
            // the content area.
            let mut needs_guard = false;
            if area.left > 0 && area_rect.left + filter_half_width > constraint_rect.left {
                domain.left = area_rect.left + DOMAIN_INSET;
                needs_guard = true;
            }
            if area.top > 0 && area_rect.top + filter_half_width > constraint_rect.top {
                domain.top = area_rect.top + DOMAIN_INSET;
                needs_guard = true;
            }
            if area.right < tex_w && area_rect.right - filter_half_width < constraint_rect.right {
                domain.right = area_rect.right - DOMAIN_INSET;
                needs_guard = true;
            }
            if area.bottom < tex_h && area_rect.bottom - filter_half_width < constraint_rect.bottom
            {
                domain.bottom = area_rect.bottom - DOMAIN_INSET;
                needs_guard = true;
            }
            if !needs_guard {
                return DomainMode::NoDomain;
            }
        } else {
            if area.left != 0 {
                domain.left = area_rect.left + DOMAIN_INSET;
            }
            if area.top != 0 {
                domain.top = area_rect.top + DOMAIN_INSET;
            }
            if area.right != tex_w {
                domain.right = area_rect.right - DOMAIN_INSET;
            }
            if area.bottom != tex_h {
                domain.bottom = area_rect.bottom - DOMAIN_INSET;
            }
        }
    } else {
        return DomainMode::NoDomain;
    }

    // Sub-texel constraints collapse onto their center line.
    if domain.left > domain.right {
        let mid = (domain.left + domain.right) * 0.5;
        domain.left = mid;
        domain.right = mid;
    }
    if domain.top > domain.bottom {
        let mid = (domain.top + domain.bottom) * 0.5;
        domain.top = mid;
        domain.bottom = mid;
    }
    DomainMode::Domain(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_texture_constraint_needs_no_domain() {
        let mode = determine_domain_mode(
            Rect::from_iwh(64, 64),
            FilterConstraint::Strict,
            false,
            64,
            64,
            None,
            SampleFilter::Bilinear,
        );
        assert_eq!(mode, DomainMode::NoDomain);
    }

    #[test]
    fn strict_bilinear_constraint_is_inset_by_half_texel() {
        let mode = determine_domain_mode(
            Rect::from_ltrb(8.0, 8.0, 24.0, 24.0),
            FilterConstraint::Strict,
            false,
            64,
            64,
            None,
            SampleFilter::Bilinear,
        );
        assert_eq!(mode, DomainMode::Domain(Rect::from_ltrb(8.5, 8.5, 23.5, 23.5)));
    }

    #[test]
    fn mipmap_with_strict_constraint_needs_tight_copy() {
        let mode = determine_domain_mode(
            Rect::from_ltrb(8.0, 8.0, 24.0, 24.0),
            FilterConstraint::Strict,
            false,
            64,
            64,
            None,
            SampleFilter::MipMap,
        );
        assert_eq!(mode, DomainMode::TightCopy);
    }

    #[test]
    fn nearest_with_limited_coords_needs_no_domain() {
        let mode = determine_domain_mode(
            Rect::from_ltrb(8.0, 8.0, 24.0, 24.0),
            FilterConstraint::Strict,
            true,
            64,
            64,
            None,
            SampleFilter::Nearest,
        );
        assert_eq!(mode, DomainMode::NoDomain);
    }

    #[test]
    fn content_area_guards_only_reachable_sides() {
        // Content occupies the left 40 columns; constraint hugs the right edge.
        let area = IRect::from_ltrb(0, 0, 40, 64);
        let mode = determine_domain_mode(
            Rect::from_ltrb(20.0, 10.0, 40.0, 30.0),
            FilterConstraint::Fast,
            true,
            64,
            64,
            Some(area),
            SampleFilter::Bilinear,
        );
        let DomainMode::Domain(domain) = mode else {
            panic!("expected a domain, got {mode:?}");
        };
        assert_eq!(domain.right, 39.5);
        assert_eq!(domain.left, f32::MIN);
        assert_eq!(domain.top, f32::MIN);
        assert_eq!(domain.bottom, f32::MAX);
    }

    #[test]
    fn content_area_far_from_constraint_needs_no_domain() {
        let area = IRect::from_ltrb(0, 0, 40, 64);
        let mode = determine_domain_mode(
            Rect::from_ltrb(10.0, 10.0, 20.0, 20.0),
            FilterConstraint::Fast,
            true,
            64,
            64,
            Some(area),
            SampleFilter::Bilinear,
        );
        assert_eq!(mode, DomainMode::NoDomain);
    }

    #[test]
    fn sub_texel_constraint_collapses_to_center() {
        let mode = determine_domain_mode(
            Rect::from_ltrb(10.0, 10.0, 10.5, 12.0),
            FilterConstraint::Strict,
            false,
            64,
            64,
            None,
            SampleFilter::Bilinear,
        );
        let DomainMode::Domain(domain) = mode else {
            panic!("expected a domain, got {mode:?}");
        };
        assert_eq!(domain.left, domain.right);
        assert_eq!(domain.left, 10.25);
        assert_eq!(domain.top, 10.5);
        assert_eq!(domain.bottom, 11.5);
    }
}
