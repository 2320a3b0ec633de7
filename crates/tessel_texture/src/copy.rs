//! Copy generation shared by both producer strategies.

use tessel_core::{FilterMode, IRect, Result, Texture, TextureRef};

use crate::backend::{CopyDesc, CopyExecutor};
use crate::copy_key::CopyParams;

fn copy_desc(src_width: u32, src_height: u32, params: &CopyParams) -> CopyDesc {
    // Same size means a crop: no texel is resampled, whatever filter was asked for.
    let filter = if src_width == params.width && src_height == params.height {
        FilterMode::Nearest
    } else {
        params.filter.resample_filter()
    };
    CopyDesc {
        width: params.width,
        height: params.height,
        filter,
        mipped: params.filter == FilterMode::MipMap,
    }
}

/// Render-copies `subset` of `source` (all of it when `None`) into a new
/// texture sized by `params`.
pub fn copy_on_gpu(
    executor: &mut dyn CopyExecutor,
    source: &Texture,
    subset: Option<IRect>,
    params: &CopyParams,
) -> Result<TextureRef> {
    let src_rect = subset.unwrap_or_else(|| IRect::from_wh(source.width(), source.height()));
    let desc = copy_desc(src_rect.width(), src_rect.height(), params);
    log::debug!(
        "Render-copy of texture {} {:?} -> {}x{} ({:?}, mipped: {})",
        source.id(),
        src_rect,
        desc.width,
        desc.height,
        desc.filter,
        desc.mipped
    );
    executor.render_copy(source, src_rect, &desc)
}

/// Default copy generation for made textures: stretch the whole original.
pub fn resample_original(
    executor: &mut dyn CopyExecutor,
    original: &Texture,
    params: &CopyParams,
) -> Result<TextureRef> {
    let desc = copy_desc(original.width(), original.height(), params);
    log::debug!(
        "Resample of texture {} {}x{} -> {}x{} ({:?})",
        original.id(),
        original.width(),
        original.height(),
        desc.width,
        desc.height,
        desc.filter
    );
    executor.resample(original, &desc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_size_copy_is_a_nearest_crop() {
        let desc = copy_desc(20, 10, &CopyParams::new(FilterMode::Bilinear, 20, 10));
        assert_eq!(desc.filter, FilterMode::Nearest);
        assert!(!desc.mipped);
    }

    #[test]
    fn stretched_copy_uses_requested_filter() {
        let desc = copy_desc(20, 10, &CopyParams::new(FilterMode::Bilinear, 32, 16));
        assert_eq!(desc.filter, FilterMode::Bilinear);

        let mip = copy_desc(20, 10, &CopyParams::new(FilterMode::MipMap, 32, 16));
        assert_eq!(mip.filter, FilterMode::Bilinear);
        assert!(mip.mipped);
    }
}
