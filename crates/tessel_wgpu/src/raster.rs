//! Generator for CPU-side RGBA images.
//!
//! The original texture is an upload of the image, cached under a key derived
//! from the generator's image id and the color mode (gamma-correct
//! destinations get an sRGB view of the same pixels). Copies that need no
//! mip chain are resized on the CPU and uploaded directly instead of being
//! blitted from the original.

use std::sync::LazyLock;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use tessel_core::{
    AlphaType, ColorMode, ColorSpace, FilterMode, IRect, KeyBuilder, KeyDomain, Result,
    TesselError, Texture, TextureRef, UniqueKey, make_key_from_image_id, next_image_id,
};
use tessel_texture::{CopyKeyTracker, CopyParams, ProducerContext, ResourceCache, TextureGenerator};

static RASTER_ORIGINAL_DOMAIN: LazyLock<KeyDomain> = LazyLock::new(KeyDomain::generate);

/// [`TextureGenerator`] over an in-memory RGBA image.
pub struct RasterImageGenerator {
    device: wgpu::Device,
    queue: wgpu::Queue,
    image: RgbaImage,
    image_id: u32,
    alpha_type: AlphaType,
    copies: CopyKeyTracker,
    uploads: u64,
}

impl RasterImageGenerator {
    #[must_use]
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, image: RgbaImage) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            image,
            image_id: next_image_id(),
            alpha_type: AlphaType::Unpremul,
            copies: CopyKeyTracker::new(),
            uploads: 0,
        }
    }

    /// Decodes a PNG or JPEG file held in memory.
    pub fn from_encoded(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
    ) -> image::ImageResult<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::new(device, queue, image))
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    #[must_use]
    pub fn image_id(&self) -> u32 {
        self.image_id
    }

    /// Number of textures uploaded from the CPU so far.
    #[inline]
    #[must_use]
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Replaces the pixels, dropping the cached original and every copy.
    pub fn set_image(&mut self, image: RgbaImage, cache: &mut dyn ResourceCache) {
        for mode in [ColorMode::Legacy, ColorMode::GammaCorrect] {
            cache.remove(&self.raster_key(mode));
        }
        self.copies.invalidate(cache);
        self.image = image;
        self.image_id = next_image_id();
    }

    fn raster_key(&self, color_mode: ColorMode) -> UniqueKey {
        let base = make_key_from_image_id(self.image_id, IRect::from_wh(self.width(), self.height()));
        KeyBuilder::derived(&base, *RASTER_ORIGINAL_DOMAIN)
            .push(color_mode.key_tag())
            .finish()
    }

    fn format(color_mode: ColorMode) -> wgpu::TextureFormat {
        match color_mode {
            ColorMode::Legacy => wgpu::TextureFormat::Rgba8Unorm,
            ColorMode::GammaCorrect => wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }

    fn upload(&mut self, pixels: &RgbaImage, color_mode: ColorMode) -> Result<TextureRef> {
        let texture = upload_rgba(&self.device, &self.queue, pixels, Self::format(color_mode))?;
        self.uploads += 1;
        Ok(texture)
    }
}

/// Uploads `pixels` into a fresh single-level texture.
fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pixels: &RgbaImage,
    format: wgpu::TextureFormat,
) -> Result<TextureRef> {
    let (width, height) = pixels.dimensions();
    let max = device.limits().max_texture_dimension_2d;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(TesselError::CopyAllocationFailed(format!(
            "cannot upload {width}x{height} image (device limit {max})"
        )));
    }

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Tessel Raster Image"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );
    Ok(Texture::from_wgpu(texture).into_ref())
}

impl TextureGenerator for RasterImageGenerator {
    fn ref_original_texture(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        _will_be_mipped: bool,
        color_mode: ColorMode,
    ) -> Option<TextureRef> {
        let key = self.raster_key(color_mode);
        if let Some(cached) = ctx.cache.find(&key) {
            return Some(cached);
        }
        let uploaded = upload_rgba(&self.device, &self.queue, &self.image, Self::format(color_mode));
        match uploaded {
            Ok(texture) => {
                self.uploads += 1;
                Some(ctx.cache.insert_and_ref(key, texture))
            }
            Err(err) => {
                log::warn!("Raster image {} unavailable: {err}", self.image_id);
                None
            }
        }
    }

    fn color_space(&self, color_mode: ColorMode) -> Option<ColorSpace> {
        match color_mode {
            ColorMode::Legacy => None,
            ColorMode::GammaCorrect => Some(ColorSpace::Srgb),
        }
    }

    fn alpha_type(&self) -> AlphaType {
        self.alpha_type
    }

    fn original_key(&self, color_mode: ColorMode) -> Option<UniqueKey> {
        Some(self.raster_key(color_mode))
    }

    fn generate_copy(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        original: &Texture,
        params: &CopyParams,
        will_be_mipped: bool,
        color_mode: ColorMode,
    ) -> Result<TextureRef> {
        if will_be_mipped {
            return tessel_texture::copy::resample_original(&mut *ctx.executor, original, params);
        }
        if params.width == 0 || params.height == 0 {
            return Err(TesselError::CopyAllocationFailed(format!(
                "empty copy target {}x{}",
                params.width, params.height
            )));
        }
        let filter = match params.filter {
            FilterMode::Nearest => FilterType::Nearest,
            FilterMode::Bilinear | FilterMode::MipMap => FilterType::Triangle,
        };
        log::debug!(
            "Resizing raster image {} to {}x{} on the CPU",
            self.image_id,
            params.width,
            params.height
        );
        let resized = imageops::resize(&self.image, params.width, params.height, filter);
        self.upload(&resized, color_mode)
    }

    fn did_cache_copy(&mut self, key: &UniqueKey) {
        self.copies.record(key);
    }
}
