//! In-memory collaborators shared by the integration tests.
//!
//! - [`CountingExecutor`]: records every render-copy and resample, can fail on demand
//! - [`ScriptedCaps`]: capability predicate with a fixed verdict
//! - [`ScriptedGenerator`] / [`OverrideGenerator`]: generators with scripted originals
//! - [`Harness`]: owns cache, caps and executor and lends a `ProducerContext`

#![allow(dead_code)]

use tessel::{
    ColorMode, ColorSpace, CopyDesc, CopyExecutor, CopyParams, IRect, ProducerContext, Result,
    SamplerParams, TesselError, Texture, TextureCache, TextureCaps, TextureDesc, TextureGenerator,
    TextureRef, UniqueKey, make_key_from_image_id, next_image_id,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[must_use]
pub fn texture(width: u32, height: u32) -> TextureRef {
    Texture::new(TextureDesc::rgba8(width, height)).into_ref()
}

// ============================================================================
// Copy Executor
// ============================================================================

#[derive(Default)]
pub struct CountingExecutor {
    pub render_copies: Vec<(IRect, CopyDesc)>,
    pub resamples: Vec<CopyDesc>,
    pub fail: bool,
}

impl CountingExecutor {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.render_copies.len() + self.resamples.len()
    }

    fn allocate(&self, desc: &CopyDesc) -> Result<TextureRef> {
        if self.fail {
            return Err(TesselError::CopyAllocationFailed("out of memory".into()));
        }
        let mut tex_desc = TextureDesc::rgba8(desc.width, desc.height);
        if desc.mipped {
            tex_desc = tex_desc.with_full_mip_chain();
        }
        Ok(Texture::new(tex_desc).into_ref())
    }
}

impl CopyExecutor for CountingExecutor {
    fn render_copy(&mut self, _source: &Texture, src_rect: IRect, desc: &CopyDesc) -> Result<TextureRef> {
        let texture = self.allocate(desc)?;
        self.render_copies.push((src_rect, *desc));
        Ok(texture)
    }

    fn resample(&mut self, _original: &Texture, desc: &CopyDesc) -> Result<TextureRef> {
        let texture = self.allocate(desc)?;
        self.resamples.push(*desc);
        Ok(texture)
    }
}

// ============================================================================
// Capabilities
// ============================================================================

pub struct ScriptedCaps {
    pub compatible: bool,
}

impl TextureCaps for ScriptedCaps {
    fn is_compatible(&self, _texture: &Texture, _params: &SamplerParams) -> bool {
        self.compatible
    }
}

// ============================================================================
// Generators
// ============================================================================

pub struct ScriptedGenerator {
    pub original: Option<TextureRef>,
    pub key: Option<UniqueKey>,
    pub color_space: Option<ColorSpace>,
    pub originals_requested: usize,
    pub last_will_be_mipped: Option<bool>,
    pub cached_copies: Vec<UniqueKey>,
}

impl ScriptedGenerator {
    /// Generator with a stable identity whose original is `width x height`.
    #[must_use]
    pub fn stable(width: u32, height: u32) -> Self {
        let key = make_key_from_image_id(next_image_id(), IRect::from_wh(width, height));
        Self::with_original(Some(texture(width, height)), Some(key))
    }

    /// Generator with no identity: copies of it must never be cached.
    #[must_use]
    pub fn volatile(width: u32, height: u32) -> Self {
        Self::with_original(Some(texture(width, height)), None)
    }

    /// Generator that cannot produce anything.
    #[must_use]
    pub fn exhausted() -> Self {
        Self::with_original(None, None)
    }

    #[must_use]
    pub fn with_original(original: Option<TextureRef>, key: Option<UniqueKey>) -> Self {
        Self {
            original,
            key,
            color_space: None,
            originals_requested: 0,
            last_will_be_mipped: None,
            cached_copies: Vec::new(),
        }
    }
}

impl TextureGenerator for ScriptedGenerator {
    fn ref_original_texture(
        &mut self,
        _ctx: &mut ProducerContext<'_>,
        will_be_mipped: bool,
        _color_mode: ColorMode,
    ) -> Option<TextureRef> {
        self.originals_requested += 1;
        self.last_will_be_mipped = Some(will_be_mipped);
        self.original.clone()
    }

    fn color_space(&self, _color_mode: ColorMode) -> Option<ColorSpace> {
        self.color_space
    }

    fn original_key(&self, _color_mode: ColorMode) -> Option<UniqueKey> {
        self.key.clone()
    }

    fn did_cache_copy(&mut self, key: &UniqueKey) {
        self.cached_copies.push(key.clone());
    }
}

/// Generator that synthesizes copies itself instead of resampling.
pub struct OverrideGenerator {
    pub inner: ScriptedGenerator,
    pub synthesized: Vec<CopyParams>,
}

impl TextureGenerator for OverrideGenerator {
    fn ref_original_texture(
        &mut self,
        ctx: &mut ProducerContext<'_>,
        will_be_mipped: bool,
        color_mode: ColorMode,
    ) -> Option<TextureRef> {
        self.inner.ref_original_texture(ctx, will_be_mipped, color_mode)
    }

    fn color_space(&self, color_mode: ColorMode) -> Option<ColorSpace> {
        self.inner.color_space(color_mode)
    }

    fn original_key(&self, color_mode: ColorMode) -> Option<UniqueKey> {
        self.inner.original_key(color_mode)
    }

    fn generate_copy(
        &mut self,
        _ctx: &mut ProducerContext<'_>,
        _original: &Texture,
        params: &CopyParams,
        _will_be_mipped: bool,
        _color_mode: ColorMode,
    ) -> Result<TextureRef> {
        self.synthesized.push(*params);
        Ok(texture(params.width, params.height))
    }

    fn did_cache_copy(&mut self, key: &UniqueKey) {
        self.inner.did_cache_copy(key);
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub cache: TextureCache,
    pub caps: Box<dyn TextureCaps>,
    pub executor: CountingExecutor,
}

impl Harness {
    #[must_use]
    pub fn new(caps: impl TextureCaps + 'static) -> Self {
        init_logger();
        Self {
            cache: TextureCache::new(),
            caps: Box::new(caps),
            executor: CountingExecutor::default(),
        }
    }

    #[must_use]
    pub fn compatible() -> Self {
        Self::new(ScriptedCaps { compatible: true })
    }

    #[must_use]
    pub fn incompatible() -> Self {
        Self::new(ScriptedCaps { compatible: false })
    }

    pub fn ctx(&mut self) -> ProducerContext<'_> {
        ProducerContext::new(&mut self.cache, self.caps.as_ref(), &mut self.executor)
    }
}
