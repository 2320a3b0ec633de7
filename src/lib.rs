//! # Tessel
//!
//! Texture compatibility resolution and derived-copy caching for GPU
//! renderers.
//!
//! A draw samples from a *content source*: an existing texture (maybe only a
//! sub-rectangle of it) or something that must first be turned into a
//! texture. Tessel decides whether that texture can be sampled as requested
//! and, when it cannot, produces a derived copy and caches it under a
//! deterministic key so later draws reuse it.
//!
//! ## Crates
//!
//! | Crate            | Contents                                               |
//! |------------------|--------------------------------------------------------|
//! | `tessel_core`    | textures, keys, sampler params, caps settings, errors  |
//! | `tessel_texture` | producers, copy keys, domain modes, reference cache    |
//! | `tessel_wgpu`    | blit copier, device caps, raster image generator       |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessel::prelude::*;
//!
//! let mut backend = WgpuBackend::new(&adapter, &device, &queue);
//! let mut producer = TextureAdjuster::new(texture, AlphaType::Premul, Some(next_image_id()))
//!     .with_content_area(IRect::from_xywh(32, 0, 64, 64));
//!
//! let request = SamplingRequest::new(64, 64, SampleFilter::MipMap);
//! let stage = producer.create_sampling_stage(
//!     &mut backend.context(),
//!     &request,
//!     None,
//!     ColorMode::Legacy,
//! )?;
//! ```

pub use tessel_core::{
    AlphaType, CapsSettings, ColorMode, ColorSpace, ColorSpaceXform, FilterConstraint, FilterMode,
    IRect, KeyBuilder, KeyDomain, Rect, Result, SampleFilter, SamplerParams, TesselError, Texture,
    TextureDesc, TextureRef, TileMode, UniqueKey, full_mip_count, make_key_from_image_id,
    next_image_id,
};
pub use tessel_texture::{
    CopyDesc, CopyExecutor, CopyKeyTracker, CopyParams, DomainMode, ProducerContext,
    ProducerInfo, ResourceCache, SamplingRequest, SamplingStage, TextureAdjuster, TextureCache,
    TextureCaps, TextureGenerator, TextureMaker, TextureProducer, derive_copy_key,
    determine_domain_mode,
};
#[cfg(feature = "wgpu")]
pub use tessel_wgpu::{BlitCopier, RasterImageGenerator, WgpuBackend, caps_from_device};

pub mod prelude {
    //! Everything needed to resolve and sample producers.
    pub use crate::{
        AlphaType, ColorMode, ColorSpace, FilterConstraint, FilterMode, IRect, Rect,
        SampleFilter, SamplerParams, SamplingRequest, SamplingStage, TextureAdjuster,
        TextureMaker, TextureProducer, TileMode, make_key_from_image_id, next_image_id,
    };

    #[cfg(feature = "wgpu")]
    pub use crate::WgpuBackend;
}

/// Version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
