//! Texture producers for Tessel.
//!
//! Resolves "a texture that can be sampled with these rules" for two kinds
//! of content sources:
//!
//! - [`TextureAdjuster`]: content already in a texture, possibly a sub-rect
//! - [`TextureMaker`]: content generated on demand by a [`TextureGenerator`]
//!
//! Both implement [`TextureProducer`] and fall back to derived copies when
//! the backing texture cannot be sampled as-is. Copies are cached in a
//! [`ResourceCache`] under keys from [`derive_copy_key`].

pub mod adjuster;
pub mod backend;
pub mod cache;
pub mod copy;
pub mod copy_key;
pub mod domain;
pub mod maker;
pub mod producer;
pub mod stage;
pub mod tracker;

pub use adjuster::TextureAdjuster;
pub use backend::{CopyDesc, CopyExecutor, ProducerContext, ResourceCache, TextureCaps};
pub use cache::TextureCache;
pub use copy_key::{CopyParams, derive_copy_key};
pub use domain::{DomainMode, determine_domain_mode};
pub use maker::{TextureGenerator, TextureMaker};
pub use producer::{ProducerInfo, TextureProducer};
pub use stage::{SamplingRequest, SamplingStage};
pub use tracker::CopyKeyTracker;
