//! Foundation types for Tessel.
//!
//! This crate holds everything the texture producers and backends agree on:
//! texture handles, content keys, sampler parameters, color tags, capability
//! settings and the shared error type.

pub mod color;
pub mod errors;
pub mod geometry;
pub mod key;
pub mod sampler;
pub mod settings;
pub mod texture;

pub use color::{AlphaType, ColorMode, ColorSpace, ColorSpaceXform};
pub use errors::{Result, TesselError};
pub use geometry::{IRect, Rect};
pub use key::{KeyBuilder, KeyDomain, UniqueKey, make_key_from_image_id, next_image_id};
pub use sampler::{FilterConstraint, FilterMode, SampleFilter, SamplerParams, TileMode};
pub use settings::CapsSettings;
pub use texture::{ResourceId, Texture, TextureDesc, TextureRef, full_mip_count};
