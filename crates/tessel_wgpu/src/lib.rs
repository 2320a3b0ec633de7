//! wgpu backend for Tessel.
//!
//! | Item                     | Implements                                  |
//! |--------------------------|---------------------------------------------|
//! | [`caps_from_device`]     | `CapsSettings` from adapter/device limits   |
//! | [`BlitCopier`]           | `CopyExecutor` via blit draws + mip chains  |
//! | [`RasterImageGenerator`] | `TextureGenerator` over an RGBA image       |
//! | [`WgpuBackend`]          | owns caps, copier and cache together        |

pub mod backend;
pub mod blit;
pub mod caps;
pub mod raster;

pub use backend::WgpuBackend;
pub use blit::{BlitCopier, check_blittable};
pub use caps::caps_from_device;
pub use raster::RasterImageGenerator;
