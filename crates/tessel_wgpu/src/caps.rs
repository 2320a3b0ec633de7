//! Capability settings for a wgpu device.

use tessel_core::CapsSettings;

/// Derives [`CapsSettings`] from what `adapter` and `device` report.
#[must_use]
pub fn caps_from_device(adapter: &wgpu::Adapter, device: &wgpu::Device) -> CapsSettings {
    let downlevel = adapter.get_downlevel_capabilities();
    let caps = CapsSettings {
        npot_tile_support: downlevel
            .flags
            .contains(wgpu::DownlevelFlags::NON_POWER_OF_TWO_MIPMAPPED_TEXTURES),
        mipmap_support: true,
        max_texture_size: device.limits().max_texture_dimension_2d,
    };
    log::info!(
        "Texture caps: npot tiling {}, max texture size {}",
        caps.npot_tile_support,
        caps.max_texture_size
    );
    caps
}
