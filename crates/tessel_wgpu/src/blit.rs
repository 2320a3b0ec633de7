//! Blit-based copy executor.
//!
//! Every copy is a full-screen-triangle draw that samples a sub-rectangle of
//! the source into level 0 of a freshly allocated texture. Mip chains are
//! then filled by successive half-size blits, level `i` into level `i + 1`.
//!
//! Pipelines are cached per target format; nearest and linear filtering only
//! differ in the sampler bound, so one pipeline serves both.

use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use rustc_hash::FxHashMap;
use tessel_core::{FilterMode, IRect, Result, TesselError, Texture, TextureRef, full_mip_count};
use tessel_texture::{CopyDesc, CopyExecutor};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct BlitUniforms {
    src_rect: [f32; 4],
}

/// Whole-texture source rect in normalized coordinates.
const FULL_RECT: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Copies sample the source with a filtering sampler and render into a
/// texture of the same format, so the format must be filterable and
/// renderable. Compressed formats are neither.
pub fn check_blittable(format: wgpu::TextureFormat, features: wgpu::Features) -> Result<()> {
    let reject = |reason: &str| {
        Err(TesselError::CopyAllocationFailed(format!(
            "format {format:?} cannot be blitted: {reason}"
        )))
    };
    if format.is_compressed() {
        return reject("compressed");
    }
    let allowed = format.guaranteed_format_features(features).allowed_usages;
    if !allowed.contains(wgpu::TextureUsages::RENDER_ATTACHMENT) {
        return reject("not renderable");
    }
    if !matches!(
        format.sample_type(None, Some(features)),
        Some(wgpu::TextureSampleType::Float { filterable: true })
    ) {
        return reject("not filterable");
    }
    Ok(())
}

/// [`CopyExecutor`] that renders copies with wgpu.
pub struct BlitCopier {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    nearest_sampler: wgpu::Sampler,
    linear_sampler: wgpu::Sampler,
    shader: wgpu::ShaderModule,
    pipelines: FxHashMap<wgpu::TextureFormat, wgpu::RenderPipeline>,
    max_texture_size: u32,
    copies_made: u64,
}

impl BlitCopier {
    #[must_use]
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Tessel Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/blit.wgsl"))),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Tessel Blit Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let sampler = |label, filter: FilterMode| {
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(label),
                mag_filter: filter.to_wgpu(),
                min_filter: filter.to_wgpu(),
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                ..Default::default()
            })
        };

        Self {
            device: device.clone(),
            queue: queue.clone(),
            layout,
            nearest_sampler: sampler("Tessel Blit Nearest", FilterMode::Nearest),
            linear_sampler: sampler("Tessel Blit Linear", FilterMode::Bilinear),
            shader,
            pipelines: FxHashMap::default(),
            max_texture_size: device.limits().max_texture_dimension_2d,
            copies_made: 0,
        }
    }

    /// Number of copies rendered so far.
    #[inline]
    #[must_use]
    pub fn copies_made(&self) -> u64 {
        self.copies_made
    }

    fn create_pipeline(&self, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("Tessel Blit Pipeline {format:?}")),
                layout: Some(&self.device.create_pipeline_layout(
                    &wgpu::PipelineLayoutDescriptor {
                        label: Some("Tessel Blit Pipeline Layout"),
                        bind_group_layouts: &[Some(&self.layout)],
                        immediate_size: 0,
                    },
                )),
                vertex: wgpu::VertexState {
                    module: &self.shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &self.shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
    }

    /// Builds the pipeline for `format` ahead of the first copy into it.
    pub fn ensure_pipeline(&mut self, format: wgpu::TextureFormat) {
        if !self.pipelines.contains_key(&format) {
            let pipeline = self.create_pipeline(format);
            self.pipelines.insert(format, pipeline);
        }
    }

    fn validate(&self, source: &Texture, src_rect: IRect, desc: &CopyDesc) -> Result<()> {
        if desc.width == 0 || desc.height == 0 {
            return Err(TesselError::CopyAllocationFailed(format!(
                "empty copy target {}x{}",
                desc.width, desc.height
            )));
        }
        if desc.width > self.max_texture_size || desc.height > self.max_texture_size {
            return Err(TesselError::CopyAllocationFailed(format!(
                "copy target {}x{} exceeds device limit {}",
                desc.width, desc.height, self.max_texture_size
            )));
        }
        let bounds = IRect::from_wh(source.width(), source.height());
        if src_rect.is_empty() || !bounds.contains(&src_rect) {
            return Err(TesselError::CopyAllocationFailed(format!(
                "source rect {src_rect:?} outside texture {}x{}",
                source.width(),
                source.height()
            )));
        }
        check_blittable(source.format(), self.device.features())
    }

    fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipeline: &wgpu::RenderPipeline,
        src_view: &wgpu::TextureView,
        dst_view: &wgpu::TextureView,
        src_rect: [f32; 4],
        sampler: &wgpu::Sampler,
    ) {
        let uniforms = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Tessel Blit Uniforms"),
                contents: bytemuck::bytes_of(&BlitUniforms { src_rect }),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Tessel Blit BG"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(src_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        });

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Tessel Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: dst_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }
}

fn level_view(
    texture: &wgpu::Texture,
    level: u32,
    usage: wgpu::TextureUsages,
    label: &'static str,
) -> wgpu::TextureView {
    texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some(label),
        format: None,
        dimension: Some(wgpu::TextureViewDimension::D2),
        aspect: wgpu::TextureAspect::All,
        base_mip_level: level,
        mip_level_count: Some(1),
        base_array_layer: 0,
        array_layer_count: Some(1),
        usage: Some(usage),
    })
}

impl CopyExecutor for BlitCopier {
    fn render_copy(
        &mut self,
        source: &Texture,
        src_rect: IRect,
        desc: &CopyDesc,
    ) -> Result<TextureRef> {
        self.validate(source, src_rect, desc)?;
        let Some(src_texture) = source.gpu_texture() else {
            return Err(TesselError::CopyAllocationFailed(format!(
                "texture {} has no GPU backing",
                source.id()
            )));
        };

        let format = source.format();
        self.ensure_pipeline(format);
        let Some(pipeline) = self.pipelines.get(&format) else {
            return Err(TesselError::CopyAllocationFailed(format!(
                "no blit pipeline for {format:?}"
            )));
        };

        let mip_level_count = if desc.mipped {
            full_mip_count(desc.width, desc.height)
        } else {
            1
        };
        let dst = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Tessel Copy"),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let (src_w, src_h) = (source.width() as f32, source.height() as f32);
        let normalized = [
            src_rect.left as f32 / src_w,
            src_rect.top as f32 / src_h,
            src_rect.width() as f32 / src_w,
            src_rect.height() as f32 / src_h,
        ];
        let sampler = match desc.filter {
            FilterMode::Nearest => &self.nearest_sampler,
            FilterMode::Bilinear | FilterMode::MipMap => &self.linear_sampler,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Tessel Copy Encoder"),
            });

        let src_view = level_view(
            src_texture,
            0,
            wgpu::TextureUsages::TEXTURE_BINDING,
            "Tessel Copy Src",
        );
        let dst_view = level_view(&dst, 0, wgpu::TextureUsages::RENDER_ATTACHMENT, "Tessel Copy Dst");
        self.blit(&mut encoder, pipeline, &src_view, &dst_view, normalized, sampler);

        for level in 0..mip_level_count.saturating_sub(1) {
            let src_view = level_view(
                &dst,
                level,
                wgpu::TextureUsages::TEXTURE_BINDING,
                "Tessel Mip Src",
            );
            let dst_view = level_view(
                &dst,
                level + 1,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
                "Tessel Mip Dst",
            );
            self.blit(
                &mut encoder,
                pipeline,
                &src_view,
                &dst_view,
                FULL_RECT,
                &self.linear_sampler,
            );
        }

        self.queue.submit(Some(encoder.finish()));
        self.copies_made += 1;
        log::debug!(
            "Blitted {src_rect:?} of texture {} into {}x{} ({} levels)",
            source.id(),
            desc.width,
            desc.height,
            mip_level_count
        );
        Ok(Texture::from_wgpu(dst).into_ref())
    }
}
