use super::pipeline::{DEPTH_FORMAT, SHADOW_FORMAT};

/// Render-to-texture shadow map: RGBA-packed depth plus a depth attachment
/// used for nearest-surface testing while the map is drawn.
pub(super) struct ShadowMap {
    pub size: u32,
    pub generation: u64,
    _color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    _depth: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

impl ShadowMap {
    pub fn new(device: &wgpu::Device, size: u32, generation: u64) -> Self {
        let size = size.max(1);
        let extent = wgpu::Extent3d { width: size, height: size, depth_or_array_layers: 1 };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra shadow map"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra shadow map depth"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        log::debug!("shadow map allocated: {size}x{size}");

        Self {
            size,
            generation,
            color_view: color.create_view(&wgpu::TextureViewDescriptor::default()),
            _color: color,
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            _depth: depth,
        }
    }
}

/// 1x1 white texture bound in place of the shadow map when shadows are off.
/// White unpacks to the far plane, so every comparison reads as lit.
pub(super) struct FallbackShadow {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl FallbackShadow {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let extent = wgpu::Extent3d { width: 1, height: 1, depth_or_array_layers: 1 };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra fallback shadow map"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[0xff; 4],
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(4), rows_per_image: Some(1) },
            extent,
        );

        Self { view: texture.create_view(&wgpu::TextureViewDescriptor::default()), _texture: texture }
    }
}

/// Depth attachment of the color pass, resized with the surface.
pub(super) struct DepthTarget {
    pub width: u32,
    pub height: u32,
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra depth target"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Self { width, height, view: texture.create_view(&wgpu::TextureViewDescriptor::default()), _texture: texture }
    }
}
