use std::num::NonZeroU64;

use crate::scene::{Material, Vertex};
use crate::shader::{FRAGMENT_ENTRY, VERTEX_ENTRY};

use super::uniforms::{CameraUniform, EntityUniform, LightUniform};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub(crate) const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Which pass a pipeline draws in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) enum Pass {
    /// Lit color pass into the surface.
    Color,
    /// Depth-only program into the RGBA shadow map.
    Shadow,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) struct PipelineKey {
    pub material: u64,
    pub pass: Pass,
    pub format: wgpu::TextureFormat,
}

/// Bind group layouts of the shared binding model.
pub(super) struct Layouts {
    /// Group 0 for `lights = true` programs: camera, lights, shadow map.
    pub frame_lit: wgpu::BindGroupLayout,
    /// Group 0 for everything else: camera only.
    pub frame_unlit: wgpu::BindGroupLayout,
    pub entity: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
}

fn uniform_entry(binding: u32, size: u64) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size),
        },
        count: None,
    }
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let camera_size = std::mem::size_of::<CameraUniform>() as u64;

        let frame_lit = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra frame bgl (lit)"),
            entries: &[
                uniform_entry(0, camera_size),
                uniform_entry(1, std::mem::size_of::<LightUniform>() as u64),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let frame_unlit = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra frame bgl (unlit)"),
            entries: &[uniform_entry(0, camera_size)],
        });

        let entity = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra entity bgl"),
            entries: &[uniform_entry(0, std::mem::size_of::<EntityUniform>() as u64)],
        });

        // Material blocks vary in size; bound whole, so no minimum here.
        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra material bgl"),
            entries: &[uniform_entry(0, 0)],
        });

        Self { frame_lit, frame_unlit, entity, material }
    }

    pub fn frame_for(&self, material: &Material, pass: Pass) -> &wgpu::BindGroupLayout {
        match pass {
            Pass::Color if material.lights() => &self.frame_lit,
            _ => &self.frame_unlit,
        }
    }
}

/// Builds the pipeline drawing `material` in `pass`.
pub(super) fn build(
    device: &wgpu::Device,
    layouts: &Layouts,
    material: &Material,
    pass: Pass,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let label = material.label();

    let vs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(material.vertex_wgsl().into()),
    });
    let fs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(material.fragment_wgsl().into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layouts.frame_for(material, pass), &layouts.entity, &layouts.material],
        immediate_size: 0,
    });

    // Shadow casters render their back faces into the map, which keeps
    // lit front faces from shadowing themselves.
    let cull_mode = match pass {
        Pass::Color => wgpu::Face::Back,
        Pass::Shadow => wgpu::Face::Front,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &vs,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &fs,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(cull_mode),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}
