use std::collections::HashMap;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::scene::{Material, Mesh, MeshId, PerspectiveCamera, Scene, ShadowDepth};
use crate::shader::{DepthPacking, ShaderError};

use super::pipeline::{self, Layouts, Pass, PipelineKey, SHADOW_FORMAT};
use super::shadow::{DepthTarget, FallbackShadow, ShadowMap};
use super::uniforms::{CameraUniform, EntityUniform, LightUniform};
use super::{RenderCtx, RenderTarget};

/// Shadow mapping switch; off renders every receiver fully lit.
#[derive(Debug, Copy, Clone, Default)]
pub struct ShadowMapSettings {
    pub enabled: bool,
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    vertex_count: usize,
    index_count: u32,
    entity_ubo: wgpu::Buffer,
    entity_group: wgpu::BindGroup,
}

struct GpuMaterial {
    ubo: wgpu::Buffer,
    group: wgpu::BindGroup,
}

struct FrameResources {
    camera_ubo: wgpu::Buffer,
    shadow_camera_ubo: wgpu::Buffer,
    light_ubo: wgpu::Buffer,
    /// Main camera only; unlit programs in the color pass.
    unlit_group: wgpu::BindGroup,
    /// Light's shadow camera; every draw of the shadow pass.
    shadow_group: wgpu::BindGroup,
    /// Camera, lights, and the shadow source it was built for
    /// (a shadow map generation, 0 = fallback texture).
    lit_group: Option<(u64, wgpu::BindGroup)>,
}

/// Forward renderer: optional shadow-map pass, then one lit color pass.
///
/// GPU resources are created on demand and cached: pipelines per
/// (material, pass, format), buffers per mesh and material, and the shadow map
/// on the first frame that has a casting light and a casting mesh.
pub struct Renderer {
    pub clear_color: Color,
    pub shadow_map: ShadowMapSettings,

    size: Option<(u32, u32)>,
    default_depth: Material,

    layouts: Option<Layouts>,
    frame: Option<FrameResources>,
    depth_target: Option<DepthTarget>,
    shadow: Option<ShadowMap>,
    fallback_shadow: Option<FallbackShadow>,
    shadow_generation: u64,

    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    meshes: HashMap<MeshId, GpuMesh>,
    materials: HashMap<u64, GpuMaterial>,

    warned_depth_packing: bool,
    warned_lit_depth: bool,
}

impl Renderer {
    pub fn new() -> Result<Self, ShaderError> {
        Ok(Self {
            clear_color: Color::BLACK,
            shadow_map: ShadowMapSettings::default(),
            size: None,
            default_depth: Material::depth(DepthPacking::Rgba)?,
            layouts: None,
            frame: None,
            depth_target: None,
            shadow: None,
            fallback_shadow: None,
            shadow_generation: 0,
            pipelines: HashMap::new(),
            meshes: HashMap::new(),
            materials: HashMap::new(),
            warned_depth_packing: false,
            warned_lit_depth: false,
        })
    }

    /// Sets the output size in physical pixels. Drawing is confined to this
    /// rectangle of the target.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    /// Output size set by [`set_size`](Self::set_size); `(0, 0)` before.
    pub fn size(&self) -> (u32, u32) {
        self.size.unwrap_or((0, 0))
    }

    /// Shadow map edge length, once allocated.
    pub fn shadow_map_size(&self) -> Option<u32> {
        self.shadow.as_ref().map(|s| s.size)
    }

    /// Builds every pipeline `scene` needs so the first frame doesn't stall.
    pub fn compile(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) -> Result<()> {
        self.ensure_layouts(ctx.device);
        let Some(layouts) = self.layouts.as_ref() else { return Ok(()) };
        let before = self.pipelines.len();

        for (_, mesh) in scene.meshes() {
            let material = mesh_material(scene, mesh)?;
            ensure_pipeline(&mut self.pipelines, ctx.device, layouts, material, Pass::Color, ctx.surface_format);

            if mesh.cast_shadow {
                let depth = shadow_material(&self.default_depth, scene, mesh);
                ensure_pipeline(&mut self.pipelines, ctx.device, layouts, depth, Pass::Shadow, SHADOW_FORMAT);
            }
        }

        if self.pipelines.len() != before {
            log::debug!("renderer: {} pipelines ready", self.pipelines.len());
        }
        Ok(())
    }

    /// Renders `scene` from `camera` into `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<()> {
        if ctx.viewport.is_empty() {
            return Ok(());
        }

        let shadows = self.shadow_map.enabled && scene.has_shadow_casters();

        self.compile(ctx, scene)?;
        self.check_shadow_depth_choices(scene);
        self.ensure_frame_resources(ctx);
        self.ensure_depth_target(ctx);
        if shadows {
            if let Some(light) = scene.directional.as_ref() {
                self.ensure_shadow_map(ctx.device, light.shadow.map_size);
            }
        }
        self.ensure_lit_group(ctx.device, shadows);

        self.upload_meshes(ctx, scene);
        self.upload_materials(ctx, scene)?;
        self.write_frame_uniforms(ctx, scene, camera, shadows);

        if shadows {
            self.shadow_pass(&mut *target.encoder, scene);
        }
        self.color_pass(ctx, target, scene)
    }

    // ── passes ────────────────────────────────────────────────────────────

    fn shadow_pass(&self, encoder: &mut wgpu::CommandEncoder, scene: &Scene) {
        let (Some(shadow), Some(frame)) = (self.shadow.as_ref(), self.frame.as_ref()) else { return };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("umbra shadow pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &shadow.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    // White unpacks to the far plane.
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &shadow.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, &frame.shadow_group, &[]);
        for (id, mesh) in scene.meshes() {
            if !mesh.visible || !mesh.cast_shadow {
                continue;
            }
            let material = shadow_material(&self.default_depth, scene, mesh);
            self.draw_mesh(&mut rpass, id, material, Pass::Shadow, SHADOW_FORMAT);
        }
    }

    fn color_pass(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, scene: &Scene) -> Result<()> {
        let frame = self.frame.as_ref().context("frame resources missing")?;
        let depth = self.depth_target.as_ref().context("depth target missing")?;
        let lit_group = frame.lit_group.as_ref().map(|(_, g)| g).context("lit bind group missing")?;

        let clear = scene.background.unwrap_or(self.clear_color);
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("umbra color pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: clear.r as f64,
                        g: clear.g as f64,
                        b: clear.b as f64,
                        a: clear.a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let (w, h) = self.output_size(ctx);
        rpass.set_viewport(0.0, 0.0, w as f32, h as f32, 0.0, 1.0);

        for (id, mesh) in scene.meshes() {
            if !mesh.visible {
                continue;
            }
            let material = mesh_material(scene, mesh)?;
            let group = if material.lights() { lit_group } else { &frame.unlit_group };
            rpass.set_bind_group(0, group, &[]);
            self.draw_mesh(&mut rpass, id, material, Pass::Color, ctx.surface_format);
        }
        Ok(())
    }

    fn draw_mesh(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        id: MeshId,
        material: &Material,
        pass: Pass,
        format: wgpu::TextureFormat,
    ) {
        let key = PipelineKey { material: material.uid(), pass, format };
        let Some(pipeline) = self.pipelines.get(&key) else { return };
        let Some(gpu_mesh) = self.meshes.get(&id) else { return };
        let Some(gpu_material) = self.materials.get(&material.uid()) else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(1, &gpu_mesh.entity_group, &[]);
        rpass.set_bind_group(2, &gpu_material.group, &[]);
        rpass.set_vertex_buffer(0, gpu_mesh.vbo.slice(..));
        rpass.set_index_buffer(gpu_mesh.ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
    }

    /// Output rectangle clamped to the target.
    fn output_size(&self, ctx: &RenderCtx<'_>) -> (u32, u32) {
        let (tw, th) = (ctx.viewport.width, ctx.viewport.height);
        match self.size {
            Some((w, h)) => (w.min(tw).max(1), h.min(th).max(1)),
            None => (tw, th),
        }
    }

    // ── resources ─────────────────────────────────────────────────────────

    fn ensure_layouts(&mut self, device: &wgpu::Device) {
        if self.layouts.is_none() {
            self.layouts = Some(Layouts::new(device));
        }
    }

    fn ensure_frame_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.frame.is_some() {
            return;
        }
        let Some(layouts) = self.layouts.as_ref() else { return };

        let ubo = |label: &str, size: usize| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: size as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let camera_ubo = ubo("umbra camera ubo", std::mem::size_of::<CameraUniform>());
        let shadow_camera_ubo = ubo("umbra shadow camera ubo", std::mem::size_of::<CameraUniform>());
        let light_ubo = ubo("umbra light ubo", std::mem::size_of::<LightUniform>());

        let camera_group = |label: &str, buffer: &wgpu::Buffer| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &layouts.frame_unlit,
                entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
            })
        };
        let unlit_group = camera_group("umbra frame group (unlit)", &camera_ubo);
        let shadow_group = camera_group("umbra frame group (shadow)", &shadow_camera_ubo);

        self.frame = Some(FrameResources {
            camera_ubo,
            shadow_camera_ubo,
            light_ubo,
            unlit_group,
            shadow_group,
            lit_group: None,
        });
        self.fallback_shadow = Some(FallbackShadow::new(ctx.device, ctx.queue));
    }

    fn ensure_depth_target(&mut self, ctx: &RenderCtx<'_>) {
        let (w, h) = (ctx.viewport.width, ctx.viewport.height);
        if self.depth_target.as_ref().is_some_and(|d| d.width == w && d.height == h) {
            return;
        }
        self.depth_target = Some(DepthTarget::new(ctx.device, w, h));
    }

    fn ensure_shadow_map(&mut self, device: &wgpu::Device, size: u32) {
        if self.shadow.as_ref().is_some_and(|s| s.size == size.max(1)) {
            return;
        }
        self.shadow_generation += 1;
        self.shadow = Some(ShadowMap::new(device, size, self.shadow_generation));
    }

    fn ensure_lit_group(&mut self, device: &wgpu::Device, shadows: bool) {
        let (Some(layouts), Some(frame)) = (self.layouts.as_ref(), self.frame.as_mut()) else { return };

        let (generation, view) = match (shadows, self.shadow.as_ref(), self.fallback_shadow.as_ref()) {
            (true, Some(map), _) => (map.generation, &map.color_view),
            (_, _, Some(fallback)) => (0, &fallback.view),
            _ => return,
        };
        if frame.lit_group.as_ref().is_some_and(|(g, _)| *g == generation) {
            return;
        }

        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("umbra frame group (lit)"),
            layout: &layouts.frame_lit,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: frame.camera_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: frame.light_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(view) },
            ],
        });
        frame.lit_group = Some((generation, group));
    }

    fn upload_meshes(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) {
        let Some(layouts) = self.layouts.as_ref() else { return };

        for (id, mesh) in scene.meshes() {
            let geometry = &mesh.geometry;
            if geometry.indices.is_empty() {
                continue;
            }

            let stale = self.meshes.get(&id).is_none_or(|g| {
                g.vertex_count != geometry.vertices.len() || g.index_count as usize != geometry.indices.len()
            });
            if stale {
                self.meshes.insert(id, create_gpu_mesh(ctx.device, layouts, mesh));
            }

            if let Some(gpu_mesh) = self.meshes.get(&id) {
                let entity = EntityUniform::from_mesh(mesh);
                ctx.queue.write_buffer(&gpu_mesh.entity_ubo, 0, bytemuck::bytes_of(&entity));
            }
        }
    }

    fn upload_materials(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) -> Result<()> {
        let Some(layouts) = self.layouts.as_ref() else { return Ok(()) };

        for (_, mesh) in scene.meshes() {
            let material = mesh_material(scene, mesh)?;
            upload_material(&mut self.materials, ctx, layouts, material);
            if mesh.cast_shadow {
                let depth = shadow_material(&self.default_depth, scene, mesh);
                upload_material(&mut self.materials, ctx, layouts, depth);
            }
        }
        Ok(())
    }

    fn write_frame_uniforms(
        &self,
        ctx: &RenderCtx<'_>,
        scene: &Scene,
        camera: &PerspectiveCamera,
        shadows: bool,
    ) {
        let Some(frame) = self.frame.as_ref() else { return };

        let cam = CameraUniform::from_camera(camera);
        ctx.queue.write_buffer(&frame.camera_ubo, 0, bytemuck::bytes_of(&cam));

        let light = scene.directional.as_ref();
        if let Some(l) = light {
            let shadow_cam = CameraUniform::new(l.shadow_view_proj(), l.position);
            ctx.queue.write_buffer(&frame.shadow_camera_ubo, 0, bytemuck::bytes_of(&shadow_cam));
        }

        let lights = LightUniform::new(&scene.ambient, light, shadows);
        ctx.queue.write_buffer(&frame.light_ubo, 0, bytemuck::bytes_of(&lights));
    }

    fn check_shadow_depth_choices(&mut self, scene: &Scene) {
        for (_, mesh) in scene.meshes() {
            let ShadowDepth::Custom(id) = mesh.shadow_depth else { continue };
            let Some(material) = scene.material(id) else { continue };

            if material.lights() {
                if !self.warned_lit_depth {
                    log::warn!(
                        "mesh '{}': shadow-depth material '{}' reads lights; using the default depth material",
                        mesh.label,
                        material.label()
                    );
                    self.warned_lit_depth = true;
                }
            } else if material.depth_packing() != Some(DepthPacking::Rgba) && !self.warned_depth_packing {
                log::warn!(
                    "mesh '{}': shadow-depth material '{}' is not RGBA-packed; shadows will be wrong",
                    mesh.label,
                    material.label()
                );
                self.warned_depth_packing = true;
            }
        }
    }
}

fn mesh_material<'s>(scene: &'s Scene, mesh: &Mesh) -> Result<&'s Material> {
    scene
        .material(mesh.material)
        .with_context(|| format!("mesh '{}' references a missing material", mesh.label))
}

/// Program drawing `mesh` into the shadow map.
fn shadow_material<'a>(default: &'a Material, scene: &'a Scene, mesh: &Mesh) -> &'a Material {
    match mesh.shadow_depth {
        ShadowDepth::Custom(id) => match scene.material(id) {
            Some(m) if !m.lights() => m,
            _ => default,
        },
        ShadowDepth::EngineDefault => default,
    }
}

fn ensure_pipeline(
    pipelines: &mut HashMap<PipelineKey, wgpu::RenderPipeline>,
    device: &wgpu::Device,
    layouts: &Layouts,
    material: &Material,
    pass: Pass,
    format: wgpu::TextureFormat,
) {
    let key = PipelineKey { material: material.uid(), pass, format };
    if pipelines.contains_key(&key) {
        return;
    }
    log::debug!("building {pass:?} pipeline for '{}' ({format:?})", material.label());
    pipelines.insert(key, pipeline::build(device, layouts, material, pass, format));
}

fn upload_material(
    materials: &mut HashMap<u64, GpuMaterial>,
    ctx: &RenderCtx<'_>,
    layouts: &Layouts,
    material: &Material,
) {
    let bytes = material.uniform_bytes();

    let gpu = materials.entry(material.uid()).or_insert_with(|| {
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(material.label()),
            size: bytes.len() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(material.label()),
            layout: &layouts.material,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() }],
        });
        GpuMaterial { ubo, group }
    });

    ctx.queue.write_buffer(&gpu.ubo, 0, &bytes);
}

fn create_gpu_mesh(device: &wgpu::Device, layouts: &Layouts, mesh: &Mesh) -> GpuMesh {
    let geometry = &mesh.geometry;

    let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&mesh.label),
        contents: bytemuck::cast_slice(&geometry.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&mesh.label),
        contents: bytemuck::cast_slice(&geometry.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let entity_ubo = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&mesh.label),
        size: std::mem::size_of::<EntityUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let entity_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&mesh.label),
        layout: &layouts.entity,
        entries: &[wgpu::BindGroupEntry { binding: 0, resource: entity_ubo.as_entire_binding() }],
    });

    GpuMesh {
        vbo,
        ibo,
        vertex_count: geometry.vertices.len(),
        index_count: geometry.indices.len() as u32,
        entity_ubo,
        entity_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, MaterialId};

    fn scene_with(shadow_depth: impl FnOnce(MaterialId, MaterialId) -> ShadowDepth) -> (Scene, Mesh) {
        let mut scene = Scene::new();
        let lit = scene.add_material(Material::lambert(Color::WHITE).unwrap());
        let depth = scene.add_material(Material::depth(DepthPacking::Rgba).unwrap());
        let mut mesh = Mesh::new("sphere", Geometry::sphere(1.0, 8, 6), lit);
        mesh.shadow_depth = shadow_depth(lit, depth);
        (scene, mesh)
    }

    #[test]
    fn new_renderer_has_no_size_and_shadows_off() {
        let r = Renderer::new().unwrap();
        assert_eq!(r.size(), (0, 0));
        assert!(!r.shadow_map.enabled);
        assert_eq!(r.shadow_map_size(), None);
    }

    #[test]
    fn set_size_is_reported_back() {
        let mut r = Renderer::new().unwrap();
        r.set_size(800, 600);
        r.set_size(800, 600);
        assert_eq!(r.size(), (800, 600));
    }

    #[test]
    fn custom_shadow_depth_resolves_to_scene_material() {
        let r = Renderer::new().unwrap();
        let (scene, mesh) = scene_with(|_, depth| ShadowDepth::Custom(depth));
        let chosen = shadow_material(&r.default_depth, &scene, &mesh);
        assert_ne!(chosen.uid(), r.default_depth.uid());
    }

    #[test]
    fn engine_default_uses_renderer_depth_material() {
        let r = Renderer::new().unwrap();
        let (scene, mesh) = scene_with(|_, _| ShadowDepth::EngineDefault);
        assert_eq!(shadow_material(&r.default_depth, &scene, &mesh).uid(), r.default_depth.uid());
    }

    #[test]
    fn lit_custom_depth_falls_back_to_default() {
        let r = Renderer::new().unwrap();
        let (scene, mesh) = scene_with(|lit, _| ShadowDepth::Custom(lit));
        assert_eq!(shadow_material(&r.default_depth, &scene, &mesh).uid(), r.default_depth.uid());
    }

    #[test]
    fn missing_material_is_an_error() {
        let (scene, mesh) = scene_with(|_, _| ShadowDepth::EngineDefault);
        assert!(mesh_material(&scene, &mesh).is_ok());
        assert!(mesh_material(&Scene::new(), &mesh).is_err());
    }
}
