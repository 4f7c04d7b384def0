use anyhow::{Context, Result};
use glam::Vec2;
use winit::dpi::PhysicalSize;

use umbra_engine::core::{App, AppControl, FrameCtx};
use umbra_engine::input::{InputFrame, Key};
use umbra_engine::render::{OverlayRenderer, Renderer};
use umbra_engine::scene::{PerspectiveCamera, Scene, ShadowDepth};

use crate::config::DemoConfig;
use crate::panel::{Checkbox, DebugPanel};
use crate::scene::{self as composition, SceneHandles};
use crate::shaders;

/// The boiling-sphere demo: owns the scene, camera and renderers, and drives
/// them once per frame.
pub struct Demo {
    config: DemoConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    handles: SceneHandles,
    renderer: Renderer,
    overlay: OverlayRenderer,
    panel: DebugPanel,
    compiled: bool,
    title_dirty: bool,
}

impl Demo {
    pub fn new(config: DemoConfig) -> Result<Self> {
        let (scene, handles) = composition::compose(&config).context("failed to build scene materials")?;
        let camera = composition::camera(&config, config.initial_aspect());

        let mut renderer = Renderer::new().context("failed to build renderer materials")?;
        renderer.shadow_map.enabled = true;

        let panel = DebugPanel::new(Checkbox::new().checked(config.use_custom_depth_material));

        let pole = shaders::displace(glam::Vec3::Y, glam::Vec3::Y, 0.0);
        log::debug!("north pole at t=0 displaced to {pole}");

        Ok(Self {
            config,
            scene,
            camera,
            handles,
            renderer,
            overlay: OverlayRenderer::new(),
            panel,
            compiled: false,
            title_dirty: true,
        })
    }

    /// Advances the animation: rotates the sphere by one step and sets both
    /// sphere programs' `time` to `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f32) -> Result<()> {
        let step = self.config.rotation_step;
        let sphere = self.scene.mesh_mut(self.handles.sphere).context("sphere mesh missing")?;
        sphere.transform.rotation.x += step;
        sphere.transform.rotation.y += step;

        for id in [self.handles.color_material, self.handles.depth_material] {
            self.scene
                .material_mut(id)
                .context("sphere material missing")?
                .set_uniform("time", elapsed)?;
        }
        Ok(())
    }

    /// Matches renderer size and camera aspect to a new drawable size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.set_size(width, height);
        self.camera.aspect = width as f32 / height as f32;
        self.camera.update_projection_matrix();
        log::debug!("resized to {width}x{height}");
    }

    pub fn use_custom_depth_material(&self) -> bool {
        self.panel.checkbox.is_checked()
    }

    /// Switches the sphere's shadow program between its own depth material
    /// and the renderer's default.
    pub fn set_use_custom_depth_material(&mut self, on: bool) {
        self.panel.checkbox.set_checked(on);
        self.apply_shadow_depth();
    }

    pub fn title(&self) -> String {
        format!("{} | useCustomDepthMaterial: {}", self.config.title, self.use_custom_depth_material())
    }

    fn apply_shadow_depth(&mut self) {
        let on = self.use_custom_depth_material();
        let depth = if on { ShadowDepth::Custom(self.handles.depth_material) } else { ShadowDepth::EngineDefault };
        if let Some(sphere) = self.scene.mesh_mut(self.handles.sphere) {
            sphere.shadow_depth = depth;
        }
        self.title_dirty = true;
        log::info!("useCustomDepthMaterial = {on}");
    }

    fn handle_input(&mut self, input: &InputFrame, viewport: Vec2) -> AppControl {
        if input.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if input.key_pressed(Key::C) {
            self.set_use_custom_depth_material(!self.use_custom_depth_material());
        }
        for &click in &input.clicks {
            if self.panel.click(click, viewport).is_some() {
                self.apply_shadow_depth();
            }
        }
        AppControl::Continue
    }
}

impl App for Demo {
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        self.resize(size.width, size.height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.logical_size();
        if self.handle_input(ctx.input_frame, viewport) == AppControl::Exit {
            return AppControl::Exit;
        }

        if let Err(e) = self.tick(ctx.time.elapsed) {
            log::error!("animation step failed: {e:#}");
            return AppControl::Exit;
        }

        if self.title_dirty {
            ctx.runtime.set_title(self.title());
            self.title_dirty = false;
        }

        let pointer = ctx.input.pointer_pos;
        let Self { scene, camera, renderer, overlay, panel, compiled, .. } = self;
        ctx.render(|rctx, target| {
            if !*compiled {
                renderer.compile(rctx, scene)?;
                *compiled = true;
                log::info!("pipelines compiled for {} meshes", scene.meshes().count());
            }
            renderer.render(rctx, target, scene, camera)?;
            overlay.render(rctx, target, &panel.paint(rctx.viewport.logical_size(), pointer));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use umbra_engine::shader::UniformValue;

    fn demo() -> Demo {
        Demo::new(DemoConfig::default()).unwrap()
    }

    fn time_of(d: &Demo, id: umbra_engine::scene::MaterialId) -> f32 {
        d.scene.material(id).and_then(|m| m.uniform("time")).and_then(UniformValue::as_float).unwrap()
    }

    fn sphere_depth(d: &Demo) -> ShadowDepth {
        d.scene.mesh(d.handles.sphere).unwrap().shadow_depth
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn both_programs_share_time() {
        let mut d = demo();
        for t in [0.016, 0.5, 12.25] {
            d.tick(t).unwrap();
            assert_eq!(time_of(&d, d.handles.color_material), t);
            assert_eq!(time_of(&d, d.handles.depth_material), t);
        }
    }

    #[test]
    fn rotation_advances_per_tick() {
        let mut d = demo();
        for _ in 0..3 {
            d.tick(0.0).unwrap();
        }
        let rot = d.scene.mesh(d.handles.sphere).unwrap().transform.rotation;
        assert!((rot.x - 0.03).abs() < 1e-6);
        assert!((rot.y - 0.03).abs() < 1e-6);
        assert_eq!(rot.z, 0.0);
    }

    #[test]
    fn pole_vertex_boils_at_time_zero() {
        let mut d = demo();
        d.tick(0.0).unwrap();
        let t = time_of(&d, d.handles.depth_material);

        let v = d.scene.mesh(d.handles.sphere).unwrap().geometry.vertices[0];
        let p = Vec3::from(v.position);
        let n = Vec3::from(v.normal);
        assert!((p - Vec3::Y).length() < 1e-6);

        let moved = shaders::displace(p, n, t);
        assert!((moved.y - 1.4507).abs() < 0.02);
        assert!(moved.x.abs() < 1e-4 && moved.z.abs() < 1e-4);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_updates_renderer_and_camera() {
        let mut d = demo();
        let before = d.camera.projection();
        d.resize(800, 600);
        assert_eq!(d.renderer.size(), (800, 600));
        assert!((d.camera.aspect - 4.0 / 3.0).abs() < 1e-6);
        assert_ne!(d.camera.projection(), before);
    }

    #[test]
    fn zero_resize_is_ignored() {
        let mut d = demo();
        d.resize(800, 600);
        d.resize(0, 600);
        assert_eq!(d.renderer.size(), (800, 600));
    }

    // ── toggle ────────────────────────────────────────────────────────────

    #[test]
    fn toggle_swaps_shadow_depth() {
        let mut d = demo();
        assert!(d.use_custom_depth_material());
        assert_eq!(sphere_depth(&d), ShadowDepth::Custom(d.handles.depth_material));

        d.set_use_custom_depth_material(false);
        assert_eq!(sphere_depth(&d), ShadowDepth::EngineDefault);
        assert!(d.title().ends_with("useCustomDepthMaterial: false"));

        d.set_use_custom_depth_material(true);
        assert_eq!(sphere_depth(&d), ShadowDepth::Custom(d.handles.depth_material));
    }

    #[test]
    fn toggle_on_then_off_restores_engine_default() {
        let mut d = Demo::new(DemoConfig::default().use_custom_depth_material(false)).unwrap();
        assert!(!d.use_custom_depth_material());
        assert_eq!(sphere_depth(&d), ShadowDepth::EngineDefault);

        d.set_use_custom_depth_material(true);
        assert_eq!(sphere_depth(&d), ShadowDepth::Custom(d.handles.depth_material));

        d.set_use_custom_depth_material(false);
        assert_eq!(sphere_depth(&d), ShadowDepth::EngineDefault);
        assert!(!d.use_custom_depth_material());
    }

    #[test]
    fn c_key_toggles_and_escape_exits() {
        let mut d = demo();
        let viewport = Vec2::new(800.0, 600.0);

        let mut frame = InputFrame::default();
        frame.keys_pressed.insert(Key::C);
        assert_eq!(d.handle_input(&frame, viewport), AppControl::Continue);
        assert!(!d.use_custom_depth_material());

        let mut frame = InputFrame::default();
        frame.keys_pressed.insert(Key::Escape);
        assert_eq!(d.handle_input(&frame, viewport), AppControl::Exit);
    }

    #[test]
    fn panel_click_toggles() {
        let mut d = demo();
        let viewport = Vec2::new(800.0, 600.0);
        let target = d.panel.layout(viewport).checkbox.origin + Vec2::splat(4.0);

        let mut frame = InputFrame::default();
        frame.clicks.push(target);
        d.handle_input(&frame, viewport);
        assert_eq!(sphere_depth(&d), ShadowDepth::EngineDefault);
    }
}
