use umbra_engine::paint::Color;

/// Startup parameters of the demo. `Default` is the canonical scene.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub window_size: (f64, f64),

    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub camera_distance: f32,

    pub sphere_color: Color,
    pub sphere_segments: (u32, u32),
    pub plane_size: f32,
    pub plane_height: f32,
    pub ambient_color: Color,

    /// Radians added to the sphere's X and Y rotation every frame.
    pub rotation_step: f32,
    /// Initial state of the custom shadow-depth toggle.
    pub use_custom_depth_material: bool,

    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "umbra · boiling sphere".to_string(),
            window_size: (1280.0, 720.0),
            fov_y_deg: 75.0,
            near: 0.1,
            far: 100.0,
            camera_distance: 4.0,
            sphere_color: Color::from_hex(0x6699ff),
            sphere_segments: (8, 6),
            plane_size: 5.0,
            plane_height: -1.5,
            ambient_color: Color::from_hex(0x404040),
            rotation_step: 0.01,
            use_custom_depth_material: true,
            log_filter: "info,wgpu_core=warn,wgpu_hal=warn,naga=warn".to_string(),
        }
    }
}

impl DemoConfig {
    pub fn use_custom_depth_material(mut self, v: bool) -> Self { self.use_custom_depth_material = v; self }

    /// Width over height of the initial window.
    pub fn initial_aspect(&self) -> f32 {
        let (w, h) = self.window_size;
        if h > 0.0 { (w / h) as f32 } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_canonical_scene() {
        let c = DemoConfig::default();
        assert_eq!((c.fov_y_deg, c.near, c.far, c.camera_distance), (75.0, 0.1, 100.0, 4.0));
        assert_eq!(c.sphere_segments, (8, 6));
        assert!(c.use_custom_depth_material);
    }

    #[test]
    fn aspect_from_window_size() {
        let c = DemoConfig { window_size: (800.0, 600.0), ..DemoConfig::default() }
            .use_custom_depth_material(false);
        assert!((c.initial_aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert!(!c.use_custom_depth_material);
    }
}
