use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Position, Euler rotation and scale of a scene node.
///
/// Rotation is in radians, applied X then Y then Z in the node's local frame
/// (matrix `Rx * Ry * Rz`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE }
    }
}

impl Transform {
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-world matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Inverse-transpose of the linear part; keeps normals perpendicular under
    /// non-uniform scale.
    pub fn normal_matrix(&self) -> Mat4 {
        let linear = Mat3::from_mat4(self.matrix());
        Mat4::from_mat3(linear.inverse().transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn x_rotation_by_minus_half_pi_turns_plus_z_up() {
        let t = Transform { rotation: Vec3::new(-FRAC_PI_2, 0.0, 0.0), ..Transform::default() };
        assert!(close(t.matrix().transform_vector3(Vec3::Z), Vec3::Y));
    }

    #[test]
    fn rotation_order_is_x_then_y_then_z() {
        let r = Vec3::new(0.3, 0.7, -0.2);
        let t = Transform { rotation: r, ..Transform::default() };
        let expected = Mat4::from_rotation_x(r.x) * Mat4::from_rotation_y(r.y) * Mat4::from_rotation_z(r.z);
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(close(t.matrix().transform_point3(p), expected.transform_point3(p)));
    }

    #[test]
    fn translation_applies_after_rotation() {
        let t = Transform {
            position: Vec3::new(0.0, -1.5, 0.0),
            rotation: Vec3::new(-FRAC_PI_2, 0.0, 0.0),
            ..Transform::default()
        };
        assert!(close(t.matrix().transform_point3(Vec3::ZERO), Vec3::new(0.0, -1.5, 0.0)));
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let t = Transform { scale: Vec3::new(2.0, 1.0, 1.0), ..Transform::default() };
        let n = t.normal_matrix().transform_vector3(Vec3::X);
        assert!(close(n, Vec3::new(0.5, 0.0, 0.0)));
    }
}
