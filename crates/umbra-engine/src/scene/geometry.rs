use std::f64::consts::PI;

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex as laid out in the GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Indexed triangle list, counter-clockwise front faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// UV sphere centred at the origin.
    ///
    /// `(width_segments + 1) * (height_segments + 1)` vertices; the pole rows
    /// are duplicated per column so each column gets its own UV. Triangles that
    /// would be degenerate at the poles are skipped.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            // Centre pole UVs over their column.
            let u_offset = match iy {
                0 => 0.5 / ws as f32,
                _ if iy == hs => -0.5 / ws as f32,
                _ => 0.0,
            };

            let (sin_theta, cos_theta) = (f64::from(v) * PI).sin_cos();
            let row_start = vertices.len();
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let uv = [u + u_offset, 1.0 - v];

                // The seam column shares its partner's position bit for bit.
                if ix == ws {
                    let first = vertices[row_start];
                    vertices.push(Vertex { uv, ..first });
                    continue;
                }

                let (sin_phi, cos_phi) = (f64::from(u) * 2.0 * PI).sin_cos();
                let r = f64::from(radius);
                let position = [
                    snap(-r * cos_phi * sin_theta),
                    snap(r * cos_theta),
                    snap(r * sin_phi * sin_theta),
                ];
                let normal = glam::Vec3::from_array(position).normalize_or_zero().to_array();
                vertices.push(Vertex { position, normal, uv });
            }
        }

        let row = ws + 1;
        let mut indices = Vec::new();
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Single-quad plane in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let normal = [0.0, 0.0, 1.0];

        let mut vertices = Vec::with_capacity(4);
        for iy in 0..=1u32 {
            let y = iy as f32 * height - hh;
            for ix in 0..=1u32 {
                let x = ix as f32 * width - hw;
                vertices.push(Vertex {
                    position: [x, -y, 0.0],
                    normal,
                    uv: [ix as f32, 1.0 - iy as f32],
                });
            }
        }

        // a = top-left, b = bottom-left, c = bottom-right, d = top-right
        let (a, b, c, d) = (0, 2, 3, 1);
        Self { vertices, indices: vec![a, b, d, b, c, d] }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Narrows to `f32`, flushing trig residue (`sin(PI)` and friends) to zero.
fn snap(x: f64) -> f32 {
    if x.abs() < 1e-9 { 0.0 } else { x as f32 }
}
