//! CPU mirror of the `packing` chunk.
//!
//! Same operations in the same order as the WGSL, evaluated in `f32`, so
//! tests can reason about what the shadow map stores without a GPU.

const PACK_UPSCALE: f32 = 256.0 / 255.0;
const UNPACK_DOWNSCALE: f32 = 255.0 / 256.0;
const SHIFT_RIGHT_8: f32 = 1.0 / 256.0;
const PACK_FACTORS: [f32; 3] = [16_777_216.0, 65_536.0, 256.0];

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Spreads a `[0, 1]` depth over four channels, least significant first.
pub fn pack_depth_to_rgba(v: f32) -> [f32; 4] {
    let [fx, fy, fz] = PACK_FACTORS.map(|k| fract(v * k));
    [
        fx * PACK_UPSCALE,
        (fy - fx * SHIFT_RIGHT_8) * PACK_UPSCALE,
        (fz - fy * SHIFT_RIGHT_8) * PACK_UPSCALE,
        (v - fz * SHIFT_RIGHT_8) * PACK_UPSCALE,
    ]
}

pub fn unpack_rgba_to_depth(rgba: [f32; 4]) -> f32 {
    let factors = [
        UNPACK_DOWNSCALE / PACK_FACTORS[0],
        UNPACK_DOWNSCALE / PACK_FACTORS[1],
        UNPACK_DOWNSCALE / PACK_FACTORS[2],
        UNPACK_DOWNSCALE,
    ];
    rgba.iter().zip(factors).map(|(c, k)| c * k).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// What an `Rgba8Unorm` target stores for a channel value.
    fn quantize(c: f32) -> f32 {
        (c.clamp(0.0, 1.0) * 255.0).round() / 255.0
    }

    #[test]
    fn rgba8_round_trip_keeps_depth() {
        let mut v = 0.0f32;
        while v < 1.0 {
            let stored = pack_depth_to_rgba(v).map(quantize);
            let back = unpack_rgba_to_depth(stored);
            assert!((back - v).abs() < 1e-6, "depth {v} came back as {back}");
            v += 0.0137;
        }
    }

    #[test]
    fn channels_stay_in_unit_range() {
        for v in [0.0, 0.1, 0.5, 0.9, 0.999] {
            for c in pack_depth_to_rgba(v) {
                assert!((0.0..=1.0).contains(&c), "channel {c} for depth {v}");
            }
        }
    }

    #[test]
    fn white_clear_reads_as_far() {
        let far = unpack_rgba_to_depth([1.0; 4]);
        assert!(far > 0.9999 && far <= 1.0);
    }
}
