//! Random direction and frame helpers shared by geometry and media.
//!
//! All samplers draw from an injected `RngCore` so each light path can own
//! an independent, seedable stream.

use crate::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniformly distributed point on the unit sphere.
pub fn sample_spherical(rng: &mut dyn RngCore) -> Vec3 {
    let z = rng.gen_range(-1.0f32..=1.0);
    let phi = rng.gen_range(0.0..2.0 * PI);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Cosine-weighted direction on the hemisphere around `normal`.
pub fn sample_cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let r1: f32 = rng.gen();
    let r2: f32 = rng.gen();
    let phi = 2.0 * PI * r1;
    let r = r2.sqrt();
    let (x_hat, y_hat) = orthonormal_frame(normal);
    (x_hat * r * phi.cos() + y_hat * r * phi.sin() + normal * (1.0 - r2).max(0.0).sqrt())
        .normalize()
}

/// Two unit vectors that complete `z` (unit length) to an orthonormal frame.
#[inline]
pub fn orthonormal_frame(z: Vec3) -> (Vec3, Vec3) {
    z.any_orthonormal_pair()
}
