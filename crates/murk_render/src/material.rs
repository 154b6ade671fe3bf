//! Material trait for surface shading.

use crate::{Hit, Object};
use murk_math::sampling::sample_cosine_hemisphere;
use murk_math::{Color, Vec3};
use rand::RngCore;

/// Outgoing direction and throughput from a BRDF sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrdfSample {
    pub direction: Vec3,
    /// BRDF × cosine / pdf
    pub weight: Color,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Reflectance at the given surface coordinates.
    fn eval(&self, u: f32, v: f32) -> Color;

    /// Sample an outgoing direction at `hit`.
    ///
    /// Returns None if the ray is absorbed.
    fn sample(
        &self,
        hit: &Hit,
        objects: &[Object],
        u: f32,
        v: f32,
        rng: &mut dyn RngCore,
    ) -> Option<BrdfSample>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emission(&self, _u: f32, _v: f32) -> Color {
        Color::ZERO
    }

    /// True if the material emits light and should be sampled as a light.
    fn is_emissive(&self) -> bool {
        false
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn eval(&self, _u: f32, _v: f32) -> Color {
        self.albedo
    }

    fn sample(
        &self,
        hit: &Hit,
        _objects: &[Object],
        _u: f32,
        _v: f32,
        rng: &mut dyn RngCore,
    ) -> Option<BrdfSample> {
        // Scatter on the side the ray arrived from
        let normal = if hit.incoming.dot(hit.normal) > 0.0 {
            -hit.normal
        } else {
            hit.normal
        };
        Some(BrdfSample {
            direction: sample_cosine_hemisphere(normal, rng),
            weight: self.albedo,
        })
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn eval(&self, _u: f32, _v: f32) -> Color {
        Color::ZERO
    }

    fn sample(
        &self,
        _hit: &Hit,
        _objects: &[Object],
        _u: f32,
        _v: f32,
        _rng: &mut dyn RngCore,
    ) -> Option<BrdfSample> {
        // Lights don't scatter rays
        None
    }

    fn emission(&self, _u: f32, _v: f32) -> Color {
        self.emit
    }

    fn is_emissive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{find_closest_hit, Sphere};
    use murk_math::Ray;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_lambertian_scatters_toward_incoming_side() {
        let objects = vec![Object::new(
            Sphere::new(Vec3::ZERO, 1.0),
            Arc::new(Lambertian::new(Color::new(0.8, 0.4, 0.2))),
        )];
        let mut rng = StdRng::seed_from_u64(42);

        // From outside the sphere
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), -Vec3::Z);
        let hit = find_closest_hit(&ray, &objects).unwrap();
        for _ in 0..100 {
            let sample = objects[0].sample(&hit, &objects, &mut rng).unwrap();
            assert!(sample.direction.dot(hit.normal) >= -1e-6);
            assert_eq!(sample.weight, Color::new(0.8, 0.4, 0.2));
        }

        // From inside the sphere the hemisphere flips
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = find_closest_hit(&ray, &objects).unwrap();
        for _ in 0..100 {
            let sample = objects[0].sample(&hit, &objects, &mut rng).unwrap();
            assert!(sample.direction.dot(hit.normal) <= 1e-6);
        }
    }

    #[test]
    fn test_diffuse_light_absorbs() {
        let objects = vec![Object::new(
            Sphere::new(Vec3::ZERO, 1.0),
            Arc::new(DiffuseLight::new(Color::splat(3.0))),
        )];
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), -Vec3::Z);
        let hit = find_closest_hit(&ray, &objects).unwrap();

        assert!(objects[0].sample(&hit, &objects, &mut rng).is_none());
        assert_eq!(objects[0].emission(hit.point), Color::splat(3.0));
    }
}
