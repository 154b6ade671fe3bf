//! Direct lighting (next-event estimation) used by scattering media.

use crate::{find_closest_hit, MediumStack, Object};
use murk_math::{Color, Ray, Vec3, EPSILON};
use rand::{Rng, RngCore};

/// Incident radiance estimate and the direction it was sampled along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightEstimate {
    pub radiance: Color,
    pub direction: Vec3,
}

impl LightEstimate {
    fn dark(direction: Vec3) -> Self {
        Self {
            radiance: Color::ZERO,
            direction,
        }
    }
}

/// Estimates radiance arriving at a point directly from light sources.
pub trait DirectLighting: Send + Sync {
    /// `media` is the stack of the path at `point`; its current medium
    /// attenuates the shadow ray.
    fn estimate(
        &self,
        point: Vec3,
        objects: &[Object],
        media: &MediumStack<'_>,
        rng: &mut dyn RngCore,
    ) -> LightEstimate;
}

/// Samples one emitter uniformly, then a point on it.
///
/// Holds indices into the object list it was built from; pass the same list
/// to [`DirectLighting::estimate`].
///
/// Shadow rays treat every object as opaque, volume boundaries included.
/// From inside a bounded medium only emitters within the same boundary are
/// visible, and the current medium attenuates the whole shadow ray.
#[derive(Debug, Clone, Default)]
pub struct LightSampler {
    emitters: Vec<usize>,
}

impl LightSampler {
    pub fn new(objects: &[Object]) -> Self {
        let emitters: Vec<usize> = objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.is_light())
            .map(|(index, _)| index)
            .collect();
        log::debug!("Light sampler found {} emitters", emitters.len());
        Self { emitters }
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }
}

impl DirectLighting for LightSampler {
    fn estimate(
        &self,
        point: Vec3,
        objects: &[Object],
        media: &MediumStack<'_>,
        rng: &mut dyn RngCore,
    ) -> LightEstimate {
        if self.emitters.is_empty() {
            return LightEstimate::dark(Vec3::ZERO);
        }

        let index = self.emitters[rng.gen_range(0..self.emitters.len())];
        let emitter = &objects[index];
        let Some(sample) = emitter.random_light_point(point, rng) else {
            return LightEstimate::dark(Vec3::ZERO);
        };

        let to_light = sample.point - point;
        let distance = to_light.length();
        if distance <= EPSILON {
            return LightEstimate::dark(Vec3::ZERO);
        }
        let direction = to_light / distance;
        if sample.inverse_pdf <= 0.0 {
            return LightEstimate::dark(direction);
        }

        // The shadow ray must reach the sampled point on the chosen emitter
        let visible = find_closest_hit(&Ray::new(point, direction), objects).is_some_and(|hit| {
            hit.object_index == index && (hit.distance - distance).abs() <= 1e-3 * distance.max(1.0)
        });
        if !visible {
            return LightEstimate::dark(direction);
        }

        let transmittance = media
            .current()
            .map_or(Color::ONE, |medium| medium.transmittance(distance));
        LightEstimate {
            radiance: emitter.emission(sample.point)
                * transmittance
                * sample.inverse_pdf
                * self.emitters.len() as f32,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffuseLight, Lambertian, Material, Medium, Rectangle, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::PI;
    use std::sync::Arc;

    fn scene() -> Vec<Object> {
        let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(1.0)));
        let grey: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        vec![
            Object::new(Rectangle::new(Vec3::new(0.0, -5.0, 0.0), Vec3::X, Vec3::Z, 50.0, 50.0), grey),
            Object::new(Sphere::new(Vec3::new(0.0, 4.0, 0.0), 1.0), light),
        ]
    }

    #[test]
    fn test_finds_only_emitters() {
        let objects = scene();
        let sampler = LightSampler::new(&objects);
        assert_eq!(sampler.emitter_count(), 1);
        assert_eq!(LightSampler::new(&[]).emitter_count(), 0);
    }

    #[test]
    fn test_sphere_light_matches_solid_angle() {
        let objects = scene();
        let sampler = LightSampler::new(&objects);
        let media = MediumStack::default();
        let mut rng = StdRng::seed_from_u64(8);

        let estimate = sampler.estimate(Vec3::ZERO, &objects, &media, &mut rng);
        let cos_theta_max = (1.0f32 - 1.0 / 16.0).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        assert!((estimate.radiance.x - solid_angle).abs() < 1e-4);
        assert!(estimate.direction.y > 0.9);
    }

    #[test]
    fn test_occluded_light_is_dark() {
        let mut objects = scene();
        let blocker: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        objects.push(Object::new(
            Rectangle::new(Vec3::new(0.0, 2.0, 0.0), Vec3::X, Vec3::Z, 10.0, 10.0),
            blocker,
        ));
        let sampler = LightSampler::new(&objects);
        let media = MediumStack::default();
        let mut rng = StdRng::seed_from_u64(8);

        let estimate = sampler.estimate(Vec3::ZERO, &objects, &media, &mut rng);
        assert_eq!(estimate.radiance, Color::ZERO);
    }

    #[test]
    fn test_volume_boundary_occludes_outside_lights() {
        let mut objects = scene();
        let boundary: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        objects.push(Object::new(Sphere::new(Vec3::ZERO, 2.0), boundary));
        let small_light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::ONE));
        objects.push(Object::new(Sphere::new(Vec3::new(0.0, 0.0, 1.0), 0.25), small_light));
        let sampler = LightSampler::new(&objects);
        let media = MediumStack::default();
        let mut rng = StdRng::seed_from_u64(12);

        // Only the light inside the boundary ever contributes
        let mut lit = 0;
        for _ in 0..200 {
            let estimate = sampler.estimate(Vec3::ZERO, &objects, &media, &mut rng);
            if estimate.radiance.x > 0.0 {
                lit += 1;
                assert!(estimate.direction.z > 0.9);
            }
        }
        assert!(lit > 50 && lit < 150, "lit {} of 200", lit);
    }

    #[test]
    fn test_current_medium_attenuates() {
        let objects = scene();
        let sampler = LightSampler::new(&objects);
        let fog = Medium::absorbing(Color::new(0.0, 0.5, 1.0));
        let media = MediumStack::with_media(1, [(1, &fog)]).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let clear = sampler.estimate(Vec3::ZERO, &objects, &MediumStack::default(), &mut rng);
        let foggy = sampler.estimate(Vec3::ZERO, &objects, &media, &mut rng);
        assert!((foggy.radiance.x - clear.radiance.x).abs() < 1e-5);
        assert!(foggy.radiance.y < clear.radiance.y);
        assert!(foggy.radiance.z < foggy.radiance.y);
    }
}
