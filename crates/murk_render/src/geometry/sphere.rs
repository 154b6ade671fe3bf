//! Sphere primitive.

use super::{area_to_solid_angle, LightPoint, Surface, SurfaceSample};
use murk_math::sampling::{orthonormal_frame, sample_spherical};
use murk_math::{Interval, Ray, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    radius_squared: f32,
    area: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = radius.max(0.0);
        Self {
            center,
            radius,
            radius_squared: radius * radius,
            area: 4.0 * PI * radius * radius,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Surface for Sphere {
    fn uv(&self, point: Vec3) -> (f32, f32) {
        // Mirror the point on the unit sphere so u runs from the -X side
        let p = -(point - self.center) / self.radius;
        let u = 0.5 + p.z.atan2(p.x) / (2.0 * PI);
        let v = 0.5 + p.y.clamp(-1.0, 1.0).asin() / PI;
        (u, v)
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius_squared;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }
        Some(root)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }
}

impl SurfaceSample for Sphere {
    fn area(&self) -> f32 {
        self.area
    }

    fn random_surface_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        sample_spherical(rng) * self.radius + self.center
    }

    /// Samples the cone the sphere subtends from `reference`.
    ///
    /// Reference points inside the sphere fall back to uniform surface
    /// sampling with the area-to-solid-angle weight.
    fn random_light_point(&self, reference: Vec3, rng: &mut dyn RngCore) -> LightPoint {
        let to_reference = reference - self.center;
        let distance = to_reference.length();
        if distance <= self.radius {
            let point = self.random_surface_point(rng);
            return LightPoint {
                point,
                inverse_pdf: area_to_solid_angle(self, point, reference) * self.area,
            };
        }

        let sin_theta_max = self.radius / distance;
        let cos_theta_max = (1.0 - sin_theta_max * sin_theta_max).max(0.0).sqrt();
        let inverse_pdf = 2.0 * PI * (1.0 - cos_theta_max);

        let cos_theta = 1.0 + rng.gen::<f32>() * (cos_theta_max - 1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Angle at the center between the reference direction and the hit point
        let near = distance * cos_theta
            - (self.radius_squared - (distance * sin_theta).powi(2))
                .max(0.0)
                .sqrt();
        let cos_alpha = ((self.radius_squared + distance * distance - near * near)
            / (2.0 * distance * self.radius))
            .clamp(-1.0, 1.0);
        let sin_alpha = (1.0 - cos_alpha * cos_alpha).max(0.0).sqrt();

        let z_hat = to_reference / distance;
        let (x_hat, y_hat) = orthonormal_frame(z_hat);
        let phi = rng.gen_range(0.0..2.0 * PI);
        let direction =
            x_hat * sin_alpha * phi.cos() + y_hat * sin_alpha * phi.sin() + z_hat * cos_alpha;

        LightPoint {
            point: direction * self.radius + self.center,
            inverse_pdf,
        }
    }
}
