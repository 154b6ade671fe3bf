//! Infinite plane and the finite rectangle built on it.

use super::{Surface, SurfaceSample};
use murk_math::{Interval, Ray, Vec3, EPSILON};
use rand::{Rng, RngCore};

/// An infinite plane through `center`, spanned by two in-plane axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    center: Vec3,
    v1: Vec3,
    v2: Vec3,
    normal: Vec3,
}

impl Plane {
    /// Create a plane. The normal is `v1 × v2`, so the axis order picks the
    /// front side.
    pub fn new(center: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let v1 = v1.normalize();
        let v2 = v2.normalize();
        Self {
            center,
            v1,
            v2,
            normal: v1.cross(v2).normalize(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Ray-plane distance with the ray origin already shifted into the
    /// plane-centered frame. `None` for rays (nearly) parallel to the plane.
    fn distance_in_centered_frame(&self, shifted_origin: Vec3, direction: Vec3) -> Option<f32> {
        let direction_dot_normal = -direction.dot(self.normal);
        if direction_dot_normal.abs() < EPSILON {
            return None;
        }
        Some(shifted_origin.dot(self.normal) / direction_dot_normal)
    }

    /// In-plane coordinates of a point along both axes.
    #[inline]
    fn local(&self, point: Vec3) -> (f32, f32) {
        let shifted = point - self.center;
        (shifted.dot(self.v1), shifted.dot(self.v2))
    }
}

impl Surface for Plane {
    fn uv(&self, point: Vec3) -> (f32, f32) {
        let (x, y) = self.local(point);
        (0.5 - x, 0.5 - y)
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let shifted = ray.origin() - self.center;
        let t = self.distance_in_centered_frame(shifted, ray.direction())?;
        ray_t.surrounds(t).then_some(t)
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }
}

/// A finite rectangle centered on its plane's center.
///
/// `v1` and `v2` are expected to be perpendicular.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    plane: Plane,
    /// Side length along `v1`
    width: f32,
    /// Side length along `v2`
    height: f32,
    area: f32,
}

impl Rectangle {
    pub fn new(center: Vec3, v1: Vec3, v2: Vec3, width: f32, height: f32) -> Self {
        Self {
            plane: Plane::new(center, v1, v2),
            width,
            height,
            area: width * height,
        }
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }
}

impl Surface for Rectangle {
    fn uv(&self, point: Vec3) -> (f32, f32) {
        let (x, y) = self.plane.local(point);
        (0.5 - x / self.width, 0.5 - y / self.height)
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let shifted = ray.origin() - self.plane.center;
        let t = self
            .plane
            .distance_in_centered_frame(shifted, ray.direction())?;
        if !ray_t.surrounds(t) {
            return None;
        }

        let (x, y) = self.plane.local(ray.at(t));
        if x.abs() > self.width / 2.0 + EPSILON || y.abs() > self.height / 2.0 + EPSILON {
            return None;
        }
        Some(t)
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.plane.normal
    }
}

impl SurfaceSample for Rectangle {
    fn area(&self) -> f32 {
        self.area
    }

    fn random_surface_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let r1 = rng.gen_range(-half_w..=half_w);
        let r2 = rng.gen_range(-half_h..=half_h);
        self.plane.v1 * r1 + self.plane.v2 * r2 + self.plane.center
    }
}
