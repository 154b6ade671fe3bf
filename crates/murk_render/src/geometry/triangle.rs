//! Triangle primitive for ray tracing.
//!
//! Intersects the supporting plane first, then accepts the hit only if all
//! three barycentric coordinates are non-negative.

use super::{Surface, SurfaceSample};
use murk_math::{Interval, Ray, Vec2, Vec3, EPSILON};
use rand::{Rng, RngCore};

/// Corner UVs blended by barycentric weight.
const CORNER_UVS: [Vec2; 3] = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];

/// A triangle primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Orthonormal in-plane basis
    e1: Vec3,
    e2: Vec3,
    /// Vertices projected onto the in-plane basis
    c1: Vec2,
    c2: Vec2,
    c3: Vec2,
    det: f32,
    area: f32,
}

impl Triangle {
    /// Create a new triangle from three vertices. The normal follows the
    /// winding `(p2 - p1) × (p3 - p1)`.
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        let e1 = (p2 - p1).normalize();
        let normal = e1.cross((p3 - p1).normalize()).normalize();
        let e2 = normal.cross(e1).normalize();

        let project = |p: Vec3| Vec2::new(p.dot(e1), p.dot(e2));
        let (c1, c2, c3) = (project(p1), project(p2), project(p3));

        let det = (c2.y - c3.y) * (c1.x - c3.x) + (c3.x - c2.x) * (c1.y - c3.y);
        let area = 0.5 * (c1.x * (c2.y - c3.y) + c2.x * (c3.y - c1.y) + c3.x * (c1.y - c2.y)).abs();

        Self {
            p1,
            p2,
            p3,
            normal,
            e1,
            e2,
            c1,
            c2,
            c3,
            det,
            area,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Barycentric weights of `point` (assumed to lie in the triangle's
    /// plane) with respect to `p1`, `p2`, `p3`.
    pub fn barycentric(&self, point: Vec3) -> Vec3 {
        let x = point.dot(self.e1);
        let y = point.dot(self.e2);
        let (c1, c2, c3) = (self.c1, self.c2, self.c3);

        let lambda1 = ((c2.y - c3.y) * (x - c3.x) + (c3.x - c2.x) * (y - c3.y)) / self.det;
        let lambda2 = ((c3.y - c1.y) * (x - c3.x) + (c1.x - c3.x) * (y - c3.y)) / self.det;
        Vec3::new(lambda1, lambda2, 1.0 - lambda1 - lambda2)
    }
}

impl Surface for Triangle {
    fn uv(&self, point: Vec3) -> (f32, f32) {
        let b = self.barycentric(point);
        let uv = CORNER_UVS[0] * b.x + CORNER_UVS[1] * b.y + CORNER_UVS[2] * b.z;
        (uv.x, uv.y)
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let direction_dot_normal = -ray.direction().dot(self.normal);

        // Ray is parallel to triangle
        if direction_dot_normal.abs() < EPSILON {
            return None;
        }

        let shifted = ray.origin() - self.p1;
        let t = shifted.dot(self.normal) / direction_dot_normal;
        if !ray_t.surrounds(t) {
            return None;
        }

        let b = self.barycentric(ray.at(t));
        if b.x < 0.0 || b.y < 0.0 || b.z < 0.0 {
            return None;
        }
        Some(t)
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }
}

impl SurfaceSample for Triangle {
    fn area(&self) -> f32 {
        self.area
    }

    /// Uniform by area via the square-root barycentric warp.
    fn random_surface_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let sqrt_r1 = rng.gen::<f32>().sqrt();
        let r2: f32 = rng.gen();
        self.p1 * (1.0 - sqrt_r1) + self.p2 * (sqrt_r1 * (1.0 - r2)) + self.p3 * (sqrt_r1 * r2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn xy_triangle() -> Triangle {
        // Triangle in XY plane at z=-1, normal +Z
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = xy_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let t = tri.intersect(&ray, Interval::beyond(EPSILON)).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
        assert!((tri.normal_at(ray.at(t)) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = xy_triangle();

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&ray, Interval::beyond(EPSILON)).is_none());

        // Hits the plane outside the triangle
        let ray = Ray::new(Vec3::new(0.9, 0.9, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&ray, Interval::beyond(EPSILON)).is_none());
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let tri = xy_triangle();
        let [p1, p2, p3] = tri.vertices();
        assert!((tri.barycentric(p1) - Vec3::X).length() < 1e-5);
        assert!((tri.barycentric(p2) - Vec3::Y).length() < 1e-5);
        assert!((tri.barycentric(p3) - Vec3::Z).length() < 1e-5);

        let (u, v) = tri.uv(p2);
        assert!((u - 1.0).abs() < 1e-5 && v.abs() < 1e-5);
        let (u, v) = tri.uv(p3);
        assert!(u.abs() < 1e-5 && (v - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_area() {
        let tri = xy_triangle();
        assert!((tri.area() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_samples_are_inside() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        );
        let mut rng = StdRng::seed_from_u64(17);
        let mut centroid = Vec3::ZERO;
        let n = 20_000;
        for _ in 0..n {
            let p = tri.random_surface_point(&mut rng);
            let b = tri.barycentric(p);
            assert!(b.min_element() >= -1e-4);
            centroid += p;
        }
        // Uniform by area means the sample mean is the centroid
        let expected = Vec3::new(0.0, 2.0 / 3.0, 1.0);
        assert!((centroid / n as f32 - expected).length() < 0.03);
    }
}
