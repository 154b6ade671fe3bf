//! Hit record and the nearest-hit scene query.

use crate::Object;
use murk_math::{Interval, Ray, Vec3, EPSILON};

/// Record of a ray-object intersection.
///
/// Only produced for valid hits, so every field is populated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray, always greater than `EPSILON`
    pub distance: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal of the intersected object at `point`
    pub normal: Vec3,
    /// Direction of the ray that produced the hit
    pub incoming: Vec3,
    /// Index of the intersected object in the scene list
    pub object_index: usize,
    /// Per-primitive identifier, reserved for meshes (always 0)
    pub primitive_id: u32,
}

impl Hit {
    /// The intersected object.
    pub fn object<'a>(&self, objects: &'a [Object]) -> &'a Object {
        &objects[self.object_index]
    }
}

/// Find the nearest intersection along `ray` by scanning every object.
///
/// Distances at or below `EPSILON` are ignored to avoid re-hitting the
/// surface the ray starts on. When two objects report the same distance the
/// one earlier in `objects` wins; callers should not rely on this.
pub fn find_closest_hit(ray: &Ray, objects: &[Object]) -> Option<Hit> {
    let mut closest: Option<(f32, usize)> = None;
    let mut ray_t = Interval::beyond(EPSILON);

    for (index, object) in objects.iter().enumerate() {
        if let Some(distance) = object.intersect(ray, ray_t) {
            closest = Some((distance, index));
            ray_t = ray_t.with_max(distance);
        }
    }

    let (distance, object_index) = closest?;
    let point = ray.at(distance);
    Some(Hit {
        distance,
        point,
        normal: objects[object_index].normal_at(point),
        incoming: ray.direction(),
        object_index,
        primitive_id: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Material, Rectangle, Sphere};
    use murk_math::Color;
    use std::sync::Arc;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_nearest_object_wins() {
        let material = grey();
        let objects = vec![
            Object::new(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0), material.clone()),
            Object::new(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0), material.clone()),
            Object::new(Sphere::new(Vec3::new(5.0, 0.0, -2.0), 1.0), material),
        ];
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = find_closest_hit(&ray, &objects).unwrap();
        assert_eq!(hit.object_index, 1);
        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert_eq!(hit.incoming, ray.direction());
        assert_eq!(hit.primitive_id, 0);
    }

    #[test]
    fn test_no_hit() {
        let objects = vec![Object::new(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0), grey())];
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(find_closest_hit(&ray, &objects).is_none());
        assert!(find_closest_hit(&ray, &[]).is_none());
    }

    #[test]
    fn test_ignores_surface_at_origin() {
        // Ray leaving the front of a rectangle must not re-hit it
        let objects = vec![
            Object::new(Rectangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, 2.0, 2.0), grey()),
            Object::new(Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0), grey()),
        ];
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let hit = find_closest_hit(&ray, &objects).unwrap();
        assert_eq!(hit.object_index, 1);
        assert!((hit.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_tie_goes_to_first_object() {
        let objects = vec![
            Object::new(Rectangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, 1.0, 1.0), grey()),
            Object::new(Rectangle::new(Vec3::ZERO, Vec3::Y, Vec3::X, 1.0, 1.0), grey()),
        ];
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z);

        let hit = find_closest_hit(&ray, &objects).unwrap();
        assert_eq!(hit.object_index, 0);
        assert_eq!(hit.object(&objects).normal_at(hit.point), Vec3::Z);
    }
}
