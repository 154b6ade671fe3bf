//! Geometry primitives and the scene object that binds them to a material.
//!
//! The set of shapes is closed: [`Shape`] dispatches every capability by
//! exhaustive match. Surface sampling is a separate trait implemented only by
//! the finite shapes, so asking an infinite plane for a light sample is not
//! expressible.

mod plane;
mod sphere;
mod triangle;

pub use plane::{Plane, Rectangle};
pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::{BrdfSample, Hit, Material};
use murk_math::{Color, Interval, Ray, Vec3};
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

/// Intersection, parametrization and normal lookup shared by every shape.
pub trait Surface {
    /// Surface (u, v) coordinates of a point on the shape.
    fn uv(&self, point: Vec3) -> (f32, f32);

    /// Distance along `ray` to the shape, if it lies strictly inside `ray_t`.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32>;

    /// Surface normal at a point on the shape.
    fn normal_at(&self, point: Vec3) -> Vec3;
}

/// A point drawn on a light surface together with its solid-angle weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightPoint {
    pub point: Vec3,
    /// Inverse of the solid-angle density as seen from the reference point
    pub inverse_pdf: f32,
}

/// Shapes with finite area that can be sampled as light sources.
pub trait SurfaceSample: Surface {
    /// Total surface area.
    fn area(&self) -> f32;

    /// Point drawn uniformly by area.
    fn random_surface_point(&self, rng: &mut dyn RngCore) -> Vec3;

    /// Point drawn for lighting `reference`, with its inverse solid-angle pdf.
    fn random_light_point(&self, reference: Vec3, rng: &mut dyn RngCore) -> LightPoint {
        let point = self.random_surface_point(rng);
        LightPoint {
            point,
            inverse_pdf: self.area() * area_to_solid_angle(self, point, reference),
        }
    }
}

/// Converts an area-domain density at `surface_point` into the solid-angle
/// domain seen from `reference_point`: `max(0, cos θ / d²)`.
///
/// Zero when the reference point is behind the surface.
pub fn area_to_solid_angle<S: Surface + ?Sized>(
    surface: &S,
    surface_point: Vec3,
    reference_point: Vec3,
) -> f32 {
    let normal = surface.normal_at(surface_point);
    let difference = reference_point - surface_point;
    let distance_squared = difference.length_squared();
    if distance_squared <= 0.0 {
        return 0.0;
    }
    let to_reference = difference / distance_squared.sqrt();
    (normal.dot(to_reference) / distance_squared).max(0.0)
}

/// The closed set of geometry kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Rectangle(Rectangle),
    Triangle(Triangle),
}

macro_rules! dispatch_surface {
    ($self:ident, $shape:ident => $body:expr) => {
        match $self {
            Shape::Sphere($shape) => $body,
            Shape::Plane($shape) => $body,
            Shape::Rectangle($shape) => $body,
            Shape::Triangle($shape) => $body,
        }
    };
}

impl Shape {
    /// The sampling capabilities of this shape, `None` for unbounded shapes.
    pub fn as_sampleable(&self) -> Option<&dyn SurfaceSample> {
        match self {
            Shape::Sphere(s) => Some(s),
            Shape::Rectangle(r) => Some(r),
            Shape::Triangle(t) => Some(t),
            Shape::Plane(_) => None,
        }
    }
}

impl Surface for Shape {
    fn uv(&self, point: Vec3) -> (f32, f32) {
        dispatch_surface!(self, s => s.uv(point))
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        dispatch_surface!(self, s => s.intersect(ray, ray_t))
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        dispatch_surface!(self, s => s.normal_at(point))
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Self::Sphere(s)
    }
}

impl From<Plane> for Shape {
    fn from(p: Plane) -> Self {
        Self::Plane(p)
    }
}

impl From<Rectangle> for Shape {
    fn from(r: Rectangle) -> Self {
        Self::Rectangle(r)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Self::Triangle(t)
    }
}

/// A shape in the scene list, sharing its material with other objects.
#[derive(Clone)]
pub struct Object {
    shape: Shape,
    material: Arc<dyn Material>,
}

impl Object {
    /// Create a scene object from a shape and a shared material.
    pub fn new(shape: impl Into<Shape>, material: Arc<dyn Material>) -> Self {
        Self {
            shape: shape.into(),
            material,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    pub fn uv(&self, point: Vec3) -> (f32, f32) {
        self.shape.uv(point)
    }

    /// Material reflectance at a surface point.
    pub fn eval(&self, point: Vec3) -> Color {
        let (u, v) = self.uv(point);
        self.material.eval(u, v)
    }

    /// Sample the material's BRDF at a hit on this object.
    pub fn sample(
        &self,
        hit: &Hit,
        objects: &[Object],
        rng: &mut dyn RngCore,
    ) -> Option<BrdfSample> {
        let (u, v) = self.uv(hit.point);
        self.material.sample(hit, objects, u, v, rng)
    }

    /// Emitted radiance at a surface point.
    pub fn emission(&self, point: Vec3) -> Color {
        let (u, v) = self.uv(point);
        self.material.emission(u, v)
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        self.shape.intersect(ray, ray_t)
    }

    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        self.shape.normal_at(point)
    }

    /// Surface area, `None` for unbounded shapes.
    pub fn area(&self) -> Option<f32> {
        self.shape.as_sampleable().map(|s| s.area())
    }

    pub fn random_surface_point(&self, rng: &mut dyn RngCore) -> Option<Vec3> {
        self.shape
            .as_sampleable()
            .map(|s| s.random_surface_point(rng))
    }

    pub fn random_light_point(&self, reference: Vec3, rng: &mut dyn RngCore) -> Option<LightPoint> {
        self.shape
            .as_sampleable()
            .map(|s| s.random_light_point(reference, rng))
    }

    pub fn area_to_solid_angle(&self, surface_point: Vec3, reference_point: Vec3) -> f32 {
        area_to_solid_angle(&self.shape, surface_point, reference_point)
    }

    /// True if the object emits light and can be sampled for direct lighting.
    pub fn is_light(&self) -> bool {
        self.material.is_emissive() && self.shape.as_sampleable().is_some()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("shape", &self.shape)
            .field("emissive", &self.material.is_emissive())
            .finish()
    }
}
