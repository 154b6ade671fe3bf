//! Murk transport core - intersection and participating media.
//!
//! Scene geometry is a flat list of [`Object`]s queried by a linear scan.
//! Rays travelling through volumes are advanced by a [`Medium`], and each
//! light path tracks the volumes it is inside with a [`MediumStack`].
//!
//! Materials and direct lighting are collaborators behind the [`Material`]
//! and [`DirectLighting`] traits.

mod geometry;
mod hit;
mod lighting;
mod material;
mod medium;
mod medium_stack;
mod path;

pub use geometry::{
    area_to_solid_angle, LightPoint, Object, Plane, Rectangle, Shape, Sphere, Surface,
    SurfaceSample, Triangle,
};
pub use hit::{find_closest_hit, Hit};
pub use lighting::{DirectLighting, LightEstimate, LightSampler};
pub use material::{BrdfSample, DiffuseLight, Lambertian, Material};
pub use medium::{Medium, MediumKind, SegmentSample, ISOTROPIC_PHASE};
pub use medium_stack::{MediumId, MediumStack, MediumStackError, DEFAULT_MEDIUM_DEPTH};
pub use path::{path_seed, trace_paths, PathContext, TransportConfig};

/// Re-export common math types from murk_math
pub use murk_math::{Color, Interval, Ray, Vec3, EPSILON, MAX_RAY_DISTANCE};
