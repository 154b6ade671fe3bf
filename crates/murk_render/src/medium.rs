//! Homogeneous participating media.
//!
//! Three behaviors share one coefficient layout:
//! - [`MediumKind::Vacuum`]: never scatters, applies no attenuation when
//!   integrating a segment.
//! - [`MediumKind::Absorbing`]: Beer–Lambert attenuation only; rays always
//!   continue straight to the next surface.
//! - [`MediumKind::Scattering`]: absorbs and scatters isotropically. Free
//!   flights are sampled with one randomly chosen channel (the hero channel)
//!   and reweighted by the density averaged over all three channels, which
//!   keeps every channel unbiased.

use crate::{find_closest_hit, DirectLighting, Hit, MediumStack, Object};
use murk_math::sampling::sample_spherical;
use murk_math::{Color, Ray, Vec3, MAX_RAY_DISTANCE};
use rand::{Rng, RngCore};
use std::f32::consts::FRAC_1_PI;

/// Isotropic phase function value, 1 / 4π.
pub const ISOTROPIC_PHASE: f32 = 0.25 * FRAC_1_PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediumKind {
    Vacuum,
    Absorbing,
    Scattering,
}

/// A participating medium with per-channel coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Medium {
    kind: MediumKind,
    scattering: Color,
    absorption: Color,
    extinction: Color,
}

/// Outcome of advancing a ray through a medium up to the next surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSample {
    /// The surface that bounds the segment
    pub hit: Hit,
    /// In-scattered radiance gathered at a scattering event
    pub radiance: Color,
    /// Deterministic attenuation along the segment
    pub transmittance: Color,
    /// Throughput correction for the sampled event
    pub weight: Color,
    /// Ray to continue the path with
    pub outgoing: Ray,
    /// True if the ray scattered inside the medium before the surface
    pub scattered: bool,
}

impl Medium {
    /// Only scattering media keep a scattering coefficient.
    fn new(kind: MediumKind, scattering: Color, absorption: Color) -> Self {
        let scattering = match kind {
            MediumKind::Scattering => scattering,
            MediumKind::Vacuum | MediumKind::Absorbing => Color::ZERO,
        };
        Self {
            kind,
            scattering,
            absorption,
            extinction: scattering + absorption,
        }
    }

    /// Empty space: no coefficients, no attenuation.
    pub fn vacuum() -> Self {
        Self::new(MediumKind::Vacuum, Color::ZERO, Color::ZERO)
    }

    /// Purely absorbing medium (Beer's law).
    pub fn absorbing(absorption: Color) -> Self {
        Self::new(MediumKind::Absorbing, Color::ZERO, absorption)
    }

    /// Homogeneous medium that absorbs and scatters isotropically.
    pub fn homogeneous(scattering: Color, absorption: Color) -> Self {
        Self::new(MediumKind::Scattering, scattering, absorption)
    }

    pub fn kind(&self) -> MediumKind {
        self.kind
    }

    pub fn scattering(&self) -> Color {
        self.scattering
    }

    pub fn absorption(&self) -> Color {
        self.absorption
    }

    pub fn extinction(&self) -> Color {
        self.extinction
    }

    /// Beer–Lambert transmittance over `distance`, per channel.
    pub fn transmittance(&self, distance: f32) -> Color {
        (-self.extinction * distance).exp()
    }

    /// Distance to the next interaction inside the medium.
    ///
    /// Only scattering media sample a finite distance; the others return
    /// `MAX_RAY_DISTANCE` so the ray always reaches the next surface. So
    /// does a hero channel with zero extinction.
    pub fn sample_distance(&self, rng: &mut dyn RngCore) -> f32 {
        match self.kind {
            MediumKind::Scattering => {
                let hero = rng.gen_range(0..3);
                let u: f32 = rng.gen();
                let extinction = self.extinction[hero];
                if extinction <= 0.0 {
                    return MAX_RAY_DISTANCE;
                }
                -(1.0 - u).ln() / extinction
            }
            MediumKind::Vacuum | MediumKind::Absorbing => MAX_RAY_DISTANCE,
        }
    }

    /// New direction after a scattering event. Isotropic, so `incident`
    /// does not influence the result.
    pub fn sample_direction(&self, _incident: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        sample_spherical(rng)
    }

    /// Throughput weight for a free flight of `distance`.
    ///
    /// `scatter` tells whether the flight ended in a scattering event or
    /// passed through to a surface.
    pub fn sample(&self, distance: f32, scatter: bool) -> Color {
        match self.kind {
            MediumKind::Vacuum => Color::ONE,
            MediumKind::Absorbing => self.transmittance(distance),
            MediumKind::Scattering => {
                let tr = self.transmittance(distance);
                let density = if scatter { self.extinction * tr } else { tr };
                // Balance heuristic over the three hero-channel choices
                let pdf = density.element_sum() / 3.0;
                if pdf <= 0.0 {
                    return Color::ZERO;
                }
                if scatter {
                    tr * self.scattering / pdf
                } else {
                    tr / pdf
                }
            }
        }
    }

    /// Direct light arriving at `point` and scattered toward the viewer.
    pub fn sample_direct(
        &self,
        point: Vec3,
        objects: &[Object],
        media: &MediumStack<'_>,
        lighting: &dyn DirectLighting,
        rng: &mut dyn RngCore,
    ) -> Color {
        match self.kind {
            MediumKind::Scattering => {
                lighting.estimate(point, objects, media, rng).radiance * ISOTROPIC_PHASE
            }
            MediumKind::Vacuum | MediumKind::Absorbing => Color::ZERO,
        }
    }

    /// Advance `incoming` through this medium to the next surface.
    ///
    /// Returns `None` if no surface is hit; the ray escapes to the
    /// background.
    pub fn integrate(
        &self,
        objects: &[Object],
        incoming: &Ray,
        media: &MediumStack<'_>,
        lighting: &dyn DirectLighting,
        rng: &mut dyn RngCore,
    ) -> Option<SegmentSample> {
        let hit = find_closest_hit(incoming, objects)?;
        let pass_through = SegmentSample {
            hit,
            radiance: Color::ZERO,
            transmittance: Color::ONE,
            weight: Color::ONE,
            outgoing: *incoming,
            scattered: false,
        };

        let segment = match self.kind {
            MediumKind::Vacuum => pass_through,
            MediumKind::Absorbing => SegmentSample {
                transmittance: self.transmittance(hit.distance),
                ..pass_through
            },
            MediumKind::Scattering => {
                let distance = self.sample_distance(rng);
                if distance < hit.distance {
                    let point = incoming.at(distance);
                    let direction = self.sample_direction(incoming.direction(), rng);
                    SegmentSample {
                        radiance: self.sample_direct(point, objects, media, lighting, rng),
                        weight: self.sample(distance, true),
                        outgoing: Ray::new(point, direction),
                        scattered: true,
                        ..pass_through
                    }
                } else {
                    SegmentSample {
                        weight: self.sample(hit.distance, false),
                        ..pass_through
                    }
                }
            }
        };
        Some(segment)
    }
}
