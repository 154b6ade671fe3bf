// Re-export glam for convenience
pub use glam::*;

// Murk math types
mod interval;
mod ray;
pub mod sampling;

pub use interval::Interval;
pub use ray::Ray;

/// Per-channel spectral quantity (RGB).
pub type Color = Vec3;

/// Distance threshold for self-intersection avoidance and geometric tolerance.
pub const EPSILON: f32 = 1e-4;

/// Travel distance reported by media that never scatter mid-volume.
pub const MAX_RAY_DISTANCE: f32 = 1e8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
    }
}
