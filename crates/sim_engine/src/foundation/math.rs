//! Math utilities and types
//!
//! Provides the 2D math types used by the simulation core.

pub use nalgebra::{Rotation2, Unit, Vector2};

use rand::Rng;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Squared length below which a direction is treated as zero
    pub const DIRECTION_EPSILON_SQ: f32 = 1e-12;
}

/// Math utility functions
pub mod utils {
    use super::*;

    const UNIT_TOLERANCE: f32 = 1e-4;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Normalize a direction, returning `None` for zero-length or non-finite input
    ///
    /// The vector is scaled by its largest component first so huge finite
    /// inputs do not overflow the squared norm.
    pub fn normalize_direction(v: Vec2) -> Option<Vec2> {
        if !v.x.is_finite() || !v.y.is_finite() {
            return None;
        }
        let scale = v.amax();
        if scale * scale <= constants::DIRECTION_EPSILON_SQ {
            return None;
        }
        let unit = (v / scale).try_normalize(0.0)?;
        ((unit.norm() - 1.0).abs() <= UNIT_TOLERANCE).then_some(unit)
    }

    /// Rotate a vector counter-clockwise by `degrees`
    pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
        Rotation2::new(deg_to_rad(degrees)) * v
    }

    /// Unit vector pointing along `radians`
    pub fn from_angle(radians: f32) -> Vec2 {
        Vec2::new(radians.cos(), radians.sin())
    }

    /// Uniformly distributed unit vector
    pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
        from_angle(rng.gen_range(0.0..constants::TAU))
    }

    /// Uniformly distributed point inside a disk of the given radius
    ///
    /// Uses the square root of the radial sample so points do not bunch
    /// up at the center.
    pub fn random_in_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
        if radius <= 0.0 {
            return Vec2::zeros();
        }
        let r = radius * rng.gen::<f32>().sqrt();
        random_unit_vector(rng) * r
    }
}
