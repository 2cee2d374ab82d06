use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::{DrawError, Result};

/// Rotation in degrees, always normalized to `[0, 360)`.
///
/// Equality and hashing use the normalized value, so `Angle2::new(-90.0)`
/// equals `Angle2::new(270.0)`. The radian value is computed once.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Angle2 {
    degrees: f32,
    radians: f32,
}

impl Angle2 {
    pub const ZERO: Angle2 = Angle2 {
        degrees: 0.0,
        radians: 0.0,
    };

    /// Normalize `degrees` into `[0, 360)`. NaN and infinities are rejected.
    pub fn new(degrees: f32) -> Result<Self> {
        if !degrees.is_finite() {
            return Err(DrawError::NonFiniteAngle(degrees));
        }
        Ok(Self::from_finite(degrees))
    }

    pub fn from_radians(radians: f32) -> Result<Self> {
        Self::new(radians.to_degrees())
    }

    fn from_finite(degrees: f32) -> Self {
        let degrees = normalize(degrees);
        Self {
            degrees,
            radians: degrees.to_radians(),
        }
    }

    pub fn degrees(self) -> f32 {
        self.degrees
    }

    pub fn radians(self) -> f32 {
        self.radians
    }

    pub fn is_zero(self) -> bool {
        self.degrees == 0.0
    }
}

fn normalize(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs,
    // and keeps the sign of -0.0
    if wrapped >= 360.0 || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

impl PartialEq for Angle2 {
    fn eq(&self, other: &Self) -> bool {
        self.degrees == other.degrees
    }
}

// Normalized degrees are always finite
impl Eq for Angle2 {}

impl Hash for Angle2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.degrees.to_bits().hash(state);
    }
}

impl Add for Angle2 {
    type Output = Angle2;

    fn add(self, rhs: Angle2) -> Angle2 {
        Angle2::from_finite(self.degrees + rhs.degrees)
    }
}

impl Sub for Angle2 {
    type Output = Angle2;

    fn sub(self, rhs: Angle2) -> Angle2 {
        Angle2::from_finite(self.degrees - rhs.degrees)
    }
}

impl TryFrom<f32> for Angle2 {
    type Error = DrawError;

    fn try_from(degrees: f32) -> Result<Self> {
        Angle2::new(degrees)
    }
}

impl From<Angle2> for f32 {
    fn from(angle: Angle2) -> f32 {
        angle.degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(angle: Angle2) -> u64 {
        let mut hasher = DefaultHasher::new();
        angle.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_normalization() {
        assert_eq!(Angle2::new(360.0).unwrap().degrees(), 0.0);
        assert_eq!(Angle2::new(450.0).unwrap().degrees(), 90.0);
        assert_eq!(Angle2::new(-90.0).unwrap().degrees(), 270.0);
        assert_eq!(Angle2::new(-720.0).unwrap().degrees(), 0.0);
        assert!(Angle2::new(-1e-7).unwrap().degrees() < 360.0);
    }

    #[test]
    fn test_equality_and_hash_use_normalized_value() {
        let a = Angle2::new(-90.0).unwrap();
        let b = Angle2::new(270.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(a), hash_of(b));
        assert_eq!(hash_of(Angle2::new(-0.0).unwrap()), hash_of(Angle2::ZERO));
    }

    #[test]
    fn test_radians_precomputed() {
        let angle = Angle2::new(180.0).unwrap();
        assert!((angle.radians() - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            Angle2::new(f32::NAN),
            Err(DrawError::NonFiniteAngle(_))
        ));
        assert!(Angle2::new(f32::INFINITY).is_err());
    }

    #[test]
    fn test_arithmetic_wraps() {
        let a = Angle2::new(350.0).unwrap();
        let b = Angle2::new(20.0).unwrap();
        assert!(((a + b).degrees() - 10.0).abs() < 1e-4);
        assert!(((b - a).degrees() - 30.0).abs() < 1e-4);
    }
}
