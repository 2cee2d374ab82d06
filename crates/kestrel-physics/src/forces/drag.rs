use glam::Vec2;

use super::{ForceGenerator, finite};
use crate::Result;
use crate::world::{ParticleId, ParticleSet};

/// Velocity drag with linear (`k1`) and quadratic (`k2`) coefficients
#[derive(Clone, Debug)]
pub struct Drag {
    target: ParticleId,
    k1: f32,
    k2: f32,
}

impl Drag {
    pub fn new(target: ParticleId, k1: f32, k2: f32) -> Result<Self> {
        Ok(Self {
            target,
            k1: finite("k1", k1)?,
            k2: finite("k2", k2)?,
        })
    }
}

impl ForceGenerator for Drag {
    fn target(&self) -> ParticleId {
        self.target
    }

    fn compute_force(&self, particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
        let velocity = particles.get(self.target)?.velocity;
        let speed = velocity.length();
        let drag_coefficient = self.k1 * speed + self.k2 * speed * speed;

        // A particle at rest normalizes to zero and receives no drag
        Ok(Some(velocity.normalize_or_zero() * -drag_coefficient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Particle;

    #[test]
    fn test_drag_opposes_velocity() {
        let mut set = ParticleSet::new();
        let mut particle = Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap();
        particle.velocity = Vec2::new(2.0, 0.0);
        let id = set.insert(particle);

        let drag = Drag::new(id, 0.5, 0.25).unwrap();
        let force = drag.compute_force(&set, 0.1).unwrap().unwrap();

        // k1 * 2 + k2 * 4 = 2
        assert!((force - Vec2::new(-2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_drag_at_rest_is_zero() {
        let mut set = ParticleSet::new();
        let id = set.insert(Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap());

        let drag = Drag::new(id, 0.5, 0.25).unwrap();
        let force = drag.compute_force(&set, 0.1).unwrap().unwrap();
        assert_eq!(force, Vec2::ZERO);
        assert!(!force.x.is_nan());
    }

    #[test]
    fn test_drag_rejects_nan() {
        let id = ParticleSet::new().insert(Particle::immovable(Vec2::ZERO));
        assert!(Drag::new(id, f32::NAN, 0.0).is_err());
        assert!(Drag::new(id, 0.0, f32::INFINITY).is_err());
    }
}
