use glam::Vec2;

use super::ForceGenerator;
use crate::Result;
use crate::world::{ParticleId, ParticleSet};

/// Constant gravitational acceleration, applied as a mass-scaled force
#[derive(Clone, Debug)]
pub struct Gravity {
    target: ParticleId,
    gravity: Vec2,
}

impl Gravity {
    pub fn new(target: ParticleId, gravity: Vec2) -> Self {
        Self { target, gravity }
    }
}

impl ForceGenerator for Gravity {
    fn target(&self) -> ParticleId {
        self.target
    }

    fn compute_force(&self, particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
        let particle = particles.get(self.target)?;
        if !particle.has_finite_mass() {
            return Ok(None);
        }
        Ok(Some(self.gravity * particle.mass()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Particle;

    #[test]
    fn test_gravity_scales_with_mass() {
        let mut set = ParticleSet::new();
        let id = set.insert(Particle::new(Vec2::ZERO, 3.0, 1.0).unwrap());
        let gravity = Gravity::new(id, Vec2::new(0.0, -10.0));

        let force = gravity.compute_force(&set, 0.016).unwrap();
        let force = force.unwrap();
        assert!((force - Vec2::new(0.0, -30.0)).length() < 1e-4);
    }

    #[test]
    fn test_gravity_skips_immovable() {
        let mut set = ParticleSet::new();
        let id = set.insert(Particle::immovable(Vec2::ZERO));
        let gravity = Gravity::new(id, Vec2::new(0.0, -10.0));

        gravity.update_force(&mut set, 0.016).unwrap();
        assert_eq!(set.get(id).unwrap().force_accumulator(), Vec2::ZERO);
    }
}
