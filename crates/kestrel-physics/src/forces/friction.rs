use glam::Vec2;

use super::ForceGenerator;
use crate::Result;
use crate::world::{ParticleId, ParticleSet};

/// Applies `-velocity` as a force to particles with finite mass.
///
/// This is a stand-in, not Coulomb or viscous friction: there is no
/// coefficient and no normal force. Use [`super::Drag`] for tunable damping.
#[derive(Clone, Debug)]
pub struct Friction {
    target: ParticleId,
}

impl Friction {
    pub fn new(target: ParticleId) -> Self {
        Self { target }
    }
}

impl ForceGenerator for Friction {
    fn target(&self) -> ParticleId {
        self.target
    }

    fn compute_force(&self, particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
        let particle = particles.get(self.target)?;
        if !particle.has_finite_mass() {
            return Ok(None);
        }
        Ok(Some(-particle.velocity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Particle;

    #[test]
    fn test_friction_negates_velocity() {
        let mut set = ParticleSet::new();
        let mut particle = Particle::new(Vec2::ZERO, 4.0, 1.0).unwrap();
        particle.velocity = Vec2::new(1.5, -2.0);
        let id = set.insert(particle);

        let force = Friction::new(id).compute_force(&set, 0.1).unwrap();
        assert_eq!(force, Some(Vec2::new(-1.5, 2.0)));
    }

    #[test]
    fn test_friction_skips_immovable() {
        let mut set = ParticleSet::new();
        let mut particle = Particle::immovable(Vec2::ZERO);
        particle.velocity = Vec2::X;
        let id = set.insert(particle);

        assert_eq!(Friction::new(id).compute_force(&set, 0.1).unwrap(), None);
    }
}
