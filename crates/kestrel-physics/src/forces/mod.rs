//! Force generators
//!
//! A force generator is bound to one target particle when it is built. Each
//! physics step it computes a force and adds it to the target's accumulator,
//! at most once per call. Generators never move particles themselves; they
//! only read positions and velocities.

mod bungee;
mod buoyancy;
mod drag;
mod friction;
mod gravity;
mod spring;

pub use bungee::{AnchoredBungee, Bungee};
pub use buoyancy::{Buoyancy, WATER_DENSITY};
pub use drag::Drag;
pub use friction::Friction;
pub use gravity::Gravity;
pub use spring::{AnchoredSpring, Spring};

use glam::Vec2;

use crate::world::{ParticleId, ParticleSet};
use crate::{PhysicsError, Result};

/// Computes a per-step force for one particle
pub trait ForceGenerator {
    /// Particle that receives the force
    fn target(&self) -> ParticleId;

    /// Every particle this generator reads. Defaults to the target only.
    fn particles(&self) -> Vec<ParticleId> {
        vec![self.target()]
    }

    /// Force to apply this step, or `None` when a guard condition skips it.
    fn compute_force(&self, particles: &ParticleSet, duration: f32) -> Result<Option<Vec2>>;

    /// Compute the force and add it to the target.
    fn update_force(&self, particles: &mut ParticleSet, duration: f32) -> Result<()> {
        if let Some(force) = self.compute_force(particles, duration)? {
            particles.get_mut(self.target())?.add_force(force);
        }
        Ok(())
    }
}

/// Reject NaN and infinite generator constants.
pub(crate) fn finite(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PhysicsError::InvalidParameter { name, value })
    }
}

/// Reject negative, NaN and infinite generator constants.
pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PhysicsError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Particle;

    struct Constant {
        target: ParticleId,
        force: Vec2,
    }

    impl ForceGenerator for Constant {
        fn target(&self) -> ParticleId {
            self.target
        }

        fn compute_force(&self, _particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
            Ok(Some(self.force))
        }
    }

    #[test]
    fn test_update_force_adds_to_target_only() {
        let mut set = ParticleSet::new();
        let a = set.insert(Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap());
        let b = set.insert(Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap());

        let generator = Constant {
            target: b,
            force: Vec2::new(1.0, 2.0),
        };
        generator.update_force(&mut set, 0.1).unwrap();
        generator.update_force(&mut set, 0.1).unwrap();

        assert_eq!(set.get(a).unwrap().force_accumulator(), Vec2::ZERO);
        assert_eq!(set.get(b).unwrap().force_accumulator(), Vec2::new(2.0, 4.0));
    }

    #[test]
    fn test_parameter_validation() {
        assert!(finite("k", -3.0).is_ok());
        assert!(finite("k", f32::NAN).is_err());
        assert!(non_negative("rest_length", 0.0).is_ok());
        assert_eq!(
            non_negative("rest_length", -1.0),
            Err(PhysicsError::InvalidParameter {
                name: "rest_length",
                value: -1.0
            })
        );
    }
}
