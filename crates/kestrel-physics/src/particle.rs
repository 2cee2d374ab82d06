//! Point mass with semi-implicit Euler integration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{PhysicsError, Result};

/// A point mass.
///
/// Mass is stored as inverse mass so that immovable particles can be
/// represented with `inverse_mass == 0`. Forces are accumulated with
/// [`Particle::add_force`] and consumed by [`Particle::integrate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Position in world units
    pub position: Vec2,
    /// Velocity in world units per second
    pub velocity: Vec2,
    /// Constant acceleration applied every step (independent of mass)
    pub acceleration: Vec2,
    inverse_mass: f32,
    damping: f32,
    /// Sum of forces applied since the last integration step
    #[serde(skip)]
    force_accumulator: Vec2,
}

impl Particle {
    /// Create a particle at rest.
    ///
    /// `mass` may be `f32::INFINITY` for an immovable particle.
    pub fn new(position: Vec2, mass: f32, damping: f32) -> Result<Self> {
        let mut particle = Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            inverse_mass: 0.0,
            damping: 1.0,
            force_accumulator: Vec2::ZERO,
        };
        particle.set_mass(mass)?;
        particle.set_damping(damping)?;
        Ok(particle)
    }

    /// Create an immovable particle (infinite mass).
    pub fn immovable(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            inverse_mass: 0.0,
            damping: 1.0,
            force_accumulator: Vec2::ZERO,
        }
    }

    /// Mass of the particle, `f32::INFINITY` when immovable.
    pub fn mass(&self) -> f32 {
        if self.inverse_mass == 0.0 {
            f32::INFINITY
        } else {
            1.0 / self.inverse_mass
        }
    }

    /// Set the mass. Zero, negative and NaN masses are rejected.
    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.inverse_mass = 1.0 / mass;
        Ok(())
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Set the inverse mass directly. Zero means infinite mass.
    pub fn set_inverse_mass(&mut self, inverse_mass: f32) -> Result<()> {
        if !inverse_mass.is_finite() || inverse_mass < 0.0 {
            return Err(PhysicsError::InvalidInverseMass(inverse_mass));
        }
        self.inverse_mass = inverse_mass;
        Ok(())
    }

    /// True unless the particle is immovable
    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > 0.0
    }

    /// Fraction of velocity kept per second of simulated time
    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn set_damping(&mut self, damping: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&damping) {
            return Err(PhysicsError::InvalidDamping(damping));
        }
        self.damping = damping;
        Ok(())
    }

    /// Add a force for the current step. Calls are additive.
    pub fn add_force(&mut self, force: Vec2) {
        self.force_accumulator += force;
    }

    /// Forces accumulated since the last integration step
    pub fn force_accumulator(&self) -> Vec2 {
        self.force_accumulator
    }

    /// Advance the particle by `duration` seconds.
    ///
    /// Position is advanced with the velocity from before this step, then the
    /// velocity picks up the constant acceleration plus the accumulated force
    /// and is damped by `damping^duration`. The accumulator is cleared
    /// afterwards. Immovable particles are left untouched.
    pub fn integrate(&mut self, duration: f32) -> Result<()> {
        if self.inverse_mass <= 0.0 {
            return Ok(());
        }

        if duration.is_nan() || duration <= 0.0 {
            return Err(PhysicsError::InvalidDuration(duration));
        }

        self.position += self.velocity * duration;

        let resulting_acceleration = self.acceleration + self.force_accumulator * self.inverse_mass;
        self.velocity += resulting_acceleration * duration;
        self.velocity *= self.damping.powf(duration);

        self.clear_accumulator();
        Ok(())
    }

    fn clear_accumulator(&mut self) {
        self.force_accumulator = Vec2::ZERO;
    }
}
