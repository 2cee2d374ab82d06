//! Error types for the particle engine.

use thiserror::Error;

use crate::world::ParticleId;

/// Errors raised by particle construction, integration and the particle world
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Mass must be positive (infinite mass is allowed)
    #[error("invalid mass {0}: mass must be greater than 0")]
    InvalidMass(f32),

    /// Inverse mass must be finite and not negative
    #[error("invalid inverse mass {0}")]
    InvalidInverseMass(f32),

    /// Damping must be a finite value in [0, 1]
    #[error("invalid damping {0}: expected a value in [0, 1]")]
    InvalidDamping(f32),

    /// Integration step must be positive
    #[error("invalid duration {0}: duration must be greater than 0")]
    InvalidDuration(f32),

    /// A force generator parameter is out of range
    #[error("invalid force generator parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// Particle id does not belong to this world
    #[error("unknown particle {0:?}")]
    UnknownParticle(ParticleId),
}
