//! Point-mass physics for Kestrel
//!
//! This crate provides a small particle engine:
//! - Particles with inverse mass, damping and a per-step force accumulator
//! - Force generators (gravity, drag, springs, bungees, buoyancy, friction)
//! - A particle world that owns particles and generators and runs the force pass
//!
//! Integration is left to the caller: evaluate the force pass first, then
//! integrate every particle, because `Particle::integrate` consumes and clears
//! the accumulator.

mod error;
pub mod forces;
mod particle;
mod world;

pub use error::PhysicsError;
pub use forces::{
    AnchoredBungee, AnchoredSpring, Bungee, Buoyancy, Drag, ForceGenerator, Friction, Gravity,
    Spring,
};
pub use particle::Particle;
pub use world::{ParticleId, ParticleSet, ParticleWorld};

/// Convenience result alias used across the crate
pub type Result<T> = std::result::Result<T, PhysicsError>;
