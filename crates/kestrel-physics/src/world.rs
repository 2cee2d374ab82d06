//! Particle storage and the per-step force pass.

use serde::{Deserialize, Serialize};

use crate::forces::ForceGenerator;
use crate::{Particle, PhysicsError, Result};

/// Stable handle to a particle inside a [`ParticleSet`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(u32);

impl ParticleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena of particles addressed by [`ParticleId`].
///
/// Particles are never removed, so ids stay valid for the lifetime of the set.
/// Effects that recycle particles reset them in place instead.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, particle: Particle) -> ParticleId {
        let id = ParticleId(self.particles.len() as u32);
        self.particles.push(particle);
        id
    }

    pub fn get(&self, id: ParticleId) -> Result<&Particle> {
        self.particles
            .get(id.index())
            .ok_or(PhysicsError::UnknownParticle(id))
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Result<&mut Particle> {
        self.particles
            .get_mut(id.index())
            .ok_or(PhysicsError::UnknownParticle(id))
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        id.index() < self.particles.len()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles
            .iter()
            .enumerate()
            .map(|(i, p)| (ParticleId(i as u32), p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ParticleId, &mut Particle)> {
        self.particles
            .iter_mut()
            .enumerate()
            .map(|(i, p)| (ParticleId(i as u32), p))
    }
}

/// Owns particles and force generators.
///
/// The world only runs the force pass. Callers integrate each particle
/// afterwards, see [`ParticleWorld::update_forces`].
#[derive(Default)]
pub struct ParticleWorld {
    particles: ParticleSet,
    generators: Vec<Box<dyn ForceGenerator>>,
}

impl ParticleWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_particle(&mut self, particle: Particle) -> ParticleId {
        self.particles.insert(particle)
    }

    /// Register a force generator. Every particle it references must exist.
    pub fn add_force_generator(&mut self, generator: Box<dyn ForceGenerator>) -> Result<()> {
        for id in generator.particles() {
            if !self.particles.contains(id) {
                return Err(PhysicsError::UnknownParticle(id));
            }
        }
        self.generators.push(generator);
        Ok(())
    }

    pub fn particle(&self, id: ParticleId) -> Result<&Particle> {
        self.particles.get(id)
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Result<&mut Particle> {
        self.particles.get_mut(id)
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    pub fn force_generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Run every force generator once, in registration order.
    pub fn update_forces(&mut self, duration: f32) -> Result<()> {
        for generator in &self.generators {
            generator.update_force(&mut self.particles, duration)?;
        }
        log::trace!(
            "Updated {} force generators over {} particles",
            self.generators.len(),
            self.particles.len()
        );
        Ok(())
    }
}
