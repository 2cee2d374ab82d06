use glam::Vec2;

use super::{ForceGenerator, finite, non_negative};
use crate::Result;
use crate::world::{ParticleId, ParticleSet};

/// Density of water in kg/m³, used when no liquid density is given
pub const WATER_DENSITY: f32 = 1000.0;

/// Upward force on a particle submerged in a liquid plane.
///
/// Depth is the particle's Y coordinate. Three zones are distinguished:
/// at or above `water_height + max_depth` nothing is applied, at or below
/// `water_height - max_depth` the full `liquid_density * volume` pushes along
/// +Y, and in between the force is scaled by
/// `(depth - max_depth - water_height) / 2 * max_depth`.
///
/// The partial-submersion scale is kept exactly as written above, operator
/// grouping included, so existing scenes behave the same.
#[derive(Clone, Debug)]
pub struct Buoyancy {
    target: ParticleId,
    max_depth: f32,
    volume: f32,
    water_height: f32,
    liquid_density: f32,
}

impl Buoyancy {
    /// Buoyancy in water.
    pub fn new(target: ParticleId, max_depth: f32, volume: f32, water_height: f32) -> Result<Self> {
        Self::with_density(target, max_depth, volume, water_height, WATER_DENSITY)
    }

    pub fn with_density(
        target: ParticleId,
        max_depth: f32,
        volume: f32,
        water_height: f32,
        liquid_density: f32,
    ) -> Result<Self> {
        Ok(Self {
            target,
            max_depth: non_negative("max_depth", max_depth)?,
            volume: non_negative("volume", volume)?,
            water_height: finite("water_height", water_height)?,
            liquid_density: non_negative("liquid_density", liquid_density)?,
        })
    }

    pub fn water_height(&self) -> f32 {
        self.water_height
    }

    pub fn set_water_height(&mut self, water_height: f32) -> Result<()> {
        self.water_height = finite("water_height", water_height)?;
        Ok(())
    }
}

impl ForceGenerator for Buoyancy {
    fn target(&self) -> ParticleId {
        self.target
    }

    fn compute_force(&self, particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
        let depth = particles.get(self.target)?.position.y;

        if depth >= self.water_height + self.max_depth {
            return Ok(None);
        }

        let full = self.liquid_density * self.volume;
        let force_y = if depth <= self.water_height - self.max_depth {
            full
        } else {
            full * (depth - self.max_depth - self.water_height) / 2.0 * self.max_depth
        };

        Ok(Some(Vec2::new(0.0, force_y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Particle;

    fn particle_at(y: f32) -> (ParticleSet, ParticleId) {
        let mut set = ParticleSet::new();
        let id = set.insert(Particle::new(Vec2::new(3.0, y), 1.0, 1.0).unwrap());
        (set, id)
    }

    #[test]
    fn test_above_surface_no_force() {
        let (mut set, id) = particle_at(12.0);
        let buoyancy = Buoyancy::new(id, 2.0, 0.5, 10.0).unwrap();

        buoyancy.update_force(&mut set, 0.1).unwrap();
        assert_eq!(set.get(id).unwrap().force_accumulator(), Vec2::ZERO);
    }

    #[test]
    fn test_fully_submerged_full_force() {
        let (set, id) = particle_at(7.0);
        let buoyancy = Buoyancy::new(id, 2.0, 0.5, 10.0).unwrap();

        let force = buoyancy.compute_force(&set, 0.1).unwrap().unwrap();
        assert_eq!(force, Vec2::new(0.0, 500.0));
    }

    #[test]
    fn test_partial_submersion_literal_scale() {
        let (set, id) = particle_at(11.0);
        let buoyancy = Buoyancy::with_density(id, 2.0, 0.5, 10.0, 2.0).unwrap();

        // 2 * 0.5 * (11 - 2 - 10) / 2 * 2 = -1
        let force = buoyancy.compute_force(&set, 0.1).unwrap().unwrap();
        assert!((force.y - -1.0).abs() < 1e-6);
        assert_eq!(force.x, 0.0);
    }

    #[test]
    fn test_default_density_is_water() {
        let (_, id) = particle_at(0.0);
        let buoyancy = Buoyancy::new(id, 1.0, 1.0, 0.0).unwrap();
        assert_eq!(buoyancy.liquid_density, WATER_DENSITY);
    }
}
