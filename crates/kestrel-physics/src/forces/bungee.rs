use glam::Vec2;

use super::{ForceGenerator, finite, non_negative};
use crate::Result;
use crate::world::{ParticleId, ParticleSet};

/// Elastic cord between the target and another particle.
///
/// Behaves like a spring while stretched past `rest_length`, and goes slack
/// (no force at all) when the particles are closer than that.
#[derive(Clone, Debug)]
pub struct Bungee {
    target: ParticleId,
    other: ParticleId,
    spring_constant: f32,
    rest_length: f32,
}

impl Bungee {
    pub fn new(
        target: ParticleId,
        other: ParticleId,
        spring_constant: f32,
        rest_length: f32,
    ) -> Result<Self> {
        Ok(Self {
            target,
            other,
            spring_constant: finite("spring_constant", spring_constant)?,
            rest_length: non_negative("rest_length", rest_length)?,
        })
    }
}

impl ForceGenerator for Bungee {
    fn target(&self) -> ParticleId {
        self.target
    }

    fn particles(&self) -> Vec<ParticleId> {
        vec![self.target, self.other]
    }

    fn compute_force(&self, particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
        let offset = particles.get(self.target)?.position - particles.get(self.other)?.position;
        Ok(stretched_pull(offset, self.spring_constant, self.rest_length))
    }
}

/// Elastic cord between the target and a fixed anchor point
#[derive(Clone, Debug)]
pub struct AnchoredBungee {
    target: ParticleId,
    anchor: Vec2,
    spring_constant: f32,
    rest_length: f32,
}

impl AnchoredBungee {
    pub fn new(
        target: ParticleId,
        anchor: Vec2,
        spring_constant: f32,
        rest_length: f32,
    ) -> Result<Self> {
        Ok(Self {
            target,
            anchor,
            spring_constant: finite("spring_constant", spring_constant)?,
            rest_length: non_negative("rest_length", rest_length)?,
        })
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
    }
}

impl ForceGenerator for AnchoredBungee {
    fn target(&self) -> ParticleId {
        self.target
    }

    fn compute_force(&self, particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
        let offset = particles.get(self.target)?.position - self.anchor;
        Ok(stretched_pull(offset, self.spring_constant, self.rest_length))
    }
}

/// Pull back along `offset` by `k * (length - rest)`, or nothing when slack.
fn stretched_pull(offset: Vec2, spring_constant: f32, rest_length: f32) -> Option<Vec2> {
    let length = offset.length();
    if length <= rest_length {
        return None;
    }

    let magnitude = spring_constant * (length - rest_length);
    Some(offset.normalize_or_zero() * -magnitude)
}
