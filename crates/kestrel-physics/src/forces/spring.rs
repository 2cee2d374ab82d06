use glam::Vec2;

use super::{ForceGenerator, finite, non_negative};
use crate::Result;
use crate::world::{ParticleId, ParticleSet};

/// Spring between the target and another particle.
///
/// The magnitude is `k * |length - rest_length|` and the force always points
/// from the target toward the other particle.
#[derive(Clone, Debug)]
pub struct Spring {
    target: ParticleId,
    other: ParticleId,
    spring_constant: f32,
    rest_length: f32,
}

impl Spring {
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

impl ForceGenerator for Spring {
    fn target(&self) -> ParticleId {
        self.target
    }

    fn particles(&self) -> Vec<ParticleId> {
        vec![self.target, self.other]
    }

    fn compute_force(&self, particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
        let offset = particles.get(self.target)?.position - particles.get(self.other)?.position;

        let magnitude = (offset.length() - self.rest_length).abs() * self.spring_constant;

        Ok(Some(offset.normalize_or_zero() * -magnitude))
    }
}

/// Spring between the target and a fixed anchor point.
///
/// The magnitude is signed, `k * (rest_length - length)`, so the spring pulls
/// toward the anchor when stretched and pushes away when compressed.
#[derive(Clone, Debug)]
pub struct AnchoredSpring {
    target: ParticleId,
    anchor: Vec2,
    spring_constant: f32,
    rest_length: f32,
}

impl AnchoredSpring {
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

impl ForceGenerator for AnchoredSpring {
    fn target(&self) -> ParticleId {
        self.target
    }

    fn compute_force(&self, particles: &ParticleSet, _duration: f32) -> Result<Option<Vec2>> {
        let offset = particles.get(self.target)?.position - self.anchor;

        let magnitude = (self.rest_length - offset.length()) * self.spring_constant;

        Ok(Some(offset.normalize_or_zero() * magnitude))
    }
}
