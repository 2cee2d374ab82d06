//! Integration tests for the particle world
//!
//! These drive full accumulate, integrate and clear cycles through the public
//! API, the way a game loop would.

use glam::Vec2;
use kestrel_physics::{
    AnchoredBungee, AnchoredSpring, Bungee, Buoyancy, Drag, ForceGenerator, Gravity, Particle,
    ParticleWorld, PhysicsError, Spring,
};

fn step(world: &mut ParticleWorld, duration: f32) {
    world.update_forces(duration).unwrap();
    for (_, particle) in world.particles_mut().iter_mut() {
        particle.integrate(duration).unwrap();
    }
}

// ============================================================================
// Integration cycle
// ============================================================================

#[test]
fn test_constant_force_over_one_second() {
    let mut particle = Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap();
    particle.add_force(Vec2::new(10.0, 0.0));
    particle.integrate(1.0).unwrap();

    assert_eq!(particle.velocity, Vec2::new(10.0, 0.0));
    assert_eq!(particle.position, Vec2::ZERO);
    assert_eq!(particle.force_accumulator(), Vec2::ZERO);
}

#[test]
fn test_gravity_free_fall() {
    let mut world = ParticleWorld::new();
    let id = world.add_particle(Particle::new(Vec2::new(0.0, 100.0), 2.0, 1.0).unwrap());
    world
        .add_force_generator(Box::new(Gravity::new(id, Vec2::new(0.0, -10.0))))
        .unwrap();

    for _ in 0..10 {
        step(&mut world, 0.1);
    }

    let particle = world.particle(id).unwrap();
    // Gravity is mass-scaled, so acceleration is -10 regardless of mass
    assert!((particle.velocity.y - -10.0).abs() < 1e-4);
    assert!(particle.position.y < 100.0);
    assert_eq!(particle.position.x, 0.0);
}

#[test]
fn test_drag_slows_moving_particle() {
    let mut world = ParticleWorld::new();
    let mut particle = Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap();
    particle.velocity = Vec2::new(20.0, 0.0);
    let id = world.add_particle(particle);
    world
        .add_force_generator(Box::new(Drag::new(id, 0.1, 0.01).unwrap()))
        .unwrap();

    let mut last_speed = 20.0;
    for _ in 0..20 {
        step(&mut world, 0.05);
        let speed = world.particle(id).unwrap().velocity.length();
        assert!(speed < last_speed);
        last_speed = speed;
    }
}

#[test]
fn test_immovable_anchor_stays_put() {
    let mut world = ParticleWorld::new();
    let anchor = world.add_particle(Particle::immovable(Vec2::ZERO));
    let bob = world.add_particle(Particle::new(Vec2::new(0.0, -20.0), 1.0, 0.9).unwrap());

    world
        .add_force_generator(Box::new(Spring::new(bob, anchor, 5.0, 10.0).unwrap()))
        .unwrap();
    world
        .add_force_generator(Box::new(Spring::new(anchor, bob, 5.0, 10.0).unwrap()))
        .unwrap();

    for _ in 0..30 {
        step(&mut world, 0.02);
    }

    assert_eq!(world.particle(anchor).unwrap().position, Vec2::ZERO);
    assert!(world.particle(bob).unwrap().position.y > -20.0);
}

// ============================================================================
// Generators
// ============================================================================

#[test]
fn test_bungee_pulls_only_when_stretched() {
    let mut world = ParticleWorld::new();
    let a = world.add_particle(Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap());
    let b = world.add_particle(Particle::new(Vec2::new(15.0, 0.0), 1.0, 1.0).unwrap());
    let k = 3.0;
    world
        .add_force_generator(Box::new(Bungee::new(a, b, k, 10.0).unwrap()))
        .unwrap();

    world.update_forces(0.1).unwrap();
    let force = world.particle(a).unwrap().force_accumulator();
    assert!((force.length() - k * 5.0).abs() < 1e-4);
    assert!(force.x > 0.0, "force should point toward the other particle");

    // Bring the particles inside the rest length and start a fresh step
    world.particle_mut(a).unwrap().integrate(0.1).unwrap();
    world.particle_mut(a).unwrap().position = Vec2::new(8.0, 0.0);
    let before = world.particle(a).unwrap().force_accumulator();

    world.update_forces(0.1).unwrap();
    assert_eq!(world.particle(a).unwrap().force_accumulator(), before);
}

#[test]
fn test_anchored_generators_share_anchor_semantics() {
    let mut world = ParticleWorld::new();
    let id = world.add_particle(Particle::new(Vec2::new(20.0, 0.0), 1.0, 1.0).unwrap());
    let spring = AnchoredSpring::new(id, Vec2::ZERO, 1.0, 10.0).unwrap();
    let bungee = AnchoredBungee::new(id, Vec2::ZERO, 1.0, 10.0).unwrap();

    let spring_force = spring
        .compute_force(world.particles(), 0.1)
        .unwrap()
        .unwrap();
    let bungee_force = bungee
        .compute_force(world.particles(), 0.1)
        .unwrap()
        .unwrap();

    // Both pull back toward the anchor with k * 10 when stretched
    assert!((spring_force - Vec2::new(-10.0, 0.0)).length() < 1e-4);
    assert!((bungee_force - spring_force).length() < 1e-4);
}

#[test]
fn test_buoyancy_lifts_submerged_particle() {
    let mut world = ParticleWorld::new();
    let id = world.add_particle(Particle::new(Vec2::new(0.0, -5.0), 100.0, 1.0).unwrap());
    world
        .add_force_generator(Box::new(Buoyancy::new(id, 1.0, 0.2, 0.0).unwrap()))
        .unwrap();

    step(&mut world, 0.1);

    // 1000 * 0.2 = 200 N on a 100 kg particle gives 2 m/s² upward
    assert!((world.particle(id).unwrap().velocity.y - 0.2).abs() < 1e-4);
}

#[test]
fn test_generators_accumulate_in_registration_order() {
    let mut world = ParticleWorld::new();
    let id = world.add_particle(Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap());
    world
        .add_force_generator(Box::new(Gravity::new(id, Vec2::new(0.0, -10.0))))
        .unwrap();
    world
        .add_force_generator(Box::new(Gravity::new(id, Vec2::new(4.0, 0.0))))
        .unwrap();

    world.update_forces(0.1).unwrap();
    assert_eq!(
        world.particle(id).unwrap().force_accumulator(),
        Vec2::new(4.0, -10.0)
    );
    assert_eq!(world.force_generator_count(), 2);
}

#[test]
fn test_generator_referencing_missing_particle_rejected() {
    let mut other = ParticleWorld::new();
    let _ = other.add_particle(Particle::immovable(Vec2::ZERO));
    let foreign = other.add_particle(Particle::immovable(Vec2::ONE));

    let mut world = ParticleWorld::new();
    let local = world.add_particle(Particle::new(Vec2::ZERO, 1.0, 1.0).unwrap());
    let spring = Spring::new(local, foreign, 1.0, 1.0).unwrap();

    assert_eq!(
        world.add_force_generator(Box::new(spring)),
        Err(PhysicsError::UnknownParticle(foreign))
    );
}
