//! Headless fireworks
//!
//! Rockets launch from the bottom of the world, coast under gravity and drag,
//! and burst into sparks when their fuse runs out. Every particle lives in a
//! fixed pool inside one `ParticleWorld`. Idle slots are parked with infinite
//! mass so the integrator and the gravity generator leave them alone.
//!
//! Each frame runs the force pass, integrates every particle, then mirrors the
//! pool into a `SpriteGroup` on the world layer before rendering.

use anyhow::{Context, Result};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use kestrel_draw::{
    Bitmap, BlendMode, CachePolicy, Color, Coordinate2, CoordinateSystemMode, DrawEngine,
    DrawableId, EngineConfig, GraphicsBackend, LayerKind, PixelFormat, RenderOutcome,
    RenderPolicy, Sprite, SpriteGroup, SpriteGroupItem, TileKey, TileRef, TiledTexture,
};
use kestrel_physics::{Drag, Gravity, Particle, ParticleId, ParticleWorld};

use crate::config::DemoConfig;

const PARTICLE_LAYER: i32 = 0;
const HUD_LAYER: i32 = 100;

const ATLAS_TEXTURE: &str = "fireworks/atlas";
const ATLAS: &str = "fireworks";
const HUD_TEXTURE: &str = "hud/lamp";
const HUD: &str = "hud";

/// Edge length of one atlas tile in pixels
pub const TILE_SIZE: u32 = 8;
const ROCKET_TILE: u32 = 0;
const SPARK_TILE: u32 = 1;
const EMBER_TILE: u32 = 2;

const SPARK_COLORS: [Color; 6] = [
    Color::RED,
    Color::YELLOW,
    Color::LIME,
    Color::CYAN,
    Color::PINK,
    Color::ORANGE,
];

/// Sparks falling below this height are parked early
const FLOOR: f32 = -64.0;

/// Launches beyond this in one frame are dropped
const MAX_LAUNCHES_PER_FRAME: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Slot {
    Idle,
    Rocket { fuse: f32 },
    Spark { age: f32, lifetime: f32, color: Color },
}

/// Counters gathered over a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FireworksStats {
    pub frames: u64,
    pub rendered_frames: u64,
    pub skipped_frames: u64,
    pub draw_calls: u64,
    pub rockets_launched: u64,
    pub bursts: u64,
    /// Most particles in flight at once
    pub peak_active: usize,
}

/// Pool occupancy at one point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    pub idle: usize,
    pub rockets: usize,
    pub sparks: usize,
}

impl Census {
    pub fn active(&self) -> usize {
        self.rockets + self.sparks
    }
}

/// Build the particle atlas: three soft discs, one per tile.
pub fn particle_atlas() -> kestrel_draw::Result<Bitmap> {
    const RADII: [f32; 3] = [2.0, 3.5, 1.5];

    let width = TILE_SIZE * RADII.len() as u32;
    let center = Vec2::splat(TILE_SIZE as f32 * 0.5);
    let mut data = Vec::with_capacity((width * TILE_SIZE * 4) as usize);
    for y in 0..TILE_SIZE {
        for x in 0..width {
            let radius = RADII[(x / TILE_SIZE) as usize];
            let local = Vec2::new((x % TILE_SIZE) as f32 + 0.5, y as f32 + 0.5);
            let alpha = (1.0 - local.distance(center) / radius).clamp(0.0, 1.0);
            data.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
        }
    }
    Bitmap::new(width, TILE_SIZE, PixelFormat::Rgba8, data)
}

pub struct Fireworks<B: GraphicsBackend> {
    config: DemoConfig,
    engine: DrawEngine<B>,
    world: ParticleWorld,
    rng: Xoshiro256StarStar,
    pool: Vec<(ParticleId, Slot)>,
    group: DrawableId,
    hud: DrawableId,
    hud_lit: bool,
    pool_changed: bool,
    elapsed: f32,
    launches_due: u64,
    stats: FireworksStats,
}

impl<B: GraphicsBackend> Fireworks<B> {
    /// Set up the engine, the particle pool and both layers.
    pub fn new(backend: B, config: DemoConfig) -> Result<Self> {
        config.validate()?;

        let engine_config = EngineConfig {
            coordinate_system: CoordinateSystemMode::OriginAtLowerLeft,
            render_policy: if config.display.continuous_render {
                RenderPolicy::Continuous
            } else {
                RenderPolicy::OnDemand
            },
            clear_color: Color::GREY_05,
            blend_mode: BlendMode::Additive,
        };
        let mut engine = DrawEngine::new(backend, engine_config);

        let atlas = particle_atlas().context("Failed to build particle atlas")?;
        engine.register_texture(ATLAS_TEXTURE, &atlas, CachePolicy::DisposeAfterLastUse)?;
        engine
            .register_tiled_texture(ATLAS, ATLAS_TEXTURE, CachePolicy::DisposeAfterLastUse)?
            .create_column_index(TiledTexture::DEFAULT_INDEX, 3)?;

        let lamps = Bitmap::solid(2 * TILE_SIZE, TILE_SIZE, Color::WHITE)?;
        engine.register_texture(HUD_TEXTURE, &lamps, CachePolicy::DisposeAfterLastUse)?;
        engine
            .register_tiled_texture(HUD, HUD_TEXTURE, CachePolicy::DisposeAfterLastUse)?
            .create_column_index(TiledTexture::DEFAULT_INDEX, 2)?;

        engine.create_layer(PARTICLE_LAYER, LayerKind::World)?;
        engine.create_layer(HUD_LAYER, LayerKind::Screen)?;

        let fw = &config.fireworks;
        let mut world = ParticleWorld::new();
        let mut pool = Vec::with_capacity(fw.pool_size as usize);
        let mut group = SpriteGroup::new(ATLAS);
        for _ in 0..fw.pool_size {
            let id = world.add_particle(Particle::immovable(Vec2::ZERO));
            world.add_force_generator(Box::new(Gravity::new(id, Vec2::new(0.0, -fw.gravity))))?;
            world.add_force_generator(Box::new(Drag::new(id, fw.drag_k1, fw.drag_k2)?))?;
            pool.push((id, Slot::Idle));

            let mut item = SpriteGroupItem::new(TileKey::Column(ROCKET_TILE), Coordinate2::ZERO);
            item.visible = false;
            group.push(item);
        }
        let group = engine.add_drawable(PARTICLE_LAYER, group)?;

        let height = config.display.height as f32;
        let mut lamp = Sprite::new(TileRef::new(HUD, TileKey::Column(0)))
            .at(Coordinate2::new(2.0 * TILE_SIZE as f32, height - TILE_SIZE as f32));
        lamp.set_tint(Color::GREY_30);
        let hud = engine.add_drawable(HUD_LAYER, lamp)?;

        {
            let mut camera = engine.world_camera_mut()?;
            // Launch pad at y = 0 along the bottom edge
            camera.set_center(Coordinate2::new(0.0, height * 0.5 * config.camera.zoom_start))?;
            camera.set_zoom(config.camera.zoom_start)?;
        }

        log::info!(
            "Fireworks ready: {} pooled particles, {} force generators",
            pool.len(),
            world.force_generator_count()
        );

        Ok(Self {
            rng: Xoshiro256StarStar::seed_from_u64(config.run.seed),
            launches_due: 0,
            config,
            engine,
            world,
            pool,
            group,
            hud,
            hud_lit: false,
            pool_changed: false,
            elapsed: 0.0,
            stats: FireworksStats::default(),
        })
    }

    pub fn engine(&self) -> &DrawEngine<B> {
        &self.engine
    }

    pub fn world(&self) -> &ParticleWorld {
        &self.world
    }

    pub fn stats(&self) -> FireworksStats {
        self.stats
    }

    /// Simulated seconds so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for (_, slot) in &self.pool {
            match slot {
                Slot::Idle => census.idle += 1,
                Slot::Rocket { .. } => census.rockets += 1,
                Slot::Spark { .. } => census.sparks += 1,
            }
        }
        census
    }

    /// Run `frames` frames and return the counters so far.
    pub fn run(&mut self, frames: u64) -> Result<FireworksStats> {
        for _ in 0..frames {
            self.step()?;
        }
        Ok(self.stats)
    }

    /// One frame: launch, simulate, mirror, render and present.
    pub fn step(&mut self) -> Result<()> {
        let dt = self.config.run.timestep;
        self.elapsed += dt;

        let launched = self.launch_rockets()?;
        self.simulate(dt)?;
        let burst = self.advance(dt)?;
        self.mirror()?;
        self.update_hud(launched || burst)?;
        self.move_camera(dt)?;
        self.present()
    }

    fn launch_rockets(&mut self) -> Result<bool> {
        let due = (self.elapsed / self.config.fireworks.launch_interval) as u64;
        let pending = due.saturating_sub(self.launches_due);
        self.launches_due = self.launches_due.max(due);
        if pending > MAX_LAUNCHES_PER_FRAME {
            log::debug!(
                "Dropping {} overdue launches",
                pending - MAX_LAUNCHES_PER_FRAME
            );
        }

        let mut launched = false;
        for _ in 0..pending.min(MAX_LAUNCHES_PER_FRAME) {
            let Some(slot) = self.pool.iter().position(|(_, s)| *s == Slot::Idle) else {
                log::debug!("Pool exhausted, skipping launch");
                break;
            };

            let fw = &self.config.fireworks;
            let reach = self.config.display.width as f32 * 0.3;
            let x = self.rng.gen_range(-reach..=reach);
            let speed = self.rng.gen_range(fw.launch_speed_min..=fw.launch_speed_max);
            let drift: f32 = self.rng.gen_range(-0.15..=0.15);
            let fuse = self.rng.gen_range(fw.fuse_min..=fw.fuse_max);

            let (id, state) = &mut self.pool[slot];
            let particle = self.world.particle_mut(*id)?;
            activate(
                particle,
                Vec2::new(x, 0.0),
                Vec2::new(drift * speed, speed),
                fw.particle_mass,
                fw.damping,
            )?;
            *state = Slot::Rocket { fuse };

            self.stats.rockets_launched += 1;
            self.pool_changed = true;
            launched = true;
        }
        Ok(launched)
    }

    /// Force pass over every generator, then integrate each particle.
    fn simulate(&mut self, dt: f32) -> Result<()> {
        self.world.update_forces(dt)?;
        for (_, particle) in self.world.particles_mut().iter_mut() {
            particle.integrate(dt)?;
        }
        Ok(())
    }

    /// Age rockets and sparks. Returns true if a rocket burst.
    fn advance(&mut self, dt: f32) -> Result<bool> {
        let mut bursts = Vec::new();
        for (id, slot) in self.pool.iter_mut() {
            let particle = self.world.particle_mut(*id)?;
            let done = match slot {
                Slot::Idle => false,
                Slot::Rocket { fuse } => {
                    *fuse -= dt;
                    // Burst at the apex if the fuse outlasts the climb
                    let done = *fuse <= 0.0 || particle.velocity.y <= 0.0;
                    if done {
                        bursts.push(particle.position);
                    }
                    done
                }
                Slot::Spark { age, lifetime, .. } => {
                    *age += dt;
                    *age >= *lifetime || particle.position.y < FLOOR
                }
            };
            if done {
                park(particle)?;
                *slot = Slot::Idle;
                self.pool_changed = true;
            }
        }

        let burst = !bursts.is_empty();
        for at in bursts {
            self.burst(at)?;
        }
        Ok(burst)
    }

    fn burst(&mut self, at: Vec2) -> Result<()> {
        let fw = &self.config.fireworks;
        let color = SPARK_COLORS[self.rng.gen_range(0..SPARK_COLORS.len())];

        let mut spawned = 0;
        for (id, slot) in self.pool.iter_mut().filter(|(_, s)| *s == Slot::Idle) {
            if spawned == fw.sparks_per_burst {
                break;
            }
            let angle: f32 = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed: f32 = self.rng.gen_range(0.5..=1.0) * fw.spark_speed;
            let particle = self.world.particle_mut(*id)?;
            activate(
                particle,
                at,
                Vec2::from_angle(angle) * speed,
                fw.particle_mass,
                fw.damping,
            )?;
            *slot = Slot::Spark {
                age: 0.0,
                lifetime: fw.spark_lifetime,
                color,
            };
            spawned += 1;
        }

        if spawned < fw.sparks_per_burst {
            log::debug!(
                "Burst at {} short of particles: {}/{} sparks",
                at,
                spawned,
                fw.sparks_per_burst
            );
        }
        self.stats.bursts += 1;
        self.pool_changed = true;
        Ok(())
    }

    /// Copy particle state into the sprite group.
    fn mirror(&mut self) -> Result<()> {
        let census = self.census();
        self.stats.peak_active = self.stats.peak_active.max(census.active());
        if census.active() == 0 && !self.pool_changed {
            return Ok(());
        }
        self.pool_changed = false;

        let group = self.engine.drawable_mut::<SpriteGroup>(self.group)?;
        for ((id, slot), item) in self.pool.iter().zip(group.items_mut()) {
            let particle = self.world.particle(*id)?;
            item.position = Coordinate2::from(particle.position);
            match *slot {
                Slot::Idle => item.visible = false,
                Slot::Rocket { .. } => {
                    item.visible = true;
                    item.tile = TileKey::Column(ROCKET_TILE);
                    item.tint = Color::WHITE;
                }
                Slot::Spark {
                    age,
                    lifetime,
                    color,
                } => {
                    let life = (1.0 - age / lifetime).clamp(0.0, 1.0);
                    item.visible = true;
                    item.tile = TileKey::Column(if life > 0.33 { SPARK_TILE } else { EMBER_TILE });
                    item.tint = color.with_alpha(life)?;
                }
            }
        }
        Ok(())
    }

    /// Light the HUD lamp on frames where something launched or burst.
    fn update_hud(&mut self, lit: bool) -> Result<()> {
        if lit == self.hud_lit {
            return Ok(());
        }
        self.hud_lit = lit;

        let lamp = self.engine.drawable_mut::<Sprite>(self.hud)?;
        let (column, tint) = if lit {
            (1, Color::YELLOW)
        } else {
            (0, Color::GREY_30)
        };
        lamp.set_tile(TiledTexture::DEFAULT_INDEX, TileKey::Column(column));
        lamp.set_tint(tint);
        Ok(())
    }

    fn move_camera(&mut self, dt: f32) -> Result<()> {
        let camera_config = &self.config.camera;
        if self.elapsed > camera_config.zoom_seconds {
            return Ok(());
        }

        let t = self.elapsed / camera_config.zoom_seconds;
        let zoom = camera_config.zoom_start + (camera_config.zoom_end - camera_config.zoom_start) * t;
        let pan = Vec2::new(camera_config.pan_x, camera_config.pan_y) * dt;

        let mut camera = self.engine.world_camera_mut()?;
        camera.set_zoom(zoom)?;
        camera.pan(pan)?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        match self.engine.render()? {
            RenderOutcome::Rendered { draw_calls, .. } => {
                self.stats.rendered_frames += 1;
                self.stats.draw_calls += u64::from(draw_calls);
            }
            RenderOutcome::Skipped => self.stats.skipped_frames += 1,
        }
        self.engine.swap_buffers()?;
        self.stats.frames += 1;
        Ok(())
    }

    /// Dispose the engine and log the run.
    pub fn shutdown(&mut self) -> FireworksStats {
        self.engine.dispose();

        let stats = self.stats;
        log::info!(
            "Fireworks done: {} frames ({} rendered, {} skipped), {} draw calls",
            stats.frames,
            stats.rendered_frames,
            stats.skipped_frames,
            stats.draw_calls
        );
        log::info!(
            "{} rockets, {} bursts, peak {} particles in flight",
            stats.rockets_launched,
            stats.bursts,
            stats.peak_active
        );
        stats
    }
}

fn activate(
    particle: &mut Particle,
    position: Vec2,
    velocity: Vec2,
    mass: f32,
    damping: f32,
) -> Result<()> {
    particle.position = position;
    particle.velocity = velocity;
    particle.set_mass(mass)?;
    particle.set_damping(damping)?;
    Ok(())
}

/// Pin a particle in place until it is reused.
fn park(particle: &mut Particle) -> Result<()> {
    particle.velocity = Vec2::ZERO;
    particle.set_inverse_mass(0.0)?;
    Ok(())
}
