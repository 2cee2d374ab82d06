//! The draw engine
//!
//! `DrawEngine` owns the layers, both cameras and the texture registries,
//! and decides each frame whether anything needs to be drawn. Every
//! structural change (layers, drawables, clear color, blend mode, camera
//! moves) sets the render-required flag; `render` draws the layers in
//! ascending z-order and clears it.
//!
//! Lifecycle is two-phase: `DrawEngine::new` returns a ready engine and
//! `dispose` tears it down, releasing every backend texture. Dropping a live
//! engine disposes it.

mod layers;
mod registry;

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::backend::{BlendMode, GraphicsBackend};
use crate::camera::{Camera, CameraKind, CoordinateSystemMode};
use crate::drawable::{DrawableId, Frame};
use crate::layer::Layer;
use crate::lifecycle::Lifecycle;
use crate::support::Color;
use crate::textures::{ResourceCache, Texture, TiledTexture};
use crate::Result;

/// When `render` actually draws
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderPolicy {
    /// Draw only when something changed. The backend keeps showing the
    /// last image otherwise.
    #[default]
    OnDemand,
    /// Draw every frame, for backends that discard the back buffer on swap
    Continuous,
}

/// Engine settings fixed at construction, several adjustable later
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub coordinate_system: CoordinateSystemMode,
    pub render_policy: RenderPolicy,
    pub clear_color: Color,
    pub blend_mode: BlendMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            coordinate_system: CoordinateSystemMode::OriginAtUpperLeft,
            render_policy: RenderPolicy::OnDemand,
            clear_color: Color::BLACK,
            blend_mode: BlendMode::Normal,
        }
    }
}

/// Result of one `render` call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { layers: usize, draw_calls: u32 },
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RenderState {
    Clean,
    Required,
}

/// Where a drawable lives and which tiled texture it holds
#[derive(Clone, Debug)]
struct DrawableSlot {
    z_index: i32,
    tiled_texture: Option<String>,
}

pub struct DrawEngine<B: GraphicsBackend> {
    backend: B,
    config: EngineConfig,
    world_camera: Camera,
    screen_camera: Camera,
    textures: ResourceCache<Texture>,
    tiled_textures: ResourceCache<TiledTexture>,
    layers: BTreeMap<i32, Layer>,
    drawables: AHashMap<DrawableId, DrawableSlot>,
    next_drawable: u64,
    render_state: RenderState,
    render_required_last_frame: bool,
    draw_calls: u32,
    lifecycle: Lifecycle,
}

impl<B: GraphicsBackend> DrawEngine<B> {
    pub fn new(backend: B, config: EngineConfig) -> Self {
        let framebuffer = backend.framebuffer_size();
        log::info!(
            "Draw engine ready ({}x{}, {:?}, {:?})",
            framebuffer.x,
            framebuffer.y,
            config.coordinate_system,
            config.render_policy
        );

        Self {
            world_camera: Camera::world(framebuffer, config.coordinate_system),
            screen_camera: Camera::screen(framebuffer, config.coordinate_system),
            backend,
            config,
            textures: ResourceCache::new("texture"),
            tiled_textures: ResourceCache::new("tiled texture"),
            layers: BTreeMap::new(),
            drawables: AHashMap::new(),
            next_drawable: 0,
            render_state: RenderState::Required,
            render_required_last_frame: false,
            draw_calls: 0,
            lifecycle: Lifecycle::Live,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Direct backend access. Changes made here are not tracked.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }

    // ------------------------------------------------------------------
    // Render state
    // ------------------------------------------------------------------

    pub fn is_render_required(&self) -> bool {
        self.render_state == RenderState::Required
    }

    /// Force the next `render` to draw.
    pub fn mark_render_required(&mut self) {
        self.render_state = RenderState::Required;
    }

    /// Whether the previous `render` call found the flag set
    pub fn render_required_last_frame(&self) -> bool {
        self.render_required_last_frame
    }

    /// Draw calls issued by the previous `render`
    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    pub fn clear_color(&self) -> Color {
        self.config.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        self.config.clear_color = color;
        self.mark_render_required();
        Ok(())
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.config.blend_mode
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        self.config.blend_mode = mode;
        self.mark_render_required();
        Ok(())
    }

    pub fn render_policy(&self) -> RenderPolicy {
        self.config.render_policy
    }

    pub fn set_render_policy(&mut self, policy: RenderPolicy) {
        self.config.render_policy = policy;
    }

    pub fn coordinate_system(&self) -> CoordinateSystemMode {
        self.config.coordinate_system
    }

    /// Switch the coordinate system of both cameras.
    pub fn set_coordinate_system(&mut self, mode: CoordinateSystemMode) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        if self.config.coordinate_system == mode {
            return Ok(());
        }
        self.config.coordinate_system = mode;
        self.world_camera.set_coordinate_system(mode);
        self.screen_camera.set_coordinate_system(mode);
        self.mark_render_required();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cameras
    // ------------------------------------------------------------------

    pub fn world_camera(&self) -> &Camera {
        &self.world_camera
    }

    /// Mutable world camera. Any change marks the engine for rendering.
    pub fn world_camera_mut(&mut self) -> Result<CameraHandle<'_>> {
        self.lifecycle.ensure_live("draw engine")?;
        let revision = self.world_camera.revision();
        Ok(CameraHandle {
            camera: &mut self.world_camera,
            render_state: &mut self.render_state,
            revision,
        })
    }

    pub fn screen_camera(&self) -> &Camera {
        &self.screen_camera
    }

    pub fn camera(&self, kind: CameraKind) -> &Camera {
        match kind {
            CameraKind::World => &self.world_camera,
            CameraKind::Screen => &self.screen_camera,
        }
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Draw every visible layer if needed.
    ///
    /// Under [`RenderPolicy::OnDemand`] nothing is issued unless render is
    /// required. Either way the flag is clear afterwards.
    pub fn render(&mut self) -> Result<RenderOutcome> {
        self.lifecycle.ensure_live("draw engine")?;

        let required = self.is_render_required();
        self.render_required_last_frame = required;
        self.draw_calls = 0;

        if !required && self.config.render_policy == RenderPolicy::OnDemand {
            log::trace!("Render skipped, nothing changed");
            return Ok(RenderOutcome::Skipped);
        }

        self.backend.set_clear_color(self.config.clear_color);
        self.backend.set_blend_mode(self.config.blend_mode);
        self.backend.clear();

        let world_projection = self.world_camera.projection();
        let screen_projection = self.screen_camera.projection();

        let mut layers_drawn = 0;
        for layer in self.layers.values().filter(|layer| layer.is_visible()) {
            let projection = match layer.camera() {
                CameraKind::World => &world_projection,
                CameraKind::Screen => &screen_projection,
            };
            self.backend.set_projection(projection);

            let mut frame = Frame::new(
                &mut self.backend,
                &self.textures,
                &self.tiled_textures,
                self.config.coordinate_system,
            );
            layer.render(&mut frame)?;
            self.draw_calls += frame.draw_calls();
            layers_drawn += 1;
        }

        self.render_state = RenderState::Clean;
        log::trace!(
            "Rendered {} layers with {} draw calls",
            layers_drawn,
            self.draw_calls
        );
        Ok(RenderOutcome::Rendered {
            layers: layers_drawn,
            draw_calls: self.draw_calls,
        })
    }

    /// Present the back buffer. Separate from `render` on purpose: a skipped
    /// frame still swaps.
    pub fn swap_buffers(&mut self) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        self.backend.swap_buffers();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Remove every layer and release every cached texture.
    ///
    /// Later calls on the engine fail with `DrawError::Disposed`. Disposing
    /// twice is a no-op.
    pub fn dispose(&mut self) {
        if !self.lifecycle.dispose() {
            return;
        }

        if !self.drawables.is_empty() {
            log::warn!(
                "Disposing draw engine with {} drawables still on layers",
                self.drawables.len()
            );
        }
        self.layers.clear();
        self.drawables.clear();

        let tiled = self.tiled_textures.drain();
        let textures = self.textures.drain();
        for (_, texture) in &textures {
            self.backend.release_texture(texture.handle);
        }

        log::info!(
            "Draw engine disposed, released {} textures and {} tiled textures",
            textures.len(),
            tiled.len()
        );
    }
}

impl<B: GraphicsBackend> Drop for DrawEngine<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Mutable access to the world camera.
///
/// If the camera changed by the time the handle is dropped, the engine is
/// marked for rendering.
pub struct CameraHandle<'a> {
    camera: &'a mut Camera,
    render_state: &'a mut RenderState,
    revision: u64,
}

impl Deref for CameraHandle<'_> {
    type Target = Camera;

    fn deref(&self) -> &Camera {
        self.camera
    }
}

impl DerefMut for CameraHandle<'_> {
    fn deref_mut(&mut self) -> &mut Camera {
        self.camera
    }
}

impl Drop for CameraHandle<'_> {
    fn drop(&mut self) {
        if self.camera.revision() != self.revision {
            *self.render_state = RenderState::Required;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCommand, HeadlessBackend};
    use crate::support::Coordinate2;
    use crate::DrawError;

    fn engine() -> DrawEngine<HeadlessBackend> {
        DrawEngine::new(HeadlessBackend::new(960, 544), EngineConfig::default())
    }

    #[test]
    fn test_new_engine_requires_render() {
        let mut engine = engine();
        assert!(engine.is_render_required());

        assert_eq!(
            engine.render().unwrap(),
            RenderOutcome::Rendered {
                layers: 0,
                draw_calls: 0
            }
        );
        assert!(!engine.is_render_required());
        assert!(engine.render_required_last_frame());
    }

    #[test]
    fn test_on_demand_skips_clean_frames() {
        let mut engine = engine();
        engine.render().unwrap();
        engine.backend_mut().take_commands();

        assert_eq!(engine.render().unwrap(), RenderOutcome::Skipped);
        assert!(!engine.render_required_last_frame());
        assert!(engine.backend().commands().is_empty());
    }

    #[test]
    fn test_continuous_always_renders() {
        let mut engine = DrawEngine::new(
            HeadlessBackend::new(64, 64),
            EngineConfig {
                render_policy: RenderPolicy::Continuous,
                ..EngineConfig::default()
            },
        );
        engine.render().unwrap();
        engine.backend_mut().take_commands();

        assert!(matches!(
            engine.render().unwrap(),
            RenderOutcome::Rendered { .. }
        ));
        assert!(!engine.render_required_last_frame());
        assert!(engine.backend().commands().contains(&BackendCommand::Clear));
    }

    #[test]
    fn test_clear_color_marks_render_required() {
        let mut engine = engine();
        engine.render().unwrap();

        engine.set_clear_color(Color::GREY_20).unwrap();
        assert!(engine.is_render_required());
        engine.render().unwrap();
        assert!(
            engine
                .backend()
                .commands()
                .contains(&BackendCommand::SetClearColor(Color::GREY_20))
        );
    }

    #[test]
    fn test_camera_handle_marks_only_on_change() {
        let mut engine = engine();
        engine.render().unwrap();

        {
            let camera = engine.world_camera_mut().unwrap();
            assert_eq!(camera.zoom(), 1.0);
        }
        assert!(!engine.is_render_required());

        engine
            .world_camera_mut()
            .unwrap()
            .set_center(Coordinate2::new(5.0, 5.0))
            .unwrap();
        assert!(engine.is_render_required());
    }

    #[test]
    fn test_coordinate_system_switch() {
        let mut engine = engine();
        engine.render().unwrap();

        engine
            .set_coordinate_system(CoordinateSystemMode::OriginAtLowerLeft)
            .unwrap();
        assert!(engine.is_render_required());
        assert!(engine.world_camera().is_dirty());
        assert!(engine.screen_camera().is_dirty());
    }

    #[test]
    fn test_disposed_engine_rejects_calls() {
        let mut engine = engine();
        engine.dispose();
        engine.dispose();

        assert!(engine.is_disposed());
        assert_eq!(engine.render(), Err(DrawError::Disposed("draw engine")));
        assert!(engine.swap_buffers().is_err());
        assert!(engine.set_clear_color(Color::RED).is_err());
    }

    #[test]
    fn test_config_from_ron() {
        let config: EngineConfig =
            ron::from_str("(render_policy: Continuous, clear_color: (0.1, 0.2, 0.3, 1.0))")
                .unwrap();
        assert_eq!(config.render_policy, RenderPolicy::Continuous);
        assert_eq!(config.coordinate_system, CoordinateSystemMode::OriginAtUpperLeft);
        assert_eq!(config.clear_color.as_array(), [0.1, 0.2, 0.3, 1.0]);
    }
}
