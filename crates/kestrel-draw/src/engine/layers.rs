//! Layer and drawable management.

use super::{DrawEngine, DrawableSlot};
use crate::backend::GraphicsBackend;
use crate::camera::CameraKind;
use crate::drawable::{Drawable, DrawableId};
use crate::layer::{
    Layer, LayerKind, MAX_Z_INDEX, MIN_Z_INDEX, SCREEN_DEBUG_Z_INDEX, WORLD_DEBUG_Z_INDEX,
};
use crate::textures::CacheUser;
use crate::{DrawError, Result};

impl<B: GraphicsBackend> DrawEngine<B> {
    /// Create an empty layer at `z_index`.
    ///
    /// Debug layers sit above the public range and are only created through
    /// [`DrawEngine::ensure_debug_layer`].
    pub fn create_layer(&mut self, z_index: i32, kind: LayerKind) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        if !(MIN_Z_INDEX..=MAX_Z_INDEX).contains(&z_index) {
            return Err(DrawError::ZIndexOutOfRange(z_index));
        }
        if kind.is_debug() {
            return Err(DrawError::invalid(
                "kind",
                format!("{kind:?} layers are reserved"),
            ));
        }
        self.insert_layer(z_index, kind)
    }

    /// Layer at `z_index`, created first if missing.
    pub fn get_or_create_layer(&mut self, z_index: i32, kind: LayerKind) -> Result<&Layer> {
        self.lifecycle.ensure_live("draw engine")?;
        match self.layers.get(&z_index).map(Layer::kind) {
            Some(actual) if actual != kind => {
                return Err(DrawError::LayerKindMismatch {
                    z_index,
                    expected: kind,
                    actual,
                });
            }
            Some(_) => {}
            None => self.create_layer(z_index, kind)?,
        }
        self.layer(z_index)
    }

    /// Debug layer drawn with `camera`, created on first use. Returns its
    /// z-index.
    pub fn ensure_debug_layer(&mut self, camera: CameraKind) -> Result<i32> {
        self.lifecycle.ensure_live("draw engine")?;
        let (z_index, kind) = match camera {
            CameraKind::World => (WORLD_DEBUG_Z_INDEX, LayerKind::WorldDebug),
            CameraKind::Screen => (SCREEN_DEBUG_Z_INDEX, LayerKind::ScreenDebug),
        };
        if !self.layers.contains_key(&z_index) {
            self.insert_layer(z_index, kind)?;
        }
        Ok(z_index)
    }

    fn insert_layer(&mut self, z_index: i32, kind: LayerKind) -> Result<()> {
        if self.layers.contains_key(&z_index) {
            return Err(DrawError::LayerExists(z_index));
        }
        self.layers.insert(z_index, Layer::new(z_index, kind));
        self.mark_render_required();
        log::debug!("Created {:?} layer at z-index {}", kind, z_index);
        Ok(())
    }

    pub fn layer(&self, z_index: i32) -> Result<&Layer> {
        self.layers
            .get(&z_index)
            .ok_or(DrawError::UnknownLayer(z_index))
    }

    pub fn layer_exists(&self, z_index: i32) -> bool {
        self.layers.contains_key(&z_index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layers in render order, lowest z-index first
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    pub fn set_layer_visible(&mut self, z_index: i32, visible: bool) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        let layer = self
            .layers
            .get_mut(&z_index)
            .ok_or(DrawError::UnknownLayer(z_index))?;
        if layer.is_visible() != visible {
            layer.set_visible(visible);
            self.mark_render_required();
        }
        Ok(())
    }

    /// Remove a layer and every drawable on it.
    pub fn remove_layer(&mut self, z_index: i32) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        let mut layer = self
            .layers
            .remove(&z_index)
            .ok_or(DrawError::UnknownLayer(z_index))?;
        self.mark_render_required();

        let drawables = layer.take_all();
        log::debug!(
            "Removed layer at z-index {} with {} drawables",
            z_index,
            drawables.len()
        );
        for (id, _) in drawables {
            self.forget_drawable(id)?;
        }
        Ok(())
    }

    /// Remove every layer.
    pub fn clear_layers(&mut self) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        let z_indexes: Vec<i32> = self.layers.keys().copied().collect();
        for z_index in z_indexes {
            self.remove_layer(z_index)?;
        }
        Ok(())
    }

    /// Put `drawable` on the layer at `z_index`, after everything already there.
    ///
    /// A drawable sampling a tiled texture becomes one of its users until it
    /// is removed.
    pub fn add_drawable<D: Drawable + 'static>(
        &mut self,
        z_index: i32,
        drawable: D,
    ) -> Result<DrawableId> {
        self.lifecycle.ensure_live("draw engine")?;
        if !self.layers.contains_key(&z_index) {
            return Err(DrawError::UnknownLayer(z_index));
        }

        let id = DrawableId(self.next_drawable);
        let tiled_texture = drawable.tiled_texture().map(str::to_string);
        if let Some(key) = &tiled_texture {
            self.acquire_tiled_texture(key, CacheUser::Drawable(id))?;
        }
        self.next_drawable += 1;

        let layer = self
            .layers
            .get_mut(&z_index)
            .ok_or(DrawError::UnknownLayer(z_index))?;
        layer.push(id, Box::new(drawable));
        self.drawables.insert(
            id,
            DrawableSlot {
                z_index,
                tiled_texture,
            },
        );
        self.mark_render_required();
        log::trace!("Added drawable {} to layer {}", id, z_index);
        Ok(id)
    }

    /// Take a drawable off its layer and hand it back.
    pub fn remove_drawable(&mut self, id: DrawableId) -> Result<Box<dyn Drawable>> {
        self.lifecycle.ensure_live("draw engine")?;
        let z_index = self.slot(id)?.z_index;
        let drawable = self
            .layers
            .get_mut(&z_index)
            .and_then(|layer| layer.remove(id))
            .ok_or(DrawError::UnknownDrawable(id))?;
        self.mark_render_required();
        self.forget_drawable(id)?;
        Ok(drawable)
    }

    /// Typed view of a drawable.
    pub fn drawable<T: Drawable + 'static>(&self, id: DrawableId) -> Result<&T> {
        let z_index = self.slot(id)?.z_index;
        let drawable = self
            .layers
            .get(&z_index)
            .and_then(|layer| layer.drawable(id))
            .ok_or(DrawError::UnknownDrawable(id))?;
        drawable
            .as_any()
            .downcast_ref::<T>()
            .ok_or(DrawError::DrawableTypeMismatch(id))
    }

    /// Typed mutable view of a drawable. Marks the engine for rendering.
    pub fn drawable_mut<T: Drawable + 'static>(&mut self, id: DrawableId) -> Result<&mut T> {
        self.lifecycle.ensure_live("draw engine")?;
        let z_index = self.slot(id)?.z_index;
        self.mark_render_required();
        let drawable = self
            .layers
            .get_mut(&z_index)
            .and_then(|layer| layer.drawable_mut(id))
            .ok_or(DrawError::UnknownDrawable(id))?;
        drawable
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(DrawError::DrawableTypeMismatch(id))
    }

    /// Layer a drawable is on
    pub fn drawable_layer(&self, id: DrawableId) -> Result<i32> {
        Ok(self.slot(id)?.z_index)
    }

    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    fn slot(&self, id: DrawableId) -> Result<&DrawableSlot> {
        self.drawables
            .get(&id)
            .ok_or(DrawError::UnknownDrawable(id))
    }

    /// Drop the slot of a drawable already taken off its layer and give up
    /// its tiled texture.
    fn forget_drawable(&mut self, id: DrawableId) -> Result<()> {
        let slot = self
            .drawables
            .remove(&id)
            .ok_or(DrawError::UnknownDrawable(id))?;
        if let Some(key) = slot.tiled_texture {
            self.release_tiled_texture(&key, &CacheUser::Drawable(id))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::HeadlessBackend;
    use crate::camera::CameraKind;
    use crate::drawable::{Drawable, Frame, Sprite, SpriteGroup};
    use crate::engine::{DrawEngine, EngineConfig};
    use crate::layer::{LayerKind, MAX_Z_INDEX, WORLD_DEBUG_Z_INDEX};
    use crate::support::{Color, Coordinate2};
    use crate::textures::{Bitmap, CachePolicy, TileKey, TileRef, TiledTexture};
    use crate::{DrawError, Result};

    struct Plain;

    impl Drawable for Plain {
        fn render(&self, _frame: &mut Frame<'_>) -> Result<()> {
            Ok(())
        }
    }

    fn engine() -> DrawEngine<HeadlessBackend> {
        let mut engine = DrawEngine::new(HeadlessBackend::new(320, 240), EngineConfig::default());
        let bitmap = Bitmap::solid(64, 16, Color::WHITE).unwrap();
        engine
            .register_texture("atlas", &bitmap, CachePolicy::DisposeAfterLastUse)
            .unwrap();
        engine
            .register_tiled_texture("tiles", "atlas", CachePolicy::DisposeAfterLastUse)
            .unwrap()
            .create_column_index(TiledTexture::DEFAULT_INDEX, 4)
            .unwrap();
        engine
    }

    fn sprite(column: u32) -> Sprite {
        Sprite::new(TileRef::new("tiles", TileKey::Column(column)))
    }

    #[test]
    fn test_create_layer_validates() {
        let mut engine = engine();
        engine.create_layer(0, LayerKind::World).unwrap();

        assert_eq!(
            engine.create_layer(0, LayerKind::Screen),
            Err(DrawError::LayerExists(0))
        );
        assert_eq!(
            engine.create_layer(MAX_Z_INDEX + 1, LayerKind::World),
            Err(DrawError::ZIndexOutOfRange(MAX_Z_INDEX + 1))
        );
        assert!(engine.create_layer(5, LayerKind::WorldDebug).is_err());
        assert_eq!(engine.layer_count(), 1);
    }

    #[test]
    fn test_get_or_create_layer() {
        let mut engine = engine();
        assert_eq!(
            engine.get_or_create_layer(3, LayerKind::Screen).unwrap().kind(),
            LayerKind::Screen
        );
        assert!(engine.get_or_create_layer(3, LayerKind::Screen).is_ok());
        assert!(matches!(
            engine.get_or_create_layer(3, LayerKind::World),
            Err(DrawError::LayerKindMismatch { z_index: 3, .. })
        ));
    }

    #[test]
    fn test_debug_layer_created_once() {
        let mut engine = engine();
        assert_eq!(
            engine.ensure_debug_layer(CameraKind::World),
            Ok(WORLD_DEBUG_Z_INDEX)
        );
        assert_eq!(
            engine.ensure_debug_layer(CameraKind::World),
            Ok(WORLD_DEBUG_Z_INDEX)
        );
        assert_eq!(engine.layer_count(), 1);
        assert_eq!(
            engine.layer(WORLD_DEBUG_Z_INDEX).unwrap().kind(),
            LayerKind::WorldDebug
        );
    }

    #[test]
    fn test_layers_iterate_in_z_order() {
        let mut engine = engine();
        for z in [10, -5, 0] {
            engine.create_layer(z, LayerKind::World).unwrap();
        }
        let order: Vec<i32> = engine.layers().map(|layer| layer.z_index()).collect();
        assert_eq!(order, vec![-5, 0, 10]);
    }

    #[test]
    fn test_add_drawable_holds_tiled_texture() {
        let mut engine = engine();
        engine.create_layer(0, LayerKind::World).unwrap();

        let first = engine.add_drawable(0, sprite(0)).unwrap();
        let second = engine.add_drawable(0, sprite(1)).unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.tiled_texture_user_count("tiles"), Ok(2));

        engine.remove_drawable(first).unwrap();
        assert_eq!(engine.tiled_texture_user_count("tiles"), Ok(1));
        assert_eq!(
            engine.remove_drawable(first).err(),
            Some(DrawError::UnknownDrawable(first))
        );
    }

    #[test]
    fn test_add_drawable_needs_layer_and_texture() {
        let mut engine = engine();
        assert_eq!(
            engine.add_drawable(7, Plain).err(),
            Some(DrawError::UnknownLayer(7))
        );

        engine.create_layer(7, LayerKind::World).unwrap();
        let group = SpriteGroup::new("missing");
        assert!(matches!(
            engine.add_drawable(7, group),
            Err(DrawError::NotRegistered { .. })
        ));
        assert_eq!(engine.drawable_count(), 0);
        assert!(engine.layer(7).unwrap().is_empty());
    }

    #[test]
    fn test_typed_access() {
        let mut engine = engine();
        engine.create_layer(0, LayerKind::World).unwrap();
        let id = engine.add_drawable(0, sprite(2)).unwrap();
        engine.render().unwrap();

        engine
            .drawable_mut::<Sprite>(id)
            .unwrap()
            .set_position(Coordinate2::new(4.0, 4.0));
        assert!(engine.is_render_required());
        assert_eq!(
            engine.drawable::<Sprite>(id).unwrap().position(),
            Coordinate2::new(4.0, 4.0)
        );
        assert_eq!(
            engine.drawable::<SpriteGroup>(id).err(),
            Some(DrawError::DrawableTypeMismatch(id))
        );
        assert_eq!(engine.drawable_layer(id), Ok(0));
    }

    #[test]
    fn test_remove_layer_releases_drawables() {
        let mut engine = engine();
        engine.create_layer(1, LayerKind::World).unwrap();
        engine.create_layer(2, LayerKind::Screen).unwrap();
        engine.add_drawable(1, sprite(0)).unwrap();
        engine.add_drawable(1, Plain).unwrap();
        let kept = engine.add_drawable(2, sprite(3)).unwrap();

        engine.remove_layer(1).unwrap();
        assert_eq!(engine.drawable_count(), 1);
        assert_eq!(engine.tiled_texture_user_count("tiles"), Ok(1));
        assert!(engine.drawable::<Sprite>(kept).is_ok());
        assert_eq!(engine.remove_layer(1), Err(DrawError::UnknownLayer(1)));

        // The last user goes and takes the whole chain with it
        engine.clear_layers().unwrap();
        assert_eq!(engine.layer_count(), 0);
        assert!(!engine.has_tiled_texture("tiles"));
        assert!(!engine.has_texture("atlas"));
    }

    #[test]
    fn test_layer_visibility_marks_render_required() {
        let mut engine = engine();
        engine.create_layer(0, LayerKind::World).unwrap();
        engine.render().unwrap();

        engine.set_layer_visible(0, true).unwrap();
        assert!(!engine.is_render_required());
        engine.set_layer_visible(0, false).unwrap();
        assert!(engine.is_render_required());
        assert!(!engine.layer(0).unwrap().is_visible());
        assert!(engine.set_layer_visible(9, false).is_err());
    }
}
