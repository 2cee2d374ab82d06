//! Z-ordered layers.

use serde::{Deserialize, Serialize};

use crate::camera::CameraKind;
use crate::drawable::{Drawable, DrawableId, Frame};
use crate::Result;

/// Lowest z-index available to callers
pub const MIN_Z_INDEX: i32 = -10_000;
/// Highest z-index available to callers
pub const MAX_Z_INDEX: i32 = 10_000;
/// Reserved z-index of the world debug layer
pub const WORLD_DEBUG_Z_INDEX: i32 = MAX_Z_INDEX + 1;
/// Reserved z-index of the screen debug layer
pub const SCREEN_DEBUG_Z_INDEX: i32 = MAX_Z_INDEX + 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    World,
    Screen,
    WorldDebug,
    ScreenDebug,
}

impl LayerKind {
    /// Camera whose projection the layer renders with
    pub fn camera(self) -> CameraKind {
        match self {
            LayerKind::World | LayerKind::WorldDebug => CameraKind::World,
            LayerKind::Screen | LayerKind::ScreenDebug => CameraKind::Screen,
        }
    }

    pub fn is_debug(self) -> bool {
        matches!(self, LayerKind::WorldDebug | LayerKind::ScreenDebug)
    }
}

/// Drawables sharing one camera, rendered in insertion order.
///
/// Layers are created and owned by the draw engine; mutation goes through
/// the engine so it can track render state and texture users.
pub struct Layer {
    z_index: i32,
    kind: LayerKind,
    visible: bool,
    drawables: Vec<(DrawableId, Box<dyn Drawable>)>,
}

impl Layer {
    pub(crate) fn new(z_index: i32, kind: LayerKind) -> Self {
        Self {
            z_index,
            kind,
            visible: true,
            drawables: Vec::new(),
        }
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn camera(&self) -> CameraKind {
        self.kind.camera()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.position(id).is_some()
    }

    /// Drawable ids in render order
    pub fn drawable_ids(&self) -> impl Iterator<Item = DrawableId> + '_ {
        self.drawables.iter().map(|(id, _)| *id)
    }

    pub fn drawable(&self, id: DrawableId) -> Option<&dyn Drawable> {
        self.drawables
            .iter()
            .find(|(d, _)| *d == id)
            .map(|(_, drawable)| drawable.as_ref())
    }

    pub(crate) fn drawable_mut(&mut self, id: DrawableId) -> Option<&mut dyn Drawable> {
        for (d, drawable) in self.drawables.iter_mut() {
            if *d == id {
                return Some(drawable.as_mut());
            }
        }
        None
    }

    pub(crate) fn push(&mut self, id: DrawableId, drawable: Box<dyn Drawable>) {
        self.drawables.push((id, drawable));
    }

    /// Remove keeping the order of the rest.
    pub(crate) fn remove(&mut self, id: DrawableId) -> Option<Box<dyn Drawable>> {
        let i = self.position(id)?;
        Some(self.drawables.remove(i).1)
    }

    pub(crate) fn take_all(&mut self) -> Vec<(DrawableId, Box<dyn Drawable>)> {
        std::mem::take(&mut self.drawables)
    }

    /// Render visible drawables in insertion order.
    pub fn render(&self, frame: &mut Frame<'_>) -> Result<()> {
        for (_, drawable) in self.drawables.iter().filter(|(_, d)| d.is_visible()) {
            drawable.render(frame)?;
        }
        Ok(())
    }

    fn position(&self, id: DrawableId) -> Option<usize> {
        self.drawables.iter().position(|(d, _)| *d == id)
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("z_index", &self.z_index)
            .field("kind", &self.kind)
            .field("visible", &self.visible)
            .field("drawables", &self.drawables.len())
            .finish()
    }
}
