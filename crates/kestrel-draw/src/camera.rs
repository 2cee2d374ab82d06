//! World and screen cameras.
//!
//! A camera keeps its inputs (center, zoom, rotation, framebuffer size and
//! coordinate system) and a cached [`CameraView`] derived from them. Setters
//! only mark the cache dirty; the view is recomputed by [`Camera::view`] the
//! next time it is read.

use glam::{Mat4, UVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::support::{Angle2, Coordinate2, RectangularArea2};
use crate::{DrawError, Result};

/// Which reference frame a camera projects
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraKind {
    /// Pans, zooms and rotates over world space
    World,
    /// Fixed to the framebuffer, one unit per pixel
    Screen,
}

/// Where y = 0 sits on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystemMode {
    /// y grows downward
    #[default]
    OriginAtUpperLeft,
    /// y grows upward
    OriginAtLowerLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraState {
    Clean,
    Dirty,
}

/// Values derived from a camera's inputs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub projection: Mat4,
    /// Visible area in camera units
    pub bounds: RectangularArea2,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug)]
pub struct Camera {
    kind: CameraKind,
    center: Coordinate2,
    zoom: f32,
    rotation: Angle2,
    framebuffer: UVec2,
    mode: CoordinateSystemMode,
    state: CameraState,
    view: CameraView,
    revision: u64,
}

impl Camera {
    pub const DEFAULT_ZOOM: f32 = 1.0;

    /// World camera centered on the origin.
    pub fn world(framebuffer: UVec2, mode: CoordinateSystemMode) -> Self {
        Self::build(CameraKind::World, Coordinate2::ZERO, framebuffer, mode)
    }

    /// Screen camera covering the framebuffer exactly.
    pub fn screen(framebuffer: UVec2, mode: CoordinateSystemMode) -> Self {
        let center = Coordinate2::from(framebuffer.as_vec2() * 0.5);
        Self::build(CameraKind::Screen, center, framebuffer, mode)
    }

    fn build(
        kind: CameraKind,
        center: Coordinate2,
        framebuffer: UVec2,
        mode: CoordinateSystemMode,
    ) -> Self {
        let mut camera = Self {
            kind,
            center,
            zoom: Self::DEFAULT_ZOOM,
            rotation: Angle2::ZERO,
            framebuffer,
            mode,
            state: CameraState::Dirty,
            view: CameraView {
                projection: Mat4::IDENTITY,
                bounds: RectangularArea2::ZERO,
                width: 0.0,
                height: 0.0,
            },
            revision: 0,
        };
        camera.view();
        camera
    }

    pub fn kind(&self) -> CameraKind {
        self.kind
    }

    pub fn center(&self) -> Coordinate2 {
        self.center
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rotation(&self) -> Angle2 {
        self.rotation
    }

    pub fn framebuffer_size(&self) -> UVec2 {
        self.framebuffer
    }

    pub fn coordinate_system(&self) -> CoordinateSystemMode {
        self.mode
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == CameraState::Dirty
    }

    /// Bumped by every mutation, clean or not
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_center(&mut self, center: Coordinate2) -> Result<()> {
        self.ensure_movable()?;
        if !(center.x.is_finite() && center.y.is_finite()) {
            return Err(DrawError::invalid("center", format!("{center} is not finite")));
        }
        self.center = center;
        self.mark_dirty();
        Ok(())
    }

    pub fn pan(&mut self, delta: Vec2) -> Result<()> {
        self.set_center(self.center.offset(delta))
    }

    /// Zoom multiplies the visible extent, so 2.0 shows twice as much.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<()> {
        self.ensure_movable()?;
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(DrawError::InvalidZoom(zoom));
        }
        self.zoom = zoom;
        self.mark_dirty();
        Ok(())
    }

    /// Rotate the view about its center.
    pub fn set_rotation(&mut self, rotation: Angle2) -> Result<()> {
        self.ensure_movable()?;
        self.rotation = rotation;
        self.mark_dirty();
        Ok(())
    }

    /// Only the camera center is supported as a pivot.
    pub fn set_rotation_about(&mut self, rotation: Angle2, pivot: Coordinate2) -> Result<()> {
        if pivot != self.center {
            return Err(DrawError::NotImplemented("rotation about an off-center point"));
        }
        self.set_rotation(rotation)
    }

    pub(crate) fn set_coordinate_system(&mut self, mode: CoordinateSystemMode) {
        if self.mode != mode {
            self.mode = mode;
            self.mark_dirty();
        }
    }

    /// Cached view, recomputed first if any input changed.
    pub fn view(&mut self) -> &CameraView {
        if self.state == CameraState::Dirty {
            self.view = self.compute_view();
            self.state = CameraState::Clean;
        }
        &self.view
    }

    /// Read-only view: the cache when clean, a fresh computation otherwise.
    pub fn current_view(&self) -> CameraView {
        match self.state {
            CameraState::Clean => self.view,
            CameraState::Dirty => self.compute_view(),
        }
    }

    pub fn projection(&mut self) -> Mat4 {
        self.view().projection
    }

    pub fn bounds(&mut self) -> RectangularArea2 {
        self.view().bounds
    }

    pub fn width(&mut self) -> f32 {
        self.view().width
    }

    pub fn height(&mut self) -> f32 {
        self.view().height
    }

    /// Derive the view from the current inputs without touching the cache.
    pub fn compute_view(&self) -> CameraView {
        let size = self.framebuffer.as_vec2() * self.zoom;
        let half = size * 0.5;
        let (cx, cy) = (self.center.x, self.center.y);

        let left = cx - half.x;
        let right = cx + half.x;
        let (top, bottom) = match self.mode {
            CoordinateSystemMode::OriginAtUpperLeft => (cy - half.y, cy + half.y),
            CoordinateSystemMode::OriginAtLowerLeft => (cy + half.y, cy - half.y),
        };

        let mut projection = Mat4::orthographic_rh_gl(left, right, bottom, top, -1.0, 1.0);
        if !self.rotation.is_zero() {
            let pivot = Vec3::new(cx, cy, 0.0);
            projection = projection
                * Mat4::from_translation(pivot)
                * Mat4::from_rotation_z(self.rotation.radians())
                * Mat4::from_translation(-pivot);
        }

        CameraView {
            projection,
            bounds: RectangularArea2::new(left, top, right, bottom),
            width: size.x,
            height: size.y,
        }
    }

    fn ensure_movable(&self) -> Result<()> {
        match self.kind {
            CameraKind::World => Ok(()),
            CameraKind::Screen => Err(DrawError::FixedCamera),
        }
    }

    fn mark_dirty(&mut self) {
        self.state = CameraState::Dirty;
        self.revision += 1;
    }
}
