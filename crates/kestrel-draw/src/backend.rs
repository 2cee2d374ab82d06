//! Graphics backend seam
//!
//! The draw engine never rasterizes. It issues clears, texture uploads,
//! projection changes and quad batches through [`GraphicsBackend`] so that a
//! GPU implementation can live outside this crate. [`HeadlessBackend`] counts
//! what it is asked to do and can record the command stream for inspection.

use std::fmt;

use ahash::AHashMap;
use glam::{Mat4, UVec2};
use serde::{Deserialize, Serialize};

use crate::drawable::QuadVertex;
use crate::support::Color;
use crate::textures::Bitmap;
use crate::{DrawError, Result};

/// Backend-issued name for an uploaded texture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How drawn quads combine with the framebuffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    None,
    #[default]
    Normal,
    Additive,
    Multiplicative,
    PremultipliedAlpha,
}

/// Calls the draw engine makes on the graphics device
pub trait GraphicsBackend {
    /// Size of the render target in pixels
    fn framebuffer_size(&self) -> UVec2;

    fn set_clear_color(&mut self, color: Color);

    /// Clear the back buffer with the current clear color
    fn clear(&mut self);

    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Upload a bitmap and return its handle
    fn create_texture(&mut self, bitmap: &Bitmap) -> Result<TextureHandle>;

    /// Free a texture. Unknown handles are ignored.
    fn release_texture(&mut self, handle: TextureHandle);

    fn bind_texture(&mut self, handle: TextureHandle) -> Result<()>;

    /// Upload the projection used by subsequent draws
    fn set_projection(&mut self, projection: &Mat4);

    /// Draw quads with the bound texture. Vertices come in groups of four,
    /// top-left, bottom-left, top-right, bottom-right.
    fn draw_quads(&mut self, vertices: &[QuadVertex]) -> Result<()>;

    fn swap_buffers(&mut self);
}

/// A command as recorded by [`HeadlessBackend`]
#[derive(Clone, Debug, PartialEq)]
pub enum BackendCommand {
    SetClearColor(Color),
    Clear,
    SetBlendMode(BlendMode),
    CreateTexture {
        handle: TextureHandle,
        width: u32,
        height: u32,
    },
    ReleaseTexture(TextureHandle),
    BindTexture(TextureHandle),
    SetProjection(Mat4),
    DrawQuads {
        texture: TextureHandle,
        quads: usize,
    },
    SwapBuffers,
}

/// Backend without a device, for tests and offline runs
#[derive(Debug)]
pub struct HeadlessBackend {
    size: UVec2,
    next_handle: u32,
    textures: AHashMap<TextureHandle, UVec2>,
    bound: Option<TextureHandle>,
    recording: bool,
    commands: Vec<BackendCommand>,
    uploaded_bytes: usize,
    quads_drawn: usize,
    frames_presented: u64,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
            next_handle: 1,
            textures: AHashMap::new(),
            bound: None,
            recording: true,
            commands: Vec::new(),
            uploaded_bytes: 0,
            quads_drawn: 0,
            frames_presented: 0,
        }
    }

    /// Keep or skip the command log. Counters are kept either way.
    pub fn with_recording(mut self, recording: bool) -> Self {
        self.recording = recording;
        if !recording {
            self.commands = Vec::new();
        }
        self
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    /// Hand back and forget the recorded commands.
    pub fn take_commands(&mut self) -> Vec<BackendCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn is_live(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(&handle)
    }

    /// Bytes of vertex data passed to `draw_quads` so far
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    pub fn quads_drawn(&self) -> usize {
        self.quads_drawn
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    fn record(&mut self, command: BackendCommand) {
        if self.recording {
            self.commands.push(command);
        }
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn framebuffer_size(&self) -> UVec2 {
        self.size
    }

    fn set_clear_color(&mut self, color: Color) {
        self.record(BackendCommand::SetClearColor(color));
    }

    fn clear(&mut self) {
        self.record(BackendCommand::Clear);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.record(BackendCommand::SetBlendMode(mode));
    }

    fn create_texture(&mut self, bitmap: &Bitmap) -> Result<TextureHandle> {
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.textures
            .insert(handle, UVec2::new(bitmap.width(), bitmap.height()));
        self.record(BackendCommand::CreateTexture {
            handle,
            width: bitmap.width(),
            height: bitmap.height(),
        });
        Ok(handle)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_none() {
            log::warn!("Released unknown texture {}", handle);
            return;
        }
        if self.bound == Some(handle) {
            self.bound = None;
        }
        self.record(BackendCommand::ReleaseTexture(handle));
    }

    fn bind_texture(&mut self, handle: TextureHandle) -> Result<()> {
        if !self.textures.contains_key(&handle) {
            return Err(DrawError::UnknownTextureHandle(handle.raw()));
        }
        self.bound = Some(handle);
        self.record(BackendCommand::BindTexture(handle));
        Ok(())
    }

    fn set_projection(&mut self, projection: &Mat4) {
        self.record(BackendCommand::SetProjection(*projection));
    }

    fn draw_quads(&mut self, vertices: &[QuadVertex]) -> Result<()> {
        let texture = self.bound.ok_or(DrawError::NoTextureBound)?;
        if vertices.len() % 4 != 0 {
            return Err(DrawError::invalid(
                "vertices",
                format!("{} is not a multiple of 4", vertices.len()),
            ));
        }

        let quads = vertices.len() / 4;
        self.uploaded_bytes += bytemuck::cast_slice::<QuadVertex, u8>(vertices).len();
        self.quads_drawn += quads;
        self.record(BackendCommand::DrawQuads { texture, quads });
        Ok(())
    }

    fn swap_buffers(&mut self) {
        self.frames_presented += 1;
        self.record(BackendCommand::SwapBuffers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> [QuadVertex; 4] {
        [QuadVertex::default(); 4]
    }

    #[test]
    fn test_draw_requires_bound_texture() {
        let mut backend = HeadlessBackend::new(64, 64);
        assert_eq!(backend.draw_quads(&quad()), Err(DrawError::NoTextureBound));

        let bitmap = Bitmap::solid(2, 2, Color::WHITE).unwrap();
        let handle = backend.create_texture(&bitmap).unwrap();
        backend.bind_texture(handle).unwrap();
        backend.draw_quads(&quad()).unwrap();

        assert_eq!(backend.quads_drawn(), 1);
        assert_eq!(
            backend.uploaded_bytes(),
            4 * std::mem::size_of::<QuadVertex>()
        );
    }

    #[test]
    fn test_release_unbinds() {
        let mut backend = HeadlessBackend::new(64, 64);
        let bitmap = Bitmap::solid(2, 2, Color::WHITE).unwrap();
        let handle = backend.create_texture(&bitmap).unwrap();
        backend.bind_texture(handle).unwrap();

        backend.release_texture(handle);
        assert_eq!(backend.live_texture_count(), 0);
        assert!(backend.draw_quads(&quad()).is_err());
        assert_eq!(
            backend.bind_texture(handle),
            Err(DrawError::UnknownTextureHandle(handle.raw()))
        );
    }

    #[test]
    fn test_recording_off_keeps_counters() {
        let mut backend = HeadlessBackend::new(64, 64).with_recording(false);
        let bitmap = Bitmap::solid(1, 1, Color::WHITE).unwrap();
        let handle = backend.create_texture(&bitmap).unwrap();
        backend.bind_texture(handle).unwrap();
        for _ in 0..100 {
            backend.clear();
            backend.draw_quads(&quad()).unwrap();
            backend.swap_buffers();
        }

        assert!(!backend.is_recording());
        assert!(backend.commands().is_empty());
        assert_eq!(backend.quads_drawn(), 100);
        assert_eq!(backend.frames_presented(), 100);
        assert_eq!(backend.live_texture_count(), 1);
    }

    #[test]
    fn test_partial_quads_rejected() {
        let mut backend = HeadlessBackend::new(64, 64);
        let bitmap = Bitmap::solid(1, 1, Color::WHITE).unwrap();
        let handle = backend.create_texture(&bitmap).unwrap();
        backend.bind_texture(handle).unwrap();

        let vertices = [QuadVertex::default(); 3];
        assert!(backend.draw_quads(&vertices).is_err());
    }
}
