//! Texture and tiled texture registration.
//!
//! Textures are uploaded on registration and released through the backend
//! when evicted or unregistered. A tiled texture is a user of its texture,
//! and drawables are users of their tiled texture, so removing the last
//! drawable can cascade all the way down to the backend.

use super::DrawEngine;
use crate::backend::GraphicsBackend;
use crate::textures::{Bitmap, CachePolicy, CacheUser, Texture, TiledTexture};
use crate::Result;

impl<B: GraphicsBackend> DrawEngine<B> {
    /// Upload `bitmap` and cache it under `key`.
    pub fn register_texture(
        &mut self,
        key: &str,
        bitmap: &Bitmap,
        policy: CachePolicy,
    ) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        self.textures.ensure_vacant(key)?;

        let handle = self.backend.create_texture(bitmap)?;
        let texture = Texture {
            handle,
            width: bitmap.width(),
            height: bitmap.height(),
            format: bitmap.format(),
        };
        if let Err(err) = self.textures.register(key, texture, policy) {
            self.backend.release_texture(handle);
            return Err(err);
        }
        Ok(())
    }

    /// Drop a texture nobody uses and release it on the backend.
    pub fn unregister_texture(&mut self, key: &str) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        let texture = self.textures.unregister(key)?;
        self.backend.release_texture(texture.handle);
        Ok(())
    }

    pub fn texture(&self, key: &str) -> Result<&Texture> {
        self.textures.get(key)
    }

    pub fn has_texture(&self, key: &str) -> bool {
        self.textures.contains(key)
    }

    pub fn texture_user_count(&self, key: &str) -> Result<usize> {
        self.textures.user_count(key)
    }

    pub fn add_texture_user(&mut self, key: &str, user: CacheUser) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        self.textures.add_user(key, user)
    }

    /// Remove a texture user, releasing the texture if it was the last one.
    pub fn remove_texture_user(&mut self, key: &str, user: &CacheUser) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        self.release_texture_user(key, user)
    }

    /// Cache a tiled texture over the texture registered as `texture_key`.
    ///
    /// Returns the new tiled texture so indexes can be attached to it.
    pub fn register_tiled_texture(
        &mut self,
        key: &str,
        texture_key: &str,
        policy: CachePolicy,
    ) -> Result<&mut TiledTexture> {
        self.lifecycle.ensure_live("draw engine")?;
        let texture = *self.textures.get(texture_key)?;
        let tiled = TiledTexture::new(key, texture_key, texture.width, texture.height);

        self.tiled_textures.register(key, tiled, policy)?;
        if let Err(err) = self
            .textures
            .add_user(texture_key, CacheUser::TiledTexture(key.to_string()))
        {
            self.tiled_textures.unregister(key)?;
            return Err(err);
        }

        self.tiled_textures.get_mut(key)
    }

    /// Drop a tiled texture nobody uses; its texture may follow.
    pub fn unregister_tiled_texture(&mut self, key: &str) -> Result<()> {
        self.lifecycle.ensure_live("draw engine")?;
        let tiled = self.tiled_textures.unregister(key)?;
        let user = CacheUser::TiledTexture(key.to_string());
        self.release_texture_user(tiled.texture_key(), &user)
    }

    pub fn tiled_texture(&self, key: &str) -> Result<&TiledTexture> {
        self.tiled_textures.get(key)
    }

    /// Mutable tiled texture, for adding or removing indexes.
    pub fn tiled_texture_mut(&mut self, key: &str) -> Result<&mut TiledTexture> {
        self.lifecycle.ensure_live("draw engine")?;
        self.mark_render_required();
        self.tiled_textures.get_mut(key)
    }

    pub fn has_tiled_texture(&self, key: &str) -> bool {
        self.tiled_textures.contains(key)
    }

    pub fn tiled_texture_user_count(&self, key: &str) -> Result<usize> {
        self.tiled_textures.user_count(key)
    }

    /// Register `user` against a tiled texture.
    pub(crate) fn acquire_tiled_texture(&mut self, key: &str, user: CacheUser) -> Result<()> {
        self.tiled_textures.add_user(key, user)
    }

    /// Deregister `user` from a tiled texture and cascade any eviction.
    pub(crate) fn release_tiled_texture(&mut self, key: &str, user: &CacheUser) -> Result<()> {
        if let Some(tiled) = self.tiled_textures.remove_user(key, user)? {
            self.release_texture_user(
                tiled.texture_key(),
                &CacheUser::TiledTexture(key.to_string()),
            )?;
        }
        Ok(())
    }

    fn release_texture_user(&mut self, key: &str, user: &CacheUser) -> Result<()> {
        if let Some(texture) = self.textures.remove_user(key, user)? {
            self.backend.release_texture(texture.handle);
        }
        Ok(())
    }
}
