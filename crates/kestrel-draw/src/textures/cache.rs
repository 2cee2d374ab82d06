//! Reference-counted resource registry.
//!
//! One generic cache backs both the texture and the tiled texture
//! registries. Each entry tracks the set of users holding it; under
//! [`CachePolicy::DisposeAfterLastUse`] the entry is evicted the moment that
//! set becomes empty.

use std::fmt;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::drawable::DrawableId;
use crate::{DrawError, Result};

/// What happens to a resource once its last user goes away
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CachePolicy {
    #[default]
    DisposeAfterLastUse,
    KeepAlways,
}

/// Identity of something holding a cached resource
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheUser {
    /// A drawable placed on a layer
    Drawable(DrawableId),
    /// A tiled texture holding its underlying texture
    TiledTexture(String),
    /// Anything outside the engine, named by the caller
    External(String),
}

impl fmt::Display for CacheUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheUser::Drawable(id) => write!(f, "drawable {id}"),
            CacheUser::TiledTexture(key) => write!(f, "tiled texture `{key}`"),
            CacheUser::External(name) => write!(f, "`{name}`"),
        }
    }
}

#[derive(Debug)]
struct CacheEntry<R> {
    resource: R,
    policy: CachePolicy,
    users: AHashSet<CacheUser>,
}

/// Registry mapping string keys to resources with per-key policy and users
#[derive(Debug)]
pub struct ResourceCache<R> {
    label: &'static str,
    entries: AHashMap<String, CacheEntry<R>>,
}

impl<R> ResourceCache<R> {
    /// `label` names the cache in errors and logs.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: AHashMap::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Fail unless `key` is non-blank and not yet registered.
    pub fn ensure_vacant(&self, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(DrawError::invalid("key", "cache keys must not be blank"));
        }
        if self.entries.contains_key(key) {
            return Err(DrawError::AlreadyRegistered {
                cache: self.label,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn register(&mut self, key: &str, resource: R, policy: CachePolicy) -> Result<()> {
        self.ensure_vacant(key)?;

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                resource,
                policy,
                users: AHashSet::new(),
            },
        );
        log::debug!("Registered {} `{}` ({:?})", self.label, key, policy);
        Ok(())
    }

    /// Remove `key` and hand back its resource. Fails while users remain.
    pub fn unregister(&mut self, key: &str) -> Result<R> {
        let entry = self.entry(key)?;
        if !entry.users.is_empty() {
            return Err(DrawError::ResourceInUse {
                cache: self.label,
                key: key.to_string(),
                users: entry.users.len(),
            });
        }

        let entry = self.entries.remove(key).ok_or_else(|| self.not_registered(key))?;
        log::debug!("Unregistered {} `{}`", self.label, key);
        Ok(entry.resource)
    }

    pub fn add_user(&mut self, key: &str, user: CacheUser) -> Result<()> {
        let label = self.label;
        let entry = self.entry_mut(key)?;
        if entry.users.contains(&user) {
            return Err(DrawError::DuplicateUser {
                key: key.to_string(),
                user,
            });
        }

        log::trace!("{} `{}` gained user {}", label, key, user);
        entry.users.insert(user);
        Ok(())
    }

    /// Remove a user. Returns the resource if this evicted it.
    pub fn remove_user(&mut self, key: &str, user: &CacheUser) -> Result<Option<R>> {
        let entry = self.entry_mut(key)?;
        if !entry.users.remove(user) {
            return Err(DrawError::UnknownUser {
                key: key.to_string(),
                user: user.clone(),
            });
        }

        if !entry.users.is_empty() || entry.policy == CachePolicy::KeepAlways {
            return Ok(None);
        }

        let evicted = self.entries.remove(key).map(|entry| entry.resource);
        log::debug!("Evicted {} `{}` after its last user", self.label, key);
        Ok(evicted)
    }

    pub fn get(&self, key: &str) -> Result<&R> {
        Ok(&self.entry(key)?.resource)
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut R> {
        Ok(&mut self.entry_mut(key)?.resource)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn policy(&self, key: &str) -> Result<CachePolicy> {
        Ok(self.entry(key)?.policy)
    }

    pub fn user_count(&self, key: &str) -> Result<usize> {
        Ok(self.entry(key)?.users.len())
    }

    pub fn has_user(&self, key: &str, user: &CacheUser) -> Result<bool> {
        Ok(self.entry(key)?.users.contains(user))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty the cache regardless of users or policy. Used on teardown.
    pub fn drain(&mut self) -> Vec<(String, R)> {
        self.entries
            .drain()
            .map(|(key, entry)| (key, entry.resource))
            .collect()
    }

    fn entry(&self, key: &str) -> Result<&CacheEntry<R>> {
        self.entries.get(key).ok_or_else(|| self.not_registered(key))
    }

    fn entry_mut(&mut self, key: &str) -> Result<&mut CacheEntry<R>> {
        let label = self.label;
        self.entries
            .get_mut(key)
            .ok_or_else(|| DrawError::NotRegistered {
                cache: label,
                key: key.to_string(),
            })
    }

    fn not_registered(&self, key: &str) -> DrawError {
        DrawError::NotRegistered {
            cache: self.label,
            key: key.to_string(),
        }
    }
}
