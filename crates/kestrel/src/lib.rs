//! Kestrel fireworks demo
//!
//! Drives the draw engine and the particle world from one headless frame loop:
//! - `config`: layered configuration (defaults, `kestrel.ron`, `KESTREL_*` env)
//! - `fireworks`: pooled rockets and sparks mirrored onto draw engine layers

pub mod config;
pub mod fireworks;

pub use config::DemoConfig;
pub use fireworks::{Census, Fireworks, FireworksStats, particle_atlas};
