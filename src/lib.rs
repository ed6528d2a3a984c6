//! Tick-driven 2D particle emitters.
//!
//! An [`Emitter`] spawns particles from a [`SpawnShape`], moves them with a
//! constant random velocity, and derives scale, colour and opacity from
//! injected [`ValueProvider`]s sampled at each particle's life fraction.
//! Drawing goes through a [`ParticleRenderer`]; [`MacroquadRenderer`] is the
//! stock backend.

pub mod config;
pub mod curve;
pub mod emitter;
pub mod error;
pub mod particle;
pub mod provider;
pub mod render;
pub mod sampling;
pub mod spawn;

pub use config::{EmitterEntry, EmitterSettings, SceneConfig};
pub use curve::{Curve, Lerp};
pub use emitter::{Emitter, EmitterState, PointEmitter, RectangleEmitter};
pub use error::EmitterError;
pub use particle::Particle;
pub use provider::{Constant, ValueProvider};
pub use render::{
    BlendMode, DrawRequest, HeadlessTexture, MacroquadRenderer, ParticleRenderer, SpriteTexture,
};
pub use sampling::RandomVelocity;
pub use spawn::{CircleSpawn, PointSpawn, RectSpawn, SpawnArea, SpawnShape};
