use ::rand::SeedableRng;
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::EmitterSettings;
use crate::error::EmitterError;
use crate::particle::{life_fraction, Particle};
use crate::provider::ValueProvider;
use crate::render::{BlendMode, DrawRequest, ParticleRenderer, SpriteTexture};
use crate::sampling::RandomVelocity;
use crate::spawn::{PointSpawn, RectSpawn, SpawnShape};

pub type PointEmitter<T = Texture2D> = Emitter<PointSpawn, T>;
pub type RectangleEmitter<T = Texture2D> = Emitter<RectSpawn, T>;

/// Lifecycle phase, derived from `(active, age, lifetime)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitterState {
    Stopped,
    DelayCountdown,
    Emitting,
    AtLimit,
}

impl EmitterState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::DelayCountdown => "delay",
            Self::Emitting => "emitting",
            Self::AtLimit => "at limit",
        }
    }
}

/// Tick-driven particle source.
///
/// The host calls [`update`](Self::update) once per fixed tick and
/// [`render`](Self::render) once per frame. Tunables (`settings`, `location`,
/// the providers) may be changed between ticks and apply from the next update.
pub struct Emitter<S, T = Texture2D> {
    pub settings: EmitterSettings,
    pub location: Vec2,
    pub shape: S,
    pub blend: BlendMode,
    pub color: Box<dyn ValueProvider<Color>>,
    pub scale: Box<dyn ValueProvider<f32>>,
    pub opacity: Box<dyn ValueProvider<f32>>,
    texture: Option<T>,
    particles: Vec<Particle>,
    /// Negative while counting down the start delay.
    age: i64,
    active: bool,
    rng: ChaCha8Rng,
}

impl<S: SpawnShape, T: SpriteTexture> Emitter<S, T> {
    pub fn new(
        shape: S,
        color: impl ValueProvider<Color> + 'static,
        scale: impl ValueProvider<f32> + 'static,
        opacity: impl ValueProvider<f32> + 'static,
        seed: u64,
    ) -> Self {
        Self {
            settings: EmitterSettings::default(),
            location: Vec2::ZERO,
            shape,
            blend: BlendMode::Additive,
            color: Box::new(color),
            scale: Box::new(scale),
            opacity: Box::new(opacity),
            texture: None,
            particles: Vec::new(),
            age: 0,
            active: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_settings(mut self, settings: EmitterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_location(mut self, location: Vec2) -> Self {
        self.location = location;
        self
    }

    pub fn with_texture(mut self, texture: T) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn set_texture(&mut self, texture: Option<T>) {
        self.texture = texture;
    }

    pub fn texture(&self) -> Option<&T> {
        self.texture.as_ref()
    }

    /// Replace the random source, e.g. to replay a run.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn state(&self) -> EmitterState {
        if !self.active {
            EmitterState::Stopped
        } else if self.age < 0 {
            EmitterState::DelayCountdown
        } else if self.age >= self.lifetime() {
            EmitterState::AtLimit
        } else {
            EmitterState::Emitting
        }
    }

    fn lifetime(&self) -> i64 {
        i64::from(self.settings.lifetime)
    }

    /// Start (or restart) a cycle.
    ///
    /// A looping emitter drops its in-flight particles. With prewarm it then
    /// runs one full cycle of updates before returning, so the first visible
    /// frame is already in steady state.
    ///
    /// Fails with [`EmitterError::MissingTexture`] before touching any state
    /// when a prewarm would need to emit without a texture.
    pub fn trigger(&mut self) -> Result<(), EmitterError> {
        let prewarms = self.settings.looping && self.settings.prewarm;
        if prewarms && self.settings.lifetime > 0 && self.texture.is_none() {
            return Err(EmitterError::MissingTexture);
        }

        self.active = true;
        if self.settings.lifetime == 0 {
            log::warn!("emitter triggered with zero lifetime; it will never emit");
        }
        if self.settings.particle_max_life == 0 {
            log::warn!("emitter triggered with zero particle life; particles expire at once");
        }

        if self.settings.looping {
            self.particles.clear();
        }

        if prewarms {
            self.reset_to_start();
            for _ in 0..self.settings.lifetime {
                self.update()?;
            }
            log::debug!(
                "prewarmed {} ticks, {} particles live",
                self.settings.lifetime,
                self.particles.len()
            );
        }

        self.reset_to_start();
        log::debug!("emitter triggered at age {}", self.age);
        Ok(())
    }

    /// Stop emitting. Live particles keep animating until they expire.
    pub fn stop(&mut self) {
        if self.active {
            log::debug!("emitter stopped at age {}", self.age);
        }
        self.active = false;
    }

    /// Advance one tick: lifecycle, emission, then every live particle.
    ///
    /// A tick that would emit without a texture fails with
    /// [`EmitterError::MissingTexture`] and leaves the emitter and its
    /// particles untouched.
    pub fn update(&mut self) -> Result<(), EmitterError> {
        let (age, active) = self.next_lifecycle();
        let emits = age > 0 && active;
        if emits && self.texture.is_none() {
            return Err(EmitterError::MissingTexture);
        }

        if self.age >= self.lifetime() {
            if self.settings.looping {
                log::debug!("emitter looped");
            } else if self.active {
                log::debug!("emitter finished its cycle");
            }
        }
        self.age = age;
        self.active = active;

        if emits {
            self.emit_particles()?;
        }

        self.update_particles();
        Ok(())
    }

    /// `(age, active)` after the lifecycle step of the next update.
    fn next_lifecycle(&self) -> (i64, bool) {
        if self.age < self.lifetime() {
            (self.age + 1, self.active)
        } else if self.settings.looping {
            (self.start_age(), self.active)
        } else {
            (self.age, false)
        }
    }

    fn start_age(&self) -> i64 {
        if self.settings.prewarm {
            0
        } else {
            -i64::from(self.settings.start_delay)
        }
    }

    fn reset_to_start(&mut self) {
        self.age = self.start_age();
    }

    /// Spawn exactly `emission_rate` particles.
    pub fn emit_particles(&mut self) -> Result<(), EmitterError> {
        let extent = self
            .texture
            .as_ref()
            .map(SpriteTexture::extent)
            .ok_or(EmitterError::MissingTexture)?;

        let count = self.settings.emission_rate;
        self.particles.reserve(count as usize);
        for _ in 0..count {
            let particle = self.create_particle(extent);
            self.particles.push(particle);
        }
        log::trace!("emitted {count} particles at age {}", self.age);
        Ok(())
    }

    fn create_particle(&mut self, extent: Vec2) -> Particle {
        let velocity = RandomVelocity::new(self.settings.particle_max_speed).sample(&mut self.rng);
        let scale_at_zero = self.scale.value_at(0.0);
        let pos = self
            .shape
            .initial_position(self.location, extent, scale_at_zero, &mut self.rng);
        Particle::new(pos, velocity)
    }

    /// Age and move every particle, resample its visuals, and drop the ones
    /// whose life is used up. Visuals come from the particle's own life
    /// fraction, never the emitter's.
    pub fn update_particles(&mut self) {
        let max_life = self.settings.particle_max_life;
        let color = &self.color;
        let scale = &self.scale;
        let opacity = &self.opacity;

        self.particles.retain_mut(|p| {
            if p.age >= max_life {
                return false;
            }
            p.advance();
            if p.age >= max_life {
                return false;
            }
            let t = life_fraction(p.age, max_life);
            p.scale = scale.value_at(t);
            p.color = color.value_at(t);
            p.opacity = opacity.value_at(t);
            true
        });
    }

    pub fn render<R: ParticleRenderer<T>>(&self, renderer: &mut R) -> Result<(), EmitterError> {
        self.render_interpolated(renderer, 1.0)
    }

    /// Draw each particle at `prev_pos.lerp(pos, alpha)`; `alpha` is the
    /// fraction of a tick elapsed since the last update.
    pub fn render_interpolated<R: ParticleRenderer<T>>(
        &self,
        renderer: &mut R,
        alpha: f32,
    ) -> Result<(), EmitterError> {
        let texture = self.texture.as_ref().ok_or(EmitterError::MissingTexture)?;
        let extent = texture.extent();
        for particle in &self.particles {
            renderer.draw(
                texture,
                &DrawRequest::for_particle(particle, extent, alpha, self.blend),
            );
        }
        Ok(())
    }
}
