use ::rand::Rng;
use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sampling::point_in_disk;

/// Where a new particle starts, relative to the emitter location.
pub trait SpawnShape {
    fn initial_position(
        &self,
        location: Vec2,
        texture_extent: Vec2,
        scale_at_zero: f32,
        rng: &mut dyn ::rand::RngCore,
    ) -> Vec2;
}

/// Every particle starts on the location, offset so the sprite is centred on it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointSpawn;

impl SpawnShape for PointSpawn {
    fn initial_position(
        &self,
        location: Vec2,
        texture_extent: Vec2,
        scale_at_zero: f32,
        _rng: &mut dyn ::rand::RngCore,
    ) -> Vec2 {
        location - texture_extent * scale_at_zero * 0.5
    }
}

/// Uniform over a `width` x `height` rectangle whose top-left corner is the location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectSpawn {
    pub width: f32,
    pub height: f32,
}

impl SpawnShape for RectSpawn {
    fn initial_position(
        &self,
        location: Vec2,
        _texture_extent: Vec2,
        _scale_at_zero: f32,
        rng: &mut dyn ::rand::RngCore,
    ) -> Vec2 {
        location + vec2(rng.gen::<f32>() * self.width, rng.gen::<f32>() * self.height)
    }
}

/// Uniform over a disk centred on the location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleSpawn {
    pub radius: f32,
}

impl SpawnShape for CircleSpawn {
    fn initial_position(
        &self,
        location: Vec2,
        _texture_extent: Vec2,
        _scale_at_zero: f32,
        mut rng: &mut dyn ::rand::RngCore,
    ) -> Vec2 {
        location + point_in_disk(&mut rng, self.radius)
    }
}

/// Spawn shape chosen at runtime, e.g. from a scene file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnArea {
    Point,
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl SpawnArea {
    pub fn label(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
        }
    }
}

impl SpawnShape for SpawnArea {
    fn initial_position(
        &self,
        location: Vec2,
        texture_extent: Vec2,
        scale_at_zero: f32,
        rng: &mut dyn ::rand::RngCore,
    ) -> Vec2 {
        match *self {
            Self::Point => PointSpawn.initial_position(location, texture_extent, scale_at_zero, rng),
            Self::Rectangle { width, height } => RectSpawn { width, height }
                .initial_position(location, texture_extent, scale_at_zero, rng),
            Self::Circle { radius } => CircleSpawn { radius }
                .initial_position(location, texture_extent, scale_at_zero, rng),
        }
    }
}
