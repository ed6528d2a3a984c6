use macroquad::prelude::*;

/// One simulated sprite. Owned by its emitter; hosts only read it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub velocity: Vec2,
    /// Ticks since creation.
    pub age: u32,
    /// Heading of `velocity` in degrees.
    pub angle: f32,
    pub scale: f32,
    pub opacity: f32,
    pub color: Color,
}

impl Particle {
    pub fn new(pos: Vec2, velocity: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            velocity,
            age: 0,
            angle: 0.0,
            scale: 1.0,
            opacity: 1.0,
            color: WHITE,
        }
    }

    /// Move one tick along the (constant) velocity.
    pub fn advance(&mut self) {
        self.age += 1;
        self.prev_pos = self.pos;
        self.pos += self.velocity;
        self.angle = heading_degrees(self.velocity);
    }

    /// Position blended between the last two ticks, for smooth presentation.
    pub fn interpolated_pos(&self, alpha: f32) -> Vec2 {
        if alpha >= 1.0 {
            self.pos
        } else {
            self.prev_pos.lerp(self.pos, alpha.max(0.0))
        }
    }

    /// Colour multiplied by opacity on every channel.
    pub fn tint(&self) -> Color {
        let o = self.opacity;
        Color::new(self.color.r * o, self.color.g * o, self.color.b * o, self.color.a * o)
    }
}

/// Direction of `v` in degrees, in (-180, 180]. The zero vector maps to 0.
pub fn heading_degrees(v: Vec2) -> f32 {
    if v == Vec2::ZERO {
        return 0.0;
    }
    v.y.atan2(v.x).to_degrees()
}

/// `age / max_life` clamped to [0, 1]. A zero max life counts as fully expired.
pub fn life_fraction(age: u32, max_life: u32) -> f32 {
    if max_life == 0 {
        return 1.0;
    }
    (age as f32 / max_life as f32).min(1.0)
}
