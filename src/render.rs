use macroquad::miniquad::{BlendFactor, BlendState, BlendValue, Equation, PipelineParams};
use macroquad::prelude::*;

use crate::particle::Particle;

/// Anything that can be drawn as a particle sprite. Only the pixel size is
/// needed by the simulation.
pub trait SpriteTexture {
    fn extent(&self) -> Vec2;
}

impl SpriteTexture for Texture2D {
    fn extent(&self) -> Vec2 {
        vec2(self.width(), self.height())
    }
}

/// Size-only texture for running emitters without a graphics context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessTexture(pub Vec2);

impl SpriteTexture for HeadlessTexture {
    fn extent(&self) -> Vec2 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Alpha,
    Additive,
}

/// One sprite draw for one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawRequest {
    /// Where the sprite origin lands.
    pub position: Vec2,
    /// Whole texture.
    pub source: Rect,
    /// Particle colour pre-multiplied by its opacity.
    pub tint: Color,
    pub rotation_degrees: f32,
    /// Texture centre, in texture pixels.
    pub origin: Vec2,
    pub scale: f32,
    pub blend: BlendMode,
}

impl DrawRequest {
    pub fn for_particle(particle: &Particle, extent: Vec2, alpha: f32, blend: BlendMode) -> Self {
        Self {
            position: particle.interpolated_pos(alpha),
            source: Rect::new(0.0, 0.0, extent.x, extent.y),
            tint: particle.tint(),
            rotation_degrees: particle.angle,
            origin: extent * 0.5,
            scale: particle.scale,
            blend,
        }
    }
}

/// Drawing backend for particle sprites.
pub trait ParticleRenderer<T> {
    fn draw(&mut self, texture: &T, request: &DrawRequest);
}

const SPRITE_VERT: &str = r#"#version 100
attribute vec3 position;
attribute vec2 texcoord;
attribute vec4 color0;
varying lowp vec2 uv;
varying lowp vec4 color;
uniform mat4 Model;
uniform mat4 Projection;
void main() {
    gl_Position = Projection * Model * vec4(position, 1);
    color = color0 / 255.0;
    uv = texcoord;
}
"#;

const SPRITE_FRAG: &str = r#"#version 100
precision lowp float;
varying lowp vec2 uv;
varying lowp vec4 color;
uniform sampler2D Texture;
void main() {
    gl_FragColor = color * texture2D(Texture, uv);
}
"#;

/// Default sprite shader with `src_alpha, one` additive blending.
fn additive_material() -> Option<Material> {
    let blend = BlendState::new(
        Equation::Add,
        BlendFactor::Value(BlendValue::SourceAlpha),
        BlendFactor::One,
    );
    let material = load_material(
        ShaderSource::Glsl {
            vertex: SPRITE_VERT,
            fragment: SPRITE_FRAG,
        },
        MaterialParams {
            pipeline_params: PipelineParams {
                color_blend: Some(blend),
                alpha_blend: Some(blend),
                ..Default::default()
            },
            ..Default::default()
        },
    );
    match material {
        Ok(m) => Some(m),
        Err(e) => {
            log::warn!("additive blend unavailable, falling back to alpha blending: {e:?}");
            None
        }
    }
}

/// Draws particles with `draw_texture_ex`, switching materials only when the
/// blend mode changes within a pass.
///
/// The renderer cannot see material changes made by other code, so call
/// [`finish`](Self::finish) after each pass. The first draw after `finish`
/// always applies its material.
pub struct MacroquadRenderer {
    additive: Option<Material>,
    /// `None` until the first draw of a pass.
    current: Option<BlendMode>,
}

impl MacroquadRenderer {
    /// Needs a live macroquad context.
    pub fn new() -> Self {
        Self {
            additive: additive_material(),
            current: None,
        }
    }

    fn set_blend(&mut self, blend: BlendMode) {
        if !needs_material_switch(self.current, blend) {
            return;
        }
        match (blend, &self.additive) {
            (BlendMode::Additive, Some(material)) => gl_use_material(material),
            _ => gl_use_default_material(),
        }
        self.current = Some(blend);
    }

    /// Restore the default material and forget the pass's blend mode.
    pub fn finish(&mut self) {
        if self.current.take().is_some() {
            gl_use_default_material();
        }
    }
}

fn needs_material_switch(current: Option<BlendMode>, wanted: BlendMode) -> bool {
    current != Some(wanted)
}

impl Default for MacroquadRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleRenderer<Texture2D> for MacroquadRenderer {
    fn draw(&mut self, texture: &Texture2D, request: &DrawRequest) {
        self.set_blend(request.blend);

        let size = request.source.size() * request.scale;
        let top_left = request.position - request.origin * request.scale;
        draw_texture_ex(
            texture,
            top_left.x,
            top_left.y,
            request.tint,
            DrawTextureParams {
                dest_size: Some(size),
                source: Some(request.source),
                rotation: request.rotation_degrees.to_radians(),
                ..Default::default()
            },
        );
    }
}
