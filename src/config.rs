// Tunable defaults in one place.

use std::path::Path;

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::emitter::Emitter;
use crate::error::EmitterError;
use crate::render::SpriteTexture;
use crate::spawn::SpawnArea;

// Host loop
pub const TICKS_PER_SECOND: u32 = 60;
pub const FIXED_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

// Emitter defaults, in ticks unless noted
pub const DEFAULT_EMISSION_RATE: u32 = 1;
pub const DEFAULT_LIFETIME: u32 = 600;
pub const DEFAULT_PARTICLE_MAX_LIFE: u32 = 180;
pub const DEFAULT_START_DELAY: u32 = 0;
pub const DEFAULT_PARTICLE_MAX_SPEED: f32 = 2.0; // pixels per tick
pub const DEFAULT_SEED: u64 = 42;

// Demo scene
pub const SCENE_WIDTH: f32 = 1280.0;
pub const SCENE_HEIGHT: f32 = 800.0;

/// Host-tunable emitter parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterSettings {
    /// Particles spawned per tick while emitting.
    pub emission_rate: u32,
    /// Ticks in one emission cycle.
    pub lifetime: u32,
    pub particle_max_life: u32,
    /// Ticks before the first emission; ignored when prewarming.
    pub start_delay: u32,
    pub particle_max_speed: f32,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub prewarm: bool,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            emission_rate: DEFAULT_EMISSION_RATE,
            lifetime: DEFAULT_LIFETIME,
            particle_max_life: DEFAULT_PARTICLE_MAX_LIFE,
            start_delay: DEFAULT_START_DELAY,
            particle_max_speed: DEFAULT_PARTICLE_MAX_SPEED,
            looping: false,
            prewarm: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub t: f32,
    pub rgba: [f32; 4],
}

impl ColorStop {
    pub fn new(t: f32, color: Color) -> Self {
        Self {
            t,
            rgba: [color.r, color.g, color.b, color.a],
        }
    }
}

/// One emitter as described in a scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmitterEntry {
    pub shape: SpawnArea,
    #[serde(default)]
    pub location: [f32; 2],
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub settings: EmitterSettings,
    /// `[t, value]` pairs.
    pub scale: Vec<[f32; 2]>,
    pub opacity: Vec<[f32; 2]>,
    pub color: Vec<ColorStop>,
}

impl EmitterEntry {
    /// Build a stopped emitter without a texture; the host assigns one once
    /// its graphics context is up.
    pub fn build<T: SpriteTexture>(
        &self,
        default_seed: u64,
    ) -> Result<Emitter<SpawnArea, T>, EmitterError> {
        let scale = Curve::from_points("scale", self.scale.iter().map(|[t, v]| (*t, *v)))?;
        let opacity = Curve::from_points("opacity", self.opacity.iter().map(|[t, v]| (*t, *v)))?;
        let color = Curve::from_points(
            "color",
            self.color
                .iter()
                .map(|s| (s.t, Color::new(s.rgba[0], s.rgba[1], s.rgba[2], s.rgba[3]))),
        )?;

        let emitter = Emitter::new(
            self.shape,
            color,
            scale,
            opacity,
            self.seed.unwrap_or(default_seed),
        )
        .with_settings(self.settings)
        .with_location(Vec2::from(self.location));
        Ok(emitter)
    }
}

/// A set of emitters, loadable from TOML or JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(rename = "emitter", default)]
    pub emitters: Vec<EmitterEntry>,
}

impl std::str::FromStr for SceneConfig {
    type Err = EmitterError;
    fn from_str(serialized: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(serialized)?)
    }
}

impl SceneConfig {
    pub fn from_json(serialized: &str) -> Result<Self, EmitterError> {
        Ok(serde_json::from_str(serialized)?)
    }

    /// Files ending in `.json` are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EmitterError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| EmitterError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        let scene = if is_json {
            Self::from_json(&data)?
        } else {
            data.parse()?
        };
        log::info!("loaded {} emitters from {}", scene.emitters.len(), path.display());
        Ok(scene)
    }

    /// Emitters get consecutive seeds from `base_seed` unless their entry names one.
    pub fn build<T: SpriteTexture>(
        &self,
        base_seed: u64,
    ) -> Result<Vec<Emitter<SpawnArea, T>>, EmitterError> {
        self.emitters
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.build(base_seed.wrapping_add(i as u64)))
            .collect()
    }
}

impl Default for SceneConfig {
    /// Two side-by-side rectangles: a long-lived flickering field on the left
    /// and short static sparks on the right.
    fn default() -> Self {
        let half_width = SCENE_WIDTH * 0.5;
        let field = EmitterEntry {
            shape: SpawnArea::Rectangle {
                width: half_width,
                height: SCENE_HEIGHT,
            },
            location: [0.0, 0.0],
            seed: None,
            settings: EmitterSettings::default(),
            scale: vec![[0.0, 0.0], [0.25, 4.0], [0.5, 1.0], [0.75, 5.0], [1.0, 0.0]],
            opacity: vec![[0.0, 0.0], [0.2, 0.5], [0.5, 1.0], [1.0, 0.0]],
            color: vec![
                ColorStop::new(0.0, BLUE),
                ColorStop::new(0.5, ORANGE),
                ColorStop::new(1.0, RED),
            ],
        };
        let sparks = EmitterEntry {
            shape: SpawnArea::Rectangle {
                width: half_width,
                height: SCENE_HEIGHT,
            },
            location: [half_width, 0.0],
            seed: None,
            settings: EmitterSettings {
                lifetime: 240,
                particle_max_life: 30,
                particle_max_speed: 0.0,
                ..EmitterSettings::default()
            },
            scale: vec![[0.0, 1.0], [1.0, 0.0]],
            opacity: vec![[0.0, 1.0], [1.0, 1.0]],
            color: vec![ColorStop::new(0.0, WHITE), ColorStop::new(1.0, BLUE)],
        };
        Self {
            emitters: vec![field, sparks],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessTexture;

    const SCENE: &str = r#"
[[emitter]]
shape = { kind = "point" }
location = [320.0, 200.0]
seed = 5
emission_rate = 3
loop = true
prewarm = true
lifetime = 10
scale = [[0.0, 1.0], [1.0, 0.0]]
opacity = [[0.0, 1.0]]
color = [{ t = 0.0, rgba = [1.0, 1.0, 1.0, 1.0] }]

[[emitter]]
shape = { kind = "circle", radius = 20.0 }
scale = [[0.0, 1.0]]
opacity = [[0.0, 1.0]]
color = [{ t = 0.0, rgba = [1.0, 0.0, 0.0, 1.0] }]
"#;

    #[test]
    fn scene_toml_parses_with_defaults_for_missing_fields() {
        let scene: SceneConfig = SCENE.parse().unwrap();
        assert_eq!(scene.emitters.len(), 2);

        let first = &scene.emitters[0];
        assert_eq!(first.shape, SpawnArea::Point);
        assert_eq!(first.location, [320.0, 200.0]);
        assert_eq!(first.seed, Some(5));
        assert_eq!(first.settings.emission_rate, 3);
        assert!(first.settings.looping);
        assert!(first.settings.prewarm);
        assert_eq!(first.settings.lifetime, 10);
        assert_eq!(first.settings.particle_max_life, DEFAULT_PARTICLE_MAX_LIFE);

        let second = &scene.emitters[1];
        assert_eq!(second.shape, SpawnArea::Circle { radius: 20.0 });
        assert_eq!(second.settings, EmitterSettings::default());
        assert_eq!(second.location, [0.0, 0.0]);
    }

    #[test]
    fn built_scene_emitters_run_headless() {
        let scene: SceneConfig = SCENE.parse().unwrap();
        let mut emitters = scene.build::<HeadlessTexture>(DEFAULT_SEED).unwrap();
        let first = &mut emitters[0];
        first.set_texture(Some(HeadlessTexture(vec2(8.0, 8.0))));
        first.trigger().unwrap();
        // Prewarm runs a full cycle of 10 ticks at 3 particles per tick.
        assert_eq!(first.particle_count(), 30);
        assert_eq!(first.location, vec2(320.0, 200.0));
    }

    #[test]
    fn empty_curve_in_scene_is_rejected() {
        let text = r#"
[[emitter]]
shape = { kind = "point" }
scale = []
opacity = [[0.0, 1.0]]
color = [{ t = 0.0, rgba = [1.0, 1.0, 1.0, 1.0] }]
"#;
        let scene: SceneConfig = text.parse().unwrap();
        let result = scene.build::<HeadlessTexture>(1);
        assert!(matches!(result, Err(EmitterError::EmptyCurve { name: "scale" })));
    }

    #[test]
    fn negative_emission_rate_fails_to_parse() {
        let text = r#"
[[emitter]]
shape = { kind = "point" }
emission_rate = -1
scale = [[0.0, 1.0]]
opacity = [[0.0, 1.0]]
color = [{ t = 0.0, rgba = [1.0, 1.0, 1.0, 1.0] }]
"#;
        assert!(matches!(
            text.parse::<SceneConfig>(),
            Err(EmitterError::ConfigToml(_))
        ));
    }

    #[test]
    fn default_scene_survives_json() {
        let scene = SceneConfig::default();
        let json = serde_json::to_string(&scene).unwrap();
        let from_json = SceneConfig::from_json(&json).unwrap();
        assert_eq!(from_json, scene);
    }

    #[test]
    fn bundled_fountain_scene_builds() {
        let scene: SceneConfig = include_str!("../scenes/fountain.toml").parse().unwrap();
        let mut emitters = scene.build::<HeadlessTexture>(DEFAULT_SEED).unwrap();
        assert_eq!(emitters.len(), 2);
        assert_eq!(emitters[1].settings.start_delay, 60);

        let fountain = &mut emitters[0];
        fountain.set_texture(Some(HeadlessTexture(vec2(32.0, 32.0))));
        fountain.trigger().unwrap();
        // 120 prewarm ticks at 4 per tick, but only the last 89 ticks' worth survive.
        assert_eq!(fountain.particle_count(), 89 * 4);
    }

    #[test]
    fn load_reports_missing_file() {
        let result = SceneConfig::load("/nonexistent/sparkfield_scene.toml");
        assert!(matches!(result, Err(EmitterError::ConfigIo { .. })));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let path = std::env::temp_dir().join(format!("sparkfield_{}.json", std::process::id()));
        let json = serde_json::to_string(&SceneConfig::default()).unwrap();
        std::fs::write(&path, json).unwrap();

        let scene = SceneConfig::load(&path).unwrap();
        assert_eq!(scene.emitters.len(), 2);

        let _ = std::fs::remove_file(path);
    }
}
