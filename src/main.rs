use macroquad::prelude::*;

use sparkfield::config::{self, SceneConfig};
use sparkfield::{Emitter, MacroquadRenderer, SpawnArea};

type SceneEmitter = Emitter<SpawnArea, Texture2D>;

fn window_conf() -> Conf {
    Conf {
        window_title: "Sparkfield: particle emitters".to_string(),
        window_width: config::SCENE_WIDTH as i32,
        window_height: config::SCENE_HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

const PARTICLE_TEXTURE_SIZE: u16 = 32;
const HUD_COLOR: Color = Color::new(0.85, 0.9, 1.0, 0.9);

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let scene = match std::env::args().nth(1) {
        Some(path) => match SceneConfig::load(&path) {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("{e}; using the built-in scene");
                SceneConfig::default()
            }
        },
        None => SceneConfig::default(),
    };

    let mut emitters: Vec<SceneEmitter> = match scene.build(config::DEFAULT_SEED) {
        Ok(emitters) => emitters,
        Err(e) => {
            log::error!("cannot build scene: {e}");
            return;
        }
    };

    let texture = soft_dot_texture(PARTICLE_TEXTURE_SIZE);
    for emitter in &mut emitters {
        emitter.set_texture(Some(texture.clone()));
    }

    let mut renderer = MacroquadRenderer::new();
    let mut accumulator = 0.0f64;
    let dt = config::FIXED_DT as f64;

    loop {
        accumulator += (get_frame_time() as f64).min(0.1);

        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Space) {
            for emitter in &mut emitters {
                if let Err(e) = emitter.trigger() {
                    log::error!("trigger failed: {e}");
                }
            }
        }
        if is_key_pressed(KeyCode::S) {
            for emitter in &mut emitters {
                emitter.stop();
            }
        }
        if is_key_pressed(KeyCode::L) {
            for emitter in &mut emitters {
                emitter.settings.looping = !emitter.settings.looping;
            }
        }
        if is_key_pressed(KeyCode::P) {
            for emitter in &mut emitters {
                emitter.settings.prewarm = !emitter.settings.prewarm;
            }
        }

        while accumulator >= dt {
            for emitter in &mut emitters {
                if let Err(e) = emitter.update() {
                    log::error!("update failed: {e}");
                }
            }
            accumulator -= dt;
        }
        let alpha = (accumulator / dt) as f32;

        clear_background(BLACK);
        for emitter in &emitters {
            if let Err(e) = emitter.render_interpolated(&mut renderer, alpha) {
                log::error!("render failed: {e}");
            }
            renderer.finish();
        }

        draw_hud(&emitters);

        next_frame().await;
    }
}

/// White disc with a smooth radial falloff in alpha.
fn soft_dot_texture(size: u16) -> Texture2D {
    let mut image = Image::gen_image_color(size, size, BLANK);
    let center = size as f32 * 0.5;
    for y in 0..size as u32 {
        for x in 0..size as u32 {
            let d = vec2(x as f32 + 0.5, y as f32 + 0.5).distance(vec2(center, center)) / center;
            let falloff = (1.0 - d).clamp(0.0, 1.0);
            image.set_pixel(x, y, Color::new(1.0, 1.0, 1.0, falloff * falloff));
        }
    }
    let texture = Texture2D::from_image(&image);
    texture.set_filter(FilterMode::Linear);
    texture
}

fn draw_hud(emitters: &[SceneEmitter]) {
    let mut y = 24.0;
    for (i, emitter) in emitters.iter().enumerate() {
        let line = format!(
            "#{} {:<9} {:<8} age {:>5}/{:<5} particles {:>5}{}{}",
            i,
            emitter.shape.label(),
            emitter.state().label(),
            emitter.age(),
            emitter.settings.lifetime,
            emitter.particle_count(),
            if emitter.settings.looping { "  loop" } else { "" },
            if emitter.settings.prewarm { "  prewarm" } else { "" },
        );
        draw_text(&line, 12.0, y, 20.0, HUD_COLOR);
        y += 22.0;
    }
    draw_text(
        "[Space] trigger  [S] stop  [L] loop  [P] prewarm  [Esc] quit",
        12.0,
        screen_height() - 16.0,
        20.0,
        HUD_COLOR,
    );
}
