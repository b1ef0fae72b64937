//! Demo Hub headless runner
//!
//! Runs the hub with nobody at the keys so the autopilot gives the tour,
//! dumping PNG frames and a JSON trace line per rendered frame.
//!
//! Usage: `demo-hub [settings.json]`

use std::path::Path;

use demo_hub::renderer::{Scene, SpriteSheets, Surface};
use demo_hub::sim::{HubEvent, HubState, HubWorld, TickInput, tick};
use demo_hub::{HubContent, Settings};

fn main() {
    env_logger::init();
    log::info!("Demo Hub starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let world = HubWorld::new(&load_content(&settings));
    let mut state = HubState::from_settings(&settings);
    let sheets = match &settings.assets_dir {
        Some(dir) => SpriteSheets::load(dir, &world),
        None => SpriteSheets::placeholder(&world),
    };
    let mut scene = Scene::new(&world, sheets);
    log::info!(
        "Hub initialized with seed: {} ({} doors, marquee {}px)",
        settings.seed,
        world.doors.len(),
        world.scroller_length()
    );

    if settings.frame_every > 0 {
        if let Err(e) = std::fs::create_dir_all(&settings.output_dir) {
            log::error!("Cannot create {}: {}", settings.output_dir.display(), e);
            return;
        }
    }

    let input = TickInput::default();
    for n in 1..=settings.ticks {
        for event in tick(&mut state, &world, &input) {
            match event {
                HubEvent::LoadStarted { name } => log::info!("[{n}] entering {name}"),
                other => log::debug!("[{n}] {other:?}"),
            }
        }

        if settings.frame_every == 0 || n % settings.frame_every != 0 {
            continue;
        }
        let frame = scene.render(&state, &world);
        let path = settings.output_dir.join(format!("frame_{n:06}.png"));
        if let Err(e) = save_png(frame, &path) {
            log::warn!("Failed to write {}: {}", path.display(), e);
        }
        match serde_json::to_string(&state.snapshot()) {
            Ok(line) => println!("{line}"),
            Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
        }
    }

    log::info!("Done after {} ticks", settings.ticks);
}

/// Content from the configured file, or the built-in hub if unset or broken
fn load_content(settings: &Settings) -> HubContent {
    let Some(path) = &settings.content_path else {
        return HubContent::builtin();
    };
    match HubContent::load(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("Invalid content in {} ({}), using built-in hub", path.display(), e);
            HubContent::builtin()
        }
    }
}

fn save_png(frame: &Surface, path: &Path) -> image::ImageResult<()> {
    let buffer = image::RgbaImage::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.as_bytes().to_vec(),
    )
    .ok_or_else(|| {
        image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::DimensionMismatch,
        ))
    })?;
    buffer.save(path)
}
