mod cli;
mod display;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::{default_scene, read_scene_file, SceneDescription};
use lumen_renderer::{RenderConfig, RenderContext, Renderer};
use serde::{Deserialize, Serialize};

use cli::Args;
use display::{AsciiDisplay, LogDisplay};

/// Scene file accepted by the viewer: a scene description plus an optional
/// render section.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ViewerScene {
    #[serde(flatten)]
    description: SceneDescription,
    #[serde(default)]
    render: Option<RenderConfig>,
}

impl AsMut<SceneDescription> for ViewerScene {
    fn as_mut(&mut self) -> &mut SceneDescription {
        &mut self.description
    }
}

fn read_scene(path: &Path) -> Result<ViewerScene> {
    read_scene_file(path).with_context(|| format!("Failed to read scene {}", path.display()))
}

/// Render settings from the scene file with command line overrides on top.
fn render_config(args: &Args, file: Option<RenderConfig>) -> RenderConfig {
    let mut config = file.unwrap_or_default();
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    config
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    log::info!("Starting Lumen Viewer");

    let scene = match &args.scene {
        Some(path) => read_scene(path)?,
        None => {
            log::info!("No scene given, using the built-in scene");
            ViewerScene {
                description: default_scene(),
                render: None,
            }
        }
    };

    let config = render_config(&args, scene.render);
    let loaded = scene.description.build()?;
    let camera = loaded.camera;
    let context = RenderContext::from_loaded(loaded, config);

    let mut renderer = Renderer::new(context, args.width, args.height)?;
    let mut log_display = LogDisplay::new();
    let mut ascii = args
        .ascii
        .then(|| AsciiDisplay::new(std::io::stdout(), 100));

    for _ in 0..args.frames {
        let stats = renderer.produce_frame(&camera);
        log::info!(
            "Rendered {} rays in {} tasks, {:.2?} ({:.0} rays/s)",
            stats.rays,
            stats.tasks,
            stats.elapsed,
            stats.rays_per_second()
        );

        renderer.display_frame(&mut log_display)?;
        if let Some(ascii) = ascii.as_mut() {
            renderer.display_frame(ascii)?;
        }
    }

    renderer.shutdown();
    log::info!("Presented {} frames", log_display.presented());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_scene_with_render_section() {
        let json = r#"{
            "name": "glass",
            "materials": [{ "id": 1, "color": [255, 255, 255], "transparency": 0.9 }],
            "objects": [{ "shape": "sphere", "transform": { "position": [0, 0, -4] }, "material": 1 }],
            "lights": [{ "position": [0, 5, 0] }],
            "render": { "max_depth": 4, "object_ior": 1.5 }
        }"#;

        let scene: ViewerScene = serde_json::from_str(json).unwrap();
        let render = scene.render.clone().unwrap();
        assert_eq!(render.max_depth, 4);
        assert_eq!(render.object_ior, 1.5);
        assert_eq!(render.max_tir_steps, 5);

        let loaded = scene.description.build().unwrap();
        assert_eq!(loaded.scene.name, "glass");
        assert_eq!(loaded.scene.object_count(), 1);
    }

    #[test]
    fn test_cli_overrides_file_config() {
        let args = Args::parse_from(["lumen_viewer", "--threads", "3"]);
        let file = RenderConfig {
            threads: 8,
            max_depth: 2,
            ..RenderConfig::default()
        };

        let config = render_config(&args, Some(file));
        assert_eq!(config.threads, 3);
        assert_eq!(config.max_depth, 2);

        let config = render_config(&Args::parse_from(["lumen_viewer", "--max-depth", "0"]), None);
        assert_eq!(config.max_depth, 0);
        assert_eq!(config, RenderConfig { max_depth: 0, ..RenderConfig::default() });
    }

    #[test]
    fn test_read_scene_keeps_render_section() {
        let dir = std::env::temp_dir().join(format!("lumen_viewer_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mirrors.json");
        std::fs::write(
            &path,
            r#"{ "lights": [{ "position": [0, 5, 0] }], "render": { "threads": 2 } }"#,
        )
        .unwrap();

        let scene = read_scene(&path).unwrap();
        assert_eq!(scene.description.name, "mirrors");
        assert_eq!(scene.render.map(|r| r.threads), Some(2));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_scene_file() {
        let err = read_scene(Path::new("/no/such/scene.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read scene"));
    }
}
