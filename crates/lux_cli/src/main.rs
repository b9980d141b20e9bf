use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use lux_core::{
    description::load_scene, obj::load_obj, presets, Color, Material, MaterialFlags, Object,
};
use lux_math::{scale, translate, Vec3};
use lux_renderer::{render, Camera, RenderConfig};

/// Where `--obj` meshes are placed in the room.
const OBJ_POSITION: Vec3 = Vec3::new(0.0, 8.0, 12.0);

/// Lux command line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "lux",
    author,
    version,
    about = "Monte Carlo ray tracer for spheres and triangle meshes.",
    disable_help_flag = true
)]
struct Args {
    /// Image width in pixels.
    #[arg(short, long, default_value_t = 320, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Image height in pixels.
    #[arg(
        short = 'h',
        long,
        default_value_t = 180,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    height: u32,

    /// Samples per pixel.
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
    samples: u32,

    /// Output PNG path.
    #[arg(short, long, default_value = "result.png")]
    output: PathBuf,

    /// JSON scene description. The built-in room is rendered when absent.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// OBJ mesh to add to the scene as a checkered diffuse object.
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Uniform scale applied to the `--obj` mesh.
    #[arg(long, default_value_t = 8.0)]
    obj_scale: f64,

    /// Seed for a reproducible render.
    #[arg(long)]
    seed: Option<u64>,

    /// Deepest bounce that is still traced.
    #[arg(long, default_value_t = 2)]
    max_depth: u32,

    /// Indirect rays per global illumination hit.
    #[arg(long, default_value_t = 16)]
    gi_samples: u32,

    /// Weight of indirect light against direct light.
    #[arg(long, default_value_t = 0.5)]
    indirect_weight: f64,

    /// Use verbose output (debug log level).
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print warnings and errors.
    #[arg(short, long)]
    quiet: bool,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Args {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            samples: self.samples,
            max_depth: self.max_depth,
            gi_samples: self.gi_samples,
            indirect_weight: self.indirect_weight,
            seed: self.seed,
        }
    }

    fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let config = args.render_config();
    let aspect_ratio = config.aspect_ratio();

    let mut setup = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => presets::room(aspect_ratio).context("Failed to build the room scene")?,
    };

    if let Some(path) = &args.obj {
        let mut mesh =
            load_obj(path).with_context(|| format!("Failed to load mesh {}", path.display()))?;
        mesh.transform(&(translate(OBJ_POSITION) * scale(Vec3::splat(args.obj_scale))));

        let material = Material::new(Color::new(109.0, 124.0, 187.0) / 255.0)
            .with_flags(MaterialFlags::GLOBAL_ILLUM | MaterialFlags::CHECKERED);
        setup
            .scene
            .add(Object::mesh(mesh, material))
            .with_context(|| format!("Mesh {} has no usable triangles", path.display()))?;
    }

    let camera = Camera::new(setup.camera.position, setup.camera.look_at, aspect_ratio);

    let start = Instant::now();
    let result = render(&setup.scene, &camera, &config).context("Render failed")?;
    let elapsed = start.elapsed();

    result
        .framebuffer
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Pixels:             {}", result.framebuffer.len());
    log::info!("Rays cast:          {}", result.stats.rays);
    log::info!("Intersection tests: {}", result.stats.intersection_tests);
    log::info!("Elapsed:            {:.2?}", elapsed);
    log::info!("Output:             {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["lux"]).unwrap();
        let config = args.render_config();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 180);
        assert_eq!(config.samples, 50);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.gi_samples, 16);
        assert_eq!(config.seed, None);
        assert_eq!(args.output, PathBuf::from("result.png"));
        assert!(args.scene.is_none());
        assert_eq!(args.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_short_flags() {
        let args =
            Args::try_parse_from(["lux", "-w", "64", "-h", "48", "-s", "4", "-o", "out.png", "-v"])
                .unwrap();

        assert_eq!((args.width, args.height, args.samples), (64, 48, 4));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_long_flags() {
        let args = Args::try_parse_from([
            "lux",
            "--scene",
            "room.json",
            "--obj",
            "cube.obj",
            "--obj-scale",
            "2.5",
            "--seed",
            "7",
            "--max-depth",
            "4",
            "--gi-samples",
            "8",
            "--quiet",
        ])
        .unwrap();
        let config = args.render_config();

        assert_eq!(args.scene, Some(PathBuf::from("room.json")));
        assert_eq!(args.obj, Some(PathBuf::from("cube.obj")));
        assert_eq!(args.obj_scale, 2.5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.gi_samples, 8);
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_zero_rejected() {
        for flag in ["-w", "-h", "-s"] {
            let result = Args::try_parse_from(["lux", flag, "0"]);
            assert!(result.is_err(), "{flag} 0 should be rejected");
        }
    }

    #[test]
    fn test_long_help_still_available() {
        let err = Args::try_parse_from(["lux", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["lux", "-v", "-q"]).is_err());
    }
}
