// Copyright 2020 TwoCookingMice

use praline::core::config::PhotonMappingConfig;
use praline::core::photon::PhotonBuffer;
use praline::core::photon_map::PhotonMap;
use praline::core::scene::Scene;
use praline::core::scene_loader::load_scene_with_settings;
use praline::integrators::photon_mapping::PhotonMappingIntegrator;
use praline::integrators::photon_tracer::PhotonTracer;
use praline::integrators::photon_viewer::PhotonViewerIntegrator;
use praline::io::{photon_io, write_image};
use praline::math::constants::Float;
use praline::renderers::simple::{Renderer, SimpleRenderer};

use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "praline", version, about = "Two-pass photon mapping renderer")]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trace photons, build the photon map and render the scene.
    Render(RenderArgs),
    /// Run the photon pass only and dump the stored photons.
    Trace(TraceArgs),
    /// Render a debug image of a dumped photon map.
    View(ViewArgs),
}

#[derive(Args, Debug)]
struct PassArgs {
    /// Total photon budget across all lights.
    #[arg(long)]
    photons: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    scene: PathBuf,
    /// Output image (.exr or .png).
    #[arg(short, long)]
    output: PathBuf,
    #[command(flatten)]
    pass: PassArgs,
    #[arg(long)]
    spp: Option<u32>,
    /// Photons gathered per radiance estimate.
    #[arg(long)]
    neighbours: Option<usize>,
    #[arg(long, default_value_t = 0)]
    camera: usize,
    /// Also write the stored photons to this file.
    #[arg(long)]
    dump_photons: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TraceArgs {
    scene: PathBuf,
    /// Photon dump, one `px py pz dx dy dz r g b` line per photon.
    #[arg(short, long)]
    output: PathBuf,
    #[command(flatten)]
    pass: PassArgs,
}

#[derive(Args, Debug)]
struct ViewArgs {
    scene: PathBuf,
    photons: PathBuf,
    #[arg(short, long)]
    output: PathBuf,
    /// Largest distance at which a photon colours a hit point.
    #[arg(long, default_value_t = 0.05)]
    radius: Float,
    #[arg(long, default_value_t = 0)]
    camera: usize,
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str())).init();

    let result = match cli.command {
        Command::Render(args) => render(args),
        Command::Trace(args) => trace(args),
        Command::View(args) => view(args),
    };

    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn load(path: &Path, pass: &PassArgs) -> Result<(Scene, PhotonMappingConfig), Box<dyn Error>> {
    let loaded = load_scene_with_settings(path)?;
    let mut config = loaded.config;
    if let Some(photons) = pass.photons {
        config = config.with_photon_count(photons);
    }
    if let Some(seed) = pass.seed {
        config.seed = seed;
    }
    Ok((loaded.scene, config))
}

fn photon_pass(scene: &mut Scene, config: &PhotonMappingConfig) -> PhotonBuffer {
    scene.assign_photon_quotas(config.photon_count);
    let (buffer, _stats) = PhotonTracer::from_config(config).trace(&*scene, scene.lights());
    buffer
}

fn render(args: RenderArgs) -> Result<(), Box<dyn Error>> {
    let (mut scene, mut config) = load(&args.scene, &args.pass)?;
    if let Some(spp) = args.spp {
        config.samples_per_pixel = spp;
    }
    if let Some(k) = args.neighbours {
        config.nearest_neighbours = k;
    }
    config.validate()?;

    let buffer = photon_pass(&mut scene, &config);
    if let Some(path) = &args.dump_photons {
        photon_io::write_photons_to_file(&buffer, path)?;
    }

    let map = PhotonMap::build(&buffer, config.nearest_neighbours, config.max_search_radius);
    if map.is_empty() {
        log::warn!("No photons were stored; only the background will be visible.");
    }
    let integrator = PhotonMappingIntegrator::from_config(map, &config);
    let renderer = SimpleRenderer::new(Box::new(integrator), args.camera, config.seed);
    let image = renderer.render(&scene)?;
    write_image(&image, &args.output)?;
    Ok(())
}

fn trace(args: TraceArgs) -> Result<(), Box<dyn Error>> {
    let (mut scene, config) = load(&args.scene, &args.pass)?;
    config.validate()?;

    let buffer = photon_pass(&mut scene, &config);
    photon_io::write_photons_to_file(&buffer, &args.output)?;
    Ok(())
}

fn view(args: ViewArgs) -> Result<(), Box<dyn Error>> {
    let loaded = load_scene_with_settings(&args.scene)?;
    let buffer = photon_io::read_photons_from_file(&args.photons)?;

    let map = PhotonMap::build(&buffer, 1, args.radius);
    let integrator = PhotonViewerIntegrator::new(map, args.radius, loaded.config.background);
    let renderer = SimpleRenderer::new(Box::new(integrator), args.camera, loaded.config.seed);
    let image = renderer.render(&loaded.scene)?;
    write_image(&image, &args.output)?;
    Ok(())
}
