mod ic;

use clap::Parser;
use ic::{SeedPattern, generate_seed};
use pde_core::{
    BoundaryKind, EquationKind, LuminanceImage, SchemeKind, Solver, SolverConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// JSON solver configuration; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Raw RGBA8 seed image (width*height*4 bytes); a procedural seed is used when absent
    #[arg(long)]
    input: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long, default_value_t = 128)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 128)]
    height: usize,

    /// Procedural seed pattern (ignored with --input)
    #[arg(long, value_enum, default_value_t = SeedPattern::Random)]
    pattern: SeedPattern,

    /// RNG seed for the procedural pattern
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Number of frames to write
    #[arg(long, default_value_t = 100)]
    frames: u32,

    /// Solver steps between written frames
    #[arg(long, default_value_t = 1)]
    steps_per_frame: u32,

    /// heat | wave | exponential-decay
    #[arg(long)]
    equation: Option<String>,

    /// periodic | dirichlet | zero | fixed | neumann | reflective | robin
    #[arg(long)]
    boundary: Option<String>,

    /// forward-euler | backward-euler
    #[arg(long)]
    scheme: Option<String>,

    /// Time step
    #[arg(long)]
    dt: Option<f32>,

    /// Grid spacing
    #[arg(long)]
    cell_spacing: Option<f32>,

    /// Use the per-texel backend
    #[arg(long)]
    gpu: bool,

    /// Debug-level logging unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct FrameRow {
    frame: u32,
    step: u64,

    equation: EquationKind,
    scheme: SchemeKind,
    boundary: BoundaryKind,
    backend: &'static str,

    dt: f32,
    coeff: f32,
    stable: bool,

    iterations: u32,
    max_change: f32,
    converged: bool,

    mean_luminance: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = build_config(&args)?;
    config.validate()?;

    let seed_image = load_seed(&args)?;

    fs::create_dir_all(&args.out)?;
    let mut frames_writer = BufWriter::new(File::create(args.out.join("frames.bin"))?);
    let mut meta_file = BufWriter::new(
        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(args.out.join("meta.jsonl"))?,
    );
    fs::write(
        args.out.join("config.json"),
        serde_json::to_string_pretty(&config)?,
    )?;

    let mut solver = Solver::new(&seed_image, config)?;
    info!(
        width = solver.width(),
        height = solver.height(),
        equation = %solver.config().equation,
        scheme = %solver.config().scheme,
        boundary = %solver.config().boundary,
        coeff = solver.coefficient(),
        "solver ready"
    );

    for frame in 0..args.frames {
        let image = solver.step_n(args.steps_per_frame.max(1));
        frames_writer.write_all(image.as_bytes())?;
        let mean_luminance = mean_luminance(image);

        let stats = solver.last_stats();
        let cfg = solver.config();
        let row = FrameRow {
            frame,
            step: solver.step_count(),

            equation: cfg.equation,
            scheme: cfg.scheme,
            boundary: cfg.boundary,
            backend: solver.backend_name(),

            dt: cfg.dt,
            coeff: solver.coefficient(),
            stable: solver.stability().is_stable(),

            iterations: stats.iterations,
            max_change: stats.max_change,
            converged: stats.converged,

            mean_luminance,
        };

        serde_json::to_writer(&mut meta_file, &row)?;
        meta_file.write_all(b"\n")?;
    }

    frames_writer.flush()?;
    meta_file.flush()?;

    println!("Wrote frames to: {}", args.out.display());
    println!(
        "Frames: {} ({}x{}, {} steps total)",
        args.frames,
        solver.width(),
        solver.height(),
        solver.step_count()
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args) -> Result<SolverConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => SolverConfig::default(),
    };

    // unknown names fall back to the defaults with a warning
    if let Some(name) = &args.equation {
        config.equation = EquationKind::parse_or_default(name);
    }
    if let Some(name) = &args.boundary {
        config.boundary = BoundaryKind::parse_or_default(name);
    }
    if let Some(name) = &args.scheme {
        config.scheme = SchemeKind::parse_or_default(name);
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    if let Some(dx) = args.cell_spacing {
        config.cell_spacing = dx;
    }
    if args.gpu {
        config.use_gpu_path = true;
    }
    Ok(config)
}

fn load_seed(args: &Args) -> Result<LuminanceImage, Box<dyn std::error::Error>> {
    match &args.input {
        Some(path) => load_rgba(path, args.width, args.height),
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            let (pattern, image) = generate_seed(&mut rng, args.width, args.height, args.pattern)?;
            info!(pattern = pattern.as_str(), seed = args.seed, "generated seed");
            Ok(image)
        }
    }
}

fn load_rgba(
    path: &Path,
    width: usize,
    height: usize,
) -> Result<LuminanceImage, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    // input may be colour; the solver expects R = G = B
    Ok(LuminanceImage::from_color_rgba(width, height, &bytes)?)
}

fn mean_luminance(image: &LuminanceImage) -> f32 {
    let bytes = image.as_bytes();
    let pixels = bytes.len() / 4;
    if pixels == 0 {
        return 0.0;
    }
    let sum: u64 = bytes.chunks_exact(4).map(|px| u64::from(px[0])).sum();
    sum as f32 / pixels as f32
}
