use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use volatile_map::ascii::{self, AsciiMode};
use volatile_map::config::ExplorerConfig;
use volatile_map::explorer;
use volatile_map::export;
use volatile_map::frame::FrameGenerator;

#[derive(Parser, Debug)]
#[command(name = "volatile_map")]
#[command(about = "Explore an infinite, deterministic tile world")]
struct Args {
    /// Window origin X
    #[arg(long)]
    x: Option<u32>,

    /// Window origin Y
    #[arg(long)]
    y: Option<u32>,

    /// Window width in tiles
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Window height in tiles
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// World seed (0 is the reference world)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pick a random world seed
    #[arg(long, conflicts_with = "seed")]
    random_seed: bool,

    /// Load settings from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print one frame to stdout and exit
    #[arg(long)]
    print: bool,

    /// Use ANSI colours with --print
    #[arg(long)]
    color: bool,

    /// Show generation stages instead of tiles in --print and exports
    #[arg(long)]
    stages: bool,

    /// Export the window as text (e.g., "map.txt") and exit
    #[arg(long)]
    export_ascii: Option<String>,

    /// Include a per-tile listing in the text export
    #[arg(long)]
    verbose: bool,

    /// Export the window as PNG (e.g., "map.png") and exit
    #[arg(long)]
    export_png: Option<String>,

    /// Pixels per tile for PNG export (1-16)
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// Write the effective config to a JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Generate frames on the calling thread only
    #[arg(long)]
    no_parallel: bool,
}

/// Settings from the config file with command-line overrides applied
fn effective_config(args: &Args) -> Result<ExplorerConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };

    if let Some(x) = args.x {
        config.start_x = x;
    }
    if let Some(y) = args.y {
        config.start_y = y;
    }
    if let Some(width) = args.width {
        config.view_width = width;
    }
    if let Some(height) = args.height {
        config.view_height = height;
    }
    if let Some(seed) = args.seed {
        config.world_seed = seed;
    }
    if args.random_seed {
        config.world_seed = rand::random();
    }
    if args.no_parallel {
        config.parallel = false;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = effective_config(&args)?;

    if let Some(path) = &args.save_config {
        config.save(path)?;
        println!("Saved config to {}", path.display());
    }

    let one_shot = args.print || args.export_ascii.is_some() || args.export_png.is_some();
    if !one_shot {
        return explorer::run_explorer(&config);
    }

    let viewport = config.viewport();
    let mode = if args.stages { AsciiMode::Stages } else { AsciiMode::Tiles };
    let mut frames = FrameGenerator::new(config.world_seed, config.parallel, 0);
    let frame = frames.render(viewport);

    if args.print {
        match (mode, args.color) {
            (AsciiMode::Stages, _) => {
                print!("{}", ascii::render_stage_map(viewport, config.world_seed));
                print!("{}", ascii::stage_legend());
            }
            (AsciiMode::Tiles, true) => {
                ascii::print_colored_ascii_frame(&frame);
                print!("{}", ascii::tile_legend_colored());
            }
            (AsciiMode::Tiles, false) => {
                ascii::print_ascii_frame(&frame);
                print!("{}", ascii::tile_legend());
            }
        }
        println!(
            "Generating map at {},{} took: {} ms",
            viewport.x,
            viewport.y,
            frame.elapsed_ms()
        );
    }

    if let Some(filename) = &args.export_ascii {
        println!("Exporting {} view to {}...", mode.name(), filename);
        ascii::export_frame_file(&frame, mode, filename, args.verbose)?;
    }

    if let Some(filename) = &args.export_png {
        println!("Exporting {} view to {}...", mode.name(), filename);
        export::export_frame_png(&frame, mode, args.png_scale, filename)?;
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
