//! ASCII rendering and export module for generated frames
//!
//! Provides functions to render frames as plain or ANSI-coloured text and
//! export them to files.

use std::fs::File;
use std::io::{self, Write};
use chrono::Local;

use crate::frame::Frame;
use crate::terrain::{TerrainGenerator, TileOrigin};
use crate::tile::Tile;
use crate::tilemap::Tilemap;
use crate::viewport::Viewport;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Show tile glyphs
    Tiles,
    /// Show which generation stage decided each tile
    Stages,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Tiles => "Tiles",
            AsciiMode::Stages => "Stages",
        }
    }

    pub fn next(&self) -> AsciiMode {
        match self {
            AsciiMode::Tiles => AsciiMode::Stages,
            AsciiMode::Stages => AsciiMode::Tiles,
        }
    }
}

/// Get ASCII character for a generation stage
pub fn stage_char(origin: &TileOrigin) -> char {
    match origin {
        TileOrigin::OpenTerrain => '.',
        TileOrigin::House => 'h',
        TileOrigin::Vegetation { edge: true, .. } => 'E',
        TileOrigin::Vegetation { dense: true, .. } => 'V',
        TileOrigin::Vegetation { .. } => 'v',
    }
}

/// Get color for a generation stage
pub fn stage_color(origin: &TileOrigin) -> (u8, u8, u8) {
    match origin {
        TileOrigin::OpenTerrain => (70, 110, 60),
        TileOrigin::House => (170, 120, 70),
        TileOrigin::Vegetation { edge: true, .. } => (60, 90, 150),
        TileOrigin::Vegetation { dense: true, .. } => (40, 150, 70),
        TileOrigin::Vegetation { .. } => (120, 140, 90),
    }
}

/// Sample the generation stage of every tile in a viewport
pub fn stage_map(viewport: Viewport, world_seed: u64) -> Tilemap<TileOrigin> {
    let viewport = viewport.clamped();
    let mut generator = TerrainGenerator::new(world_seed);
    Tilemap::from_fn(viewport.width as usize, viewport.height as usize, |dx, dy| {
        let coord = viewport.origin();
        generator
            .sample((coord.x + dx as u32, coord.y + dy as u32).into())
            .origin
    })
}

/// Render a frame to ASCII string
pub fn render_ascii_frame(frame: &Frame) -> String {
    let width = frame.tiles.width;
    let mut result = String::with_capacity((width + 1) * frame.tiles.height);

    for row in frame.tiles.rows() {
        result.extend(row.iter().map(|tile| tile.glyph()));
        result.push('\n');
    }

    result
}

/// Render the stage view of a viewport to ASCII string
pub fn render_stage_map(viewport: Viewport, world_seed: u64) -> String {
    let stages = stage_map(viewport, world_seed);
    let mut result = String::with_capacity((stages.width + 1) * stages.height);

    for row in stages.rows() {
        result.extend(row.iter().map(stage_char));
        result.push('\n');
    }

    result
}

/// Generate legend for tile characters
pub fn tile_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== TILE LEGEND ===\n");
    for tile in Tile::rendered() {
        let glyph = match tile.glyph() {
            ' ' => "' '".to_string(),
            ch => ch.to_string(),
        };
        legend.push_str(&format!("  {:>3} {}\n", glyph, tile.display_name()));
    }
    legend
}

/// Generate legend for the stage view
pub fn stage_legend() -> String {
    "=== STAGE LEGEND ===\n\
     . Open terrain   h House plot\n\
     V Dense grove    v Sparse grove   E World edge\n".to_string()
}

/// Export a frame to an ASCII file, drawn in the given view
pub fn export_frame_file(
    frame: &Frame,
    mode: AsciiMode,
    path: &str,
    verbose: bool,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    let viewport = frame.viewport;
    let world_seed = frame.world_seed;
    let total = viewport.tile_count();

    // Header
    writeln!(file, "=== VOLATILE MAP FRAME ===")?;
    writeln!(file, "World seed: {}", world_seed)?;
    writeln!(file, "Origin: {},{}", viewport.x, viewport.y)?;
    writeln!(file, "Size: {}x{}", viewport.width, viewport.height)?;
    writeln!(file, "View: {}", mode.name())?;
    writeln!(file, "Generation time: {} ms", frame.elapsed_ms())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    // Map, framed so leading and trailing ground stays visible
    writeln!(file, "=== MAP ===")?;
    writeln!(file, "+{}+", "-".repeat(viewport.width as usize))?;
    let rows: Vec<String> = match mode {
        AsciiMode::Tiles => frame.rows(),
        AsciiMode::Stages => render_stage_map(viewport, world_seed)
            .lines()
            .map(str::to_string)
            .collect(),
    };
    for row in rows {
        writeln!(file, "|{}|", row)?;
    }
    writeln!(file, "+{}+", "-".repeat(viewport.width as usize))?;
    writeln!(file)?;

    // Legend
    match mode {
        AsciiMode::Tiles => write!(file, "{}", tile_legend())?,
        AsciiMode::Stages => write!(file, "{}", stage_legend())?,
    }
    writeln!(file)?;

    // Statistics
    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total tiles: {}", total)?;
    let counts = frame.tile_counts();
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (tile, count) in sorted {
        let pct = 100.0 * *count as f64 / total as f64;
        writeln!(file, "  {:10} {} {:>6} ({:>5.1}%)", tile.display_name(), tile.glyph(), count, pct)?;
    }
    writeln!(file)?;

    // Per-tile stage data
    if verbose {
        let stages = stage_map(viewport, world_seed);
        writeln!(file, "=== TILE DATA ===")?;
        writeln!(file, "[x,y,tile,stage]")?;
        for (dx, dy, origin) in stages.iter() {
            let tile = frame.tiles.get(dx, dy);
            writeln!(
                file,
                "{},{},{},{}",
                viewport.x as usize + dx,
                viewport.y as usize + dy,
                tile.display_name(),
                origin.name()
            )?;
        }
    }

    Ok(())
}

/// Print ASCII frame to stdout
pub fn print_ascii_frame(frame: &Frame) {
    print!("{}", render_ascii_frame(frame));
}

// ============================================================================
// COLORIZED ASCII RENDERING
// ============================================================================

/// Get foreground color for a tile
pub fn tile_fg_color(tile: &Tile) -> (u8, u8, u8) {
    let (r, g, b) = tile.color();
    let luminance = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luminance > 128.0 {
        (r.saturating_sub(60), g.saturating_sub(60), b.saturating_sub(60))
    } else {
        (r.saturating_add(80), g.saturating_add(80), b.saturating_add(80))
    }
}

/// Get background color for a tile (ground colour under everything but walls)
pub fn tile_bg_color(tile: &Tile) -> (u8, u8, u8) {
    match tile {
        Tile::Wall | Tile::Door => tile.color(),
        _ => Tile::Ground.color(),
    }
}

/// Format a single character with ANSI true color (24-bit) - foreground and background
pub fn ansi_colored_char(ch: char, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Format a string with ANSI true color (24-bit) - foreground only
pub fn ansi_fg_colored(text: &str, fg: (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", fg.0, fg.1, fg.2, text)
}

/// Render a colorized frame to string with ANSI codes
pub fn render_colored_ascii_frame(frame: &Frame) -> String {
    // Each cell needs ~40 bytes for ANSI codes
    let mut result = String::with_capacity(frame.tiles.len() * 45);

    for row in frame.tiles.rows() {
        for tile in row {
            result.push_str(&ansi_colored_char(tile.glyph(), tile_fg_color(tile), tile_bg_color(tile)));
        }
        result.push_str("\x1b[0m\n");
    }

    result
}

/// Print colorized frame to stdout
pub fn print_colored_ascii_frame(frame: &Frame) {
    print!("{}", render_colored_ascii_frame(frame));
}

/// Generate colorized legend for tile characters
pub fn tile_legend_colored() -> String {
    let mut legend = String::new();
    legend.push_str("\x1b[1m=== TILE LEGEND ===\x1b[0m\n");
    for tile in Tile::rendered() {
        let swatch = ansi_colored_char(tile.glyph(), tile_fg_color(tile), tile_bg_color(tile));
        legend.push_str(&format!("  {} {}\n", swatch, ansi_fg_colored(tile.display_name(), tile.color())));
    }
    legend
}
