//! PNG export of generated frames.

use std::error::Error;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::ascii::{stage_color, stage_map, AsciiMode};
use crate::frame::Frame;
use crate::tile::Tile;

/// Largest accepted pixel scale per tile
pub const MAX_SCALE: u32 = 16;

/// Paint one tile as a `scale`x`scale` block.
///
/// Marked tiles get a darker center so trees and doors stay visible once
/// each tile spans a few pixels.
fn paint_block(img: &mut RgbImage, tx: u32, ty: u32, scale: u32, color: (u8, u8, u8), marked: bool) {
    let (r, g, b) = color;
    for py in 0..scale {
        for px in 0..scale {
            let center = px > 0 && py > 0 && px < scale - 1 && py < scale - 1;
            let pixel = if marked && center {
                Rgb([r / 2, g / 2, b / 2])
            } else {
                Rgb([r, g, b])
            };
            img.put_pixel(tx * scale + px, ty * scale + py, pixel);
        }
    }
}

/// Render a frame into an image buffer
pub fn render_frame_image(frame: &Frame, mode: AsciiMode, scale: u32) -> RgbImage {
    let scale = scale.clamp(1, MAX_SCALE);
    let width = frame.tiles.width as u32;
    let height = frame.tiles.height as u32;
    let mut img = ImageBuffer::new(width * scale, height * scale);

    match mode {
        AsciiMode::Tiles => {
            for (x, y, tile) in frame.tiles.iter() {
                let marked = matches!(tile, Tile::Tree | Tile::Door);
                paint_block(&mut img, x as u32, y as u32, scale, tile.color(), marked);
            }
        }
        AsciiMode::Stages => {
            let stages = stage_map(frame.viewport, frame.world_seed);
            for (x, y, origin) in stages.iter() {
                let marked = frame.tiles.get(x, y).is_structure();
                paint_block(&mut img, x as u32, y as u32, scale, stage_color(origin), marked);
            }
        }
    }

    img
}

/// Export a frame as a PNG image
pub fn export_frame_png(
    frame: &Frame,
    mode: AsciiMode,
    scale: u32,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let img = render_frame_image(frame, mode, scale);
    img.save(filename)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    #[test]
    fn test_image_dimensions() {
        let frame = Frame::generate(Viewport::new(0, 0, 20, 10), 0);
        let img = render_frame_image(&frame, AsciiMode::Tiles, 3);
        assert_eq!(img.dimensions(), (60, 30));

        let img = render_frame_image(&frame, AsciiMode::Stages, 0);
        assert_eq!(img.dimensions(), (20, 10));
    }

    #[test]
    fn test_tile_colors() {
        // (0,0) is a tree, (1,0) ground
        let frame = Frame::generate(Viewport::new(0, 0, 4, 1), 0);
        let img = render_frame_image(&frame, AsciiMode::Tiles, 3);
        let (r, g, b) = Tile::Tree.color();
        assert_eq!(img.get_pixel(0, 0), &Rgb([r, g, b]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([r / 2, g / 2, b / 2]));
        let (r, g, b) = Tile::Ground.color();
        assert_eq!(img.get_pixel(4, 1), &Rgb([r, g, b]));
    }

    #[test]
    fn test_export_png_file() {
        let frame = Frame::generate(Viewport::new(20, 0, 30, 12), 0);
        let path = std::env::temp_dir().join("volatile_map_png_export_test.png");
        let path_str = path.to_string_lossy().to_string();

        export_frame_png(&frame, AsciiMode::Tiles, 2, &path_str).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.dimensions(), (60, 24));
    }
}
