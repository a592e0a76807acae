//! Frame generation for a viewport.
//!
//! A frame is every tile of the viewport in row-major order, plus how long
//! it took to produce. Sequential, parallel and cached generation all yield
//! the same tiles.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::cache::{CacheStats, ChunkCache};
use crate::coords::TileCoord;
use crate::terrain::TerrainGenerator;
use crate::tile::Tile;
use crate::tilemap::Tilemap;
use crate::viewport::Viewport;

/// One rendered window of the world
#[derive(Clone, Debug)]
pub struct Frame {
    pub viewport: Viewport,
    pub world_seed: u64,
    pub tiles: Tilemap<Tile>,
    pub elapsed: Duration,
}

impl Frame {
    /// Generate on the calling thread with a single generator
    pub fn generate(viewport: Viewport, world_seed: u64) -> Frame {
        let viewport = viewport.clamped();
        let start = Instant::now();
        let mut generator = TerrainGenerator::new(world_seed);
        let tiles = Tilemap::from_fn(viewport.width as usize, viewport.height as usize, |dx, dy| {
            generator.tile_at(viewport.x + dx as u32, viewport.y + dy as u32)
        });

        Frame {
            viewport,
            world_seed,
            tiles,
            elapsed: start.elapsed(),
        }
    }

    /// Generate rows in parallel. Each rayon worker owns its own generator.
    pub fn generate_par(viewport: Viewport, world_seed: u64) -> Frame {
        let viewport = viewport.clamped();
        let start = Instant::now();
        let width = viewport.width as usize;
        let mut tiles = Tilemap::new(width, viewport.height as usize);

        tiles
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each_init(
                || TerrainGenerator::new(world_seed),
                |generator, (dy, row)| {
                    let y = viewport.y + dy as u32;
                    for (dx, tile) in row.iter_mut().enumerate() {
                        *tile = generator.tile_at(viewport.x + dx as u32, y);
                    }
                },
            );

        Frame {
            viewport,
            world_seed,
            tiles,
            elapsed: start.elapsed(),
        }
    }

    /// Fill from cached chunks
    pub fn from_cache(viewport: Viewport, cache: &mut ChunkCache) -> Frame {
        let viewport = viewport.clamped();
        let start = Instant::now();
        let world_seed = cache.world_seed();
        let tiles = Tilemap::from_fn(viewport.width as usize, viewport.height as usize, |dx, dy| {
            cache.tile_at(TileCoord::new(viewport.x + dx as u32, viewport.y + dy as u32))
        });

        Frame {
            viewport,
            world_seed,
            tiles,
            elapsed: start.elapsed(),
        }
    }

    /// Tile at a world coordinate, if it lies in this frame
    pub fn get(&self, coord: TileCoord) -> Option<Tile> {
        if !self.viewport.contains(coord) {
            return None;
        }
        let dx = (coord.x - self.viewport.x) as usize;
        let dy = (coord.y - self.viewport.y) as usize;
        Some(*self.tiles.get(dx, dy))
    }

    /// Rows as display strings
    pub fn rows(&self) -> Vec<String> {
        self.tiles
            .rows()
            .map(|row| row.iter().map(|tile| tile.glyph()).collect())
            .collect()
    }

    /// Number of tiles of each kind
    pub fn tile_counts(&self) -> HashMap<Tile, usize> {
        let mut counts = HashMap::new();
        for tile in self.tiles.values() {
            *counts.entry(*tile).or_insert(0) += 1;
        }
        counts
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Produces frames with a fixed strategy and world seed
pub struct FrameGenerator {
    world_seed: u64,
    parallel: bool,
    cache: Option<ChunkCache>,
}

impl FrameGenerator {
    /// `cache_chunks` of 0 disables the chunk cache
    pub fn new(world_seed: u64, parallel: bool, cache_chunks: usize) -> Self {
        let cache = if cache_chunks > 0 {
            Some(ChunkCache::with_capacity(cache_chunks, world_seed))
        } else {
            None
        };
        FrameGenerator {
            world_seed,
            parallel,
            cache,
        }
    }

    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    pub fn render(&mut self, viewport: Viewport) -> Frame {
        match &mut self.cache {
            Some(cache) => Frame::from_cache(viewport, cache),
            None if self.parallel => Frame::generate_par(viewport, self.world_seed),
            None => Frame::generate(viewport, self.world_seed),
        }
    }

    /// Generator used for single-tile queries such as the info panel
    pub fn terrain(&self) -> TerrainGenerator {
        TerrainGenerator::new(self.world_seed)
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Short label for status output
    pub fn strategy_name(&self) -> &'static str {
        match (&self.cache, self.parallel) {
            (Some(_), _) => "cached",
            (None, true) => "parallel",
            (None, false) => "sequential",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::tile_at;

    #[test]
    fn test_strategies_agree() {
        let viewport = Viewport::new(180, 30, 80, 22);
        let sequential = Frame::generate(viewport, 0);
        let parallel = Frame::generate_par(viewport, 0);
        let mut cache = ChunkCache::new(0);
        let cached = Frame::from_cache(viewport, &mut cache);

        assert_eq!(sequential.tiles, parallel.tiles);
        assert_eq!(sequential.tiles, cached.tiles);
    }

    #[test]
    fn test_strategies_agree_with_world_seed() {
        let viewport = Viewport::new(1000, 20000, 60, 30);
        let mut a = FrameGenerator::new(77, false, 0);
        let mut b = FrameGenerator::new(77, true, 0);
        let mut c = FrameGenerator::new(77, false, 8);
        let expected = a.render(viewport).tiles;
        assert_eq!(b.render(viewport).tiles, expected);
        assert_eq!(c.render(viewport).tiles, expected);
        assert_eq!(c.strategy_name(), "cached");
        assert!(a.cache_stats().is_none());
    }

    #[test]
    fn test_row_major_layout() {
        let viewport = Viewport::new(20, 0, 30, 12);
        let frame = Frame::generate(viewport, 0);
        let rows = frame.rows();
        assert_eq!(rows.len(), 12);
        for (dy, row) in rows.iter().enumerate() {
            let expected: String = (20..50).map(|x| tile_at(x, dy as u32).glyph()).collect();
            assert_eq!(row, &expected);
        }
        // The door of the house in plot (3, 0)
        assert_eq!(frame.get(TileCoord::new(32, 4)), Some(Tile::Door));
        assert_eq!(frame.get(TileCoord::new(19, 4)), None);
    }

    #[test]
    fn test_tile_counts_cover_frame() {
        let frame = Frame::generate_par(Viewport::default(), 0);
        let counts = frame.tile_counts();
        assert_eq!(counts.values().sum::<usize>(), 80 * 22);
        assert!(counts.get(&Tile::Claim).is_none());
        assert_eq!(counts.get(&Tile::Door), Some(&2));
    }

    #[test]
    fn test_hand_built_viewport_is_clamped() {
        let viewport = Viewport {
            x: u32::MAX - 10,
            y: 0,
            width: 80,
            height: 22,
        };
        let sequential = Frame::generate(viewport, 0);
        assert_eq!(sequential.viewport, Viewport::new(u32::MAX - 81, 0, 80, 22));
        assert_eq!(sequential.tiles.width, 80);

        let parallel = Frame::generate_par(viewport, 0);
        let mut cache = ChunkCache::with_capacity(1, 0);
        let cached = Frame::from_cache(viewport, &mut cache);
        assert_eq!(sequential.tiles, parallel.tiles);
        assert_eq!(sequential.tiles, cached.tiles);

        let last = TileCoord::new(u32::MAX - 2, 21);
        assert_eq!(sequential.get(last), Some(tile_at(last.x, last.y)));
    }

    #[test]
    fn test_reference_frame_is_repeatable() {
        let first = Frame::generate(Viewport::default(), 0);
        let second = Frame::generate(Viewport::default(), 0);
        assert_eq!(first.rows(), second.rows());
    }
}
