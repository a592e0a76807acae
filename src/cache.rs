//! Chunk cache for generated tiles
//!
//! Tiles are a pure function of their coordinate, so caching never changes
//! what is shown; it only skips regenerating chunks the viewport revisits.
//! Chunks are 50x50 blocks aligned with macro cells.

use std::collections::HashMap;
use std::time::Instant;

use crate::coords::TileCoord;
use crate::terrain::TerrainGenerator;
use crate::tile::Tile;
use crate::tilemap::Tilemap;

/// Side length of a cached chunk in tiles
pub const CHUNK_SIZE: u32 = 50;

/// Maximum number of chunks to keep in cache
pub const DEFAULT_MAX_CACHED: usize = 64;

/// Index of a cached chunk
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: u32,
    pub y: u32,
}

impl ChunkCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn containing(coord: TileCoord) -> Self {
        Self::new(coord.x / CHUNK_SIZE, coord.y / CHUNK_SIZE)
    }

    /// First tile of the chunk
    pub fn origin(&self) -> TileCoord {
        TileCoord::new(self.x * CHUNK_SIZE, self.y * CHUNK_SIZE)
    }

    /// Width and height; chunks on the last row/column are clipped at u32::MAX
    pub fn extent(&self) -> (usize, usize) {
        let origin = self.origin();
        let clip = |start: u32| ((u32::MAX - start) as u64 + 1).min(CHUNK_SIZE as u64) as usize;
        (clip(origin.x), clip(origin.y))
    }

    /// Chebyshev distance in chunks
    pub fn distance(&self, other: &ChunkCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// A cached chunk with metadata
pub struct CachedChunk {
    pub tiles: Tilemap<Tile>,
    pub last_accessed: Instant,
}

impl CachedChunk {
    fn new(tiles: Tilemap<Tile>) -> Self {
        CachedChunk {
            tiles,
            last_accessed: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

fn generate_chunk(generator: &mut TerrainGenerator, chunk: ChunkCoord) -> Tilemap<Tile> {
    let origin = chunk.origin();
    let (width, height) = chunk.extent();
    Tilemap::from_fn(width, height, |dx, dy| {
        generator.tile_at(origin.x + dx as u32, origin.y + dy as u32)
    })
}

/// Cache for generated chunks with distance-then-age eviction
pub struct ChunkCache {
    chunks: HashMap<ChunkCoord, CachedChunk>,
    max_cached: usize,
    generator: TerrainGenerator,
    /// Most recently requested chunk (eviction keeps what is near it)
    focus: ChunkCoord,
    hits: u64,
    misses: u64,
}

impl ChunkCache {
    /// Create a new cache with default settings
    pub fn new(world_seed: u64) -> Self {
        Self::with_capacity(DEFAULT_MAX_CACHED, world_seed)
    }

    /// Create a new cache with custom max size
    pub fn with_capacity(max_cached: usize, world_seed: u64) -> Self {
        ChunkCache {
            chunks: HashMap::new(),
            max_cached: max_cached.max(1),
            generator: TerrainGenerator::new(world_seed),
            focus: ChunkCoord::default(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn world_seed(&self) -> u64 {
        self.generator.world_seed()
    }

    /// Tile at a world coordinate, generating its chunk if needed
    pub fn tile_at(&mut self, coord: TileCoord) -> Tile {
        let chunk = ChunkCoord::containing(coord);
        let origin = chunk.origin();
        let tiles = self.get_or_load(chunk);
        *tiles.get((coord.x - origin.x) as usize, (coord.y - origin.y) as usize)
    }

    /// Get a chunk, loading it if necessary
    pub fn get_or_load(&mut self, chunk: ChunkCoord) -> &Tilemap<Tile> {
        self.focus = chunk;
        if self.chunks.contains_key(&chunk) {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.evict_distant(self.max_cached - 1);
        }

        let generator = &mut self.generator;
        let cached = self
            .chunks
            .entry(chunk)
            .or_insert_with(|| CachedChunk::new(generate_chunk(generator, chunk)));
        cached.touch();
        &cached.tiles
    }

    /// Check if a chunk is cached
    pub fn is_cached(&self, chunk: &ChunkCoord) -> bool {
        self.chunks.contains_key(chunk)
    }

    /// Evict the chunks farthest from the focus until at most `keep` remain
    fn evict_distant(&mut self, keep: usize) {
        if self.chunks.len() <= keep {
            return;
        }

        let mut ranked: Vec<(ChunkCoord, u32, Instant)> = self
            .chunks
            .iter()
            .map(|(chunk, cached)| (*chunk, chunk.distance(&self.focus), cached.last_accessed))
            .collect();

        // Furthest first, then oldest first
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

        for (chunk, _, _) in ranked {
            if self.chunks.len() <= keep {
                break;
            }
            self.chunks.remove(&chunk);
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached_count: self.chunks.len(),
            max_capacity: self.max_cached,
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// Clear the entire cache
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub cached_count: usize,
    pub max_capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// Chunks and macro cells must line up so a chunk never straddles a gate
const _: () = assert!(CHUNK_SIZE % 50 == 0);
