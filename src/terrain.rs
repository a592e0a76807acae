//! Stateless tile generation.
//!
//! A tile is a pure function of its coordinate. Three stages run in order:
//!
//! 1. **Macro gate**: one draw per 50x50 macro cell decides whether the cell
//!    is open terrain (sparse trees from an exact-coordinate draw) or a
//!    settlement candidate.
//! 2. **Plot neighborhood**: a 3x3 sample over 10x10 plots marks claimed
//!    plots and yields a house footprint.
//! 3. **House or vegetation**: a claimed plot with an unclaimed western
//!    neighbour renders its footprint outline; everything else falls back to
//!    grove-based vegetation with a denser band along the world edge.
//!
//! The generator is reseeded before every draw, so coordinates can be
//! visited in any order.

use crate::coords::{salted, GridScale, TileCoord};
use crate::rng::Lehmer;
use crate::tile::Tile;

/// Macro draws below this are open terrain
pub const OPEN_TERRAIN_THRESHOLD: i32 = 85;
/// Exact draw above this puts a tree on open terrain
pub const OPEN_TREE_THRESHOLD: i32 = 90;
/// Plot draw above this claims the plot
pub const CLAIM_THRESHOLD: i32 = 60;
/// Grove draw above this makes the grove dense
pub const GROVE_THRESHOLD: i32 = 80;
/// Exact draw above this puts a tree in a dense grove
pub const GROVE_TREE_THRESHOLD: i32 = 95;

const WEST: usize = 3;
const CENTER: usize = 4;

/// Rectangular house outline inside a 10x10 plot, in plot-local coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Footprint {
    pub start: u32,
    pub size: u32,
}

impl Footprint {
    pub fn new(start: u32, size: u32) -> Self {
        Self { start, size }
    }

    /// Far edge of the outline (inclusive)
    pub fn end(&self) -> u32 {
        self.start + self.size
    }

    /// Door position on the western wall
    pub fn door(&self) -> (u32, u32) {
        (self.start, self.start + self.size / 2)
    }

    pub fn on_perimeter(&self, local_x: u32, local_y: u32) -> bool {
        let (start, end) = (self.start, self.end());
        let spans_x = local_x >= start && local_x <= end;
        let spans_y = local_y >= start && local_y <= end;
        ((local_y == start || local_y == end) && spans_x)
            || ((local_x == start || local_x == end) && spans_y)
    }

    /// Wall, door, or interior ground
    pub fn tile_at(&self, local_x: u32, local_y: u32) -> Tile {
        if !self.on_perimeter(local_x, local_y) {
            Tile::Ground
        } else if (local_x, local_y) == self.door() {
            Tile::Door
        } else {
            Tile::Wall
        }
    }
}

/// Claim markers of the 3x3 plots around a coordinate, row-major from the
/// north-west corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    pub cells: [Tile; 9],
    /// Claimed plots around the center, center excluded
    pub house_count: u8,
    /// Footprint drawn by the last (south-east) sample
    pub footprint: Footprint,
}

impl Neighborhood {
    pub fn center(&self) -> Tile {
        self.cells[CENTER]
    }

    pub fn west(&self) -> Tile {
        self.cells[WEST]
    }

    /// The center plot holds a house when it is claimed and its western
    /// neighbour is not.
    pub fn hosts_house(&self) -> bool {
        self.west() != Tile::Claim && self.center() == Tile::Claim
    }
}

/// Which stage decided a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileOrigin {
    OpenTerrain,
    House,
    Vegetation {
        /// The grove draw passed the density threshold
        dense: bool,
        /// The grove lies on the world-edge band
        edge: bool,
    },
}

impl TileOrigin {
    pub fn name(&self) -> &'static str {
        match self {
            TileOrigin::OpenTerrain => "Open terrain",
            TileOrigin::House => "House plot",
            TileOrigin::Vegetation { .. } => "Vegetation",
        }
    }
}

/// A tile together with the intermediate values that produced it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSample {
    pub coord: TileCoord,
    pub tile: Tile,
    pub origin: TileOrigin,
    pub macro_draw: i32,
    pub neighborhood: Option<Neighborhood>,
}

/// Groves on this band always take the exact-coordinate tree draw.
///
/// The band is fixed in world space and ignores the viewport.
pub fn is_world_edge(coord: TileCoord) -> bool {
    let gx = coord.x / GridScale::Grove.size();
    let gy = coord.y / GridScale::Grove.size();
    gx <= 1 || gx >= 22 || gy <= 1 || gy >= 8
}

/// Tile generator owning its own [`Lehmer`] stream.
///
/// Cheap to create; parallel callers build one per worker.
#[derive(Clone, Debug, Default)]
pub struct TerrainGenerator {
    rng: Lehmer,
    world_seed: u64,
}

impl TerrainGenerator {
    /// World seed 0 is the reference world
    pub fn new(world_seed: u64) -> Self {
        Self {
            rng: Lehmer::default(),
            world_seed,
        }
    }

    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    fn draw(&mut self, key: u64, min: i32, max: i32) -> i32 {
        self.rng.reseed(salted(key, self.world_seed));
        self.rng.next(min, max)
    }

    /// Stage 1 draw shared by the whole macro cell
    pub fn macro_draw(&mut self, coord: TileCoord) -> i32 {
        self.draw(GridScale::Macro.key(coord), 0, 100)
    }

    pub fn is_open_terrain(&mut self, coord: TileCoord) -> bool {
        self.macro_draw(coord) < OPEN_TERRAIN_THRESHOLD
    }

    fn open_terrain(&mut self, coord: TileCoord) -> Tile {
        if self.draw(GridScale::Tile.key(coord), 0, 100) > OPEN_TREE_THRESHOLD {
            Tile::Tree
        } else {
            Tile::Ground
        }
    }

    /// Stage 2: sample the 3x3 plots around `coord`.
    pub fn neighborhood(&mut self, coord: TileCoord) -> Neighborhood {
        let mut cells = [Tile::Ground; 9];
        let mut house_count = 0;
        let mut footprint = Footprint::default();

        let mut i = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let key = GridScale::Plot.neighbor_key(coord, dx, dy);
                let claimed = self.draw(key, 0, 100) > CLAIM_THRESHOLD;
                if claimed && i != CENTER {
                    house_count += 1;
                }
                cells[i] = if claimed { Tile::Claim } else { Tile::Ground };

                // Every sample overwrites the footprint; the south-east one wins
                let size = self.rng.next(2, 7) as u32;
                let start = self.rng.next(1, 2) as u32;
                footprint = Footprint::new(start, size);
                i += 1;
            }
        }

        Neighborhood {
            cells,
            house_count,
            footprint,
        }
    }

    /// Stage 3b: grove-based vegetation. Returns the tile and its origin.
    pub fn vegetation(&mut self, coord: TileCoord) -> (Tile, TileOrigin) {
        let edge = is_world_edge(coord);
        let dense = self.draw(GridScale::Grove.key(coord), 0, 100) > GROVE_THRESHOLD;

        let tile = if dense || edge {
            if self.draw(GridScale::Tile.key(coord), 0, 100) > GROVE_TREE_THRESHOLD {
                Tile::Tree
            } else {
                Tile::Ground
            }
        } else {
            Tile::Ground
        };

        (tile, TileOrigin::Vegetation { dense, edge })
    }

    /// Run all stages for `coord`, keeping the intermediate values.
    pub fn sample(&mut self, coord: TileCoord) -> TileSample {
        let macro_draw = self.macro_draw(coord);
        if macro_draw < OPEN_TERRAIN_THRESHOLD {
            return TileSample {
                coord,
                tile: self.open_terrain(coord),
                origin: TileOrigin::OpenTerrain,
                macro_draw,
                neighborhood: None,
            };
        }

        let neighborhood = self.neighborhood(coord);
        let (tile, origin) = if neighborhood.hosts_house() {
            let (local_x, local_y) = coord.local(GridScale::Plot);
            (neighborhood.footprint.tile_at(local_x, local_y), TileOrigin::House)
        } else {
            self.vegetation(coord)
        };

        TileSample {
            coord,
            tile,
            origin,
            macro_draw,
            neighborhood: Some(neighborhood),
        }
    }

    pub fn tile_at(&mut self, x: u32, y: u32) -> Tile {
        self.sample(TileCoord::new(x, y)).tile
    }
}

/// Tile of the reference world at (`x`, `y`)
pub fn tile_at(x: u32, y: u32) -> Tile {
    TerrainGenerator::default().tile_at(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    /// 60x12 window at the origin of the reference world
    const ORIGIN_WINDOW: [&str; 12] = [
        "T    T                                          T       T   ",
        "                  T                                T  TT    ",
        "                 T              #####    T                  ",
        "      T               T         #   #     T   T   T      T  ",
        "        T    TT     T       T   +   #   T         T         ",
        " T                 T            #   #             T T      T",
        "                            T   #####             T         ",
        "  T                     T                        T  T       ",
        "    T                        T              T          T  T ",
        "                   T                                   T   T",
        "                                                            ",
        "    T                ####                                   ",
    ];

    fn window(gen: &mut TerrainGenerator, ox: u32, oy: u32, w: u32, h: u32) -> Vec<String> {
        (oy..oy + h)
            .map(|y| (ox..ox + w).map(|x| gen.tile_at(x, y).glyph()).collect())
            .collect()
    }

    #[test]
    fn test_origin_window_matches_reference() {
        let mut gen = TerrainGenerator::default();
        let rows = window(&mut gen, 0, 0, 60, 12);
        for (y, (row, expected)) in rows.iter().zip(ORIGIN_WINDOW.iter()).enumerate() {
            assert_eq!(row, expected, "row {} differs", y);
        }
    }

    #[test]
    fn test_reference_house() {
        // Plot (3, 0) holds a 4x4 house with its door on the west wall
        assert_eq!(tile_at(32, 4), Tile::Door);
        for x in 32..=36 {
            assert_eq!(tile_at(x, 2), Tile::Wall);
            assert_eq!(tile_at(x, 6), Tile::Wall);
        }
        assert_eq!(tile_at(36, 4), Tile::Wall);
        assert_eq!(tile_at(34, 4), Tile::Ground);

        let sample = TerrainGenerator::default().sample(TileCoord::new(34, 4));
        assert_eq!(sample.origin, TileOrigin::House);
        let hood = sample.neighborhood.unwrap();
        assert!(hood.hosts_house());
        assert_eq!(hood.footprint, Footprint::new(2, 4));
    }

    #[test]
    fn test_open_terrain_trees() {
        let trees: Vec<u32> = (50..100).filter(|&x| tile_at(x, 0) == Tile::Tree).collect();
        assert_eq!(trees, vec![56, 64, 67, 69, 70, 71, 89]);

        let sample = TerrainGenerator::default().sample(TileCoord::new(56, 0));
        assert_eq!(sample.origin, TileOrigin::OpenTerrain);
        assert!(sample.neighborhood.is_none());
    }

    #[test]
    fn test_determinism_any_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        let coords: Vec<(u32, u32)> = (0..2000).map(|_| (rng.gen(), rng.gen())).collect();

        let mut forward = TerrainGenerator::default();
        let first: Vec<Tile> = coords.iter().map(|&(x, y)| forward.tile_at(x, y)).collect();

        // Reverse order on a single reused generator
        let mut reused = TerrainGenerator::default();
        let mut second: Vec<Tile> = coords.iter().rev().map(|&(x, y)| reused.tile_at(x, y)).collect();
        second.reverse();

        assert_eq!(first, second);
        for (&(x, y), &tile) in coords.iter().zip(first.iter()).take(200) {
            assert_eq!(tile_at(x, y), tile);
        }
    }

    #[test]
    fn test_claim_never_emitted() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut gen = TerrainGenerator::default();
        for _ in 0..5000 {
            let tile = gen.tile_at(rng.gen(), rng.gen());
            assert_ne!(tile, Tile::Claim);
        }
        for row in window(&mut gen, 0, 0, 300, 50) {
            assert!(!row.contains('c'));
        }
    }

    #[test]
    fn test_macro_cell_consistency() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut gen = TerrainGenerator::default();

        for _ in 0..50 {
            let cell_x = rng.gen_range(0..u32::MAX / 50);
            let cell_y = rng.gen_range(0..u32::MAX / 50);
            let base = TileCoord::new(cell_x * 50, cell_y * 50);
            let open = gen.is_open_terrain(base);

            for _ in 0..20 {
                let coord = TileCoord::new(base.x + rng.gen_range(0..50), base.y + rng.gen_range(0..50));
                assert_eq!(gen.is_open_terrain(coord), open);
                let origin = gen.sample(coord).origin;
                assert_eq!(origin == TileOrigin::OpenTerrain, open);
            }
        }
    }

    #[test]
    fn test_one_door_per_footprint() {
        // Macro cells (0,0), (4,0), (5,0) are settlement candidates
        let mut gen = TerrainGenerator::default();
        let mut plots: HashMap<(u32, u32), (usize, usize)> = HashMap::new();
        for y in 0..50 {
            for x in 0..300 {
                let entry = plots.entry((x / 10, y / 10)).or_default();
                match gen.tile_at(x, y) {
                    Tile::Door => entry.0 += 1,
                    Tile::Wall => entry.1 += 1,
                    _ => {}
                }
            }
        }

        let mut houses = 0;
        for (plot, (doors, walls)) in plots {
            if walls > 0 {
                houses += 1;
                assert_eq!(doors, 1, "plot {:?} has {} doors", plot, doors);
            } else {
                assert_eq!(doors, 0, "plot {:?} has a door without walls", plot);
            }
        }
        assert!(houses >= 4);
    }

    #[test]
    fn test_footprint_outline() {
        let footprint = Footprint::new(1, 3);
        assert_eq!(footprint.door(), (1, 2));
        assert_eq!(footprint.tile_at(1, 2), Tile::Door);
        assert_eq!(footprint.tile_at(1, 1), Tile::Wall);
        assert_eq!(footprint.tile_at(4, 4), Tile::Wall);
        assert_eq!(footprint.tile_at(2, 2), Tile::Ground);
        assert_eq!(footprint.tile_at(5, 1), Tile::Ground);
        assert_eq!(footprint.tile_at(0, 0), Tile::Ground);

        // Every footprint the generator can draw fits in a plot with one door
        for start in 1..=2 {
            for size in 2..=7 {
                let footprint = Footprint::new(start, size);
                assert!(footprint.end() < 10);
                let mut doors = 0;
                let mut walls = 0;
                for y in 0..10 {
                    for x in 0..10 {
                        match footprint.tile_at(x, y) {
                            Tile::Door => doors += 1,
                            Tile::Wall => walls += 1,
                            _ => {}
                        }
                    }
                }
                assert_eq!(doors, 1);
                assert_eq!(walls, 4 * size as usize - 1);
            }
        }
    }

    #[test]
    fn test_edge_groves_always_draw() {
        let mut gen = TerrainGenerator::default();
        let mut rng = Lehmer::default();
        for y in 0..200 {
            for x in 0..10 {
                let coord = TileCoord::new(x, y);
                let (tile, origin) = gen.vegetation(coord);
                match origin {
                    TileOrigin::Vegetation { edge, .. } => assert!(edge),
                    other => panic!("unexpected origin {:?}", other),
                }
                rng.reseed(GridScale::Tile.key(coord));
                let expected = if rng.next(0, 100) > GROVE_TREE_THRESHOLD { Tile::Tree } else { Tile::Ground };
                assert_eq!(tile, expected);
            }
        }
    }

    #[test]
    fn test_edge_band_has_more_trees() {
        let mut gen = TerrainGenerator::default();
        let trees = |gen: &mut TerrainGenerator, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>| {
            let mut count = 0;
            let mut total = 0;
            for y in ys {
                for x in xs.clone() {
                    total += 1;
                    if gen.vegetation(TileCoord::new(x, y)).0 == Tile::Tree {
                        count += 1;
                    }
                }
            }
            count as f64 / total as f64
        };

        let edge = trees(&mut gen, 0..10, 0..1000);
        let interior = trees(&mut gen, 10..110, 10..40);
        assert!(edge > 3.0 * interior, "edge {} interior {}", edge, interior);
    }

    #[test]
    fn test_world_edge_band() {
        assert!(is_world_edge(TileCoord::new(9, 20)));
        assert!(!is_world_edge(TileCoord::new(10, 20)));
        assert!(is_world_edge(TileCoord::new(110, 20)));
        assert!(is_world_edge(TileCoord::new(50, 40)));
        assert!(is_world_edge(TileCoord::new(50, 9)));
        assert!(!is_world_edge(TileCoord::new(50, 39)));
    }

    #[test]
    fn test_sample_matches_tile_at() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut gen = TerrainGenerator::default();
        for _ in 0..1000 {
            let (x, y) = (rng.gen_range(0..400), rng.gen_range(0..400));
            let sample = gen.sample(TileCoord::new(x, y));
            assert_eq!(sample.tile, tile_at(x, y));
            assert_eq!(sample.neighborhood.is_some(), sample.macro_draw >= OPEN_TERRAIN_THRESHOLD);
            if let Some(hood) = sample.neighborhood {
                let claimed = hood.cells.iter().enumerate()
                    .filter(|&(i, c)| i != CENTER && *c == Tile::Claim)
                    .count();
                assert_eq!(hood.house_count as usize, claimed);
                assert!((1..=2).contains(&hood.footprint.start));
                assert!((2..=7).contains(&hood.footprint.size));
            }
        }
    }

    /// Two houses 180 tiles from the far corner, at (u32::MAX - 99, u32::MAX - 183)
    const FAR_CORNER_WINDOW: [&str; 8] = [
        "      ######     T     T  #######       ",
        "      #    #              #     #       ",
        "      +    #              #     #      T",
        "      #    #  T           +     #       ",
        "      #    #              #     #  T    ",
        " T    ######              #     #       ",
        "T             T       T   #######       ",
        "                   T                    ",
    ];

    #[test]
    fn test_far_corner_of_world() {
        let mut gen = TerrainGenerator::default();
        let rows = window(&mut gen, u32::MAX - 95, u32::MAX - 95, 95, 95);
        assert_eq!(rows.len(), 95);
        assert!(rows.iter().all(|row| row.chars().count() == 95));

        let rows = window(&mut gen, u32::MAX - 99, u32::MAX - 183, 40, 8);
        for (y, (row, expected)) in rows.iter().zip(FAR_CORNER_WINDOW.iter()).enumerate() {
            assert_eq!(row, expected, "row {} differs", y);
        }

        // Last row of the world, up to and including the corner tile
        let last: String = (u32::MAX - 39..=u32::MAX)
            .map(|x| gen.tile_at(x, u32::MAX).glyph())
            .collect();
        assert_eq!(last, "    T                                  T");
        assert_eq!(tile_at(u32::MAX, u32::MAX), Tile::Tree);
    }

    #[test]
    fn test_world_seed_changes_world() {
        let reference = window(&mut TerrainGenerator::new(0), 0, 0, 200, 100);
        assert_eq!(reference, window(&mut TerrainGenerator::default(), 0, 0, 200, 100));

        let other = window(&mut TerrainGenerator::new(0x5EED), 0, 0, 200, 100);
        assert_ne!(reference, other);
        assert_eq!(other, window(&mut TerrainGenerator::new(0x5EED), 0, 0, 200, 100));
    }
}
