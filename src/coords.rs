//! Coordinate system and seed mixing for the tile world.
//!
//! The world is addressed by absolute `u32` tile coordinates. Each generation
//! stage looks at the world through a coarser grid and turns the grid cell
//! into a 64-bit reseed key: `(cell_y << 32) | cell_x`.

/// Absolute position of a tile in the world
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Position of this tile inside its cell at `scale`
    pub fn local(&self, scale: GridScale) -> (u32, u32) {
        let size = scale.size();
        (self.x % size, self.y % size)
    }

    /// Index of the cell at `scale` containing this tile
    pub fn cell(&self, scale: GridScale) -> (u64, u64) {
        let size = scale.size() as u64;
        (self.x as u64 / size, self.y as u64 / size)
    }
}

impl From<(u32, u32)> for TileCoord {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

/// Spatial granularities used by the generator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridScale {
    /// 50x50 biome cells deciding terrain vs settlement
    Macro,
    /// 10x10 plots that may hold one house
    Plot,
    /// 5x5 groves used for vegetation density
    Grove,
    /// Single tile
    Tile,
}

impl GridScale {
    pub fn size(&self) -> u32 {
        match self {
            GridScale::Macro => 50,
            GridScale::Plot => 10,
            GridScale::Grove => 5,
            GridScale::Tile => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GridScale::Macro => "Macro",
            GridScale::Plot => "Plot",
            GridScale::Grove => "Grove",
            GridScale::Tile => "Tile",
        }
    }

    /// Reseed key of the cell containing `coord`
    pub fn key(&self, coord: TileCoord) -> u64 {
        let (cx, cy) = coord.cell(*self);
        cell_key(cx, cy)
    }

    /// Reseed key of the cell offset by (`dx`, `dy`) cells from the one
    /// containing `coord`.
    ///
    /// Offsets wrap in unsigned 64-bit arithmetic; a -1 step from cell 0
    /// yields `u64::MAX` and the OR then fills the whole key.
    pub fn neighbor_key(&self, coord: TileCoord, dx: i64, dy: i64) -> u64 {
        let (cx, cy) = coord.cell(*self);
        cell_key(cx.wrapping_add_signed(dx), cy.wrapping_add_signed(dy))
    }
}

/// Mix two cell indices into one reseed key
pub fn cell_key(cell_x: u64, cell_y: u64) -> u64 {
    (cell_y << 32) | cell_x
}

/// Salt a key with the world seed. World seed 0 leaves keys untouched.
pub fn salted(key: u64, world_seed: u64) -> u64 {
    key ^ world_seed
}
