//! Visible window onto the world and the commands that move it.

use crate::coords::TileCoord;

/// Default window width in tiles
pub const DEFAULT_VIEW_WIDTH: u32 = 80;
/// Default window height in tiles
pub const DEFAULT_VIEW_HEIGHT: u32 = 22;

/// Eight-way movement direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// Unit step as (dx, dy); y grows southwards
    pub fn delta(&self) -> (i64, i64) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
        }
    }

    /// Roguelike key for this direction (`yubnhjkl`)
    pub fn key(&self) -> char {
        match self {
            Direction::NorthWest => 'y',
            Direction::North => 'k',
            Direction::NorthEast => 'u',
            Direction::West => 'h',
            Direction::East => 'l',
            Direction::SouthWest => 'b',
            Direction::South => 'j',
            Direction::SouthEast => 'n',
        }
    }

    pub fn all() -> &'static [Direction] {
        &[
            Direction::NorthWest,
            Direction::North,
            Direction::NorthEast,
            Direction::West,
            Direction::East,
            Direction::SouthWest,
            Direction::South,
            Direction::SouthEast,
        ]
    }
}

/// Commands understood by the explorer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Move one tile
    Step(Direction),
    /// Move one full window
    Page(Direction),
    ToggleHelp,
    TogglePanel,
    /// Cycle between tile and stage views
    ToggleView,
    ExportAscii,
    ExportPng,
    Quit,
}

impl Command {
    /// Map a typed character to a command.
    ///
    /// Lower-case direction keys step, upper-case keys page.
    pub fn from_char(ch: char) -> Option<Command> {
        if ch == 'q' {
            return Some(Command::Quit);
        }
        for dir in Direction::all() {
            if ch == dir.key() {
                return Some(Command::Step(*dir));
            }
            if ch == dir.key().to_ascii_uppercase() {
                return Some(Command::Page(*dir));
            }
        }
        match ch {
            '?' => Some(Command::ToggleHelp),
            'i' | 'I' => Some(Command::TogglePanel),
            'v' | 'V' => Some(Command::ToggleView),
            'e' | 'E' => Some(Command::ExportAscii),
            'p' | 'P' => Some(Command::ExportPng),
            _ => None,
        }
    }
}

/// Rectangular window with its top-left corner at (`x`, `y`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0, 0, DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT)
    }
}

impl Viewport {
    /// Create a window, clamping the origin so the far edge stays in range
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        let mut viewport = Self {
            x: 0,
            y: 0,
            width: width.max(1),
            height: height.max(1),
        };
        viewport.x = x.min(viewport.max_x());
        viewport.y = y.min(viewport.max_y());
        viewport
    }

    /// Copy with the origin pulled back into range.
    ///
    /// The fields are public, so a window built by hand may reach past
    /// `u32::MAX`; anything that walks the window's tiles goes through this.
    pub fn clamped(&self) -> Self {
        Self::new(self.x, self.y, self.width, self.height)
    }

    /// Largest valid origin x
    pub fn max_x(&self) -> u32 {
        u32::MAX.saturating_sub(self.width).saturating_sub(1)
    }

    /// Largest valid origin y
    pub fn max_y(&self) -> u32 {
        u32::MAX.saturating_sub(self.height).saturating_sub(1)
    }

    pub fn origin(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }

    pub fn center(&self) -> TileCoord {
        TileCoord::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Shift the origin, saturating each axis at the world bounds
    pub fn move_by(&mut self, dx: i64, dy: i64) {
        self.x = (self.x as i64 + dx).clamp(0, self.max_x() as i64) as u32;
        self.y = (self.y as i64 + dy).clamp(0, self.max_y() as i64) as u32;
    }

    pub fn step(&mut self, dir: Direction) {
        let (dx, dy) = dir.delta();
        self.move_by(dx, dy);
    }

    /// Move by a whole window in `dir`
    pub fn page(&mut self, dir: Direction) {
        let (dx, dy) = dir.delta();
        self.move_by(dx * self.width as i64, dy * self.height as i64);
    }

    /// Apply a movement command. Returns false for non-movement commands.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Step(dir) => self.step(dir),
            Command::Page(dir) => self.page(dir),
            _ => return false,
        }
        true
    }

    /// Change the window size, keeping the origin valid
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(self.x, self.y, width, height);
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= self.x
            && coord.y >= self.y
            && coord.x - self.x < self.width
            && coord.y - self.y < self.height
    }

    /// Every coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> {
        let view = self.clamped();
        (view.y..view.y + view.height)
            .flat_map(move |y| (view.x..view.x + view.width).map(move |x| TileCoord::new(x, y)))
    }
}
