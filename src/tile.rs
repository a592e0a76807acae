//! Tile alphabet for the generated world.

/// One generated tile.
///
/// `Claim` only exists while a plot neighborhood is being sampled; the
/// generator never returns it for a world coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tile {
    #[default]
    Ground,
    Tree,
    Claim,
    Wall,
    Door,
}

impl Tile {
    /// Tiles that can appear in a rendered map
    pub fn rendered() -> &'static [Tile] {
        &[Tile::Ground, Tile::Tree, Tile::Wall, Tile::Door]
    }

    /// Character used for display
    pub fn glyph(&self) -> char {
        match self {
            Tile::Ground => ' ',
            Tile::Tree => 'T',
            Tile::Claim => 'c',
            Tile::Wall => '#',
            Tile::Door => '+',
        }
    }

    pub fn from_glyph(ch: char) -> Option<Tile> {
        match ch {
            ' ' => Some(Tile::Ground),
            'T' => Some(Tile::Tree),
            'c' => Some(Tile::Claim),
            '#' => Some(Tile::Wall),
            '+' => Some(Tile::Door),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tile::Ground => "Ground",
            Tile::Tree => "Tree",
            Tile::Claim => "Claim",
            Tile::Wall => "Wall",
            Tile::Door => "Door",
        }
    }

    /// RGB colour for coloured output and image export
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Tile::Ground => (96, 128, 64),
            Tile::Tree => (34, 139, 34),
            Tile::Claim => (200, 200, 80),
            Tile::Wall => (150, 150, 150),
            Tile::Door => (160, 100, 40),
        }
    }

    /// Part of a house outline
    pub fn is_structure(&self) -> bool {
        matches!(self, Tile::Wall | Tile::Door)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_are_distinct() {
        let all = [Tile::Ground, Tile::Tree, Tile::Claim, Tile::Wall, Tile::Door];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.glyph(), b.glyph());
            }
            assert_eq!(Tile::from_glyph(a.glyph()), Some(*a));
        }
        assert_eq!(Tile::from_glyph('x'), None);
    }

    #[test]
    fn test_claim_is_never_rendered() {
        assert!(!Tile::rendered().contains(&Tile::Claim));
    }

    #[test]
    fn test_structure_tiles() {
        assert!(Tile::Wall.is_structure());
        assert!(Tile::Door.is_structure());
        assert!(!Tile::Tree.is_structure());
    }
}
