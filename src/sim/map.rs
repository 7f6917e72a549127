//! Tile grid and walkability queries
//!
//! The map is a list of rows of glyphs, loaded once per session. Rows may
//! have different lengths; anything past the end of a row is out of bounds.

use std::path::Path;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::tile_of;

/// Glyphs that block movement
pub const WALL_GLYPHS: [char; 8] = ['|', '-', '╔', '╗', '╝', '╚', '═', '║'];
/// Plain room floor (the only glyph spawns are placed on)
pub const FLOOR: char = '.';
pub const HALLWAY: char = 'X';
pub const DOOR: char = '╬';

/// Immutable-during-play tile grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TileMap {
    rows: Vec<Vec<char>>,
}

impl From<Vec<String>> for TileMap {
    fn from(lines: Vec<String>) -> Self {
        Self {
            rows: lines.iter().map(|l| l.chars().collect()).collect(),
        }
    }
}

impl From<TileMap> for Vec<String> {
    fn from(map: TileMap) -> Self {
        map.rows.iter().map(|r| r.iter().collect()).collect()
    }
}

impl TileMap {
    /// Parse a map from text, one row per line
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(LoadError::EmptyMap);
        }
        let map = Self { rows };
        if map.floor_tiles().next().is_none() {
            return Err(LoadError::NoFloor);
        }
        Ok(map)
    }

    /// Load a map file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::parse(&text)?;
        log::info!(
            "Loaded map {} ({}x{})",
            path.display(),
            map.width(),
            map.height()
        );
        Ok(map)
    }

    /// Number of rows
    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    /// Length of the longest row
    pub fn width(&self) -> i32 {
        self.rows.iter().map(Vec::len).max().unwrap_or(0) as i32
    }

    /// Glyph at a tile, `None` when out of bounds
    pub fn glyph(&self, tile: IVec2) -> Option<char> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        self.rows
            .get(tile.y as usize)
            .and_then(|row| row.get(tile.x as usize))
            .copied()
    }

    /// True for in-bounds tiles whose glyph is not a wall
    pub fn is_walkable(&self, tile: IVec2) -> bool {
        self.glyph(tile).is_some_and(|c| !WALL_GLYPHS.contains(&c))
    }

    /// Walkability of the tile containing a continuous position
    pub fn is_walkable_at(&self, pos: Vec2) -> bool {
        self.is_walkable(tile_of(pos))
    }

    pub fn is_floor(&self, tile: IVec2) -> bool {
        self.glyph(tile) == Some(FLOOR)
    }

    /// Every floor tile, row-major
    pub fn floor_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| **c == FLOOR)
                .map(move |(x, _)| IVec2::new(x as i32, y as i32))
        })
    }

    /// Floor tiles inside the inclusive rectangle `min..=max`, row-major
    pub fn floor_tiles_in(&self, min: IVec2, max: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        let y0 = min.y.max(0);
        let y1 = max.y.min(self.height() - 1);
        (y0..=y1).flat_map(move |y| {
            let row = &self.rows[y as usize];
            let x0 = min.x.max(0);
            let x1 = max.x.min(row.len() as i32 - 1);
            (x0..=x1)
                .filter(move |x| row[*x as usize] == FLOOR)
                .map(move |x| IVec2::new(x, y))
        })
    }

    /// Carve a walled room centered on `center`, growing the grid as needed.
    ///
    /// Returns the tile at the middle of the room's floor. The room is shifted
    /// right/down if it would start at a negative coordinate.
    pub fn carve_room(&mut self, center: IVec2, width: i32, height: i32) -> IVec2 {
        let width = width.max(3);
        let height = height.max(3);
        let origin = IVec2::new((center.x - width / 2).max(0), (center.y - height / 2).max(0));

        let needed_rows = (origin.y + height) as usize;
        if self.rows.len() < needed_rows {
            self.rows.resize(needed_rows, Vec::new());
        }

        for dy in 0..height {
            let row = &mut self.rows[(origin.y + dy) as usize];
            let needed_cols = (origin.x + width) as usize;
            if row.len() < needed_cols {
                row.resize(needed_cols, ' ');
            }
            for dx in 0..width {
                let top = dy == 0;
                let bottom = dy == height - 1;
                let left = dx == 0;
                let right = dx == width - 1;
                let glyph = match (top, bottom, left, right) {
                    (true, _, true, _) => '╔',
                    (true, _, _, true) => '╗',
                    (_, true, true, _) => '╚',
                    (_, true, _, true) => '╝',
                    (true, _, _, _) | (_, true, _, _) => '═',
                    (_, _, true, _) | (_, _, _, true) => '║',
                    _ => FLOOR,
                };
                row[(origin.x + dx) as usize] = glyph;
            }
        }

        origin + IVec2::new(width / 2, height / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ROOM: &str = "\
╔═════╗
║..X..║
║.....╬XXX
╚═════╝";

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(TileMap::parse(""), Err(LoadError::EmptyMap)));
        assert!(matches!(TileMap::parse("\n\n"), Err(LoadError::EmptyMap)));
    }

    #[test]
    fn test_parse_rejects_floorless() {
        assert!(matches!(TileMap::parse("|--|\n|XX|"), Err(LoadError::NoFloor)));
    }

    #[test]
    fn test_walls_block_and_floor_passes() {
        let map = TileMap::parse(ROOM).unwrap();
        assert!(!map.is_walkable(IVec2::new(0, 0)));
        assert!(!map.is_walkable(IVec2::new(3, 0)));
        assert!(!map.is_walkable(IVec2::new(0, 1)));
        assert!(map.is_walkable(IVec2::new(1, 1)));
        assert!(map.is_walkable(IVec2::new(3, 1))); // hallway
        assert!(map.is_walkable(IVec2::new(6, 2))); // door
        assert!(map.is_walkable(IVec2::new(8, 2)));
    }

    #[test]
    fn test_short_rows_fail_closed() {
        let map = TileMap::parse(ROOM).unwrap();
        // Row 1 ends at column 6, row 2 runs to column 9
        assert!(!map.is_walkable(IVec2::new(8, 1)));
        assert!(map.is_walkable(IVec2::new(9, 2)));
        assert!(!map.is_walkable(IVec2::new(10, 2)));
        assert_eq!(map.width(), 10);
        assert_eq!(map.height(), 4);
    }

    #[test]
    fn test_floor_tiles_in_window() {
        let map = TileMap::parse(ROOM).unwrap();
        let all: Vec<_> = map.floor_tiles().collect();
        assert_eq!(all.len(), 9);
        let window: Vec<_> = map
            .floor_tiles_in(IVec2::new(-5, -5), IVec2::new(2, 1))
            .collect();
        assert_eq!(window, vec![IVec2::new(1, 1), IVec2::new(2, 1)]);
    }

    #[test]
    fn test_carve_room_grows_grid() {
        let mut map = TileMap::parse(".").unwrap();
        let center = map.carve_room(IVec2::new(10, 10), 7, 5);
        assert_eq!(center, IVec2::new(10, 10));
        assert!(map.is_walkable(center));
        assert_eq!(map.glyph(IVec2::new(7, 8)), Some('╔'));
        assert_eq!(map.glyph(IVec2::new(13, 12)), Some('╝'));
        assert!(!map.is_walkable(IVec2::new(7, 10)));
        assert_eq!(map.floor_tiles().count(), 1 + 5 * 3);
    }

    #[test]
    fn test_carve_room_near_origin_shifts_inward() {
        let mut map = TileMap::parse(".").unwrap();
        let center = map.carve_room(IVec2::new(0, 0), 7, 5);
        assert_eq!(center, IVec2::new(3, 2));
        assert!(map.is_floor(center));
    }

    #[test]
    fn test_serde_roundtrip_as_strings() {
        let map = TileMap::parse(ROOM).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.starts_with("[\""));
        let back: TileMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_never_walkable(x in -50i32..50, y in -50i32..50) {
            let map = TileMap::parse(ROOM).unwrap();
            let in_bounds = map.glyph(IVec2::new(x, y)).is_some();
            if !in_bounds {
                prop_assert!(!map.is_walkable(IVec2::new(x, y)));
            }
        }

        #[test]
        fn prop_walkable_iff_not_wall(row in "[.X|\\-═║╔╗╚╝╬ ]{1,12}", x in 0usize..12) {
            let map = TileMap { rows: vec![row.chars().collect()] };
            let tile = IVec2::new(x as i32, 0);
            match row.chars().nth(x) {
                Some(c) => prop_assert_eq!(map.is_walkable(tile), !WALL_GLYPHS.contains(&c)),
                None => prop_assert!(!map.is_walkable(tile)),
            }
        }
    }
}
