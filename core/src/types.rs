use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::GameError;

/// Single grid axis index, relative to the board origin.
pub type CellIndex = i32;

/// Serial number of a coin, unique within the cache it was minted in.
pub type Serial = u32;

/// Grid square identified by `(i, j)`, `i` along latitude and `j` along longitude.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub i: CellIndex,
    pub j: CellIndex,
}

impl Cell {
    pub const fn new(i: CellIndex, j: CellIndex) -> Self {
        Self { i, j }
    }

    /// String form used as the memento key and as the luck key, `"i,j"`.
    pub fn key(self) -> String {
        self.to_string()
    }

    pub const fn step(self, direction: Direction) -> Self {
        let (di, dj) = direction.delta();
        Self {
            i: self.i.saturating_add(di),
            j: self.j.saturating_add(dj),
        }
    }

    /// Chebyshev distance, the metric neighborhoods are measured in.
    pub const fn distance(self, other: Cell) -> u32 {
        let di = self.i.abs_diff(other.i);
        let dj = self.j.abs_diff(other.j);
        if di > dj { di } else { dj }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

impl FromStr for Cell {
    type Err = GameError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidCellKey(key.to_string());
        let (i, j) = key.split_once(',').ok_or_else(invalid)?;
        let i = i.trim().parse().map_err(|_| invalid())?;
        let j = j.trim().parse().map_err(|_| invalid())?;
        Ok(Self { i, j })
    }
}

/// A collectible coin. Its identity is the cell it was minted in plus its serial.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub cell: Cell,
    pub serial_number: Serial,
}

impl Coin {
    pub const fn new(cell: Cell, serial_number: Serial) -> Self {
        Self {
            cell,
            serial_number,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.cell, self.serial_number)
    }
}

/// Geographic point in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned rectangle between two corners.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..self.north_east.lng).contains(&point.lng)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit step in `(i, j)`; up is north, right is east.
    pub const fn delta(self) -> (CellIndex, CellIndex) {
        use Direction::*;
        match self {
            Up => (1, 0),
            Down => (-1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub const fn label(self) -> &'static str {
        use Direction::*;
        match self {
            Up => "⬆️",
            Down => "⬇️",
            Left => "⬅️",
            Right => "➡️",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_round_trips_negative_indices() {
        let cell = Cell::new(2, -1);

        assert_eq!(cell.key(), "2,-1");
        assert_eq!("2,-1".parse::<Cell>().unwrap(), cell);
        assert_eq!(" -7 , 13 ".parse::<Cell>().unwrap(), Cell::new(-7, 13));
    }

    #[test]
    fn cell_key_rejects_garbage() {
        assert_eq!(
            "2-1".parse::<Cell>(),
            Err(GameError::InvalidCellKey("2-1".to_string()))
        );
        assert!("a,b".parse::<Cell>().is_err());
        assert!("".parse::<Cell>().is_err());
    }

    #[test]
    fn step_moves_one_cell_along_one_axis() {
        let origin = Cell::default();

        assert_eq!(origin.step(Direction::Up), Cell::new(1, 0));
        assert_eq!(origin.step(Direction::Down), Cell::new(-1, 0));
        assert_eq!(origin.step(Direction::Left), Cell::new(0, -1));
        assert_eq!(origin.step(Direction::Right), Cell::new(0, 1));
    }

    #[test]
    fn coin_serializes_with_camel_case_fields() {
        let coin = Coin::new(Cell::new(2, -1), 3);
        let json = serde_json::to_string(&coin).unwrap();

        assert_eq!(json, r#"{"cell":{"i":2,"j":-1},"serialNumber":3}"#);
    }
}
