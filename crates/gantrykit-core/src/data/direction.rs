//! Compass jog directions
//!
//! The jog pad is a 3x3 grid with an empty center; each of the eight outer
//! buttons maps to a fixed `(dx, dy)` pair in `{-1, 0, 1}²`.

use crate::error::UnknownDirection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight jog directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// X- Y+
    UpLeft,
    /// Y+
    Up,
    /// X+ Y+
    UpRight,
    /// X-
    Left,
    /// X+
    Right,
    /// X- Y-
    DownLeft,
    /// Y-
    Down,
    /// X+ Y-
    DownRight,
}

impl Direction {
    /// All directions in jog pad order (row by row, top to bottom)
    pub const ALL: [Direction; 8] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// Axis deltas `(dx, dy)` for this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::UpLeft => (-1, 1),
            Direction::Up => (0, 1),
            Direction::UpRight => (1, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::DownLeft => (-1, -1),
            Direction::Down => (0, -1),
            Direction::DownRight => (1, -1),
        }
    }

    /// Stable identifier used by the UI layer
    pub fn id(&self) -> &'static str {
        match self {
            Direction::UpLeft => "upleft",
            Direction::Up => "up",
            Direction::UpRight => "upright",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::DownLeft => "downleft",
            Direction::Down => "down",
            Direction::DownRight => "downright",
        }
    }

    /// Button label in axis notation
    pub fn label(&self) -> &'static str {
        match self {
            Direction::UpLeft => "X- Y+",
            Direction::Up => "Y+",
            Direction::UpRight => "X+ Y+",
            Direction::Left => "X-",
            Direction::Right => "X+",
            Direction::DownLeft => "X- Y-",
            Direction::Down => "Y-",
            Direction::DownRight => "X+ Y-",
        }
    }

    /// WASD keyboard mapping
    pub fn from_key(key: char) -> Option<Direction> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|direction| direction.id() == wanted)
            .ok_or(UnknownDirection { id: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deltas_cover_every_nonzero_pair() {
        let deltas: HashSet<(i32, i32)> = Direction::ALL.iter().map(|d| d.delta()).collect();
        assert_eq!(deltas.len(), 8);
        assert!(!deltas.contains(&(0, 0)));
        for (dx, dy) in deltas {
            assert!((-1..=1).contains(&dx));
            assert!((-1..=1).contains(&dy));
        }
    }

    #[test]
    fn test_id_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(direction.id().parse::<Direction>(), Ok(direction));
        }
        assert_eq!(" UpRight ".parse::<Direction>(), Ok(Direction::UpRight));
    }

    #[test]
    fn test_unknown_id() {
        let err = "center".parse::<Direction>().unwrap_err();
        assert_eq!(err.id, "center");
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(Direction::from_key('w'), Some(Direction::Up));
        assert_eq!(Direction::from_key('A'), Some(Direction::Left));
        assert_eq!(Direction::from_key('s'), Some(Direction::Down));
        assert_eq!(Direction::from_key('d'), Some(Direction::Right));
        assert_eq!(Direction::from_key('q'), None);
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&Direction::DownLeft).unwrap();
        assert_eq!(json, "\"downleft\"");
    }
}
