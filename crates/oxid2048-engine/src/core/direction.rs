use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{InvalidActionError, ParseDirectionError};

/// Axis along which a line is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Lines are rows (Left/Right moves).
    Row,
    /// Lines are columns (Up/Down moves).
    Column,
}

/// Direction of travel for a move.
///
/// The discriminants follow the positional action order used by agents:
/// `0 = Up`, `1 = Right`, `2 = Down`, `3 = Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// Number of directions (the size of the action space).
    pub const LEN: usize = 4;

    /// All directions in action-index order.
    pub const ALL: [Self; Self::LEN] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the action index of this direction.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the direction for an action index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`. Use [`TryFrom<usize>`] for checked conversion.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }

    /// Returns the axis the line walk follows for this direction.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Row,
            Self::Up | Self::Down => Axis::Column,
        }
    }

    /// Returns `true` if the edge nearest the travel direction is the far end
    /// of the line (column 3 for Right, row 3 for Down).
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }

    /// Returns the direction obtained by rotating this one 90° clockwise.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<usize> for Direction {
    type Error = InvalidActionError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InvalidActionError::new(index))
    }
}

impl From<Direction> for usize {
    fn from(direction: Direction) -> Self {
        direction.index()
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" | "north" | "n" => Ok(Self::Up),
            "right" | "r" | "east" | "e" => Ok(Self::Right),
            "down" | "d" | "south" | "s" => Ok(Self::Down),
            "left" | "l" | "west" | "w" => Ok(Self::Left),
            _ => Err(ParseDirectionError::new(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_order() {
        assert_eq!(Direction::from_index(0), Direction::Up);
        assert_eq!(Direction::from_index(1), Direction::Right);
        assert_eq!(Direction::from_index(2), Direction::Down);
        assert_eq!(Direction::from_index(3), Direction::Left);
        for (i, direction) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(direction.index(), i);
        }
    }

    #[test]
    fn test_try_from_out_of_range() {
        assert_eq!(Direction::try_from(2), Ok(Direction::Down));
        let err = Direction::try_from(4).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_axis_and_reversal() {
        assert_eq!(Direction::Left.axis(), Axis::Row);
        assert_eq!(Direction::Right.axis(), Axis::Row);
        assert_eq!(Direction::Up.axis(), Axis::Column);
        assert_eq!(Direction::Down.axis(), Axis::Column);
        assert!(!Direction::Left.is_reversed());
        assert!(Direction::Right.is_reversed());
        assert!(!Direction::Up.is_reversed());
        assert!(Direction::Down.is_reversed());
    }

    #[test]
    fn test_rotation_cycles() {
        for direction in Direction::ALL {
            let mut d = direction;
            for _ in 0..4 {
                d = d.rotated_clockwise();
            }
            assert_eq!(d, direction);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Up".parse(), Ok(Direction::Up));
        assert_eq!("l".parse(), Ok(Direction::Left));
        assert_eq!("east".parse(), Ok(Direction::Right));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Direction::Down).unwrap();
        assert_eq!(json, "\"down\"");
        let parsed: Direction = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(parsed, Direction::Left);
    }
}
