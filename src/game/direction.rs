use enum_map::Enum;
use ratatui::layout::{Position, Size};

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// The unit vector `(dx, dy)` for a single step in this direction.  `y`
    /// grows downwards.
    pub(super) fn delta(self) -> (i16, i16) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Move `pos` one cell in this direction.  Returns `None` if the result
    /// would fall outside a field of the given size.
    pub(super) fn advance(self, pos: Position, size: Size) -> Option<Position> {
        let (dx, dy) = self.delta();
        let x = pos.x.checked_add_signed(dx).filter(|&x| x < size.width)?;
        let y = pos.y.checked_add_signed(dy).filter(|&y| y < size.height)?;
        Some(Position { x, y })
    }

    pub(super) fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub(super) fn is_opposite(self, other: Direction) -> bool {
        self.reverse() == other
    }
}
