use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// Snake state.  Snate.
///
/// A snake always has a head, so it always occupies at least one cell, and it
/// never occupies any cell more than once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Snake {
    /// The position of the snake's head
    head: Position,

    /// The positions of the cells in the snake's body, starting with the cell
    /// right behind the head and ending with the tip of the tail
    body: VecDeque<Position>,
}

impl Snake {
    /// Create the snake that every game starts with:
    /// [`INITIAL_SNAKE`][consts::INITIAL_SNAKE].
    pub(super) fn initial() -> Snake {
        let [head, body @ ..] = consts::INITIAL_SNAKE;
        Snake {
            head,
            body: VecDeque::from_iter(body),
        }
    }

    /// Create a snake from a head-first sequence of cells.  Returns `None` if
    /// `cells` is empty.
    #[cfg(test)]
    pub(super) fn from_cells<I: IntoIterator<Item = Position>>(cells: I) -> Option<Snake> {
        let mut cells = cells.into_iter();
        let head = cells.next()?;
        Some(Snake {
            head,
            body: VecDeque::from_iter(cells),
        })
    }

    /// Return the position of the snake's head
    pub(super) fn head(&self) -> Position {
        self.head
    }

    /// Return the position of the end of the snake's tail.  For a snake with
    /// no body, this is the head.
    pub(super) fn tail(&self) -> Position {
        self.body.back().copied().unwrap_or(self.head)
    }

    /// Return the positions of the cells in the snake's body, nearest the
    /// head first
    pub(super) fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    /// Iterate over all of the cells occupied by the snake, head first
    pub(super) fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.head).chain(self.body.iter().copied())
    }

    pub(super) fn len(&self) -> usize {
        self.body.len() + 1
    }

    pub(super) fn contains(&self, pos: Position) -> bool {
        self.head == pos || self.body.contains(&pos)
    }

    /// Make `pos` the snake's new head
    pub(super) fn push_head(&mut self, pos: Position) {
        self.body.push_front(self.head);
        self.head = pos;
    }

    /// Remove the last cell of the tail.  A snake without a body is left as it
    /// is.
    pub(super) fn pop_tail(&mut self) {
        let _ = self.body.pop_back();
    }
}
