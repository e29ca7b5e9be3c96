use super::direction::Direction;
use super::snake::Snake;
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::{Position, Rect, Size};

/// The authoritative state of a game of snake: the snake, the food, the
/// direction of travel, the score, and whether the game has ended.
///
/// The state only changes in response to [`GameState::request_direction()`],
/// [`GameState::tick()`], and [`GameState::reset()`]; timing and input are the
/// caller's responsibility.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct GameState<R> {
    rng: R,
    size: Size,
    snake: Snake,
    /// `None` only once the snake has filled the whole field
    food: Option<Position>,
    /// The direction the snake moved in on the most recent tick
    direction: Direction,
    /// The direction the snake will move in on the next tick
    pending: Direction,
    score: u32,
    status: Status,
}

impl<R: Rng> GameState<R> {
    pub(super) fn new(rng: R) -> GameState<R> {
        let mut state = GameState {
            rng,
            size: consts::LEVEL_SIZE,
            snake: Snake::initial(),
            food: None,
            direction: Direction::East,
            pending: Direction::East,
            score: 0,
            status: Status::Running,
        };
        state.place_food();
        state
    }

    /// Put everything except the RNG back the way it was at the start of the
    /// game
    pub(super) fn reset(&mut self) {
        self.snake = Snake::initial();
        self.direction = Direction::East;
        self.pending = Direction::East;
        self.score = 0;
        self.status = Status::Running;
        self.place_food();
        tracing::info!(food = ?self.food, "Game reset");
    }

    /// Advance the game by one step.  Does nothing once the game is over.
    pub(super) fn tick(&mut self) -> Step {
        if self.is_over() {
            return Step::Idle;
        }
        self.direction = self.pending;
        let Some(head) = self.direction.advance(self.snake.head(), self.size) else {
            return self.end(Ending::Wall);
        };
        // The tail has not moved yet, so running into it is fatal.
        if self.snake.contains(head) {
            return self.end(Ending::Body);
        }
        self.snake.push_head(head);
        if self.food == Some(head) {
            self.score += 1;
            tracing::debug!(score = self.score, length = self.snake.len(), "Ate food");
            self.place_food();
            if self.food.is_none() {
                return self.end(Ending::BoardFilled);
            }
            Step::Ate
        } else {
            let tail = self.snake.tail();
            self.snake.pop_tail();
            tracing::trace!(?head, ?tail, "Snake moved");
            Step::Moved
        }
    }

    fn place_food(&mut self) {
        let snake = &self.snake;
        self.food = Rect::from((Position::ORIGIN, self.size))
            .positions()
            .filter(|&p| !snake.contains(p))
            .choose(&mut self.rng);
    }
}

impl<R> GameState<R> {
    /// Change the direction the snake will move in on the next tick.  Later
    /// requests before that tick replace earlier ones.  A request to reverse
    /// straight back into the snake's neck (the opposite of the direction of
    /// the last move) is ignored, in which case `false` is returned.
    pub(super) fn request_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) {
            tracing::trace!(moving = ?self.direction, requested = ?direction, "Ignoring reversal");
            false
        } else {
            self.pending = direction;
            true
        }
    }

    pub(super) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(super) fn head(&self) -> Position {
        self.snake.head()
    }

    pub(super) fn food(&self) -> Option<Position> {
        self.food
    }

    /// Return the direction the snake moved in on the most recent tick (or,
    /// before the first tick, the direction it starts out facing)
    pub(super) fn direction(&self) -> Direction {
        self.direction
    }

    pub(super) fn score(&self) -> u32 {
        self.score
    }

    pub(super) fn size(&self) -> Size {
        self.size
    }

    pub(super) fn status(&self) -> Status {
        self.status
    }

    pub(super) fn is_over(&self) -> bool {
        self.status != Status::Running
    }

    fn end(&mut self, ending: Ending) -> Step {
        self.status = Status::Over(ending);
        tracing::info!(?ending, score = self.score, "Game over");
        Step::Ended(ending)
    }
}

#[cfg(test)]
impl<R> GameState<R> {
    pub(super) fn set_snake(&mut self, cells: &[(u16, u16)]) {
        self.snake = Snake::from_cells(cells.iter().map(|&(x, y)| Position::new(x, y)))
            .expect("snake should not be empty");
    }

    /// Point the snake in `direction`, bypassing the check for reversals
    pub(super) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.pending = direction;
    }

    pub(super) fn set_food(&mut self, food: Position) {
        self.food = Some(food);
    }

    pub(super) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Status {
    Running,
    Over(Ending),
}

/// How a game came to an end
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Ending {
    /// The snake ran into the edge of the field
    Wall,
    /// The snake ran into itself
    Body,
    /// The snake has filled the field and there is nowhere left to put food
    BoardFilled,
}

/// What happened during a call to [`GameState::tick()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Step {
    /// The game was already over
    Idle,
    Moved,
    /// The snake ate the food and grew, and there was room for more food
    Ate,
    /// The game ended on this tick.  For [`Ending::BoardFilled`], the snake
    /// ate the last food and grew first.
    Ended(Ending),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::EnumExt;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;
    use std::collections::HashSet;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn new_state() -> GameState<ChaCha12Rng> {
        GameState::new(ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    fn positions(cells: &[(u16, u16)]) -> Vec<Position> {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    fn assert_food_unoccupied<R>(state: &GameState<R>) {
        let food = state.food().unwrap();
        assert!(
            !state.snake().contains(food),
            "food {food:?} placed on the snake"
        );
        assert!(
            food.x < consts::GRID_SIZE && food.y < consts::GRID_SIZE,
            "food {food:?} placed outside the field"
        );
    }

    #[test]
    fn initial_state() {
        let state = new_state();
        assert_eq!(
            Vec::from_iter(state.snake().cells()),
            positions(&[(5, 5), (4, 5), (3, 5)])
        );
        assert_eq!(state.direction(), Direction::East);
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), Status::Running);
        assert!(!state.is_over(), "new game should not be over");
        assert_eq!(state.size(), Size::new(20, 20));
        assert_food_unoccupied(&state);
    }

    #[rstest]
    #[case(Direction::North, true)]
    #[case(Direction::South, true)]
    #[case(Direction::East, true)]
    #[case(Direction::West, false)]
    fn request_direction_from_east(#[case] requested: Direction, #[case] accepted: bool) {
        let mut state = new_state();
        state.food = Some(Position::new(0, 0));
        assert_eq!(state.request_direction(requested), accepted);
        // Nothing changes until the next tick
        assert_eq!(state.direction(), Direction::East);
        assert_eq!(state.head(), Position::new(5, 5));
        assert_eq!(state.tick(), Step::Moved);
        let expected = if accepted {
            requested
        } else {
            Direction::East
        };
        assert_eq!(state.direction(), expected);
    }

    #[test]
    fn north_then_west_within_one_tick() {
        let mut state = new_state();
        state.food = Some(Position::new(0, 0));
        assert!(state.request_direction(Direction::North), "North should be accepted");
        assert!(
            !state.request_direction(Direction::West),
            "West is a reversal of the last move"
        );
        assert_eq!(state.tick(), Step::Moved);
        assert_eq!(state.head(), Position::new(5, 4));
        assert_eq!(state.direction(), Direction::North);
    }

    #[test]
    fn last_request_before_tick_wins() {
        let mut state = new_state();
        state.food = Some(Position::new(0, 0));
        assert!(state.request_direction(Direction::North), "North should be accepted");
        assert!(state.request_direction(Direction::South), "South should be accepted");
        assert_eq!(state.tick(), Step::Moved);
        assert_eq!(state.head(), Position::new(5, 6));
    }

    #[rstest]
    #[case(Direction::North)]
    #[case(Direction::South)]
    #[case(Direction::East)]
    fn turn_then_tick(#[case] d: Direction) {
        let mut state = new_state();
        state.food = Some(Position::new(0, 0));
        let old_head = state.head();
        assert!(state.request_direction(d), "{d:?} should be accepted");
        assert_eq!(state.tick(), Step::Moved);
        let (dx, dy) = d.delta();
        assert_eq!(
            state.head(),
            Position::new(
                old_head.x.saturating_add_signed(dx),
                old_head.y.saturating_add_signed(dy)
            )
        );
    }

    #[test]
    fn tick_translates_snake() {
        let mut state = new_state();
        state.food = Some(Position::new(0, 0));
        assert_eq!(state.tick(), Step::Moved);
        assert_eq!(
            Vec::from_iter(state.snake().cells()),
            positions(&[(6, 5), (5, 5), (4, 5)])
        );
        assert_eq!(state.score(), 0);
        assert_eq!(state.food(), Some(Position::new(0, 0)));
    }

    #[test]
    fn tick_onto_food() {
        let mut state = new_state();
        state.food = Some(Position::new(6, 5));
        assert_eq!(state.tick(), Step::Ate);
        assert_eq!(state.score(), 1);
        assert_eq!(
            Vec::from_iter(state.snake().cells()),
            positions(&[(6, 5), (5, 5), (4, 5), (3, 5)])
        );
        assert_food_unoccupied(&state);
        assert!(!state.is_over(), "eating should not end the game");
    }

    #[rstest]
    #[case(&[(19, 5), (18, 5), (17, 5)], Direction::East)]
    #[case(&[(0, 5), (1, 5), (2, 5)], Direction::West)]
    #[case(&[(7, 0), (7, 1), (7, 2)], Direction::North)]
    #[case(&[(7, 19), (7, 18), (7, 17)], Direction::South)]
    fn wall_collision(#[case] cells: &[(u16, u16)], #[case] d: Direction) {
        let mut state = new_state();
        state.set_snake(cells);
        state.set_direction(d);
        state.food = Some(Position::new(10, 10));
        assert_eq!(state.tick(), Step::Ended(Ending::Wall));
        assert!(state.is_over(), "hitting a wall should end the game");
        assert_eq!(Vec::from_iter(state.snake().cells()), positions(cells));
        assert_eq!(state.food(), Some(Position::new(10, 10)));
    }

    #[test]
    fn body_collision() {
        let mut state = new_state();
        state.set_snake(&[(4, 5), (5, 5), (5, 6), (4, 6), (3, 6)]);
        state.set_direction(Direction::South);
        state.food = Some(Position::new(10, 10));
        assert_eq!(state.tick(), Step::Ended(Ending::Body));
        assert_eq!(state.status(), Status::Over(Ending::Body));
        assert_eq!(state.snake().len(), 5);
    }

    #[test]
    fn moving_into_vacating_tail_is_fatal() {
        let mut state = new_state();
        state.set_snake(&[(4, 5), (5, 5), (5, 6), (4, 6)]);
        state.set_direction(Direction::South);
        state.food = Some(Position::new(10, 10));
        assert_eq!(state.tick(), Step::Ended(Ending::Body));
    }

    #[test]
    fn game_over_is_terminal() {
        let mut state = new_state();
        state.set_snake(&[(19, 5), (18, 5), (17, 5)]);
        assert_eq!(state.tick(), Step::Ended(Ending::Wall));
        let snake = state.snake().clone();
        let food = state.food();
        assert!(state.request_direction(Direction::North), "turn should be accepted");
        for _ in 0..5 {
            assert_eq!(state.tick(), Step::Idle);
        }
        assert_eq!(state.snake(), &snake);
        assert_eq!(state.food(), food);
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), Status::Over(Ending::Wall));
    }

    #[test]
    fn reset_after_game_over() {
        let mut state = new_state();
        state.food = Some(Position::new(6, 5));
        assert_eq!(state.tick(), Step::Ate);
        assert!(state.request_direction(Direction::North), "turn should be accepted");
        while !state.is_over() {
            let _ = state.tick();
        }
        assert_eq!(state.status(), Status::Over(Ending::Wall));
        state.reset();
        assert_eq!(
            Vec::from_iter(state.snake().cells()),
            positions(&[(5, 5), (4, 5), (3, 5)])
        );
        assert_eq!(state.direction(), Direction::East);
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), Status::Running);
        assert_food_unoccupied(&state);
    }

    #[rstest]
    #[case(Position::new(0, 0))]
    #[case(Position::new(7, 13))]
    #[case(Position::new(19, 19))]
    fn food_takes_last_free_cell(#[case] free: Position) {
        let mut state = new_state();
        let cells = Rect::new(0, 0, consts::GRID_SIZE, consts::GRID_SIZE)
            .positions()
            .filter(|&p| p != free);
        state.snake = Snake::from_cells(cells).unwrap();
        state.place_food();
        assert_eq!(state.food(), Some(free));
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        // Walk back and forth across the rows, leaving the final cell for the
        // food.
        let mut path = Vec::new();
        for y in 0..consts::GRID_SIZE {
            if y % 2 == 0 {
                path.extend((0..consts::GRID_SIZE).map(|x| Position::new(x, y)));
            } else {
                path.extend((0..consts::GRID_SIZE).rev().map(|x| Position::new(x, y)));
            }
        }
        let food = path.pop().unwrap();
        assert_eq!(food, Position::new(0, 19));
        let mut state = new_state();
        state.snake = Snake::from_cells(path.into_iter().rev()).unwrap();
        state.set_direction(Direction::West);
        state.food = Some(food);
        assert_eq!(state.tick(), Step::Ended(Ending::BoardFilled));
        assert_eq!(state.food(), None);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 400);
        assert_eq!(state.status(), Status::Over(Ending::BoardFilled));
        assert_eq!(state.tick(), Step::Idle);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn random_play_keeps_invariants(#[case] seed: u64) {
        let mut state = GameState::new(ChaCha12Rng::seed_from_u64(seed));
        let mut chooser = ChaCha12Rng::seed_from_u64(!seed);
        for _ in 0..500 {
            let before = state.direction();
            for _ in 0..chooser.random_range(0..3) {
                if let Some(d) = Direction::iter().choose(&mut chooser) {
                    assert_eq!(state.request_direction(d), !d.is_opposite(before));
                }
            }
            let len = state.snake().len();
            let step = state.tick();
            assert!(
                !state.direction().is_opposite(before),
                "snake reversed from {before:?}"
            );
            match step {
                Step::Moved => assert_eq!(state.snake().len(), len),
                Step::Ate | Step::Ended(Ending::BoardFilled) => {
                    assert_eq!(state.snake().len(), len + 1);
                }
                Step::Ended(_) => assert_eq!(state.snake().len(), len),
                Step::Idle => panic!("tick() was Idle while the game was running"),
            }
            if state.is_over() {
                state.reset();
            }
            let distinct = state.snake().cells().collect::<HashSet<_>>();
            assert_eq!(distinct.len(), state.snake().len(), "snake overlaps itself");
            assert_food_unoccupied(&state);
        }
    }
}
