mod direction;
mod paused;
mod snake;
mod state;
use self::direction::Direction;
use self::paused::{PauseOpt, Paused};
use self::state::{Ending, GameState, Status};
use crate::app::Screen;
use crate::command::Command;
use crate::config::{Config, Styles};
use crate::consts;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::time::{Duration, Instant};

/// The game screen: a single [`GameState`] driven on a fixed cadence, plus
/// the pause menu and everything needed to draw them
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    state: GameState<R>,
    mode: Mode,
    styles: Styles,
    tick_period: Duration,
    next_tick: Option<Instant>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(config: &Config) -> Self {
        Game::new_with_rng(config, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(config: &Config, rng: R) -> Game<R> {
        Game {
            state: GameState::new(rng),
            mode: Mode::Playing,
            styles: config.styles,
            tick_period: config.game.tick_period,
            next_tick: None,
        }
    }

    /// Wait for either the next input event or the next tick, whichever comes
    /// first, and handle it.  Once the game is over or paused, this blocks
    /// until input arrives.
    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if self.running() {
            let wait = self.time_to_tick(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.advance();
                self.next_tick = None;
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    /// Return how long is left until the next tick as of `now`.  If no tick
    /// is scheduled, one is scheduled a full tick period after `now`.
    fn time_to_tick(&mut self, now: Instant) -> Duration {
        let when = *self.next_tick.get_or_insert(now + self.tick_period);
        when.saturating_duration_since(now)
    }

    fn advance(&mut self) {
        let step = self.state.tick();
        tracing::trace!(?step, score = self.state.score(), "Tick");
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if event == Event::FocusLost {
            if self.running() {
                self.pause();
            }
            return None;
        }
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        match self.mode {
            Mode::Paused(ref mut paused) => match paused.handle_command(cmd)? {
                PauseOpt::Resume => self.mode = Mode::Playing,
                PauseOpt::Restart => self.restart(),
                PauseOpt::Quit => return Some(Screen::Quit),
            },
            Mode::Playing if self.state.is_over() => match cmd {
                Command::R => self.restart(),
                Command::Q | Command::Quit => return Some(Screen::Quit),
                _ => (),
            },
            Mode::Playing => match cmd {
                Command::Quit => return Some(Screen::Quit),
                Command::Up => self.turn(Direction::North),
                Command::Left => self.turn(Direction::West),
                Command::Down => self.turn(Direction::South),
                Command::Right => self.turn(Direction::East),
                Command::Esc | Command::P => self.pause(),
                _ => (),
            },
        }
        None
    }

    fn restart(&mut self) {
        self.state.reset();
        self.mode = Mode::Playing;
        self.next_tick = None;
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    fn running(&self) -> bool {
        self.mode == Mode::Playing && !self.state.is_over()
    }

    fn turn(&mut self, direction: Direction) {
        let _ = self.state.request_direction(direction);
    }

    fn pause(&mut self) {
        tracing::debug!("Pausing game");
        self.mode = Mode::Paused(Paused::new(self.styles));
        // The player gets a full tick period to react after resuming
        self.next_tick = None;
    }

    fn head_symbol(&self) -> char {
        match self.state.direction() {
            Direction::North => consts::SNAKE_HEAD_NORTH_SYMBOL,
            Direction::South => consts::SNAKE_HEAD_SOUTH_SYMBOL,
            Direction::East => consts::SNAKE_HEAD_EAST_SYMBOL,
            Direction::West => consts::SNAKE_HEAD_WEST_SYMBOL,
        }
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, board_area, msg_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(" Score: {}", self.state.score()),
            self.styles.score_bar,
        )
        .render(score_area, buf);

        let size = self.state.size();
        let block_size = Size {
            width: size.width.saturating_add(2),
            height: size.height.saturating_add(2),
        };
        let block_area = center_rect(board_area, block_size);
        Block::bordered().render(block_area, buf);

        let mut level = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for &p in self.state.snake().body() {
            level.draw_cell(p, consts::SNAKE_BODY_SYMBOL, self.styles.snake);
        }
        if let Some(pos) = self.state.food() {
            level.draw_cell(pos, consts::FOOD_SYMBOL, self.styles.food);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        match self.state.status() {
            Status::Over(Ending::Wall | Ending::Body) => level.draw_cell(
                self.state.head(),
                consts::COLLISION_SYMBOL,
                self.styles.collision,
            ),
            _ => level.draw_cell(self.state.head(), self.head_symbol(), self.styles.snake),
        }

        match (self.state.status(), self.mode) {
            (Status::Over(ending), _) => {
                let reason = match ending {
                    Ending::Wall => "You hit the wall!",
                    Ending::Body => "You ran into yourself!",
                    Ending::BoardFilled => "You filled the board!",
                };
                Line::from_iter([
                    Span::raw(" GAME OVER — "),
                    Span::raw(reason),
                    Span::raw(" — Restart ("),
                    Span::styled("r", self.styles.key),
                    Span::raw(") — Quit ("),
                    Span::styled("q", self.styles.key),
                    Span::raw(")"),
                ])
                .render(msg_area, buf);
            }
            (Status::Running, Mode::Paused(paused)) => {
                let pause_area = center_rect(
                    display,
                    Size {
                        width: Paused::WIDTH,
                        height: Paused::HEIGHT,
                    },
                );
                paused.render(pause_area, buf);
            }
            (Status::Running, Mode::Playing) => (),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        let Some(x) = self.area.x.checked_add(pos.x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(style);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    Playing,
    Paused(Paused),
}
