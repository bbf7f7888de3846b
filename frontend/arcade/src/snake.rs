use std::collections::VecDeque;

pub const BOARD_SIZE: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate,
    Died,
}

/// Classic snake on a fixed 20x20 board. The tick cadence is owned by
/// the caller; the RNG is injected so food placement is testable.
pub struct SnakeGame {
    snake: VecDeque<Point>,
    direction: Direction,
    queued_direction: Option<Direction>,
    food: Point,
    score: u32,
    game_over: bool,
    rng: Box<dyn FnMut() -> f64>,
}

impl SnakeGame {
    pub fn new(rng: impl FnMut() -> f64 + 'static) -> Self {
        let mut game = Self {
            snake: VecDeque::from([Point {
                x: BOARD_SIZE / 2,
                y: BOARD_SIZE / 2,
            }]),
            direction: Direction::Up,
            queued_direction: None,
            food: Point { x: 0, y: 0 },
            score: 0,
            game_over: false,
            rng: Box::new(rng),
        };

        game.food = game.spawn_food();
        game
    }

    pub fn snake(&self) -> impl Iterator<Item = Point> + '_ {
        self.snake.iter().copied()
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Ignored when it would reverse the snake into itself. Takes effect
    /// on the next step.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction.opposite() {
            self.queued_direction = Some(direction);
        }
    }

    pub fn step(&mut self) -> StepOutcome {
        if self.game_over {
            return StepOutcome::Died;
        }

        if let Some(direction) = self.queued_direction.take() {
            self.direction = direction;
        }

        let head = self.snake.front().copied().unwrap_or(Point { x: 0, y: 0 });
        let (dx, dy) = self.direction.delta();
        let next = Point {
            x: head.x + dx,
            y: head.y + dy,
        };

        let hit_wall = next.x < 0 || next.y < 0 || next.x >= BOARD_SIZE || next.y >= BOARD_SIZE;
        if hit_wall || self.snake.contains(&next) {
            self.game_over = true;
            return StepOutcome::Died;
        }

        self.snake.push_front(next);

        if next == self.food {
            self.score += 1;
            self.food = self.spawn_food();
            StepOutcome::Ate
        } else {
            self.snake.pop_back();
            StepOutcome::Moved
        }
    }

    fn spawn_food(&mut self) -> Point {
        loop {
            let x = ((self.rng)() * BOARD_SIZE as f64) as i32;
            let y = ((self.rng)() * BOARD_SIZE as f64) as i32;
            let candidate = Point {
                x: x.clamp(0, BOARD_SIZE - 1),
                y: y.clamp(0, BOARD_SIZE - 1),
            };

            if !self.snake.contains(&candidate) {
                return candidate;
            }
        }
    }
}
