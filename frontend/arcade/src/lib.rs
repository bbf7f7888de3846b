mod memory;
mod snake;

pub use memory::{FlipOutcome, MemoryGame};
pub use snake::{Direction, SnakeGame, StepOutcome, BOARD_SIZE};

use serde::Serialize;
use tsify::Tsify;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

#[derive(Tsify, Serialize)]
#[tsify(into_wasm_abi)]
pub struct SnakeView {
    pub board_size: i32,
    pub snake: Vec<[i32; 2]>,
    pub food: [i32; 2],
    pub score: u32,
    pub game_over: bool,
}

#[wasm_bindgen]
pub struct Snake {
    game: SnakeGame,
}

#[wasm_bindgen]
impl Snake {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            game: SnakeGame::new(js_sys::Math::random),
        }
    }

    #[wasm_bindgen(js_name = setDirection)]
    pub fn set_direction(&mut self, direction: &str) -> Result<(), JsValue> {
        let direction = match direction {
            "up" => Direction::Up,
            "down" => Direction::Down,
            "left" => Direction::Left,
            "right" => Direction::Right,
            other => {
                return Err(JsValue::from_str(&format!(
                    "unknown direction: {other}"
                )))
            }
        };

        self.game.set_direction(direction);

        Ok(())
    }

    /// Advances the game one tick. Returns `"moved"`, `"ate"` or
    /// `"died"`.
    pub fn step(&mut self) -> String {
        match self.game.step() {
            StepOutcome::Moved => "moved",
            StepOutcome::Ate => "ate",
            StepOutcome::Died => "died",
        }
        .to_owned()
    }

    pub fn view(&self) -> SnakeView {
        SnakeView {
            board_size: BOARD_SIZE,
            snake: self.game.snake().map(|p| [p.x, p.y]).collect(),
            food: [self.game.food().x, self.game.food().y],
            score: self.game.score(),
            game_over: self.game.game_over(),
        }
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tsify, Serialize)]
#[tsify(into_wasm_abi)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlipView {
    Ignored,
    First { card: usize },
    Matched { first: usize, second: usize },
    Mismatched { first: usize, second: usize },
}

#[derive(Tsify, Serialize)]
pub struct MemoryCard {
    pub value: u8,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Tsify, Serialize)]
#[tsify(into_wasm_abi)]
pub struct MemoryView {
    pub cards: Vec<MemoryCard>,
    pub moves: u32,
    pub complete: bool,
}

#[wasm_bindgen]
pub struct Memory {
    game: MemoryGame,
}

#[wasm_bindgen]
impl Memory {
    #[wasm_bindgen(constructor)]
    pub fn new(pairs: u8) -> Self {
        Self {
            game: MemoryGame::new(pairs, js_sys::Math::random),
        }
    }

    pub fn flip(&mut self, idx: usize) -> FlipView {
        match self.game.flip(idx) {
            FlipOutcome::Ignored => FlipView::Ignored,
            FlipOutcome::First => FlipView::First { card: idx },
            FlipOutcome::Matched(first, second) => FlipView::Matched { first, second },
            FlipOutcome::Mismatched(first, second) => FlipView::Mismatched { first, second },
        }
    }

    /// Turns a mismatched pair back over. The reveal delay is owned by
    /// the caller so the UI decides how long cards stay visible.
    #[wasm_bindgen(js_name = flipBack)]
    pub fn flip_back(&mut self, first: usize, second: usize) {
        self.game.flip_back(first, second);
    }

    pub fn view(&self) -> MemoryView {
        MemoryView {
            cards: (0..self.game.card_count())
                .map(|idx| MemoryCard {
                    value: self.game.card(idx).unwrap_or_default(),
                    face_up: self.game.is_face_up(idx),
                    matched: self.game.is_matched(idx),
                })
                .collect(),
            moves: self.game.moves(),
            complete: self.game.is_complete(),
        }
    }
}
