/// The result of flipping a card. Mismatches are reported with both
/// indices so the caller can schedule flipping them back after its
/// reveal delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    Ignored,
    First,
    Matched(usize, usize),
    Mismatched(usize, usize),
}

/// Pair-matching memory game. The deck is shuffled with an injected RNG.
pub struct MemoryGame {
    cards: Vec<u8>,
    face_up: Vec<bool>,
    matched: Vec<bool>,
    first_flip: Option<usize>,
    moves: u32,
}

impl MemoryGame {
    pub fn new(pairs: u8, mut rng: impl FnMut() -> f64) -> Self {
        let mut cards: Vec<u8> = (0..pairs).flat_map(|v| [v, v]).collect();

        // Fisher-Yates
        for i in (1..cards.len()).rev() {
            let j = (rng() * (i + 1) as f64) as usize;
            cards.swap(i, j.min(i));
        }

        let count = cards.len();
        Self {
            cards,
            face_up: vec![false; count],
            matched: vec![false; count],
            first_flip: None,
            moves: 0,
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn card(&self, idx: usize) -> Option<u8> {
        self.cards.get(idx).copied()
    }

    pub fn is_face_up(&self, idx: usize) -> bool {
        self.face_up.get(idx).copied().unwrap_or(false)
    }

    pub fn is_matched(&self, idx: usize) -> bool {
        self.matched.get(idx).copied().unwrap_or(false)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_complete(&self) -> bool {
        !self.matched.is_empty() && self.matched.iter().all(|m| *m)
    }

    pub fn flip(&mut self, idx: usize) -> FlipOutcome {
        if idx >= self.cards.len() || self.face_up[idx] || self.matched[idx] {
            return FlipOutcome::Ignored;
        }

        self.face_up[idx] = true;

        let Some(first) = self.first_flip.take() else {
            self.first_flip = Some(idx);
            return FlipOutcome::First;
        };

        self.moves += 1;

        if self.cards[first] == self.cards[idx] {
            self.matched[first] = true;
            self.matched[idx] = true;
            FlipOutcome::Matched(first, idx)
        } else {
            FlipOutcome::Mismatched(first, idx)
        }
    }

    /// Turns a mismatched pair back over once the caller's reveal delay
    /// has elapsed.
    pub fn flip_back(&mut self, a: usize, b: usize) {
        for idx in [a, b] {
            if let Some(face_up) = self.face_up.get_mut(idx) {
                if !self.matched[idx] {
                    *face_up = false;
                }
            }
        }
    }
}
