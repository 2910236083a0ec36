//! Umpire score pad: local score state with optimistic updates.
//!
//! The pad changes its scores before the server confirms them. If the
//! score PATCH fails the caller calls [`ScorePad::revert`].

use serde::Serialize;

use crate::services::{MatchView, Side};

/// Body of `PATCH /matches/{id}/score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreUpdate {
    pub set_number: u32,
    pub side_a_score: u32,
    pub side_b_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePad {
    set_number: u32,
    side_a: u32,
    side_b: u32,
    previous: Option<(u32, u32)>,
}

impl Default for ScorePad {
    fn default() -> Self {
        Self {
            set_number: 1,
            side_a: 0,
            side_b: 0,
            previous: None,
        }
    }
}

impl ScorePad {
    /// Starts from the match's last played set, or set 1 at 0-0.
    pub fn from_match(view: &MatchView) -> Self {
        match view.last_set() {
            Some(set) => Self {
                set_number: set.set_number.unwrap_or(view.scores.len() as u32).max(1),
                side_a: set.side_a_score,
                side_b: set.side_b_score,
                previous: None,
            },
            None => Self::default(),
        }
    }

    /// Starts at a given set, with that set's recorded scores if it has any.
    pub fn at_set(view: &MatchView, set_number: u32) -> Self {
        let set_number = set_number.max(1);
        let (side_a, side_b) = view
            .scores
            .iter()
            .enumerate()
            .find(|(idx, set)| set.set_number.unwrap_or(*idx as u32 + 1) == set_number)
            .map_or((0, 0), |(_, set)| (set.side_a_score, set.side_b_score));
        Self {
            set_number,
            side_a,
            side_b,
            previous: None,
        }
    }

    pub fn set_number(&self) -> u32 {
        self.set_number
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.side_a, self.side_b)
    }

    /// Applies `delta` to one side (never below zero) and returns the payload
    /// to send.
    pub fn adjust(&mut self, side: Side, delta: i32) -> ScoreUpdate {
        self.previous = Some((self.side_a, self.side_b));
        let target = match side {
            Side::SideA => &mut self.side_a,
            Side::SideB => &mut self.side_b,
        };
        *target = target.saturating_add_signed(delta);
        self.update()
    }

    /// Restores the scores from before the last [`adjust`](Self::adjust).
    pub fn revert(&mut self) {
        if let Some((a, b)) = self.previous.take() {
            self.side_a = a;
            self.side_b = b;
        }
    }

    /// Starts the next set at 0-0.
    pub fn next_set(&mut self) {
        self.set_number += 1;
        self.side_a = 0;
        self.side_b = 0;
        self.previous = None;
    }

    pub fn update(&self) -> ScoreUpdate {
        ScoreUpdate {
            set_number: self.set_number,
            side_a_score: self.side_a,
            side_b_score: self.side_b,
        }
    }
}
