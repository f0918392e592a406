//! Sliding-window conversation memory

use std::collections::VecDeque;

use crate::types::ConversationTurn;

/// Bounded store of the most recent question/answer turns
///
/// Appending beyond the window evicts the oldest turn; the whole history
/// is only dropped by [`ConversationMemory::clear`].
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<ConversationTurn>,
    window: usize,
}

impl ConversationMemory {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            turns: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        if self.turns.len() == self.window {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    /// The last `n` history lines, oldest first, as `User:` / `Assistant:` lines
    pub fn recent_lines(&self, n: usize) -> Vec<String> {
        let lines: Vec<String> = self
            .turns
            .iter()
            .flat_map(|turn| {
                [
                    format!("User: {}", turn.question),
                    format!("Assistant: {}", turn.answer),
                ]
            })
            .collect();

        let skip = lines.len().saturating_sub(n);
        lines.into_iter().skip(skip).collect()
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(10)
    }
}
