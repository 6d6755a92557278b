//! Undo/redo history over immutable snapshots.
//!
//! `past` runs oldest to newest and ends just before `present`. `future` is
//! ordered newest-undone first, so `future[0]` is what `redo` restores.
//!
//! Two ways to change `present`:
//! - [`History::commit`] records the old present in `past` and clears `future`.
//! - [`History::preview`] replaces `present` without touching either stack.
//!   A gesture that previews many times finishes with exactly one
//!   [`History::commit_preview`], which records the pre-gesture state.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

/// Bounded three-list history.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    limit: usize,
}

impl<T> History<T> {
    /// Start a history at `present`, keeping at most `limit` undo entries.
    #[must_use]
    pub fn new(present: T, limit: usize) -> Self {
        Self { past: VecDeque::new(), present, future: VecDeque::new(), limit }
    }

    #[must_use]
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Undo entries, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &T> {
        self.past.iter()
    }

    /// Redo entries, next-to-redo first.
    pub fn future(&self) -> impl Iterator<Item = &T> {
        self.future.iter()
    }

    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Make `next` the present, recording the old present as undoable.
    pub fn commit(&mut self, next: T) {
        let prev = std::mem::replace(&mut self.present, next);
        self.push_past(prev);
        self.future.clear();
    }

    /// Replace the present without recording history.
    pub fn preview(&mut self, next: T) {
        self.present = next;
    }

    /// Keep the previewed present and record `base`, the state the preview
    /// started from, as the undo entry.
    pub fn commit_preview(&mut self, base: T) {
        self.push_past(base);
        self.future.clear();
    }

    /// Step back one entry. Returns `false` at the boundary.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop_back() else {
            return false;
        };
        let undone = std::mem::replace(&mut self.present, prev);
        self.future.push_front(undone);
        true
    }

    /// Step forward one entry. Returns `false` at the boundary.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let prev = std::mem::replace(&mut self.present, next);
        self.push_past(prev);
        true
    }

    fn push_past(&mut self, entry: T) {
        self.past.push_back(entry);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}
