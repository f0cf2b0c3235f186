//! Cyclic room cursor.
//!
//! The cursor is always inside `[0, room_count)`: the count is non-zero by
//! construction and every transition wraps modulo the count, so there is no
//! terminal state and no reachable invalid index.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::id::RoomIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavAction {
    Next,
    Prev,
    /// Jump to a room; out-of-range targets wrap.
    Goto(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    index: usize,
    room_count: NonZeroUsize,
}

impl Navigator {
    pub fn new(room_count: NonZeroUsize) -> Self {
        Self {
            index: 0,
            room_count,
        }
    }

    /// Start at `start`, wrapped into range.
    pub fn starting_at(room_count: NonZeroUsize, start: usize) -> Self {
        Self {
            index: start % room_count.get(),
            room_count,
        }
    }

    pub fn current(&self) -> RoomIndex {
        RoomIndex(self.index)
    }

    pub fn room_count(&self) -> usize {
        self.room_count.get()
    }

    /// Pure transition: the navigator after applying `action`.
    pub fn reduce(self, action: NavAction) -> Self {
        let n = self.room_count.get();
        let index = match action {
            NavAction::Next => (self.index + 1) % n,
            NavAction::Prev => (self.index + n - 1) % n,
            NavAction::Goto(target) => target % n,
        };
        Self { index, ..self }
    }

    pub fn next(&mut self) -> RoomIndex {
        *self = self.reduce(NavAction::Next);
        self.current()
    }

    pub fn prev(&mut self) -> RoomIndex {
        *self = self.reduce(NavAction::Prev);
        self.current()
    }

    pub fn goto(&mut self, target: usize) -> RoomIndex {
        *self = self.reduce(NavAction::Goto(target));
        self.current()
    }

    /// Visitor-facing position label, e.g. `Room 2 / 3`.
    pub fn label(&self) -> String {
        format!("Room {} / {}", self.current().number(), self.room_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(count: usize) -> Navigator {
        Navigator::new(NonZeroUsize::new(count).unwrap())
    }

    #[test]
    fn next_wraps_to_first_room() {
        let mut n = nav(3);
        assert_eq!(n.next(), RoomIndex(1));
        assert_eq!(n.next(), RoomIndex(2));
        assert_eq!(n.next(), RoomIndex(0));
    }

    #[test]
    fn prev_wraps_to_last_room() {
        let mut n = nav(3);
        assert_eq!(n.prev(), RoomIndex(2));
        assert_eq!(n.prev(), RoomIndex(1));
    }

    #[test]
    fn single_room_is_a_fixed_point() {
        let mut n = nav(1);
        assert_eq!(n.next(), RoomIndex(0));
        assert_eq!(n.prev(), RoomIndex(0));
        assert_eq!(n.goto(5), RoomIndex(0));
    }

    #[test]
    fn goto_wraps_out_of_range_targets() {
        let mut n = nav(4);
        assert_eq!(n.goto(2), RoomIndex(2));
        assert_eq!(n.goto(9), RoomIndex(1));
    }

    #[test]
    fn starting_index_is_wrapped() {
        let n = Navigator::starting_at(NonZeroUsize::new(3).unwrap(), 7);
        assert_eq!(n.current(), RoomIndex(1));
    }

    #[test]
    fn reduce_does_not_mutate_receiver() {
        let n = nav(3);
        let moved = n.reduce(NavAction::Next);
        assert_eq!(n.current(), RoomIndex(0));
        assert_eq!(moved.current(), RoomIndex(1));
    }

    #[test]
    fn label_is_one_based() {
        let mut n = nav(3);
        assert_eq!(n.label(), "Room 1 / 3");
        n.prev();
        assert_eq!(n.label(), "Room 3 / 3");
    }
}
