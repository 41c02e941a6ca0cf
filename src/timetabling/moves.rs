//! The two move kinds.

use std::fmt;

use crate::tabu::InverseMove;

/// Moves one lecture of `course` from period `from` to period `to`,
/// keeping its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveTime {
    pub course: usize,
    pub from: usize,
    pub to: usize,
}

impl MoveTime {
    pub fn new(course: usize, from: usize, to: usize) -> Self {
        Self { course, from, to }
    }
}

impl fmt::Display for MoveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}->{}", self.course, self.from, self.to)
    }
}

impl InverseMove for MoveTime {
    /// Same course, and one move lands where the other one left.
    fn is_inverse_of(&self, listed: &MoveTime) -> bool {
        self.course == listed.course && (self.from == listed.to || listed.from == self.to)
    }
}

/// Moves the lecture of `course` in `period` from `old_room` to `new_room`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRoom {
    pub course: usize,
    pub period: usize,
    pub old_room: usize,
    pub new_room: usize,
}

impl MoveRoom {
    pub fn new(course: usize, period: usize, old_room: usize, new_room: usize) -> Self {
        Self {
            course,
            period,
            old_room,
            new_room,
        }
    }
}

impl fmt::Display for MoveRoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}]{}->{}",
            self.course, self.period, self.old_room, self.new_room
        )
    }
}

impl InverseMove for MoveRoom {
    /// Same lecture, whatever the rooms.
    fn is_inverse_of(&self, listed: &MoveRoom) -> bool {
        self.course == listed.course && self.period == listed.period
    }
}
