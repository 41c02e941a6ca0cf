//! Search state: the timetable plus cached counts.

use std::ops::Index;

use super::faculty::Faculty;
use super::timetable::Timetable;

/// A [`Timetable`] with redundant data kept in step with it by every move:
///
/// - `room_lectures[r][p]`: lectures held in room `r` during period `p`
///   (row 0 is unused)
/// - `course_daily_lectures[c][d]`: lectures of course `c` on day `d`
/// - `working_days[c]`: days on which course `c` has a lecture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtState {
    pub(crate) timetable: Timetable,
    pub(crate) room_lectures: Vec<Vec<u32>>,
    pub(crate) course_daily_lectures: Vec<Vec<u32>>,
    pub(crate) working_days: Vec<u32>,
}

impl TtState {
    /// An empty state shaped for `faculty`, caches zeroed.
    pub fn new(faculty: &Faculty) -> Self {
        Self {
            timetable: Timetable::new(faculty),
            room_lectures: vec![vec![0; faculty.periods()]; faculty.rooms() + 1],
            course_daily_lectures: vec![vec![0; faculty.days()]; faculty.courses()],
            working_days: vec![0; faculty.courses()],
        }
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    pub fn into_timetable(self) -> Timetable {
        self.timetable
    }

    pub fn room_lectures(&self, r: usize, p: usize) -> u32 {
        self.room_lectures[r][p]
    }

    pub fn course_daily_lectures(&self, c: usize, d: usize) -> u32 {
        self.course_daily_lectures[c][d]
    }

    pub fn working_days(&self, c: usize) -> u32 {
        self.working_days[c]
    }

    /// Returns `true` if both states cache the same counts.
    pub(crate) fn same_caches(&self, other: &TtState) -> bool {
        self.room_lectures == other.room_lectures
            && self.course_daily_lectures == other.course_daily_lectures
            && self.working_days == other.working_days
    }
}

impl Index<(usize, usize)> for TtState {
    type Output = usize;

    fn index(&self, idx: (usize, usize)) -> &usize {
        &self.timetable[idx]
    }
}
