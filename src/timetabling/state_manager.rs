//! Cost components and random states for course timetabling.
//!
//! Hard constraints (violations):
//! - conflicts: two conflicting courses with a lecture in the same period,
//!   counted once per unordered pair and period
//! - room occupation: every lecture beyond the first in a room and period
//!
//! Soft constraints (objective):
//! - room capacity: every lecture in a room smaller than its audience
//! - min working days: missing days below each course's minimum

use std::fmt;

use rand::Rng;

use super::faculty::Faculty;
use super::state::TtState;
use crate::random::random_between;
use crate::state::StateManager;

/// State manager over a borrowed [`Faculty`].
#[derive(Debug, Clone, Copy)]
pub struct TtStateManager<'a> {
    faculty: &'a Faculty,
}

impl<'a> TtStateManager<'a> {
    pub fn new(faculty: &'a Faculty) -> Self {
        Self { faculty }
    }

    pub fn faculty(&self) -> &'a Faculty {
        self.faculty
    }

    /// Hard. Pairs of conflicting courses taught in the same period, one
    /// per shared period.
    pub fn conflicts(&self, st: &TtState) -> i64 {
        let f = self.faculty;
        let mut cost = 0;
        for c1 in 0..f.courses() {
            for c2 in c1 + 1..f.courses() {
                if !f.conflict(c1, c2) {
                    continue;
                }
                cost += (0..f.periods())
                    .filter(|&p| st[(c1, p)] != 0 && st[(c2, p)] != 0)
                    .count() as i64;
            }
        }
        cost
    }

    /// Hard. Lectures beyond the first in each room and period.
    pub fn room_occupation(&self, st: &TtState) -> i64 {
        st.room_lectures
            .iter()
            .skip(1)
            .flatten()
            .map(|&n| i64::from(n.saturating_sub(1)))
            .sum()
    }

    /// Soft. Lectures held in a room with fewer seats than the course has
    /// students.
    pub fn room_capacity(&self, st: &TtState) -> i64 {
        let f = self.faculty;
        let mut cost = 0;
        for c in 0..f.courses() {
            let students = f.course(c).students();
            cost += st
                .timetable
                .row(c)
                .iter()
                .filter(|&&r| r != 0 && f.room(r).capacity() < students)
                .count() as i64;
        }
        cost
    }

    /// Soft. Working days each course misses against its minimum, read
    /// from the cached day counts.
    pub fn min_working_days(&self, st: &TtState) -> i64 {
        let f = self.faculty;
        (0..f.courses())
            .map(|c| {
                let required = f.course(c).min_working_days() as i64;
                (required - i64::from(st.working_days[c])).max(0)
            })
            .sum()
    }

    /// Every violated constraint of `st`, hard ones first.
    pub fn violation_report(&self, st: &TtState) -> Vec<Violation> {
        let f = self.faculty;
        let mut report = Vec::new();
        for c1 in 0..f.courses() {
            for c2 in c1 + 1..f.courses() {
                if !f.conflict(c1, c2) {
                    continue;
                }
                for p in 0..f.periods() {
                    if st[(c1, p)] != 0 && st[(c2, p)] != 0 {
                        report.push(Violation::Conflict {
                            first: f.course(c1).name().to_string(),
                            second: f.course(c2).name().to_string(),
                            period: f.period(p).name().to_string(),
                        });
                    }
                }
            }
        }
        for p in 0..f.periods() {
            for r in 1..=f.rooms() {
                let lectures = st.room_lectures[r][p];
                if lectures > 1 {
                    report.push(Violation::RoomOccupation {
                        room: f.room(r).name().to_string(),
                        period: f.period(p).name().to_string(),
                        lectures,
                    });
                }
            }
        }
        for c in 0..f.courses() {
            let course = f.course(c);
            for (p, &r) in st.timetable.row(c).iter().enumerate() {
                if r != 0 && f.room(r).capacity() < course.students() {
                    report.push(Violation::RoomCapacity {
                        course: course.name().to_string(),
                        room: f.room(r).name().to_string(),
                        period: f.period(p).name().to_string(),
                        students: course.students(),
                        capacity: f.room(r).capacity(),
                    });
                }
            }
        }
        for c in 0..f.courses() {
            let course = f.course(c);
            let days = st.working_days[c] as usize;
            if days < course.min_working_days() {
                report.push(Violation::MinWorkingDays {
                    course: course.name().to_string(),
                    working_days: days,
                    required: course.min_working_days(),
                });
            }
        }
        report
    }
}

impl StateManager for TtStateManager<'_> {
    type State = TtState;

    fn empty_state(&self) -> TtState {
        TtState::new(self.faculty)
    }

    /// Each course gets its lectures in distinct available periods. A
    /// lecture goes to a uniformly drawn free room-period slot while one
    /// exists, otherwise to a uniformly drawn period and room.
    fn random_state<R: Rng>(&self, st: &mut TtState, rng: &mut R) {
        let f = self.faculty;
        st.timetable.clear();
        let mut occupied = vec![vec![false; f.periods()]; f.rooms() + 1];
        let mut slots = Vec::new();
        for c in 0..f.courses() {
            for _ in 0..f.course(c).lectures() {
                let periods: Vec<usize> = (0..f.periods())
                    .filter(|&p| f.available(c, p) && st.timetable[(c, p)] == 0)
                    .collect();
                if periods.is_empty() {
                    break;
                }
                slots.clear();
                for &p in &periods {
                    slots.extend((1..=f.rooms()).filter(|&r| !occupied[r][p]).map(|r| (p, r)));
                }
                let (p, r) = if slots.is_empty() {
                    let p = periods[rng.random_range(0..periods.len())];
                    (p, random_between(rng, 1, f.rooms()))
                } else {
                    slots[rng.random_range(0..slots.len())]
                };
                st.timetable[(c, p)] = r;
                occupied[r][p] = true;
            }
        }
        self.update_redundant_state_data(st);
    }

    fn update_redundant_state_data(&self, st: &mut TtState) {
        let f = self.faculty;
        for row in st.room_lectures.iter_mut() {
            row.fill(0);
        }
        for c in 0..f.courses() {
            for p in 0..f.periods() {
                let r = st.timetable[(c, p)];
                if r != 0 {
                    st.room_lectures[r][p] += 1;
                }
            }
        }
        for c in 0..f.courses() {
            st.working_days[c] = 0;
            for d in 0..f.days() {
                let first = d * f.periods_per_day();
                let lectures = st.timetable.row(c)[first..first + f.periods_per_day()]
                    .iter()
                    .filter(|&&r| r != 0)
                    .count() as u32;
                st.course_daily_lectures[c][d] = lectures;
                if lectures >= 1 {
                    st.working_days[c] += 1;
                }
            }
        }
    }

    fn redundant_data_consistent(&self, st: &TtState) -> bool {
        let mut fresh = st.clone();
        self.update_redundant_state_data(&mut fresh);
        fresh.same_caches(st)
    }

    fn violations(&self, st: &TtState) -> i64 {
        self.conflicts(st) + self.room_occupation(st)
    }

    fn objective(&self, st: &TtState) -> i64 {
        self.room_capacity(st) + self.min_working_days(st)
    }
}

/// One violated constraint, named after the instance's entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Conflict {
        first: String,
        second: String,
        period: String,
    },
    RoomOccupation {
        room: String,
        period: String,
        lectures: u32,
    },
    RoomCapacity {
        course: String,
        room: String,
        period: String,
        students: u32,
        capacity: u32,
    },
    MinWorkingDays {
        course: String,
        working_days: usize,
        required: usize,
    },
}

impl Violation {
    /// Returns `true` for hard constraints.
    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::RoomOccupation { .. })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                first,
                second,
                period,
            } => write!(f, "Courses {first} and {second} overlap at period {period}"),
            Self::RoomOccupation {
                room,
                period,
                lectures,
            } => write!(f, "{lectures} lectures in room {room} at period {period}"),
            Self::RoomCapacity {
                course,
                room,
                period,
                students,
                capacity,
            } => write!(
                f,
                "Room {room} too small for course {course} at period {period} ({students} students, {capacity} seats)"
            ),
            Self::MinWorkingDays {
                course,
                working_days,
                required,
            } => write!(
                f,
                "Course {course} has lectures on {working_days} days, at least {required} required"
            ),
        }
    }
}
