//! Time neighborhood: move one lecture to another period.

use rand::Rng;

use super::faculty::Faculty;
use super::moves::MoveTime;
use super::state::TtState;
use crate::neighborhood::NeighborhoodExplorer;
use crate::random::random_between;

/// Which target periods a time move may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetPeriodRule {
    /// The course must be available in the target period.
    #[default]
    Available,
    /// The course must be unavailable in the target period. Kept to
    /// reproduce runs of the legacy timetabler.
    Unavailable,
}

impl TargetPeriodRule {
    fn allows(self, available: bool) -> bool {
        match self {
            Self::Available => available,
            Self::Unavailable => !available,
        }
    }
}

/// Explores [`MoveTime`]s. The enumeration order is lexicographic over
/// `(course, from, to)` and wraps around after the last course.
///
/// By default a lecture may only move to a period where its course is
/// available. The legacy timetabler accepted the opposite, periods where
/// the course is *un*available; select
/// [`TargetPeriodRule::Unavailable`] with
/// [`with_target_rule`](Self::with_target_rule) to reproduce it.
#[derive(Debug, Clone, Copy)]
pub struct TimeNeighborhoodExplorer<'a> {
    faculty: &'a Faculty,
    rule: TargetPeriodRule,
}

impl<'a> TimeNeighborhoodExplorer<'a> {
    pub fn new(faculty: &'a Faculty) -> Self {
        Self {
            faculty,
            rule: TargetPeriodRule::default(),
        }
    }

    /// Replaces the rule restricting target periods.
    pub fn with_target_rule(mut self, rule: TargetPeriodRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn target_rule(&self) -> TargetPeriodRule {
        self.rule
    }

    /// Change of the conflict count: clashes with conflicting courses
    /// left at `from` and met at `to`.
    pub fn delta_conflicts(&self, st: &TtState, mv: &MoveTime) -> i64 {
        let f = self.faculty;
        let mut cost = 0;
        for c in 0..f.courses() {
            if c == mv.course || !f.conflict(c, mv.course) {
                continue;
            }
            if st[(c, mv.from)] != 0 {
                cost -= 1;
            }
            if st[(c, mv.to)] != 0 {
                cost += 1;
            }
        }
        cost
    }

    /// Change of the room occupation count for the lecture's room.
    pub fn delta_room_occupation(&self, st: &TtState, mv: &MoveTime) -> i64 {
        let r = st[(mv.course, mv.from)];
        let mut cost = 0;
        if st.room_lectures[r][mv.from] > 1 {
            cost -= 1;
        }
        if st.room_lectures[r][mv.to] > 0 {
            cost += 1;
        }
        cost
    }

    /// Change of the min working days penalty. Non-zero only when the
    /// lecture changes day and the number of working days crosses the
    /// course's minimum.
    pub fn delta_min_working_days(&self, st: &TtState, mv: &MoveTime) -> i64 {
        let f = self.faculty;
        let from_day = f.day_of(mv.from);
        let to_day = f.day_of(mv.to);
        if from_day == to_day {
            return 0;
        }
        let days = st.working_days[mv.course] as usize;
        let required = f.course(mv.course).min_working_days();
        let leaving = st.course_daily_lectures[mv.course][from_day];
        let arriving = st.course_daily_lectures[mv.course][to_day];
        if days <= required && leaving == 1 && arriving >= 1 {
            1
        } else if days < required && leaving > 1 && arriving == 0 {
            -1
        } else {
            0
        }
    }
}

impl NeighborhoodExplorer for TimeNeighborhoodExplorer<'_> {
    type State = TtState;
    type Move = MoveTime;

    fn any_random_move<R: Rng>(&self, _st: &TtState, rng: &mut R) -> MoveTime {
        let f = self.faculty;
        MoveTime {
            course: random_between(rng, 0, f.courses() - 1),
            from: random_between(rng, 0, f.periods() - 1),
            to: random_between(rng, 0, f.periods() - 1),
        }
    }

    fn any_next_move(&self, _st: &TtState, mv: &MoveTime) -> MoveTime {
        let f = self.faculty;
        let mut next = *mv;
        next.to += 1;
        if next.to == f.periods() {
            next.to = 0;
            next.from += 1;
            if next.from == f.periods() {
                next.from = 0;
                next.course = (next.course + 1) % f.courses();
            }
        }
        next
    }

    fn feasible_move(&self, st: &TtState, mv: &MoveTime) -> bool {
        st[(mv.course, mv.from)] != 0
            && st[(mv.course, mv.to)] == 0
            && self.rule.allows(self.faculty.available(mv.course, mv.to))
    }

    fn make_move(&self, st: &mut TtState, mv: &MoveTime) {
        let f = self.faculty;
        let room = st.timetable[(mv.course, mv.from)];
        st.timetable[(mv.course, mv.to)] = room;
        st.timetable[(mv.course, mv.from)] = 0;

        st.room_lectures[room][mv.from] -= 1;
        st.room_lectures[room][mv.to] += 1;

        let from_day = f.day_of(mv.from);
        let to_day = f.day_of(mv.to);
        if from_day != to_day {
            let daily = &mut st.course_daily_lectures[mv.course];
            daily[from_day] -= 1;
            daily[to_day] += 1;
            if daily[from_day] == 0 {
                st.working_days[mv.course] -= 1;
            }
            if daily[to_day] == 1 {
                st.working_days[mv.course] += 1;
            }
        }
    }

    fn delta_violations(&self, st: &TtState, mv: &MoveTime) -> i64 {
        self.delta_conflicts(st, mv) + self.delta_room_occupation(st, mv)
    }

    /// Room capacity does not change when only the period does.
    fn delta_objective(&self, st: &TtState, mv: &MoveTime) -> i64 {
        self.delta_min_working_days(st, mv)
    }
}
