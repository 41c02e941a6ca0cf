//! Room neighborhood: move one lecture to another room.

use rand::Rng;

use super::faculty::Faculty;
use super::moves::MoveRoom;
use super::state::TtState;
use crate::neighborhood::NeighborhoodExplorer;
use crate::random::random_between;

/// Explores [`MoveRoom`]s. The enumeration order is lexicographic over
/// `(course, period, new_room)`, with `old_room` read from the state.
#[derive(Debug, Clone, Copy)]
pub struct RoomNeighborhoodExplorer<'a> {
    faculty: &'a Faculty,
}

impl<'a> RoomNeighborhoodExplorer<'a> {
    pub fn new(faculty: &'a Faculty) -> Self {
        Self { faculty }
    }

    /// Change of the room occupation count: the old room may lose a
    /// clash, the new one may gain one.
    pub fn delta_room_occupation(&self, st: &TtState, mv: &MoveRoom) -> i64 {
        let mut cost = 0;
        if st.room_lectures[mv.old_room][mv.period] > 1 {
            cost -= 1;
        }
        if st.room_lectures[mv.new_room][mv.period] > 0 {
            cost += 1;
        }
        cost
    }

    /// Change of the room capacity penalty. Depends only on the two rooms.
    pub fn delta_room_capacity(&self, _st: &TtState, mv: &MoveRoom) -> i64 {
        let f = self.faculty;
        let students = f.course(mv.course).students();
        let mut cost = 0;
        if f.room(mv.old_room).capacity() < students {
            cost -= 1;
        }
        if f.room(mv.new_room).capacity() < students {
            cost += 1;
        }
        cost
    }
}

impl NeighborhoodExplorer for RoomNeighborhoodExplorer<'_> {
    type State = TtState;
    type Move = MoveRoom;

    fn any_random_move<R: Rng>(&self, st: &TtState, rng: &mut R) -> MoveRoom {
        let f = self.faculty;
        let course = random_between(rng, 0, f.courses() - 1);
        let period = random_between(rng, 0, f.periods() - 1);
        MoveRoom {
            course,
            period,
            old_room: st[(course, period)],
            new_room: random_between(rng, 1, f.rooms()),
        }
    }

    fn any_next_move(&self, st: &TtState, mv: &MoveRoom) -> MoveRoom {
        let f = self.faculty;
        let mut next = *mv;
        next.new_room += 1;
        if next.new_room > f.rooms() {
            next.new_room = 1;
            next.period += 1;
            if next.period == f.periods() {
                next.period = 0;
                next.course = (next.course + 1) % f.courses();
            }
            next.old_room = st[(next.course, next.period)];
        }
        next
    }

    /// The lecture must still be in `old_room`, and `new_room` must be
    /// another existing room.
    fn feasible_move(&self, st: &TtState, mv: &MoveRoom) -> bool {
        mv.old_room != 0
            && st[(mv.course, mv.period)] == mv.old_room
            && mv.new_room != mv.old_room
            && (1..=self.faculty.rooms()).contains(&mv.new_room)
    }

    fn make_move(&self, st: &mut TtState, mv: &MoveRoom) {
        st.timetable[(mv.course, mv.period)] = mv.new_room;
        st.room_lectures[mv.old_room][mv.period] -= 1;
        st.room_lectures[mv.new_room][mv.period] += 1;
    }

    fn delta_violations(&self, st: &TtState, mv: &MoveRoom) -> i64 {
        self.delta_room_occupation(st, mv)
    }

    fn delta_objective(&self, st: &TtState, mv: &MoveRoom) -> i64 {
        self.delta_room_capacity(st, mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::state::StateManager;
    use crate::timetabling::faculty::tests::small_faculty;
    use crate::timetabling::{Course, FacultyBuilder, TtStateManager};

    #[test]
    fn test_stale_move_is_infeasible() {
        let f = small_faculty();
        let sm = TtStateManager::new(&f);
        let ne = RoomNeighborhoodExplorer::new(&f);
        let mut st = sm.empty_state();
        st.timetable[(0, 2)] = 1;
        sm.update_redundant_state_data(&mut st);
        assert!(ne.feasible_move(&st, &MoveRoom::new(0, 2, 1, 2)));
        assert!(!ne.feasible_move(&st, &MoveRoom::new(0, 2, 2, 1)));
        assert!(!ne.feasible_move(&st, &MoveRoom::new(0, 2, 1, 1)));
        assert!(!ne.feasible_move(&st, &MoveRoom::new(0, 3, 0, 1)));
        assert!(!ne.feasible_move(&st, &MoveRoom::new(0, 2, 1, 3)));
    }

    #[test]
    fn test_moving_to_bigger_room() {
        let f = small_faculty();
        let sm = TtStateManager::new(&f);
        let ne = RoomNeighborhoodExplorer::new(&f);
        let mut st = sm.empty_state();
        // Calc (80 students) in A (30 seats), sharing it with Hist.
        st.timetable[(0, 2)] = 1;
        st.timetable[(3, 2)] = 1;
        sm.update_redundant_state_data(&mut st);
        let mv = MoveRoom::new(0, 2, 1, 2);
        assert_eq!(ne.delta_room_capacity(&st, &mv), -1);
        assert_eq!(ne.delta_room_occupation(&st, &mv), -1);
        let before = sm.cost_function(&st);
        let delta = ne.delta_cost_function(&st, &mv);
        ne.make_move(&mut st, &mv);
        assert!((sm.cost_function(&st) - before - delta).abs() < 1e-9);
        assert!(sm.redundant_data_consistent(&st));
    }

    #[test]
    fn test_sweep_visits_every_room_change() {
        let f = small_faculty();
        let sm = TtStateManager::new(&f);
        let ne = RoomNeighborhoodExplorer::new(&f);
        let mut st = sm.empty_state();
        sm.random_state(&mut st, &mut create_rng(4));
        // Every lecture can go to exactly one other room.
        let lectures: usize = (0..f.courses()).map(|c| st.timetable().lectures(c)).sum();
        let stats = ne.neighborhood_statistics(&st, &mut create_rng(4));
        assert_eq!(stats.neighbors, lectures);
    }

    #[test]
    fn test_single_room_has_no_moves() {
        let f = FacultyBuilder::new("one")
            .week(1, 2)
            .room("A", 10)
            .course(Course::new("X", "T", 1, 1, 5))
            .build()
            .unwrap();
        let sm = TtStateManager::new(&f);
        let ne = RoomNeighborhoodExplorer::new(&f);
        let mut st = sm.empty_state();
        sm.random_state(&mut st, &mut create_rng(2));
        assert!(ne.random_move(&st, &mut create_rng(2)).is_none());
        assert!(ne.best_move(&st, &mut create_rng(2)).is_none());
    }

    #[test]
    fn test_raw_cycle_length() {
        let f = small_faculty();
        let sm = TtStateManager::new(&f);
        let ne = RoomNeighborhoodExplorer::new(&f);
        let mut st = sm.empty_state();
        sm.random_state(&mut st, &mut create_rng(6));
        let start = MoveRoom::new(1, 2, st[(1, 2)], 1);
        let mut mv = ne.any_next_move(&st, &start);
        let mut steps = 1;
        while mv != start {
            mv = ne.any_next_move(&st, &mv);
            steps += 1;
        }
        assert_eq!(steps, f.courses() * f.periods() * f.rooms());
    }
}
