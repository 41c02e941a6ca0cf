//! University course timetabling.
//!
//! Assigns every lecture of every course a period and a room. A
//! [`Faculty`] describes the instance; the search runs over [`TtState`]s,
//! a [`Timetable`] plus cached counters, with two neighborhoods:
//!
//! - [`TimeNeighborhoodExplorer`]: move a lecture to another period
//!   ([`MoveTime`]), keeping its room.
//! - [`RoomNeighborhoodExplorer`]: move a lecture to another room
//!   ([`MoveRoom`]), keeping its period.
//!
//! Cost follows the engine convention: hard violations (conflicts, room
//! occupation) weigh [`HARD_WEIGHT`](crate::cost::HARD_WEIGHT) each, soft
//! penalties (room capacity, min working days) one each.
//!
//! # Examples
//!
//! ```
//! use u_localsearch::hc::{HillClimbing, HillClimbingConfig, HillClimbingPolicy};
//! use u_localsearch::random::create_rng;
//! use u_localsearch::solver::{Solver, TokenRingConfig, TokenRingSolver};
//! use u_localsearch::timetabling::{
//!     Course, FacultyBuilder, RoomNeighborhoodExplorer, TimeNeighborhoodExplorer,
//!     TtStateManager,
//! };
//!
//! let faculty = FacultyBuilder::new("demo")
//!     .week(2, 2)
//!     .room("A", 40)
//!     .course(Course::new("Logic", "Frege", 2, 2, 30))
//!     .course(Course::new("Sets", "Cantor", 2, 1, 20))
//!     .curriculum("Y1", "First year", &["Logic", "Sets"])
//!     .build()
//!     .unwrap();
//!
//! let sm = TtStateManager::new(&faculty);
//! let time = TimeNeighborhoodExplorer::new(&faculty);
//! let room = RoomNeighborhoodExplorer::new(&faculty);
//! let hc = HillClimbingPolicy::new(HillClimbingConfig::default().with_max_idle_iteration(200));
//!
//! let mut solver = TokenRingSolver::new(&sm, TokenRingConfig::default().with_max_idle_rounds(2))
//!     .with_runner(Box::new(HillClimbing::new("time", &sm, &time, hc.clone())))
//!     .with_runner(Box::new(HillClimbing::new("room", &sm, &room, hc)));
//! solver.solve(&mut create_rng(42)).unwrap();
//! assert!(solver.internal_state().timetable().check_feasibility(&faculty).is_ok());
//! ```

mod error;
mod faculty;
mod moves;
mod output;
mod room_explorer;
mod state;
mod state_manager;
mod time_explorer;
mod timetable;

pub use error::TimetablingError;
pub use faculty::{Course, CourseGroup, CurriculumSpec, Faculty, FacultyBuilder, Period, Room};
pub use moves::{MoveRoom, MoveTime};
pub use output::TtOutputManager;
pub use room_explorer::RoomNeighborhoodExplorer;
pub use state::TtState;
pub use state_manager::{TtStateManager, Violation};
pub use time_explorer::{TargetPeriodRule, TimeNeighborhoodExplorer};
pub use timetable::Timetable;
