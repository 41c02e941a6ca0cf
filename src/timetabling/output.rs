//! Text form of a timetable.
//!
//! ```text
//! Course    (Teacher)           |   Day 1    |   Day 2    |
//!                               | d1p1  d1p2 | d2p1  d2p2 |
//! ---------------------------------------------------------
//! Calc      (Gauss)             |  A     -   |  -     B   |
//! ```
//!
//! Three header lines, then one line per course in instance order. Each
//! cell holds a room name or `-`; `|` separates the days.

use std::io::{BufRead, Write};

use super::error::TimetablingError;
use super::faculty::Faculty;
use super::state::TtState;
use super::state_manager::TtStateManager;
use super::timetable::Timetable;
use crate::output::OutputManager;
use crate::state::StateManager;

const LABEL_WIDTH: usize = 30;
const NAME_WIDTH: usize = 10;
const CELL_WIDTH: usize = 5;

/// Writes and reads [`Timetable`]s for a borrowed [`Faculty`].
#[derive(Debug, Clone, Copy)]
pub struct TtOutputManager<'a> {
    faculty: &'a Faculty,
}

impl<'a> TtOutputManager<'a> {
    pub fn new(faculty: &'a Faculty) -> Self {
        Self { faculty }
    }

    /// Wide enough to center every room and period name with a blank on
    /// each side, so no cell touches a `|`.
    fn cell_width(&self) -> usize {
        (1..=self.faculty.rooms())
            .map(|r| self.faculty.room(r).name().len() + 2)
            .chain((0..self.faculty.periods()).map(|p| self.faculty.period(p).name().len() + 2))
            .fold(CELL_WIDTH, usize::max)
    }

    fn parse_course_line(
        &self,
        tt: &mut Timetable,
        c: usize,
        line: &str,
        line_no: usize,
    ) -> Result<(), TimetablingError> {
        let f = self.faculty;
        let malformed = |reason: String| TimetablingError::Malformed {
            line: line_no,
            reason,
        };
        let (label, cells) = line
            .split_once(')')
            .ok_or_else(|| malformed("missing teacher".into()))?;
        let name = label.split('(').next().unwrap_or("").trim();
        if name != f.course(c).name() {
            return Err(malformed(format!(
                "expected course {}, found {name}",
                f.course(c).name()
            )));
        }

        let mut tokens = cells.split_whitespace();
        for p in 0..f.periods() {
            if p % f.periods_per_day() == 0 {
                expect_separator(tokens.next(), line_no)?;
            }
            let token = tokens
                .next()
                .ok_or_else(|| malformed(format!("missing cell for period {}", f.period(p).name())))?;
            tt[(c, p)] = if token == "-" {
                0
            } else {
                f.room_index(token)?
            };
        }
        expect_separator(tokens.next(), line_no)?;
        if let Some(extra) = tokens.next() {
            return Err(malformed(format!("unexpected {extra}")));
        }
        Ok(())
    }
}

fn expect_separator(token: Option<&str>, line_no: usize) -> Result<(), TimetablingError> {
    match token {
        Some("|") => Ok(()),
        other => Err(TimetablingError::Malformed {
            line: line_no,
            reason: format!("expected '|', found {}", other.unwrap_or("end of line")),
        }),
    }
}

impl OutputManager for TtOutputManager<'_> {
    type State = TtState;
    type Output = Timetable;
    type Error = TimetablingError;

    fn output_state(&self, st: &TtState) -> Timetable {
        st.timetable().clone()
    }

    /// Copies `out` into `st` and rebuilds the caches. Feasibility is not
    /// required: any timetable of the right shape with existing rooms can
    /// be searched from.
    fn input_state(&self, st: &mut TtState, out: &Timetable) -> Result<(), TimetablingError> {
        let f = self.faculty;
        if !out.fits(f) {
            return Err(TimetablingError::InvalidInstance(format!(
                "timetable is {}x{}, instance needs {}x{}",
                out.courses(),
                out.periods(),
                f.courses(),
                f.periods()
            )));
        }
        if let Some(c) = (0..f.courses()).find(|&c| out.row(c).iter().any(|&r| r > f.rooms())) {
            return Err(TimetablingError::InvalidInstance(format!(
                "course {} uses a room index out of range",
                f.course(c).name()
            )));
        }
        st.timetable = out.clone();
        TtStateManager::new(f).update_redundant_state_data(st);
        Ok(())
    }

    fn write_output<W: Write>(&self, out: &Timetable, w: &mut W) -> Result<(), TimetablingError> {
        let f = self.faculty;
        let width = self.cell_width();
        let ppd = f.periods_per_day();
        let day_width = ppd * width;

        let mut days = format!("{:<LABEL_WIDTH$}", "Course    (Teacher)");
        let mut slots = " ".repeat(LABEL_WIDTH);
        for d in 0..f.days() {
            days.push_str(&format!("|{:^day_width$}", format!("Day {}", d + 1)));
            slots.push('|');
            for p in d * ppd..(d + 1) * ppd {
                slots.push_str(&format!("{:^width$}", f.period(p).name()));
            }
        }
        days.push('|');
        slots.push('|');
        writeln!(w, "{days}")?;
        writeln!(w, "{slots}")?;
        writeln!(w, "{}", "-".repeat(slots.len()))?;

        for c in 0..f.courses() {
            let course = f.course(c);
            let label = format!(
                "{:<NAME_WIDTH$}({}) ",
                course.name(),
                course.teacher()
            );
            let mut line = format!("{label:<LABEL_WIDTH$}");
            for (p, &r) in out.row(c).iter().enumerate() {
                if p % ppd == 0 {
                    line.push('|');
                }
                let cell = if r == 0 { "-" } else { f.room(r).name() };
                line.push_str(&format!("{cell:^width$}"));
            }
            line.push('|');
            writeln!(w, "{line}")?;
        }
        Ok(())
    }

    /// Parses a timetable and checks it is feasible.
    fn read_output<R: BufRead>(&self, r: R) -> Result<Timetable, TimetablingError> {
        let f = self.faculty;
        let mut tt = Timetable::new(f);
        let mut lines = r.lines().enumerate();
        for _ in 0..3 {
            match lines.next() {
                Some((_, line)) => {
                    line?;
                }
                None => {
                    return Err(TimetablingError::Malformed {
                        line: 0,
                        reason: "premature end of input in header".into(),
                    })
                }
            }
        }
        for c in 0..f.courses() {
            let (i, line) = lines.next().ok_or_else(|| TimetablingError::Malformed {
                line: 0,
                reason: format!("premature end of input before course {}", f.course(c).name()),
            })?;
            self.parse_course_line(&mut tt, c, &line?, i + 1)?;
        }
        tt.check_feasibility(f)?;
        Ok(tt)
    }
}
