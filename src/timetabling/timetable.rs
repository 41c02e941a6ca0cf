//! The course-by-period assignment matrix.

use std::ops::{Index, IndexMut};

use super::error::TimetablingError;
use super::faculty::Faculty;

/// A `courses x periods` matrix of room indices; 0 means no lecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timetable {
    courses: usize,
    periods: usize,
    cells: Vec<usize>,
}

impl Timetable {
    /// An empty timetable shaped for `faculty`.
    pub fn new(faculty: &Faculty) -> Self {
        Self::with_size(faculty.courses(), faculty.periods())
    }

    pub fn with_size(courses: usize, periods: usize) -> Self {
        Self {
            courses,
            periods,
            cells: vec![0; courses * periods],
        }
    }

    pub fn courses(&self) -> usize {
        self.courses
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Room assignments of course `c`, one per period.
    pub fn row(&self, c: usize) -> &[usize] {
        &self.cells[c * self.periods..(c + 1) * self.periods]
    }

    /// Sets every entry to 0.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Number of scheduled lectures of course `c`.
    pub fn lectures(&self, c: usize) -> usize {
        self.row(c).iter().filter(|&&r| r != 0).count()
    }

    /// Returns `true` if the matrix has the shape `faculty` requires.
    pub fn fits(&self, faculty: &Faculty) -> bool {
        self.courses == faculty.courses() && self.periods == faculty.periods()
    }

    /// Checks that every course has exactly its required lectures, all in
    /// available periods and in existing rooms.
    ///
    /// # Errors
    ///
    /// The first violation found, scanning courses in order.
    pub fn check_feasibility(&self, faculty: &Faculty) -> Result<(), TimetablingError> {
        if !self.fits(faculty) {
            return Err(TimetablingError::InvalidInstance(format!(
                "timetable is {}x{}, instance needs {}x{}",
                self.courses,
                self.periods,
                faculty.courses(),
                faculty.periods()
            )));
        }
        for c in 0..self.courses {
            let course = faculty.course(c);
            for (p, &r) in self.row(c).iter().enumerate() {
                if r == 0 {
                    continue;
                }
                if r > faculty.rooms() {
                    return Err(TimetablingError::UnknownRoom(r.to_string()));
                }
                if !faculty.available(c, p) {
                    return Err(TimetablingError::UnavailablePeriod {
                        course: course.name().to_string(),
                        period: faculty.period(p).name().to_string(),
                    });
                }
            }
            let found = self.lectures(c);
            if found != course.lectures() {
                return Err(TimetablingError::WrongLectureCount {
                    course: course.name().to_string(),
                    expected: course.lectures(),
                    found,
                });
            }
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Timetable {
    type Output = usize;

    fn index(&self, (c, p): (usize, usize)) -> &usize {
        &self.cells[c * self.periods + p]
    }
}

impl IndexMut<(usize, usize)> for Timetable {
    fn index_mut(&mut self, (c, p): (usize, usize)) -> &mut usize {
        &mut self.cells[c * self.periods + p]
    }
}
