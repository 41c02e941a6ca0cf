//! Problem instance: courses, rooms, periods and their constraints.

use std::collections::HashSet;
use std::fmt;

use super::error::TimetablingError;

/// A course with its weekly lectures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Course {
    name: String,
    long_name: String,
    teacher: String,
    lectures: usize,
    min_working_days: usize,
    students: u32,
}

impl Course {
    pub fn new(
        name: impl Into<String>,
        teacher: impl Into<String>,
        lectures: usize,
        min_working_days: usize,
        students: u32,
    ) -> Self {
        let name = name.into();
        Self {
            long_name: name.clone(),
            name,
            teacher: teacher.into(),
            lectures,
            min_working_days,
            students,
        }
    }

    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn teacher(&self) -> &str {
        &self.teacher
    }

    /// Number of lectures per week.
    pub fn lectures(&self) -> usize {
        self.lectures
    }

    /// Days over which the lectures should be spread.
    pub fn min_working_days(&self) -> usize {
        self.min_working_days
    }

    pub fn students(&self) -> u32 {
        self.students
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    name: String,
    capacity: u32,
}

impl Room {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Period {
    name: String,
}

impl Period {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A curriculum: courses attended by the same students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseGroup {
    name: String,
    long_name: String,
    members: Vec<usize>,
}

impl CourseGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Indices of the member courses.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The immutable problem instance.
///
/// Courses, periods and groups are indexed from 0. Rooms are indexed from
/// 1: a timetable entry of 0 means "no lecture".
#[derive(Debug, Clone)]
pub struct Faculty {
    name: String,
    courses: Vec<Course>,
    rooms: Vec<Room>,
    periods: Vec<Period>,
    periods_per_day: usize,
    availability: Vec<Vec<bool>>,
    conflict: Vec<Vec<bool>>,
    groups: Vec<CourseGroup>,
}

impl Faculty {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn courses(&self) -> usize {
        self.courses.len()
    }

    pub fn rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn periods(&self) -> usize {
        self.periods.len()
    }

    pub fn periods_per_day(&self) -> usize {
        self.periods_per_day
    }

    pub fn days(&self) -> usize {
        self.periods.len() / self.periods_per_day
    }

    /// Day of period `p`.
    pub fn day_of(&self, p: usize) -> usize {
        p / self.periods_per_day
    }

    pub fn groups(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if course `c` may be taught in period `p`.
    pub fn available(&self, c: usize, p: usize) -> bool {
        self.availability[c][p]
    }

    /// Returns `true` if courses `c1` and `c2` must not overlap.
    pub fn conflict(&self, c1: usize, c2: usize) -> bool {
        self.conflict[c1][c2]
    }

    pub fn course(&self, c: usize) -> &Course {
        &self.courses[c]
    }

    /// Room `r`, with `r` in `1..=rooms()`.
    pub fn room(&self, r: usize) -> &Room {
        &self.rooms[r - 1]
    }

    pub fn period(&self, p: usize) -> &Period {
        &self.periods[p]
    }

    pub fn group(&self, g: usize) -> &CourseGroup {
        &self.groups[g]
    }

    /// Number of periods course `c` may use.
    pub fn available_periods(&self, c: usize) -> usize {
        self.availability[c].iter().filter(|&&a| a).count()
    }

    pub fn course_index(&self, name: &str) -> Result<usize, TimetablingError> {
        self.courses
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| TimetablingError::UnknownCourse(name.to_string()))
    }

    /// Index of the room called `name`, starting at 1.
    pub fn room_index(&self, name: &str) -> Result<usize, TimetablingError> {
        self.rooms
            .iter()
            .position(|r| r.name == name)
            .map(|i| i + 1)
            .ok_or_else(|| TimetablingError::UnknownRoom(name.to_string()))
    }

    pub fn period_index(&self, name: &str) -> Result<usize, TimetablingError> {
        self.periods
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| TimetablingError::UnknownPeriod(name.to_string()))
    }

    pub fn group_index(&self, name: &str) -> Result<usize, TimetablingError> {
        self.groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| TimetablingError::UnknownGroup(name.to_string()))
    }
}

impl fmt::Display for Faculty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Courses : {}", self.courses())?;
        writeln!(f, "Rooms : {}", self.rooms())?;
        writeln!(
            f,
            "Periods : {} ({} per day)",
            self.periods(),
            self.periods_per_day
        )?;
        for g in &self.groups {
            write!(f, "{} ({}) :", g.long_name, g.name)?;
            for &c in &g.members {
                write!(f, " {}", self.courses[c].name)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A curriculum given by course names.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurriculumSpec {
    pub name: String,
    pub long_name: String,
    pub courses: Vec<String>,
}

/// Builds a [`Faculty`], resolving names and deriving conflicts.
///
/// Two courses conflict when they share a curriculum or a teacher.
///
/// # Examples
///
/// ```
/// use u_localsearch::timetabling::{Course, FacultyBuilder};
///
/// let faculty = FacultyBuilder::new("tiny")
///     .week(2, 3)
///     .room("A", 40)
///     .course(Course::new("Calc", "Gauss", 2, 2, 30))
///     .course(Course::new("Alg", "Noether", 2, 1, 25))
///     .curriculum("Y1", "First year", &["Calc", "Alg"])
///     .build()
///     .unwrap();
/// assert_eq!(faculty.periods(), 6);
/// assert!(faculty.conflict(0, 1));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacultyBuilder {
    pub name: String,
    pub periods_per_day: usize,
    pub courses: Vec<Course>,
    pub rooms: Vec<Room>,
    pub periods: Vec<Period>,
    pub curricula: Vec<CurriculumSpec>,
    /// `(course, period)` pairs the course cannot use.
    pub unavailability: Vec<(String, String)>,
}

impl FacultyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn room(mut self, name: impl Into<String>, capacity: u32) -> Self {
        self.rooms.push(Room::new(name, capacity));
        self
    }

    pub fn period(mut self, name: impl Into<String>) -> Self {
        self.periods.push(Period::new(name));
        self
    }

    pub fn periods_per_day(mut self, n: usize) -> Self {
        self.periods_per_day = n;
        self
    }

    /// Adds `days * per_day` periods named `d<day>p<slot>`, both from 1.
    pub fn week(mut self, days: usize, per_day: usize) -> Self {
        self.periods_per_day = per_day;
        for d in 1..=days {
            for p in 1..=per_day {
                self.periods.push(Period::new(format!("d{d}p{p}")));
            }
        }
        self
    }

    pub fn curriculum(
        mut self,
        name: impl Into<String>,
        long_name: impl Into<String>,
        courses: &[&str],
    ) -> Self {
        self.curricula.push(CurriculumSpec {
            name: name.into(),
            long_name: long_name.into(),
            courses: courses.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// Forbids `course` from being taught in `period`.
    pub fn unavailable(mut self, course: impl Into<String>, period: impl Into<String>) -> Self {
        self.unavailability.push((course.into(), period.into()));
        self
    }

    /// Validates the description and builds the instance.
    ///
    /// # Errors
    ///
    /// `InvalidInstance` for empty or duplicate entities, a period count
    /// that is not a whole number of days, and names that the text form of
    /// a timetable cannot hold. `Unknown*` for unresolved names and
    /// `NotEnoughPeriods` when a course cannot fit its lectures.
    pub fn build(self) -> Result<Faculty, TimetablingError> {
        if self.courses.is_empty() || self.rooms.is_empty() || self.periods.is_empty() {
            return Err(TimetablingError::InvalidInstance(
                "an instance needs at least one course, room and period".into(),
            ));
        }
        if self.periods_per_day == 0 || self.periods.len() % self.periods_per_day != 0 {
            return Err(TimetablingError::InvalidInstance(format!(
                "{} periods do not split into days of {}",
                self.periods.len(),
                self.periods_per_day
            )));
        }
        for course in &self.courses {
            check_label("course", course.name())?;
            check_label("teacher", course.teacher())?;
        }
        for room in &self.rooms {
            check_cell("room", room.name())?;
        }
        check_unique("course", self.courses.iter().map(Course::name))?;
        check_unique("room", self.rooms.iter().map(Room::name))?;
        check_unique("period", self.periods.iter().map(Period::name))?;
        check_unique("group", self.curricula.iter().map(|g| g.name.as_str()))?;

        let n_courses = self.courses.len();
        let mut faculty = Faculty {
            name: self.name,
            availability: vec![vec![true; self.periods.len()]; n_courses],
            conflict: vec![vec![false; n_courses]; n_courses],
            courses: self.courses,
            rooms: self.rooms,
            periods: self.periods,
            periods_per_day: self.periods_per_day,
            groups: Vec::with_capacity(self.curricula.len()),
        };

        for spec in self.curricula {
            let mut members: Vec<usize> = Vec::with_capacity(spec.courses.len());
            for name in &spec.courses {
                let c1 = faculty.course_index(name)?;
                for &c2 in &members {
                    if c1 != c2 {
                        faculty.conflict[c1][c2] = true;
                        faculty.conflict[c2][c1] = true;
                    }
                }
                members.push(c1);
            }
            faculty.groups.push(CourseGroup {
                name: spec.name,
                long_name: spec.long_name,
                members,
            });
        }

        for (course, period) in &self.unavailability {
            let c = faculty.course_index(course)?;
            let p = faculty.period_index(period)?;
            faculty.availability[c][p] = false;
        }

        for c1 in 0..n_courses {
            for c2 in c1 + 1..n_courses {
                if faculty.courses[c1].teacher == faculty.courses[c2].teacher {
                    faculty.conflict[c1][c2] = true;
                    faculty.conflict[c2][c1] = true;
                }
            }
        }

        for c in 0..n_courses {
            let available = faculty.available_periods(c);
            let course = &faculty.courses[c];
            if course.lectures > available {
                return Err(TimetablingError::NotEnoughPeriods {
                    course: course.name.clone(),
                    lectures: course.lectures,
                    available,
                });
            }
        }
        Ok(faculty)
    }
}

fn check_unique<'a>(
    what: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), TimetablingError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(TimetablingError::InvalidInstance(format!(
                "duplicate {what} name {name}"
            )));
        }
    }
    Ok(())
}

/// Course and teacher names open a timetable line as `name (teacher)`.
fn check_label(what: &str, name: &str) -> Result<(), TimetablingError> {
    if name.trim().is_empty() || name.trim() != name || name.contains(['(', ')']) {
        return Err(TimetablingError::InvalidInstance(format!(
            "{what} name '{name}' must be non-blank, unpadded and free of parentheses"
        )));
    }
    Ok(())
}

/// Room names fill the whitespace-separated cells of a timetable line,
/// where `-` marks a free period and `|` a day boundary.
fn check_cell(what: &str, name: &str) -> Result<(), TimetablingError> {
    let bad_char = |ch: char| ch.is_whitespace() || ch == '|';
    if name.is_empty() || name == "-" || name.contains(bad_char) {
        return Err(TimetablingError::InvalidInstance(format!(
            "{what} name '{name}' must be a single word other than '-' without '|'"
        )));
    }
    Ok(())
}
