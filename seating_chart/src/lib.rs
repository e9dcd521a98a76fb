mod config;
pub mod manual;
pub mod session;

use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;

/// The name used when the teacher did not provide one.
pub const DEFAULT_CLASS_NAME: &str = "未命名班級";

/// Number of seats in each group of the classroom.
pub const SEATS_PER_GROUP: u32 = 6;

/// The order in which the groups are laid out in the classroom.
pub const GROUP_DISPLAY_ORDER: [i64; 6] = [4, 5, 6, 1, 2, 3];

const GROUP_NUMERALS: [&str; 7] = ["零", "一", "二", "三", "四", "五", "六"];

// **** Students ****

/// A student sitting in the classroom.
///
/// The scores are only reachable through the mutation methods, which always
/// recompute the project and total scores.
#[derive(PartialEq, Debug, Clone)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub group: i64,
    /// The seat key `"<group>-<position>"`, as written in the file.
    pub seat: String,
    plus_score: i64,
    project_grade: ProjectGrade,
    project_modifier: ProjectModifier,
    project_score: i64,
    total_score: i64,
}

impl Student {
    pub fn new(id: StudentId, name: String, group: i64, seat: String) -> Student {
        let mut s = Student {
            id,
            name,
            group,
            seat,
            plus_score: 0,
            project_grade: ProjectGrade::Unscored,
            project_modifier: ProjectModifier::NoModifier,
            project_score: 0,
            total_score: 0,
        };
        s.recompute();
        s
    }

    pub fn plus_score(&self) -> i64 {
        self.plus_score
    }

    pub fn project_grade(&self) -> ProjectGrade {
        self.project_grade
    }

    pub fn project_modifier(&self) -> ProjectModifier {
        self.project_modifier
    }

    pub fn project_score(&self) -> i64 {
        self.project_score
    }

    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    /// Recomputes the derived scores from the grade, the modifier and the bonus.
    pub fn recompute(&mut self) -> &Student {
        self.project_score =
            grade_score(self.project_grade.label()) + modifier_score(self.project_modifier.label());
        self.total_score = self.plus_score + self.project_score;
        self
    }

    pub fn set_grade(&mut self, grade: ProjectGrade) -> &Student {
        self.project_grade = grade;
        self.recompute()
    }

    pub fn set_modifier(&mut self, modifier: ProjectModifier) -> &Student {
        self.project_modifier = modifier;
        self.recompute()
    }

    /// Adds one bonus point. There is no upper bound.
    pub fn increment_plus(&mut self) -> &Student {
        self.plus_score += 1;
        self.recompute()
    }

    /// Removes one bonus point. Negative bonuses are allowed.
    pub fn decrement_plus(&mut self) -> &Student {
        self.plus_score -= 1;
        self.recompute()
    }
}

// **** Scores ****

/// The base score of a project grade. Unknown grades are worth 0.
pub fn grade_score(grade: &str) -> i64 {
    match grade {
        "A" => 100,
        "B" => 90,
        "C" => 80,
        "D" => 70,
        "E" => 60,
        "作品" | "假" => 0,
        _ => 0,
    }
}

/// The adjustment of a project modifier. Unknown modifiers are worth 0.
pub fn modifier_score(modifier: &str) -> i64 {
    match modifier {
        "+" => 5,
        "-" => -5,
        _ => 0,
    }
}

// **** Roster ****

/// All the students of the class, keyed by seat.
///
/// The roster keeps the order in which the seats were first imported. It is
/// the only owner of the students: all the changes go through it.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
    by_seat: HashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Roster {
        Roster::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, seat: &str) -> Option<&Student> {
        self.by_seat.get(seat).map(|idx| &self.students[*idx])
    }

    /// The students, in import order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    /// Inserts a student. A student already sitting on the same seat is replaced,
    /// but the seat keeps its original position in the roster.
    pub fn insert(&mut self, student: Student) {
        match self.by_seat.get(&student.seat) {
            Some(idx) => {
                debug!("insert: seat {} is overwritten", student.seat);
                self.students[*idx] = student;
            }
            None => {
                self.by_seat
                    .insert(student.seat.clone(), self.students.len());
                self.students.push(student);
            }
        }
    }

    /// Replaces the whole roster.
    pub fn replace(&mut self, other: Roster) {
        *self = other;
    }

    fn get_mut(&mut self, seat: &str) -> Option<&mut Student> {
        match self.by_seat.get(seat) {
            Some(idx) => self.students.get_mut(*idx),
            None => {
                warn!("No student on seat {:?}, ignoring", seat);
                None
            }
        }
    }

    pub fn set_grade(&mut self, seat: &str, grade: ProjectGrade) -> Option<&Student> {
        self.get_mut(seat).map(|s| s.set_grade(grade))
    }

    pub fn set_modifier(&mut self, seat: &str, modifier: ProjectModifier) -> Option<&Student> {
        self.get_mut(seat).map(|s| s.set_modifier(modifier))
    }

    pub fn increment_plus(&mut self, seat: &str) -> Option<&Student> {
        self.get_mut(seat).map(|s| s.increment_plus())
    }

    pub fn decrement_plus(&mut self, seat: &str) -> Option<&Student> {
        self.get_mut(seat).map(|s| s.decrement_plus())
    }
}

impl FromIterator<Student> for Roster {
    fn from_iter<I: IntoIterator<Item = Student>>(iter: I) -> Self {
        let mut r = Roster::new();
        for s in iter {
            r.insert(s);
        }
        r
    }
}

// **** Import ****

/// The outcome of a successful parse.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedRoster {
    pub roster: Roster,
    /// Number of data rows that passed validation (before merging duplicate seats).
    pub valid_rows: usize,
    pub dropped_rows: usize,
}

// The column index of each required header.
struct ColumnIndexes {
    id: usize,
    name: usize,
    group: usize,
    seat: usize,
}

fn find_columns(header: &[Cell]) -> Result<ColumnIndexes, RosterError> {
    let position = |label: &str| {
        header
            .iter()
            .position(|c| matches!(c, Cell::Text(s) if s == label))
    };
    let found: Vec<Option<usize>> = REQUIRED_HEADERS.iter().map(|l| position(*l)).collect();
    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .zip(found.iter())
        .filter(|(_, idx)| idx.is_none())
        .map(|(l, _)| l.to_string())
        .collect();
    match found.as_slice() {
        [Some(id), Some(name), Some(group), Some(seat)] => Ok(ColumnIndexes {
            id: *id,
            name: *name,
            group: *group,
            seat: *seat,
        }),
        _ => Err(RosterError::MissingHeaders(missing)),
    }
}

// Length in bytes of the run of ASCII digits at the start of the string.
fn digit_run(s: &str) -> usize {
    s.bytes().take_while(|b| b.is_ascii_digit()).count()
}

/// True if the seat is written `<group>-<position>`, with digits only and nothing else.
/// The digit runs may be arbitrarily long.
pub fn is_seat_key(seat: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && digit_run(s) == s.len();
    match seat.split_once('-') {
        Some((group, position)) => all_digits(group) && all_digits(position),
        None => false,
    }
}

// Returns a student if the row is valid, None if it should be dropped.
fn read_student(
    lineno: usize,
    row: &[Cell],
    cols: &ColumnIndexes,
) -> Option<Student> {
    let empty = Cell::Empty;
    let cell = |idx: usize| row.get(idx).unwrap_or(&empty);
    let (id, name, group, seat) = (cell(cols.id), cell(cols.name), cell(cols.group), cell(cols.seat));

    if !(id.is_truthy() && name.is_truthy() && group.is_truthy() && seat.is_truthy()) {
        debug!("read_student: row {}: missing required cell: {:?}", lineno, row);
        return None;
    }

    let seat_value = seat.display_text().trim().to_string();
    if !is_seat_key(&seat_value) {
        warn!("read_student: row {}: malformed seat {:?}", lineno, seat_value);
        return None;
    }

    let group_number = match group.int_prefix() {
        Some(g) => g,
        None => {
            warn!("read_student: row {}: malformed group {:?}", lineno, group);
            return None;
        }
    };

    Some(Student::new(
        StudentId::from_cell(id),
        name.display_text(),
        group_number,
        seat_value,
    ))
}

/// Builds the roster out of the rows of a file. The first row is the header.
///
/// The header must contain the four columns [`REQUIRED_HEADERS`], in any order.
/// Data rows with a missing cell or a malformed seat are dropped. When two rows
/// use the same seat, the last one wins.
pub fn parse_roster(rows: &[Vec<Cell>]) -> Result<ParsedRoster, RosterError> {
    if rows.len() <= 1 {
        return Err(RosterError::EmptyData);
    }
    let header = &rows[0];
    debug!("parse_roster: header: {:?}", header);
    let cols = find_columns(header)?;

    let mut roster = Roster::new();
    let mut valid_rows: usize = 0;
    for (idx, row) in rows.iter().enumerate().skip(1) {
        if let Some(student) = read_student(idx + 1, row, &cols) {
            valid_rows += 1;
            roster.insert(student);
        }
    }
    let dropped_rows = rows.len() - 1 - valid_rows;

    if valid_rows == 0 {
        return Err(RosterError::NoValidRows);
    }
    info!(
        "parse_roster: {} valid rows, {} dropped, {} seats",
        valid_rows,
        dropped_rows,
        roster.len()
    );
    Ok(ParsedRoster {
        roster,
        valid_rows,
        dropped_rows,
    })
}

// **** Projections ****

/// The numeral shown in the title of a group. Falls back on the number itself.
pub fn group_numeral(group: i64) -> String {
    usize::try_from(group)
        .ok()
        .and_then(|idx| GROUP_NUMERALS.get(idx))
        .map(|s| s.to_string())
        .unwrap_or_else(|| group.to_string())
}

/// Lays out the seating chart: the groups in classroom order, each with all of its seats.
pub fn seating_chart(roster: &Roster) -> Vec<Group<'_>> {
    GROUP_DISPLAY_ORDER
        .iter()
        .map(|group| {
            let seats = (1..=SEATS_PER_GROUP)
                .map(|position| {
                    let key = format!("{}-{}", group, position);
                    let student = roster.get(&key).filter(|s| s.group == *group);
                    SeatSlot {
                        key,
                        position,
                        student,
                    }
                })
                .collect();
            Group {
                number: *group,
                label: group_numeral(*group),
                seats,
            }
        })
        .collect()
}

/// The summary of the scores, by ascending roster number.
///
/// Roster numbers that are not numeric have no defined place; they are put
/// after the numeric ones, in import order.
pub fn summarize(roster: &Roster) -> Vec<SummaryLine> {
    let mut sorted: Vec<&Student> = roster.iter().collect();
    sorted.sort_by(|a, b| match (a.id.numeric_value(), b.id.numeric_value()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    sorted
        .iter()
        .map(|s| SummaryLine {
            group: s.group,
            name: s.name.clone(),
            plus_score: s.plus_score(),
            grade: s.project_grade(),
            modifier_suffix: s.project_modifier().suffix().to_string(),
            project_score: s.project_score(),
            total_score: s.total_score(),
        })
        .collect()
}

/// The rows of the exported sheet, in roster order.
pub fn export_rows(roster: &Roster, class_name: &str) -> Result<Vec<ExportRow>, RosterError> {
    if roster.is_empty() {
        return Err(RosterError::EmptyExport);
    }
    Ok(roster
        .iter()
        .map(|s| ExportRow {
            class_name: class_name.to_string(),
            group: s.group,
            id: s.id.clone(),
            name: s.name.clone(),
            plus_score: s.plus_score(),
            project_grade: format!(
                "{}{}",
                s.project_grade().label(),
                s.project_modifier().suffix()
            ),
            total_score: s.total_score(),
        })
        .collect())
}

// **** Class names ****

/// Rewrites a class name typed by the teacher: a bare number `7` becomes `7年班`.
/// Anything else is kept (trimmed).
pub fn normalize_class_name(input: &str) -> String {
    let value = input.trim();
    match value.parse::<i64>() {
        Ok(n) => format!("{}年班", n),
        Err(_) => value.to_string(),
    }
}

/// Guesses the class name from the name of the roster file.
///
/// `7年1班.xlsx`, `7-1.csv`, `701.xlsx` are all recognized. Dashes are turned
/// into `年`, so `7-1` gives `7年1`.
pub fn extract_class_name(file_name: &str) -> Option<String> {
    let base = file_name.split('.').next().unwrap_or("");
    // The first digit of the name starts the match.
    let start = base.find(|c: char| c.is_ascii_digit())?;
    let rest = &base[start..];
    let first = digit_run(rest);

    // <n>年<m>班
    if let Some(after) = rest[first..].strip_prefix('年') {
        let second = digit_run(after);
        if second > 0 && after[second..].starts_with('班') {
            let len = first + '年'.len_utf8() + second + '班'.len_utf8();
            return Some(rest[..len].to_string());
        }
    }
    // <n>-<m>
    if let Some(after) = rest[first..].strip_prefix('-') {
        let second = digit_run(after);
        if second > 0 {
            return Some(format!("{}年{}", &rest[..first], &after[..second]));
        }
    }
    // Three digits, or any number.
    Some(rest[..first.min(3)].to_string())
}
