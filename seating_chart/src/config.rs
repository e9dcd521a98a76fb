// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Header label of the roster number column.
pub const HEADER_ID: &str = "座號";
/// Header label of the student name column.
pub const HEADER_NAME: &str = "姓名";
/// Header label of the team column.
pub const HEADER_GROUP: &str = "組別";
/// Header label of the seat column.
pub const HEADER_SEAT: &str = "座位";

/// The four columns every roster must carry, in the order they are reported when missing.
pub const REQUIRED_HEADERS: [&str; 4] = [HEADER_ID, HEADER_NAME, HEADER_GROUP, HEADER_SEAT];

/// A raw cell, as read from a spreadsheet or a CSV file.
///
/// The readers do not interpret the content: all the validation happens in
/// [`crate::parse_roster`].
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    /// False for empty cells, empty strings, zero, NaN and `false`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Bool(b) => *b,
            Cell::Empty => false,
        }
    }

    /// The text shown to the user for this cell.
    pub fn display_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => "".to_string(),
        }
    }

    /// Parses the leading integer of the cell, the way a lenient spreadsheet user expects:
    /// `"3"`, `" 3 "` and `"3組"` all give 3.
    pub fn int_prefix(&self) -> Option<i64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Cell::Text(s) => parse_int_prefix(s),
            _ => None,
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub(crate) fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// The roster number of a student, kept as it was written in the file.
///
/// It is only used for display and for ordering the summary. It is not
/// guaranteed to be numeric nor unique.
#[derive(PartialEq, Debug, Clone)]
pub enum StudentId {
    Number(f64),
    Text(String),
}

impl StudentId {
    pub fn from_cell(cell: &Cell) -> StudentId {
        match cell {
            Cell::Number(n) => StudentId::Number(*n),
            c => StudentId::Text(c.display_text()),
        }
    }

    /// The numeric value used when sorting the summary, if there is one.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            StudentId::Number(n) if !n.is_nan() => Some(*n),
            StudentId::Number(_) => None,
            StudentId::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    // An empty string counts as zero when subtracted.
                    Some(0.0)
                } else {
                    t.parse::<f64>().ok().filter(|x| !x.is_nan())
                }
            }
        }
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{}", format_number(*n)),
            StudentId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// The qualitative mark given to the work of a student.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ProjectGrade {
    /// Not scored yet (作品).
    Unscored,
    A,
    B,
    C,
    D,
    E,
    /// Absent (假).
    Absent,
}

impl ProjectGrade {
    /// All the grades, in the order they are offered to the teacher.
    pub const ALL: [ProjectGrade; 7] = [
        ProjectGrade::Unscored,
        ProjectGrade::A,
        ProjectGrade::B,
        ProjectGrade::C,
        ProjectGrade::D,
        ProjectGrade::E,
        ProjectGrade::Absent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectGrade::Unscored => "作品",
            ProjectGrade::A => "A",
            ProjectGrade::B => "B",
            ProjectGrade::C => "C",
            ProjectGrade::D => "D",
            ProjectGrade::E => "E",
            ProjectGrade::Absent => "假",
        }
    }

    pub fn from_label(label: &str) -> Option<ProjectGrade> {
        ProjectGrade::ALL.iter().find(|g| g.label() == label).copied()
    }
}

/// The adjustment applied on top of the project grade.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ProjectModifier {
    /// No adjustment (無).
    NoModifier,
    Plus,
    Minus,
}

impl ProjectModifier {
    pub const ALL: [ProjectModifier; 3] = [
        ProjectModifier::NoModifier,
        ProjectModifier::Plus,
        ProjectModifier::Minus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectModifier::NoModifier => "無",
            ProjectModifier::Plus => "+",
            ProjectModifier::Minus => "-",
        }
    }

    pub fn from_label(label: &str) -> Option<ProjectModifier> {
        ProjectModifier::ALL
            .iter()
            .find(|m| m.label() == label)
            .copied()
    }

    /// The text appended to the grade in the summary and in the export.
    /// Empty when there is no modifier.
    pub fn suffix(&self) -> &'static str {
        match self {
            ProjectModifier::NoModifier => "",
            m => m.label(),
        }
    }
}

// ******** Output data structures *********

/// One slot of a group in the seating chart.
#[derive(PartialEq, Debug, Clone)]
pub struct SeatSlot<'a> {
    /// The seat key, `"<group>-<position>"`
    pub key: String,
    pub position: u32,
    /// None for an empty seat.
    pub student: Option<&'a crate::Student>,
}

/// A group of the seating chart, always with 6 slots.
#[derive(PartialEq, Debug, Clone)]
pub struct Group<'a> {
    pub number: i64,
    /// The numeral shown in the title of the group.
    pub label: String,
    pub seats: Vec<SeatSlot<'a>>,
}

/// A line of the score summary.
#[derive(PartialEq, Debug, Clone)]
pub struct SummaryLine {
    pub group: i64,
    pub name: String,
    pub plus_score: i64,
    pub grade: ProjectGrade,
    pub modifier_suffix: String,
    pub project_score: i64,
    pub total_score: i64,
}

impl Display for SummaryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "第 {} 組 - {}: 加分總 {} + 作品分數 ({}{}) {} = 總分 {}",
            self.group,
            self.name,
            self.plus_score,
            self.grade.label(),
            self.modifier_suffix,
            self.project_score,
            self.total_score
        )
    }
}

/// A flat row of the exported scores sheet.
#[derive(PartialEq, Debug, Clone)]
pub struct ExportRow {
    pub class_name: String,
    pub group: i64,
    pub id: StudentId,
    pub name: String,
    pub plus_score: i64,
    /// The grade and the modifier suffix, for example `B+`.
    pub project_grade: String,
    pub total_score: i64,
}

/// The column titles of the exported sheet, in order.
pub const EXPORT_HEADERS: [&str; 7] = ["班級", "組別", "座號", "姓名", "加分總", "作品分數", "總分"];

/// Errors that stop an import or an export. The previous state is never modified
/// when one of them is returned.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RosterError {
    /// There is no data row after the header.
    EmptyData,
    /// Some of the required columns are not in the header.
    MissingHeaders(Vec<String>),
    /// None of the data rows is a valid student.
    NoValidRows,
    /// There is no student to export.
    EmptyExport,
}

impl Error for RosterError {}

impl Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::EmptyData => write!(f, "The file does not contain any student row"),
            RosterError::MissingHeaders(missing) => write!(
                f,
                "The header row is missing the following columns: {}. The first row must contain {}",
                missing.join("、"),
                REQUIRED_HEADERS.join("、")
            ),
            RosterError::NoValidRows => write!(
                f,
                "No valid student row: the {} column must look like <group>-<position>, for example 1-1",
                HEADER_SEAT
            ),
            RosterError::EmptyExport => write!(f, "There is no student data to export"),
        }
    }
}
