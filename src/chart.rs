use log::{debug, info, warn};

use seating_chart::session::{ImportOutcome, Session};
use seating_chart::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use crate::args::Args;

pub mod export;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod render;

use crate::chart::io_common::InputFormat;

#[derive(Debug, Snafu)]
pub enum ChartError {
    #[snafu(display("No roster file selected: please provide an Excel or CSV file with --input"))]
    NoFileSelected {},
    #[snafu(display("Unsupported file format {path}: please import a .xlsx, .xls or .csv file"))]
    UnsupportedFormat { path: String },

    #[snafu(display("Cannot read the file {path}: please check that it is a valid Excel file"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The file {path} does not contain the worksheet {worksheet}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("The file {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot open the CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Cannot read line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },

    #[snafu(display("{source}"))]
    Roster { source: RosterError },

    #[snafu(display("Cannot write the Excel file {path}"))]
    WritingExcel {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Cannot write the summary to {path}"))]
    WritingSummary { source: std::io::Error, path: String },
    #[snafu(display("Cannot serialize the summary"))]
    SerializingJson { source: serde_json::Error },

    #[snafu(display("Cannot understand the action {action:?}: {reason}"))]
    InvalidAction { action: String, reason: String },
}

pub type ChartResult<T> = Result<T, ChartError>;

/// The largest number of bonus points one --plus action may add or remove.
pub const MAX_PLUS_STEPS: i64 = 1000;

/// A scoring action requested on the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Action {
    Grade(String, ProjectGrade),
    Modifier(String, ProjectModifier),
    Plus(String, i64),
}

fn split_action(action: &str) -> ChartResult<(String, String)> {
    match action.split_once('=') {
        Some((seat, value)) if !seat.trim().is_empty() => {
            Ok((seat.trim().to_string(), value.trim().to_string()))
        }
        _ => InvalidActionSnafu {
            action,
            reason: "expected SEAT=VALUE",
        }
        .fail(),
    }
}

/// Reads the scoring actions from the command line, in the order grades, modifiers, bonuses.
pub fn parse_actions(args: &Args) -> ChartResult<Vec<Action>> {
    let mut res: Vec<Action> = Vec::new();
    for a in args.grade.iter() {
        let (seat, value) = split_action(a)?;
        let grade = ProjectGrade::from_label(&value).context(InvalidActionSnafu {
            action: a,
            reason: "the grade must be one of 作品, A, B, C, D, E, 假",
        })?;
        res.push(Action::Grade(seat, grade));
    }
    for a in args.modifier.iter() {
        let (seat, value) = split_action(a)?;
        let modifier = ProjectModifier::from_label(&value).context(InvalidActionSnafu {
            action: a,
            reason: "the modifier must be one of 無, +, -",
        })?;
        res.push(Action::Modifier(seat, modifier));
    }
    for a in args.plus.iter() {
        let (seat, value) = split_action(a)?;
        let count = value.parse::<i64>().ok().context(InvalidActionSnafu {
            action: a,
            reason: "the bonus must be an integer",
        })?;
        ensure!(
            (-MAX_PLUS_STEPS..=MAX_PLUS_STEPS).contains(&count),
            InvalidActionSnafu {
                action: a,
                reason: format!("the bonus must be between -{0} and {0}", MAX_PLUS_STEPS),
            }
        );
        res.push(Action::Plus(seat, count));
    }
    Ok(res)
}

/// Applies the actions to the roster. Actions on an empty seat are skipped.
pub fn apply_actions(roster: &mut Roster, actions: &[Action]) {
    for action in actions {
        debug!("apply_actions: {:?}", action);
        let updated = match action {
            Action::Grade(seat, grade) => roster.set_grade(seat, *grade).cloned(),
            Action::Modifier(seat, modifier) => roster.set_modifier(seat, *modifier).cloned(),
            Action::Plus(seat, count) if *count >= 0 => {
                let mut last = roster.get(seat).cloned();
                for _ in 0..*count {
                    last = roster.increment_plus(seat).cloned();
                }
                last
            }
            Action::Plus(seat, count) => {
                let mut last = roster.get(seat).cloned();
                for _ in 0..count.unsigned_abs() {
                    last = roster.decrement_plus(seat).cloned();
                }
                last
            }
        };
        match updated {
            Some(s) => debug!(
                "apply_actions: seat {}: project {} total {}",
                s.seat,
                s.project_score(),
                s.total_score()
            ),
            None => warn!("apply_actions: skipping {:?}: nobody sits there", action),
        }
    }
}

/// Imports the roster file of the arguments into the session.
pub fn import_file(session: &mut Session, args: &Args) -> ChartResult<usize> {
    let path = args.input.clone().context(NoFileSelectedSnafu {})?;
    let format = InputFormat::detect(&path).context(UnsupportedFormatSnafu { path: path.clone() })?;
    let file_name = io_common::simplify_file_name(&path);

    let ticket = session.begin_import(&file_name);

    info!("Attempting to read roster file {:?} ({:?})", path, format);
    let rows = match format {
        InputFormat::Csv => io_csv::read_csv_rows(&path)?,
        InputFormat::Excel => io_excel::read_excel_rows(&path, args.excel_worksheet_name.as_deref())?,
    };
    debug!("import_file: {} rows read", rows.len());

    match session.complete_import(&ticket, &rows).context(RosterSnafu {})? {
        ImportOutcome::Applied { students } => {
            // The class name given on the command line wins over the file name.
            if let Some(class_name) = &args.class_name {
                session.set_class_name_input(class_name);
            }
            Ok(students)
        }
        ImportOutcome::Superseded => Ok(0),
    }
}

fn write_summary_json(session: &Session, out: &str) -> ChartResult<()> {
    let js = render::summary_json(session);
    let pretty = serde_json::to_string_pretty(&js).context(SerializingJsonSnafu {})?;
    if out == "stdout" {
        println!("{}", pretty);
    } else {
        fs::write(out, pretty).context(WritingSummarySnafu { path: out })?;
        info!("Summary written to {:?}", out);
    }
    Ok(())
}

/// Runs one import, the requested scoring actions, and the output steps.
pub fn run_chart(args: &Args) -> ChartResult<()> {
    let actions = parse_actions(args)?;

    let mut session = Session::new();
    let count = import_file(&mut session, args)?;
    println!("成功匯入 {} 位學生名單到 {}！", count, session.class_name());

    apply_actions(session.roster_mut(), &actions);

    match args.summary_json.as_deref() {
        Some(out) if !out.is_empty() => write_summary_json(&session, out)?,
        _ => {
            for line in render::chart_text(session.roster()) {
                println!("{}", line);
            }
            println!();
            for line in summarize(session.roster()) {
                println!("{}", line);
            }
        }
    }

    if let Some(dir) = &args.out {
        let rows = session.export_rows().context(RosterSnafu {})?;
        let path = export::write_scores(dir, session.class_name(), &rows)?;
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let p = dir.path().join(name);
        let mut f = fs::File::create(&p).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        p.display().to_string()
    }

    const ROSTER: &str = "座號,姓名,組別,座位\n5,王小明,2,2-3\n3,林小華,4,4-1\n8,陳大文,2,2_4\n";

    #[test]
    fn no_file_selected() {
        let mut session = Session::new();
        let res = import_file(&mut session, &Args::default());
        assert!(matches!(res, Err(ChartError::NoFileSelected {})));
    }

    #[test]
    fn unsupported_format() {
        let mut session = Session::new();
        let args = Args {
            input: Some("roster.txt".to_string()),
            ..Args::default()
        };
        let res = import_file(&mut session, &args);
        assert!(matches!(res, Err(ChartError::UnsupportedFormat { .. })));
    }

    #[test]
    fn import_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "7-1.csv", ROSTER);
        let mut session = Session::new();
        let args = Args {
            input: Some(path),
            ..Args::default()
        };
        assert_eq!(import_file(&mut session, &args).unwrap(), 2);
        assert_eq!(session.class_name(), "7年1");
        assert_eq!(session.roster().get("2-3").unwrap().name, "王小明");
        assert!(session.roster().get("2_4").is_none());
    }

    #[test]
    fn explicit_class_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "701.csv", ROSTER);
        let mut session = Session::new();
        let args = Args {
            input: Some(path),
            class_name: Some("7".to_string()),
            ..Args::default()
        };
        import_file(&mut session, &args).unwrap();
        assert_eq!(session.class_name(), "7年班");
    }

    #[test]
    fn import_missing_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "roster.csv", "座號,姓名,座位\n5,王小明,2-3\n");
        let mut session = Session::new();
        let args = Args {
            input: Some(path),
            ..Args::default()
        };
        match import_file(&mut session, &args) {
            Err(ChartError::Roster { source }) => {
                assert_eq!(source, RosterError::MissingHeaders(vec!["組別".to_string()]))
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn actions() {
        let args = Args {
            grade: vec!["2-3=B".to_string()],
            modifier: vec!["2-3=+".to_string()],
            plus: vec!["2-3=2".to_string(), "4-1=-3".to_string(), "9-9=1".to_string()],
            ..Args::default()
        };
        let actions = parse_actions(&args).unwrap();
        assert_eq!(actions.len(), 5);

        let rows: Vec<Vec<Cell>> = ROSTER
            .lines()
            .map(|l| l.split(',').map(|s| Cell::Text(s.to_string())).collect())
            .collect();
        let mut roster = parse_roster(&rows).unwrap().roster;
        apply_actions(&mut roster, &actions);
        let s = roster.get("2-3").unwrap();
        assert_eq!(s.project_score(), 95);
        assert_eq!(s.total_score(), 97);
        assert_eq!(roster.get("4-1").unwrap().total_score(), -3);
    }

    #[test]
    fn invalid_actions() {
        let bad_grade = Args {
            grade: vec!["2-3=F".to_string()],
            ..Args::default()
        };
        assert!(matches!(
            parse_actions(&bad_grade),
            Err(ChartError::InvalidAction { .. })
        ));
        let bad_plus = Args {
            plus: vec!["2-3".to_string()],
            ..Args::default()
        };
        assert!(matches!(
            parse_actions(&bad_plus),
            Err(ChartError::InvalidAction { .. })
        ));
    }

    #[test]
    fn huge_bonus_is_rejected() {
        for plus in ["2-3=9223372036854775807", "2-3=-9223372036854775808", "2-3=1001"] {
            let args = Args {
                plus: vec![plus.to_string()],
                ..Args::default()
            };
            assert!(matches!(
                parse_actions(&args),
                Err(ChartError::InvalidAction { .. })
            ));
        }
        let at_limit = Args {
            plus: vec!["2-3=1000".to_string(), "2-3=-1000".to_string()],
            ..Args::default()
        };
        assert_eq!(
            parse_actions(&at_limit).unwrap(),
            vec![
                Action::Plus("2-3".to_string(), MAX_PLUS_STEPS),
                Action::Plus("2-3".to_string(), -MAX_PLUS_STEPS)
            ]
        );
    }

    #[test]
    fn failed_import_keeps_class_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "8-3.csv", "座號,姓名,組別,座位\n");
        let mut session = Session::new();
        session.set_class_name_input("7年2班");
        let args = Args {
            input: Some(path),
            class_name: Some("9".to_string()),
            ..Args::default()
        };
        assert!(matches!(
            import_file(&mut session, &args),
            Err(ChartError::Roster {
                source: RosterError::EmptyData
            })
        ));
        assert_eq!(session.class_name(), "7年2班");
    }

    #[test]
    fn run_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "roster.csv", ROSTER);
        let json_path = dir.path().join("summary.json").display().to_string();
        let args = Args {
            input: Some(path),
            class_name: Some("7年2班".to_string()),
            grade: vec!["4-1=A".to_string()],
            out: Some(dir.path().display().to_string()),
            summary_json: Some(json_path.clone()),
            ..Args::default()
        };
        run_chart(&args).unwrap();

        let js: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(js["className"], "7年2班");
        assert_eq!(js["summary"][0]["name"], "林小華");
        assert_eq!(js["summary"][0]["totalScore"], 100);

        let exported: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.ends_with(".xlsx"))
            .collect();
        assert_eq!(exported.len(), 1);
        assert!(exported[0].starts_with("7年2班_學生總成績_"));
    }
}
