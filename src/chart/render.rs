// Text and JSON renderings of the seating chart and of the summary.

use seating_chart::session::Session;
use seating_chart::*;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;

/// What is shown for a seat without student.
pub const EMPTY_SEAT: &str = "空位";

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SeatOutput {
    pub seat: String,
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "plusScore")]
    pub plus_score: Option<i64>,
    #[serde(rename = "projectGrade")]
    pub project_grade: Option<String>,
    #[serde(rename = "projectModifier")]
    pub project_modifier: Option<String>,
    #[serde(rename = "totalScore")]
    pub total_score: Option<i64>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub group: i64,
    pub name: String,
    #[serde(rename = "plusScore")]
    pub plus_score: i64,
    #[serde(rename = "projectGrade")]
    pub project_grade: String,
    #[serde(rename = "projectScore")]
    pub project_score: i64,
    #[serde(rename = "totalScore")]
    pub total_score: i64,
}

fn seat_output(slot: &SeatSlot) -> SeatOutput {
    let s = slot.student;
    SeatOutput {
        seat: slot.key.clone(),
        id: s.map(|s| s.id.to_string()),
        name: s.map(|s| s.name.clone()),
        plus_score: s.map(|s| s.plus_score()),
        project_grade: s.map(|s| s.project_grade().label().to_string()),
        project_modifier: s.map(|s| s.project_modifier().label().to_string()),
        total_score: s.map(|s| s.total_score()),
    }
}

pub fn group_title(group: &Group) -> String {
    format!("第 {} 組", group.label)
}

/// The seating chart, one line per seat under the title of each group.
pub fn chart_text(roster: &Roster) -> Vec<String> {
    let mut l: Vec<String> = Vec::new();
    for group in seating_chart(roster) {
        l.push(group_title(&group));
        for slot in group.seats.iter() {
            let line = match slot.student {
                Some(s) => format!(
                    "  {} {} 座號 {} | {}{} | 加分總: {}",
                    slot.key,
                    s.name,
                    s.id,
                    s.project_grade().label(),
                    s.project_modifier().suffix(),
                    s.plus_score()
                ),
                None => format!("  {} {}", slot.key, EMPTY_SEAT),
            };
            l.push(line);
        }
    }
    l
}

pub fn summary_json(session: &Session) -> JSValue {
    let groups: Vec<JSValue> = seating_chart(session.roster())
        .iter()
        .map(|g| {
            let seats: Vec<SeatOutput> = g.seats.iter().map(seat_output).collect();
            json!({"group": g.number, "title": group_title(g), "seats": seats})
        })
        .collect();
    let summary: Vec<SummaryOutput> = summarize(session.roster())
        .into_iter()
        .map(|line| SummaryOutput {
            group: line.group,
            name: line.name,
            plus_score: line.plus_score,
            project_grade: format!("{}{}", line.grade.label(), line.modifier_suffix),
            project_score: line.project_score,
            total_score: line.total_score,
        })
        .collect();
    json!({
        "className": session.class_name(),
        "chart": groups,
        "summary": summary,
    })
}
