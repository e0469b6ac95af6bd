use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Length of the training program in days. Days are numbered 1..=TOTAL_DAYS.
pub const TOTAL_DAYS: u8 = 40;

pub const DEFAULT_TRAINING_TITLE: &str = "JDVP Technical Drafting Training";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "A")]
    Absent,
    #[serde(rename = "L")]
    Late,
    #[serde(rename = "E")]
    Excused,
    #[serde(rename = "-")]
    #[default]
    None,
}

impl AttendanceStatus {
    /// Order a cell walks through when it is clicked.
    pub const CYCLE: [AttendanceStatus; 5] = [
        AttendanceStatus::None,
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::Excused,
    ];

    pub fn code(self) -> char {
        match self {
            AttendanceStatus::Present => 'P',
            AttendanceStatus::Absent => 'A',
            AttendanceStatus::Late => 'L',
            AttendanceStatus::Excused => 'E',
            AttendanceStatus::None => '-',
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::CYCLE
            .iter()
            .position(|status| *status == self)
            .unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub strand: String,
}

/// Day number to status. A missing day means `AttendanceStatus::None`.
pub type AttendanceRecord = BTreeMap<u8, AttendanceStatus>;

/// Student id to that student's per-day record.
pub type AttendanceState = BTreeMap<String, AttendanceRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub students: Vec<Student>,
    pub attendance: AttendanceState,
    #[serde(default = "default_training_title")]
    pub training_title: String,
    #[serde(default = "today_string")]
    pub start_date: String,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            students: Vec::new(),
            attendance: AttendanceState::new(),
            training_title: default_training_title(),
            start_date: today_string(),
        }
    }
}

impl AppData {
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    pub fn status(&self, student_id: &str, day: u8) -> AttendanceStatus {
        self.attendance
            .get(student_id)
            .and_then(|record| record.get(&day))
            .copied()
            .unwrap_or_default()
    }
}

fn default_training_title() -> String {
    DEFAULT_TRAINING_TITLE.to_string()
}

pub fn today_string() -> String {
    Local::now().date_naive().to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub strand: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAttendanceRequest {
    pub student_id: String,
    pub day: u8,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRequest {
    pub student_id: String,
    pub day: u8,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellResponse {
    pub student_id: String,
    pub day: u8,
    pub status: AttendanceStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    #[serde(default)]
    pub training_title: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub day: u8,
    pub label: String,
    pub present: u32,
    pub absent: u32,
    pub late: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_students: usize,
    pub total_present: u32,
    pub total_absent: u32,
    pub total_late: u32,
    pub attendance_rate: u32,
    pub daily_stats: Vec<DailyPoint>,
    pub chart_days: Vec<DailyPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_single_letter_code() {
        let json = serde_json::to_string(&AttendanceStatus::Late).unwrap();
        assert_eq!(json, "\"L\"");
        let none: AttendanceStatus = serde_json::from_str("\"-\"").unwrap();
        assert_eq!(none, AttendanceStatus::None);
    }

    #[test]
    fn cycling_five_times_returns_to_none() {
        let mut status = AttendanceStatus::None;
        let mut seen = Vec::new();
        for _ in 0..5 {
            status = status.next();
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                AttendanceStatus::Present,
                AttendanceStatus::Absent,
                AttendanceStatus::Late,
                AttendanceStatus::Excused,
                AttendanceStatus::None,
            ]
        );
    }

    #[test]
    fn app_data_uses_camel_case_and_numeric_day_keys() {
        let raw = r#"{
            "students": [{"id": "1", "name": "Ana", "schoolId": "S-1", "strand": "STEM"}],
            "attendance": {"1": {"1": "P", "2": "A"}},
            "trainingTitle": "Drafting",
            "startDate": "2026-01-05"
        }"#;
        let data: AppData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.students[0].school_id, "S-1");
        assert_eq!(data.status("1", 1), AttendanceStatus::Present);
        assert_eq!(data.status("1", 2), AttendanceStatus::Absent);
        assert_eq!(data.status("1", 3), AttendanceStatus::None);
        assert_eq!(data.status("missing", 1), AttendanceStatus::None);
    }
}
