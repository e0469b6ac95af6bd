//! CSV and JSON encodings of the roster, plus backup import.

use crate::errors::AttendanceError;
use crate::models::{AppData, TOTAL_DAYS};
use crate::stats::StudentTally;
use chrono::NaiveDate;

const CSV_LINE_END: &str = "\r\n";

pub fn csv_filename(date: NaiveDate) -> String {
    format!("JDVP_Attendance_40Days_{}.csv", date.format("%Y-%m-%d"))
}

pub fn json_filename(date: NaiveDate) -> String {
    format!("JDVP_Backup_{}.json", date.format("%Y-%m-%d"))
}

/// Spreadsheet export: one row per student in roster order, a status code per
/// day, then that student's present/absent/late totals.
pub fn to_csv(data: &AppData) -> String {
    let mut header = vec![
        "Student ID".to_string(),
        "Name".to_string(),
        "School ID".to_string(),
        "Strand".to_string(),
    ];
    header.extend((1..=TOTAL_DAYS).map(|day| format!("Day {day}")));
    header.extend(
        ["Total Present", "Total Absent", "Total Late"]
            .iter()
            .map(|label| label.to_string()),
    );

    let mut out = header.join(",");
    out.push_str(CSV_LINE_END);

    for student in &data.students {
        let record = data.attendance.get(&student.id);
        let tally = StudentTally::for_record(record);

        let mut row = vec![
            quote(&student.id),
            quote(&student.name),
            quote(&student.school_id),
            quote(&student.strand),
        ];
        row.extend((1..=TOTAL_DAYS).map(|day| data.status(&student.id, day).code().to_string()));
        row.push(tally.present.to_string());
        row.push(tally.absent.to_string());
        row.push(tally.late.to_string());

        out.push_str(&row.join(","));
        out.push_str(CSV_LINE_END);
    }

    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Backup encoding. Also the on-disk persistence format.
pub fn to_json(data: &AppData) -> Result<String, AttendanceError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Validates an uploaded backup and decodes it. The caller's current state is
/// only replaced when this returns `Ok`.
pub fn parse_backup(raw: &str) -> Result<AppData, AttendanceError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| AttendanceError::InvalidBackup(format!("not valid JSON ({err})")))?;

    let Some(object) = value.as_object() else {
        return Err(AttendanceError::InvalidBackup(
            "expected a JSON object".to_string(),
        ));
    };
    let missing: Vec<&str> = ["students", "attendance"]
        .into_iter()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(AttendanceError::InvalidBackup(format!(
            "missing required keys: {}",
            missing.join(", ")
        )));
    }

    let data: AppData = serde_json::from_value(value)
        .map_err(|err| AttendanceError::InvalidBackup(err.to_string()))?;

    for (student_id, record) in &data.attendance {
        if let Some(day) = record.keys().find(|day| !(1..=TOTAL_DAYS).contains(*day)) {
            return Err(AttendanceError::InvalidBackup(format!(
                "student '{student_id}' has a record for day {day}"
            )));
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, Student};
    use crate::roster;

    fn ana() -> AppData {
        let mut data = AppData::default();
        data.students.push(Student {
            id: "1".to_string(),
            name: "Ana".to_string(),
            school_id: String::new(),
            strand: String::new(),
        });
        data.attendance.insert(
            "1".to_string(),
            [(1, AttendanceStatus::Present), (2, AttendanceStatus::Absent)]
                .into_iter()
                .collect(),
        );
        data
    }

    #[test]
    fn csv_header_lists_every_day_and_totals() {
        let csv = to_csv(&AppData::default());
        let header = csv.strip_suffix("\r\n").unwrap();
        let columns: Vec<&str> = header.split(',').collect();
        assert_eq!(columns.len(), 4 + usize::from(TOTAL_DAYS) + 3);
        assert_eq!(&columns[..5], &["Student ID", "Name", "School ID", "Strand", "Day 1"]);
        assert_eq!(columns[43], "Day 40");
        assert_eq!(&columns[44..], &["Total Present", "Total Absent", "Total Late"]);
    }

    #[test]
    fn csv_row_for_single_student() {
        let csv = to_csv(&ana());
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "");

        let mut expected = String::from("\"1\",\"Ana\",\"\",\"\",P,A");
        for _ in 0..38 {
            expected.push_str(",-");
        }
        expected.push_str(",1,1,0");
        assert_eq!(lines[1], expected);
    }

    #[test]
    fn csv_escapes_quotes_and_commas_in_text_fields() {
        let mut data = AppData::default();
        data.students.push(Student {
            id: "7".to_string(),
            name: "Cruz, \"JD\" Juan".to_string(),
            school_id: "S,1".to_string(),
            strand: "ICT".to_string(),
        });
        let csv = to_csv(&data);

        let mut reader = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "Cruz, \"JD\" Juan");
        assert_eq!(&rows[0][2], "S,1");
        assert_eq!(rows[0].len(), 47);
    }

    #[test]
    fn filenames_embed_export_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(csv_filename(date), "JDVP_Attendance_40Days_2026-03-09.csv");
        assert_eq!(json_filename(date), "JDVP_Backup_2026-03-09.json");
    }

    #[test]
    fn json_uses_two_space_indent_and_stable_field_order() {
        let json = to_json(&ana()).unwrap();
        assert!(json.starts_with("{\n  \"students\": ["));
        let students = json.find("\"students\"").unwrap();
        let attendance = json.find("\"attendance\"").unwrap();
        let title = json.find("\"trainingTitle\"").unwrap();
        let start = json.find("\"startDate\"").unwrap();
        assert!(students < attendance && attendance < title && title < start);
    }

    #[test]
    fn json_backup_round_trips_mutated_data() {
        let data = AppData::default();
        let data = roster::add_student(
            &data,
            Student {
                id: "a".to_string(),
                name: "Ana".to_string(),
                school_id: "S-1".to_string(),
                strand: "STEM".to_string(),
            },
        )
        .unwrap();
        let data = roster::set_attendance(&data, "a", 40, AttendanceStatus::Late).unwrap();
        let data = roster::update_settings(&data, Some("Welding NC II"), None).unwrap();

        let decoded = parse_backup(&to_json(&data).unwrap()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn empty_backup_is_accepted() {
        let data = parse_backup(r#"{"students":[],"attendance":{}}"#).unwrap();
        assert!(data.students.is_empty());
        assert!(data.attendance.is_empty());
        assert!(!data.training_title.is_empty());
    }

    #[test]
    fn backup_without_required_keys_is_rejected() {
        let err = parse_backup(r#"{"foo":1}"#).unwrap_err();
        assert!(err.to_string().contains("students, attendance"));
        assert!(matches!(parse_backup("[]"), Err(AttendanceError::InvalidBackup(_))));
        assert!(matches!(parse_backup("not json"), Err(AttendanceError::InvalidBackup(_))));
    }

    #[test]
    fn backup_with_malformed_cells_is_rejected() {
        let bad_status = r#"{"students":[],"attendance":{"1":{"1":"X"}}}"#;
        assert!(matches!(parse_backup(bad_status), Err(AttendanceError::InvalidBackup(_))));

        let bad_day = r#"{"students":[],"attendance":{"1":{"first":"P"}}}"#;
        assert!(matches!(parse_backup(bad_day), Err(AttendanceError::InvalidBackup(_))));

        let out_of_range = r#"{"students":[],"attendance":{"1":{"41":"P"}}}"#;
        let err = parse_backup(out_of_range).unwrap_err();
        assert!(err.to_string().contains("day 41"));
    }

    #[test]
    fn backup_with_stale_attendance_keys_is_accepted() {
        let raw = r#"{"students":[],"attendance":{"gone":{"3":"P"}},"trainingTitle":"T","startDate":"2026-01-05"}"#;
        let data = parse_backup(raw).unwrap();
        assert!(data.attendance.contains_key("gone"));
        assert_eq!(data.training_title, "T");
    }
}
