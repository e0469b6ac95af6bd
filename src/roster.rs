//! Pure state transitions over an `AppData` snapshot.
//!
//! Every function borrows the current snapshot and hands back a new one, or an
//! error with the input left as it was. Persisting the result is the caller's
//! job (see `AppState::commit`).

use crate::errors::AttendanceError;
use crate::models::{AppData, AttendanceStatus, Student, TOTAL_DAYS};
use chrono::NaiveDate;

pub fn add_student(snapshot: &AppData, student: Student) -> Result<AppData, AttendanceError> {
    let id = student.id.trim().to_string();
    if id.is_empty() {
        return Err(AttendanceError::EmptyId);
    }
    let name = student.name.trim().to_string();
    if name.is_empty() {
        return Err(AttendanceError::EmptyName);
    }
    if snapshot.student(&id).is_some() {
        return Err(AttendanceError::DuplicateStudent(id));
    }

    let mut next = snapshot.clone();
    next.students.push(Student {
        id,
        name,
        school_id: student.school_id.trim().to_string(),
        strand: student.strand.trim().to_string(),
    });
    Ok(next)
}

/// Drops the student and every attendance cell keyed to them. Unknown ids are
/// a no-op.
pub fn remove_student(snapshot: &AppData, id: &str) -> AppData {
    let mut next = snapshot.clone();
    next.students.retain(|student| student.id != id);
    next.attendance.remove(id);
    next
}

pub fn set_attendance(
    snapshot: &AppData,
    student_id: &str,
    day: u8,
    status: AttendanceStatus,
) -> Result<AppData, AttendanceError> {
    ensure_day(day)?;
    if snapshot.student(student_id).is_none() {
        return Err(AttendanceError::UnknownStudent(student_id.to_string()));
    }

    let mut next = snapshot.clone();
    if status == AttendanceStatus::None {
        // unmarked cells are stored as absent keys
        if let Some(record) = next.attendance.get_mut(student_id) {
            record.remove(&day);
            if record.is_empty() {
                next.attendance.remove(student_id);
            }
        }
    } else {
        next.attendance
            .entry(student_id.to_string())
            .or_default()
            .insert(day, status);
    }
    Ok(next)
}

/// Advances one cell along `AttendanceStatus::CYCLE`.
pub fn cycle_attendance(
    snapshot: &AppData,
    student_id: &str,
    day: u8,
) -> Result<(AppData, AttendanceStatus), AttendanceError> {
    ensure_day(day)?;
    let status = snapshot.status(student_id, day).next();
    let next = set_attendance(snapshot, student_id, day, status)?;
    Ok((next, status))
}

pub fn update_settings(
    snapshot: &AppData,
    training_title: Option<&str>,
    start_date: Option<&str>,
) -> Result<AppData, AttendanceError> {
    let mut next = snapshot.clone();
    if let Some(title) = training_title {
        let title = title.trim();
        if title.is_empty() {
            return Err(AttendanceError::EmptyTitle);
        }
        next.training_title = title.to_string();
    }
    if let Some(date) = start_date {
        let date = date.trim();
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AttendanceError::InvalidDate(date.to_string()))?;
        next.start_date = parsed.to_string();
    }
    Ok(next)
}

fn ensure_day(day: u8) -> Result<(), AttendanceError> {
    if (1..=TOTAL_DAYS).contains(&day) {
        Ok(())
    } else {
        Err(AttendanceError::DayOutOfRange(day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::build_stats;

    fn student(id: &str, name: &str) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            school_id: String::new(),
            strand: String::new(),
        }
    }

    fn roster() -> AppData {
        let data = AppData::default();
        let data = add_student(&data, student("1", "Ana")).unwrap();
        add_student(&data, student("2", "Ben")).unwrap()
    }

    #[test]
    fn add_student_appends_in_order_and_trims() {
        let data = add_student(&roster(), student(" 3 ", "  Cara ")).unwrap();
        let names: Vec<_> = data.students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ben", "Cara"]);
        assert_eq!(data.students[2].id, "3");
        assert!(data.attendance.is_empty());
    }

    #[test]
    fn add_student_rejects_blank_name_and_duplicate_id() {
        let data = roster();
        assert!(matches!(
            add_student(&data, student("9", "   ")),
            Err(AttendanceError::EmptyName)
        ));
        assert!(matches!(
            add_student(&data, student("1", "Another Ana")),
            Err(AttendanceError::DuplicateStudent(id)) if id == "1"
        ));
        assert_eq!(data.students.len(), 2);
    }

    #[test]
    fn remove_student_purges_attendance() {
        let data = set_attendance(&roster(), "1", 3, AttendanceStatus::Late).unwrap();
        let data = set_attendance(&data, "2", 3, AttendanceStatus::Present).unwrap();

        let before = build_stats(&data);
        assert_eq!((before.total_present, before.total_late), (1, 1));

        let after = remove_student(&data, "1");
        let stats = build_stats(&after);
        assert_eq!(stats.total_late, 0);
        assert_eq!(stats.total_present, 1);
        assert_eq!(stats.daily_stats[2].late, 0);
        assert_eq!(stats.total_students, 1);
        assert!(after.student("1").is_none());
        assert!(!after.attendance.contains_key("1"));
        assert_eq!(after.status("2", 3), AttendanceStatus::Present);

        let unchanged = remove_student(&after, "nobody");
        assert_eq!(unchanged, after);
    }

    #[test]
    fn set_attendance_rejects_out_of_range_days() {
        let data = roster();
        for day in [0, TOTAL_DAYS + 1, u8::MAX] {
            let err = set_attendance(&data, "1", day, AttendanceStatus::Present).unwrap_err();
            assert!(matches!(err, AttendanceError::DayOutOfRange(d) if d == day));
        }
        assert!(data.attendance.is_empty());
    }

    #[test]
    fn set_attendance_is_idempotent_and_leaves_input_alone() {
        let data = roster();
        let once = set_attendance(&data, "2", 40, AttendanceStatus::Excused).unwrap();
        let twice = set_attendance(&once, "2", 40, AttendanceStatus::Excused).unwrap();
        assert_eq!(once, twice);
        assert!(data.attendance.is_empty());
    }

    #[test]
    fn set_attendance_to_none_clears_the_cell() {
        let data = set_attendance(&roster(), "1", 1, AttendanceStatus::Present).unwrap();
        let cleared = set_attendance(&data, "1", 1, AttendanceStatus::None).unwrap();
        assert!(!cleared.attendance.contains_key("1"));
    }

    #[test]
    fn set_attendance_requires_enrolled_student() {
        let err = set_attendance(&roster(), "ghost", 1, AttendanceStatus::Present).unwrap_err();
        assert!(matches!(err, AttendanceError::UnknownStudent(_)));
    }

    #[test]
    fn cycle_wraps_back_to_none_after_five_clicks() {
        let mut data = roster();
        let mut last = AttendanceStatus::None;
        for _ in 0..5 {
            let (next, status) = cycle_attendance(&data, "1", 7).unwrap();
            data = next;
            last = status;
        }
        assert_eq!(last, AttendanceStatus::None);
        assert_eq!(data.status("1", 7), AttendanceStatus::None);
        assert!(data.attendance.is_empty());
    }

    #[test]
    fn update_settings_validates_title_and_date() {
        let data = roster();
        let updated = update_settings(&data, Some(" Welding "), Some("2026-02-01")).unwrap();
        assert_eq!(updated.training_title, "Welding");
        assert_eq!(updated.start_date, "2026-02-01");

        assert!(matches!(
            update_settings(&data, Some(""), None),
            Err(AttendanceError::EmptyTitle)
        ));
        assert!(matches!(
            update_settings(&data, None, Some("02/01/2026")),
            Err(AttendanceError::InvalidDate(_))
        ));
    }
}
