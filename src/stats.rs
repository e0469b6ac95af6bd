use crate::models::{AppData, AttendanceRecord, AttendanceStatus, DailyPoint, StatsResponse, TOTAL_DAYS};

/// Every fifth day is plotted on the dashboard chart.
const CHART_SAMPLE_EVERY: usize = 5;

/// Present/absent/late counts for one student across the whole program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentTally {
    pub present: u32,
    pub absent: u32,
    pub late: u32,
}

impl StudentTally {
    pub fn for_record(record: Option<&AttendanceRecord>) -> Self {
        let mut tally = Self::default();
        let Some(record) = record else {
            return tally;
        };
        for day in 1..=TOTAL_DAYS {
            match record.get(&day) {
                Some(AttendanceStatus::Present) => tally.present += 1,
                Some(AttendanceStatus::Absent) => tally.absent += 1,
                Some(AttendanceStatus::Late) => tally.late += 1,
                _ => {}
            }
        }
        tally
    }
}

pub fn build_stats(data: &AppData) -> StatsResponse {
    let mut daily_stats: Vec<DailyPoint> = (1..=TOTAL_DAYS)
        .map(|day| DailyPoint {
            day,
            label: format!("Day {day}"),
            present: 0,
            absent: 0,
            late: 0,
        })
        .collect();

    let mut total_present = 0u32;
    let mut total_absent = 0u32;
    let mut total_late = 0u32;

    // attendance keys with no enrolled student are never visited
    for student in &data.students {
        let Some(record) = data.attendance.get(&student.id) else {
            continue;
        };
        for point in daily_stats.iter_mut() {
            match record.get(&point.day) {
                Some(AttendanceStatus::Present) => {
                    total_present += 1;
                    point.present += 1;
                }
                Some(AttendanceStatus::Absent) => {
                    total_absent += 1;
                    point.absent += 1;
                }
                Some(AttendanceStatus::Late) => {
                    total_late += 1;
                    point.late += 1;
                }
                _ => {}
            }
        }
    }

    let chart_days = daily_stats
        .iter()
        .step_by(CHART_SAMPLE_EVERY)
        .cloned()
        .collect();

    StatsResponse {
        total_students: data.students.len(),
        total_present,
        total_absent,
        total_late,
        attendance_rate: attendance_rate(total_present, total_absent, total_late),
        daily_stats,
        chart_days,
    }
}

/// Share of marked days that were present, as a whole percentage. Excused and
/// unmarked days count on neither side; no marked days gives 0.
pub fn attendance_rate(present: u32, absent: u32, late: u32) -> u32 {
    let marked = u64::from(present) + u64::from(absent) + u64::from(late);
    if marked == 0 {
        return 0;
    }
    (f64::from(present) / marked as f64 * 100.0).round() as u32
}
