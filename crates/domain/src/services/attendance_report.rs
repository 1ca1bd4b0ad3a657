//! Per-course attendance report.
//!
//! Combines a course's events, its attendance records and the enrollments
//! the requestor may see into per-student statistics. The caller decides
//! which enrollments are visible; the report never filters them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::models::{Attendance, Enrollment, Event};

/// Event summary as listed in the report header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEvent {
    pub id: i64,
    pub name: String,
}

/// One student's attendance across every event of the course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentAttendanceRecord {
    pub email: String,
    pub attend_sum: usize,
    pub attend_percent: f64,
    /// Exactly one entry per report event: 1 if attended, else 0.
    pub event_attendance: BTreeMap<i64, u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceReport {
    pub course_name: String,
    pub generated_at: DateTime<Utc>,
    pub events: Vec<ReportEvent>,
    pub student_records: Vec<StudentAttendanceRecord>,
}

impl AttendanceReport {
    pub fn build(
        course_name: impl Into<String>,
        events: &[Event],
        attendances: &[Attendance],
        enrollments: &[Enrollment],
    ) -> Self {
        Self::build_at(course_name, events, attendances, enrollments, Utc::now())
    }

    /// Builds the report with an explicit generation timestamp.
    pub fn build_at(
        course_name: impl Into<String>,
        events: &[Event],
        attendances: &[Attendance],
        enrollments: &[Enrollment],
        generated_at: DateTime<Utc>,
    ) -> Self {
        // (account_id, event_id) pairs with at least one check-in
        let attended: HashSet<(i64, i64)> = attendances
            .iter()
            .map(|a| (a.account_id, a.event_id))
            .collect();

        let student_records = enrollments
            .iter()
            .map(|enrollment| {
                let event_attendance: BTreeMap<i64, u8> = events
                    .iter()
                    .map(|event| {
                        let hit = attended.contains(&(enrollment.account_id, event.id));
                        (event.id, u8::from(hit))
                    })
                    .collect();
                let attend_sum = event_attendance.values().filter(|&&v| v == 1).count();

                StudentAttendanceRecord {
                    email: enrollment.participant.email.clone(),
                    attend_sum,
                    attend_percent: attend_percent(attend_sum, events.len()),
                    event_attendance,
                }
            })
            .collect();

        Self {
            course_name: course_name.into(),
            generated_at,
            events: events
                .iter()
                .map(|e| ReportEvent {
                    id: e.id,
                    name: e.name.clone(),
                })
                .collect(),
            student_records,
        }
    }

    pub fn student_count(&self) -> usize {
        self.student_records.len()
    }
}

fn attend_percent(attend_sum: usize, event_count: usize) -> f64 {
    if event_count == 0 {
        return 0.0;
    }
    attend_sum as f64 / event_count as f64 * 100.0
}
