use crate::model::{Marks, Student};
use serde::Serialize;

pub const DEFAULT_PASS_MARK: i64 = 40;
pub const DEFAULT_ATTENDANCE_THRESHOLD: i64 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub pass_mark: i64,
    pub attendance: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pass_mark: DEFAULT_PASS_MARK,
            attendance: DEFAULT_ATTENDANCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Good,
    Low,
}

pub fn outcome(mark: f64, pass_mark: i64) -> Outcome {
    if mark >= pass_mark as f64 {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}

/// Computed in f64 so that extreme marks cannot overflow.
pub fn average(marks: &Marks) -> f64 {
    (marks.weekend as f64 + marks.mid as f64) / 2.0
}

/// Half-up rounding to a whole percent, as shown on student cards.
pub fn display_percent(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

pub fn attendance_status(attendance: i64, threshold: i64) -> AttendanceStatus {
    if attendance >= threshold {
        AttendanceStatus::Good
    } else {
        AttendanceStatus::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    pub average: f64,
    pub display_average: i64,
    pub overall: Outcome,
    pub weekend: Outcome,
    pub mid: Outcome,
    pub attendance: AttendanceStatus,
    pub signed_by_mentor: bool,
    pub signed_by_principal: bool,
}

pub fn student_report(s: &Student, t: Thresholds) -> StudentReport {
    let avg = average(&s.marks);
    StudentReport {
        average: avg,
        display_average: display_percent(avg),
        overall: outcome(avg, t.pass_mark),
        weekend: outcome(s.marks.weekend as f64, t.pass_mark),
        mid: outcome(s.marks.mid as f64, t.pass_mark),
        attendance: attendance_status(s.attendance, t.attendance),
        signed_by_mentor: s.signatures.mentor.as_deref().is_some_and(|p| !p.is_empty()),
        signed_by_principal: s
            .signatures
            .principal
            .as_deref()
            .is_some_and(|p| !p.is_empty()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub total: usize,
    pub passed: usize,
    pub low_attendance: usize,
}

pub fn class_summary(students: &[Student], t: Thresholds) -> ClassSummary {
    // Uses the unrounded average: 39.5 does not pass.
    let passed = students
        .iter()
        .filter(|s| outcome(average(&s.marks), t.pass_mark) == Outcome::Pass)
        .count();
    let low_attendance = students
        .iter()
        .filter(|s| attendance_status(s.attendance, t.attendance) == AttendanceStatus::Low)
        .count();
    ClassSummary {
        total: students.len(),
        passed,
        low_attendance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_students;

    #[test]
    fn pass_mark_is_inclusive() {
        assert_eq!(outcome(40.0, 40), Outcome::Pass);
        assert_eq!(outcome(39.5, 40), Outcome::Fail);
        assert_eq!(attendance_status(75, 75), AttendanceStatus::Good);
        assert_eq!(attendance_status(74, 75), AttendanceStatus::Low);
    }

    #[test]
    fn display_average_rounds_half_up() {
        assert_eq!(display_percent(47.5), 48);
        assert_eq!(display_percent(81.5), 82);
        assert_eq!(display_percent(90.0), 90);
    }

    #[test]
    fn seeded_class_summary() {
        let summary = class_summary(&seed_students(), Thresholds::default());
        assert_eq!(
            summary,
            ClassSummary {
                total: 3,
                passed: 3,
                low_attendance: 1
            }
        );
    }

    #[test]
    fn report_flags_individual_assessments() {
        let mut s = seed_students().remove(2);
        s.marks = Marks { weekend: 35, mid: 50 };
        let r = student_report(&s, Thresholds::default());
        assert_eq!(r.weekend, Outcome::Fail);
        assert_eq!(r.mid, Outcome::Pass);
        assert_eq!(r.overall, Outcome::Pass);
        assert_eq!(r.display_average, 43);
        assert_eq!(r.attendance, AttendanceStatus::Low);
        assert!(!r.signed_by_mentor);
    }

    #[test]
    fn extreme_marks_do_not_overflow() {
        let mut students = seed_students();
        students[0].marks = Marks {
            weekend: i64::MAX,
            mid: 1,
        };
        students[1].marks = Marks {
            weekend: i64::MIN,
            mid: -1,
        };
        let top = student_report(&students[0], Thresholds::default());
        assert_eq!(top.overall, Outcome::Pass);
        let bottom = student_report(&students[1], Thresholds::default());
        assert_eq!(bottom.overall, Outcome::Fail);
        assert_eq!(bottom.mid, Outcome::Fail);

        let summary = class_summary(&students, Thresholds::default());
        assert_eq!(summary.passed, 2);
    }

    #[test]
    fn empty_signature_payload_is_not_a_signature() {
        let mut s = seed_students().remove(0);
        s.signatures.mentor = Some(String::new());
        s.signatures.principal = Some("data:image/png;base64,UA==".into());
        let r = student_report(&s, Thresholds::default());
        assert!(!r.signed_by_mentor);
        assert!(r.signed_by_principal);
    }
}
