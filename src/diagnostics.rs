//! Pre-solve feasibility diagnostics.
//!
//! A cheap capacity estimate that runs before any model is built. If a
//! group or a teacher needs more periods than the week can offer, the
//! request is rejected without invoking the solver.
//!
//! # Capacity
//! `available = |timeslots| - blocked`, where `blocked` counts catalog
//! slots on the lunch period.
//!
//! # Teacher load
//! Each registration's periods are attributed to a single representative
//! teacher: the first eligible teacher of the subject in teach-map order.
//! With several eligible teachers this undercounts the real spread, so the
//! check is an estimate, not a bound.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::config::TimetableConfig;
use crate::models::DomainData;

/// Category of a diagnostic finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A group needs more periods than are available. Blocking.
    GroupOverloaded,
    /// A representative teacher needs more periods than are available. Blocking.
    TeacherOverloaded,
    /// A representative teacher is at or above the warning ratio.
    TeacherNearCapacity,
    /// A registration's subject has no eligible teacher and can never be scheduled.
    UncoverableRegistration,
}

impl DiagnosticKind {
    /// Whether this finding aborts the pipeline.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::GroupOverloaded | DiagnosticKind::TeacherOverloaded
        )
    }
}

/// A single diagnostic finding.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticIssue {
    pub kind: DiagnosticKind,
    /// Group, teacher or `group/subject` the finding is about.
    pub entity_id: String,
    pub message: String,
}

/// Outcome of the capacity pre-check.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsReport {
    /// Size of the timeslot catalog.
    pub total_slots: u32,
    /// Catalog slots on the lunch period.
    pub blocked_slots: u32,
    /// `total_slots - blocked_slots`.
    pub available_slots: u32,
    /// Required periods per group.
    pub group_load: BTreeMap<String, u32>,
    /// Required periods per representative teacher.
    pub teacher_load: BTreeMap<String, u32>,
    /// Findings, blocking first in detection order.
    pub issues: Vec<DiagnosticIssue>,
}

impl DiagnosticsReport {
    /// No blocking findings.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.kind.is_blocking())
    }

    /// Blocking findings.
    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(|i| i.kind.is_blocking())
    }

    /// Non-blocking findings.
    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(|i| !i.kind.is_blocking())
    }

    /// Findings of one kind.
    pub fn issues_of(&self, kind: DiagnosticKind) -> Vec<&DiagnosticIssue> {
        self.issues.iter().filter(|i| i.kind == kind).collect()
    }

    /// One-line summary of the blocking findings.
    pub fn summary(&self) -> String {
        let errors: Vec<&str> = self.errors().map(|i| i.message.as_str()).collect();
        if errors.is_empty() {
            "diagnostics passed".to_string()
        } else {
            errors.join("; ")
        }
    }
}

/// Runs the capacity pre-check. Never touches any model.
pub fn diagnose(data: &DomainData, config: &TimetableConfig) -> DiagnosticsReport {
    let index = data.index();

    let total_slots = data.timeslots.len() as u32;
    let blocked_slots = data
        .timeslots
        .iter()
        .filter(|s| s.is_period(config.lunch_period))
        .count() as u32;
    let available_slots = total_slots.saturating_sub(blocked_slots);
    info!(total_slots, blocked_slots, available_slots, "diagnostics: slot capacity");

    let mut report = DiagnosticsReport {
        total_slots,
        blocked_slots,
        available_slots,
        ..Default::default()
    };

    let mut uncoverable = Vec::new();
    for reg in &data.register_map {
        let hours = index.required_periods(&reg.subject_id);
        let group_load = report.group_load.entry(reg.group_id.clone()).or_insert(0);
        *group_load = group_load.saturating_add(hours);

        match index.representative_teacher(&reg.subject_id) {
            Some(teacher) => {
                let teacher_load = report.teacher_load.entry(teacher.to_string()).or_insert(0);
                *teacher_load = teacher_load.saturating_add(hours);
            }
            None => uncoverable.push(DiagnosticIssue {
                kind: DiagnosticKind::UncoverableRegistration,
                entity_id: format!("{}/{}", reg.group_id, reg.subject_id),
                message: format!(
                    "Group {} is registered for {} but no teacher is eligible to teach it",
                    reg.group_id, reg.subject_id
                ),
            }),
        }
    }

    for (group, &load) in &report.group_load {
        if load > available_slots {
            report.issues.push(DiagnosticIssue {
                kind: DiagnosticKind::GroupOverloaded,
                entity_id: group.clone(),
                message: format!("Group {group} needs {load} periods (max {available_slots})"),
            });
        }
    }

    let warn_at = f64::from(available_slots) * config.teacher_warning_ratio;
    let mut near_capacity = Vec::new();
    for (teacher, &load) in &report.teacher_load {
        if load > available_slots {
            report.issues.push(DiagnosticIssue {
                kind: DiagnosticKind::TeacherOverloaded,
                entity_id: teacher.clone(),
                message: format!("Teacher {teacher} needs {load} periods (max {available_slots})"),
            });
        } else if available_slots > 0 && f64::from(load) >= warn_at {
            near_capacity.push(DiagnosticIssue {
                kind: DiagnosticKind::TeacherNearCapacity,
                entity_id: teacher.clone(),
                message: format!("Teacher {teacher} is very busy ({load}/{available_slots})"),
            });
        }
    }

    report.issues.extend(near_capacity);
    report.issues.extend(uncoverable);

    for issue in &report.issues {
        warn!(kind = ?issue.kind, entity = %issue.entity_id, "diagnostics: {}", issue.message);
    }
    if report.is_valid() {
        info!("diagnostics passed");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Room, Subject, Teacher, Timeslot};

    /// 5 days × 11 periods = 55 slots, 5 on the lunch period → 50 available.
    fn base_data() -> DomainData {
        DomainData::new()
            .with_teacher(Teacher::new("T1"))
            .with_teacher(Teacher::new("T2"))
            .with_room(Room::new("R1").with_type("Theory"))
            .with_timeslots(Timeslot::grid(&Day::WEEKDAYS, 11))
    }

    #[test]
    fn test_available_slots() {
        let report = diagnose(&base_data(), &TimetableConfig::default());
        assert_eq!(report.total_slots, 55);
        assert_eq!(report.blocked_slots, 5);
        assert_eq!(report.available_slots, 50);
        assert!(report.is_valid());
        assert_eq!(report.summary(), "diagnostics passed");
    }

    #[test]
    fn test_group_overload_is_blocking() {
        let data = base_data()
            .with_subject(Subject::new("S1").with_hours(30, 0))
            .with_subject(Subject::new("S2").with_hours(0, 21))
            .with_teach("S1", "T1")
            .with_teach("S2", "T2")
            .with_registration("G1", "S1")
            .with_registration("G1", "S2");

        let report = diagnose(&data, &TimetableConfig::default());
        assert!(!report.is_valid());
        assert_eq!(report.group_load["G1"], 51);
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DiagnosticKind::GroupOverloaded);
        assert!(report.summary().contains("G1 needs 51 periods (max 50)"));
    }

    #[test]
    fn test_teacher_load_uses_representative_only() {
        // S1 has two eligible teachers; all of its load lands on T1.
        let data = base_data()
            .with_subject(Subject::new("S1").with_hours(20, 0))
            .with_teach("S1", "T1")
            .with_teach("S1", "T2")
            .with_registration("G1", "S1")
            .with_registration("G2", "S1")
            .with_registration("G3", "S1");

        let report = diagnose(&data, &TimetableConfig::default());
        assert_eq!(report.teacher_load["T1"], 60);
        assert!(!report.teacher_load.contains_key("T2"));
        assert_eq!(
            report.issues_of(DiagnosticKind::TeacherOverloaded)[0].entity_id,
            "T1"
        );
        assert!(!report.is_valid());
    }

    #[test]
    fn test_teacher_near_capacity_warns_only() {
        let data = base_data()
            .with_subject(Subject::new("S1").with_hours(45, 0))
            .with_teach("S1", "T1")
            .with_registration("G1", "S1");

        let report = diagnose(&data, &TimetableConfig::default());
        assert!(report.is_valid());
        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, DiagnosticKind::TeacherNearCapacity);
    }

    /// 0.9 × 50 = 45: a load exactly on the ratio already warns.
    #[test]
    fn test_teacher_warning_boundary_is_inclusive() {
        let data = base_data()
            .with_subject(Subject::new("S1").with_hours(45, 0))
            .with_teach("S1", "T1")
            .with_registration("G1", "S1");

        let report = diagnose(&data, &TimetableConfig::default());
        assert_eq!(report.available_slots, 50);
        assert_eq!(report.teacher_load["T1"], 45);
        let near = report.issues_of(DiagnosticKind::TeacherNearCapacity);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].message, "Teacher T1 is very busy (45/50)");
    }

    #[test]
    fn test_huge_loads_saturate() {
        let data = base_data()
            .with_subject(Subject::new("S1").with_hours(u32::MAX, 0))
            .with_subject(Subject::new("S2").with_hours(u32::MAX, 0))
            .with_teach("S1", "T1")
            .with_teach("S2", "T1")
            .with_registration("G1", "S1")
            .with_registration("G1", "S2");

        let report = diagnose(&data, &TimetableConfig::default());
        assert_eq!(report.group_load["G1"], u32::MAX);
        assert_eq!(report.teacher_load["T1"], u32::MAX);
        assert!(!report.is_valid());
        assert_eq!(report.issues_of(DiagnosticKind::GroupOverloaded).len(), 1);
    }

    #[test]
    fn test_teacher_below_warning_ratio() {
        let data = base_data()
            .with_subject(Subject::new("S1").with_hours(44, 0))
            .with_teach("S1", "T1")
            .with_registration("G1", "S1");

        let report = diagnose(&data, &TimetableConfig::default());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_uncoverable_registration_reported() {
        let data = base_data()
            .with_subject(Subject::new("S1").with_hours(2, 0))
            .with_registration("G1", "S1");

        let report = diagnose(&data, &TimetableConfig::default());
        assert!(report.is_valid());
        let found = report.issues_of(DiagnosticKind::UncoverableRegistration);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entity_id, "G1/S1");
        // Group load still counts the registration.
        assert_eq!(report.group_load["G1"], 2);
        assert!(report.teacher_load.is_empty());
    }

    #[test]
    fn test_lunch_period_follows_config() {
        let config = TimetableConfig::default().with_lunch_period(12);
        let report = diagnose(&base_data(), &config);
        assert_eq!(report.blocked_slots, 0);
        assert_eq!(report.available_slots, 55);
    }
}
