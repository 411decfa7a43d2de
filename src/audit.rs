//! Independent timetable audit.
//!
//! Re-checks a finished `Schedule` against the domain data, without
//! looking at the model or the solver. A clean solve should always pass;
//! any violation here points at a regression in the rule families.
//!
//! Checks, in reporting order:
//! 1. Lunch break
//! 2. Teacher double-booking
//! 3. Room double-booking
//! 4. Daily group limit
//! 5. Exclusive lab
//! 6. Leader meeting
//! 7. Evening theory
//! 8. Period counts per registration (and entries for unregistered pairs)
//! 9. Room-type matching
//! 10. Activity window

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::config::{RoomTypePolicy, TimetableConfig};
use crate::models::{
    DataIndex, DomainData, GroupDay, GroupSubject, RoomSlot, Schedule, ScheduleEntry,
    TeacherSlot, Violation, ViolationType,
};

/// Result of an audit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    /// No violations at all.
    pub is_valid: bool,
    /// Violations in check order.
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Violation messages in check order.
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    /// Number of violations of one type.
    pub fn count_of(&self, violation_type: &ViolationType) -> usize {
        self.violations
            .iter()
            .filter(|v| &v.violation_type == violation_type)
            .count()
    }
}

/// Audits a schedule against the domain data and rule configuration.
pub fn audit(schedule: &Schedule, data: &DomainData, config: &TimetableConfig) -> AuditReport {
    let auditor = Auditor {
        schedule,
        data,
        index: data.index(),
        config,
        violations: Vec::new(),
    };
    auditor.run()
}

struct Auditor<'a> {
    schedule: &'a Schedule,
    data: &'a DomainData,
    index: DataIndex<'a>,
    config: &'a TimetableConfig,
    violations: Vec<Violation>,
}

impl<'a> Auditor<'a> {
    fn run(mut self) -> AuditReport {
        self.lunch_break();
        self.teacher_conflict();
        self.room_conflict();
        self.daily_limit();
        self.exclusive_lab();
        self.leader_meeting();
        self.evening_theory();
        self.period_counts();
        self.room_type();
        self.activity_slot();

        AuditReport {
            is_valid: self.violations.is_empty(),
            violations: self.violations,
        }
    }

    fn push(&mut self, violation_type: ViolationType, entity_id: &str, message: String) {
        self.violations
            .push(Violation::new(violation_type, entity_id, message));
    }

    fn entries(&self) -> &'a [ScheduleEntry] {
        &self.schedule.entries
    }

    fn lunch_break(&mut self) {
        for e in self.entries() {
            if e.period == self.config.lunch_period {
                self.push(
                    ViolationType::LunchBreak,
                    &e.group,
                    format!("Lunch Break Violation: {} {} at {}", e.group, e.subject, e.slot()),
                );
            }
        }
    }

    fn teacher_conflict(&mut self) {
        let mut used = HashSet::new();
        for e in self.entries() {
            let key = TeacherSlot {
                teacher: e.teacher.clone(),
                day: e.day,
                period: e.period,
            };
            if !used.insert(key) {
                self.push(
                    ViolationType::TeacherConflict,
                    &e.teacher,
                    format!("Teacher Conflict: {} at {}", e.teacher, e.slot()),
                );
            }
        }
    }

    fn room_conflict(&mut self) {
        let mut used = HashSet::new();
        for e in self.entries() {
            let key = RoomSlot {
                room: e.room.clone(),
                day: e.day,
                period: e.period,
            };
            if !used.insert(key) {
                self.push(
                    ViolationType::RoomConflict,
                    &e.room,
                    format!("Room Conflict: {} at {}", e.room, e.slot()),
                );
            }
        }
    }

    fn daily_limit(&mut self) {
        let mut counts: BTreeMap<GroupDay, u32> = BTreeMap::new();
        for e in self.entries() {
            *counts
                .entry(GroupDay {
                    group: e.group.clone(),
                    day: e.day,
                })
                .or_insert(0) += 1;
        }
        for (key, count) in counts {
            if count > self.config.max_daily_periods {
                self.push(
                    ViolationType::DailyLimit,
                    &key.group,
                    format!(
                        "Daily Limit Exceeded: Group {} on {} has {} periods",
                        key.group, key.day, count
                    ),
                );
            }
        }
    }

    fn exclusive_lab(&mut self) {
        let config = self.config;
        let keyword = config.exclusive_lab_keyword.as_str();
        if keyword.is_empty() {
            return;
        }
        let lab = config.exclusive_lab_room.as_str();
        for e in self.entries() {
            let needs_lab = self
                .index
                .subject(&e.subject)
                .is_some_and(|s| s.name.contains(keyword));
            if needs_lab && e.room != lab {
                self.push(
                    ViolationType::ExclusiveLab,
                    &e.subject,
                    format!(
                        "Exclusive Lab Violation: {} is in {} (needs {lab})",
                        e.subject, e.room
                    ),
                );
            }
        }
    }

    fn leader_meeting(&mut self) {
        let config = self.config;
        let role = config.leader_role.as_str();
        for e in self.entries() {
            let is_leader = self.index.teacher(&e.teacher).is_some_and(|t| t.has_role(role));
            if is_leader && e.slot() == config.leader_meeting {
                self.push(
                    ViolationType::LeaderMeeting,
                    &e.teacher,
                    format!("Leader Meeting Violation: {} is busy at {}", e.teacher, e.slot()),
                );
            }
        }
    }

    fn evening_theory(&mut self) {
        for e in self.entries() {
            let has_theory = self.index.subject(&e.subject).is_some_and(|s| s.has_theory());
            if has_theory && e.period > self.config.evening_period_threshold {
                self.push(
                    ViolationType::EveningTheory,
                    &e.subject,
                    format!("Evening Theory: {} scheduled at p{}", e.subject, e.period),
                );
            }
        }
    }

    fn period_counts(&mut self) {
        let mut actual = self.schedule.counts_by_registration();

        let mut seen = HashSet::new();
        for reg in &self.data.register_map {
            let pair = GroupSubject::new(reg.group_id.as_str(), reg.subject_id.as_str());
            if !seen.insert(pair.clone()) {
                continue;
            }
            let expected = self.index.required_periods(&reg.subject_id);
            let got = actual.remove(&pair).unwrap_or(0);
            if got != expected {
                self.push(
                    ViolationType::PeriodCount,
                    &pair.group,
                    format!(
                        "Period Count Mismatch: Group {}, Subject {}. Expected {expected}, Got {got}",
                        pair.group, pair.subject
                    ),
                );
            }
        }

        let mut unregistered: Vec<(GroupSubject, u32)> = actual.into_iter().collect();
        unregistered.sort();
        for (pair, got) in unregistered {
            self.push(
                ViolationType::PeriodCount,
                &pair.group,
                format!(
                    "Unregistered Subject: Group {} has {got} periods of {}",
                    pair.group, pair.subject
                ),
            );
        }
    }

    fn room_type(&mut self) {
        let config = self.config;
        let theory_type = config.theory_room_type.as_str();
        let strict = config.room_type_policy == RoomTypePolicy::Strict;
        for e in self.entries() {
            let (Some(subject), Some(room)) =
                (self.index.subject(&e.subject), self.index.room(&e.room))
            else {
                continue;
            };
            let in_theory_room = room.is_type(theory_type);
            let broken = if subject.is_theory_only() {
                !in_theory_room
            } else {
                subject.has_practice() && strict && in_theory_room
            };
            if broken {
                self.push(
                    ViolationType::RoomType,
                    &e.subject,
                    format!(
                        "Room Type Violation: {} in {} ({})",
                        e.subject,
                        e.room,
                        room.type_name()
                    ),
                );
            }
        }
    }

    fn activity_slot(&mut self) {
        let config = self.config;
        let code = config.activity_subject.as_str();
        for e in self.entries() {
            let in_window = config.in_activity_window(e.slot());
            if (e.subject == code) != in_window {
                let message = if in_window {
                    format!(
                        "Activity Window Violation: {} scheduled at {}",
                        e.subject,
                        e.slot()
                    )
                } else {
                    format!(
                        "Activity Window Violation: {} outside its window at {}",
                        e.subject,
                        e.slot()
                    )
                };
                self.push(ViolationType::ActivitySlot, &e.subject, message);
            }
        }
    }
}
