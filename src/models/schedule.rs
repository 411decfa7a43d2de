//! Timetable (solution) model.
//!
//! A schedule is an unordered set of class meetings, each binding a
//! group and subject to a teacher, a room and a (day, period) cell.
//! Violations are produced by the audit, never by the solver path.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Day, GroupSubject, Timeslot, VariableKey};

/// One class meeting.
///
/// Serialized as `{group, subject, teacher, room, day, period}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub group: String,
    pub subject: String,
    pub teacher: String,
    pub room: String,
    pub day: Day,
    pub period: u32,
}

/// A complete timetable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Class meetings, in extraction order.
    pub entries: Vec<ScheduleEntry>,
}

/// A rule broken by a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Broken rule.
    pub violation_type: ViolationType,
    /// Related entity (teacher, room, group or subject id).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of timetable rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Class placed in the lunch period.
    LunchBreak,
    /// Teacher double-booked.
    TeacherConflict,
    /// Room double-booked.
    RoomConflict,
    /// Group exceeds the daily period limit.
    DailyLimit,
    /// Keyword subject outside its designated lab.
    ExclusiveLab,
    /// Leader teaching during the standing meeting.
    LeaderMeeting,
    /// Theory subject after the evening threshold.
    EveningTheory,
    /// Scheduled periods differ from required periods.
    PeriodCount,
    /// Subject placed in a room of the wrong category.
    RoomType,
    /// Activity subject outside its window, or another subject inside it.
    ActivitySlot,
}

impl ScheduleEntry {
    pub fn new(
        group: impl Into<String>,
        subject: impl Into<String>,
        teacher: impl Into<String>,
        room: impl Into<String>,
        day: Day,
        period: u32,
    ) -> Self {
        Self {
            group: group.into(),
            subject: subject.into(),
            teacher: teacher.into(),
            room: room.into(),
            day,
            period,
        }
    }

    #[inline]
    pub fn slot(&self) -> Timeslot {
        Timeslot::new(self.day, self.period)
    }

    /// The decision key this entry corresponds to.
    pub fn key(&self) -> VariableKey {
        VariableKey::new(
            self.group.clone(),
            self.subject.clone(),
            self.teacher.clone(),
            self.room.clone(),
            self.slot(),
        )
    }
}

impl From<VariableKey> for ScheduleEntry {
    fn from(key: VariableKey) -> Self {
        Self {
            group: key.group,
            subject: key.subject,
            teacher: key.teacher,
            room: key.room,
            day: key.day,
            period: key.period,
        }
    }
}

impl Violation {
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries for a group.
    pub fn entries_for_group(&self, group: &str) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.group == group).collect()
    }

    /// All entries taught by a teacher.
    pub fn entries_for_teacher(&self, teacher: &str) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.teacher == teacher).collect()
    }

    /// All entries held in a room.
    pub fn entries_for_room(&self, room: &str) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.room == room).collect()
    }

    /// Scheduled period count per (group, subject).
    pub fn counts_by_registration(&self) -> HashMap<GroupSubject, u32> {
        let mut counts = HashMap::new();
        for e in &self.entries {
            *counts
                .entry(GroupSubject::new(e.group.clone(), e.subject.clone()))
                .or_insert(0) += 1;
        }
        counts
    }

    /// Entries sorted by (group, day, period) for display.
    pub fn sorted(&self) -> Vec<&ScheduleEntry> {
        let mut sorted: Vec<&ScheduleEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            (a.group.as_str(), a.day, a.period).cmp(&(b.group.as_str(), b.day, b.period))
        });
        sorted
    }
}

impl FromIterator<ScheduleEntry> for Schedule {
    fn from_iter<I: IntoIterator<Item = ScheduleEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
