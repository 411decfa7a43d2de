//! Composite keys.
//!
//! Every aggregation in the rule families and in the audit groups
//! assignments by one of these projections of a `VariableKey`. Sharing the
//! key types keeps the model and the audit in agreement about what
//! "the same teacher slot" or "the same group day" means.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Day, Timeslot};

/// Full identity of one decision: group × subject × teacher × room × day × period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableKey {
    pub group: String,
    pub subject: String,
    pub teacher: String,
    pub room: String,
    pub day: Day,
    pub period: u32,
}

/// (teacher, day, period): at most one class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeacherSlot {
    pub teacher: String,
    pub day: Day,
    pub period: u32,
}

/// (room, day, period): at most one class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomSlot {
    pub room: String,
    pub day: Day,
    pub period: u32,
}

/// (group, day): bounded daily load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupDay {
    pub group: String,
    pub day: Day,
}

/// (group, subject): exact weekly period count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupSubject {
    pub group: String,
    pub subject: String,
}

/// (subject, teacher, room, day, period): shared sitting for joint classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointSitting {
    pub subject: String,
    pub teacher: String,
    pub room: String,
    pub day: Day,
    pub period: u32,
}

impl VariableKey {
    pub fn new(
        group: impl Into<String>,
        subject: impl Into<String>,
        teacher: impl Into<String>,
        room: impl Into<String>,
        slot: Timeslot,
    ) -> Self {
        Self {
            group: group.into(),
            subject: subject.into(),
            teacher: teacher.into(),
            room: room.into(),
            day: slot.day,
            period: slot.period,
        }
    }

    pub fn slot(&self) -> Timeslot {
        Timeslot::new(self.day, self.period)
    }

    pub fn teacher_slot(&self) -> TeacherSlot {
        TeacherSlot {
            teacher: self.teacher.clone(),
            day: self.day,
            period: self.period,
        }
    }

    pub fn room_slot(&self) -> RoomSlot {
        RoomSlot {
            room: self.room.clone(),
            day: self.day,
            period: self.period,
        }
    }

    pub fn group_day(&self) -> GroupDay {
        GroupDay {
            group: self.group.clone(),
            day: self.day,
        }
    }

    pub fn group_subject(&self) -> GroupSubject {
        GroupSubject {
            group: self.group.clone(),
            subject: self.subject.clone(),
        }
    }

    pub fn joint_sitting(&self) -> JointSitting {
        JointSitting {
            subject: self.subject.clone(),
            teacher: self.teacher.clone(),
            room: self.room.clone(),
            day: self.day,
            period: self.period,
        }
    }
}

impl GroupSubject {
    pub fn new(group: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            subject: subject.into(),
        }
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}@{} p{}",
            self.group, self.subject, self.teacher, self.room, self.day, self.period
        )
    }
}
