//! Rule configuration.
//!
//! Every fixed constant used by the rule families lives here, with the
//! institution's standing values as defaults. The struct is plain serde
//! data so that the hosting service can load it from whatever source it
//! uses; this crate never reads files or the environment.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::TimetableError;
use crate::models::{Day, Timeslot};

/// How strictly subjects are matched to room categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomTypePolicy {
    /// Theory-only subjects use theory rooms; subjects with practice
    /// never use theory rooms.
    #[default]
    Strict,
    /// Theory-only subjects still use theory rooms, but subjects with
    /// practice may fall back to theory rooms.
    Relaxed,
}

/// Configuration for model construction, diagnostics, solving and audit.
///
/// # Example
/// ```
/// use u_timetable::config::TimetableConfig;
///
/// let config = TimetableConfig::default()
///     .with_joint_classes(true)
///     .with_time_limit_secs(10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Period reserved for lunch on every day.
    pub lunch_period: u32,
    /// Maximum periods a group may attend in one day.
    pub max_daily_periods: u32,
    /// Room category for lecture rooms.
    pub theory_room_type: String,
    /// Room-type matching strictness.
    pub room_type_policy: RoomTypePolicy,
    /// Teacher role that attends the standing meeting.
    pub leader_role: String,
    /// Slot of the standing meeting.
    pub leader_meeting: Timeslot,
    /// Subject code pinned to the activity window.
    pub activity_subject: String,
    /// Day of the activity window.
    pub activity_day: Day,
    /// Periods of the activity window.
    pub activity_periods: Vec<u32>,
    /// Theory subjects may not be placed after this period.
    pub evening_period_threshold: u32,
    /// Subjects whose name contains this keyword need the exclusive lab.
    pub exclusive_lab_keyword: String,
    /// Room id of the exclusive lab.
    pub exclusive_lab_room: String,
    /// Leading characters of subject codes taught as joint classes.
    pub joint_class_prefixes: Vec<char>,
    /// Link joint-class groups into lockstep sittings.
    pub joint_classes: bool,
    /// Teacher load ratio (of available slots) that triggers a warning.
    pub teacher_warning_ratio: f64,
    /// Wall-clock budget for the solver, in seconds.
    pub time_limit_secs: u64,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            lunch_period: 5,
            max_daily_periods: 10,
            theory_room_type: "Theory".to_string(),
            room_type_policy: RoomTypePolicy::Strict,
            leader_role: "Leader".to_string(),
            leader_meeting: Timeslot::new(Day::Tue, 8),
            activity_subject: "20000-2001".to_string(),
            activity_day: Day::Wed,
            activity_periods: vec![8, 9],
            evening_period_threshold: 9,
            exclusive_lab_keyword: "การอินเทอร์เฟส".to_string(),
            exclusive_lab_room: "R6201".to_string(),
            joint_class_prefixes: vec!['2', '3'],
            joint_classes: false,
            teacher_warning_ratio: 0.9,
            time_limit_secs: 60,
        }
    }
}

impl TimetableConfig {
    /// Sets the lunch period.
    pub fn with_lunch_period(mut self, period: u32) -> Self {
        self.lunch_period = period;
        self
    }

    /// Sets the daily period limit per group.
    pub fn with_max_daily_periods(mut self, limit: u32) -> Self {
        self.max_daily_periods = limit;
        self
    }

    /// Sets the room-type policy.
    pub fn with_room_type_policy(mut self, policy: RoomTypePolicy) -> Self {
        self.room_type_policy = policy;
        self
    }

    /// Enables or disables joint-class linking.
    pub fn with_joint_classes(mut self, enabled: bool) -> Self {
        self.joint_classes = enabled;
        self
    }

    /// Sets the solver budget in seconds.
    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Sets the exclusive lab keyword and room.
    pub fn with_exclusive_lab(
        mut self,
        keyword: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        self.exclusive_lab_keyword = keyword.into();
        self.exclusive_lab_room = room.into();
        self
    }

    /// Solver budget.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    /// Whether a slot falls inside the activity window.
    pub fn in_activity_window(&self, slot: Timeslot) -> bool {
        slot.day == self.activity_day && self.activity_periods.contains(&slot.period)
    }

    /// Whether a subject code marks a joint class.
    pub fn is_joint_subject(&self, subject_id: &str) -> bool {
        subject_id
            .chars()
            .next()
            .is_some_and(|c| self.joint_class_prefixes.contains(&c))
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.max_daily_periods == 0 {
            return Err(TimetableError::InvalidConfig(
                "max_daily_periods must be positive".into(),
            ));
        }
        if self.theory_room_type.trim().is_empty() {
            return Err(TimetableError::InvalidConfig(
                "theory_room_type must not be empty".into(),
            ));
        }
        if !(self.teacher_warning_ratio > 0.0 && self.teacher_warning_ratio <= 1.0) {
            return Err(TimetableError::InvalidConfig(format!(
                "teacher_warning_ratio must be in (0, 1], got {}",
                self.teacher_warning_ratio
            )));
        }
        if self.time_limit_secs == 0 {
            return Err(TimetableError::InvalidConfig(
                "time_limit_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
