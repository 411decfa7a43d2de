//! Curriculum relations.
//!
//! Two relations drive the whole variable space:
//! - `TeachAssignment`: which teachers may teach which subject.
//! - `Registration`: which student groups must take which subject.

use serde::{Deserialize, Serialize};

/// A student group (class section).
///
/// Groups carry no scheduling attributes beyond their id; extra columns
/// from the data layer are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentGroup {
    /// Unique group identifier.
    #[serde(rename = "group_id")]
    pub id: String,
}

impl StudentGroup {
    /// Creates a group.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A (subject, teacher) eligibility pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeachAssignment {
    pub subject_id: String,
    pub teacher_id: String,
}

impl TeachAssignment {
    /// Creates an eligibility pair.
    pub fn new(subject_id: impl Into<String>, teacher_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            teacher_id: teacher_id.into(),
        }
    }
}

/// A (group, subject) pair that must be fully scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registration {
    pub group_id: String,
    pub subject_id: String,
}

impl Registration {
    /// Creates a registration.
    pub fn new(group_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            subject_id: subject_id.into(),
        }
    }
}
