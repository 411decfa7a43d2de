//! Teacher model.
//!
//! Teachers are the human resource of a timetable. A teacher can hold a
//! role; one distinguished role (by default `"Leader"`) carries a standing
//! meeting that blocks a fixed timeslot.

use serde::{Deserialize, Serialize};

/// A teacher who can be assigned to classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    #[serde(rename = "teacher_id")]
    pub id: String,
    /// Human-readable name.
    #[serde(rename = "teacher_name", default)]
    pub name: String,
    /// Optional organisational role (e.g. `"Leader"`).
    #[serde(default)]
    pub role: Option<String>,
}

impl Teacher {
    /// Creates a teacher with no name and no role.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            role: None,
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Whether this teacher holds the given role (exact match).
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}
