//! Room model.
//!
//! Rooms are the space resource of a timetable. Each room has a free-form
//! type category; one category (by default `"Theory"`) denotes lecture
//! rooms, every other category is some kind of lab.

use serde::{Deserialize, Serialize};

/// A room that can host classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    #[serde(rename = "room_id")]
    pub id: String,
    /// Human-readable name.
    #[serde(rename = "room_name", default)]
    pub name: Option<String>,
    /// Type category (e.g. `"Theory"`, `"Computer Lab"`).
    #[serde(rename = "room_type", default)]
    pub room_type: Option<String>,
}

impl Room {
    /// Creates an untyped room.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            room_type: None,
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the type category.
    pub fn with_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = Some(room_type.into());
        self
    }

    /// Type category, empty when unset.
    pub fn type_name(&self) -> &str {
        self.room_type.as_deref().unwrap_or("")
    }

    /// Whether the room belongs to the given category.
    pub fn is_type(&self, room_type: &str) -> bool {
        self.type_name() == room_type
    }
}
