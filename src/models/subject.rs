//! Subject model.
//!
//! A subject carries its weekly load as theory and practice hours. The
//! number of periods a registered group must attend per week is
//! `theory + practice`; credits are descriptive only.

use serde::{Deserialize, Serialize};

/// A subject in the curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject code (e.g. `"30901-2003"`).
    #[serde(rename = "subject_id")]
    pub id: String,
    /// Human-readable name.
    #[serde(rename = "subject_name", default)]
    pub name: String,
    /// Weekly theory hours.
    #[serde(default)]
    pub theory: u32,
    /// Weekly practice hours.
    #[serde(default)]
    pub practice: u32,
    /// Credit count (not used for load).
    #[serde(default)]
    pub credit: u32,
}

impl Subject {
    /// Creates a subject with zero hours.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            theory: 0,
            practice: 0,
            credit: 0,
        }
    }

    /// Sets the subject name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets theory and practice hours.
    pub fn with_hours(mut self, theory: u32, practice: u32) -> Self {
        self.theory = theory;
        self.practice = practice;
        self
    }

    /// Sets the credit count.
    pub fn with_credit(mut self, credit: u32) -> Self {
        self.credit = credit;
        self
    }

    /// Weekly periods a registered group must attend (saturating).
    #[inline]
    pub fn required_periods(&self) -> u32 {
        self.theory.saturating_add(self.practice)
    }

    /// Theory hours only, no practice.
    #[inline]
    pub fn is_theory_only(&self) -> bool {
        self.theory > 0 && self.practice == 0
    }

    /// Any practice hours at all.
    #[inline]
    pub fn has_practice(&self) -> bool {
        self.practice > 0
    }

    /// Any theory hours at all.
    #[inline]
    pub fn has_theory(&self) -> bool {
        self.theory > 0
    }
}
