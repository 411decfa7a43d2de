//! Domain data bundle.
//!
//! The read-only input of a scheduling request: entity catalogs plus the
//! two curriculum relations. Field names follow the data layer's wire
//! shape (`teach_map`, `register_map`).

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{Registration, Room, StudentGroup, Subject, TeachAssignment, Teacher, Timeslot};

/// All entities needed to build one timetable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainData {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub groups: Vec<StudentGroup>,
    #[serde(default)]
    pub timeslots: Vec<Timeslot>,
    /// Subject → eligible teacher pairs.
    #[serde(default)]
    pub teach_map: Vec<TeachAssignment>,
    /// Group → required subject pairs.
    #[serde(default)]
    pub register_map: Vec<Registration>,
}

impl DomainData {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a student group.
    pub fn with_group(mut self, group: StudentGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Replaces the timeslot catalog.
    pub fn with_timeslots(mut self, timeslots: Vec<Timeslot>) -> Self {
        self.timeslots = timeslots;
        self
    }

    /// Declares `teacher_id` eligible for `subject_id`.
    pub fn with_teach(
        mut self,
        subject_id: impl Into<String>,
        teacher_id: impl Into<String>,
    ) -> Self {
        self.teach_map.push(TeachAssignment::new(subject_id, teacher_id));
        self
    }

    /// Registers `group_id` for `subject_id`.
    pub fn with_registration(
        mut self,
        group_id: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        self.register_map.push(Registration::new(group_id, subject_id));
        self
    }

    /// Group ids: the explicit catalog, or the registered groups in
    /// first-seen order when the catalog is empty.
    pub fn group_ids(&self) -> Vec<&str> {
        if !self.groups.is_empty() {
            return self.groups.iter().map(|g| g.id.as_str()).collect();
        }
        let mut seen = HashSet::new();
        self.register_map
            .iter()
            .map(|r| r.group_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Builds lookup tables over this bundle.
    pub fn index(&self) -> DataIndex<'_> {
        DataIndex::new(self)
    }
}

/// Borrowed lookup tables over a `DomainData`.
///
/// Built once per request; all rule families and the audit share it.
#[derive(Debug, Clone)]
pub struct DataIndex<'a> {
    subjects: HashMap<&'a str, &'a Subject>,
    rooms: HashMap<&'a str, &'a Room>,
    teachers: HashMap<&'a str, &'a Teacher>,
    /// Eligible teachers per subject, in teach-map order, without repeats.
    eligible: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> DataIndex<'a> {
    fn new(data: &'a DomainData) -> Self {
        let subjects = data.subjects.iter().map(|s| (s.id.as_str(), s)).collect();
        let rooms = data.rooms.iter().map(|r| (r.id.as_str(), r)).collect();
        let teachers = data.teachers.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut eligible: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for ta in &data.teach_map {
            let list = eligible.entry(ta.subject_id.as_str()).or_default();
            if !list.contains(&ta.teacher_id.as_str()) {
                list.push(ta.teacher_id.as_str());
            }
        }

        Self {
            subjects,
            rooms,
            teachers,
            eligible,
        }
    }

    pub fn subject(&self, id: &str) -> Option<&'a Subject> {
        self.subjects.get(id).copied()
    }

    pub fn room(&self, id: &str) -> Option<&'a Room> {
        self.rooms.get(id).copied()
    }

    pub fn teacher(&self, id: &str) -> Option<&'a Teacher> {
        self.teachers.get(id).copied()
    }

    /// Teachers eligible for a subject (empty if none).
    pub fn eligible_teachers(&self, subject_id: &str) -> &[&'a str] {
        self.eligible.get(subject_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First eligible teacher in teach-map order.
    pub fn representative_teacher(&self, subject_id: &str) -> Option<&'a str> {
        self.eligible_teachers(subject_id).first().copied()
    }

    /// Weekly periods required by a subject (0 for unknown subjects).
    pub fn required_periods(&self, subject_id: &str) -> u32 {
        self.subject(subject_id).map(Subject::required_periods).unwrap_or(0)
    }
}
