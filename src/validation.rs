//! Input validation for timetabling requests.
//!
//! Checks structural integrity of the domain data before any model is
//! built. Detects:
//! - Duplicate IDs (teachers, subjects, rooms, groups) and duplicate timeslots
//! - Curriculum relations that reference unknown entities
//! - Timeslots with a zero period ordinal
//! - Subjects whose theory + practice hours overflow
//!
//! These are faults in the data layer, not scheduling outcomes, so the
//! scheduler turns any finding into `TimetableError::InvalidInput`.

use std::collections::HashSet;

use crate::models::DomainData;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A relation references an entity that doesn't exist.
    UnknownReference,
    /// A timeslot is malformed.
    InvalidTimeslot,
    /// A subject's weekly hours cannot be represented.
    InvalidHours,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the domain data of a timetabling request.
///
/// Checks:
/// 1. No duplicate teacher, subject, room or group IDs
/// 2. No duplicate (day, period) timeslots, no period 0
/// 3. Every teach-map entry names a known subject and teacher
/// 4. Every subject's `theory + practice` fits in a `u32`
/// 5. Every registration names a known subject, and a known group when
///    a group catalog is supplied
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(data: &DomainData) -> ValidationResult {
    let mut errors = Vec::new();

    let teacher_ids = collect_unique(
        data.teachers.iter().map(|t| t.id.as_str()),
        "teacher",
        &mut errors,
    );
    let subject_ids = collect_unique(
        data.subjects.iter().map(|s| s.id.as_str()),
        "subject",
        &mut errors,
    );
    collect_unique(data.rooms.iter().map(|r| r.id.as_str()), "room", &mut errors);
    let group_ids = collect_unique(data.groups.iter().map(|g| g.id.as_str()), "group", &mut errors);

    for subject in &data.subjects {
        if subject.theory.checked_add(subject.practice).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHours,
                format!(
                    "Subject '{}' has out-of-range hours (theory {}, practice {})",
                    subject.id, subject.theory, subject.practice
                ),
            ));
        }
    }

    let mut slots = HashSet::new();
    for slot in &data.timeslots {
        if slot.period == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeslot,
                format!("Timeslot on {} has period 0 (periods are 1-based)", slot.day),
            ));
        }
        if !slots.insert(*slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate timeslot: {slot}"),
            ));
        }
    }

    for ta in &data.teach_map {
        if !subject_ids.contains(ta.subject_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Teach assignment references unknown subject '{}'", ta.subject_id),
            ));
        }
        if !teacher_ids.contains(ta.teacher_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Teach assignment references unknown teacher '{}'", ta.teacher_id),
            ));
        }
    }

    for reg in &data.register_map {
        if !subject_ids.contains(reg.subject_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!(
                    "Group '{}' is registered for unknown subject '{}'",
                    reg.group_id, reg.subject_id
                ),
            ));
        }
        if !data.groups.is_empty() && !group_ids.contains(reg.group_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Registration references unknown group '{}'", reg.group_id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    entity: &str,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
    seen
}
