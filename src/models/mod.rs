//! Timetabling domain models.
//!
//! Provides the read-only input entities of a scheduling request and the
//! types that describe its solution.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | Training Center | Clinic Rota |
//! |-------------|--------|-----------------|-------------|
//! | Teacher | Instructor | Trainer | Physician |
//! | Subject | Course | Module | Service |
//! | Room | Classroom / Lab | Workshop | Consulting room |
//! | StudentGroup | Class section | Cohort | Patient list |
//! | Schedule | Weekly timetable | Course plan | Weekly rota |

mod calendar;
mod curriculum;
mod data;
mod keys;
mod room;
mod schedule;
mod subject;
mod teacher;

pub use calendar::{Day, Timeslot};
pub use curriculum::{Registration, StudentGroup, TeachAssignment};
pub use data::{DataIndex, DomainData};
pub use keys::{GroupDay, GroupSubject, JointSitting, RoomSlot, TeacherSlot, VariableKey};
pub use room::Room;
pub use schedule::{Schedule, ScheduleEntry, Violation, ViolationType};
pub use subject::Subject;
pub use teacher::Teacher;
