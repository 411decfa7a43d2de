//! Timetable generation for the U-Engine ecosystem.
//!
//! Builds a weekly class timetable from catalogs of teachers, subjects,
//! rooms, student groups and timeslots plus the curriculum relations
//! (who may teach what, which group takes which subject). The problem is
//! modelled as a 0-1 integer program: one boolean per candidate
//! (group, subject, teacher, room, day, period), restricted by hard rule
//! families and minimized towards early periods.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Teacher`, `Subject`, `Room`, `Timeslot`,
//!   `DomainData`, composite keys, `Schedule`
//! - **`config`**: Rule constants (`TimetableConfig`)
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown references)
//! - **`diagnostics`**: Capacity pre-check run before any model is built
//! - **`cp`**: Variable space, rule families, objective and solver backends
//! - **`scheduler`**: End-to-end pipeline, result contract and KPIs
//! - **`audit`**: Independent re-check of a finished schedule
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{Day, DomainData, Room, Subject, Teacher, Timeslot};
//! use u_timetable::scheduler::TimetableScheduler;
//!
//! let data = DomainData::new()
//!     .with_teacher(Teacher::new("T1"))
//!     .with_subject(Subject::new("S1").with_hours(1, 0))
//!     .with_room(Room::new("R1").with_type("Theory"))
//!     .with_timeslots(Timeslot::grid(&[Day::Mon], 4))
//!     .with_teach("S1", "T1")
//!     .with_registration("G1", "S1");
//!
//! let result = TimetableScheduler::new().schedule(&data).unwrap();
//! assert_eq!(result.data[0].period, 1);
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Wolsey (1998), "Integer Programming"

pub mod audit;
pub mod config;
pub mod cp;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{SolverError, TimetableError};
