//! Timetable generation pipeline and KPI evaluation.
//!
//! # Pipeline
//!
//! `TimetableScheduler` validates the request, runs the capacity
//! diagnostics, builds the 0-1 model, solves it within a wall-clock
//! budget and extracts the timetable. Expected failures are reported as
//! `ScheduleResult`s with `ResultStatus::Failed`, never as errors.
//!
//! # KPI
//!
//! `TimetableKpi` summarizes a produced timetable: objective cost,
//! average and latest period, daily spread, teacher and room utilization.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod kpi;
mod timetable;

pub use kpi::TimetableKpi;
pub use timetable::{
    build_model, extract_schedule, FailureKind, ResultStatus, ScheduleRequest, ScheduleResult,
    TimetableScheduler,
};
