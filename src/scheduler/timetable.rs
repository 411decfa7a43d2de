//! Timetable generation pipeline.
//!
//! # Algorithm
//!
//! 1. Validate configuration and input structure (faults → `Err`).
//! 2. Run capacity diagnostics; a blocking finding ends the request.
//! 3. Build one boolean per candidate class meeting.
//! 4. Apply the rule families and the early-period objective.
//! 5. Solve within the configured wall-clock budget.
//! 6. Extract every true variable as a schedule entry.
//! 7. Optionally audit the extracted schedule.
//!
//! Every request builds its own model, so one scheduler can serve
//! concurrent callers without locking.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Sec. 3

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn};

use super::kpi::TimetableKpi;
use crate::audit::{audit, AuditReport};
use crate::config::TimetableConfig;
use crate::cp::{
    apply_objective, ConstraintEngine, MilpSolver, SolveStatus, SolverBackend, TimetableModel,
    VariableSpace,
};
use crate::diagnostics::{diagnose, DiagnosticsReport};
use crate::error::TimetableError;
use crate::models::{DomainData, Schedule, ScheduleEntry};
use crate::validation::validate_input;

const EMPTY_SPACE_MESSAGE: &str = "No variables created. Check teaching assignments.";
const NO_SOLUTION_MESSAGE: &str =
    "Infeasible: no solution found. Check constraints or teacher workload.";

/// Input container for one timetabling request.
///
/// Deserializes from the data bundle with an optional `config` object
/// alongside the catalogs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Catalogs and curriculum relations.
    #[serde(flatten)]
    pub data: DomainData,
    /// Rule configuration.
    #[serde(default)]
    pub config: TimetableConfig,
}

impl ScheduleRequest {
    /// Creates a request with the default configuration.
    pub fn new(data: DomainData) -> Self {
        Self {
            data,
            config: TimetableConfig::default(),
        }
    }

    /// Sets the rule configuration.
    pub fn with_config(mut self, config: TimetableConfig) -> Self {
        self.config = config;
        self
    }
}

/// Wire status of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Failed,
}

/// Why a request produced no timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A group or teacher needs more periods than the week offers.
    Diagnostics,
    /// No candidate class meeting could be built.
    EmptyVariableSpace,
    /// The solver proved infeasibility or ran out of budget.
    NoSolution(SolveStatus),
}

/// Outcome of a timetabling request.
///
/// Serializes to `{status, message, data}` (plus `warnings` when any).
/// The remaining fields are for in-process callers.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResult {
    pub status: ResultStatus,
    pub message: String,
    /// Class meetings; empty on failure.
    pub data: Vec<ScheduleEntry>,
    /// Non-blocking diagnostic findings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
    /// Solver status, when the solver ran.
    #[serde(skip)]
    pub solve_status: Option<SolveStatus>,
    #[serde(skip)]
    pub diagnostics: Option<DiagnosticsReport>,
    #[serde(skip)]
    pub kpi: Option<TimetableKpi>,
    /// Present only when auditing is enabled and a schedule was produced.
    #[serde(skip)]
    pub audit: Option<AuditReport>,
}

impl ScheduleResult {
    fn failed(kind: FailureKind, message: impl Into<String>, warnings: Vec<String>) -> Self {
        Self {
            status: ResultStatus::Failed,
            message: message.into(),
            data: Vec::new(),
            warnings,
            failure: Some(kind),
            solve_status: None,
            diagnostics: None,
            kpi: None,
            audit: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    /// The entries as a `Schedule`.
    pub fn schedule(&self) -> Schedule {
        self.data.iter().cloned().collect()
    }
}

/// Builds the fully constrained model: variables, enabled rule families
/// and the objective.
pub fn build_model(data: &DomainData, config: &TimetableConfig) -> TimetableModel {
    let mut model = TimetableModel::new(VariableSpace::build(data));
    if model.variable_count() == 0 {
        return model;
    }
    let added = ConstraintEngine::new(data, config).apply(&mut model);
    apply_objective(&mut model);
    info!(
        variables = model.variable_count(),
        constraints = model.constraint_count(),
        families = added.len(),
        "model built"
    );
    model
}

/// Turns solved values into schedule entries, in variable order.
pub fn extract_schedule(model: &TimetableModel, values: &[bool]) -> Schedule {
    model
        .space()
        .iter()
        .filter(|(id, _)| values.get(id.index()).copied().unwrap_or(false))
        .map(|(_, key)| ScheduleEntry::from(key.clone()))
        .collect()
}

/// Timetable scheduler.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Day, DomainData, Room, Subject, Teacher, Timeslot};
/// use u_timetable::scheduler::TimetableScheduler;
///
/// let data = DomainData::new()
///     .with_teacher(Teacher::new("T1"))
///     .with_subject(Subject::new("S1").with_hours(2, 0))
///     .with_room(Room::new("R1").with_type("Theory"))
///     .with_timeslots(Timeslot::grid(&Day::WEEKDAYS, 6))
///     .with_teach("S1", "T1")
///     .with_registration("G1", "S1");
///
/// let result = TimetableScheduler::new().schedule(&data).unwrap();
/// assert!(result.is_success());
/// assert_eq!(result.data.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableScheduler<S: SolverBackend = MilpSolver> {
    solver: S,
    config: TimetableConfig,
    audit: bool,
}

impl TimetableScheduler {
    /// Creates a scheduler with the `good_lp` backend and default rules.
    pub fn new() -> Self {
        Self::with_solver(MilpSolver::new())
    }
}

impl Default for TimetableScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SolverBackend> TimetableScheduler<S> {
    /// Creates a scheduler on a specific backend.
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            config: TimetableConfig::default(),
            audit: false,
        }
    }

    /// Sets the rule configuration.
    pub fn with_config(mut self, config: TimetableConfig) -> Self {
        self.config = config;
        self
    }

    /// Audits every produced schedule.
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled;
        self
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Generates a timetable with the scheduler's configuration.
    ///
    /// Expected failures (overload, no variables, no solution) are
    /// `Ok` results with `ResultStatus::Failed`; only malformed input,
    /// bad configuration and backend faults are `Err`.
    pub fn schedule(&self, data: &DomainData) -> Result<ScheduleResult, TimetableError> {
        self.run(data, &self.config)
    }

    /// Generates a timetable with the request's own configuration.
    pub fn schedule_request(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResult, TimetableError> {
        self.run(&request.data, &request.config)
    }

    fn run(
        &self,
        data: &DomainData,
        config: &TimetableConfig,
    ) -> Result<ScheduleResult, TimetableError> {
        let span = info_span!(
            "timetable",
            registrations = data.register_map.len(),
            solver = self.solver.name()
        );
        let _enter = span.enter();

        config.validate()?;
        validate_input(data).map_err(TimetableError::InvalidInput)?;

        let diagnostics = diagnose(data, config);
        let warnings: Vec<String> = diagnostics.warnings().map(|i| i.message.clone()).collect();
        if !diagnostics.is_valid() {
            let message = format!("Data diagnostics failed: {}", diagnostics.summary());
            warn!("{message}");
            let mut result = ScheduleResult::failed(FailureKind::Diagnostics, message, warnings);
            result.diagnostics = Some(diagnostics);
            return Ok(result);
        }

        let model = build_model(data, config);
        if model.variable_count() == 0 {
            warn!("{EMPTY_SPACE_MESSAGE}");
            let mut result = ScheduleResult::failed(
                FailureKind::EmptyVariableSpace,
                EMPTY_SPACE_MESSAGE,
                warnings,
            );
            result.diagnostics = Some(diagnostics);
            return Ok(result);
        }

        let outcome = self.solver.solve(&model, config.time_limit())?;
        if !outcome.status.is_success() {
            warn!(status = %outcome.status, "no timetable found");
            let mut result = ScheduleResult::failed(
                FailureKind::NoSolution(outcome.status),
                NO_SOLUTION_MESSAGE,
                warnings,
            );
            result.solve_status = Some(outcome.status);
            result.diagnostics = Some(diagnostics);
            return Ok(result);
        }

        let schedule = extract_schedule(&model, &outcome.values);
        let kpi = TimetableKpi::calculate(&schedule, diagnostics.available_slots);
        info!(
            entries = schedule.entry_count(),
            objective = kpi.objective_cost,
            avg_period = kpi.avg_period,
            latest_period = kpi.latest_period,
            "schedule extracted"
        );

        let audit_report = self.audit.then(|| {
            let report = audit(&schedule, data, config);
            if !report.is_valid {
                error!(
                    violations = report.violations.len(),
                    "audit rejected a solved schedule"
                );
                for message in report.messages() {
                    error!("{message}");
                }
            }
            report
        });

        Ok(ScheduleResult {
            status: ResultStatus::Success,
            message: format!("Schedule found ({})", outcome.status),
            data: schedule.entries,
            warnings,
            failure: None,
            solve_status: Some(outcome.status),
            diagnostics: Some(diagnostics),
            kpi: Some(kpi),
            audit: audit_report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomTypePolicy;
    use crate::cp::SolveOutcome;
    use crate::error::SolverError;
    use crate::models::{Day, Room, Subject, Teacher, Timeslot};
    use crate::validation::ValidationErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing_subscriber::{fmt, EnvFilter};

    fn init_test() {
        let _ = fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_test_writer()
            .try_init();
    }

    /// Counts calls and reports a fixed outcome.
    #[derive(Debug)]
    struct StubSolver {
        calls: AtomicUsize,
        status: SolveStatus,
        all_true: bool,
    }

    impl StubSolver {
        fn returning(status: SolveStatus) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                status,
                all_true: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SolverBackend for StubSolver {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn solve(
            &self,
            model: &TimetableModel,
            _time_limit: Duration,
        ) -> Result<SolveOutcome, SolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.all_true {
                return Ok(SolveOutcome {
                    status: self.status,
                    values: vec![true; model.variable_count()],
                    elapsed: Duration::ZERO,
                });
            }
            Ok(SolveOutcome::without_solution(self.status, Duration::ZERO))
        }
    }

    /// Scenario A: 1 group, 1 theory subject (2 periods), 1 teacher,
    /// 2 theory rooms, Mon–Fri × 11 periods.
    fn scenario_a(hours: u32) -> DomainData {
        DomainData::new()
            .with_teacher(Teacher::new("T1").with_name("Teacher One"))
            .with_subject(Subject::new("S1").with_name("Mathematics").with_hours(hours, 0))
            .with_room(Room::new("R1").with_type("Theory"))
            .with_room(Room::new("R2").with_type("Theory"))
            .with_timeslots(Timeslot::grid(&Day::WEEKDAYS, 11))
            .with_teach("S1", "T1")
            .with_registration("G1", "S1")
    }

    /// Scenario C: practice subject, only theory rooms.
    fn scenario_c() -> DomainData {
        DomainData::new()
            .with_teacher(Teacher::new("T1"))
            .with_subject(Subject::new("P1").with_name("Workshop").with_hours(0, 2))
            .with_room(Room::new("R1").with_type("Theory"))
            .with_room(Room::new("R2").with_type("Theory"))
            .with_timeslots(Timeslot::grid(&Day::WEEKDAYS, 11))
            .with_teach("P1", "T1")
            .with_registration("G1", "P1")
    }

    #[test]
    fn test_scenario_a_success() {
        init_test();
        let data = scenario_a(2);
        let result = TimetableScheduler::new().schedule(&data).unwrap();

        assert!(result.is_success(), "{}", result.message);
        assert_eq!(result.message, "Schedule found (OPTIMAL)");
        assert_eq!(result.data.len(), 2);
        for e in &result.data {
            assert_eq!((e.group.as_str(), e.subject.as_str()), ("G1", "S1"));
            assert!(e.room == "R1" || e.room == "R2");
            assert_ne!(e.period, 5);
        }
        // Cheapest placement: period 1 on two different days.
        assert!(result.data.iter().all(|e| e.period == 1));
        assert_ne!(result.data[0].day, result.data[1].day);

        let kpi = result.kpi.as_ref().unwrap();
        assert!((kpi.objective_cost - 2.0).abs() < 1e-9);
        assert_eq!(result.solve_status, Some(SolveStatus::Optimal));
        assert!(result.failure.is_none());
    }

    #[test]
    fn test_scenario_a_passes_audit() {
        let result = TimetableScheduler::new()
            .with_audit(true)
            .schedule(&scenario_a(2))
            .unwrap();
        let audit = result.audit.unwrap();
        assert!(audit.is_valid, "{:?}", audit.messages());
    }

    #[test]
    fn test_scenario_b_diagnostics_abort() {
        init_test();
        let stub = StubSolver::returning(SolveStatus::Optimal);
        let scheduler = TimetableScheduler::with_solver(stub);
        let result = scheduler.schedule(&scenario_a(51)).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.failure, Some(FailureKind::Diagnostics));
        assert!(result.message.starts_with("Data diagnostics failed: "));
        assert!(result.message.contains("Group G1 needs 51 periods (max 50)"));
        assert!(result.data.is_empty());
        assert_eq!(scheduler.solver().calls(), 0);
    }

    #[test]
    fn test_scenario_c_infeasible() {
        let result = TimetableScheduler::new().schedule(&scenario_c()).unwrap();
        assert!(!result.is_success());
        assert_eq!(
            result.failure,
            Some(FailureKind::NoSolution(SolveStatus::Infeasible))
        );
        assert_eq!(result.message, NO_SOLUTION_MESSAGE);
        assert!(result.data.is_empty());
    }

    #[test]
    fn test_relaxed_policy_allows_theory_rooms_for_practice() {
        let config = TimetableConfig::default().with_room_type_policy(RoomTypePolicy::Relaxed);
        let result = TimetableScheduler::new()
            .with_config(config)
            .schedule(&scenario_c())
            .unwrap();
        assert!(result.is_success(), "{}", result.message);
        assert_eq!(result.data.len(), 2);
    }

    #[test]
    fn test_unknown_collapses_to_generic_failure() {
        let scheduler =
            TimetableScheduler::with_solver(StubSolver::returning(SolveStatus::Unknown));
        let result = scheduler.schedule(&scenario_a(2)).unwrap();
        assert_eq!(result.failure, Some(FailureKind::NoSolution(SolveStatus::Unknown)));
        assert_eq!(result.message, NO_SOLUTION_MESSAGE);
        assert_eq!(scheduler.solver().calls(), 1);
    }

    #[test]
    fn test_empty_variable_space() {
        let data = DomainData::new()
            .with_teacher(Teacher::new("T1"))
            .with_subject(Subject::new("S1").with_hours(2, 0))
            .with_room(Room::new("R1").with_type("Theory"))
            .with_timeslots(Timeslot::grid(&Day::WEEKDAYS, 11))
            .with_registration("G1", "S1");
        let scheduler =
            TimetableScheduler::with_solver(StubSolver::returning(SolveStatus::Optimal));
        let result = scheduler.schedule(&data).unwrap();

        assert_eq!(result.failure, Some(FailureKind::EmptyVariableSpace));
        assert_eq!(result.message, EMPTY_SPACE_MESSAGE);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(scheduler.solver().calls(), 0);
    }

    #[test]
    fn test_leader_avoids_meeting() {
        let data = DomainData::new()
            .with_teacher(Teacher::new("L1").with_role("Leader"))
            .with_subject(Subject::new("S1").with_hours(1, 0))
            .with_room(Room::new("R1").with_type("Theory"))
            .with_timeslots(vec![Timeslot::new(Day::Tue, 8), Timeslot::new(Day::Tue, 9)])
            .with_teach("S1", "L1")
            .with_registration("G1", "S1");
        let result = TimetableScheduler::new().schedule(&data).unwrap();

        assert!(result.is_success(), "{}", result.message);
        assert_eq!(result.data.len(), 1);
        assert_eq!((result.data[0].day, result.data[0].period), (Day::Tue, 9));
    }

    #[test]
    fn test_exclusive_lab_room() {
        let data = DomainData::new()
            .with_teacher(Teacher::new("T1"))
            .with_subject(
                Subject::new("IOT")
                    .with_name("การอินเทอร์เฟสไมโครคอนโทรลเลอร์")
                    .with_hours(0, 2),
            )
            .with_room(Room::new("L2").with_type("Lab"))
            .with_room(Room::new("R6201").with_type("Lab"))
            .with_timeslots(Timeslot::grid(&Day::WEEKDAYS, 4))
            .with_teach("IOT", "T1")
            .with_registration("G1", "IOT");
        let result = TimetableScheduler::new().schedule(&data).unwrap();

        assert!(result.is_success(), "{}", result.message);
        assert_eq!(result.data.len(), 2);
        assert!(result.data.iter().all(|e| e.room == "R6201"));
    }

    #[test]
    fn test_activity_pinned_to_window() {
        let data = DomainData::new()
            .with_teacher(Teacher::new("T1"))
            .with_subject(Subject::new("20000-2001").with_name("Homeroom").with_hours(2, 0))
            .with_room(Room::new("R1").with_type("Theory"))
            .with_timeslots(Timeslot::grid(&Day::WEEKDAYS, 11))
            .with_teach("20000-2001", "T1")
            .with_registration("G1", "20000-2001");
        let result = TimetableScheduler::new()
            .with_audit(true)
            .schedule(&data)
            .unwrap();

        assert!(result.is_success(), "{}", result.message);
        let mut slots: Vec<(Day, u32)> = result.data.iter().map(|e| (e.day, e.period)).collect();
        slots.sort();
        assert_eq!(slots, vec![(Day::Wed, 8), (Day::Wed, 9)]);
        assert!(result.audit.unwrap().is_valid);
    }

    #[test]
    fn test_uncoverable_registration_warns() {
        let data = scenario_a(2)
            .with_subject(Subject::new("S9").with_hours(1, 0))
            .with_registration("G1", "S9");
        let result = TimetableScheduler::new().schedule(&data).unwrap();

        assert!(result.is_success(), "{}", result.message);
        assert_eq!(result.data.len(), 2);
        assert_eq!(
            result.warnings,
            vec!["Group G1 is registered for S9 but no teacher is eligible to teach it".to_string()]
        );
    }

    #[test]
    fn test_audit_flags_bad_backend() {
        let stub = StubSolver {
            calls: AtomicUsize::new(0),
            status: SolveStatus::Feasible,
            all_true: true,
        };
        let result = TimetableScheduler::with_solver(stub)
            .with_audit(true)
            .schedule(&scenario_a(2))
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.data.len(), 110);
        let audit = result.audit.unwrap();
        assert!(!audit.is_valid);
        assert!(!audit.violations.is_empty());
    }

    #[test]
    fn test_invalid_input_is_error() {
        let data = scenario_a(2).with_teacher(Teacher::new("T1"));
        let err = TimetableScheduler::new().schedule(&data).unwrap_err();
        assert!(matches!(err, TimetableError::InvalidInput(_)));
    }

    #[test]
    fn test_overflowing_hours_is_error() {
        let data = scenario_a(2)
            .with_subject(Subject::new("S2").with_hours(u32::MAX, 1))
            .with_teach("S2", "T1")
            .with_registration("G1", "S2");
        let err = TimetableScheduler::new().schedule(&data).unwrap_err();
        match err {
            TimetableError::InvalidInput(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, ValidationErrorKind::InvalidHours);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_huge_hours_fail_diagnostics() {
        let data = scenario_a(u32::MAX);
        let scheduler =
            TimetableScheduler::with_solver(StubSolver::returning(SolveStatus::Optimal));
        let result = scheduler.schedule(&data).unwrap();
        assert_eq!(result.failure, Some(FailureKind::Diagnostics));
        assert_eq!(scheduler.solver().calls(), 0);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let scheduler = TimetableScheduler::new()
            .with_config(TimetableConfig::default().with_time_limit_secs(0));
        let err = scheduler.schedule(&scenario_a(2)).unwrap_err();
        assert!(matches!(err, TimetableError::InvalidConfig(_)));
    }

    #[test]
    fn test_build_model_counts() {
        let data = scenario_a(2);
        let model = build_model(&data, &TimetableConfig::default());
        assert_eq!(model.variable_count(), 110);
        assert!(model.objective().is_some());
        assert!(model.constraint_count() > 0);
    }

    #[test]
    fn test_extract_schedule_skips_false() {
        let data = scenario_a(1);
        let model = build_model(&data, &TimetableConfig::default());
        let mut values = vec![false; model.variable_count()];
        values[3] = true;
        let schedule = extract_schedule(&model, &values);
        assert_eq!(schedule.entry_count(), 1);
        let expected = model.space().key(crate::cp::VarId(3)).clone();
        assert_eq!(schedule.entries[0], ScheduleEntry::from(expected));
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "teachers": [{"teacher_id": "T1", "teacher_name": "A"}],
            "subjects": [{"subject_id": "S1", "subject_name": "Math", "theory": 1, "practice": 0, "credit": 1}],
            "rooms": [{"room_id": "R1", "room_type": "Theory"}],
            "groups": [{"group_id": "G1"}],
            "timeslots": [{"day": "Mon", "period": 1}, {"day": "Mon", "period": 2}],
            "teach_map": [{"subject_id": "S1", "teacher_id": "T1"}],
            "register_map": [{"group_id": "G1", "subject_id": "S1"}],
            "config": {"time_limit_secs": 10}
        }"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.config.time_limit_secs, 10);
        assert_eq!(request.config.lunch_period, 5);

        let result = TimetableScheduler::new().schedule_request(&request).unwrap();
        assert!(result.is_success(), "{}", result.message);
        assert_eq!(result.data[0].period, 1);
    }

    #[test]
    fn test_result_wire_shape() {
        let ok = TimetableScheduler::new().schedule(&scenario_a(1)).unwrap();
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Schedule found (OPTIMAL)");
        assert_eq!(json["data"][0]["group"], "G1");
        assert_eq!(json["data"][0]["period"], 1);
        assert!(json.get("warnings").is_none());
        assert!(json.get("kpi").is_none());

        let failed = TimetableScheduler::new().schedule(&scenario_c()).unwrap();
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["data"], serde_json::json!([]));
    }
}
