//! Timetable quality metrics (KPIs).
//!
//! Computed from a finished schedule and the usable slot count.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Objective cost | Σ period² over all entries |
//! | Average period | Mean period ordinal |
//! | Latest period | Largest period ordinal |
//! | Entries per day | Class meetings per weekday |
//! | Teacher utilization | Periods taught / usable slots |
//! | Room utilization | Periods occupied / usable slots |
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Sec. 2

use std::collections::{BTreeMap, HashMap};

use crate::cp::period_cost;
use crate::models::{Day, Schedule};

/// Timetable performance indicators.
#[derive(Debug, Clone, Default)]
pub struct TimetableKpi {
    /// Σ period² (the minimized objective).
    pub objective_cost: f64,
    /// Mean period ordinal (0.0 for an empty schedule).
    pub avg_period: f64,
    /// Latest period used (0 for an empty schedule).
    pub latest_period: u32,
    /// Class meetings per day.
    pub entries_per_day: BTreeMap<Day, usize>,
    /// Per-teacher share of usable slots (0.0..1.0).
    pub teacher_utilization: HashMap<String, f64>,
    /// Per-room share of usable slots (0.0..1.0).
    pub room_utilization: HashMap<String, f64>,
    /// Mean teacher utilization.
    pub avg_teacher_utilization: f64,
    /// Mean room utilization.
    pub avg_room_utilization: f64,
}

impl TimetableKpi {
    /// Computes KPIs from a schedule.
    ///
    /// # Arguments
    /// * `schedule` - The extracted timetable.
    /// * `available_slots` - Usable (non-lunch) slots per week.
    pub fn calculate(schedule: &Schedule, available_slots: u32) -> Self {
        let mut objective_cost = 0.0;
        let mut period_sum: u64 = 0;
        let mut latest_period = 0;
        let mut entries_per_day = BTreeMap::new();
        let mut teacher_periods: HashMap<String, u32> = HashMap::new();
        let mut room_periods: HashMap<String, u32> = HashMap::new();

        for e in &schedule.entries {
            objective_cost += period_cost(e.period);
            period_sum += u64::from(e.period);
            latest_period = latest_period.max(e.period);
            *entries_per_day.entry(e.day).or_insert(0) += 1;
            *teacher_periods.entry(e.teacher.clone()).or_insert(0) += 1;
            *room_periods.entry(e.room.clone()).or_insert(0) += 1;
        }

        let avg_period = if schedule.is_empty() {
            0.0
        } else {
            period_sum as f64 / schedule.entry_count() as f64
        };

        let teacher_utilization = utilization(teacher_periods, available_slots);
        let room_utilization = utilization(room_periods, available_slots);

        Self {
            objective_cost,
            avg_period,
            latest_period,
            entries_per_day,
            avg_teacher_utilization: mean(&teacher_utilization),
            avg_room_utilization: mean(&room_utilization),
            teacher_utilization,
            room_utilization,
        }
    }

    /// Whether the timetable stays within the given period thresholds.
    pub fn meets_thresholds(&self, max_latest_period: u32, max_avg_period: f64) -> bool {
        self.latest_period <= max_latest_period && self.avg_period <= max_avg_period
    }
}

fn utilization(periods: HashMap<String, u32>, available_slots: u32) -> HashMap<String, f64> {
    periods
        .into_iter()
        .map(|(id, n)| {
            let share = if available_slots == 0 {
                0.0
            } else {
                f64::from(n) / f64::from(available_slots)
            };
            (id, share)
        })
        .collect()
}

fn mean(values: &HashMap<String, f64>) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.values().sum::<f64>() / values.len() as f64
    }
}
