//! Timetable rule families.
//!
//! Each family is an independent set of hard linear restrictions over the
//! decision variables: a variable forced to false, a bounded sum, an exact
//! sum, or a pairwise equality. Families never remove variables and have
//! no priority among themselves; any broken restriction makes the model
//! infeasible.
//!
//! | Family | Restriction |
//! |--------|-------------|
//! | LunchBreak | lunch-period variables are false |
//! | DailyGroupLoad | per (group, day): Σ ≤ daily limit |
//! | TeacherConflict | per (teacher, day, period): Σ ≤ 1 |
//! | RoomConflict | per (room, day, period): Σ ≤ 1 |
//! | RoomTypeMatching | subject kind vs. room category |
//! | LeaderExemption | leaders are free at the meeting slot |
//! | ActivitySlot | activity subject only in its window, nothing else there |
//! | EveningTheory | theory subjects not after the evening threshold |
//! | ExclusiveLab | keyword subjects only in the designated lab |
//! | CurriculumFulfillment | per registration: Σ = theory + practice |
//! | JointClassLinking | joint-class sittings move in lockstep (off by default) |

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use super::model::{TimetableModel, VarId};
use crate::config::{RoomTypePolicy, TimetableConfig};
use crate::models::{
    DataIndex, DomainData, GroupDay, GroupSubject, JointSitting, RoomSlot, TeacherSlot,
    VariableKey,
};

/// A rule family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintFamily {
    LunchBreak,
    DailyGroupLoad,
    TeacherConflict,
    RoomConflict,
    RoomTypeMatching,
    LeaderExemption,
    ActivitySlot,
    EveningTheory,
    ExclusiveLab,
    CurriculumFulfillment,
    JointClassLinking,
}

impl ConstraintFamily {
    /// Every family, in application order.
    pub const ALL: [ConstraintFamily; 11] = [
        ConstraintFamily::LunchBreak,
        ConstraintFamily::DailyGroupLoad,
        ConstraintFamily::TeacherConflict,
        ConstraintFamily::RoomConflict,
        ConstraintFamily::RoomTypeMatching,
        ConstraintFamily::LeaderExemption,
        ConstraintFamily::ActivitySlot,
        ConstraintFamily::EveningTheory,
        ConstraintFamily::ExclusiveLab,
        ConstraintFamily::CurriculumFulfillment,
        ConstraintFamily::JointClassLinking,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConstraintFamily::LunchBreak => "lunch_break",
            ConstraintFamily::DailyGroupLoad => "daily_group_load",
            ConstraintFamily::TeacherConflict => "teacher_conflict",
            ConstraintFamily::RoomConflict => "room_conflict",
            ConstraintFamily::RoomTypeMatching => "room_type_matching",
            ConstraintFamily::LeaderExemption => "leader_exemption",
            ConstraintFamily::ActivitySlot => "activity_slot",
            ConstraintFamily::EveningTheory => "evening_theory",
            ConstraintFamily::ExclusiveLab => "exclusive_lab",
            ConstraintFamily::CurriculumFulfillment => "curriculum_fulfillment",
            ConstraintFamily::JointClassLinking => "joint_class_linking",
        }
    }

    /// Families enabled under a configuration: all of them, except joint
    /// classes unless switched on.
    pub fn enabled(config: &TimetableConfig) -> Vec<ConstraintFamily> {
        Self::ALL
            .into_iter()
            .filter(|f| *f != ConstraintFamily::JointClassLinking || config.joint_classes)
            .collect()
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applies rule families to a `TimetableModel`.
///
/// # Example
/// ```
/// use u_timetable::config::TimetableConfig;
/// use u_timetable::cp::{ConstraintEngine, ConstraintFamily, TimetableModel, VariableSpace};
/// use u_timetable::models::{Day, DomainData, Room, Subject, Teacher, Timeslot};
///
/// let data = DomainData::new()
///     .with_teacher(Teacher::new("T1"))
///     .with_subject(Subject::new("S1").with_hours(2, 0))
///     .with_room(Room::new("R1").with_type("Theory"))
///     .with_timeslots(Timeslot::grid(&[Day::Mon], 6))
///     .with_teach("S1", "T1")
///     .with_registration("G1", "S1");
/// let config = TimetableConfig::default();
///
/// let mut model = TimetableModel::new(VariableSpace::build(&data));
/// ConstraintEngine::new(&data, &config).apply(&mut model);
/// assert_eq!(model.count_for(ConstraintFamily::LunchBreak), 1);
/// ```
pub struct ConstraintEngine<'a> {
    data: &'a DomainData,
    index: DataIndex<'a>,
    config: &'a TimetableConfig,
    families: Vec<ConstraintFamily>,
}

impl<'a> ConstraintEngine<'a> {
    /// Creates an engine with the families enabled by `config`.
    pub fn new(data: &'a DomainData, config: &'a TimetableConfig) -> Self {
        Self {
            data,
            index: data.index(),
            config,
            families: ConstraintFamily::enabled(config),
        }
    }

    /// Replaces the family set.
    pub fn with_families(mut self, families: Vec<ConstraintFamily>) -> Self {
        self.families = families;
        self
    }

    /// Adds a family if absent.
    pub fn with_family(mut self, family: ConstraintFamily) -> Self {
        if !self.families.contains(&family) {
            self.families.push(family);
        }
        self
    }

    /// Removes a family.
    pub fn without_family(mut self, family: ConstraintFamily) -> Self {
        self.families.retain(|f| *f != family);
        self
    }

    pub fn families(&self) -> &[ConstraintFamily] {
        &self.families
    }

    /// Applies every configured family. Returns constraints added per family.
    pub fn apply(&self, model: &mut TimetableModel) -> Vec<(ConstraintFamily, usize)> {
        self.families
            .iter()
            .map(|&family| {
                let added = self.apply_family(family, model);
                debug!(family = family.name(), added, "constraint family applied");
                (family, added)
            })
            .collect()
    }

    /// Applies one family. Returns the number of constraints added.
    pub fn apply_family(&self, family: ConstraintFamily, model: &mut TimetableModel) -> usize {
        let before = model.constraint_count();
        match family {
            ConstraintFamily::LunchBreak => self.lunch_break(model),
            ConstraintFamily::DailyGroupLoad => self.daily_group_load(model),
            ConstraintFamily::TeacherConflict => self.teacher_conflict(model),
            ConstraintFamily::RoomConflict => self.room_conflict(model),
            ConstraintFamily::RoomTypeMatching => self.room_type_matching(model),
            ConstraintFamily::LeaderExemption => self.leader_exemption(model),
            ConstraintFamily::ActivitySlot => self.activity_slot(model),
            ConstraintFamily::EveningTheory => self.evening_theory(model),
            ConstraintFamily::ExclusiveLab => self.exclusive_lab(model),
            ConstraintFamily::CurriculumFulfillment => self.curriculum_fulfillment(model),
            ConstraintFamily::JointClassLinking => self.joint_class_linking(model),
        }
        model.constraint_count() - before
    }

    /// Forbids every variable matching `pred`.
    fn forbid_where<F>(&self, family: ConstraintFamily, model: &mut TimetableModel, pred: F)
    where
        F: Fn(&VariableKey) -> bool,
    {
        let doomed: Vec<VarId> = model
            .space()
            .iter()
            .filter(|(_, key)| pred(key))
            .map(|(id, _)| id)
            .collect();
        for var in doomed {
            model.forbid(family, var);
        }
    }

    /// Groups variables by a projection of their key.
    fn group_by<K, F>(model: &TimetableModel, project: F) -> HashMap<K, Vec<VarId>>
    where
        K: std::hash::Hash + Eq,
        F: Fn(&VariableKey) -> K,
    {
        let mut groups: HashMap<K, Vec<VarId>> = HashMap::new();
        for (id, key) in model.space().iter() {
            groups.entry(project(key)).or_default().push(id);
        }
        groups
    }

    /// `Σ ≤ bound` per bucket; buckets that cannot exceed the bound are skipped.
    fn bound_buckets<K>(
        family: ConstraintFamily,
        model: &mut TimetableModel,
        buckets: HashMap<K, Vec<VarId>>,
        bound: u32,
    ) {
        for vars in buckets.into_values() {
            if vars.len() > bound as usize {
                model.add_at_most(family, &vars, bound);
            }
        }
    }

    fn lunch_break(&self, model: &mut TimetableModel) {
        let lunch = self.config.lunch_period;
        self.forbid_where(ConstraintFamily::LunchBreak, model, |k| k.period == lunch);
    }

    fn daily_group_load(&self, model: &mut TimetableModel) {
        let buckets: HashMap<GroupDay, Vec<VarId>> = Self::group_by(model, VariableKey::group_day);
        Self::bound_buckets(
            ConstraintFamily::DailyGroupLoad,
            model,
            buckets,
            self.config.max_daily_periods,
        );
    }

    fn teacher_conflict(&self, model: &mut TimetableModel) {
        let buckets: HashMap<TeacherSlot, Vec<VarId>> =
            Self::group_by(model, VariableKey::teacher_slot);
        Self::bound_buckets(ConstraintFamily::TeacherConflict, model, buckets, 1);
    }

    fn room_conflict(&self, model: &mut TimetableModel) {
        let buckets: HashMap<RoomSlot, Vec<VarId>> = Self::group_by(model, VariableKey::room_slot);
        Self::bound_buckets(ConstraintFamily::RoomConflict, model, buckets, 1);
    }

    fn room_type_matching(&self, model: &mut TimetableModel) {
        let theory_type = self.config.theory_room_type.as_str();
        let strict = self.config.room_type_policy == RoomTypePolicy::Strict;
        self.forbid_where(ConstraintFamily::RoomTypeMatching, model, |k| {
            let (Some(subject), Some(room)) =
                (self.index.subject(&k.subject), self.index.room(&k.room))
            else {
                return false;
            };
            if subject.is_theory_only() {
                !room.is_type(theory_type)
            } else if subject.has_practice() {
                strict && room.is_type(theory_type)
            } else {
                false
            }
        });
    }

    fn leader_exemption(&self, model: &mut TimetableModel) {
        let meeting = self.config.leader_meeting;
        let role = self.config.leader_role.as_str();
        self.forbid_where(ConstraintFamily::LeaderExemption, model, |k| {
            k.slot() == meeting
                && self
                    .index
                    .teacher(&k.teacher)
                    .is_some_and(|t| t.has_role(role))
        });
    }

    fn activity_slot(&self, model: &mut TimetableModel) {
        let code = self.config.activity_subject.as_str();
        self.forbid_where(ConstraintFamily::ActivitySlot, model, |k| {
            let in_window = self.config.in_activity_window(k.slot());
            (k.subject == code) != in_window
        });
    }

    fn evening_theory(&self, model: &mut TimetableModel) {
        let threshold = self.config.evening_period_threshold;
        self.forbid_where(ConstraintFamily::EveningTheory, model, |k| {
            k.period > threshold
                && self
                    .index
                    .subject(&k.subject)
                    .is_some_and(|s| s.has_theory())
        });
    }

    fn exclusive_lab(&self, model: &mut TimetableModel) {
        let keyword = self.config.exclusive_lab_keyword.as_str();
        if keyword.is_empty() {
            return;
        }
        let lab = self.config.exclusive_lab_room.as_str();
        self.forbid_where(ConstraintFamily::ExclusiveLab, model, |k| {
            k.room != lab
                && self
                    .index
                    .subject(&k.subject)
                    .is_some_and(|s| s.name.contains(keyword))
        });
    }

    fn curriculum_fulfillment(&self, model: &mut TimetableModel) {
        let buckets: HashMap<GroupSubject, Vec<VarId>> =
            Self::group_by(model, VariableKey::group_subject);

        let mut seen = HashSet::new();
        for reg in &self.data.register_map {
            let pair = GroupSubject::new(reg.group_id.as_str(), reg.subject_id.as_str());
            if !seen.insert(pair.clone()) {
                continue;
            }
            let Some(vars) = buckets.get(&pair) else {
                debug!(
                    group = %pair.group,
                    subject = %pair.subject,
                    "no variables, curriculum rule skipped"
                );
                continue;
            };
            let required = self.index.required_periods(&reg.subject_id);
            model.add_exactly(ConstraintFamily::CurriculumFulfillment, vars, required);
        }
    }

    fn joint_class_linking(&self, model: &mut TimetableModel) {
        let mut sittings: HashMap<JointSitting, Vec<VarId>> = HashMap::new();
        for (id, key) in model.space().iter() {
            if self.config.is_joint_subject(&key.subject) {
                sittings.entry(key.joint_sitting()).or_default().push(id);
            }
        }
        for vars in sittings.into_values() {
            for pair in vars.windows(2) {
                model.add_equal(ConstraintFamily::JointClassLinking, pair[0], pair[1]);
            }
        }
    }
}
