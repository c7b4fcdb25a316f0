use std::collections::HashMap;

use domain::{ClassGroupId, Day, TeacherId};
use good_lp::{variable, Expression, ProblemVariables, SolverModel, Variable};

use crate::constraints::teacher_period_sum;
use crate::prep::ModelPrep;
use crate::vars::Vars;

/// Weight of the `uniform_distribution` tie-breaker relative to the gap
/// objective's unit weight: small enough that it never overrides a
/// gap-minimizing choice, only breaks ties between otherwise-equal
/// solutions in favor of spreading a class group's lessons across the
/// week.
pub const UNIFORM_DISTRIBUTION_WEIGHT: f64 = 0.01;

/// One penalty variable per `(teacher, day, window-start)` triple, the same
/// `w[t,d,p]` the gap objective names. Declared alongside the decision
/// variables, before the model is built, because `good_lp` variables can
/// only be added to a still-mutable `ProblemVariables`.
pub struct GapPenalty {
    pub var: Variable,
    pub teacher_id: TeacherId,
    pub day: Day,
    pub window_start: u8,
}

pub fn declare_gap_penalties(prep: &ModelPrep, pvars: &mut ProblemVariables) -> Vec<GapPenalty> {
    let mut out = Vec::new();
    for &teacher_id in prep.teacher_by_id.keys() {
        for (day, window_start) in sched_core::occupancy::three_period_windows() {
            out.push(GapPenalty {
                var: pvars.add(variable().binary()),
                teacher_id,
                day,
                window_start,
            });
        }
    }
    out
}

/// Ties each penalty variable to the exact gap predicate via its clipped
/// linear relaxation `w >= occ(p) + occ(p+2) - 2*occ(p+1) - 1`, rather than
/// leaving `w` unconstrained. `occ(p)` is just the teacher's clique sum at
/// `(day, p)`: that sum is already bounded to at most 1 by the teacher
/// clique constraint, so it doubles as the 0/1 occupancy indicator without
/// a second variable.
pub fn add_gap_penalty_constraints<M: SolverModel>(
    mut model: M,
    prep: &ModelPrep,
    v: &Vars,
    penalties: &[GapPenalty],
) -> M {
    for gp in penalties {
        let p = gp.window_start;
        let occ_p = teacher_period_sum(prep, v, gp.teacher_id, gp.day, p);
        let occ_p1 = teacher_period_sum(prep, v, gp.teacher_id, gp.day, p + 1);
        let occ_p2 = teacher_period_sum(prep, v, gp.teacher_id, gp.day, p + 2);
        let two_occ_p1 = occ_p1.clone() + occ_p1;
        // w - occ(p) - occ(p+2) + 2*occ(p+1) >= -1, i.e. w >= occ(p) + occ(p+2) - 2*occ(p+1) - 1.
        let lhs = Expression::from(gp.var) - occ_p - occ_p2 + two_occ_p1;
        model = model.with(lhs.geq(-1.0));
    }
    model
}

/// One slack variable per `(class group, day)`, counting how far that
/// day's lesson count for the class group runs over its fair share of the
/// week (`total_for_class / |DAYS|`, rounded up). Grounds the
/// `uniform_distribution` toggle: an advisory soft term built in the style
/// of the gap penalty above (a declare step producing free variables, then
/// a constraint step binding each to a linear lower bound on the quantity
/// it penalizes).
pub struct UniformPenalty {
    pub var: Variable,
    pub class_group_id: ClassGroupId,
    pub day: Day,
    pub threshold: f64,
}

pub fn declare_uniform_penalties(
    prep: &ModelPrep,
    pvars: &mut ProblemVariables,
) -> Vec<UniformPenalty> {
    let mut totals: HashMap<ClassGroupId, u32> = HashMap::new();
    for row in prep.curriculum {
        *totals.entry(row.class_group_id).or_insert(0) += row.lessons_per_week;
    }

    let mut out = Vec::new();
    for (&class_group_id, &total) in &totals {
        let threshold = (total as f64 / Day::GENERATION_GRID.len() as f64).ceil();
        for day in Day::GENERATION_GRID {
            out.push(UniformPenalty {
                var: pvars.add(variable().min(0.0)),
                class_group_id,
                day,
                threshold,
            });
        }
    }
    out
}

/// Binds each slack variable to `var >= day_count(class, day) - threshold`,
/// the same clipped-lower-bound shape `add_gap_penalty_constraints` uses
/// for the gap predicate.
pub fn add_uniform_penalty_constraints<M: SolverModel>(
    mut model: M,
    prep: &ModelPrep,
    v: &Vars,
    penalties: &[UniformPenalty],
) -> M {
    for up in penalties {
        let mut day_count = Expression::from(0.0);
        for (_, var) in v.entries.iter().filter(|((g, _k, kd, _p, _r), _)| {
            *kd == up.day && prep.curriculum[*g].class_group_id == up.class_group_id
        }) {
            day_count = day_count + *var;
        }
        let lhs = Expression::from(up.var) - day_count;
        model = model.with(lhs.geq(-up.threshold));
    }
    model
}

/// Disabling a soft term (`solver_cp::SolveOptions`'s `limit_gaps`/
/// `uniform_distribution` flags) skips declaring its variables entirely
/// rather than declaring-then-zero-weighting them, so a disabled term costs
/// the solver nothing — that toggle lives one layer up, in `solver-cp`,
/// since it decides which of this module's `declare_*`/`add_*` pairs even
/// get called.
pub fn build_objective(gap_penalties: &[GapPenalty], uniform_penalties: &[UniformPenalty]) -> Expression {
    let mut objective = Expression::from(0.0);
    for gp in gap_penalties {
        objective = objective + gp.var;
    }
    for up in uniform_penalties {
        objective = objective + UNIFORM_DISTRIBUTION_WEIGHT * up.var;
    }
    objective
}
