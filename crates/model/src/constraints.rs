use std::collections::HashMap;

use domain::{Day, TeacherId};
use good_lp::{Expression, SolverModel};

use crate::prep::ModelPrep;
use crate::vars::Vars;

/// Constraint 1 — placement: every `(g,k)` occupies exactly one slot.
pub fn add_placement_constraints<M: SolverModel>(mut model: M, v: &Vars) -> M {
    for keys in v.keys_by_row.values() {
        // `keys` mixes every `k` of the row; split by `k` before summing.
        let mut by_k: HashMap<usize, Expression> = HashMap::new();
        for &(g, k, d, p, r) in keys {
            let var = v.x[&(g, k, d, p, r)];
            let acc = by_k.entry(k).or_insert_with(|| Expression::from(0.0));
            *acc = acc.clone() + var;
        }
        for sum in by_k.into_values() {
            model = model.with(sum.eq(1.0));
        }
    }
    model
}

/// Constraint 2 — class-group clique: at most one lesson per class per
/// `(day, period)`.
pub fn add_class_clique_constraints<M: SolverModel>(mut model: M, prep: &ModelPrep, v: &Vars) -> M {
    for class_id in prep.class_by_id.keys() {
        for d in Day::GENERATION_GRID {
            for p in periods() {
                let mut sum = Expression::from(0.0);
                for (_, var) in v.entries.iter().filter(|((g, _k, kd, kp, _r), _)| {
                    *kd == d && *kp == p && prep.curriculum[*g].class_group_id == *class_id
                }) {
                    sum = sum + *var;
                }
                model = model.with(sum.leq(1.0));
            }
        }
    }
    model
}

/// Constraint 3 — teacher clique: at most one lesson per teacher per
/// `(day, period)`.
pub fn add_teacher_clique_constraints<M: SolverModel>(
    mut model: M,
    prep: &ModelPrep,
    v: &Vars,
) -> M {
    for &teacher_id in prep.teacher_by_id.keys() {
        for d in Day::GENERATION_GRID {
            for p in periods() {
                let sum = teacher_period_sum(prep, v, teacher_id, d, p);
                model = model.with(sum.leq(1.0));
            }
        }
    }
    model
}

/// Constraint 4 — room clique: at most one lesson per room per
/// `(day, period)`.
pub fn add_room_clique_constraints<M: SolverModel>(mut model: M, prep: &ModelPrep, v: &Vars) -> M {
    for r in 0..prep.rooms.len() {
        for d in Day::GENERATION_GRID {
            for p in periods() {
                let mut sum = Expression::from(0.0);
                for (_, var) in v
                    .entries
                    .iter()
                    .filter(|((_g, _k, kd, kp, kr), _)| *kd == d && *kp == p && *kr == r)
                {
                    sum = sum + *var;
                }
                model = model.with(sum.leq(1.0));
            }
        }
    }
    model
}

/// Constraint 6 — no run of `limit + 1` consecutive periods worked by the
/// same teacher on the same day.
pub fn add_max_consecutive_constraints<M: SolverModel>(
    mut model: M,
    prep: &ModelPrep,
    v: &Vars,
) -> M {
    for (&teacher_id, teacher) in &prep.teacher_by_id {
        let limit = teacher.max_consecutive_lessons;
        if limit == 0 || limit as u8 >= periods_per_day() {
            continue;
        }
        let limit_u8 = limit as u8;
        for (d, window_start) in sched_core::occupancy::consecutive_windows(limit_u8) {
            let mut sum = Expression::from(0.0);
            for offset in 0..=limit_u8 {
                sum = sum + teacher_period_sum(prep, v, teacher_id, d, window_start + offset);
            }
            model = model.with(sum.leq(limit as f64));
        }
    }
    model
}

/// Constraint 7 — bounds total daily lessons per teacher.
pub fn add_max_per_day_constraints<M: SolverModel>(mut model: M, prep: &ModelPrep, v: &Vars) -> M {
    for (&teacher_id, teacher) in &prep.teacher_by_id {
        let limit = teacher.max_lessons_per_day;
        if limit == 0 {
            continue;
        }
        for d in Day::GENERATION_GRID {
            let mut sum = Expression::from(0.0);
            for p in periods() {
                sum = sum + teacher_period_sum(prep, v, teacher_id, d, p);
            }
            model = model.with(sum.leq(limit as f64));
        }
    }
    model
}

/// Constraint 8 — weekly activity-hours reserve: teaching load capped at
/// `floor((max_weekly_load - reserve) / (PERIOD_LENGTH_MIN / 60))` lessons
/// when the reserve is nonzero.
pub fn add_activity_hours_constraints<M: SolverModel>(
    mut model: M,
    prep: &ModelPrep,
    v: &Vars,
) -> M {
    for (&teacher_id, teacher) in &prep.teacher_by_id {
        if teacher.activity_hours_reserve == 0 {
            continue;
        }
        let available_hours =
            teacher.max_weekly_load_hours.saturating_sub(teacher.activity_hours_reserve);
        let cap = (available_hours as f64 * 60.0 / sched_core::grid::PERIOD_LENGTH_MIN as f64)
            .floor();
        let mut sum = Expression::from(0.0);
        for d in Day::GENERATION_GRID {
            for p in periods() {
                sum = sum + teacher_period_sum(prep, v, teacher_id, d, p);
            }
        }
        model = model.with(sum.leq(cap));
    }
    model
}

/// Constraint 9 — multi-site transit. Walks every unordered site pair once
/// and emits the `x1 + x2 <= 1` constraint for *both* orderings, so a
/// teacher can't be placed in site B at `p` and site A at `p+delta` any
/// more than the reverse — the symmetric cross-site case is covered either
/// way round.
pub fn add_transit_constraints<M: SolverModel>(mut model: M, prep: &ModelPrep, v: &Vars) -> M {
    if prep.site_count() <= 1 {
        return model;
    }
    let periods_per_day = periods_per_day();
    let site_ids: Vec<_> = prep.rooms_by_site.keys().copied().collect();

    for (&teacher_id, teacher) in &prep.teacher_by_id {
        if teacher.transit_time_minutes == 0 {
            continue;
        }
        let period_len = sched_core::grid::PERIOD_LENGTH_MIN;
        let slots = (teacher.transit_time_minutes + period_len - 1) / period_len;
        let slots = slots.max(1);

        for i in 0..site_ids.len() {
            for j in (i + 1)..site_ids.len() {
                let (site_a, site_b) = (site_ids[i], site_ids[j]);
                for d in Day::GENERATION_GRID {
                    for p in 0..periods_per_day {
                        for delta in 1..=slots {
                            let q = p + delta as u8;
                            if q >= periods_per_day {
                                continue;
                            }
                            let x1 = teacher_site_period_sum(prep, v, teacher_id, site_a, d, p);
                            let x2 = teacher_site_period_sum(prep, v, teacher_id, site_b, d, q);
                            model = model.with((x1 + x2).leq(1.0));

                            let x3 = teacher_site_period_sum(prep, v, teacher_id, site_b, d, p);
                            let x4 = teacher_site_period_sum(prep, v, teacher_id, site_a, d, q);
                            model = model.with((x3 + x4).leq(1.0));
                        }
                    }
                }
            }
        }
    }
    model
}

pub(crate) fn teacher_period_sum(
    prep: &ModelPrep,
    v: &Vars,
    teacher_id: TeacherId,
    d: Day,
    p: u8,
) -> Expression {
    let mut sum = Expression::from(0.0);
    for (_, var) in v.entries.iter().filter(|((g, _k, kd, kp, _r), _)| {
        *kd == d && *kp == p && prep.curriculum[*g].teacher_id == teacher_id
    }) {
        sum = sum + *var;
    }
    sum
}

fn teacher_site_period_sum(
    prep: &ModelPrep,
    v: &Vars,
    teacher_id: TeacherId,
    site_id: domain::SiteId,
    d: Day,
    p: u8,
) -> Expression {
    let room_idxs = match prep.rooms_by_site.get(&site_id) {
        Some(r) => r,
        None => return Expression::from(0.0),
    };
    let mut sum = Expression::from(0.0);
    for (_, var) in v.entries.iter().filter(|((g, _k, kd, kp, kr), _)| {
        *kd == d
            && *kp == p
            && prep.curriculum[*g].teacher_id == teacher_id
            && room_idxs.contains(kr)
    }) {
        sum = sum + *var;
    }
    sum
}

fn periods_per_day() -> u8 {
    sched_core::grid::PERIODS_PER_DAY
}

fn periods() -> impl Iterator<Item = u8> {
    0..periods_per_day()
}
