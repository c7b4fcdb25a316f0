use std::collections::HashSet;
use std::time::Duration;

use domain::{ClassGroupId, Day, ResponseStatus, TeacherId};
use model::ModelPrep;

use crate::SolveReport;

/// First-fit placement with no backtracking — a last resort used only when
/// the `with-milp` feature is off, kept so the crate still builds without a
/// system CBC library. It respects the three clique constraints and the
/// day-level block but does not attempt the consecutive/per-day/activity-
/// hours/transit constraints; it can neither prove optimality nor prove
/// infeasibility, so it never reports `OPTIMAL` or `INFEASIBLE`.
pub fn solve_greedy(prep: &ModelPrep) -> SolveReport {
    let mut occ_teacher: HashSet<(TeacherId, Day, u8)> = HashSet::new();
    let mut occ_class: HashSet<(ClassGroupId, Day, u8)> = HashSet::new();
    let mut occ_room: HashSet<(usize, Day, u8)> = HashSet::new();
    let mut placed = Vec::new();
    let mut any_missed = false;

    for (g, row) in prep.curriculum.iter().enumerate() {
        if !prep.teacher_by_id.contains_key(&row.teacher_id) {
            any_missed = true;
            continue;
        }
        for k in 0..row.lessons_per_week as usize {
            let mut found = false;
            'search: for d in Day::GENERATION_GRID {
                if prep.is_blocked(row.teacher_id, d) {
                    continue;
                }
                for p in 0..sched_core::grid::PERIODS_PER_DAY {
                    if occ_teacher.contains(&(row.teacher_id, d, p))
                        || occ_class.contains(&(row.class_group_id, d, p))
                    {
                        continue;
                    }
                    for r in 0..prep.rooms.len() {
                        if occ_room.contains(&(r, d, p)) {
                            continue;
                        }
                        occ_teacher.insert((row.teacher_id, d, p));
                        occ_class.insert((row.class_group_id, d, p));
                        occ_room.insert((r, d, p));
                        placed.push((g, k, d, p, r));
                        found = true;
                        break 'search;
                    }
                }
            }
            if !found {
                any_missed = true;
            }
        }
    }

    SolveReport {
        status: if any_missed {
            ResponseStatus::Unknown
        } else {
            ResponseStatus::Feasible
        },
        elapsed: Duration::ZERO,
        placed,
    }
}
