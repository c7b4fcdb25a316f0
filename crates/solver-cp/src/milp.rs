use std::time::{Duration, Instant};

use domain::ResponseStatus;
use good_lp::{default_solver, ProblemVariables, Solution, SolverModel};
use model::{
    add_activity_hours_constraints, add_class_clique_constraints, add_gap_penalty_constraints,
    add_max_consecutive_constraints, add_max_per_day_constraints, add_placement_constraints,
    add_room_clique_constraints, add_teacher_clique_constraints, add_transit_constraints,
    add_uniform_penalty_constraints, build_objective, declare_decision_vars,
    declare_gap_penalties, declare_uniform_penalties, ModelPrep,
};
use tracing::{info, warn};

use crate::{SolveOptions, SolveReport};

/// `good_lp`'s CBC binding exposes no deadline parameter, so this can't
/// preempt a long solve; it only measures how long `model.solve()` actually
/// took and downgrades `OPTIMAL` to `FEASIBLE` when that exceeds the
/// caller's budget — the same "advisory, checked after the fact" budget
/// the wall-clock contract allows.
pub fn solve_with_cbc(
    prep: &ModelPrep,
    wall_clock: Duration,
    options: SolveOptions,
) -> anyhow::Result<SolveReport> {
    let mut pvars = ProblemVariables::new();
    let vars = declare_decision_vars(prep, sched_core::grid::PERIODS_PER_DAY, &mut pvars);
    if vars.entries.is_empty() {
        return Ok(SolveReport {
            status: ResponseStatus::Infeasible,
            elapsed: Duration::ZERO,
            placed: Vec::new(),
        });
    }
    let gap_penalties = if options.limit_gaps {
        declare_gap_penalties(prep, &mut pvars)
    } else {
        Vec::new()
    };
    let uniform_penalties = if options.uniform_distribution {
        declare_uniform_penalties(prep, &mut pvars)
    } else {
        Vec::new()
    };
    let objective = build_objective(&gap_penalties, &uniform_penalties);

    let mut model = pvars.minimise(objective).using(default_solver);
    model = add_placement_constraints(model, &vars);
    model = add_class_clique_constraints(model, prep, &vars);
    model = add_teacher_clique_constraints(model, prep, &vars);
    model = add_room_clique_constraints(model, prep, &vars);
    model = add_max_consecutive_constraints(model, prep, &vars);
    model = add_max_per_day_constraints(model, prep, &vars);
    model = add_activity_hours_constraints(model, prep, &vars);
    if options.respect_transit {
        model = add_transit_constraints(model, prep, &vars);
    }
    if options.limit_gaps {
        model = add_gap_penalty_constraints(model, prep, &vars, &gap_penalties);
    }
    if options.uniform_distribution {
        model = add_uniform_penalty_constraints(model, prep, &vars, &uniform_penalties);
    }

    let started = Instant::now();
    let result = model.solve();
    let elapsed = started.elapsed();

    match result {
        Ok(solution) => {
            let placed: Vec<_> = vars
                .entries
                .iter()
                .filter(|(_, var)| solution.value(*var) > 0.5)
                .map(|(key, _)| *key)
                .collect();
            let status = if elapsed > wall_clock {
                info!(?elapsed, budget = ?wall_clock, "solve exceeded its wall-clock budget");
                ResponseStatus::Feasible
            } else {
                ResponseStatus::Optimal
            };
            Ok(SolveReport {
                status,
                elapsed,
                placed,
            })
        }
        Err(e) => {
            let message = e.to_string();
            let status = if message.to_lowercase().contains("infeasible") {
                ResponseStatus::Infeasible
            } else {
                warn!(error = %message, "solver returned a non-infeasibility error");
                ResponseStatus::Unknown
            };
            Ok(SolveReport {
                status,
                elapsed,
                placed: Vec::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{
        ClassGroup, ClassGroupId, CurriculumRow, CurriculumRowId, Room, RoomId, RoomType, Shift,
        SiteId, SubjectId, Teacher, TeacherId,
    };
    use std::collections::HashMap;

    fn fixture() -> (
        Vec<CurriculumRow>,
        Vec<Teacher>,
        Vec<ClassGroup>,
        Vec<Room>,
    ) {
        let curriculum = vec![CurriculumRow {
            id: CurriculumRowId(1),
            class_group_id: ClassGroupId(1),
            subject_id: SubjectId(1),
            teacher_id: TeacherId(1),
            lessons_per_week: 2,
            active: true,
        }];
        let teachers = vec![Teacher {
            id: TeacherId(1),
            name: "t".into(),
            max_weekly_load_hours: 40,
            activity_hours_reserve: 0,
            max_consecutive_lessons: 4,
            max_lessons_per_day: 6,
            transit_time_minutes: 0,
            active: true,
        }];
        let classes = vec![ClassGroup {
            id: ClassGroupId(1),
            name: "c".into(),
            shift: Shift::Morning,
            active: true,
        }];
        let rooms = vec![Room {
            id: RoomId(1),
            name: "r".into(),
            kind: RoomType::Regular,
            capacity: 30,
            site_id: SiteId(1),
            active: true,
        }];
        (curriculum, teachers, classes, rooms)
    }

    #[test]
    fn a_trivial_instance_places_every_lesson_as_optimal() {
        let (curriculum, teachers, classes, rooms) = fixture();
        let unavailability = HashMap::new();
        let prep = ModelPrep::build(&curriculum, &teachers, &classes, &rooms, &unavailability);

        let options = SolveOptions {
            respect_transit: true,
            limit_gaps: true,
            uniform_distribution: false,
        };
        let report = solve_with_cbc(&prep, Duration::from_secs(10), options).unwrap();
        assert_eq!(report.status, ResponseStatus::Optimal);
        assert_eq!(report.placed.len(), 2);
    }

    #[test]
    fn no_variables_reports_infeasible_immediately() {
        let (mut curriculum, teachers, classes, rooms) = fixture();
        curriculum[0].teacher_id = TeacherId(99); // references a teacher that isn't loaded
        let unavailability = HashMap::new();
        let prep = ModelPrep::build(&curriculum, &teachers, &classes, &rooms, &unavailability);

        let options = SolveOptions::default();
        let report = solve_with_cbc(&prep, Duration::from_secs(1), options).unwrap();
        assert_eq!(report.status, ResponseStatus::Infeasible);
        assert!(report.placed.is_empty());
    }
}
