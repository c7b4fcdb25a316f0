//! Property tests over `generate()`. `proptest` drives the randomized
//! instances for pairwise legality and the consecutive-lessons bound; the
//! rest are fixed instances chosen to be confidently decidable without a
//! solver timeout.
//!
//! The consecutive-lessons bound and transit enforcement are hard
//! constraints the greedy fallback never enforces (see `solver_cp::greedy`'s
//! own doc comment), so those two are gated on `with-milp` — under the
//! fallback they'd be vacuously true for the wrong reason.

use std::collections::HashSet;

use domain::mem::MemRepository;
use domain::{
    ClassGroup, ClassGroupId, CurriculumRow, CurriculumRowId, Day, DraftId, LessonAssignment,
    Room, RoomId, RoomType, Shift, SiteId, SubjectId, Teacher, TeacherId,
};
use engine::{generate, GenerateParams};
use proptest::prelude::*;

fn teacher(id: i64, max_consecutive: u32, max_per_day: u32, transit_minutes: u32) -> Teacher {
    Teacher {
        id: TeacherId(id),
        name: format!("t{id}"),
        max_weekly_load_hours: 60,
        activity_hours_reserve: 0,
        max_consecutive_lessons: max_consecutive,
        max_lessons_per_day: max_per_day,
        transit_time_minutes: transit_minutes,
        active: true,
    }
}

fn class(id: i64) -> ClassGroup {
    ClassGroup {
        id: ClassGroupId(id),
        name: format!("c{id}"),
        shift: Shift::Morning,
        active: true,
    }
}

fn room(id: i64, site: i64) -> Room {
    Room {
        id: RoomId(id),
        name: format!("r{id}"),
        kind: RoomType::Regular,
        capacity: 30,
        site_id: SiteId(site),
        active: true,
    }
}

fn row(id: i64, class_id: i64, teacher_id: i64, lessons_per_week: u32) -> CurriculumRow {
    CurriculumRow {
        id: CurriculumRowId(id),
        class_group_id: ClassGroupId(class_id),
        subject_id: SubjectId(id),
        teacher_id: TeacherId(teacher_id),
        lessons_per_week,
        active: true,
    }
}

fn assert_legal(assignments: &[LessonAssignment]) {
    let mut by_class = HashSet::new();
    let mut by_teacher = HashSet::new();
    let mut by_room = HashSet::new();
    for a in assignments {
        assert!(
            by_class.insert((a.class_group_id, a.day, a.ordinal)),
            "two lessons for class {:?} both land on {:?}/{}",
            a.class_group_id,
            a.day,
            a.ordinal
        );
        assert!(
            by_teacher.insert((a.teacher_id, a.day, a.ordinal)),
            "teacher {:?} double-booked at {:?}/{}",
            a.teacher_id,
            a.day,
            a.ordinal
        );
        assert!(
            by_room.insert((a.room_id, a.day, a.ordinal)),
            "room {:?} double-booked at {:?}/{}",
            a.room_id,
            a.day,
            a.ordinal
        );
    }
}

fn default_params() -> GenerateParams {
    GenerateParams {
        wall_clock_seconds: 5,
        ..GenerateParams::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Legal output: no two emitted assignments ever collide on class,
    /// teacher, or room at the same (day, ordinal), whatever the solver
    /// status turned out to be.
    #[test]
    fn generate_produces_pairwise_legal_assignments(
        rows in proptest::collection::vec((0usize..2, 0usize..2, 1u32..=3), 1..=3),
    ) {
        let draft_id = DraftId(1);
        let mut repo = MemRepository::new(draft_id);
        repo.teachers = vec![teacher(1, 6, 6, 0), teacher(2, 6, 6, 0)];
        repo.class_groups = vec![class(1), class(2)];
        repo.rooms = vec![room(1, 1), room(2, 1)];
        repo.curriculum = rows
            .iter()
            .enumerate()
            .map(|(i, &(class_idx, teacher_idx, lessons))| {
                row(i as i64 + 1, class_idx as i64 + 1, teacher_idx as i64 + 1, lessons)
            })
            .collect();

        let _ = generate(&mut repo, draft_id, default_params());
        assert_legal(repo.assignments_for(draft_id));
    }
}

#[cfg(feature = "with-milp")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Consecutive-lessons bound: no teacher is ever scheduled in more than
    /// `max_consecutive_lessons` back-to-back periods on one day.
    #[test]
    fn no_run_exceeds_the_teachers_max_consecutive_lessons(
        limit in 1u32..=3,
        lessons_per_week in 2u32..=6,
    ) {
        let draft_id = DraftId(1);
        let mut repo = MemRepository::new(draft_id);
        repo.teachers = vec![teacher(1, limit, 6, 0)];
        repo.class_groups = vec![class(1)];
        repo.rooms = vec![room(1, 1)];
        repo.curriculum = vec![row(1, 1, 1, lessons_per_week)];

        let _ = generate(&mut repo, draft_id, default_params());
        let assignments = repo.assignments_for(draft_id);

        for day in Day::GENERATION_GRID {
            let mut run = 0u32;
            let mut max_run = 0u32;
            for p in 0..sched_core::grid::PERIODS_PER_DAY {
                let occupied = assignments.iter().any(|a| a.day == day && a.ordinal - 1 == p);
                if occupied {
                    run += 1;
                    max_run = max_run.max(run);
                } else {
                    run = 0;
                }
            }
            prop_assert!(max_run <= limit);
        }
    }
}

/// Completeness on success: when `success` is true, every curriculum row
/// got exactly its `lessons_per_week`. Sized so both the MILP and greedy
/// backends place it in full: one teacher, one class, one room, three
/// lessons, no contention.
#[test]
fn success_implies_every_row_got_its_full_weekly_count() {
    let draft_id = DraftId(1);
    let mut repo = MemRepository::new(draft_id);
    repo.teachers = vec![teacher(1, 6, 6, 0)];
    repo.class_groups = vec![class(1)];
    repo.rooms = vec![room(1, 1)];
    repo.curriculum = vec![row(1, 1, 1, 3)];

    let response = generate(&mut repo, draft_id, default_params());
    assert!(response.success, "a trivial uncontended instance must succeed");

    let counts = extractor::lessons_by_row_key(repo.assignments_for(draft_id));
    assert_eq!(
        counts.get(&(ClassGroupId(1), SubjectId(1), TeacherId(1))),
        Some(&3)
    );
}

/// Day block respected: a teacher blocked on Monday never receives an
/// assignment on Monday, even though the curriculum easily fits on the
/// remaining four days.
#[test]
fn a_blocked_day_never_receives_an_assignment() {
    let draft_id = DraftId(1);
    let mut repo = MemRepository::new(draft_id);
    repo.teachers = vec![teacher(1, 6, 6, 0)];
    repo.class_groups = vec![class(1)];
    repo.rooms = vec![room(1, 1)];
    repo.curriculum = vec![row(1, 1, 1, 3)];
    repo.unavailability.insert(
        TeacherId(1),
        vec![domain::TeacherAvailability {
            id: 1,
            teacher_id: TeacherId(1),
            day: Day::Mon,
            available: false,
            start_time: None,
            end_time: None,
        }],
    );

    let response = generate(&mut repo, draft_id, default_params());
    assert!(response.success);
    assert!(repo
        .assignments_for(draft_id)
        .iter()
        .all(|a| a.day != Day::Mon));
}

/// Transit enforcement, end to end through `generate()`: whatever solution
/// comes back never has the same teacher crossing sites faster than their
/// transit time allows. `model`'s own test suite forces a violating
/// configuration directly and checks the solver rejects it; this one checks
/// the integration never produces one in practice. Gated on `with-milp`
/// since the greedy fallback has no notion of sites at all.
#[cfg(feature = "with-milp")]
#[test]
fn no_cross_site_assignment_violates_the_transit_window() {
    let draft_id = DraftId(1);
    let mut repo = MemRepository::new(draft_id);
    repo.teachers = vec![teacher(1, 6, 6, 60)]; // 60 min => 2 slots at 50 min/period
    repo.class_groups = vec![class(1), class(2)];
    repo.rooms = vec![room(1, 1), room(2, 2)];
    repo.curriculum = vec![row(1, 1, 1, 2), row(2, 2, 1, 2)];

    let response = generate(&mut repo, draft_id, default_params());
    assert!(response.success);

    let assignments = repo.assignments_for(draft_id);
    let site_of = |room_id: RoomId| -> SiteId {
        repo.rooms.iter().find(|r| r.id == room_id).unwrap().site_id
    };
    for a in assignments {
        for b in assignments {
            if a.day != b.day || a.teacher_id != b.teacher_id || site_of(a.room_id) == site_of(b.room_id) {
                continue;
            }
            let gap = (a.ordinal as i32 - b.ordinal as i32).unsigned_abs();
            // 60-minute transit at 50-minute periods needs a strictly-greater-than-2
            // period gap.
            assert!(gap > 2, "cross-site reassignment with only {gap} period(s) to transit");
        }
    }
}

/// Determinism of extraction: decoding the same solver output twice yields
/// byte-identical assignments, since `extract` is a pure function of
/// `(prep, placed)`.
#[test]
fn extraction_is_deterministic_for_a_fixed_solver_output() {
    let curriculum = vec![row(1, 1, 1, 2)];
    let teachers = vec![teacher(1, 6, 6, 0)];
    let classes = vec![class(1)];
    let rooms = vec![room(1, 1)];
    let unavailability = std::collections::HashMap::new();
    let prep = model::ModelPrep::build(&curriculum, &teachers, &classes, &rooms, &unavailability);
    let placed = vec![(0usize, 0usize, Day::Mon, 0u8, 0usize), (0, 1, Day::Wed, 2, 0)];

    let first = extractor::extract(DraftId(1), &prep, &placed);
    let second = extractor::extract(DraftId(1), &prep, &placed);

    assert_eq!(first.total_lessons, second.total_lessons);
    assert_eq!(first.placed_lessons, second.placed_lessons);
    assert_eq!(first.assignments.len(), second.assignments.len());
    for (a, b) in first.assignments.iter().zip(second.assignments.iter()) {
        assert_eq!(a.class_group_id, b.class_group_id);
        assert_eq!(a.subject_id, b.subject_id);
        assert_eq!(a.teacher_id, b.teacher_id);
        assert_eq!(a.room_id, b.room_id);
        assert_eq!(a.day, b.day);
        assert_eq!(a.ordinal, b.ordinal);
        assert_eq!(a.start_time, b.start_time);
        assert_eq!(a.end_time, b.end_time);
    }
}

/// Rollback on repository failure: when the write transaction fails
/// partway through, the draft ends up exactly where it started (`DRAFT`,
/// no assignments), never left `IN_PROGRESS` with a half-written solution.
#[test]
fn repository_failure_rolls_draft_back_to_draft() {
    let draft_id = DraftId(1);
    let mut repo = MemRepository::new(draft_id);
    repo.teachers = vec![teacher(1, 6, 6, 0)];
    repo.class_groups = vec![class(1)];
    repo.rooms = vec![room(1, 1)];
    repo.curriculum = vec![row(1, 1, 1, 2)];
    repo.fail_append_at = Some(0);

    let response = generate(&mut repo, draft_id, default_params());

    assert!(!response.success);
    assert_eq!(repo.draft_status(draft_id).unwrap(), domain::DraftStatus::Draft);
    assert!(repo.assignments_for(draft_id).is_empty());
}

/// Quality bounds: the score is always within [0, 100], across a trivial
/// instance, an oversubscribed one, and a blocked one.
#[test]
fn quality_score_is_always_within_bounds() {
    let scenarios: Vec<(Vec<Teacher>, Vec<ClassGroup>, Vec<Room>, Vec<CurriculumRow>)> = vec![
        (vec![teacher(1, 6, 6, 0)], vec![class(1)], vec![room(1, 1)], vec![row(1, 1, 1, 3)]),
        (
            vec![teacher(1, 6, 1, 0)],
            vec![class(1), class(2)],
            vec![room(1, 1)],
            vec![row(1, 1, 1, 5), row(2, 2, 1, 5)],
        ),
        (vec![teacher(1, 6, 6, 0)], vec![class(1)], vec![], vec![row(1, 1, 1, 1)]),
    ];

    for (teachers, class_groups, rooms, curriculum) in scenarios {
        let draft_id = DraftId(1);
        let mut repo = MemRepository::new(draft_id);
        repo.teachers = teachers;
        repo.class_groups = class_groups;
        repo.rooms = rooms;
        repo.curriculum = curriculum;

        let response = generate(&mut repo, draft_id, default_params());
        assert!(response.quality_score <= 100);
    }
}
