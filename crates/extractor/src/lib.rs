//! Decodes a solver assignment back into concrete [`LessonAssignment`]
//! records and writes them through the [`DomainRepository`]. The decode
//! step (`extract`) is pure and runs for every solver status, since
//! diagnostics are independent of solver status and need the resulting
//! counts even when nothing gets written; the write step (`apply`) runs
//! only when the caller has something worth persisting.

use std::collections::HashMap;

use domain::{
    CurriculumRow, DomainRepository, DraftId, DraftStatus, LessonAssignment, RepositoryError,
};
use model::{ModelPrep, VarKey};

/// The decoded result of a solve: concrete lesson records plus the totals
/// the draft's statistics (and the quality score) are computed from.
pub struct ExtractionOutcome {
    pub assignments: Vec<LessonAssignment>,
    pub total_lessons: u32,
    pub placed_lessons: u32,
}

/// Resolves every `(g,k,d,p,r)` key the solver set to 1 into a
/// `LessonAssignment`, deriving `start_time`/`end_time`/`ordinal` from the
/// fixed grid and the class/subject/teacher/room ids from the curriculum
/// row `g` indexes into. `total_lessons` is the sum of `lessons_per_week`
/// over every curriculum row the model was built from, regardless of
/// whether all of it made it into `placed` — that gap is exactly what the
/// `LessonsNotPlaced` pendency reports on.
pub fn extract(draft_id: DraftId, prep: &ModelPrep, placed: &[VarKey]) -> ExtractionOutcome {
    let total_lessons: u32 = prep.curriculum.iter().map(|row: &CurriculumRow| row.lessons_per_week).sum();

    let mut assignments = Vec::with_capacity(placed.len());
    for &(g, _k, day, period, r) in placed {
        let row = &prep.curriculum[g];
        let room = &prep.rooms[r];
        assignments.push(LessonAssignment {
            id: None,
            draft_id,
            class_group_id: row.class_group_id,
            subject_id: row.subject_id,
            teacher_id: row.teacher_id,
            room_id: room.id,
            day,
            start_time: sched_core::grid::period_start_str(period),
            end_time: sched_core::grid::period_end_str(period),
            ordinal: period + 1,
        });
    }

    ExtractionOutcome {
        placed_lessons: assignments.len() as u32,
        assignments,
        total_lessons,
    }
}

/// Writes the decoded solution through the repository as a single
/// clear+append transaction, updates the draft's statistics, and
/// transitions its status to `COMPLETED` iff every required lesson was
/// placed, else leaves it `IN_PROGRESS`. Callers should only
/// invoke this when `outcome.assignments` is non-empty — an empty solution
/// has nothing worth persisting, whatever the solver status was.
pub fn apply(
    repo: &mut dyn DomainRepository,
    draft_id: DraftId,
    outcome: &ExtractionOutcome,
    quality_score: u8,
) -> Result<(), RepositoryError> {
    repo.apply_solution(draft_id, outcome.assignments.clone())?;
    repo.update_draft_stats(
        draft_id,
        outcome.total_lessons,
        outcome.placed_lessons,
        quality_score,
    )?;
    let status = if outcome.placed_lessons == outcome.total_lessons {
        DraftStatus::Completed
    } else {
        DraftStatus::InProgress
    };
    repo.set_draft_status(draft_id, status)
}

/// Counts lessons per active curriculum row by `(class, subject, teacher)`,
/// used to check every row got exactly its required `lessons_per_week`
/// emitted.
pub fn lessons_by_row_key(
    assignments: &[LessonAssignment],
) -> HashMap<(domain::ClassGroupId, domain::SubjectId, domain::TeacherId), u32> {
    let mut out = HashMap::new();
    for a in assignments {
        *out.entry((a.class_group_id, a.subject_id, a.teacher_id))
            .or_insert(0) += 1;
    }
    out
}
