use crate::entities::{
    ClassGroup, CurriculumRow, DraftId, LessonAssignment, Room, Teacher, TeacherAvailability,
    TeacherId,
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("draft {0:?} not found")]
    DraftNotFound(DraftId),
    #[error("repository error: {0}")]
    Other(String),
}

/// Read-only view onto the external store, scoped to active entities, plus
/// the narrow write surface the solution extractor needs. Implementations
/// are expected to be backed by a transactional tabular store; this crate
/// only specifies the contract and ships an in-memory reference
/// implementation (see [`crate::mem::MemRepository`], behind the `testing`
/// feature) for the engine's own test suite.
pub trait DomainRepository {
    fn load_curriculum(&self) -> Result<Vec<CurriculumRow>, RepositoryError>;
    fn load_teachers(&self) -> Result<Vec<Teacher>, RepositoryError>;
    fn load_class_groups(&self) -> Result<Vec<ClassGroup>, RepositoryError>;
    fn load_rooms(&self) -> Result<Vec<Room>, RepositoryError>;
    fn load_unavailability(
        &self,
    ) -> Result<HashMap<TeacherId, Vec<TeacherAvailability>>, RepositoryError>;

    /// Deletes every `LessonAssignment` currently stored for `draft_id`.
    /// Must be undone by the same rollback boundary as `append_assignment`
    /// when the two are used as one clear+append transaction (see
    /// [`DomainRepository::apply_solution`]).
    fn clear_assignments(&mut self, draft_id: DraftId) -> Result<(), RepositoryError>;

    fn append_assignment(&mut self, assignment: LessonAssignment) -> Result<(), RepositoryError>;

    fn update_draft_stats(
        &mut self,
        draft_id: DraftId,
        total_lessons: u32,
        placed_lessons: u32,
        quality_score: u8,
    ) -> Result<(), RepositoryError>;

    fn set_draft_status(
        &mut self,
        draft_id: DraftId,
        status: crate::entities::DraftStatus,
    ) -> Result<(), RepositoryError>;

    fn draft_status(&self, draft_id: DraftId) -> Result<crate::entities::DraftStatus, RepositoryError>;

    /// Runs `clear_assignments` followed by one `append_assignment` per
    /// element of `assignments` as a single transaction: on any failure the
    /// draft must be left exactly as it was before the call. The
    /// default implementation is *not* atomic — it is provided only so a
    /// minimal `DomainRepository` compiles; real implementations backed by
    /// a transactional store should override it.
    fn apply_solution(
        &mut self,
        draft_id: DraftId,
        assignments: Vec<LessonAssignment>,
    ) -> Result<(), RepositoryError> {
        self.clear_assignments(draft_id)?;
        for a in assignments {
            self.append_assignment(a)?;
        }
        Ok(())
    }
}
