//! In-memory [`DomainRepository`] used by the engine's own test suite and by
//! any caller that wants to exercise the engine without a real store. The
//! engine's solve path is synchronous, so plain interior mutability (no
//! `Arc`/`RwLock`) is enough here.

use crate::entities::{
    ClassGroup, CurriculumRow, Day, DraftId, DraftStatus, LessonAssignment, Room, Teacher,
    TeacherAvailability, TeacherId,
};
use crate::repository::{DomainRepository, RepositoryError};
use std::collections::HashMap;

#[derive(Default)]
pub struct MemRepository {
    pub curriculum: Vec<CurriculumRow>,
    pub teachers: Vec<Teacher>,
    pub class_groups: Vec<ClassGroup>,
    pub rooms: Vec<Room>,
    pub unavailability: HashMap<TeacherId, Vec<TeacherAvailability>>,
    pub assignments: HashMap<DraftId, Vec<LessonAssignment>>,
    pub statuses: HashMap<DraftId, DraftStatus>,
    pub total_lessons: HashMap<DraftId, u32>,
    pub placed_lessons: HashMap<DraftId, u32>,
    pub quality_scores: HashMap<DraftId, u8>,
    /// When `Some(n)`, the n-th call to `append_assignment` (0-indexed,
    /// counted per `clear_assignments` call) fails instead of writing,
    /// simulating a mid-transaction repository fault.
    pub fail_append_at: Option<usize>,
    append_calls_since_clear: usize,
}

impl MemRepository {
    pub fn new(draft_id: DraftId) -> Self {
        let mut repo = Self::default();
        repo.statuses.insert(draft_id, DraftStatus::Draft);
        repo
    }

    pub fn assignments_for(&self, draft_id: DraftId) -> &[LessonAssignment] {
        self.assignments
            .get(&draft_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl DomainRepository for MemRepository {
    fn load_curriculum(&self) -> Result<Vec<CurriculumRow>, RepositoryError> {
        Ok(self
            .curriculum
            .iter()
            .filter(|c| c.active)
            .cloned()
            .collect())
    }

    fn load_teachers(&self) -> Result<Vec<Teacher>, RepositoryError> {
        Ok(self.teachers.iter().filter(|t| t.active).cloned().collect())
    }

    fn load_class_groups(&self) -> Result<Vec<ClassGroup>, RepositoryError> {
        Ok(self
            .class_groups
            .iter()
            .filter(|c| c.active)
            .cloned()
            .collect())
    }

    fn load_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        Ok(self.rooms.iter().filter(|r| r.active).cloned().collect())
    }

    fn load_unavailability(
        &self,
    ) -> Result<HashMap<TeacherId, Vec<TeacherAvailability>>, RepositoryError> {
        Ok(self.unavailability.clone())
    }

    fn clear_assignments(&mut self, draft_id: DraftId) -> Result<(), RepositoryError> {
        if !self.statuses.contains_key(&draft_id) {
            return Err(RepositoryError::DraftNotFound(draft_id));
        }
        self.assignments.insert(draft_id, Vec::new());
        self.append_calls_since_clear = 0;
        Ok(())
    }

    fn append_assignment(&mut self, assignment: LessonAssignment) -> Result<(), RepositoryError> {
        if let Some(n) = self.fail_append_at {
            if self.append_calls_since_clear == n {
                return Err(RepositoryError::Other("injected append failure".into()));
            }
        }
        self.append_calls_since_clear += 1;
        self.assignments
            .entry(assignment.draft_id)
            .or_default()
            .push(assignment);
        Ok(())
    }

    fn update_draft_stats(
        &mut self,
        draft_id: DraftId,
        total_lessons: u32,
        placed_lessons: u32,
        quality_score: u8,
    ) -> Result<(), RepositoryError> {
        self.total_lessons.insert(draft_id, total_lessons);
        self.placed_lessons.insert(draft_id, placed_lessons);
        self.quality_scores.insert(draft_id, quality_score);
        Ok(())
    }

    fn set_draft_status(
        &mut self,
        draft_id: DraftId,
        status: DraftStatus,
    ) -> Result<(), RepositoryError> {
        if !self.statuses.contains_key(&draft_id) {
            return Err(RepositoryError::DraftNotFound(draft_id));
        }
        self.statuses.insert(draft_id, status);
        Ok(())
    }

    fn draft_status(&self, draft_id: DraftId) -> Result<DraftStatus, RepositoryError> {
        self.statuses
            .get(&draft_id)
            .copied()
            .ok_or(RepositoryError::DraftNotFound(draft_id))
    }

    fn apply_solution(
        &mut self,
        draft_id: DraftId,
        assignments: Vec<LessonAssignment>,
    ) -> Result<(), RepositoryError> {
        let before = self.assignments.get(&draft_id).cloned();
        self.clear_assignments(draft_id)?;
        for a in assignments {
            if let Err(e) = self.append_assignment(a) {
                // roll back to the pre-call snapshot so a failed write
                // never leaves a partial result behind.
                match before {
                    Some(v) => {
                        self.assignments.insert(draft_id, v);
                    }
                    None => {
                        self.assignments.remove(&draft_id);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
