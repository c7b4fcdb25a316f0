use domain::{ClassGroup, CurriculumRow, Room, Teacher};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid curriculum: {0}")]
    Msg(String),
}

/// Structural sanity checks on the already-loaded domain snapshot: unique
/// ids, dangling references, degenerate counts. This is *not* a feasibility
/// check — an instance can pass validation and
/// still be infeasible (see the activity-hours-vs-load open question); that
/// distinction is preserved deliberately.
pub fn validate(
    curriculum: &[CurriculumRow],
    teachers: &[Teacher],
    class_groups: &[ClassGroup],
    rooms: &[Room],
) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    fn chk_unique<T: std::fmt::Display + Eq + std::hash::Hash + Copy>(
        name: &str,
        ids: impl Iterator<Item = T>,
        errors: &mut Vec<String>,
    ) {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                errors.push(format!("duplicate {name} id: {id}"));
            }
        }
    }

    chk_unique("teacher", teachers.iter().map(|t| t.id), &mut errors);
    chk_unique("class group", class_groups.iter().map(|c| c.id), &mut errors);
    chk_unique("room", rooms.iter().map(|r| r.id), &mut errors);
    chk_unique("curriculum row", curriculum.iter().map(|c| c.id), &mut errors);

    let teacher_ids: HashSet<_> = teachers.iter().map(|t| t.id).collect();
    let class_ids: HashSet<_> = class_groups.iter().map(|c| c.id).collect();

    for row in curriculum {
        if !teacher_ids.contains(&row.teacher_id) {
            errors.push(format!(
                "curriculum row {} references missing teacher {}",
                row.id, row.teacher_id
            ));
        }
        if !class_ids.contains(&row.class_group_id) {
            errors.push(format!(
                "curriculum row {} references missing class group {}",
                row.id, row.class_group_id
            ));
        }
        if row.lessons_per_week == 0 {
            errors.push(format!(
                "curriculum row {} has lessons_per_week=0",
                row.id
            ));
        }
    }

    if rooms.is_empty() && !curriculum.is_empty() {
        errors.push("no active rooms to host any lesson".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}
