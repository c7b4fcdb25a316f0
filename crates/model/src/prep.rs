use std::collections::{HashMap, HashSet};

use domain::{
    ClassGroup, ClassGroupId, CurriculumRow, Day, Room, RoomId, SiteId, Teacher, TeacherId,
    TeacherAvailability,
};

/// Precomputed lookups built once per `solve()` call, the same
/// precompute-then-build split the CSP construction has always used: every
/// index map below is derived from the domain snapshot and never mutated
/// again while the model is assembled.
pub struct ModelPrep<'a> {
    pub curriculum: &'a [CurriculumRow],
    pub rooms: &'a [Room],
    pub teacher_by_id: HashMap<TeacherId, &'a Teacher>,
    pub class_by_id: HashMap<ClassGroupId, &'a ClassGroup>,
    pub room_by_id: HashMap<RoomId, usize>,
    /// `(teacher, day)` pairs blocked by a day-level unavailability entry.
    /// Time-of-day on the entry is not consulted (see the unavailability
    /// granularity note this engine preserves).
    pub blocked_days: HashSet<(TeacherId, Day)>,
    /// Room indices grouped by site, in room order.
    pub rooms_by_site: HashMap<SiteId, Vec<usize>>,
}

impl<'a> ModelPrep<'a> {
    pub fn build(
        curriculum: &'a [CurriculumRow],
        teachers: &'a [Teacher],
        class_groups: &'a [ClassGroup],
        rooms: &'a [Room],
        unavailability: &HashMap<TeacherId, Vec<TeacherAvailability>>,
    ) -> Self {
        let teacher_by_id = teachers.iter().map(|t| (t.id, t)).collect();
        let class_by_id = class_groups.iter().map(|c| (c.id, c)).collect();
        let room_by_id = rooms.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

        let mut blocked_days = HashSet::new();
        for (teacher_id, entries) in unavailability {
            for entry in entries {
                if !entry.available {
                    blocked_days.insert((*teacher_id, entry.day));
                }
            }
        }

        let mut rooms_by_site: HashMap<SiteId, Vec<usize>> = HashMap::new();
        for (i, r) in rooms.iter().enumerate() {
            rooms_by_site.entry(r.site_id).or_default().push(i);
        }

        Self {
            curriculum,
            rooms,
            teacher_by_id,
            class_by_id,
            room_by_id,
            blocked_days,
            rooms_by_site,
        }
    }

    pub fn is_blocked(&self, teacher_id: TeacherId, day: Day) -> bool {
        self.blocked_days.contains(&(teacher_id, day))
    }

    /// Distinct sites actually hosting rooms, independent of the `Site`
    /// entities themselves — a site with no rooms cannot host a lesson and
    /// never participates in the transit constraint.
    pub fn site_count(&self) -> usize {
        self.rooms_by_site.len()
    }
}
