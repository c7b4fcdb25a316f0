use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(ClassGroupId);
id_newtype!(SubjectId);
id_newtype!(TeacherId);
id_newtype!(SiteId);
id_newtype!(RoomId);
id_newtype!(CurriculumRowId);
id_newtype!(DraftId);
id_newtype!(AssignmentId);

/// `MON..SAT` mirrors the domain's full week; `DAYS` in the model builder
/// only ever iterates `Mon..=Fri` (`Sat` is a legal value on a
/// `TeacherAvailability` row but never appears in a generated assignment).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const GENERATION_GRID: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
            Day::Sat => "SAT",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
    FullDay,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Regular,
    Lab,
    Gym,
    Auditorium,
    Library,
    ComputerLab,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStatus {
    Draft,
    InProgress,
    Completed,
    Approved,
}

/// The four-way solver outcome vocabulary, shared between the solver driver
/// and the engine's response envelope.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClassGroup {
    pub id: ClassGroupId,
    pub name: String,
    pub shift: Shift,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub max_weekly_load_hours: u32,
    pub activity_hours_reserve: u32,
    pub max_consecutive_lessons: u32,
    pub max_lessons_per_day: u32,
    pub transit_time_minutes: u32,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub kind: RoomType,
    pub capacity: u32,
    pub site_id: SiteId,
    pub active: bool,
}

/// A contract: `class_group_id` must receive `subject_id` taught by
/// `teacher_id`, `lessons_per_week` times.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct CurriculumRow {
    pub id: CurriculumRowId,
    pub class_group_id: ClassGroupId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub lessons_per_week: u32,
    pub active: bool,
}

/// `start_time`/`end_time` are carried even though the model builder only
/// ever consults `available` at day granularity (see constraint 5 in the
/// model builder and the open question in the design notes).
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct TeacherAvailability {
    pub id: i64,
    pub teacher_id: TeacherId,
    pub day: Day,
    pub available: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct LessonAssignment {
    pub id: Option<AssignmentId>,
    pub draft_id: DraftId,
    pub class_group_id: ClassGroupId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub day: Day,
    pub start_time: String,
    pub end_time: String,
    pub ordinal: u8,
}
