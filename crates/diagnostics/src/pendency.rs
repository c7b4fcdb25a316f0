//! Structured diagnostics about why a timetable is incomplete or risky. A
//! tagged enum with typed, kind-specific fields instead of a free-form
//! `details` blob, so each pendency kind's payload is checked by the
//! compiler instead of by convention.

use domain::TeacherId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Ord, PartialOrd)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Med,
    High,
}

impl Severity {
    /// Lower rank sorts first; used to order pendencies severity-descending.
    fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Med => 1,
            Severity::Low => 2,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pendency {
    LessonsNotPlaced {
        severity: Severity,
        message: String,
        suggestion: Option<String>,
        placed: u32,
        total: u32,
    },
    InsufficientAvailability {
        severity: Severity,
        message: String,
        suggestion: Option<String>,
        teacher_id: TeacherId,
        weekly_lessons: u32,
        capacity_estimate: u32,
    },
    RoomCapacityPressure {
        severity: Severity,
        message: String,
        suggestion: Option<String>,
    },
    MultiSiteTransitRisk {
        severity: Severity,
        message: String,
        suggestion: Option<String>,
        teacher_id: TeacherId,
        transit_time_minutes: u32,
    },
    Infeasible {
        severity: Severity,
        message: String,
        suggestion: Option<String>,
    },
}

impl Pendency {
    pub fn severity(&self) -> Severity {
        match self {
            Pendency::LessonsNotPlaced { severity, .. }
            | Pendency::InsufficientAvailability { severity, .. }
            | Pendency::RoomCapacityPressure { severity, .. }
            | Pendency::MultiSiteTransitRisk { severity, .. }
            | Pendency::Infeasible { severity, .. } => *severity,
        }
    }

    fn is_lessons_not_placed(&self) -> bool {
        matches!(self, Pendency::LessonsNotPlaced { .. })
    }
}

/// `LESSONS_NOT_PLACED` first (if present), then by severity descending,
/// then by insertion order — a stable sort on `(not_lessons_not_placed,
/// severity_rank)` preserves insertion order within each bucket.
pub fn order_pendencies(pendencies: &mut [Pendency]) {
    pendencies.sort_by_key(|p| (!p.is_lessons_not_placed(), p.severity().rank()));
}
