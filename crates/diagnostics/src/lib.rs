//! Diagnostics: quality score + a ranked list of pendencies with
//! severities and remediation hints. Independent of solver status — both
//! halves are computed purely from the extractor's totals and the domain
//! snapshot, never from whether the solve itself succeeded.

pub mod pendency;
pub mod score;

pub use pendency::{order_pendencies, Pendency, Severity};
pub use score::{compute_quality, QualityBreakdown};

use std::collections::HashMap;

use domain::{CurriculumRow, Day, ResponseStatus, Room, Teacher, TeacherId};

/// Everything `compute_pendencies` needs, gathered in one place so the
/// engine crate can build it from a single domain snapshot plus the
/// extractor's totals.
pub struct PendencyContext<'a> {
    pub total_lessons: u32,
    pub placed_lessons: u32,
    pub teachers: &'a [Teacher],
    pub curriculum: &'a [CurriculumRow],
    pub rooms: &'a [Room],
    /// Number of whole days blocked by a day-level unavailability entry,
    /// keyed by teacher — used to estimate each teacher's usable slot
    /// count for `INSUFFICIENT_AVAILABILITY`.
    pub blocked_days_by_teacher: HashMap<TeacherId, u32>,
    /// True when rooms span more than one site, the precondition for
    /// `MULTI_SITE_TRANSIT_RISK` to mean anything.
    pub multi_site: bool,
    pub solver_status: ResponseStatus,
}

const TRANSIT_RISK_THRESHOLD_MINUTES: u32 = 45;
const AVAILABILITY_PRESSURE_RATIO: f64 = 0.8;
const ROOM_PRESSURE_RATIO: f64 = 0.8;

pub fn compute_pendencies(ctx: &PendencyContext) -> Vec<Pendency> {
    let periods_per_day = sched_core::grid::PERIODS_PER_DAY as u32;
    let mut out = Vec::new();

    if ctx.placed_lessons < ctx.total_lessons {
        let rate_pct = if ctx.total_lessons == 0 {
            0.0
        } else {
            100.0 * ctx.placed_lessons as f64 / ctx.total_lessons as f64
        };
        out.push(Pendency::LessonsNotPlaced {
            severity: Severity::High,
            message: format!(
                "placed {} of {} required lessons ({rate_pct:.0}% placement rate)",
                ctx.placed_lessons, ctx.total_lessons
            ),
            suggestion: Some(
                "reduce curriculum load, relax a teacher limit, or add rooms/teachers".into(),
            ),
            placed: ctx.placed_lessons,
            total: ctx.total_lessons,
        });
    }

    let mut weekly_load: HashMap<TeacherId, u32> = HashMap::new();
    for row in ctx.curriculum {
        *weekly_load.entry(row.teacher_id).or_insert(0) += row.lessons_per_week;
    }

    for t in ctx.teachers {
        let load = weekly_load.get(&t.id).copied().unwrap_or(0);
        let blocked_days = ctx.blocked_days_by_teacher.get(&t.id).copied().unwrap_or(0);
        let usable_days = (Day::GENERATION_GRID.len() as u32).saturating_sub(blocked_days);
        let capacity_estimate = usable_days * periods_per_day;
        if capacity_estimate > 0
            && load as f64 > AVAILABILITY_PRESSURE_RATIO * capacity_estimate as f64
        {
            out.push(Pendency::InsufficientAvailability {
                severity: Severity::Med,
                message: format!(
                    "teacher {} is loaded {} lessons/week against an estimated {} usable slots",
                    t.id, load, capacity_estimate
                ),
                suggestion: Some("reduce this teacher's curriculum load or availability blocks".into()),
                teacher_id: t.id,
                weekly_lessons: load,
                capacity_estimate,
            });
        }
    }

    let room_capacity_total = ctx.rooms.len() as u32 * Day::GENERATION_GRID.len() as u32 * periods_per_day;
    if room_capacity_total > 0
        && ctx.total_lessons as f64 > ROOM_PRESSURE_RATIO * room_capacity_total as f64
    {
        out.push(Pendency::RoomCapacityPressure {
            severity: Severity::Med,
            message: format!(
                "curriculum requires {} lessons against an estimated {} room-slots/week",
                ctx.total_lessons, room_capacity_total
            ),
            suggestion: Some("add rooms or reduce curriculum lessons-per-week".into()),
        });
    }

    if ctx.multi_site {
        for t in ctx.teachers {
            if t.transit_time_minutes > TRANSIT_RISK_THRESHOLD_MINUTES {
                out.push(Pendency::MultiSiteTransitRisk {
                    severity: Severity::Low,
                    message: format!(
                        "teacher {} has a {}-minute transit time across sites",
                        t.id, t.transit_time_minutes
                    ),
                    suggestion: Some("avoid assigning this teacher back-to-back across sites".into()),
                    teacher_id: t.id,
                    transit_time_minutes: t.transit_time_minutes,
                });
            }
        }
    }

    // `INFEASIBLE` is a fallback: only emitted when the solver couldn't
    // produce a usable result *and* nothing above already explains why.
    let solver_says_infeasible = matches!(ctx.solver_status, ResponseStatus::Infeasible)
        || (matches!(ctx.solver_status, ResponseStatus::Unknown) && ctx.placed_lessons == 0);
    if solver_says_infeasible && out.is_empty() {
        out.push(Pendency::Infeasible {
            severity: Severity::High,
            message: "solver could not produce a usable timetable within its budget".into(),
            suggestion: Some("relax constraints or increase the wall-clock budget".into()),
        });
    }

    order_pendencies(&mut out);
    out
}
