//! Wires the Domain Repository, Model Builder, Solver Driver, Solution
//! Extractor, and Diagnostics into the single `generate()` entry point, and
//! owns the error taxonomy and the top-level `tracing` spans around it.

use std::time::{Duration, Instant};

use domain::{
    Day, DomainRepository, DraftId, DraftStatus, RepositoryError, ResponseStatus, TeacherId,
};
use diagnostics::{Pendency, PendencyContext};
use schemars::JsonSchema;
use sched_core::EngineError;
use serde::{Deserialize, Serialize};
use solver_cp::SolveOptions;
use tracing::{info, instrument, warn};

/// Request parameters for `generate()`. Field names are stable across an
/// external HTTP layer — out of scope here — so callers can (de)serialize
/// them without renaming.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema)]
pub struct GenerateParams {
    pub wall_clock_seconds: u64,
    #[serde(default = "default_true")]
    pub limit_gaps: bool,
    #[serde(default = "default_true")]
    pub respect_transit: bool,
    #[serde(default)]
    pub uniform_distribution: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            wall_clock_seconds: 30,
            limit_gaps: true,
            respect_transit: true,
            uniform_distribution: false,
        }
    }
}

/// Response envelope for `generate()`, always returned — `generate` never
/// panics and never propagates a `Result` to its caller, so every outcome
/// (including the fatal error classes) is representable here.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    pub draft_id: DraftId,
    pub total_lessons: u32,
    pub placed_lessons: u32,
    pub pendencies: Vec<Pendency>,
    pub quality_score: u8,
    pub elapsed_seconds: f64,
    pub status: Option<ResponseStatus>,
}

impl GenerateResponse {
    fn empty(draft_id: DraftId, message: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            success: false,
            message: message.into(),
            draft_id,
            total_lessons: 0,
            placed_lessons: 0,
            pendencies: Vec::new(),
            quality_score: 0,
            elapsed_seconds,
            status: None,
        }
    }
}

/// The two outcomes `run` can fail with that need different rollback
/// handling at the `generate()` boundary: the fatal-but-side-effect-free
/// classes (`DraftNotFound`, `EmptyCurriculum`) versus everything else,
/// which rolls the draft status back to `DRAFT`.
enum Failure {
    NoSideEffects(String),
    Fatal(anyhow::Error),
}

impl From<EngineError> for Failure {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::DraftNotFound(_) | EngineError::EmptyCurriculum(_) => {
                Failure::NoSideEffects(e.to_string())
            }
            EngineError::Repository(repo_err) => Failure::Fatal(repo_err.into()),
        }
    }
}

/// Runs the full pipeline for `draft_id`: loads the domain snapshot,
/// builds the CSP, solves it within `params.wall_clock_seconds`, extracts
/// and persists the solution (if any), and computes diagnostics — always
/// returning a complete [`GenerateResponse`] rather than propagating an
/// error to the caller.
#[instrument(skip(repo, params), fields(draft_id = %draft_id))]
pub fn generate(
    repo: &mut dyn DomainRepository,
    draft_id: DraftId,
    params: GenerateParams,
) -> GenerateResponse {
    let started = Instant::now();
    match run(repo, draft_id, &params, started) {
        Ok(resp) => resp,
        Err(Failure::NoSideEffects(message)) => {
            info!(%message, "generate aborted before any mutation");
            GenerateResponse::empty(draft_id, message, started.elapsed().as_secs_f64())
        }
        Err(Failure::Fatal(err)) => {
            warn!(error = %err, "generate failed, rolling draft back to DRAFT");
            // Best-effort: if the draft itself vanished mid-run there is
            // nothing left to roll back, and that secondary failure isn't
            // worth surfacing over the original one.
            let _ = repo.set_draft_status(draft_id, DraftStatus::Draft);
            GenerateResponse::empty(draft_id, err.to_string(), started.elapsed().as_secs_f64())
        }
    }
}

fn run(
    repo: &mut dyn DomainRepository,
    draft_id: DraftId,
    params: &GenerateParams,
    started: Instant,
) -> Result<GenerateResponse, Failure> {
    repo.draft_status(draft_id).map_err(|e| match e {
        RepositoryError::DraftNotFound(id) => Failure::from(EngineError::DraftNotFound(id)),
        other => Failure::from(EngineError::Repository(other)),
    })?;

    let curriculum = repo
        .load_curriculum()
        .map_err(EngineError::Repository)?;
    if curriculum.is_empty() {
        return Err(EngineError::EmptyCurriculum(draft_id).into());
    }

    repo.set_draft_status(draft_id, DraftStatus::InProgress)
        .map_err(EngineError::Repository)?;

    let teachers = repo.load_teachers().map_err(EngineError::Repository)?;
    let class_groups = repo
        .load_class_groups()
        .map_err(EngineError::Repository)?;
    let rooms = repo.load_rooms().map_err(EngineError::Repository)?;
    let unavailability = repo
        .load_unavailability()
        .map_err(EngineError::Repository)?;

    sched_core::validate(&curriculum, &teachers, &class_groups, &rooms)
        .map_err(|e| Failure::Fatal(anyhow::anyhow!(e.to_string())))?;

    let prep = model::ModelPrep::build(&curriculum, &teachers, &class_groups, &rooms, &unavailability);

    let options = SolveOptions {
        respect_transit: params.respect_transit,
        limit_gaps: params.limit_gaps,
        uniform_distribution: params.uniform_distribution,
    };
    let wall_clock = Duration::from_secs(params.wall_clock_seconds);
    let report = solver_cp::solve(&prep, wall_clock, options).map_err(Failure::Fatal)?;
    info!(status = ?report.status, elapsed = ?report.elapsed, "solve finished");

    let outcome = extractor::extract(draft_id, &prep, &report.placed);

    let teacher_ids: Vec<TeacherId> = teachers.iter().map(|t| t.id).collect();
    let quality = diagnostics::compute_quality(
        outcome.total_lessons,
        outcome.placed_lessons,
        &outcome.assignments,
        &teacher_ids,
    );

    // "Solved" here means "there is something worth writing", not
    // "every lesson got placed": under this CSP's all-or-nothing placement
    // constraint `OPTIMAL`/`FEASIBLE` always carry a full solution, but the
    // greedy fallback can report `UNKNOWN` with a genuine partial placement —
    // that partial result still gets persisted, just without flipping
    // `success`.
    let should_persist = !outcome.assignments.is_empty();
    if should_persist {
        extractor::apply(repo, draft_id, &outcome, quality.total).map_err(EngineError::Repository)?;
    }

    let mut blocked_days_by_teacher: std::collections::HashMap<TeacherId, u32> =
        std::collections::HashMap::new();
    for (&teacher_id, entries) in &unavailability {
        let blocked = entries
            .iter()
            .filter(|e| !e.available && Day::GENERATION_GRID.contains(&e.day))
            .count() as u32;
        if blocked > 0 {
            blocked_days_by_teacher.insert(teacher_id, blocked);
        }
    }
    let sites: std::collections::HashSet<_> = rooms.iter().map(|r| r.site_id).collect();

    let pendency_ctx = PendencyContext {
        total_lessons: outcome.total_lessons,
        placed_lessons: outcome.placed_lessons,
        teachers: &teachers,
        curriculum: &curriculum,
        rooms: &rooms,
        blocked_days_by_teacher,
        multi_site: sites.len() > 1,
        solver_status: report.status,
    };
    let pendencies = diagnostics::compute_pendencies(&pendency_ctx);

    let success = should_persist && outcome.placed_lessons == outcome.total_lessons;
    let message = if success {
        format!(
            "placed {} of {} required lessons",
            outcome.placed_lessons, outcome.total_lessons
        )
    } else {
        format!(
            "placed {} of {} required lessons, solver status {:?}",
            outcome.placed_lessons, outcome.total_lessons, report.status
        )
    };

    Ok(GenerateResponse {
        success,
        message,
        draft_id,
        total_lessons: outcome.total_lessons,
        placed_lessons: outcome.placed_lessons,
        pendencies,
        quality_score: quality.total,
        elapsed_seconds: started.elapsed().as_secs_f64(),
        status: Some(report.status),
    })
}

/// Installs a `tracing-subscriber` registry reading `RUST_LOG` from the
/// environment. Opt-in: embedders that already configure their own
/// subscriber should not call this.
pub fn init_tracing_from_env() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
