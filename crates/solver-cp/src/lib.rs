//! Configures and runs the constraint-programming solver with a wall-clock
//! budget. A thin wrapper: it assembles the model the `model` crate built,
//! calls the backend, and reports `(status, elapsed)` without touching the
//! domain.

#[cfg(feature = "with-milp")]
mod milp;

mod greedy;

use std::time::Duration;

use domain::ResponseStatus;
use model::{ModelPrep, VarKey};

/// Output of a solve attempt: the status vocabulary, the wall-clock time
/// actually spent, and the set of `(g,k,d,p,r)` keys the solver set to
/// 1 — the solution extractor resolves these back into `LessonAssignment`s
/// via the same `ModelPrep` that built the model.
pub struct SolveReport {
    pub status: ResponseStatus,
    pub elapsed: Duration,
    pub placed: Vec<VarKey>,
}

/// The three advisory toggles of `generate()`'s request, threaded down to
/// model construction. `respect_transit` gates hard constraint 9 (a
/// caller may legitimately want to ignore transit if, say, a substitute is
/// covering and physically can't honor it); `limit_gaps` and
/// `uniform_distribution` gate the two soft objective terms.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveOptions {
    pub respect_transit: bool,
    pub limit_gaps: bool,
    pub uniform_distribution: bool,
}

/// Runs the solver against `prep`, respecting the advisory `wall_clock`
/// budget. With the `with-milp` feature this calls into CBC via `good_lp`;
/// without it, this falls back to a greedy first-fit placement — a last
/// resort kept only so the crate builds on machines without a system CBC
/// library, not a spec-conformant solver. The greedy fallback ignores
/// `options` entirely: it has no objective to tune and always respects
/// transit, since skipping it would only make an already-weak fallback
/// worse.
pub fn solve(prep: &ModelPrep, wall_clock: Duration, options: SolveOptions) -> anyhow::Result<SolveReport> {
    #[cfg(feature = "with-milp")]
    {
        return milp::solve_with_cbc(prep, wall_clock, options);
    }
    #[cfg(not(feature = "with-milp"))]
    {
        let _ = (wall_clock, options);
        Ok(greedy::solve_greedy(prep))
    }
}
