//! Day/period window enumeration shared between the model builder's gap
//! objective and diagnostics' gap count so the two never silently disagree
//! about what a "gap" is — grounded in
//! `scoring.rs::compute_soft_scores`'s single `day_slots` precompute reused
//! for both of its own penalty terms.

use domain::Day;

/// `(day, p)` for every `p` such that the triple `(p, p+1, p+2)` fits in the
/// day — the exact window the gap predicate and the gap-minimization score
/// both slide over.
pub fn three_period_windows() -> impl Iterator<Item = (Day, u8)> {
    Day::GENERATION_GRID
        .into_iter()
        .flat_map(|d| (0..crate::grid::PERIODS_PER_DAY.saturating_sub(2)).map(move |p| (d, p)))
}

/// `(day, p)` for every window start `p` such that `[p, p+limit]` (length
/// `limit + 1`) fits in the day.
pub fn consecutive_windows(limit: u8) -> impl Iterator<Item = (Day, u8)> {
    Day::GENERATION_GRID.into_iter().flat_map(move |d| {
        (0..crate::grid::PERIODS_PER_DAY.saturating_sub(limit)).map(move |p| (d, p))
    })
}

/// Counts teacher gaps given a concrete occupancy predicate: a free period
/// sandwiched between two worked periods on the same day.
pub fn count_gaps(mut occupied: impl FnMut(Day, u8) -> bool) -> u32 {
    let mut gaps = 0u32;
    for d in Day::GENERATION_GRID {
        for p in 1..crate::grid::PERIODS_PER_DAY - 1 {
            if !occupied(d, p) && occupied(d, p - 1) && occupied(d, p + 1) {
                gaps += 1;
            }
        }
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_period_windows_cover_p_0_to_3_per_day() {
        let windows: Vec<_> = three_period_windows().collect();
        assert_eq!(windows.len(), 5 * 4);
    }

    #[test]
    fn count_gaps_finds_sandwiched_free_period() {
        let occupied = |_d: Day, p: u8| p == 0 || p == 2;
        assert_eq!(count_gaps(occupied), 5); // one gap at p=1 per day, 5 days
    }

    #[test]
    fn count_gaps_ignores_edges() {
        let occupied = |_d: Day, p: u8| p != 0;
        assert_eq!(count_gaps(occupied), 0);
    }
}
