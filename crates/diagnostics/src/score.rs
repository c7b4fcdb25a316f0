//! Quality score: a 0-100 integer, the sum of four bounded terms.
//! Gap-counting here shares `sched_core::occupancy::count_gaps` with the
//! model builder's exact gap-predicate objective term, so the two can never
//! silently disagree about what a "gap" is.

use std::collections::{HashMap, HashSet};

use domain::{Day, LessonAssignment, TeacherId};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct QualityBreakdown {
    pub placement: u8,
    pub daily_balance: u8,
    pub gap_minimization: u8,
    pub preferences: u8,
    pub total: u8,
}

/// Computes the score from the extractor's totals and the emitted
/// assignments. `teacher_ids` should be every active teacher the model was
/// built from (not just the ones with an emitted assignment), since the
/// gap-minimization denominator is `|teachers|*|DAYS|*2` regardless of
/// whether a given teacher ended up with any lessons.
///
/// Forces every term to zero whenever `total_lessons == 0` or
/// `placed_lessons == 0`: the reserved `preferences` constant of 10 would
/// otherwise leak a nonzero score out of an instance with nothing placed
/// at all.
pub fn compute_quality(
    total_lessons: u32,
    placed_lessons: u32,
    assignments: &[LessonAssignment],
    teacher_ids: &[TeacherId],
) -> QualityBreakdown {
    if total_lessons == 0 || placed_lessons == 0 {
        return QualityBreakdown::default();
    }

    let placement = ((40 * placed_lessons) / total_lessons).min(40) as u8;

    let mut per_day: HashMap<Day, u32> = Day::GENERATION_GRID.into_iter().map(|d| (d, 0)).collect();
    for a in assignments {
        *per_day.entry(a.day).or_insert(0) += 1;
    }
    let counts: Vec<f64> = Day::GENERATION_GRID
        .into_iter()
        .map(|d| *per_day.get(&d).unwrap_or(&0) as f64)
        .collect();
    let mean = counts.iter().sum::<f64>() / counts.len() as f64;
    let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / counts.len() as f64;
    let sigma = variance.sqrt();
    let daily_balance = (30i64 - (5.0 * sigma).floor() as i64).clamp(0, 30) as u8;

    let mut occupied_by_teacher: HashMap<TeacherId, HashSet<(Day, u8)>> = HashMap::new();
    for a in assignments {
        occupied_by_teacher
            .entry(a.teacher_id)
            .or_default()
            .insert((a.day, a.ordinal - 1));
    }
    let gaps_total: u32 = teacher_ids
        .iter()
        .map(|t| {
            let occ = occupied_by_teacher.get(t);
            sched_core::occupancy::count_gaps(|d, p| occ.map(|s| s.contains(&(d, p))).unwrap_or(false))
        })
        .sum();
    let denom = (teacher_ids.len() as u32 * Day::GENERATION_GRID.len() as u32 * 2).max(1);
    let gap_minimization = (20i64 - ((20 * gaps_total) / denom) as i64).clamp(0, 20) as u8;

    let preferences = 10u8;

    let total = (placement as u32 + daily_balance as u32 + gap_minimization as u32 + preferences as u32)
        .min(100) as u8;

    QualityBreakdown {
        placement,
        daily_balance,
        gap_minimization,
        preferences,
        total,
    }
}
