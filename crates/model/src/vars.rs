use std::collections::HashMap;

use domain::Day;
use good_lp::{variable, ProblemVariables, Variable};

use crate::prep::ModelPrep;

/// `(curriculum row index, repetition index, day, period, room index)` —
/// the tuple key the decision variables are addressed by throughout this
/// crate. No identifier is ever encoded into a string; lookups are always a
/// direct `HashMap` hit on this key.
pub type VarKey = (usize, usize, Day, u8, usize);

pub struct Vars {
    /// Every declared variable, in declaration order — constraint builders
    /// scan and filter this the same way the reference MILP crate scans its
    /// flat `Vec<StartVar>`.
    pub entries: Vec<(VarKey, Variable)>,
    pub x: HashMap<VarKey, Variable>,
    pub keys_by_row: HashMap<usize, Vec<VarKey>>,
}

/// Declares one binary variable per legal `(g,k,d,p,r)` combination.
///
/// A combination is illegal, and simply never gets a variable, when the
/// row's teacher has a day-level unavailability block on `d` — this is how
/// hard constraint 5 is enforced: by omission at declaration time rather
/// than by an explicit zero-sum constraint, since an unconstrained
/// omitted variable and a constrained-to-zero one are equivalent in any
/// CSP and the former needs no row in the constraint matrix at all.
pub fn declare_decision_vars(
    prep: &ModelPrep,
    periods_per_day: u8,
    pvars: &mut ProblemVariables,
) -> Vars {
    let mut entries = Vec::new();
    let mut x = HashMap::new();
    let mut keys_by_row: HashMap<usize, Vec<VarKey>> = HashMap::new();

    for (g, row) in prep.curriculum.iter().enumerate() {
        if !prep.teacher_by_id.contains_key(&row.teacher_id) {
            continue;
        }
        for k in 0..row.lessons_per_week as usize {
            for d in Day::GENERATION_GRID {
                if prep.is_blocked(row.teacher_id, d) {
                    continue;
                }
                for p in 0..periods_per_day {
                    for r in 0..prep.rooms.len() {
                        let key = (g, k, d, p, r);
                        let v = pvars.add(variable().binary());
                        entries.push((key, v));
                        x.insert(key, v);
                        keys_by_row.entry(g).or_default().push(key);
                    }
                }
            }
        }
    }

    Vars {
        entries,
        x,
        keys_by_row,
    }
}
