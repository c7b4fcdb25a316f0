//! Translates a domain snapshot into the abstract CSP: decision variables,
//! hard constraints, and a soft-penalty objective. Grounded in the
//! reference MILP crate's `Prep`/`Vars`/`declare_*`/`add_*_constraints`
//! split, generalized from its `(course, time, room)` encoding to the
//! `(curriculum row, repetition, day, period, room)` tuple this engine's
//! contract requires.

pub mod constraints;
pub mod objective;
pub mod prep;
pub mod vars;

pub use constraints::{
    add_activity_hours_constraints, add_class_clique_constraints,
    add_max_consecutive_constraints, add_max_per_day_constraints, add_placement_constraints,
    add_room_clique_constraints, add_teacher_clique_constraints, add_transit_constraints,
};
pub use objective::{
    add_gap_penalty_constraints, add_uniform_penalty_constraints, build_objective,
    declare_gap_penalties, declare_uniform_penalties, GapPenalty, UniformPenalty,
    UNIFORM_DISTRIBUTION_WEIGHT,
};
pub use prep::ModelPrep;
pub use vars::{declare_decision_vars, VarKey, Vars};
