//! Fixed constants of the time grid. These never vary per-instance; a
//! school with a different bell schedule is a different engine, not a
//! parameter of this one.

pub const PERIODS_PER_DAY: u8 = 6;
pub const PERIOD_LENGTH_MIN: u32 = 50;
pub const DAY_START_HOUR: u32 = 7;
pub const DAY_START_MIN: u32 = 30;

/// `period` is 0-based here; callers expose the 1-based `ordinal` at the
/// API boundary (`ordinal = period + 1`).
pub fn period_start(period: u8) -> (u32, u32) {
    let total_min = DAY_START_HOUR * 60 + DAY_START_MIN + period as u32 * PERIOD_LENGTH_MIN;
    (total_min / 60, total_min % 60)
}

pub fn period_end(period: u8) -> (u32, u32) {
    let total_min =
        DAY_START_HOUR * 60 + DAY_START_MIN + (period as u32 + 1) * PERIOD_LENGTH_MIN;
    (total_min / 60, total_min % 60)
}

pub fn format_hhmm(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}

pub fn period_start_str(period: u8) -> String {
    let (h, m) = period_start(period);
    format_hhmm(h, m)
}

pub fn period_end_str(period: u8) -> String {
    let (h, m) = period_end(period);
    format_hhmm(h, m)
}
