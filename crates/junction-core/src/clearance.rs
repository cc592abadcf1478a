//! Per-second drain of the green lane's queue, for countdown displays.

use junction_types::ClearanceFrame;

/// Longest countdown produced, in seconds.
pub const MAX_COUNTDOWN_SECONDS: u32 = 3_600;

/// One frame per whole second of green, from `floor(green_seconds)` down to
/// zero.
///
/// The queue drains evenly at `density / floor(green_seconds)` per second
/// (a green shorter than one second drains over one second) and never goes
/// below zero. Each frame shows the density left after that second's drain.
/// Non-finite or negative greens give a single zero-second frame.
pub fn clearance_countdown(density: f64, green_seconds: f64) -> Vec<ClearanceFrame> {
    let total = whole_seconds(green_seconds);
    let start = density.max(0.0);
    let drain = start / f64::from(total.max(1));

    let mut remaining = start;
    (0..=total)
        .rev()
        .map(|seconds_remaining| {
            if remaining > 0.0 {
                remaining = (remaining - drain).max(0.0);
            }
            ClearanceFrame {
                seconds_remaining,
                remaining_density: remaining,
            }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    // Whole number in 0..=MAX_COUNTDOWN_SECONDS.
    seconds.floor().min(f64::from(MAX_COUNTDOWN_SECONDS)) as u32
}
