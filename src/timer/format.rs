//! Countdown display helpers

/// Format a duration in seconds as `MM:SS`.
///
/// Minutes use floor division and seconds the truncating remainder, so a
/// negative input yields output like `"-1:-5"` for `-5`. Callers are expected
/// to pass non-negative values; negative input is rendered, not rejected.
pub fn format(seconds: i64) -> String {
    let minutes = seconds.div_euclid(60);
    let secs = seconds % 60;
    format!("{:02}:{:02}", minutes, secs)
}

/// Whether a countdown with `remaining` seconds left has finished
pub fn is_completed(remaining: i64) -> bool {
    remaining <= 0
}
