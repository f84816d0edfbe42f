//! Display formatting for experience values.

use crate::types::Xp;

/// Display units in ascending order of scale.
const UNITS: [(u128, &str); 3] = [
    (1_000, "K"),
    (1_000_000, "M"),
    (1_000_000_000, "B"),
];

/// Render an XP value in human-scaled units with one decimal place.
///
/// Values below 1,000 are rendered unscaled. A value that rounds up to
/// 1,000 of one unit is promoted to the next unit (`999,950` is `1.0M`).
/// Exact values stay available to callers; this is for display only.
pub fn humanize_xp(xp: Xp) -> String {
    let magnitude = u128::from(xp.unsigned_abs());
    let sign = if xp < 0 { "-" } else { "" };

    let Some(mut unit) = UNITS.iter().rposition(|(scale, _)| magnitude >= *scale) else {
        return xp.to_string();
    };

    let tenths = |scale: u128| (magnitude * 10 + scale / 2) / scale;
    let mut scaled = tenths(UNITS[unit].0);
    if scaled >= 10_000 && unit + 1 < UNITS.len() {
        unit += 1;
        scaled = tenths(UNITS[unit].0);
    }

    format!("{sign}{}.{}{}", scaled / 10, scaled % 10, UNITS[unit].1)
}
