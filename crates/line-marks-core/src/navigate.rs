/// Next/previous bookmark lookup with wraparound.
///
/// Both functions take a `BTreeSet`, so sorted and unique input is guaranteed
/// by the type. An empty set yields `current` unchanged.
use std::collections::BTreeSet;
use std::ops::Bound;

/// Returns the nearest marked line after `current`, wrapping to the first.
pub fn next_line(lines: &BTreeSet<usize>, current: usize) -> usize {
    lines
        .range((Bound::Excluded(current), Bound::Unbounded))
        .next()
        .or_else(|| lines.first())
        .copied()
        .unwrap_or(current)
}

/// Returns the nearest marked line before `current`, wrapping to the last.
pub fn prev_line(lines: &BTreeSet<usize>, current: usize) -> usize {
    lines
        .range(..current)
        .next_back()
        .or_else(|| lines.last())
        .copied()
        .unwrap_or(current)
}
