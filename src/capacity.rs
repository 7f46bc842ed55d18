//! Capacity ladder: the only bucket counts a table may have.
//!
//! The ladder grows fast at the low end to avoid repeated small rehashes,
//! then roughly doubles. Every value is prime.

use crate::error::{Result, TableError};

/// Allowed bucket counts, ascending.
pub const CAPACITY_LADDER: [usize; 18] = [
    13,
    127,
    1_021,
    8_191,
    16_381,
    32_749,
    65_521,
    131_071,
    262_139,
    524_287,
    1_048_573,
    2_097_143,
    4_194_301,
    8_388_593,
    16_777_213,
    33_554_393,
    67_108_859,
    134_217_689,
];

/// Smallest ladder value.
pub const MIN_CAPACITY: usize = CAPACITY_LADDER[0];

/// Largest ladder value.
pub const MAX_CAPACITY: usize = CAPACITY_LADDER[CAPACITY_LADDER.len() - 1];

/// Returns the smallest ladder value that is `>= hint`.
///
/// Fails with [`TableError::CapacityExceeded`] when `hint` is above
/// [`MAX_CAPACITY`].
pub fn select_capacity(hint: usize) -> Result<usize> {
    CAPACITY_LADDER
        .iter()
        .copied()
        .find(|&c| c >= hint)
        .ok_or(TableError::CapacityExceeded {
            requested: hint,
            max: MAX_CAPACITY,
        })
}

/// Returns the ladder value strictly above `current`, or `None` at the top.
pub fn next_capacity(current: usize) -> Option<usize> {
    CAPACITY_LADDER.iter().copied().find(|&c| c > current)
}

/// Outcome of checking whether `len` entries fit a table of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// The current capacity already holds `len` within the load bound.
    Within,
    /// Grow to this capacity.
    Grow(usize),
    /// Over the bound with no larger ladder value left.
    Exhausted,
}

/// Picks the smallest ladder capacity above `current` that keeps
/// `len / capacity <= max_load_factor`.
///
/// Climbs several rungs when one is not enough. If even the top rung is
/// over the bound, the top rung is still returned as long as it is above
/// `current`.
pub fn growth_capacity(len: usize, current: usize, max_load_factor: f64) -> Growth {
    let exceeds = |capacity: usize| len as f64 / capacity as f64 > max_load_factor;
    if !exceeds(current) {
        return Growth::Within;
    }
    let mut target = current;
    while let Some(next) = next_capacity(target) {
        target = next;
        if !exceeds(target) {
            break;
        }
    }
    if target == current {
        Growth::Exhausted
    } else {
        Growth::Grow(target)
    }
}

/// True when `capacity` is a ladder member.
pub fn is_ladder_capacity(capacity: usize) -> bool {
    CAPACITY_LADDER.binary_search(&capacity).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_strictly_ascending() {
        assert!(CAPACITY_LADDER.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn select_rounds_up_to_ladder() {
        assert_eq!(select_capacity(0), Ok(13));
        assert_eq!(select_capacity(10), Ok(13));
        assert_eq!(select_capacity(13), Ok(13));
        assert_eq!(select_capacity(14), Ok(127));
        assert_eq!(select_capacity(1_000), Ok(1_021));
        assert_eq!(select_capacity(MAX_CAPACITY), Ok(MAX_CAPACITY));
    }

    #[test]
    fn select_past_the_top_fails() {
        assert_eq!(
            select_capacity(MAX_CAPACITY + 1),
            Err(TableError::CapacityExceeded {
                requested: MAX_CAPACITY + 1,
                max: MAX_CAPACITY,
            })
        );
        assert!(select_capacity(usize::MAX).is_err());
    }

    #[test]
    fn select_is_monotonic() {
        let mut prev = 0;
        for hint in (0..300_000).step_by(997) {
            let c = select_capacity(hint).unwrap();
            assert!(c >= prev);
            assert!(c >= hint);
            assert!(is_ladder_capacity(c));
            prev = c;
        }
    }

    #[test]
    fn next_steps_one_rung() {
        assert_eq!(next_capacity(13), Some(127));
        assert_eq!(next_capacity(127), Some(1_021));
        assert_eq!(next_capacity(14), Some(127));
        assert_eq!(next_capacity(MAX_CAPACITY), None);
    }

    #[test]
    fn growth_steps_one_rung_at_threshold() {
        assert_eq!(growth_capacity(10, 13, 0.80), Growth::Within);
        assert_eq!(growth_capacity(11, 13, 0.80), Growth::Grow(127));
        assert_eq!(growth_capacity(101, 127, 0.80), Growth::Within);
        assert_eq!(growth_capacity(102, 127, 0.80), Growth::Grow(1_021));
    }

    #[test]
    fn growth_climbs_several_rungs() {
        // 900 entries overflow 1021 buckets too.
        assert_eq!(growth_capacity(900, 13, 0.80), Growth::Grow(8_191));
        assert_eq!(growth_capacity(20_000, 127, 0.80), Growth::Grow(32_749));
        assert_eq!(growth_capacity(11, 13, 0.01), Growth::Grow(8_191));
    }

    #[test]
    fn growth_at_the_top_is_exhausted() {
        assert_eq!(growth_capacity(1, MAX_CAPACITY, 0.80), Growth::Within);
        assert_eq!(
            growth_capacity(MAX_CAPACITY, MAX_CAPACITY, 0.80),
            Growth::Exhausted
        );
        assert_eq!(
            growth_capacity(usize::MAX, MAX_CAPACITY, 0.80),
            Growth::Exhausted
        );
    }

    #[test]
    fn growth_reaches_top_even_when_still_over() {
        let below_top = CAPACITY_LADDER[CAPACITY_LADDER.len() - 2];
        assert_eq!(
            growth_capacity(MAX_CAPACITY, below_top, 0.80),
            Growth::Grow(MAX_CAPACITY)
        );
    }

    #[test]
    fn membership() {
        assert!(is_ladder_capacity(8_191));
        assert!(!is_ladder_capacity(8_192));
        assert!(!is_ladder_capacity(0));
    }
}
