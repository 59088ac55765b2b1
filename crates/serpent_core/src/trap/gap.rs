//! Circular gap search
//!
//! The occupancy pattern is a ring, so a free run may straddle index 0.
//! Scanning two laps finds it without special-casing the seam.

use serde::Serialize;

/// Longest run of free sectors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Gap {
    pub start: usize,
    pub len: usize,
    pub center: usize,
}

/// `None` when every sector is occupied.
pub fn longest_gap(occupied: &[bool]) -> Option<Gap> {
    let n = occupied.len();
    if n == 0 || occupied.iter().all(|&o| o) {
        return None;
    }
    if occupied.iter().all(|&o| !o) {
        return Some(Gap { start: 0, len: n, center: n / 2 });
    }

    let mut best: Option<Gap> = None;
    let mut run = 0usize;
    for i in 0..2 * n {
        if occupied[i % n] {
            run = 0;
            continue;
        }
        run += 1;
        if best.map_or(true, |g| run > g.len) {
            let start = (i + 1 - run) % n;
            best = Some(Gap { start, len: run, center: (start + run / 2) % n });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference: walk forward from every free sector.
    pub(super) fn brute_force_longest(occupied: &[bool]) -> usize {
        let n = occupied.len();
        (0..n)
            .map(|s| (0..n).take_while(|k| !occupied[(s + k) % n]).count())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_gap_wraps_seam() {
        let mut occ = vec![true; 360];
        for s in (350..360).chain(0..15) {
            occ[s] = false;
        }
        for s in 100..110 {
            occ[s] = false;
        }
        let gap = longest_gap(&occ).unwrap();
        assert_eq!(gap.len, 25);
        assert_eq!(gap.start, 350);
        assert_eq!(gap.center, 2);
    }

    #[test]
    fn test_full_and_empty() {
        assert!(longest_gap(&vec![true; 360]).is_none());
        let gap = longest_gap(&vec![false; 360]).unwrap();
        assert_eq!(gap.len, 360);
    }

    #[test]
    fn test_single_free_sector() {
        let mut occ = vec![true; 360];
        occ[0] = false;
        let gap = longest_gap(&occ).unwrap();
        assert_eq!((gap.start, gap.len, gap.center), (0, 1, 0));
    }

    #[test]
    fn test_matches_brute_force_on_stripes() {
        let occ: Vec<bool> = (0..360).map(|i| (i / 7) % 3 == 0 || i % 50 == 0).collect();
        assert_eq!(longest_gap(&occ).map_or(0, |g| g.len), brute_force_longest(&occ));
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the found gap is the true longest free run
            #[test]
            fn prop_longest_gap_is_exact(occ in prop::collection::vec(any::<bool>(), 360)) {
                let found = longest_gap(&occ).map_or(0, |g| g.len);
                prop_assert_eq!(found, brute_force_longest(&occ));
            }

            /// Property: every sector of the reported gap is free
            #[test]
            fn prop_gap_sectors_free(occ in prop::collection::vec(prop::bool::weighted(0.7), 360)) {
                if let Some(g) = longest_gap(&occ) {
                    for k in 0..g.len {
                        prop_assert!(!occ[(g.start + k) % 360]);
                    }
                }
            }
        }
    }
}
