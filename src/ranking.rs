//! Action ranking helpers shared by the ranking-mode strategies.
//!
//! A ranking is a permutation of the 1-based actions `1..=N`, best first.

use crate::error::{ExploreError, Result};

/// Check that `actions` is exactly a permutation of `1..=actions.len()`.
pub fn validate_ranking(actions: &[u32]) -> Result<()> {
    let n = actions.len();
    let mut seen = vec![false; n];
    for (i, &a) in actions.iter().enumerate() {
        if a == 0 || (a as usize) > n {
            return Err(ExploreError::InvalidRanking(format!(
                "entry {a} at position {i} is outside [1, {n}]"
            )));
        }
        let slot = &mut seen[(a - 1) as usize];
        if *slot {
            return Err(ExploreError::InvalidRanking(format!(
                "action {a} appears more than once"
            )));
        }
        *slot = true;
    }
    Ok(())
}

/// [`validate_ranking`] plus a length check against the resolved action count.
pub fn validate_ranking_len(actions: &[u32], num_actions: u32) -> Result<()> {
    if actions.len() != num_actions as usize {
        return Err(ExploreError::RankingLengthMismatch {
            expected: num_actions,
            got: actions.len(),
        });
    }
    validate_ranking(actions)
}

/// Swap the first occurrence of `action` into position 0.
///
/// Does nothing if `action` is absent; callers only promote members.
pub fn promote_to_front(action: u32, actions: &mut [u32]) {
    if let Some(idx) = actions.iter().position(|&a| a == action) {
        actions.swap(0, idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_permutations() {
        assert!(validate_ranking(&[]).is_ok());
        assert!(validate_ranking(&[1]).is_ok());
        assert!(validate_ranking(&[3, 1, 2]).is_ok());
    }

    #[test]
    fn rejects_zero_duplicates_and_overflow() {
        assert!(matches!(
            validate_ranking(&[0, 1]),
            Err(ExploreError::InvalidRanking(_))
        ));
        assert!(validate_ranking(&[1, 1]).is_err());
        assert!(validate_ranking(&[1, 3]).is_err());
    }

    #[test]
    fn length_must_match_action_count() {
        assert_eq!(
            validate_ranking_len(&[1, 2], 3),
            Err(ExploreError::RankingLengthMismatch {
                expected: 3,
                got: 2
            })
        );
        assert!(validate_ranking_len(&[2, 1, 3], 3).is_ok());
    }

    #[test]
    fn promote_swaps_with_head() {
        let mut r = vec![1, 2, 3, 4];
        promote_to_front(3, &mut r);
        assert_eq!(r, vec![3, 2, 1, 4]);
        promote_to_front(3, &mut r);
        assert_eq!(r, vec![3, 2, 1, 4]);
        promote_to_front(9, &mut r);
        assert_eq!(r, vec![3, 2, 1, 4]);
    }

    fn permutation(n: usize) -> impl Strategy<Value = Vec<u32>> {
        Just((1..=n as u32).collect::<Vec<_>>()).prop_shuffle()
    }

    proptest! {
        #[test]
        fn shuffled_ranges_are_valid(r in (1usize..20).prop_flat_map(permutation)) {
            prop_assert!(validate_ranking(&r).is_ok());
        }

        #[test]
        fn any_duplicate_is_rejected(
            r in (2usize..20).prop_flat_map(permutation),
            i in any::<prop::sample::Index>(),
            j in any::<prop::sample::Index>(),
        ) {
            let (i, j) = (i.index(r.len()), j.index(r.len()));
            prop_assume!(i != j);
            let mut bad = r.clone();
            bad[i] = bad[j];
            prop_assert!(validate_ranking(&bad).is_err());
        }

        #[test]
        fn promote_preserves_the_multiset(
            r in (1usize..20).prop_flat_map(permutation),
            pick in any::<prop::sample::Index>(),
        ) {
            let target = r[pick.index(r.len())];
            let mut promoted = r.clone();
            promote_to_front(target, &mut promoted);
            prop_assert_eq!(promoted[0], target);
            let mut a = r.clone();
            let mut b = promoted.clone();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
        }
    }
}
