//! Softmax exploration over per-action scores.
//!
//! Scores are turned into a distribution proportional to `exp(lambda * score)`; larger
//! `lambda` concentrates mass on the best-scoring actions, `lambda = 0` is uniform and a
//! negative `lambda` prefers the lowest-scoring actions.

use std::fmt;

use crate::alloc::{argmax_first, sample_cumulative, softmax_probabilities};
use crate::explorer::{check_scores, ExploreFlag, Handle};
use crate::prg::Prg;
use crate::{ActionContext, ActionCount, Decision, ExploreError, Explorer, Result, Scorer};

/// Configuration for softmax.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoftmaxConfig {
    /// Inverse temperature. Any finite value.
    pub lambda: f32,
    pub actions: ActionCount,
}

impl Default for SoftmaxConfig {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            actions: ActionCount::Variable,
        }
    }
}

impl SoftmaxConfig {
    fn validate(self) -> Result<Self> {
        if !self.lambda.is_finite() {
            return Err(ExploreError::InvalidLambda(self.lambda));
        }
        self.actions.validate()?;
        Ok(self)
    }
}

/// Softmax over a scorer.
///
/// With exploration disabled the highest-scoring action is returned (first one on
/// ties) with probability 1 and is not recorded. This holds for a negative `lambda`
/// too: the scorer's ordering defines the exploit action.
pub struct Softmax<S> {
    scorer: Handle<S>,
    cfg: SoftmaxConfig,
    explore: ExploreFlag,
}

impl<S> Softmax<S> {
    pub fn new(scorer: S, lambda: f32, num_actions: u32) -> Result<Self> {
        Self::with_config(
            scorer,
            SoftmaxConfig {
                lambda,
                actions: ActionCount::Fixed(num_actions),
            },
        )
    }

    pub fn variable(scorer: S, lambda: f32) -> Result<Self> {
        Self::with_config(
            scorer,
            SoftmaxConfig {
                lambda,
                actions: ActionCount::Variable,
            },
        )
    }

    pub fn with_config(scorer: S, cfg: SoftmaxConfig) -> Result<Self> {
        Ok(Self {
            scorer: Handle::new(scorer),
            cfg: cfg.validate()?,
            explore: ExploreFlag::new(),
        })
    }

    pub fn config(&self) -> SoftmaxConfig {
        self.cfg
    }

    pub fn update_scorer(&self, scorer: S) {
        self.scorer.replace(scorer);
        tracing::debug!(explorer = "softmax", "scorer replaced");
    }
}

impl<S> fmt::Debug for Softmax<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Softmax")
            .field("cfg", &self.cfg)
            .field("explore", &self.explore.get())
            .finish_non_exhaustive()
    }
}

impl<C, S> Explorer<C> for Softmax<S>
where
    C: ActionContext + ?Sized,
    S: Scorer<C>,
{
    type Action = u32;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<u32>> {
        let n = self.cfg.actions.resolve(context)?;
        let scorer = self.scorer.snapshot();
        let scores = scorer.score_actions(context);
        check_scores(&scores, n)?;

        if !self.explore.get() {
            // `check_scores` guarantees at least one entry.
            let best = argmax_first(&scores).unwrap_or(0);
            return Ok(Decision::exploited(best as u32 + 1));
        }

        let probs = softmax_probabilities(&scores, self.cfg.lambda);
        let u = Prg::new(salted_seed).uniform_unit_interval();
        let (idx, p) = sample_cumulative(&probs, u).unwrap_or((probs.len() - 1, 0.0));
        Ok(Decision::explored(idx as u32 + 1, p))
    }

    fn set_exploring(&self, explore: bool) {
        self.explore.set(explore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scores(v: Vec<f32>) -> impl Fn(&()) -> Vec<f32> {
        move |_| v.clone()
    }

    #[test]
    fn samples_along_the_cumulative_distribution() {
        // Probabilities ~ [0.186, 0.307, 0.506] for lambda 0.5.
        let sm = Softmax::new(scores(vec![1.0, 2.0, 3.0]), 0.5, 3).unwrap();
        // Seed 0: u ~ 7.5e-6, seed 1: u ~ 0.402, seed 2: u ~ 0.803.
        let expected = [(0u64, 1u32, 0.186_323_73f32), (1, 2, 0.307_195_9), (2, 3, 0.506_480_4)];
        for (seed, action, p) in expected {
            let d = sm.decide(seed, &()).unwrap();
            assert_eq!(*d.action(), action, "seed={seed}");
            assert!((d.probability() - p).abs() < 1e-6, "seed={seed} p={}", d.probability());
            assert!(d.should_record());
        }
    }

    #[test]
    fn disabled_exploration_is_argmax_with_first_tie() {
        let sm = Softmax::new(scores(vec![0.5, 4.0, 4.0, 1.0]), 1.0, 4).unwrap();
        sm.set_exploring(false);
        for seed in 0..10 {
            assert_eq!(sm.decide(seed, &()).unwrap(), Decision::exploited(2));
        }
    }

    #[test]
    fn score_count_must_match_action_count() {
        let sm = Softmax::new(scores(vec![1.0, 2.0]), 1.0, 3).unwrap();
        assert_eq!(
            sm.decide(0, &()).unwrap_err(),
            ExploreError::ScoreCountMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        let sm = Softmax::new(scores(vec![1.0, f32::NAN]), 1.0, 2).unwrap();
        assert!(matches!(
            sm.decide(0, &()),
            Err(ExploreError::NonFiniteScore { index: 1, .. })
        ));
    }

    #[test]
    fn lambda_must_be_finite() {
        assert!(Softmax::new(scores(vec![1.0]), f32::INFINITY, 1).is_err());
        assert!(Softmax::new(scores(vec![1.0]), f32::NAN, 1).is_err());
        assert!(Softmax::new(scores(vec![1.0]), -1.0, 1).is_ok());
        assert!(Softmax::new(scores(vec![1.0]), 0.0, 1).is_ok());
    }

    #[test]
    fn negative_lambda_favors_low_scores() {
        let sm = Softmax::new(scores(vec![1.0, 2.0, 3.0]), -0.5, 3).unwrap();
        // Seed 0: u ~ 7.5e-6 lands on the first, now most likely, action.
        let d = sm.decide(0, &()).unwrap();
        assert_eq!(*d.action(), 1);
        assert!((d.probability() - 0.506_480_4).abs() < 1e-6, "p={}", d.probability());
        // Seed 4: u ~ 0.607 lands on the middle action.
        let d = sm.decide(4, &()).unwrap();
        assert_eq!(*d.action(), 2);
        assert!((d.probability() - 0.307_195_9).abs() < 1e-6, "p={}", d.probability());
        // Seed 12: u ~ 0.82 is past 0.506 + 0.307.
        let d = sm.decide(12, &()).unwrap();
        assert_eq!(*d.action(), 3);
        assert!((d.probability() - 0.186_323_73).abs() < 1e-6, "p={}", d.probability());
    }

    #[test]
    fn empirical_frequencies_track_the_distribution() {
        let v = vec![0.0f32, 1.0, 2.0];
        let probs = softmax_probabilities(&v, 1.0);
        let sm = Softmax::new(scores(v), 1.0, 3).unwrap();
        let trials = 20_000u64;
        let mut counts = [0u32; 3];
        for i in 0..trials {
            let seed = crate::salted_seed("softmax-freq", &i.to_string());
            let d = sm.decide(seed, &()).unwrap();
            counts[*d.action() as usize - 1] += 1;
            assert_eq!(d.probability(), probs[*d.action() as usize - 1]);
        }
        for (c, p) in counts.iter().zip(&probs) {
            let freq = *c as f32 / trials as f32;
            assert!((freq - p).abs() < 0.02, "freq={freq} p={p}");
        }
    }

    proptest! {
        #[test]
        fn chosen_probability_matches_the_distribution(
            seed in any::<u64>(),
            v in proptest::collection::vec(-10.0f32..10.0f32, 1..12),
            lambda in -3.0f32..3.0f32,
        ) {
            let n = v.len() as u32;
            let probs = softmax_probabilities(&v, lambda);
            let sm = Softmax::new(scores(v), lambda, n).unwrap();
            let d = sm.decide(seed, &()).unwrap();
            prop_assert!((1..=n).contains(d.action()));
            prop_assert_eq!(d.probability(), probs[*d.action() as usize - 1]);
        }
    }
}
