//! Epsilon-greedy exploration.
//!
//! With probability `1 - epsilon` keep the default policy's action; otherwise pick an
//! action uniformly at random. The uniform draw can land on the policy's action, so
//! that action's probability is `(1 - epsilon) + epsilon / N` and every other action's
//! is `epsilon / N`.

use std::fmt;

use crate::explorer::{check_action, ExploreFlag, Handle};
use crate::prg::Prg;
use crate::ranking::{promote_to_front, validate_ranking_len};
use crate::{
    ActionContext, ActionCount, Decision, ExploreError, Explorer, Policy, RankingPolicy, Result,
};

/// Configuration for epsilon-greedy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpsilonGreedyConfig {
    /// Exploration probability in `[0, 1]`.
    pub epsilon: f32,
    pub actions: ActionCount,
}

impl Default for EpsilonGreedyConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            actions: ActionCount::Variable,
        }
    }
}

impl EpsilonGreedyConfig {
    fn validate(self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(ExploreError::InvalidEpsilon(self.epsilon));
        }
        self.actions.validate()?;
        Ok(self)
    }
}

/// One epsilon-greedy draw around the policy's top action.
///
/// Returns the chosen action and its probability.
fn draw(salted_seed: u64, top: u32, epsilon: f32, num_actions: u32) -> (u32, f32) {
    let base = epsilon / num_actions as f32;
    let greedy = (1.0 - epsilon) + base;

    let mut prg = Prg::new(salted_seed);
    if prg.uniform_unit_interval() < 1.0 - epsilon {
        return (top, greedy);
    }
    let r = prg.uniform_int(1, num_actions);
    if r == top {
        (r, greedy)
    } else {
        (r, base)
    }
}

/// Epsilon-greedy over a single-action default policy.
pub struct EpsilonGreedy<P> {
    policy: Handle<P>,
    cfg: EpsilonGreedyConfig,
    explore: ExploreFlag,
}

impl<P> EpsilonGreedy<P> {
    /// Fixed number of actions.
    pub fn new(policy: P, epsilon: f32, num_actions: u32) -> Result<Self> {
        Self::with_config(
            policy,
            EpsilonGreedyConfig {
                epsilon,
                actions: ActionCount::Fixed(num_actions),
            },
        )
    }

    /// Number of actions taken from the context on every call.
    pub fn variable(policy: P, epsilon: f32) -> Result<Self> {
        Self::with_config(
            policy,
            EpsilonGreedyConfig {
                epsilon,
                actions: ActionCount::Variable,
            },
        )
    }

    pub fn with_config(policy: P, cfg: EpsilonGreedyConfig) -> Result<Self> {
        Ok(Self {
            policy: Handle::new(policy),
            cfg: cfg.validate()?,
            explore: ExploreFlag::new(),
        })
    }

    pub fn config(&self) -> EpsilonGreedyConfig {
        self.cfg
    }

    pub fn update_policy(&self, policy: P) {
        self.policy.replace(policy);
        tracing::debug!(explorer = "epsilon_greedy", "default policy replaced");
    }
}

impl<P> fmt::Debug for EpsilonGreedy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpsilonGreedy")
            .field("cfg", &self.cfg)
            .field("explore", &self.explore.get())
            .finish_non_exhaustive()
    }
}

impl<C, P> Explorer<C> for EpsilonGreedy<P>
where
    C: ActionContext + ?Sized,
    P: Policy<C>,
{
    type Action = u32;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<u32>> {
        let n = self.cfg.actions.resolve(context)?;
        let policy = self.policy.snapshot();
        let top = check_action(policy.choose_action(context), n)?;
        if !self.explore.get() {
            return Ok(Decision::exploited(top));
        }
        let (action, probability) = draw(salted_seed, top, self.cfg.epsilon, n);
        Ok(Decision::explored(action, probability))
    }

    fn set_exploring(&self, explore: bool) {
        self.explore.set(explore);
    }
}

/// Epsilon-greedy over a ranking policy.
///
/// The draw is made around the top-ranked action; the chosen action is then promoted
/// to the front of the policy's ranking.
pub struct EpsilonGreedyRanking<P> {
    policy: Handle<P>,
    cfg: EpsilonGreedyConfig,
    explore: ExploreFlag,
}

impl<P> EpsilonGreedyRanking<P> {
    pub fn new(policy: P, epsilon: f32, num_actions: u32) -> Result<Self> {
        Self::with_config(
            policy,
            EpsilonGreedyConfig {
                epsilon,
                actions: ActionCount::Fixed(num_actions),
            },
        )
    }

    pub fn variable(policy: P, epsilon: f32) -> Result<Self> {
        Self::with_config(
            policy,
            EpsilonGreedyConfig {
                epsilon,
                actions: ActionCount::Variable,
            },
        )
    }

    pub fn with_config(policy: P, cfg: EpsilonGreedyConfig) -> Result<Self> {
        Ok(Self {
            policy: Handle::new(policy),
            cfg: cfg.validate()?,
            explore: ExploreFlag::new(),
        })
    }

    pub fn config(&self) -> EpsilonGreedyConfig {
        self.cfg
    }

    pub fn update_policy(&self, policy: P) {
        self.policy.replace(policy);
        tracing::debug!(explorer = "epsilon_greedy_ranking", "default policy replaced");
    }
}

impl<P> fmt::Debug for EpsilonGreedyRanking<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpsilonGreedyRanking")
            .field("cfg", &self.cfg)
            .field("explore", &self.explore.get())
            .finish_non_exhaustive()
    }
}

impl<C, P> Explorer<C> for EpsilonGreedyRanking<P>
where
    C: ActionContext + ?Sized,
    P: RankingPolicy<C>,
{
    type Action = Vec<u32>;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<Vec<u32>>> {
        let n = self.cfg.actions.resolve(context)?;
        let policy = self.policy.snapshot();
        let mut ranking = policy.choose_actions(context, n);
        validate_ranking_len(&ranking, n)?;
        if !self.explore.get() {
            return Ok(Decision::exploited(ranking));
        }
        let (action, probability) = draw(salted_seed, ranking[0], self.cfg.epsilon, n);
        promote_to_front(action, &mut ranking);
        Ok(Decision::explored(ranking, probability))
    }

    fn set_exploring(&self, explore: bool) {
        self.explore.set(explore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn always(a: u32) -> impl Fn(&()) -> u32 {
        move |_| a
    }

    #[test]
    fn rejects_epsilon_outside_unit_interval() {
        assert_eq!(
            EpsilonGreedy::new(always(1), 1.5, 3).unwrap_err(),
            ExploreError::InvalidEpsilon(1.5)
        );
        assert!(EpsilonGreedy::new(always(1), -0.1, 3).is_err());
        assert!(EpsilonGreedy::new(always(1), f32::NAN, 3).is_err());
        assert!(EpsilonGreedy::new(always(1), 0.0, 3).is_ok());
        assert!(EpsilonGreedy::new(always(1), 1.0, 3).is_ok());
    }

    #[test]
    fn rejects_zero_actions() {
        assert_eq!(
            EpsilonGreedy::new(always(1), 0.1, 0).unwrap_err(),
            ExploreError::InvalidActionCount(0)
        );
    }

    #[test]
    fn explores_to_a_different_action() {
        // Seed 4 draws u ~ 0.607 (>= 1 - 0.5) and then r = 2.
        let eg = EpsilonGreedy::new(always(1), 0.5, 2).unwrap();
        let d = eg.decide(4, &()).unwrap();
        assert_eq!(*d.action(), 2);
        assert_eq!(d.probability(), 0.25);
        assert!(d.should_record());
    }

    #[test]
    fn uniform_draw_matching_the_policy_gets_the_greedy_probability() {
        // Seed 2 explores (u ~ 0.803) but the uniform draw returns the policy's action.
        let eg = EpsilonGreedy::new(always(1), 0.5, 2).unwrap();
        let d = eg.decide(2, &()).unwrap();
        assert_eq!(*d.action(), 1);
        assert_eq!(d.probability(), 0.75);
    }

    #[test]
    fn exploits_when_the_first_draw_is_small() {
        // Seed 0 draws u ~ 7.5e-6.
        let eg = EpsilonGreedy::new(always(1), 0.5, 2).unwrap();
        let d = eg.decide(0, &()).unwrap();
        assert_eq!(*d.action(), 1);
        assert_eq!(d.probability(), 0.75);
        assert!(d.should_record());
    }

    #[test]
    fn disabled_exploration_returns_the_policy_action() {
        let eg = EpsilonGreedy::new(always(2), 1.0, 5).unwrap();
        eg.set_exploring(false);
        let d = eg.decide(4, &()).unwrap();
        assert_eq!(d, Decision::exploited(2));
        eg.set_exploring(true);
        assert!(eg.decide(4, &()).unwrap().should_record());
    }

    #[test]
    fn policy_out_of_range_is_a_contract_violation() {
        let eg = EpsilonGreedy::new(always(4), 0.1, 3).unwrap();
        assert_eq!(
            eg.decide(1, &()).unwrap_err(),
            ExploreError::ActionOutOfRange {
                action: 4,
                num_actions: 3
            }
        );
        let eg = EpsilonGreedy::new(always(0), 0.1, 3).unwrap();
        assert!(eg.decide(1, &()).is_err());
    }

    #[test]
    fn update_policy_changes_later_decisions() {
        let boxed: Box<dyn Fn(&()) -> u32> = Box::new(always(1));
        let eg = EpsilonGreedy::new(boxed, 0.0, 3).unwrap();
        assert_eq!(*eg.decide(9, &()).unwrap().action(), 1);
        eg.update_policy(Box::new(always(3)));
        assert_eq!(*eg.decide(9, &()).unwrap().action(), 3);
    }

    #[test]
    fn ranking_mode_promotes_the_explored_action() {
        let eg = EpsilonGreedyRanking::new(|_: &(), _n: u32| vec![1, 2], 0.5, 2).unwrap();
        let d = eg.decide(4, &()).unwrap();
        assert_eq!(d.action(), &vec![2, 1]);
        assert_eq!(d.probability(), 0.25);

        let d = eg.decide(0, &()).unwrap();
        assert_eq!(d.action(), &vec![1, 2]);
        assert_eq!(d.probability(), 0.75);
    }

    #[test]
    fn ranking_mode_validates_the_proposal() {
        let eg = EpsilonGreedyRanking::new(|_: &(), _n: u32| vec![1, 1, 3], 0.5, 3).unwrap();
        assert!(matches!(
            eg.decide(4, &()),
            Err(ExploreError::InvalidRanking(_))
        ));
        let eg = EpsilonGreedyRanking::new(|_: &(), _n: u32| vec![2, 1], 0.5, 3).unwrap();
        assert!(matches!(
            eg.decide(4, &()),
            Err(ExploreError::RankingLengthMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn probability_mass_sums_to_one(n in 1u32..64, epsilon in 0.0f32..=1.0f32) {
            let base = epsilon / n as f32;
            let greedy = (1.0 - epsilon) + base;
            let total = greedy + base * (n - 1) as f32;
            prop_assert!((total - 1.0).abs() < 1e-5, "total={}", total);
        }

        #[test]
        fn reported_probability_is_one_of_two_values(
            seed in any::<u64>(),
            n in 1u32..16,
            top in 1u32..16,
            epsilon in 0.0f32..=1.0f32,
        ) {
            prop_assume!(top <= n);
            let eg = EpsilonGreedy::new(move |_: &()| top, epsilon, n).unwrap();
            let d = eg.decide(seed, &()).unwrap();
            let base = epsilon / n as f32;
            let greedy = (1.0 - epsilon) + base;
            prop_assert!((1..=n).contains(d.action()));
            if *d.action() == top {
                prop_assert_eq!(d.probability(), greedy);
            } else {
                prop_assert_eq!(d.probability(), base);
            }
            prop_assert_eq!(eg.decide(seed, &()).unwrap(), d);
        }
    }
}
