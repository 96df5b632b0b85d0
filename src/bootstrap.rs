//! Bootstrap (bagging) exploration.
//!
//! `B` default policies ("bags") each propose an action. One bag is picked uniformly at
//! random and its proposal is played; the reported probability is the fraction of bags
//! that proposed the same action, which is exactly the probability that a uniformly
//! chosen bag would have produced it.

use std::fmt;

use crate::explorer::{check_action, ExploreFlag, Handle};
use crate::prg::Prg;
use crate::ranking::validate_ranking_len;
use crate::{
    ActionContext, ActionCount, Decision, ExploreError, Explorer, Policy, RankingPolicy, Result,
};

/// Configuration for bootstrap exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapConfig {
    pub actions: ActionCount,
}

fn check_bags<P>(bags: &[P]) -> Result<()> {
    if bags.is_empty() {
        return Err(ExploreError::NoBags);
    }
    Ok(())
}

/// Pick a bag index uniformly in `[0, bags)`.
fn pick_bag(salted_seed: u64, bags: usize) -> usize {
    let last = u32::try_from(bags - 1).unwrap_or(u32::MAX);
    Prg::new(salted_seed).uniform_int(0, last) as usize
}

/// `votes / bags` for the chosen proposal.
fn vote_share(proposals: impl Iterator<Item = u32>, chosen: u32, bags: usize) -> f32 {
    let votes = proposals.filter(|&a| a == chosen).count();
    votes as f32 / bags as f32
}

/// Bootstrap over single-action bags.
pub struct Bootstrap<P> {
    bags: Handle<Vec<P>>,
    cfg: BootstrapConfig,
    explore: ExploreFlag,
}

impl<P> Bootstrap<P> {
    pub fn new(bags: Vec<P>, num_actions: u32) -> Result<Self> {
        Self::with_config(
            bags,
            BootstrapConfig {
                actions: ActionCount::Fixed(num_actions),
            },
        )
    }

    pub fn variable(bags: Vec<P>) -> Result<Self> {
        Self::with_config(
            bags,
            BootstrapConfig {
                actions: ActionCount::Variable,
            },
        )
    }

    pub fn with_config(bags: Vec<P>, cfg: BootstrapConfig) -> Result<Self> {
        check_bags(&bags)?;
        cfg.actions.validate()?;
        Ok(Self {
            bags: Handle::new(bags),
            cfg,
            explore: ExploreFlag::new(),
        })
    }

    pub fn config(&self) -> BootstrapConfig {
        self.cfg
    }

    pub fn num_bags(&self) -> usize {
        self.bags.snapshot().len()
    }

    /// Replace every bag at once. The new set must be non-empty.
    pub fn update_bags(&self, bags: Vec<P>) -> Result<()> {
        check_bags(&bags)?;
        let n = bags.len();
        self.bags.replace(bags);
        tracing::debug!(explorer = "bootstrap", bags = n, "bags replaced");
        Ok(())
    }
}

impl<P> fmt::Debug for Bootstrap<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrap")
            .field("cfg", &self.cfg)
            .field("bags", &self.num_bags())
            .field("explore", &self.explore.get())
            .finish_non_exhaustive()
    }
}

impl<C, P> Explorer<C> for Bootstrap<P>
where
    C: ActionContext + ?Sized,
    P: Policy<C>,
{
    type Action = u32;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<u32>> {
        let n = self.cfg.actions.resolve(context)?;
        let bags = self.bags.snapshot();

        if !self.explore.get() {
            let action = check_action(bags[0].choose_action(context), n)?;
            return Ok(Decision::exploited(action));
        }

        let chosen_bag = pick_bag(salted_seed, bags.len());
        let proposals = bags
            .iter()
            .map(|bag| check_action(bag.choose_action(context), n))
            .collect::<Result<Vec<u32>>>()?;
        let action = proposals[chosen_bag];
        let p = vote_share(proposals.iter().copied(), action, bags.len());
        Ok(Decision::explored(action, p))
    }

    fn set_exploring(&self, explore: bool) {
        self.explore.set(explore);
    }
}

/// Bootstrap over ranking bags.
///
/// Votes are tallied on each bag's top action; the chosen bag's full ranking is returned.
pub struct BootstrapRanking<P> {
    bags: Handle<Vec<P>>,
    cfg: BootstrapConfig,
    explore: ExploreFlag,
}

impl<P> BootstrapRanking<P> {
    pub fn new(bags: Vec<P>, num_actions: u32) -> Result<Self> {
        Self::with_config(
            bags,
            BootstrapConfig {
                actions: ActionCount::Fixed(num_actions),
            },
        )
    }

    pub fn variable(bags: Vec<P>) -> Result<Self> {
        Self::with_config(
            bags,
            BootstrapConfig {
                actions: ActionCount::Variable,
            },
        )
    }

    pub fn with_config(bags: Vec<P>, cfg: BootstrapConfig) -> Result<Self> {
        check_bags(&bags)?;
        cfg.actions.validate()?;
        Ok(Self {
            bags: Handle::new(bags),
            cfg,
            explore: ExploreFlag::new(),
        })
    }

    pub fn config(&self) -> BootstrapConfig {
        self.cfg
    }

    pub fn num_bags(&self) -> usize {
        self.bags.snapshot().len()
    }

    pub fn update_bags(&self, bags: Vec<P>) -> Result<()> {
        check_bags(&bags)?;
        let n = bags.len();
        self.bags.replace(bags);
        tracing::debug!(explorer = "bootstrap_ranking", bags = n, "bags replaced");
        Ok(())
    }
}

impl<P> fmt::Debug for BootstrapRanking<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapRanking")
            .field("cfg", &self.cfg)
            .field("bags", &self.num_bags())
            .field("explore", &self.explore.get())
            .finish_non_exhaustive()
    }
}

impl<C, P> Explorer<C> for BootstrapRanking<P>
where
    C: ActionContext + ?Sized,
    P: RankingPolicy<C>,
{
    type Action = Vec<u32>;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<Vec<u32>>> {
        let n = self.cfg.actions.resolve(context)?;
        let bags = self.bags.snapshot();

        if !self.explore.get() {
            let ranking = bags[0].choose_actions(context, n);
            validate_ranking_len(&ranking, n)?;
            return Ok(Decision::exploited(ranking));
        }

        let chosen_bag = pick_bag(salted_seed, bags.len());
        let mut rankings = Vec::with_capacity(bags.len());
        for bag in bags.iter() {
            let ranking = bag.choose_actions(context, n);
            validate_ranking_len(&ranking, n)?;
            rankings.push(ranking);
        }
        let top = rankings[chosen_bag][0];
        let p = vote_share(rankings.iter().map(|r| r[0]), top, bags.len());
        Ok(Decision::explored(rankings.swap_remove(chosen_bag), p))
    }

    fn set_exploring(&self, explore: bool) {
        self.explore.set(explore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Bag = Box<dyn Fn(&()) -> u32 + Send + Sync>;

    fn bags(actions: &[u32]) -> Vec<Bag> {
        actions
            .iter()
            .map(|&a| Box::new(move |_: &()| a) as Bag)
            .collect()
    }

    #[test]
    fn probability_is_the_vote_share() {
        // Proposals [1, 2, 2, 3]; seeds pick bags 3, 2, 0.
        let b = Bootstrap::new(bags(&[1, 2, 2, 3]), 3).unwrap();
        let d = b.decide(0, &()).unwrap();
        assert_eq!((*d.action(), d.probability()), (3, 0.25));
        let d = b.decide(2, &()).unwrap();
        assert_eq!((*d.action(), d.probability()), (2, 0.5));
        let d = b.decide(7, &()).unwrap();
        assert_eq!((*d.action(), d.probability()), (1, 0.25));
        assert!(d.should_record());
    }

    #[test]
    fn unanimous_bags_give_certainty() {
        let b = Bootstrap::new(bags(&[2, 2, 2]), 4).unwrap();
        for seed in 0..20 {
            let d = b.decide(seed, &()).unwrap();
            assert_eq!((*d.action(), d.probability()), (2, 1.0));
        }
    }

    #[test]
    fn disabled_exploration_uses_the_first_bag() {
        let b = Bootstrap::new(bags(&[3, 1, 1, 1]), 3).unwrap();
        b.set_exploring(false);
        for seed in 0..10 {
            assert_eq!(b.decide(seed, &()).unwrap(), Decision::exploited(3));
        }
    }

    #[test]
    fn needs_at_least_one_bag() {
        assert_eq!(
            Bootstrap::new(bags(&[]), 3).unwrap_err(),
            ExploreError::NoBags
        );
        let b = Bootstrap::new(bags(&[1]), 3).unwrap();
        assert_eq!(b.update_bags(Vec::new()).unwrap_err(), ExploreError::NoBags);
        assert_eq!(b.num_bags(), 1);
    }

    #[test]
    fn any_out_of_range_proposal_fails_the_decision() {
        let b = Bootstrap::new(bags(&[1, 5, 2]), 3).unwrap();
        for seed in 0..10 {
            assert_eq!(
                b.decide(seed, &()).unwrap_err(),
                ExploreError::ActionOutOfRange {
                    action: 5,
                    num_actions: 3
                }
            );
        }
    }

    #[test]
    fn ranking_mode_returns_the_chosen_bags_ranking() {
        let rank = |r: Vec<u32>| move |_: &(), _n: u32| r.clone();
        let b = BootstrapRanking::new(
            vec![
                Box::new(rank(vec![1, 2, 3])) as Box<dyn Fn(&(), u32) -> Vec<u32>>,
                Box::new(rank(vec![2, 1, 3])),
                Box::new(rank(vec![2, 3, 1])),
                Box::new(rank(vec![3, 2, 1])),
            ],
            3,
        )
        .unwrap();
        // Seed 2 picks bag 2: top action 2 is proposed by two of four bags.
        let d = b.decide(2, &()).unwrap();
        assert_eq!(d.action(), &vec![2, 3, 1]);
        assert_eq!(d.probability(), 0.5);
        // Seed 0 picks bag 3.
        let d = b.decide(0, &()).unwrap();
        assert_eq!(d.action(), &vec![3, 2, 1]);
        assert_eq!(d.probability(), 0.25);
    }

    proptest! {
        #[test]
        fn returned_probability_is_the_vote_share(
            seed in any::<u64>(),
            proposals in proptest::collection::vec(1u32..6, 1..16),
        ) {
            let b = Bootstrap::new(bags(&proposals), 5).unwrap();
            let d = b.decide(seed, &()).unwrap();
            let votes = proposals.iter().filter(|&&a| a == *d.action()).count();
            prop_assert!(votes > 0);
            prop_assert_eq!(d.probability(), votes as f32 / proposals.len() as f32);
            prop_assert!(d.probability() > 0.0 && d.probability() <= 1.0);
        }
    }
}
