//! Tau-first exploration: explore uniformly for the first `tau` decisions, then exploit.
//!
//! The budget is shared by every caller of one instance. It only ever decreases, and
//! once it reaches zero the strategy defers to the default policy for good.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::explorer::{check_action, ExploreFlag, Handle};
use crate::prg::Prg;
use crate::ranking::{promote_to_front, validate_ranking_len};
use crate::{ActionContext, ActionCount, Decision, Explorer, Policy, RankingPolicy, Result};

/// Configuration for tau-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TauFirstConfig {
    /// Number of exploring decisions. Zero is valid and means "exploit from the start".
    pub tau: u32,
    pub actions: ActionCount,
}

impl Default for TauFirstConfig {
    fn default() -> Self {
        Self {
            tau: 100,
            actions: ActionCount::Variable,
        }
    }
}

/// Where a tau-first instance is in its one-way lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TauPhase {
    /// Budget left.
    Exploring,
    /// Budget spent (terminal).
    Exploiting,
}

/// Remaining exploration budget.
#[derive(Debug)]
struct Budget(AtomicU32);

impl Budget {
    fn new(tau: u32) -> Self {
        Self(AtomicU32::new(tau))
    }

    fn remaining(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// Take one unit of budget. Returns `false` once the budget is spent.
    ///
    /// Concurrent callers can never take more than the initial budget in total.
    fn take(&self, explorer: &'static str) -> bool {
        match self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1))
        {
            Ok(1) => {
                tracing::debug!(explorer, "exploration budget exhausted; exploiting from now on");
                true
            }
            Ok(_) => true,
            Err(_) => false,
        }
    }

    fn phase(&self) -> TauPhase {
        if self.remaining() > 0 {
            TauPhase::Exploring
        } else {
            TauPhase::Exploiting
        }
    }
}

/// Tau-first over a single-action default policy.
pub struct TauFirst<P> {
    policy: Handle<P>,
    cfg: TauFirstConfig,
    budget: Budget,
    explore: ExploreFlag,
}

impl<P> TauFirst<P> {
    pub fn new(policy: P, tau: u32, num_actions: u32) -> Result<Self> {
        Self::with_config(
            policy,
            TauFirstConfig {
                tau,
                actions: ActionCount::Fixed(num_actions),
            },
        )
    }

    pub fn variable(policy: P, tau: u32) -> Result<Self> {
        Self::with_config(
            policy,
            TauFirstConfig {
                tau,
                actions: ActionCount::Variable,
            },
        )
    }

    pub fn with_config(policy: P, cfg: TauFirstConfig) -> Result<Self> {
        cfg.actions.validate()?;
        Ok(Self {
            policy: Handle::new(policy),
            budget: Budget::new(cfg.tau),
            cfg,
            explore: ExploreFlag::new(),
        })
    }

    /// Configuration as constructed; `tau` is the initial budget, not the remaining one.
    pub fn config(&self) -> TauFirstConfig {
        self.cfg
    }

    pub fn remaining(&self) -> u32 {
        self.budget.remaining()
    }

    pub fn phase(&self) -> TauPhase {
        self.budget.phase()
    }

    pub fn update_policy(&self, policy: P) {
        self.policy.replace(policy);
        tracing::debug!(explorer = "tau_first", "default policy replaced");
    }
}

impl<P> fmt::Debug for TauFirst<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TauFirst")
            .field("cfg", &self.cfg)
            .field("remaining", &self.remaining())
            .field("explore", &self.explore.get())
            .finish_non_exhaustive()
    }
}

impl<C, P> Explorer<C> for TauFirst<P>
where
    C: ActionContext + ?Sized,
    P: Policy<C>,
{
    type Action = u32;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<u32>> {
        let n = self.cfg.actions.resolve(context)?;

        if self.explore.get() && self.budget.take("tau_first") {
            let action = Prg::new(salted_seed).uniform_int(1, n);
            return Ok(Decision::explored(action, 1.0 / n as f32));
        }

        let policy = self.policy.snapshot();
        let action = check_action(policy.choose_action(context), n)?;
        Ok(Decision::exploited(action))
    }

    fn set_exploring(&self, explore: bool) {
        self.explore.set(explore);
    }
}

/// Tau-first over a ranking policy.
///
/// The policy's ranking is always obtained and validated first; an exploring decision
/// then promotes the random action to the front and keeps the rest of the order.
pub struct TauFirstRanking<P> {
    policy: Handle<P>,
    cfg: TauFirstConfig,
    budget: Budget,
    explore: ExploreFlag,
}

impl<P> TauFirstRanking<P> {
    pub fn new(policy: P, tau: u32, num_actions: u32) -> Result<Self> {
        Self::with_config(
            policy,
            TauFirstConfig {
                tau,
                actions: ActionCount::Fixed(num_actions),
            },
        )
    }

    pub fn variable(policy: P, tau: u32) -> Result<Self> {
        Self::with_config(
            policy,
            TauFirstConfig {
                tau,
                actions: ActionCount::Variable,
            },
        )
    }

    pub fn with_config(policy: P, cfg: TauFirstConfig) -> Result<Self> {
        cfg.actions.validate()?;
        Ok(Self {
            policy: Handle::new(policy),
            budget: Budget::new(cfg.tau),
            cfg,
            explore: ExploreFlag::new(),
        })
    }

    pub fn config(&self) -> TauFirstConfig {
        self.cfg
    }

    pub fn remaining(&self) -> u32 {
        self.budget.remaining()
    }

    pub fn phase(&self) -> TauPhase {
        self.budget.phase()
    }

    pub fn update_policy(&self, policy: P) {
        self.policy.replace(policy);
        tracing::debug!(explorer = "tau_first_ranking", "default policy replaced");
    }
}

impl<P> fmt::Debug for TauFirstRanking<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TauFirstRanking")
            .field("cfg", &self.cfg)
            .field("remaining", &self.remaining())
            .field("explore", &self.explore.get())
            .finish_non_exhaustive()
    }
}

impl<C, P> Explorer<C> for TauFirstRanking<P>
where
    C: ActionContext + ?Sized,
    P: RankingPolicy<C>,
{
    type Action = Vec<u32>;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<Vec<u32>>> {
        let n = self.cfg.actions.resolve(context)?;
        let policy = self.policy.snapshot();
        let mut ranking = policy.choose_actions(context, n);
        // An invalid proposal must not consume budget.
        validate_ranking_len(&ranking, n)?;

        if self.explore.get() && self.budget.take("tau_first_ranking") {
            let action = Prg::new(salted_seed).uniform_int(1, n);
            promote_to_front(action, &mut ranking);
            return Ok(Decision::explored(ranking, 1.0 / n as f32));
        }
        Ok(Decision::exploited(ranking))
    }

    fn set_exploring(&self, explore: bool) {
        self.explore.set(explore);
    }
}
