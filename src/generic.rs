//! Sampling from an arbitrary caller-supplied distribution.
//!
//! The scorer returns non-negative weights, one per action; they are normalized and
//! sampled with the same cumulative walk as softmax. There is no exploit-only mode: the
//! weights already are the caller's intended distribution.

use std::fmt;

use crate::alloc::{normalize_weights, sample_cumulative};
use crate::explorer::{check_scores, Handle};
use crate::prg::Prg;
use crate::{ActionContext, ActionCount, Decision, ExploreError, Explorer, Result, Scorer};

/// Configuration for generic sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericConfig {
    pub actions: ActionCount,
}

/// Sample an action proportionally to scorer weights.
pub struct Generic<S> {
    scorer: Handle<S>,
    cfg: GenericConfig,
}

impl<S> Generic<S> {
    pub fn new(scorer: S, num_actions: u32) -> Result<Self> {
        Self::with_config(
            scorer,
            GenericConfig {
                actions: ActionCount::Fixed(num_actions),
            },
        )
    }

    pub fn variable(scorer: S) -> Result<Self> {
        Self::with_config(
            scorer,
            GenericConfig {
                actions: ActionCount::Variable,
            },
        )
    }

    pub fn with_config(scorer: S, cfg: GenericConfig) -> Result<Self> {
        cfg.actions.validate()?;
        Ok(Self {
            scorer: Handle::new(scorer),
            cfg,
        })
    }

    pub fn config(&self) -> GenericConfig {
        self.cfg
    }

    pub fn update_scorer(&self, scorer: S) {
        self.scorer.replace(scorer);
        tracing::debug!(explorer = "generic", "scorer replaced");
    }
}

impl<S> fmt::Debug for Generic<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generic")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

fn check_weights(weights: &[f32]) -> Result<f32> {
    let mut total = 0.0f32;
    for (index, &score) in weights.iter().enumerate() {
        if score < 0.0 {
            return Err(ExploreError::NegativeScore { index, score });
        }
        total += score;
    }
    if total <= 0.0 {
        return Err(ExploreError::ZeroScoreSum);
    }
    // Finite weights can still overflow the f32 total; normalizing by it would report
    // probability 0 for every action.
    if !total.is_finite() {
        return Err(ExploreError::NonFiniteScoreSum(total));
    }
    Ok(total)
}

impl<C, S> Explorer<C> for Generic<S>
where
    C: ActionContext + ?Sized,
    S: Scorer<C>,
{
    type Action = u32;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<u32>> {
        let n = self.cfg.actions.resolve(context)?;
        let scorer = self.scorer.snapshot();
        let weights = scorer.score_actions(context);
        check_scores(&weights, n)?;
        let total = check_weights(&weights)?;

        let probs = normalize_weights(&weights, total);
        let u = Prg::new(salted_seed).uniform_unit_interval();
        let (idx, p) = sample_cumulative(&probs, u).unwrap_or((probs.len() - 1, 0.0));
        Ok(Decision::explored(idx as u32 + 1, p))
    }

    /// Accepted for interface parity; generic sampling always samples.
    fn set_exploring(&self, _explore: bool) {}
}
