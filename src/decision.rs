//! The outcome of one exploration call.
//!
//! A [`Decision`] carries the chosen action (a single 1-based index, or a ranking),
//! the probability the strategy attributes to that outcome, and whether it should be
//! recorded. Downstream learners divide by `probability`, so it must be exact for the
//! realized choice, not an approximation of the policy's distribution.

/// One exploration result.
///
/// `A` is `u32` for single-action strategies and `Vec<u32>` for ranking strategies.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision<A> {
    action: A,
    probability: f32,
    should_record: bool,
}

impl<A> Decision<A> {
    /// An exploring decision that should be recorded.
    pub(crate) fn explored(action: A, probability: f32) -> Self {
        Self {
            action,
            probability,
            should_record: true,
        }
    }

    /// A pure-exploitation decision: probability 1, not recorded.
    pub(crate) fn exploited(action: A) -> Self {
        Self {
            action,
            probability: 1.0,
            should_record: false,
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    /// Probability attributed to the realized action, in `[0, 1]`.
    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn should_record(&self) -> bool {
        self.should_record
    }

    pub fn into_action(self) -> A {
        self.action
    }

    pub fn into_parts(self) -> (A, f32, bool) {
        (self.action, self.probability, self.should_record)
    }
}

impl Decision<Vec<u32>> {
    /// Top-ranked action of a ranking decision.
    pub fn top_action(&self) -> Option<u32> {
        self.action.first().copied()
    }
}

/// How a strategy learns the number of actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCount {
    /// Fixed at construction (must be at least 1).
    Fixed(u32),
    /// Asked from the context on every call via [`crate::ActionContext`].
    #[default]
    Variable,
}

impl ActionCount {
    pub(crate) fn validate(self) -> crate::Result<Self> {
        match self {
            Self::Fixed(0) => Err(crate::ExploreError::InvalidActionCount(0)),
            other => Ok(other),
        }
    }

    /// Resolve the action count for one call.
    pub fn resolve<C: crate::ActionContext + ?Sized>(self, context: &C) -> crate::Result<u32> {
        let n = match self {
            Self::Fixed(n) => n,
            Self::Variable => context
                .number_of_actions()
                .ok_or(crate::ExploreError::ActionCountUnavailable)?,
        };
        if n < 1 {
            return Err(crate::ExploreError::InvalidActionCount(n));
        }
        Ok(n)
    }
}
