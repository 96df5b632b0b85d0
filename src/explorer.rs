//! The strategy contract and the shared plumbing strategies are built from.
//!
//! Every exploration strategy implements [`Explorer`]: given a salted seed and a
//! context it returns a [`Decision`]. The dispatcher only ever sees this trait.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{Decision, Result};

/// Common interface for exploration strategies.
///
/// # Example
///
/// ```rust
/// use explore::{Explorer, Softmax, TauFirst};
///
/// fn run<E: Explorer<()>>(e: &E) -> f32 {
///     e.decide(7, &()).unwrap().probability()
/// }
///
/// let sm = Softmax::new(|_: &()| vec![1.0f32, 2.0, 3.0], 0.5, 3).unwrap();
/// let tf = TauFirst::new(|_: &()| 1u32, 10, 3).unwrap();
/// assert!(run(&sm) > 0.0);
/// assert!((run(&tf) - 1.0 / 3.0).abs() < 1e-6);
/// ```
pub trait Explorer<C: ?Sized> {
    /// `u32` for single-action strategies, `Vec<u32>` for ranking strategies.
    type Action;

    /// Make one decision. The same `salted_seed`, context and configuration always
    /// yield the same decision.
    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<Self::Action>>;

    /// Turn exploration on or off. When off, strategies exploit the default policy
    /// (probability 1, not recorded) unless documented otherwise.
    fn set_exploring(&self, explore: bool);
}

impl<C: ?Sized, E: Explorer<C> + ?Sized> Explorer<C> for &E {
    type Action = E::Action;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<Self::Action>> {
        (**self).decide(salted_seed, context)
    }

    fn set_exploring(&self, explore: bool) {
        (**self).set_exploring(explore);
    }
}

impl<C: ?Sized, E: Explorer<C> + ?Sized> Explorer<C> for Arc<E> {
    type Action = E::Action;

    fn decide(&self, salted_seed: u64, context: &C) -> Result<Decision<Self::Action>> {
        (**self).decide(salted_seed, context)
    }

    fn set_exploring(&self, explore: bool) {
        (**self).set_exploring(explore);
    }
}

/// Replaceable, shareable handle to a policy or scorer.
///
/// Readers take a snapshot (`Arc` clone) and release the lock before calling into the
/// policy, so a replacement never blocks on a slow policy and an in-flight decision
/// always finishes with the policy it started with.
pub struct Handle<P: ?Sized> {
    inner: RwLock<Arc<P>>,
}

impl<P: ?Sized> fmt::Debug for Handle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").finish_non_exhaustive()
    }
}

impl<P> Handle<P> {
    pub fn new(value: P) -> Self {
        Self {
            inner: RwLock::new(Arc::new(value)),
        }
    }

    /// Swap in a new value; decisions started after this call see it.
    pub fn replace(&self, value: P) {
        *self.inner.write() = Arc::new(value);
    }
}

impl<P: ?Sized> Handle<P> {
    pub fn from_arc(value: Arc<P>) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    pub fn replace_arc(&self, value: Arc<P>) {
        *self.inner.write() = value;
    }

    /// Current value.
    pub fn snapshot(&self) -> Arc<P> {
        Arc::clone(&self.inner.read())
    }
}

/// Exploration on/off switch.
#[derive(Debug)]
pub(crate) struct ExploreFlag(AtomicBool);

impl ExploreFlag {
    pub(crate) fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    pub(crate) fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, explore: bool) {
        self.0.store(explore, Ordering::Release);
    }
}

/// Reject a score vector of the wrong length or with non-finite entries.
pub(crate) fn check_scores(scores: &[f32], num_actions: u32) -> Result<()> {
    if scores.len() != num_actions as usize {
        return Err(crate::ExploreError::ScoreCountMismatch {
            expected: num_actions,
            got: scores.len(),
        });
    }
    if let Some((index, &score)) = scores.iter().enumerate().find(|(_, s)| !s.is_finite()) {
        return Err(crate::ExploreError::NonFiniteScore { index, score });
    }
    Ok(())
}

/// Reject a proposed action outside `[1, num_actions]`.
pub(crate) fn check_action(action: u32, num_actions: u32) -> Result<u32> {
    if action == 0 || action > num_actions {
        return Err(crate::ExploreError::ActionOutOfRange {
            action,
            num_actions,
        });
    }
    Ok(action)
}
