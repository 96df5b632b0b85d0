//! Collaborator traits: what the exploration core consumes from the host.
//!
//! - [`Policy`] proposes one action, [`RankingPolicy`] proposes a full ranking.
//! - [`Scorer`] returns one score per action (softmax / generic).
//! - [`Recorder`] receives decisions flagged for logging.
//! - [`ActionContext`] is the optional capability a context implements when the number
//!   of actions varies per call.
//!
//! Closures implement the policy and scorer traits, which keeps tests and small hosts
//! free of boilerplate:
//!
//! ```rust
//! use explore::{EpsilonGreedy, Explorer};
//!
//! let eg = EpsilonGreedy::new(|_ctx: &()| 2u32, 0.2, 4).unwrap();
//! let d = eg.decide(42, &()).unwrap();
//! assert!((1..=4).contains(d.action()));
//! ```

use std::sync::Arc;

/// Default policy proposing a single 1-based action.
///
/// Must be safe to call concurrently when a strategy is shared across threads.
pub trait Policy<C: ?Sized> {
    fn choose_action(&self, context: &C) -> u32;
}

/// Default policy proposing a ranking (a permutation of `1..=num_actions`, best first).
pub trait RankingPolicy<C: ?Sized> {
    fn choose_actions(&self, context: &C, num_actions: u32) -> Vec<u32>;
}

/// Scorer returning one real-valued score per action, in action order.
pub trait Scorer<C: ?Sized> {
    fn score_actions(&self, context: &C) -> Vec<f32>;
}

/// Sink for decisions that should be logged.
///
/// Only called when a decision's `should_record` flag is set.
pub trait Recorder<C: ?Sized, A: ?Sized> {
    fn record(&self, context: &C, action: &A, probability: f32, unique_key: &str);
}

/// Optional capability: the context knows how many actions are available.
///
/// Strategies built with [`crate::ActionCount::Variable`] query this once per call; the
/// default `None` means "not supported" and makes such a call fail.
///
/// Every strategy's [`crate::Explorer`] impl carries the `C: ActionContext` bound, in
/// fixed mode too. A context used only with fixed action counts needs an empty impl,
/// which fixed-mode strategies never call:
///
/// ```rust
/// use explore::{ActionContext, Explorer, TauFirst};
///
/// struct Visit {
///     user_id: u64,
/// }
///
/// impl ActionContext for Visit {}
///
/// let tf = TauFirst::new(|v: &Visit| (v.user_id % 3) as u32 + 1, 0, 3).unwrap();
/// let d = tf.decide(1, &Visit { user_id: 4 }).unwrap();
/// assert_eq!(*d.action(), 2);
/// ```
pub trait ActionContext {
    fn number_of_actions(&self) -> Option<u32> {
        None
    }
}

impl<C, F> Policy<C> for F
where
    C: ?Sized,
    F: Fn(&C) -> u32,
{
    fn choose_action(&self, context: &C) -> u32 {
        self(context)
    }
}

impl<C, F> RankingPolicy<C> for F
where
    C: ?Sized,
    F: Fn(&C, u32) -> Vec<u32>,
{
    fn choose_actions(&self, context: &C, num_actions: u32) -> Vec<u32> {
        self(context, num_actions)
    }
}

impl<C, F> Scorer<C> for F
where
    C: ?Sized,
    F: Fn(&C) -> Vec<f32>,
{
    fn score_actions(&self, context: &C) -> Vec<f32> {
        self(context)
    }
}

impl<C: ?Sized, A: ?Sized, R: Recorder<C, A> + ?Sized> Recorder<C, A> for &R {
    fn record(&self, context: &C, action: &A, probability: f32, unique_key: &str) {
        (**self).record(context, action, probability, unique_key);
    }
}

impl<C: ?Sized, A: ?Sized, R: Recorder<C, A> + ?Sized> Recorder<C, A> for Arc<R> {
    fn record(&self, context: &C, action: &A, probability: f32, unique_key: &str) {
        (**self).record(context, action, probability, unique_key);
    }
}

impl<T: ActionContext + ?Sized> ActionContext for &T {
    fn number_of_actions(&self) -> Option<u32> {
        (**self).number_of_actions()
    }
}

impl<T: ActionContext + ?Sized> ActionContext for Arc<T> {
    fn number_of_actions(&self) -> Option<u32> {
        (**self).number_of_actions()
    }
}

impl ActionContext for () {}
impl ActionContext for u32 {}
impl ActionContext for u64 {}
impl ActionContext for usize {}
impl ActionContext for str {}
impl ActionContext for String {}
impl ActionContext for [f32] {}
impl ActionContext for Vec<f32> {}
impl ActionContext for [f64] {}
impl ActionContext for Vec<f64> {}
