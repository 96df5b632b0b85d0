//! Top-level entry point: seed a strategy per decision and log what it explored.
//!
//! The salted seed is `hash(unique_key) + hash(app_id)`, so two applications sharing a
//! key space still draw independent randomness, and replaying the same key reproduces
//! the same decision.

use crate::stable_hash::{salt, seed_hash};
use crate::{Decision, Explorer, Recorder, Result};

/// Seeds explorers and forwards recordable decisions to a recorder.
///
/// `R` is usually a [`crate::StringRecorder`], a [`crate::MemoryRecorder`], or a
/// reference / `Arc` to a host-owned sink.
#[derive(Debug)]
pub struct Dispatcher<R> {
    app_id: String,
    app_hash: u32,
    recorder: R,
}

impl<R> Dispatcher<R> {
    pub fn new(app_id: impl Into<String>, recorder: R) -> Self {
        let app_id = app_id.into();
        let app_hash = seed_hash(&app_id);
        Self {
            app_id,
            app_hash,
            recorder,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn into_recorder(self) -> R {
        self.recorder
    }

    /// Seed used for `unique_key` under this application.
    pub fn salted_seed(&self, unique_key: &str) -> u64 {
        salt(self.app_hash, seed_hash(unique_key))
    }

    /// Choose an action for `context`, recording it if the explorer asks to.
    pub fn choose_action<C, E>(
        &self,
        unique_key: &str,
        context: &C,
        explorer: &E,
    ) -> Result<E::Action>
    where
        C: ?Sized,
        E: Explorer<C> + ?Sized,
        R: Recorder<C, E::Action>,
    {
        self.choose_decision(unique_key, context, explorer)
            .map(Decision::into_action)
    }

    /// Like [`Self::choose_action`] but returns the whole [`Decision`], for hosts that
    /// carry the propensity in-band.
    pub fn choose_decision<C, E>(
        &self,
        unique_key: &str,
        context: &C,
        explorer: &E,
    ) -> Result<Decision<E::Action>>
    where
        C: ?Sized,
        E: Explorer<C> + ?Sized,
        R: Recorder<C, E::Action>,
    {
        let seed = self.salted_seed(unique_key);
        let decision = explorer.decide(seed, context)?;
        tracing::trace!(
            app_id = %self.app_id,
            unique_key,
            probability = decision.probability(),
            should_record = decision.should_record(),
            "decision"
        );
        if decision.should_record() {
            self.recorder
                .record(context, decision.action(), decision.probability(), unique_key);
            tracing::debug!(unique_key, probability = decision.probability(), "recorded");
        }
        Ok(decision)
    }
}
