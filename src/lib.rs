//! `explore`: reproducible contextual-bandit exploration with exact propensities.
//!
//! A host has a default policy (or a scorer) that proposes actions for a context.
//! `explore` injects controlled randomization around it and reports, for every
//! decision, the probability with which the realized action was chosen. Logged
//! `(context, action, probability)` triples can then be used for unbiased off-policy
//! evaluation and learning.
//!
//! **Reproducibility is the contract.** Every decision is driven by a fresh
//! [`Prg`] seeded from `hash(unique_key) + hash(app_id)` (MurmurHash3 x86_32 over
//! UTF-8, see [`seed_hash`]). Same key, same context, same configuration: same action
//! and bit-identical probability, across runs and processes.
//!
//! **Strategies** (all implement [`Explorer`]):
//! - [`EpsilonGreedy`] / [`EpsilonGreedyRanking`]: keep the policy's action with
//!   probability `1 - epsilon`, otherwise uniform.
//! - [`Softmax`]: sample from `exp(lambda * score)`.
//! - [`Generic`]: sample from caller-supplied non-negative weights.
//! - [`Bootstrap`] / [`BootstrapRanking`]: pick one of `B` bagged policies; the
//!   probability is the vote share of the chosen action.
//! - [`TauFirst`] / [`TauFirstRanking`]: uniform for the first `tau` decisions, then
//!   exploit forever.
//!
//! Contexts are any type implementing [`ActionContext`]. It is required even with a
//! fixed action count, where an empty `impl ActionContext for MyContext {}` is enough;
//! `()`, integers, strings and float vectors already have one.
//!
//! **Entry point:** [`Dispatcher`] salts the seed, runs an explorer and forwards
//! recordable decisions to a [`Recorder`] ([`StringRecorder`], [`MemoryRecorder`], or
//! your own).
//!
//! ```rust
//! use explore::{Dispatcher, EpsilonGreedy, MemoryRecorder};
//!
//! let dispatcher = Dispatcher::new("my-app", MemoryRecorder::<String, u32>::new());
//! let explorer = EpsilonGreedy::new(|_ctx: &String| 1u32, 0.2, 4).unwrap();
//!
//! let ctx = "user=42".to_string();
//! let a = dispatcher.choose_action("request-1", &ctx, &explorer).unwrap();
//! let b = dispatcher.choose_action("request-1", &ctx, &explorer).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(dispatcher.recorder().len(), 2);
//! ```
//!
//! Actions are 1-based throughout. Rankings are permutations of `1..=N`, best first.
//!
//! **Non-goals:** no feature extraction, model training or persistence; policy and
//! scorer calls are synchronous and never retried.
//!
//! **Features:** `serde` derives `Serialize`/`Deserialize` for configs, decisions and
//! recorded interactions.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod stable_hash;
pub use stable_hash::*;

mod prg;
pub use prg::*;

mod ranking;
pub use ranking::*;

mod decision;
pub use decision::*;

mod policy;
pub use policy::*;

mod alloc;
pub use alloc::*;

mod explorer;
pub use explorer::{Explorer, Handle};

mod epsilon_greedy;
pub use epsilon_greedy::*;

mod softmax;
pub use softmax::*;

mod generic;
pub use generic::*;

mod bootstrap;
pub use bootstrap::*;

mod tau_first;
pub use tau_first::*;

mod dispatcher;
pub use dispatcher::*;

mod recorder;
pub use recorder::*;
