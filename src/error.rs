//! Error type shared by every exploration path.
//!
//! Failures fall into three groups (see [`ErrorKind`]). All of them are fatal at the
//! point of detection: a [`crate::Decision`] is either fully valid or not produced.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ExploreError> = std::result::Result<T, E>;

/// Coarse classification of an [`ExploreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid construction arguments or an unusable context.
    Configuration,
    /// A policy or scorer returned something that violates its contract.
    ContractViolation,
    /// A value reaching the seed hasher cannot be encoded.
    Input,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExploreError {
    #[error("epsilon must be in [0, 1], got {0}")]
    InvalidEpsilon(f32),

    #[error("softmax lambda must be finite, got {0}")]
    InvalidLambda(f32),

    #[error("bootstrap needs at least one bag")]
    NoBags,

    #[error("number of actions must be at least 1, got {0}")]
    InvalidActionCount(u32),

    #[error("explorer has a variable action count but the context does not report one")]
    ActionCountUnavailable,

    #[error("action {action} is outside [1, {num_actions}]")]
    ActionOutOfRange { action: u32, num_actions: u32 },

    #[error("scorer returned {got} scores for {expected} actions")]
    ScoreCountMismatch { expected: u32, got: usize },

    #[error("score {score} at index {index} is negative")]
    NegativeScore { index: usize, score: f32 },

    #[error("score {score} at index {index} is not finite")]
    NonFiniteScore { index: usize, score: f32 },

    #[error("scores sum to zero")]
    ZeroScoreSum,

    #[error("scores sum to {0}, which cannot be normalized")]
    NonFiniteScoreSum(f32),

    #[error("invalid action ranking: {0}")]
    InvalidRanking(String),

    #[error("ranking has {got} entries for {expected} actions")]
    RankingLengthMismatch { expected: u32, got: usize },

    #[error("unpaired UTF-16 surrogate 0x{0:04x} cannot be hashed")]
    UnpairedSurrogate(u16),
}

impl ExploreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEpsilon(_)
            | Self::InvalidLambda(_)
            | Self::NoBags
            | Self::InvalidActionCount(_)
            | Self::ActionCountUnavailable => ErrorKind::Configuration,
            Self::ActionOutOfRange { .. }
            | Self::ScoreCountMismatch { .. }
            | Self::NegativeScore { .. }
            | Self::NonFiniteScore { .. }
            | Self::ZeroScoreSum
            | Self::NonFiniteScoreSum(_)
            | Self::InvalidRanking(_)
            | Self::RankingLengthMismatch { .. } => ErrorKind::ContractViolation,
            Self::UnpairedSurrogate(_) => ErrorKind::Input,
        }
    }
}
