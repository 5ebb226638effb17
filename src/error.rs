//! Error types for market construction.
//!
//! Only construction can fail. Invalid orders during trading are not
//! errors: the institution logs them as rejected offers and keeps going
//! (see [`crate::OrderOutcome`]).

/// Errors that can occur while building a market from a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarketError {
    /// An endowment schedule failed validation.
    #[error("invalid endowment for {owner}: {reason}")]
    Endowment { owner: String, reason: String },

    /// A configuration named a bidding strategy this crate does not know.
    #[error("unknown strategy: {0:?}")]
    UnknownStrategy(String),
}

impl MarketError {
    pub(crate) fn endowment(owner: &str, reason: impl Into<String>) -> Self {
        MarketError::Endowment {
            owner: owner.to_string(),
            reason: reason.into(),
        }
    }
}
