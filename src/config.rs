//! Market configuration: the value a front-end or config loader hands to
//! the simulator.
//!
//! File formats are out of scope here; an adapter that parses TOML or
//! JSON just needs to produce a [`MarketConfig`]. Participant ids are
//! assigned by side and position: buyers `B1..Bk`, sellers `S1..Sm`.
//! Those ids are the stable external handle for every result map.

use crate::{Side, StrategyKind, Token};

/// One configured participant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantConfig {
    /// Human-readable label (informational; results are keyed by id).
    pub name: String,
    pub side: Side,
    pub strategy: StrategyKind,
    /// Number of endowment units, at least 1.
    pub num_units: usize,
    /// Lowest possible token draw.
    pub min_value: Token,
    /// Highest possible token draw.
    pub max_value: Token,
}

impl ParticipantConfig {
    pub fn new(
        name: impl Into<String>,
        side: Side,
        strategy: StrategyKind,
        num_units: usize,
        min_value: Token,
        max_value: Token,
    ) -> Self {
        ParticipantConfig {
            name: name.into(),
            side,
            strategy,
            num_units,
            min_value,
            max_value,
        }
    }
}

/// A complete market configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketConfig {
    pub market_name: String,
    /// Informational note carried along from the producer.
    pub message: String,
    pub participants: Vec<ParticipantConfig>,
}

impl MarketConfig {
    pub fn new(market_name: impl Into<String>, participants: Vec<ParticipantConfig>) -> Self {
        MarketConfig {
            market_name: market_name.into(),
            message: String::new(),
            participants,
        }
    }

    pub fn num_buyers(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.side == Side::Buyer)
            .count()
    }

    pub fn num_sellers(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.side == Side::Seller)
            .count()
    }

    /// A symmetric 4x4 all-Zero-Intelligence market: 3 units per trader,
    /// tokens drawn from [10, 200]. Used by the demo binary and as a
    /// baseline in tests.
    pub fn example() -> Self {
        let mut participants = Vec::new();
        for i in 1..=4 {
            participants.push(ParticipantConfig::new(
                format!("buyer {i}"),
                Side::Buyer,
                StrategyKind::ZeroIntelligence,
                3,
                10,
                200,
            ));
        }
        for i in 1..=4 {
            participants.push(ParticipantConfig::new(
                format!("seller {i}"),
                Side::Seller,
                StrategyKind::ZeroIntelligence,
                3,
                10,
                200,
            ));
        }
        let mut config = MarketConfig::new("example market", participants);
        config.message = "symmetric all-ZI example market".to_string();
        config
    }
}
