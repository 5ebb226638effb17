//! Traders: common state plus a side and a strategy tag.
//!
//! A trader is one tagged variant rather than a class per policy: the
//! name, side, endowment schedule, and observed/own price histories are
//! shared, and the [`StrategyKind`] tag selects the quoting policy in the
//! strategy dispatcher. This keeps dispatch exhaustive and all policy
//! code in one module.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;

use crate::endowment::{ReservationValues, UnitCosts};
use crate::{MarketError, Money, OfferKind, Quote, Side, Token, strategy};

/// The five quoting policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyKind {
    ZeroIntelligence,
    Kaplan,
    Ringuette,
    PersistentShout,
    Skeleton,
}

impl StrategyKind {
    /// All strategies, in config-spelling order.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::ZeroIntelligence,
        StrategyKind::Kaplan,
        StrategyKind::Ringuette,
        StrategyKind::PersistentShout,
        StrategyKind::Skeleton,
    ];
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::ZeroIntelligence => "Zero Intelligence",
            StrategyKind::Kaplan => "Kaplan",
            StrategyKind::Ringuette => "Ringuette",
            StrategyKind::PersistentShout => "Persistent Shout",
            StrategyKind::Skeleton => "Skeleton",
        };
        write!(f, "{name}")
    }
}

impl FromStr for StrategyKind {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Zero Intelligence" => Ok(StrategyKind::ZeroIntelligence),
            "Kaplan" => Ok(StrategyKind::Kaplan),
            "Ringuette" => Ok(StrategyKind::Ringuette),
            "Persistent Shout" => Ok(StrategyKind::PersistentShout),
            "Skeleton" => Ok(StrategyKind::Skeleton),
            other => Err(MarketError::UnknownStrategy(other.to_string())),
        }
    }
}

/// A trader's endowment: reservation values for buyers, unit costs for
/// sellers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenSchedule {
    Values(ReservationValues),
    Costs(UnitCosts),
}

impl TokenSchedule {
    /// The token at the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<Token> {
        match self {
            TokenSchedule::Values(v) => v.current(),
            TokenSchedule::Costs(c) => c.current(),
        }
    }

    /// The token after the cursor, falling back to the current one.
    pub fn next_token(&self) -> Option<Token> {
        match self {
            TokenSchedule::Values(v) => v.next_token(),
            TokenSchedule::Costs(c) => c.next_token(),
        }
    }

    /// The schedule's best token: highest value or lowest cost.
    pub fn first(&self) -> Token {
        match self {
            TokenSchedule::Values(v) => v.first(),
            TokenSchedule::Costs(c) => c.first(),
        }
    }

    /// The schedule's worst token: lowest value or highest cost.
    pub fn last(&self) -> Token {
        match self {
            TokenSchedule::Values(v) => v.last(),
            TokenSchedule::Costs(c) => c.last(),
        }
    }

    /// Number of units endowed.
    pub fn len(&self) -> usize {
        match self {
            TokenSchedule::Values(v) => v.len(),
            TokenSchedule::Costs(c) => c.len(),
        }
    }

    /// True when the schedule holds no units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of units already traded.
    pub fn current_unit(&self) -> usize {
        match self {
            TokenSchedule::Values(v) => v.current_unit(),
            TokenSchedule::Costs(c) => c.current_unit(),
        }
    }

    /// The full sorted schedule.
    pub fn tokens(&self) -> &[Token] {
        match self {
            TokenSchedule::Values(v) => v.tokens(),
            TokenSchedule::Costs(c) => c.tokens(),
        }
    }

    pub(crate) fn advance(&mut self) {
        match self {
            TokenSchedule::Values(v) => v.advance(),
            TokenSchedule::Costs(c) => c.advance(),
        }
    }
}

/// One market participant.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trader {
    name: String,
    side: Side,
    strategy: StrategyKind,
    schedule: TokenSchedule,
    /// Every contract price observed in the market.
    prices: Vec<Money>,
    /// Prices of this trader's own contracts, in contract order.
    contracts: Vec<Money>,
}

impl Trader {
    /// Create a buyer with the given valuation schedule.
    pub fn buyer(name: impl Into<String>, strategy: StrategyKind, values: ReservationValues) -> Self {
        Trader {
            name: name.into(),
            side: Side::Buyer,
            strategy,
            schedule: TokenSchedule::Values(values),
            prices: Vec::new(),
            contracts: Vec::new(),
        }
    }

    /// Create a seller with the given cost schedule.
    pub fn seller(name: impl Into<String>, strategy: StrategyKind, costs: UnitCosts) -> Self {
        Trader {
            name: name.into(),
            side: Side::Seller,
            strategy,
            schedule: TokenSchedule::Costs(costs),
            prices: Vec::new(),
            contracts: Vec::new(),
        }
    }

    /// Produce a bid for the given market state, or `None`.
    ///
    /// Only meaningful for buyers; a seller asked to bid quotes nothing.
    pub fn bid(
        &self,
        standing_bid: Money,
        standing_ask: Money,
        round_idx: usize,
        total_rounds: usize,
        rng: &mut StdRng,
    ) -> Option<Money> {
        debug_assert_eq!(self.side, Side::Buyer, "{} cannot bid", self.name);
        if self.side != Side::Buyer {
            return None;
        }
        strategy::quote(
            self.side,
            self.strategy,
            &self.schedule,
            standing_bid,
            standing_ask,
            round_idx,
            total_rounds,
            rng,
        )
    }

    /// Produce an ask for the given market state, or `None`.
    ///
    /// Only meaningful for sellers; a buyer asked to ask quotes nothing.
    pub fn ask(
        &self,
        standing_bid: Money,
        standing_ask: Money,
        round_idx: usize,
        total_rounds: usize,
        rng: &mut StdRng,
    ) -> Option<Money> {
        debug_assert_eq!(self.side, Side::Seller, "{} cannot ask", self.name);
        if self.side != Side::Seller {
            return None;
        }
        strategy::quote(
            self.side,
            self.strategy,
            &self.schedule,
            standing_bid,
            standing_ask,
            round_idx,
            total_rounds,
            rng,
        )
    }

    /// Side-dispatched quote, packaged for submission to the institution.
    pub fn quote(
        &self,
        standing_bid: Money,
        standing_ask: Money,
        round_idx: usize,
        total_rounds: usize,
        rng: &mut StdRng,
    ) -> Option<Quote> {
        let amount = strategy::quote(
            self.side,
            self.strategy,
            &self.schedule,
            standing_bid,
            standing_ask,
            round_idx,
            total_rounds,
            rng,
        )?;
        let kind = match self.side {
            Side::Buyer => OfferKind::Bid,
            Side::Seller => OfferKind::Ask,
        };
        Some(Quote {
            id: self.name.clone(),
            kind,
            amount,
        })
    }

    /// Contract notification from the institution.
    ///
    /// Every participant observes the price; the two counterparties also
    /// record it as their own and advance their endowment cursor.
    pub fn contract(&mut self, price: Money, is_mine: bool) {
        self.prices.push(price);
        if is_mine {
            self.contracts.push(price);
            self.schedule.advance();
        }
    }

    /// Realised surplus: Σ value − price for buyers, Σ price − cost for
    /// sellers, matching the k-th contract against the k-th unit.
    pub fn surplus(&self) -> f64 {
        let tokens = self.schedule.tokens();
        self.contracts
            .iter()
            .zip(tokens)
            .map(|(&price, &token)| match self.side {
                Side::Buyer => token as f64 - price,
                Side::Seller => price - token as f64,
            })
            .sum()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// The endowment schedule.
    pub fn schedule(&self) -> &TokenSchedule {
        &self.schedule
    }

    /// The token available for the next trade, if any.
    pub fn current(&self) -> Option<Token> {
        self.schedule.current()
    }

    /// Number of own contracts settled so far.
    pub fn units_traded(&self) -> usize {
        self.schedule.current_unit()
    }

    /// All contract prices observed in the market.
    pub fn prices(&self) -> &[Money] {
        &self.prices
    }

    /// Own contract prices, in contract order.
    pub fn contracts(&self) -> &[Money] {
        &self.contracts
    }
}

impl fmt::Display for Trader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}--{} {:?} current unit = {}",
            self.side,
            self.name,
            self.schedule.tokens(),
            self.schedule.current_unit()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn buyer(values: Vec<Token>) -> Trader {
        Trader::buyer(
            "B1",
            StrategyKind::ZeroIntelligence,
            ReservationValues::new("B1", values).unwrap(),
        )
    }

    fn seller(costs: Vec<Token>) -> Trader {
        Trader::seller(
            "S1",
            StrategyKind::ZeroIntelligence,
            UnitCosts::new("S1", costs).unwrap(),
        )
    }

    #[test]
    fn strategy_parse_roundtrip() {
        for strategy in StrategyKind::ALL {
            let parsed: StrategyKind = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
        assert!(matches!(
            "Sniper".parse::<StrategyKind>(),
            Err(MarketError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn cursor_advances_on_own_contracts() {
        let mut trader = buyer(vec![100, 90, 80]);

        trader.contract(70.0, true);
        trader.contract(60.0, true);
        assert_eq!(trader.units_traded(), 2);
        assert_eq!(trader.contracts(), &[70.0, 60.0]);
        assert_eq!(trader.current(), Some(80));

        trader.contract(75.0, true);
        assert_eq!(trader.units_traded(), 3);
        assert_eq!(trader.current(), None);

        // exhausted: every strategy call is silent
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(trader.bid(0.0, 999.0, 0, 100, &mut rng), None);
    }

    #[test]
    fn observed_prices_do_not_move_cursor() {
        let mut trader = buyer(vec![100]);
        trader.contract(70.0, false);
        trader.contract(65.0, false);
        assert_eq!(trader.prices(), &[70.0, 65.0]);
        assert!(trader.contracts().is_empty());
        assert_eq!(trader.units_traded(), 0);
        assert_eq!(trader.current(), Some(100));
    }

    #[test]
    fn buyer_surplus_is_value_minus_price() {
        let mut trader = buyer(vec![100, 90]);
        trader.contract(70.0, true);
        trader.contract(85.0, true);
        // (100 - 70) + (90 - 85)
        assert_eq!(trader.surplus(), 35.0);
    }

    #[test]
    fn seller_surplus_is_price_minus_cost() {
        let mut trader = seller(vec![30, 50]);
        trader.contract(70.0, true);
        // 70 - 30
        assert_eq!(trader.surplus(), 40.0);
    }

    #[test]
    fn quote_carries_name_and_kind() {
        let trader = buyer(vec![100]);
        let mut rng = StdRng::seed_from_u64(3);
        let quote = trader.quote(0.0, 999.0, 0, 100, &mut rng).unwrap();
        assert_eq!(quote.id, "B1");
        assert_eq!(quote.kind, OfferKind::Bid);
        assert!(quote.amount >= 0.0);

        let trader = seller(vec![10]);
        let quote = trader.quote(0.0, 999.0, 0, 100, &mut rng).unwrap();
        assert_eq!(quote.kind, OfferKind::Ask);
    }

    #[test]
    fn display_shows_side_and_schedule() {
        let trader = buyer(vec![100, 50]);
        let s = format!("{trader}");
        assert!(s.contains("B--B1"));
        assert!(s.contains("current unit = 0"));
    }
}
