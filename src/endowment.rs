//! Endowment schedules: a buyer's reservation values and a seller's unit
//! costs.
//!
//! Both are validated, sorted token lists with a cursor that advances one
//! unit per own contract. Buyers consume values in descending order
//! (decreasing marginal utility); sellers consume costs in ascending order
//! (increasing marginal cost). A trader whose cursor has passed the last
//! unit is exhausted and must stop quoting.

use rand::Rng;
use rand::rngs::StdRng;

use crate::{MarketError, PRICE_CEILING, PRICE_FLOOR, Token};

/// Validate a token schedule shared by both endowment kinds.
fn check_tokens(owner: &str, tokens: &[Token]) -> Result<(), MarketError> {
    if tokens.is_empty() {
        return Err(MarketError::endowment(owner, "schedule is empty"));
    }
    if let Some(bad) = tokens.iter().find(|&&t| t < 0) {
        return Err(MarketError::endowment(
            owner,
            format!("negative token {bad}"),
        ));
    }
    Ok(())
}

/// Draw `units` tokens uniformly from `[lo, hi]` inclusive.
fn draw_tokens(
    owner: &str,
    units: usize,
    lo: Token,
    hi: Token,
    rng: &mut StdRng,
) -> Result<Vec<Token>, MarketError> {
    if units == 0 {
        return Err(MarketError::endowment(owner, "units must be positive"));
    }
    if lo > hi {
        return Err(MarketError::endowment(
            owner,
            format!("empty range [{lo}, {hi}]"),
        ));
    }
    if lo < PRICE_FLOOR || hi > PRICE_CEILING {
        return Err(MarketError::endowment(
            owner,
            format!("range [{lo}, {hi}] outside [{PRICE_FLOOR}, {PRICE_CEILING}]"),
        ));
    }
    Ok((0..units).map(|_| rng.gen_range(lo..=hi)).collect())
}

/// A buyer's private valuation schedule, sorted descending.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservationValues {
    owner: String,
    values: Vec<Token>,
    current_unit: usize,
}

impl ReservationValues {
    /// Build from explicit values. Fails if the list is empty or any value
    /// is negative. Values are sorted descending.
    pub fn new(owner: impl Into<String>, mut values: Vec<Token>) -> Result<Self, MarketError> {
        let owner = owner.into();
        check_tokens(&owner, &values)?;
        values.sort_unstable_by(|a, b| b.cmp(a));
        Ok(Self {
            owner,
            values,
            current_unit: 0,
        })
    }

    /// Build `units` values drawn uniformly from `[lo, hi]` inclusive.
    pub fn random(
        owner: impl Into<String>,
        units: usize,
        lo: Token,
        hi: Token,
        rng: &mut StdRng,
    ) -> Result<Self, MarketError> {
        let owner = owner.into();
        let values = draw_tokens(&owner, units, lo, hi, rng)?;
        Self::new(owner, values)
    }

    /// The value of the unit at the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<Token> {
        self.values.get(self.current_unit).copied()
    }

    /// The value of the unit after the cursor, falling back to the current
    /// value at the last unit. `None` once exhausted.
    pub fn next_token(&self) -> Option<Token> {
        self.values
            .get(self.current_unit + 1)
            .copied()
            .or_else(|| self.current())
    }

    /// Advance the cursor by one unit (called on each own contract).
    pub fn advance(&mut self) {
        self.current_unit += 1;
    }

    /// Highest value in the schedule.
    pub fn first(&self) -> Token {
        self.values[0]
    }

    /// Lowest value in the schedule.
    pub fn last(&self) -> Token {
        self.values[self.values.len() - 1]
    }

    /// Number of units endowed.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the schedule holds no units (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of the cursor: the number of units already traded.
    pub fn current_unit(&self) -> usize {
        self.current_unit
    }

    /// The full sorted schedule.
    pub fn tokens(&self) -> &[Token] {
        &self.values
    }

    /// Name of the owning trader.
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// A seller's private cost schedule, sorted ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitCosts {
    owner: String,
    costs: Vec<Token>,
    current_unit: usize,
}

impl UnitCosts {
    /// Build from explicit costs. Fails if the list is empty or any cost is
    /// negative. Costs are sorted ascending.
    pub fn new(owner: impl Into<String>, mut costs: Vec<Token>) -> Result<Self, MarketError> {
        let owner = owner.into();
        check_tokens(&owner, &costs)?;
        costs.sort_unstable();
        Ok(Self {
            owner,
            costs,
            current_unit: 0,
        })
    }

    /// Build `units` costs drawn uniformly from `[lo, hi]` inclusive.
    pub fn random(
        owner: impl Into<String>,
        units: usize,
        lo: Token,
        hi: Token,
        rng: &mut StdRng,
    ) -> Result<Self, MarketError> {
        let owner = owner.into();
        let costs = draw_tokens(&owner, units, lo, hi, rng)?;
        Self::new(owner, costs)
    }

    /// The cost of the unit at the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<Token> {
        self.costs.get(self.current_unit).copied()
    }

    /// The cost of the unit after the cursor, falling back to the current
    /// cost at the last unit. `None` once exhausted.
    pub fn next_token(&self) -> Option<Token> {
        self.costs
            .get(self.current_unit + 1)
            .copied()
            .or_else(|| self.current())
    }

    /// Advance the cursor by one unit (called on each own contract).
    pub fn advance(&mut self) {
        self.current_unit += 1;
    }

    /// Lowest cost in the schedule.
    pub fn first(&self) -> Token {
        self.costs[0]
    }

    /// Highest cost in the schedule.
    pub fn last(&self) -> Token {
        self.costs[self.costs.len() - 1]
    }

    /// Number of units endowed.
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// True when the schedule holds no units (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Position of the cursor: the number of units already traded.
    pub fn current_unit(&self) -> usize {
        self.current_unit
    }

    /// The full sorted schedule.
    pub fn tokens(&self) -> &[Token] {
        &self.costs
    }

    /// Name of the owning trader.
    pub fn owner(&self) -> &str {
        &self.owner
    }
}
