//! Competitive equilibrium of the aggregate demand and supply curves.
//!
//! The curves are flattened unit lists: demand sorted descending by
//! value, supply ascending by cost. Walking them pairwise, every pair
//! with `value >= cost` is an equilibrium unit; the first pair that fails
//! bounds the equilibrium price range. The result is the efficiency
//! benchmark for a trading period and is independent of any strategy.

use crate::Token;

/// The competitive equilibrium of one market realisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equilibrium {
    /// Number of units that trade in equilibrium.
    pub units: usize,
    /// Lower bound of the market-clearing price range.
    pub price_low: Token,
    /// Upper bound of the market-clearing price range.
    pub price_high: Token,
    /// Total surplus available at the equilibrium allocation; the upper
    /// bound on realised welfare.
    pub max_surplus: Token,
}

/// Compute the equilibrium from sorted `(trader, value)` demand and
/// `(trader, cost)` supply curves. Returns `None` when no unit crosses.
pub fn calc_equilibrium(demand: &[(String, Token)], supply: &[(String, Token)]) -> Option<Equilibrium> {
    let mut units = 0;
    let mut max_surplus = 0;
    let mut last_accepted = None;
    let mut first_rejected = None;

    for (&(_, value), &(_, cost)) in demand.iter().zip(supply) {
        if value >= cost {
            units += 1;
            max_surplus += value - cost;
            last_accepted = Some((value, cost));
        } else {
            first_rejected = Some((value, cost));
            break;
        }
    }

    let (last_value, last_cost) = last_accepted?;
    let (price_low, price_high) = match first_rejected {
        Some((rejected_value, rejected_cost)) => (
            last_cost.max(rejected_value),
            last_value.min(rejected_cost),
        ),
        // one curve ran out while every pair crossed: the accepted pair
        // alone bounds the range
        None => (last_cost, last_value),
    };

    Some(Equilibrium {
        units,
        price_low,
        price_high,
        max_surplus,
    })
}
