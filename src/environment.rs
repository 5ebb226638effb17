//! The market environment: trader arena, aggregate demand and supply
//! curves, and the competitive equilibrium benchmark.
//!
//! The environment owns the traders; the institution only holds indices
//! into this arena. It is rebuilt for every trading period, drawing fresh
//! endowments from the configuration.

use rand::rngs::StdRng;

use crate::endowment::{ReservationValues, UnitCosts};
use crate::equilibrium::{Equilibrium, calc_equilibrium};
use crate::{MarketConfig, MarketError, Side, Token, Trader};

/// One market realisation: traders with drawn endowments plus the curves
/// and equilibrium derived from them.
#[derive(Clone, Debug)]
pub struct MarketEnvironment {
    name: String,
    traders: Vec<Trader>,
    demand: Vec<(String, Token)>,
    supply: Vec<(String, Token)>,
    equilibrium: Option<Equilibrium>,
}

impl MarketEnvironment {
    /// Build every configured participant, drawing endowments from `rng`,
    /// then derive the curves and the equilibrium.
    ///
    /// Buyers are named `B1..Bk` and sellers `S1..Sm` in configuration
    /// order; these ids key every result map.
    pub fn from_config(config: &MarketConfig, rng: &mut StdRng) -> Result<Self, MarketError> {
        let mut traders = Vec::with_capacity(config.participants.len());
        let mut buyers = 0;
        let mut sellers = 0;

        for participant in &config.participants {
            let trader = match participant.side {
                Side::Buyer => {
                    buyers += 1;
                    let id = format!("B{buyers}");
                    let values = ReservationValues::random(
                        &id,
                        participant.num_units,
                        participant.min_value,
                        participant.max_value,
                        rng,
                    )?;
                    Trader::buyer(id, participant.strategy, values)
                }
                Side::Seller => {
                    sellers += 1;
                    let id = format!("S{sellers}");
                    let costs = UnitCosts::random(
                        &id,
                        participant.num_units,
                        participant.min_value,
                        participant.max_value,
                        rng,
                    )?;
                    Trader::seller(id, participant.strategy, costs)
                }
            };
            traders.push(trader);
        }

        let mut env = MarketEnvironment {
            name: config.market_name.clone(),
            traders,
            demand: Vec::new(),
            supply: Vec::new(),
            equilibrium: None,
        };
        env.recalculate();
        Ok(env)
    }

    /// Rebuild the demand and supply curves and recompute the equilibrium.
    pub fn recalculate(&mut self) {
        self.make_demand();
        self.make_supply();
        self.equilibrium = calc_equilibrium(&self.demand, &self.supply);
    }

    /// Flatten buyer schedules into `(id, value)` units, sorted
    /// descending by value.
    fn make_demand(&mut self) {
        self.demand = self
            .traders
            .iter()
            .filter(|t| t.side() == Side::Buyer)
            .flat_map(|t| {
                t.schedule()
                    .tokens()
                    .iter()
                    .map(|&v| (t.name().to_string(), v))
            })
            .collect();
        self.demand.sort_by(|a, b| b.1.cmp(&a.1));
    }

    /// Flatten seller schedules into `(id, cost)` units, sorted ascending
    /// by cost.
    fn make_supply(&mut self) {
        self.supply = self
            .traders
            .iter()
            .filter(|t| t.side() == Side::Seller)
            .flat_map(|t| {
                t.schedule()
                    .tokens()
                    .iter()
                    .map(|&c| (t.name().to_string(), c))
            })
            .collect();
        self.supply.sort_by(|a, b| a.1.cmp(&b.1));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The trader arena. Index order is registration order.
    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    pub fn traders_mut(&mut self) -> &mut [Trader] {
        &mut self.traders
    }

    /// Registered buyers, in id order.
    pub fn buyers(&self) -> impl Iterator<Item = &Trader> {
        self.traders.iter().filter(|t| t.side() == Side::Buyer)
    }

    /// Registered sellers, in id order.
    pub fn sellers(&self) -> impl Iterator<Item = &Trader> {
        self.traders.iter().filter(|t| t.side() == Side::Seller)
    }

    /// The aggregate demand curve.
    pub fn demand(&self) -> &[(String, Token)] {
        &self.demand
    }

    /// The aggregate supply curve.
    pub fn supply(&self) -> &[(String, Token)] {
        &self.supply
    }

    /// The competitive equilibrium, `None` when no unit crosses.
    pub fn equilibrium(&self) -> Option<Equilibrium> {
        self.equilibrium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn builds_ids_by_side_and_order() {
        let config = MarketConfig::example();
        let mut rng = StdRng::seed_from_u64(11);
        let env = MarketEnvironment::from_config(&config, &mut rng).unwrap();

        let names: Vec<&str> = env.traders().iter().map(|t| t.name()).collect();
        assert_eq!(names, ["B1", "B2", "B3", "B4", "S1", "S2", "S3", "S4"]);
        assert_eq!(env.buyers().count(), 4);
        assert_eq!(env.sellers().count(), 4);
    }

    #[test]
    fn curves_are_sorted_and_complete() {
        let config = MarketConfig::example();
        let mut rng = StdRng::seed_from_u64(11);
        let env = MarketEnvironment::from_config(&config, &mut rng).unwrap();

        assert_eq!(env.demand().len(), 12);
        assert_eq!(env.supply().len(), 12);
        assert!(env.demand().windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(env.supply().windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn equilibrium_matches_direct_computation() {
        let config = MarketConfig::example();
        let mut rng = StdRng::seed_from_u64(11);
        let env = MarketEnvironment::from_config(&config, &mut rng).unwrap();

        let direct = calc_equilibrium(env.demand(), env.supply());
        assert_eq!(env.equilibrium(), direct);
        // symmetric draws from the same range essentially always cross
        let eq = env.equilibrium().unwrap();
        assert!(eq.units >= 1);
        assert!(eq.max_surplus > 0);
        assert!(eq.price_low <= eq.price_high);
    }

    #[test]
    fn construction_fails_on_bad_endowment_bounds() {
        let mut config = MarketConfig::example();
        config.participants[0].min_value = 300;
        config.participants[0].max_value = 200;
        let mut rng = StdRng::seed_from_u64(11);
        let err = MarketEnvironment::from_config(&config, &mut rng).unwrap_err();
        assert!(matches!(err, MarketError::Endowment { .. }));
    }

    #[test]
    fn deterministic_for_a_fixed_seed() {
        let config = MarketConfig::example();
        let env_a =
            MarketEnvironment::from_config(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let env_b =
            MarketEnvironment::from_config(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(env_a.demand(), env_b.demand());
        assert_eq!(env_a.supply(), env_b.supply());
        assert_eq!(env_a.equilibrium(), env_b.equilibrium());
    }
}
