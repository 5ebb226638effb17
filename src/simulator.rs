//! The round driver: one trading period of random trader activations.
//!
//! Each round activates one trader drawn uniformly from the whole
//! population, shows it the standing quotes as they were *before* its
//! action, and submits whatever it quotes. After the last round the
//! period is scored against the competitive equilibrium.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rustc_hash::FxHashMap;

use crate::auction::{Contract, DoubleAuction};
use crate::book::Offer;
use crate::environment::MarketEnvironment;
use crate::equilibrium::Equilibrium;
use crate::{MarketConfig, MarketError};

/// Everything a trading period produces.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodResult {
    /// The full audit book, seed rows included.
    pub book: Vec<Offer>,
    /// Settled contracts, in order.
    pub contracts: Vec<Contract>,
    /// The competitive benchmark for this realisation.
    pub equilibrium: Option<Equilibrium>,
    /// Realised total surplus across all traders.
    pub actual_surplus: f64,
    /// `100 * actual_surplus / max_surplus`; `None` when the benchmark
    /// surplus is zero or absent.
    pub efficiency: Option<f64>,
    /// Realised surplus per trader id.
    pub trader_surplus: FxHashMap<String, f64>,
}

/// One market simulation: environment, institution, and the replication's
/// random stream.
#[derive(Clone, Debug)]
pub struct MarketSim {
    name: String,
    env: MarketEnvironment,
    auction: DoubleAuction,
    rng: StdRng,
}

impl MarketSim {
    /// Build a simulation seeded with `seed`: draw endowments, compute the
    /// equilibrium, and register every trader with the institution.
    pub fn new(
        name: impl Into<String>,
        config: &MarketConfig,
        seed: u64,
    ) -> Result<Self, MarketError> {
        Self::with_rng(name, config, StdRng::seed_from_u64(seed))
    }

    /// Build a simulation from an already-seeded random stream.
    pub fn with_rng(
        name: impl Into<String>,
        config: &MarketConfig,
        mut rng: StdRng,
    ) -> Result<Self, MarketError> {
        let env = MarketEnvironment::from_config(config, &mut rng)?;
        let mut auction = DoubleAuction::new(config.market_name.clone());
        for (index, trader) in env.traders().iter().enumerate() {
            auction.register(index, trader);
        }
        Ok(MarketSim {
            name: name.into(),
            env,
            auction,
            rng,
        })
    }

    /// Run one period of `num_rounds` random activations and score it.
    pub fn run_period(&mut self, num_rounds: usize) -> PeriodResult {
        let population = self.env.traders().len();
        if population > 0 {
            for round_idx in 0..num_rounds {
                let picked = self.rng.gen_range(0..population);
                // the strategy sees the book as it stood before acting
                let standing = self.auction.standing();
                let (standing_bid, standing_ask) = (standing.bid, standing.ask);

                let quote = self.env.traders()[picked].quote(
                    standing_bid,
                    standing_ask,
                    round_idx,
                    num_rounds,
                    &mut self.rng,
                );
                if let Some(quote) = quote {
                    self.auction.order(quote, self.env.traders_mut());
                }
            }
        }
        self.score()
    }

    /// Score the period as it stands.
    fn score(&self) -> PeriodResult {
        let trader_surplus: FxHashMap<String, f64> = self
            .env
            .traders()
            .iter()
            .map(|t| (t.name().to_string(), t.surplus()))
            .collect();
        let actual_surplus: f64 = trader_surplus.values().sum();

        let equilibrium = self.env.equilibrium();
        let efficiency = equilibrium.and_then(|eq| {
            (eq.max_surplus > 0).then(|| 100.0 * actual_surplus / eq.max_surplus as f64)
        });

        PeriodResult {
            book: self.auction.book().offers().to_vec(),
            contracts: self.auction.contracts().to_vec(),
            equilibrium,
            actual_surplus,
            efficiency,
            trader_surplus,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The environment owning the traders.
    pub fn environment(&self) -> &MarketEnvironment {
        &self.env
    }

    /// The institution.
    pub fn auction(&self) -> &DoubleAuction {
        &self.auction
    }
}
