//! Tournaments: many independent market replications with aggregate
//! statistics.
//!
//! Every replication draws fresh endowments from the same configuration
//! and runs one silent period. Replications share nothing; each seeds its
//! own random stream from the tournament root seed, so results are
//! reproducible and identical whether replications run serially or in
//! parallel.

use rustc_hash::FxHashMap;

use crate::equilibrium::Equilibrium;
use crate::simulator::MarketSim;
use crate::stats::{Histogram, histogram, mean, median};
use crate::{MarketConfig, MarketError};

/// Number of bins in the aggregate surplus/efficiency histograms.
const HISTOGRAM_BINS: usize = 30;

/// What one replication contributes to the aggregate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentRecord {
    pub actual_surplus: f64,
    pub efficiency: Option<f64>,
    pub equilibrium: Option<Equilibrium>,
    pub trader_surplus: FxHashMap<String, f64>,
}

/// Aggregate location statistics over all replications.
///
/// Efficiency aggregates cover only replications where efficiency was
/// defined; they are NaN if it never was.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentSummary {
    pub median_surplus: f64,
    pub mean_surplus: f64,
    pub median_efficiency: f64,
    pub mean_efficiency: f64,
}

/// Full tournament output: per-replication records plus aggregates.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentResult {
    pub records: Vec<TournamentRecord>,
    pub summary: TournamentSummary,
    /// Mean surplus per trader id, over the replications it appeared in.
    pub trader_mean_surplus: FxHashMap<String, f64>,
    pub surplus_histogram: Histogram,
    pub efficiency_histogram: Histogram,
}

impl TournamentResult {
    fn aggregate(records: Vec<TournamentRecord>) -> Self {
        let surpluses: Vec<f64> = records.iter().map(|r| r.actual_surplus).collect();
        let efficiencies: Vec<f64> = records.iter().filter_map(|r| r.efficiency).collect();

        let mut totals: FxHashMap<String, (f64, usize)> = FxHashMap::default();
        for record in &records {
            for (trader, &surplus) in &record.trader_surplus {
                let entry = totals.entry(trader.clone()).or_insert((0.0, 0));
                entry.0 += surplus;
                entry.1 += 1;
            }
        }
        let trader_mean_surplus = totals
            .into_iter()
            .map(|(trader, (total, count))| (trader, total / count as f64))
            .collect();

        TournamentResult {
            summary: TournamentSummary {
                median_surplus: median(&surpluses),
                mean_surplus: mean(&surpluses),
                median_efficiency: median(&efficiencies),
                mean_efficiency: mean(&efficiencies),
            },
            trader_mean_surplus,
            surplus_histogram: histogram(&surpluses, HISTOGRAM_BINS),
            efficiency_histogram: histogram(&efficiencies, HISTOGRAM_BINS),
            records,
        }
    }
}

/// A tournament: `replications` independent single-period markets.
#[derive(Clone, Debug)]
pub struct Tournament {
    name: String,
    config: MarketConfig,
    replications: usize,
    rounds_per_period: usize,
    seed: u64,
}

impl Tournament {
    pub fn new(
        name: impl Into<String>,
        config: MarketConfig,
        replications: usize,
        rounds_per_period: usize,
        seed: u64,
    ) -> Self {
        Tournament {
            name: name.into(),
            config,
            replications,
            rounds_per_period,
            seed,
        }
    }

    /// The root-derived seed for replication `index`: a splitmix-style
    /// stream split, so replications are decorrelated and independent of
    /// execution order.
    fn replication_seed(&self, index: usize) -> u64 {
        self.seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    fn run_replication(&self, index: usize) -> Result<TournamentRecord, MarketError> {
        let mut sim = MarketSim::new(
            format!("{} #{index}", self.name),
            &self.config,
            self.replication_seed(index),
        )?;
        let result = sim.run_period(self.rounds_per_period);
        Ok(TournamentRecord {
            actual_surplus: result.actual_surplus,
            efficiency: result.efficiency,
            equilibrium: result.equilibrium,
            trader_surplus: result.trader_surplus,
        })
    }

    /// Run every replication serially and aggregate.
    pub fn run(&self) -> Result<TournamentResult, MarketError> {
        let records = (0..self.replications)
            .map(|i| self.run_replication(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TournamentResult::aggregate(records))
    }

    /// Run replications on the rayon thread pool. Per-index seeding makes
    /// the result identical to [`Tournament::run`] regardless of thread
    /// scheduling.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self) -> Result<TournamentResult, MarketError> {
        use rayon::prelude::*;

        let records = (0..self.replications)
            .into_par_iter()
            .map(|i| self.run_replication(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TournamentResult::aggregate(records))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn replications(&self) -> usize {
        self.replications
    }

    pub fn rounds_per_period(&self) -> usize {
        self.rounds_per_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerun_is_identical_for_a_fixed_seed() {
        let config = MarketConfig::example();
        let tournament = Tournament::new("t", config, 4, 10, 12345);

        let a = tournament.run().unwrap();
        let b = tournament.run().unwrap();

        assert_eq!(a.records, b.records);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn replications_are_independent() {
        let config = MarketConfig::example();
        let tournament = Tournament::new("t", config, 4, 50, 7);
        let result = tournament.run().unwrap();

        assert_eq!(result.records.len(), 4);
        // distinct seeds draw distinct endowments: the equilibria differ
        // somewhere across replications
        let all_equal = result
            .records
            .windows(2)
            .all(|w| w[0].equilibrium == w[1].equilibrium);
        assert!(!all_equal, "replications shared random state");
    }

    #[test]
    fn aggregates_match_direct_recomputation() {
        let config = MarketConfig::example();
        let tournament = Tournament::new("t", config, 8, 60, 99);
        let result = tournament.run().unwrap();

        let surpluses: Vec<f64> = result.records.iter().map(|r| r.actual_surplus).collect();
        let efficiencies: Vec<f64> = result.records.iter().filter_map(|r| r.efficiency).collect();

        assert_eq!(result.summary.mean_surplus, crate::stats::mean(&surpluses));
        assert_eq!(
            result.summary.median_surplus,
            crate::stats::median(&surpluses)
        );
        assert_eq!(
            result.summary.mean_efficiency,
            crate::stats::mean(&efficiencies)
        );
        assert_eq!(
            result.summary.median_efficiency,
            crate::stats::median(&efficiencies)
        );

        assert_eq!(result.surplus_histogram.total(), surpluses.len());
        assert_eq!(result.efficiency_histogram.total(), efficiencies.len());
    }

    #[test]
    fn every_trader_appears_in_the_mean_map() {
        let config = MarketConfig::example();
        let tournament = Tournament::new("t", config, 3, 40, 5);
        let result = tournament.run().unwrap();

        assert_eq!(result.trader_mean_surplus.len(), 8);
        for id in ["B1", "B2", "B3", "B4", "S1", "S2", "S3", "S4"] {
            assert!(result.trader_mean_surplus.contains_key(id), "missing {id}");
        }

        // mean over replications the trader participated in
        let direct: f64 = result
            .records
            .iter()
            .map(|r| r.trader_surplus["B1"])
            .sum::<f64>()
            / result.records.len() as f64;
        assert!((result.trader_mean_surplus["B1"] - direct).abs() < 1e-12);
    }

    #[test]
    fn bad_config_fails_the_whole_run() {
        let mut config = MarketConfig::example();
        config.participants[2].num_units = 0;
        let tournament = Tournament::new("t", config, 3, 40, 5);
        assert!(tournament.run().is_err());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_serial() {
        let config = MarketConfig::example();
        let tournament = Tournament::new("t", config, 6, 30, 31);
        let serial = tournament.run().unwrap();
        let parallel = tournament.run_parallel().unwrap();
        assert_eq!(serial.records, parallel.records);
    }
}
