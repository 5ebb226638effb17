//! # spotsim
//!
//! A deterministic continuous double-auction (CDA) spot-market simulator
//! for agent-based trading experiments.
//!
//! A fixed population of buyers and sellers, each endowed with private
//! reservation values or unit costs, submits bids and asks into a
//! limit-order book over a sequence of discrete rounds. The simulator
//! measures how close the emergent outcome comes to the competitive
//! equilibrium, and runs tournaments of independent replications for
//! statistical evaluation.
//!
//! ## Features
//!
//! - **Five trading strategies**: Zero Intelligence, Kaplan, Ringuette,
//!   Persistent Shout, Skeleton, behind one exhaustive dispatcher
//! - **Price-at-standing settlement**: crossings trade at the resting quote
//! - **Append-only audit book**: every offer is logged with its outcome
//! - **Competitive benchmark**: analytical equilibrium and max surplus
//! - **Deterministic replications**: one seeded RNG per market, splitmix
//!   sub-streams per tournament replication
//!
//! ## Quick Start
//!
//! ```
//! use spotsim::{MarketConfig, MarketSim};
//!
//! let config = MarketConfig::example();
//! let mut sim = MarketSim::new("demo", &config, 42).unwrap();
//! let result = sim.run_period(100);
//!
//! // the book opens with the market's own seed quotes
//! assert_eq!(result.book[0].amount, 0.0);
//! assert_eq!(result.book[1].amount, 999.0);
//!
//! // realised welfare never beats the competitive benchmark
//! if let Some(efficiency) = result.efficiency {
//!     assert!(efficiency <= 100.0 + 1e-9);
//! }
//! ```
//!
//! ## Driving the institution directly
//!
//! The auction validates each offer, applies the spread-improvement rule,
//! and settles crossings at the standing quote on the resting side:
//!
//! ```
//! use spotsim::{
//!     DoubleAuction, OrderOutcome, Quote, ReservationValues, StrategyKind, Trader, UnitCosts,
//! };
//!
//! let mut traders = vec![
//!     Trader::buyer(
//!         "B1",
//!         StrategyKind::ZeroIntelligence,
//!         ReservationValues::new("B1", vec![100]).unwrap(),
//!     ),
//!     Trader::seller(
//!         "S1",
//!         StrategyKind::ZeroIntelligence,
//!         UnitCosts::new("S1", vec![50]).unwrap(),
//!     ),
//! ];
//! let mut auction = DoubleAuction::new("doc market");
//! for (i, trader) in traders.iter().enumerate() {
//!     auction.register(i, trader);
//! }
//!
//! assert_eq!(auction.order(Quote::ask("S1", 200.0), &mut traders), OrderOutcome::Standing);
//! let outcome = auction.order(Quote::bid("B1", 250.0), &mut traders);
//! assert_eq!(outcome, OrderOutcome::Contract { price: 200.0 });
//!
//! // both counterparties were notified and advanced their cursors
//! assert_eq!(traders[0].contracts(), &[200.0]);
//! assert_eq!(traders[1].units_traded(), 1);
//! ```
//!
//! ## Tournaments
//!
//! ```
//! use spotsim::{MarketConfig, Tournament};
//!
//! let tournament = Tournament::new("quick", MarketConfig::example(), 4, 50, 7);
//! let result = tournament.run().unwrap();
//!
//! assert_eq!(result.records.len(), 4);
//! assert_eq!(result.surplus_histogram.total(), 4);
//! // rerunning the same seed reproduces the records exactly
//! assert_eq!(tournament.run().unwrap().records, result.records);
//! ```
//!
//! With the `parallel` feature, [`Tournament::run_parallel`] produces the
//! identical result on the rayon thread pool.

mod auction;
mod book;
mod config;
mod endowment;
mod environment;
mod equilibrium;
mod error;
mod side;
mod simulator;
mod strategy;
pub mod stats;
mod tournament;
mod trader;
mod types;

// Re-export public API
pub use auction::{Contract, DoubleAuction, OrderOutcome, RejectReason};
pub use book::{LimitOrderBook, Offer, OfferAction, OfferKind, Quote, Standing};
pub use config::{MarketConfig, ParticipantConfig};
pub use endowment::{ReservationValues, UnitCosts};
pub use environment::MarketEnvironment;
pub use equilibrium::{Equilibrium, calc_equilibrium};
pub use error::MarketError;
pub use side::Side;
pub use simulator::{MarketSim, PeriodResult};
pub use stats::Histogram;
pub use tournament::{Tournament, TournamentRecord, TournamentResult, TournamentSummary};
pub use trader::{StrategyKind, TokenSchedule, Trader};
pub use types::{Money, PRICE_CEILING, PRICE_FLOOR, Token};
