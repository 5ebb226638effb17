//! Property-based tests for trading-period invariants.
//!
//! Random market configurations mixing all five strategies are run for a
//! full period, then the audit book, contracts, cursors, and surplus
//! accounting are checked against each other.

use proptest::prelude::*;
use spotsim::{
    MarketConfig, MarketSim, OfferAction, OfferKind, ParticipantConfig, Side, StrategyKind,
};

fn strategy_strategy() -> impl Strategy<Value = StrategyKind> {
    prop_oneof![
        Just(StrategyKind::ZeroIntelligence),
        Just(StrategyKind::Kaplan),
        Just(StrategyKind::Ringuette),
        Just(StrategyKind::PersistentShout),
        Just(StrategyKind::Skeleton),
    ]
}

fn participant_strategy(side: Side) -> impl Strategy<Value = ParticipantConfig> {
    (strategy_strategy(), 1usize..=3, 0i64..=150, 0i64..=80).prop_map(
        move |(strategy, units, lo, span)| {
            ParticipantConfig::new("trader", side, strategy, units, lo, lo + span)
        },
    )
}

fn config_strategy() -> impl Strategy<Value = MarketConfig> {
    (
        prop::collection::vec(participant_strategy(Side::Buyer), 1..=4),
        prop::collection::vec(participant_strategy(Side::Seller), 1..=4),
    )
        .prop_map(|(buyers, sellers)| {
            let mut participants = buyers;
            participants.extend(sellers);
            MarketConfig::new("prop market", participants)
        })
}

fn zi_config_strategy() -> impl Strategy<Value = MarketConfig> {
    (
        (1usize..=4, 1usize..=3, 0i64..=150, 1i64..=80),
        (1usize..=4, 1usize..=3, 0i64..=150, 1i64..=80),
    )
        .prop_map(|(b, s)| {
            let mut participants = Vec::new();
            for _ in 0..b.0 {
                participants.push(ParticipantConfig::new(
                    "buyer",
                    Side::Buyer,
                    StrategyKind::ZeroIntelligence,
                    b.1,
                    b.2,
                    b.2 + b.3,
                ));
            }
            for _ in 0..s.0 {
                participants.push(ParticipantConfig::new(
                    "seller",
                    Side::Seller,
                    StrategyKind::ZeroIntelligence,
                    s.1,
                    s.2,
                    s.2 + s.3,
                ));
            }
            MarketConfig::new("zi market", participants)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    // ========================================================================
    // BOOK AND STANDINGS INVARIANTS
    // ========================================================================

    /// The book is append-only with contiguous sequence numbers, standing
    /// quotes improve strictly within each contract window, and every
    /// contract settles at the resting quote.
    #[test]
    fn book_replay_is_consistent(
        config in config_strategy(),
        seed in any::<u64>(),
        rounds in 1usize..120,
    ) {
        let mut sim = MarketSim::new("prop", &config, seed).unwrap();
        let result = sim.run_period(rounds);

        // contiguous sequence from 1
        for (i, offer) in result.book.iter().enumerate() {
            prop_assert_eq!(offer.seq, i as u64 + 1);
        }

        // replay the standing quotes through the audit log
        let mut cur_bid = 0.0f64;
        let mut cur_ask = 999.0f64;
        let mut settled = 0usize;
        for offer in &result.book {
            match (offer.action, offer.kind) {
                (OfferAction::Start, OfferKind::Bid) => cur_bid = offer.amount,
                (OfferAction::Start, OfferKind::Ask) => cur_ask = offer.amount,
                (OfferAction::Standing, OfferKind::Bid) => {
                    prop_assert!(offer.amount > cur_bid, "bid failed to improve");
                    prop_assert!(offer.amount < cur_ask, "standing bid crossed the ask");
                    cur_bid = offer.amount;
                }
                (OfferAction::Standing, OfferKind::Ask) => {
                    prop_assert!(offer.amount < cur_ask, "ask failed to improve");
                    prop_assert!(offer.amount > cur_bid, "standing ask crossed the bid");
                    cur_ask = offer.amount;
                }
                (OfferAction::Contract, OfferKind::Bid) => {
                    prop_assert!(offer.amount >= cur_ask);
                    prop_assert_eq!(result.contracts[settled].price, cur_ask,
                        "bid crossing must settle at the resting ask");
                    settled += 1;
                }
                (OfferAction::Contract, OfferKind::Ask) => {
                    prop_assert!(offer.amount <= cur_bid);
                    prop_assert_eq!(result.contracts[settled].price, cur_bid,
                        "ask crossing must settle at the resting bid");
                    settled += 1;
                }
                (OfferAction::Rejected, _) => {}
            }
            prop_assert!(cur_bid < cur_ask, "book crossed while open");
        }
        // at most one contract per offer, every contract has its book row
        prop_assert_eq!(settled, result.contracts.len());
    }

    // ========================================================================
    // CURSOR AND SURPLUS INVARIANTS
    // ========================================================================

    /// Cursors track own contracts exactly, everyone observes every price,
    /// and realised surplus decomposes over contracts.
    #[test]
    fn surplus_accounting_is_consistent(
        config in config_strategy(),
        seed in any::<u64>(),
        rounds in 1usize..120,
    ) {
        let mut sim = MarketSim::new("prop", &config, seed).unwrap();
        let result = sim.run_period(rounds);
        let traders = sim.environment().traders();

        for trader in traders {
            prop_assert_eq!(trader.contracts().len(), trader.units_traded());
            prop_assert!(trader.units_traded() <= trader.schedule().len());
            prop_assert_eq!(trader.prices().len(), result.contracts.len());
        }

        // per-trader map matches the traders and sums to the total
        let mapped: f64 = result.trader_surplus.values().sum();
        prop_assert!((mapped - result.actual_surplus).abs() < 1e-9);
        for trader in traders {
            prop_assert_eq!(result.trader_surplus[trader.name()], trader.surplus());
        }

        // decomposition over contracts: sum of value_k - cost_j
        let mut from_contracts = 0.0;
        for trader in traders {
            let tokens = trader.schedule().tokens();
            for (k, &price) in trader.contracts().iter().enumerate() {
                from_contracts += match trader.side() {
                    Side::Buyer => tokens[k] as f64 - price,
                    Side::Seller => price - tokens[k] as f64,
                };
            }
        }
        prop_assert!((from_contracts - result.actual_surplus).abs() < 1e-9);

        // trade volume cannot exceed the short side's endowment
        let buyer_units: usize = traders
            .iter()
            .filter(|t| t.side() == Side::Buyer)
            .map(|t| t.schedule().len())
            .sum();
        let seller_units: usize = traders
            .iter()
            .filter(|t| t.side() == Side::Seller)
            .map(|t| t.schedule().len())
            .sum();
        prop_assert!(result.contracts.len() <= buyer_units.min(seller_units));
    }

    // ========================================================================
    // EQUILIBRIUM AND EFFICIENCY INVARIANTS
    // ========================================================================

    /// The equilibrium is the longest prefix of crossing units, and
    /// realised efficiency never exceeds 100%.
    #[test]
    fn equilibrium_prefix_bounds_welfare(
        config in config_strategy(),
        seed in any::<u64>(),
        rounds in 1usize..120,
    ) {
        let mut sim = MarketSim::new("prop", &config, seed).unwrap();
        let result = sim.run_period(rounds);
        let env = sim.environment();

        // prefix recomputation
        let mut units = 0;
        let mut max_surplus = 0;
        for (&(_, value), &(_, cost)) in env.demand().iter().zip(env.supply()) {
            if value < cost {
                break;
            }
            units += 1;
            max_surplus += value - cost;
        }
        match result.equilibrium {
            Some(eq) => {
                prop_assert_eq!(eq.units, units);
                prop_assert_eq!(eq.max_surplus, max_surplus);
                prop_assert!(eq.price_low <= eq.price_high);
            }
            None => prop_assert_eq!(units, 0),
        }

        if let Some(eff) = result.efficiency {
            prop_assert!(eff <= 100.0 + 1e-9, "efficiency {} beats the optimum", eff);
        } else {
            prop_assert!(max_surplus == 0);
        }
    }

    /// ZI traders never trade at a loss, so all-ZI efficiency is a
    /// percentage in [0, 100].
    #[test]
    fn zi_efficiency_is_a_percentage(
        config in zi_config_strategy(),
        seed in any::<u64>(),
        rounds in 1usize..150,
    ) {
        let mut sim = MarketSim::new("prop", &config, seed).unwrap();
        let result = sim.run_period(rounds);

        for trader in sim.environment().traders() {
            prop_assert!(trader.surplus() >= -1e-9, "{} traded at a loss", trader.name());
        }
        if let Some(eff) = result.efficiency {
            prop_assert!((0.0..=100.0 + 1e-9).contains(&eff));
        }
    }
}
