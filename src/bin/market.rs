//! Spot-market simulator CLI.
//!
//! Runs a single verbose trading period or a tournament over the built-in
//! example market.
//!
//! Usage:
//!   market demo [ROUNDS] [SEED]
//!   market tournament REPLICATIONS ROUNDS [SEED]

use std::env;
use std::process::ExitCode;

use spotsim::{MarketConfig, MarketSim, PeriodResult, Tournament, TournamentResult};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("demo") => {
            let rounds = parse_or(args.get(1), 100);
            let seed = parse_or(args.get(2), 42);
            run_demo(rounds, seed)
        }
        Some("tournament") => match (args.get(1), args.get(2)) {
            (Some(replications), Some(rounds)) => {
                let replications = parse_or(Some(replications), 100);
                let rounds = parse_or(Some(rounds), 100);
                let seed = parse_or(args.get(3), 42);
                run_tournament(replications, rounds, seed)
            }
            _ => usage(),
        },
        Some("help") | None => usage(),
        Some(other) => {
            eprintln!("Unknown command: '{other}'.");
            usage()
        }
    }
}

fn parse_or<T: std::str::FromStr>(arg: Option<&String>, default: T) -> T {
    arg.and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn usage() -> ExitCode {
    println!(
        r#"spot-market simulator

Commands:
  demo [ROUNDS] [SEED]                    Run one verbose trading period
  tournament REPLICATIONS ROUNDS [SEED]   Run a tournament and summarise
  help                                    Show this help

Examples:
  market demo 100 42
  market tournament 1000 100 7"#
    );
    ExitCode::SUCCESS
}

fn run_demo(rounds: usize, seed: u64) -> ExitCode {
    let config = MarketConfig::example();
    let mut sim = match MarketSim::new("demo", &config, seed) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("failed to build market: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("Market Participants");
    println!("-------------------");
    for trader in sim.environment().traders() {
        println!("{trader}");
    }
    println!();

    if let Some(eq) = sim.environment().equilibrium() {
        println!("Competitive equilibrium");
        println!("  price range  = {} - {}", eq.price_low, eq.price_high);
        println!("  quantity     = {}", eq.units);
        println!("  max surplus  = {}", eq.max_surplus);
    } else {
        println!("No equilibrium: demand and supply never cross");
    }
    println!();

    let result = sim.run_period(rounds);
    print_period(&sim, &result);
    ExitCode::SUCCESS
}

fn print_period(sim: &MarketSim, result: &PeriodResult) {
    println!("Order book for {}", sim.auction().name());
    for offer in &result.book {
        println!("{offer}");
    }
    println!();

    println!("Contracts");
    for contract in &result.contracts {
        println!("  {contract}");
    }
    println!();

    println!("actual surplus = {}", result.actual_surplus);
    match result.efficiency {
        Some(eff) => println!("efficiency     = {eff:.2}%"),
        None => println!("efficiency     = undefined (no attainable surplus)"),
    }
}

fn run_tournament(replications: usize, rounds: usize, seed: u64) -> ExitCode {
    let config = MarketConfig::example();
    let tournament = Tournament::new("tournament", config, replications, rounds, seed);

    let result = match tournament.run() {
        Ok(result) => result,
        Err(err) => {
            eprintln!("tournament failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    print_tournament(&result);
    ExitCode::SUCCESS
}

fn print_tournament(result: &TournamentResult) {
    let mut traders: Vec<(&String, &f64)> = result.trader_mean_surplus.iter().collect();
    traders.sort_by(|a, b| a.0.cmp(b.0));
    for (trader, avg) in traders {
        println!("{trader}: average surplus = {avg:.2}");
    }
    println!();

    println!("median actual surplus: {:.2}", result.summary.median_surplus);
    println!("mean actual surplus:   {:.2}", result.summary.mean_surplus);
    println!("median efficiency:     {:.2}", result.summary.median_efficiency);
    println!("mean efficiency:       {:.2}", result.summary.mean_efficiency);
    println!();

    println!("Distribution of actual surplus");
    print_histogram(&result.surplus_histogram);
    println!();
    println!("Distribution of efficiency");
    print_histogram(&result.efficiency_histogram);
}

fn print_histogram(hist: &spotsim::Histogram) {
    let peak = hist.counts.iter().copied().max().unwrap_or(0).max(1);
    for (i, &count) in hist.counts.iter().enumerate() {
        let lo = hist.edges[i];
        let hi = hist.edges[i + 1];
        let bar = "#".repeat(count * 50 / peak);
        println!("  [{lo:8.1}, {hi:8.1}) {count:>5} {bar}");
    }
}
