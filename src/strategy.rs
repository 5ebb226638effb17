//! The five bidding policies, behind one exhaustive dispatcher.
//!
//! Every policy is a pure function of the standing quotes, the round
//! clock, the trader's own schedule, and the injected RNG. Policies never
//! see the book and never mutate anything.
//!
//! Zero Intelligence draws integer quotes; every other policy emits raw
//! real-valued quotes that the institution compares without rounding.

use rand::Rng;
use rand::rngs::StdRng;

use crate::trader::{StrategyKind, TokenSchedule};
use crate::{Money, PRICE_CEILING, PRICE_FLOOR, Side, Token};

/// Produce a quote amount for one trader activation, or `None` for "no
/// offer this round".
///
/// Shared rule: an exhausted schedule quotes nothing.
#[allow(clippy::too_many_arguments)]
pub(crate) fn quote(
    side: Side,
    strategy: StrategyKind,
    schedule: &TokenSchedule,
    standing_bid: Money,
    standing_ask: Money,
    round_idx: usize,
    total_rounds: usize,
    rng: &mut StdRng,
) -> Option<Money> {
    let current = schedule.current()?;
    let next = schedule.next_token().unwrap_or(current);
    let first = schedule.first();
    let last = schedule.last();

    match (side, strategy) {
        (Side::Buyer, StrategyKind::ZeroIntelligence) => zi_bid(current, standing_bid, rng),
        (Side::Seller, StrategyKind::ZeroIntelligence) => zi_ask(current, standing_ask, rng),
        (Side::Buyer, StrategyKind::Kaplan) => {
            kaplan_bid(current, next, standing_bid, standing_ask, round_idx, total_rounds)
        }
        (Side::Seller, StrategyKind::Kaplan) => {
            kaplan_ask(current, next, standing_bid, standing_ask, round_idx, total_rounds)
        }
        (Side::Buyer, StrategyKind::Ringuette) => ringuette_bid(
            next,
            first,
            last,
            standing_bid,
            standing_ask,
            round_idx,
            total_rounds,
            rng,
        ),
        (Side::Seller, StrategyKind::Ringuette) => ringuette_ask(
            next,
            first,
            last,
            standing_bid,
            standing_ask,
            round_idx,
            total_rounds,
            rng,
        ),
        (Side::Buyer, StrategyKind::PersistentShout) => {
            ps_bid(current, standing_bid, standing_ask, rng)
        }
        (Side::Seller, StrategyKind::PersistentShout) => {
            ps_ask(current, standing_bid, standing_ask, rng)
        }
        (Side::Buyer, StrategyKind::Skeleton) => {
            skeleton_bid(next, first, last, standing_bid, standing_ask, rng)
        }
        (Side::Seller, StrategyKind::Skeleton) => {
            skeleton_ask(next, first, last, standing_bid, standing_ask, rng)
        }
    }
}

/// Fraction of the period left at which Kaplan buyers start sniping.
const KAPLAN_BUYER_ENDGAME: f64 = 0.1;
/// Seller-side sniping threshold.
const KAPLAN_SELLER_ENDGAME: f64 = 0.2;

/// Ringuette delegates to Skeleton for the tail of the period.
const RINGUETTE_BUYER_TAIL: f64 = 0.1;
const RINGUETTE_SELLER_TAIL: f64 = 0.2;

/// Fraction of the period remaining.
#[inline]
fn remaining(round_idx: usize, total_rounds: usize) -> f64 {
    1.0 - round_idx as f64 / total_rounds as f64
}

/// Bid uniformly between the standing bid and the current value.
fn zi_bid(current: Token, standing_bid: Money, rng: &mut StdRng) -> Option<Money> {
    if standing_bid < current as Money {
        let lo = standing_bid.ceil() as Token;
        Some(rng.gen_range(lo..=current) as Money)
    } else {
        None
    }
}

/// Ask uniformly between the current cost and the standing ask.
fn zi_ask(current: Token, standing_ask: Money, rng: &mut StdRng) -> Option<Money> {
    if (current as Money) < standing_ask {
        let hi = standing_ask.floor() as Token;
        Some(rng.gen_range(current..=hi) as Money)
    } else {
        None
    }
}

/// Kaplan: wait in the background, then snipe when the spread is already
/// narrow, the good is free, or the period is almost over.
fn kaplan_bid(
    current: Token,
    next: Token,
    standing_bid: Money,
    standing_ask: Money,
    round_idx: usize,
    total_rounds: usize,
) -> Option<Money> {
    let current = current as Money;
    let most = standing_ask.min((next - 1) as Money);
    if most <= standing_bid {
        return None;
    }
    let narrow_spread = standing_ask <= PRICE_CEILING as Money
        && (current - standing_bid) / current > 0.02
        && standing_ask - standing_bid < 0.1 * standing_ask;
    let free_good = standing_ask <= 0.0;
    let endgame = remaining(round_idx, total_rounds) <= KAPLAN_BUYER_ENDGAME;
    (narrow_spread || free_good || endgame).then_some(most)
}

fn kaplan_ask(
    current: Token,
    next: Token,
    standing_bid: Money,
    standing_ask: Money,
    round_idx: usize,
    total_rounds: usize,
) -> Option<Money> {
    let current = current as Money;
    let least = standing_bid.max((next + 1) as Money);
    if least >= standing_ask {
        return None;
    }
    let narrow_spread = standing_bid >= PRICE_FLOOR as Money
        && (standing_ask - current) / current > 0.02
        && standing_ask - standing_bid < 0.1 * standing_bid;
    let ceiling_bid = standing_bid >= PRICE_CEILING as Money;
    let endgame = remaining(round_idx, total_rounds) <= KAPLAN_SELLER_ENDGAME;
    (narrow_spread || ceiling_bid || endgame).then_some(least)
}

/// Ringuette: creep up the bid early, jump the spread when it is wide and
/// the next token leaves room, play Skeleton at the end of the period.
#[allow(clippy::too_many_arguments)]
fn ringuette_bid(
    next: Token,
    first: Token,
    last: Token,
    standing_bid: Money,
    standing_ask: Money,
    round_idx: usize,
    total_rounds: usize,
    rng: &mut StdRng,
) -> Option<Money> {
    if remaining(round_idx, total_rounds) <= RINGUETTE_BUYER_TAIL {
        return skeleton_bid(next, first, last, standing_bid, standing_ask, rng);
    }
    let span = (first - last + 10) as Money;
    let quarter = total_rounds as Money / 4.0;
    if standing_bid < quarter {
        return Some(standing_bid + 1.0);
    }
    if standing_bid > quarter
        && standing_ask - standing_bid > span / 5.0
        && next as Money > standing_ask + span / 5.0
    {
        return Some(standing_ask + 1.0 + 0.05 * rng.gen_range(0.0..1.0) * span);
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn ringuette_ask(
    next: Token,
    first: Token,
    last: Token,
    standing_bid: Money,
    standing_ask: Money,
    round_idx: usize,
    total_rounds: usize,
    rng: &mut StdRng,
) -> Option<Money> {
    if remaining(round_idx, total_rounds) <= RINGUETTE_SELLER_TAIL {
        return skeleton_ask(next, first, last, standing_bid, standing_ask, rng);
    }
    let span = (last - first + 10) as Money;
    let quarter = total_rounds as Money / 4.0;
    if standing_ask > quarter {
        return Some(standing_ask - 1.0);
    }
    if standing_ask < quarter
        && standing_ask - standing_bid > span / 5.0
        && (next as Money) < standing_bid - span / 5.0
    {
        return Some(standing_bid - 1.0 - 0.05 * rng.gen_range(0.0..1.0) * span);
    }
    None
}

/// Persistent Shout: nudge a target past the standing quote and move a
/// damped step toward it, quoting only while the step stays profitable.
fn ps_bid(current: Token, standing_bid: Money, standing_ask: Money, rng: &mut StdRng) -> Option<Money> {
    const GAMMA: f64 = 0.5;
    const BETA: f64 = 0.1;
    let r_1 = rng.gen_range(0.0..0.2);
    let r_2 = rng.gen_range(0.0..0.2);
    let current = current as Money;

    let target = if standing_ask > standing_bid {
        standing_bid + (r_1 * standing_bid + r_2)
    } else {
        standing_ask - (r_1 * standing_ask + r_2)
    };
    let potential = GAMMA * current + (1.0 - GAMMA) * BETA * (target - current);
    (potential <= current).then_some(potential)
}

fn ps_ask(current: Token, standing_bid: Money, standing_ask: Money, rng: &mut StdRng) -> Option<Money> {
    const GAMMA: f64 = 0.3;
    const BETA: f64 = 0.05;
    let r_1 = rng.gen_range(0.0..0.2);
    let r_2 = rng.gen_range(0.0..0.2);
    let current = current as Money;

    let target = if standing_ask > standing_bid {
        standing_bid - (r_1 * standing_ask + r_2)
    } else {
        standing_ask + (r_1 * standing_bid + r_2)
    };
    let potential = GAMMA * current + (1.0 - GAMMA) * BETA * (target - current);
    (potential >= current).then_some(potential)
}

/// Skeleton: a convex step from just past the standing quote toward the
/// profitable extreme; against a fresh seed book, a quote pulled away from
/// the schedule's best token by a fraction of its range.
fn skeleton_bid(
    next: Token,
    first: Token,
    last: Token,
    standing_bid: Money,
    standing_ask: Money,
    rng: &mut StdRng,
) -> Option<Money> {
    let alpha = 0.25 + 0.1 * rng.gen_range(0.0..1.0);
    if standing_bid > PRICE_FLOOR as Money {
        let most = standing_ask.min((next - 1) as Money);
        if most <= standing_bid {
            return None;
        }
        Some((1.0 - alpha) * (standing_bid + 1.0) + alpha * most)
    } else {
        let range = (first - last) as Money;
        Some(standing_ask.min((first - 1) as Money) - alpha * range)
    }
}

fn skeleton_ask(
    next: Token,
    first: Token,
    last: Token,
    standing_bid: Money,
    standing_ask: Money,
    rng: &mut StdRng,
) -> Option<Money> {
    let alpha = 0.25 + 0.1 * rng.gen_range(0.0..1.0);
    if standing_ask < PRICE_CEILING as Money {
        let least = standing_bid.max((next + 1) as Money);
        if least >= standing_ask {
            return None;
        }
        Some((1.0 - alpha) * (standing_ask - 1.0) + alpha * least)
    } else {
        let range = (last - first) as Money;
        Some(standing_bid.max((first + 1) as Money) + alpha * range)
    }
}
