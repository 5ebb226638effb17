//! Limit-order book: an append-only audit log of every offer plus the
//! current standing bid/ask snapshot.
//!
//! The book never discards anything. Every submission lands as an
//! immutable [`Offer`] row with a strictly increasing sequence number and
//! the action the institution resolved for it. The standing quotes are
//! reseeded to the market's own bid/ask at the start of the period and
//! after every contract.

use std::fmt;

use crate::{Money, PRICE_CEILING, PRICE_FLOOR, Side};

/// Whether an offer is a bid (buyer) or an ask (seller).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OfferKind {
    Bid,
    Ask,
}

impl OfferKind {
    /// The side that submits this kind of offer.
    #[inline]
    pub fn side(self) -> Side {
        match self {
            OfferKind::Bid => Side::Buyer,
            OfferKind::Ask => Side::Seller,
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            OfferKind::Bid => "bid",
            OfferKind::Ask => "ask",
        })
    }
}

/// How the institution resolved an offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OfferAction {
    /// Synthetic seed row opening a contract window.
    Start,
    /// Became the new standing quote on its side.
    Standing,
    /// Crossed the opposite standing quote and settled.
    Contract,
    /// Failed validation or the spread-improvement rule.
    Rejected,
}

impl fmt::Display for OfferAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            OfferAction::Start => "start",
            OfferAction::Standing => "standing",
            OfferAction::Contract => "contract",
            OfferAction::Rejected => "rejected",
        })
    }
}

/// An offer as a trader submits it, before the institution resolves it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    /// Name of the submitting trader.
    pub id: String,
    pub kind: OfferKind,
    pub amount: Money,
}

impl Quote {
    pub fn bid(id: impl Into<String>, amount: Money) -> Self {
        Quote {
            id: id.into(),
            kind: OfferKind::Bid,
            amount,
        }
    }

    pub fn ask(id: impl Into<String>, amount: Money) -> Self {
        Quote {
            id: id.into(),
            kind: OfferKind::Ask,
            amount,
        }
    }
}

/// An immutable book row: a resolved offer with its sequence number.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offer {
    /// Position in the book, starting at 1, no gaps.
    pub seq: u64,
    /// Name of the quoter (the market itself for `Start` rows).
    pub id: String,
    pub kind: OfferKind,
    pub amount: Money,
    pub action: OfferAction,
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} {:<8} {} {:>8.2} : {}",
            self.seq, self.action, self.kind, self.amount, self.id
        )
    }
}

/// The current best outstanding quote on each side.
///
/// A `None` id marks the seed quote placed by the market itself; a real
/// crossing requires the resting side to carry a trader id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Standing {
    pub bid: Money,
    pub bid_id: Option<String>,
    pub ask: Money,
    pub ask_id: Option<String>,
}

impl Standing {
    /// The open-book state: market bid at the floor, market ask at the
    /// ceiling.
    pub fn seed() -> Self {
        Standing {
            bid: PRICE_FLOOR as Money,
            bid_id: None,
            ask: PRICE_CEILING as Money,
            ask_id: None,
        }
    }

    /// True while no real bid has improved on the seed.
    #[inline]
    pub fn is_seed_bid(&self) -> bool {
        self.bid_id.is_none()
    }

    /// True while no real ask has improved on the seed.
    #[inline]
    pub fn is_seed_ask(&self) -> bool {
        self.ask_id.is_none()
    }

    /// Current bid-ask spread.
    #[inline]
    pub fn spread(&self) -> Money {
        self.ask - self.bid
    }
}

/// The append-only order book owned by the institution.
#[derive(Clone, Debug)]
pub struct LimitOrderBook {
    market: String,
    offers: Vec<Offer>,
    next_seq: u64,
    standing: Standing,
}

impl LimitOrderBook {
    /// Create a book for `market` and open the first contract window.
    pub fn new(market: impl Into<String>) -> Self {
        let mut book = LimitOrderBook {
            market: market.into(),
            offers: Vec::new(),
            next_seq: 1,
            standing: Standing::seed(),
        };
        book.reseed();
        book
    }

    /// Append a resolved offer, assigning the next sequence number.
    pub fn append(
        &mut self,
        id: impl Into<String>,
        kind: OfferKind,
        amount: Money,
        action: OfferAction,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.offers.push(Offer {
            seq,
            id: id.into(),
            kind,
            amount,
            action,
        });
        seq
    }

    /// Open a new contract window: log the two synthetic seed offers and
    /// reset the standing quotes. Called at period start and after every
    /// contract.
    pub fn reseed(&mut self) {
        let seed = Standing::seed();
        let market = self.market.clone();
        self.append(market.clone(), OfferKind::Bid, seed.bid, OfferAction::Start);
        self.append(market, OfferKind::Ask, seed.ask, OfferAction::Start);
        self.standing = seed;
    }

    /// Record a new standing bid.
    pub fn set_standing_bid(&mut self, amount: Money, id: &str) {
        self.standing.bid = amount;
        self.standing.bid_id = Some(id.to_string());
    }

    /// Record a new standing ask.
    pub fn set_standing_ask(&mut self, amount: Money, id: &str) {
        self.standing.ask = amount;
        self.standing.ask_id = Some(id.to_string());
    }

    /// The current standing quotes.
    pub fn standing(&self) -> &Standing {
        &self.standing
    }

    /// Every offer logged so far, in sequence order.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Name of the owning market.
    pub fn market(&self) -> &str {
        &self.market
    }
}
