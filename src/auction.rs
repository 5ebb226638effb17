//! The double-auction institution.
//!
//! Validates every submitted offer, enforces the spread-improvement rule,
//! detects crossings, settles contracts at the resting quote, and fans the
//! contract notification out to every registered participant. Every
//! submission is logged in the book with its resolved action; invalid
//! orders are rejected locally and trading continues.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::book::{LimitOrderBook, OfferAction, OfferKind, Quote, Standing};
use crate::{Money, Side, Trader};

/// A settled trade.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contract {
    /// The resting quote at the time of crossing.
    pub price: Money,
    pub buyer: String,
    pub seller: String,
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {}, {})", self.price, self.buyer, self.seller)
    }
}

/// Why an offer was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    /// The quoter is not a registered participant.
    UnknownTrader,
    /// A buyer tried to ask or a seller tried to bid.
    WrongSide,
    /// The amount was negative or not finite.
    InvalidAmount,
    /// The offer would cross the market's own seed quote; a contract
    /// requires a real quoter on both sides.
    SeedCounterparty,
    /// The offer failed the spread-improvement rule.
    NoImprovement,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownTrader => write!(f, "invalid name"),
            RejectReason::WrongSide => write!(f, "wrong side for offer"),
            RejectReason::InvalidAmount => write!(f, "invalid amount"),
            RejectReason::SeedCounterparty => write!(f, "no real quoter on the resting side"),
            RejectReason::NoImprovement => write!(f, "does not improve the standing quote"),
        }
    }
}

/// How the institution resolved a submitted offer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderOutcome {
    /// The offer crossed and settled at the resting quote.
    Contract { price: Money },
    /// The offer became the new standing quote on its side.
    Standing,
    /// The offer was logged and discarded.
    Rejected(RejectReason),
}

/// A registered participant: a non-owning handle into the environment's
/// trader arena.
#[derive(Clone, Debug)]
struct Participant {
    index: usize,
    name: String,
    side: Side,
}

/// The institution: order book, standing quotes, contracts, participants.
#[derive(Clone, Debug)]
pub struct DoubleAuction {
    name: String,
    participants: Vec<Participant>,
    by_name: FxHashMap<String, usize>,
    book: LimitOrderBook,
    contracts: Vec<Contract>,
}

impl DoubleAuction {
    /// Open an auction: the book starts with the two seed offers.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        DoubleAuction {
            book: LimitOrderBook::new(name.clone()),
            name,
            participants: Vec::new(),
            by_name: FxHashMap::default(),
            contracts: Vec::new(),
        }
    }

    /// Register a trader. `index` is the trader's position in the arena
    /// slice passed to [`DoubleAuction::order`]; registration order is
    /// notification order.
    pub fn register(&mut self, index: usize, trader: &Trader) {
        self.by_name
            .insert(trader.name().to_string(), self.participants.len());
        self.participants.push(Participant {
            index,
            name: trader.name().to_string(),
            side: trader.side(),
        });
    }

    /// Submit an offer.
    ///
    /// The offer is always appended to the book with its resolved action.
    /// `traders` is the arena registered via [`DoubleAuction::register`];
    /// on a contract every participant is notified through it.
    pub fn order(&mut self, quote: Quote, traders: &mut [Trader]) -> OrderOutcome {
        let Quote { id, kind, amount } = quote;

        let registered = self.by_name.get(&id).copied();
        let Some(registry_index) = registered else {
            return self.reject(id, kind, amount, RejectReason::UnknownTrader);
        };
        if self.participants[registry_index].side != kind.side() {
            return self.reject(id, kind, amount, RejectReason::WrongSide);
        }
        if !amount.is_finite() || amount < 0.0 {
            return self.reject(id, kind, amount, RejectReason::InvalidAmount);
        }

        let standing = self.book.standing().clone();
        match kind {
            OfferKind::Bid => {
                if amount >= standing.ask {
                    let Some(seller) = standing.ask_id else {
                        return self.reject(id, kind, amount, RejectReason::SeedCounterparty);
                    };
                    self.book.append(&*id, kind, amount, OfferAction::Contract);
                    self.settle(standing.ask, id, seller, traders);
                    OrderOutcome::Contract { price: standing.ask }
                } else if amount > standing.bid {
                    self.book.append(&*id, kind, amount, OfferAction::Standing);
                    self.book.set_standing_bid(amount, &id);
                    OrderOutcome::Standing
                } else {
                    self.reject(id, kind, amount, RejectReason::NoImprovement)
                }
            }
            OfferKind::Ask => {
                if amount <= standing.bid {
                    let Some(buyer) = standing.bid_id else {
                        return self.reject(id, kind, amount, RejectReason::SeedCounterparty);
                    };
                    self.book.append(&*id, kind, amount, OfferAction::Contract);
                    self.settle(standing.bid, buyer, id, traders);
                    OrderOutcome::Contract { price: standing.bid }
                } else if amount < standing.ask {
                    self.book.append(&*id, kind, amount, OfferAction::Standing);
                    self.book.set_standing_ask(amount, &id);
                    OrderOutcome::Standing
                } else {
                    self.reject(id, kind, amount, RejectReason::NoImprovement)
                }
            }
        }
    }

    /// Record a contract, notify every participant in registration order,
    /// and reseed the standing quotes for the next contract window.
    fn settle(&mut self, price: Money, buyer: String, seller: String, traders: &mut [Trader]) {
        self.contracts.push(Contract {
            price,
            buyer,
            seller,
        });
        let contract = &self.contracts[self.contracts.len() - 1];
        for participant in &self.participants {
            let is_mine = participant.name == contract.buyer || participant.name == contract.seller;
            traders[participant.index].contract(price, is_mine);
        }
        self.book.reseed();
    }

    fn reject(
        &mut self,
        id: String,
        kind: OfferKind,
        amount: Money,
        reason: RejectReason,
    ) -> OrderOutcome {
        self.book.append(id, kind, amount, OfferAction::Rejected);
        OrderOutcome::Rejected(reason)
    }

    /// Every contract settled so far, in order.
    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    /// The audit book.
    pub fn book(&self) -> &LimitOrderBook {
        &self.book
    }

    /// The current standing quotes.
    pub fn standing(&self) -> &Standing {
        self.book.standing()
    }

    /// Number of registered participants.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Name of the market.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if `name` is a registered participant.
    pub fn is_registered(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}
