//! Core types: Money, Token, and the price bounds that seed the book.

/// A quote amount or contract price.
///
/// Strategies other than Zero Intelligence produce real-valued quotes, so
/// amounts are floating point. The institution never rounds them; it only
/// compares them.
pub type Money = f64;

/// A reservation value or unit cost. Endowment schedules are integral.
pub type Token = i64;

/// The seed standing bid, placed by the market itself at the start of every
/// contract window. A real bid must strictly exceed it to stand.
pub const PRICE_FLOOR: Token = 0;

/// The seed standing ask. A real ask must be strictly below it to stand,
/// and all valid endowment draws fall in `[PRICE_FLOOR, PRICE_CEILING]`.
pub const PRICE_CEILING: Token = 999;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_order() {
        assert!(PRICE_FLOOR < PRICE_CEILING);
        assert_eq!(PRICE_FLOOR, 0);
        assert_eq!(PRICE_CEILING, 999);
    }
}
