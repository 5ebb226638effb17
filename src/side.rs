//! Market side: Buyer or Seller

use std::fmt;
use std::str::FromStr;

/// Which side of the market a trader is on.
///
/// Buyers bid, sellers ask; the institution rejects offers submitted from
/// the wrong side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Buyer,
    Seller,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buyer => Side::Seller,
            Side::Seller => Side::Buyer,
        }
    }

    /// Single-letter code used in participant ids (`B1`, `S2`, ...).
    #[inline]
    pub fn code(self) -> char {
        match self {
            Side::Buyer => 'B',
            Side::Seller => 'S',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(Side::Buyer),
            "S" => Ok(Side::Seller),
            other => Err(format!("unknown side: {other:?}")),
        }
    }
}
