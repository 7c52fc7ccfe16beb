use derive_more::{Display, From, Into, Deref, DerefMut, Constructor};
use serde::{Serialize, Deserialize};
use std::cmp::Ordering;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - currency amount
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, DerefMut, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - stock ticker symbol, normalized to uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, DerefMut, Display, Serialize, Deserialize)]
#[display(fmt = "Symbol({})", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: String) -> Result<Self, String> {
        if symbol.is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self(symbol.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_uppercase())
    }
}

/// Value Object - trade direction with strum autogeneration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
pub enum TradeSide {
    #[strum(serialize = "buy")]
    #[serde(rename = "buy")]
    Buy,

    #[strum(serialize = "sell")]
    #[serde(rename = "sell")]
    Sell,
}

impl TradeSide {
    /// Title used on success toasts ("Purchase Successful" / "Sale Successful")
    pub fn success_title(&self) -> &'static str {
        match self {
            Self::Buy => "Purchase Successful",
            Self::Sell => "Sale Successful",
        }
    }
}

/// Value Object - last observed price for one symbol.
/// A newer quote for the same symbol supersedes this one entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: Symbol,
    pub price: Price,
}

impl PriceQuote {
    pub fn new(symbol: Symbol, price: Price) -> Self {
        Self { symbol, price }
    }
}

/// Observable freshness of a fetched aggregate. `Stale` means the previous
/// value is still displayed but the last fetch for it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
pub enum FetchStatus {
    #[default]
    #[strum(serialize = "ok")]
    Ok,
    #[strum(serialize = "stale")]
    Stale,
    #[strum(serialize = "error")]
    Error,
}
