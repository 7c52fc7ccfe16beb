pub use super::value_objects::{Price, Symbol, TradeSide};
use serde::{Deserialize, Serialize};

/// Domain entity - a tradable instrument. Immutable once the catalog loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub display_name: String,
    pub category: String,
}

impl Instrument {
    pub fn new(symbol: &str, display_name: &str, category: &str) -> Self {
        Self {
            symbol: Symbol::from(symbol),
            display_name: display_name.to_string(),
            category: category.to_string(),
        }
    }

    /// Case-insensitive match against symbol, name or category.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.symbol.value().to_lowercase().contains(&term)
            || self.display_name.to_lowercase().contains(&term)
            || self.category.to_lowercase().contains(&term)
    }
}

/// Domain entity - one position in the user's portfolio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: Symbol,
    pub quantity: u32,
}

impl Holding {
    pub fn new(symbol: Symbol, quantity: u32) -> Self {
        Self { symbol, quantity }
    }
}

/// Domain entity - balance plus positions as of one successful fetch.
/// Always possibly stale; only ever replaced wholesale, never merged or
/// recomputed locally after a trade.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub balance: f64,
    pub holdings: Vec<Holding>,
}

impl PortfolioSnapshot {
    pub fn new(balance: f64, holdings: Vec<Holding>) -> Self {
        Self { balance, holdings }
    }

    pub fn position(&self, symbol: &Symbol) -> Option<&Holding> {
        self.holdings.iter().find(|h| &h.symbol == symbol)
    }
}

/// Domain entity - one buy/sell order as handed to the remote service.
/// Ephemeral: lives for a single submission, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub symbol: Symbol,
    pub quantity: u32,
    pub side: TradeSide,
}

impl TradeRequest {
    pub fn new(side: TradeSide, symbol: Symbol, quantity: u32) -> Self {
        Self { symbol, quantity, side }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_search_matches_any_field() {
        let apple = Instrument::new("AAPL", "Apple", "Technology");
        assert!(apple.matches("aapl"));
        assert!(apple.matches("apple"));
        assert!(apple.matches("tech"));
        assert!(!apple.matches("finance"));
    }

    #[test]
    fn snapshot_position_lookup() {
        let snapshot = PortfolioSnapshot::new(
            100.0,
            vec![Holding::new(Symbol::from("AAPL"), 3)],
        );
        assert_eq!(snapshot.position(&Symbol::from("AAPL")).unwrap().quantity, 3);
        assert!(snapshot.position(&Symbol::from("MSFT")).is_none());
    }
}
