pub mod catalog;
pub mod entities;
pub mod value_objects;

pub use catalog::{default_instruments, load_catalog};
pub use entities::{Holding, Instrument, PortfolioSnapshot, TradeRequest};
pub use value_objects::{FetchStatus, Price, PriceQuote, Symbol, TradeSide};
