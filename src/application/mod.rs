pub mod notifications;
pub mod portfolio;
pub mod price_feed;
pub mod trade;

pub use portfolio::{PortfolioStore, provide_portfolio, use_portfolio};
pub use price_feed::{POLL_INTERVAL, abort_stale_polls, start_price_poll, stop_all_polls};
pub use trade::{SubmitPhase, TradeSubmitter, parse_quantity};
