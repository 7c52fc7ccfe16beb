pub mod http;
pub mod services;
pub mod storage;

pub use http::TradingApiClient;
pub use storage::{BrowserCredentials, MemoryCredentials};
