use super::entities::Instrument;
use crate::domain::logging::{LogComponent, get_logger};
use gloo_timers::future::sleep;
use std::time::Duration;

/// Simulated network latency for the catalog fetch.
pub const CATALOG_LOAD_DELAY: Duration = Duration::from_secs(1);

/// The fixed instrument universe for the event. Order is the display order.
pub fn default_instruments() -> Vec<Instrument> {
    vec![
        Instrument::new("MSFT", "Microsoft", "Technology"),
        Instrument::new("AAPL", "Apple", "Technology"),
        Instrument::new("AMZN", "Amazon", "E-commerce"),
        Instrument::new("NVDA", "NVIDIA", "Semiconductors"),
        Instrument::new("TSLA", "Tesla", "Automobile"),
        Instrument::new("GOOGL", "Google", "Technology"),
        Instrument::new("META", "Meta", "Social Media"),
        Instrument::new("WMT", "Walmart", "Retail"),
        Instrument::new("JPM", "JP Morgan", "Finance"),
        Instrument::new("V", "Visa", "Finance"),
        Instrument::new("MA", "MasterCard", "Finance"),
        Instrument::new("NFLX", "Netflix", "Entertainment"),
        Instrument::new("ORCL", "Oracle Corporation", "Technology"),
        Instrument::new("CRM", "Salesforce", "Technology"),
        Instrument::new("CSCO", "Cisco", "Technology"),
        Instrument::new("MCD", "McDonald's", "Food and Beverage"),
        Instrument::new("ACN", "Accenture", "Consulting"),
        Instrument::new("GS", "Goldman Sachs", "Finance"),
        Instrument::new("QCOM", "Qualcomm", "Semiconductors"),
        Instrument::new("CAT", "Caterpillar", "Heavy Machinery"),
        Instrument::new("UBER", "Uber", "Ride-hailing"),
        Instrument::new("C", "Citigroup", "Finance"),
        Instrument::new("SHOP", "Shopify", "E-commerce"),
        Instrument::new("SBUX", "Starbucks Corporation", "Food and Beverage"),
        Instrument::new("SPOT", "Spotify", "Entertainment"),
    ]
}

/// One-shot catalog load. Each call re-executes the simulated fetch; there is
/// no replayed cache. The data source can be swapped for a live feed without
/// touching callers.
pub async fn load_catalog() -> Vec<Instrument> {
    sleep(CATALOG_LOAD_DELAY).await;
    let instruments = default_instruments();
    get_logger().info(
        LogComponent::Domain("Catalog"),
        &format!("📋 Loaded {} instruments", instruments.len()),
    );
    instruments
}
