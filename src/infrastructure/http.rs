use gloo::net::http::Request;
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::{ApiError, ApiResult},
    logging::{LogComponent, get_logger},
    market::{Holding, PortfolioSnapshot, Price, PriceQuote, Symbol, TradeRequest, TradeSide},
    session::SessionStore,
};

/// Remote trading service root.
pub const DEFAULT_API_BASE: &str = "https://stock-api-v2-0.onrender.com";

/// HTTP client for the trading service, on gloo. Attaches the session token
/// as a bearer credential; never retries.
#[derive(Clone)]
pub struct TradingApiClient {
    base_url: String,
    session: SessionStore,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginGrant {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceBody {
    pub price: f64,
}

#[derive(Debug, Serialize)]
struct TradeBody<'a> {
    symbol: &'a str,
    quantity: u32,
}

/// DTO for a filled buy/sell. The service reports the post-trade balance;
/// anything else in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct TradeFill {
    pub remaining_balance: f64,
}

#[derive(Debug, Deserialize)]
pub struct HoldingDto {
    pub stock_symbol: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct HoldingsBody {
    pub balance: f64,
    #[serde(default)]
    pub stock_holdings: Vec<HoldingDto>,
}

impl HoldingsBody {
    /// Convert the DTO into the domain snapshot
    pub fn into_snapshot(self) -> PortfolioSnapshot {
        let holdings = self
            .stock_holdings
            .into_iter()
            .map(|h| Holding::new(Symbol::from(h.stock_symbol.as_str()), h.quantity))
            .collect();
        PortfolioSnapshot::new(self.balance, holdings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub balance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub timestamp: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
struct TransactionsBody {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

/// Error payloads come in two dialects: `{detail}` from the auth endpoints,
/// `{error}` from the trading ones.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

pub fn endpoint_for_side(side: TradeSide) -> &'static str {
    match side {
        TradeSide::Buy => "/api/buy/",
        TradeSide::Sell => "/api/sell/",
    }
}

impl TradingApiClient {
    pub fn new(session: SessionStore) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, session)
    }

    pub fn with_base_url(base_url: &str, session: SessionStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> ApiResult<String> {
        self.session
            .current_token()
            .map(|token| format!("Bearer {}", token))
            .ok_or(ApiError::Unauthorized)
    }

    /// Exchange credentials for an access token. Failures carry the
    /// service-supplied `detail` so the form can show it inline.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let response = Request::post(&self.url("/api/login/"))
            .json(&LoginBody { username, password })
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail.or(body.error))
                .unwrap_or_else(|| "Invalid username or password".to_string());
            get_logger().warn(
                LogComponent::Infrastructure("TradingAPI"),
                &format!("Login rejected ({}): {}", status, message),
            );
            return Err(ApiError::Rejected(message));
        }

        let grant = response
            .json::<LoginGrant>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        Ok(grant.access)
    }

    /// Current price for one symbol. Unauthenticated by contract.
    pub async fn stock_price(&self, symbol: &Symbol) -> ApiResult<PriceQuote> {
        let url = self.url(&format!("/api/stock-price/{}", symbol.value()));
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(self.rejection(response).await);
        }

        let body = response
            .json::<PriceBody>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        if !(body.price > 0.0) {
            return Err(ApiError::Malformed(format!(
                "non-positive price {} for {}",
                body.price,
                symbol.value()
            )));
        }
        Ok(PriceQuote::new(symbol.clone(), Price::from(body.price)))
    }

    /// Execute one buy/sell. The caller guarantees `quantity > 0`.
    pub async fn execute_trade(&self, request: &TradeRequest) -> ApiResult<TradeFill> {
        let bearer = self.bearer()?;
        let response = Request::post(&self.url(endpoint_for_side(request.side)))
            .header("Authorization", &bearer)
            .json(&TradeBody {
                symbol: request.symbol.value(),
                quantity: request.quantity,
            })
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(self.rejection(response).await);
        }

        response
            .json::<TradeFill>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Full balance + holdings snapshot.
    pub async fn holdings(&self) -> ApiResult<PortfolioSnapshot> {
        let bearer = self.bearer()?;
        let response = Request::get(&self.url("/api/holdings/"))
            .header("Authorization", &bearer)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(self.rejection(response).await);
        }

        let body = response
            .json::<HoldingsBody>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        Ok(body.into_snapshot())
    }

    /// Account profile for the dashboard.
    pub async fn profile(&self) -> ApiResult<UserProfile> {
        let bearer = self.bearer()?;
        let response = Request::get(&self.url("/api/user/profile"))
            .header("Authorization", &bearer)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(self.rejection(response).await);
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Trade history for the dashboard.
    pub async fn transactions(&self) -> ApiResult<Vec<TransactionRecord>> {
        let bearer = self.bearer()?;
        let response = Request::get(&self.url("/api/transactions"))
            .header("Authorization", &bearer)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(self.rejection(response).await);
        }

        let body = response
            .json::<TransactionsBody>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        Ok(body.transactions)
    }

    /// Classify a non-2xx response. A rejected credential forces login;
    /// anything else surfaces the service's message verbatim.
    async fn rejection(&self, response: gloo::net::http::Response) -> ApiError {
        let status = response.status();
        if status == 401 || status == 403 {
            return ApiError::Unauthorized;
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.detail))
            .unwrap_or_else(|| format!("Error {}: request failed", status));
        ApiError::Rejected(message)
    }
}
