use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use leptos::*;

use crate::application::notifications::{self, Notification};
use crate::application::portfolio::PortfolioStore;
use crate::domain::{
    errors::{ApiError, ApiResult},
    logging::{LogComponent, get_logger},
    market::{PriceQuote, TradeRequest},
    session::SessionStore,
};
use crate::infrastructure::http::{TradeFill, TradingApiClient};

/// Quantity field parser for the trading panel. Only positive integers make
/// it past here; anything else never reaches the remote service.
pub fn parse_quantity(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|quantity| *quantity > 0)
}

/// Execution port, injectable so settlement can be tested without a network.
pub type TradeExecutor = Rc<dyn Fn(TradeRequest) -> LocalBoxFuture<'static, ApiResult<TradeFill>>>;

/// Where emitted notifications go (the toast stack in production).
pub type NotificationSink = Rc<dyn Fn(Notification)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

/// What a success toast shows. The price is the last polled quote, not an
/// execution price from the service, so the total is display-only.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub request: TradeRequest,
    pub price: Option<f64>,
    pub remaining_balance: f64,
}

impl TradeReceipt {
    pub fn new(request: &TradeRequest, quote: Option<&PriceQuote>, fill: &TradeFill) -> Self {
        let price = quote
            .filter(|q| q.symbol == request.symbol)
            .map(|q| q.price.value());
        Self {
            request: request.clone(),
            price,
            remaining_balance: fill.remaining_balance,
        }
    }

    pub fn total(&self) -> Option<f64> {
        self.price.map(|price| price * self.request.quantity as f64)
    }

    fn money(value: Option<f64>) -> String {
        value.map_or_else(|| "N/A".to_string(), |v| format!("${:.2}", v))
    }

    pub fn into_notification(self) -> Notification {
        let details = vec![
            ("Symbol".to_string(), self.request.symbol.value().to_string()),
            ("Quantity".to_string(), self.request.quantity.to_string()),
            ("Price".to_string(), Self::money(self.price)),
            ("Total".to_string(), Self::money(self.total())),
            ("Balance".to_string(), format!("${:.2}", self.remaining_balance)),
        ];
        Notification::success(self.request.side.success_title(), details)
    }
}

/// Sends buy/sell orders and settles their outcome: on success the portfolio
/// is re-fetched (never locally adjusted) before the receipt toast goes out;
/// on failure only a toast is emitted and shared state stays untouched.
///
/// `Idle -> Submitting -> Idle`; one order in flight per submitter.
#[derive(Clone)]
pub struct TradeSubmitter {
    phase: RwSignal<SubmitPhase>,
    session: SessionStore,
    portfolio: PortfolioStore,
    executor: TradeExecutor,
    sink: NotificationSink,
}

impl TradeSubmitter {
    pub fn new(
        session: SessionStore,
        portfolio: PortfolioStore,
        executor: TradeExecutor,
        sink: NotificationSink,
    ) -> Self {
        Self {
            phase: create_rw_signal(SubmitPhase::Idle),
            session,
            portfolio,
            executor,
            sink,
        }
    }

    /// Production wiring: orders go to the trading service, notifications to
    /// the global toast stack.
    pub fn for_api(
        api: Rc<TradingApiClient>,
        session: SessionStore,
        portfolio: PortfolioStore,
    ) -> Self {
        let executor: TradeExecutor = Rc::new(move |request| {
            let api = api.clone();
            async move { api.execute_trade(&request).await }.boxed_local()
        });
        let sink: NotificationSink = Rc::new(|notification| {
            let id = notifications::push(notification);
            notifications::schedule_expiry(id);
        });
        Self::new(session, portfolio, executor, sink)
    }

    pub fn phase(&self) -> RwSignal<SubmitPhase> {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase.get_untracked() == SubmitPhase::Submitting
    }

    /// Submit one order. Re-entrant calls while an order is in flight are
    /// no-ops. A missing token fails locally without contacting the service.
    pub async fn submit(&self, request: TradeRequest, quote: Option<PriceQuote>) {
        if self.is_submitting() {
            return;
        }
        if request.quantity == 0 {
            (self.sink)(Notification::error(
                "Transaction Failed",
                "Quantity must be a positive integer".to_string(),
            ));
            return;
        }
        if self.session.current_token().is_none() {
            (self.sink)(Notification::error(
                "Transaction Failed",
                ApiError::Unauthorized.user_message(),
            ));
            return;
        }

        self.phase.set(SubmitPhase::Submitting);
        let outcome = (self.executor)(request.clone()).await;
        match outcome {
            Ok(fill) => {
                // authoritative state comes from the re-fetch, not the fill
                self.portfolio.refresh().await;
                let receipt = TradeReceipt::new(&request, quote.as_ref(), &fill);
                (self.sink)(receipt.into_notification());
            }
            Err(err) => {
                get_logger().warn(
                    LogComponent::Application("Trade"),
                    &format!(
                        "{} {}x{} failed: {}",
                        request.side,
                        request.symbol.value(),
                        request.quantity,
                        err
                    ),
                );
                if err == ApiError::Unauthorized {
                    // rejected credential: gate back to the login surface
                    self.session.logout();
                }
                (self.sink)(Notification::error("Transaction Failed", err.user_message()));
            }
        }
        self.phase.set(SubmitPhase::Idle);
    }
}
